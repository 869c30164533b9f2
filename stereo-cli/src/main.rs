//! STEREO Radio Burst Correlator Command-Line Interface
//!
//! This CLI provides tools for:
//! - Detecting bursts in a paired STEREO/WAVES HFR window and matching them
//!   across spacecraft
//! - Writing one contour figure per matched pair
//! - Fitting a Gaussian peak to two-column sample files

use anyhow::{bail, Context, Result};
use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use stereo_core::{analyze, load_pair, AnalysisConfig, AnalysisReport, JsonContainer};
use stereo_fit::{GaussianFitter, GaussianParams};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stereo-events")]
#[command(author, version, about = "STEREO radio burst correlator", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Enable verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    analyze: AnalyzeArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect and match events in one observation window
    Analyze(AnalyzeArgs),

    /// Fit a Gaussian peak to a two-column sample file
    Fit(FitArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Container file holding both spacecraft
    input: Option<PathBuf>,

    /// JSON file overriding analysis thresholds
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for event figures
    #[arg(short, long, default_value = "plots")]
    output_dir: PathBuf,

    /// Skip writing figures
    #[arg(long)]
    no_render: bool,
}

#[derive(Args)]
struct FitArgs {
    /// Text file of `x y` pairs, whitespace or comma separated
    samples: PathBuf,

    /// Initial amplitude
    #[arg(long, default_value = "1.0")]
    amplitude: f64,

    /// Initial mean
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    mean: f64,

    /// Initial width
    #[arg(long, default_value = "1.0")]
    sigma: f64,

    /// Number of Gauss-Newton iterations
    #[arg(long, default_value = "10")]
    iterations: usize,

    /// Start from a moment estimate instead of the given parameters
    #[arg(long)]
    estimate: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Some(Commands::Analyze(args)) => run_analyze(args),
        Some(Commands::Fit(args)) => run_fit(args),
        None => run_analyze(cli.analyze),
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let Some(input) = args.input else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "the following required arguments were not provided:\n  <INPUT>",
            )
            .exit();
    };

    let config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    let container = JsonContainer::open(&input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let pair = load_pair(&container)
        .with_context(|| format!("Failed to load spectrograms from {}", input.display()))?;
    let report = analyze(pair, &config)
        .with_context(|| format!("Analysis of {} failed", input.display()))?;

    print_report(&report);

    if args.no_render {
        info!("figure rendering disabled");
        return Ok(());
    }
    if report.matches.is_empty() {
        warn!("no matched events, nothing to render");
        return Ok(());
    }

    let source_name = source_name(&input);
    let written = stereo_render::render_all(&report, &source_name, &args.output_dir)
        .with_context(|| format!("Failed to render figures into {}", args.output_dir.display()))?;
    for path in &written {
        println!("wrote {}", path.display());
    }

    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!(
        "window: {} samples, dt {:.1} s, power [{:.3e}, {:.3e}]",
        report.pair.a.samples(),
        report.stats.delta_t,
        report.stats.min,
        report.stats.max
    );
    println!(
        "events: {} on A, {} on B; {} matched",
        report.events_a.len(),
        report.events_b.len(),
        report.matches.len()
    );

    for (i, pair) in report.matches.iter().enumerate() {
        let event_a = &report.events_a[pair.event_a];
        let event_b = &report.events_b[pair.event_b];
        println!(
            "  event {:3}: A #{} at {:.0} s ({} samples), B #{} at {:.0} s ({} samples), {} columns",
            i,
            pair.event_a,
            event_a.start_time(&report.pair.a.time),
            event_a.len(),
            pair.event_b,
            event_b.start_time(&report.pair.b.time),
            event_b.len(),
            pair.len()
        );
    }
}

/// File stem used in figure titles
fn source_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}

fn run_fit(args: FitArgs) -> Result<()> {
    let text = fs::read_to_string(&args.samples)
        .with_context(|| format!("Failed to read {}", args.samples.display()))?;
    let (xs, ys) = parse_samples(&text)
        .with_context(|| format!("Failed to parse {}", args.samples.display()))?;

    let initial = if args.estimate {
        GaussianParams::estimate(&xs, &ys).context("Failed to estimate initial parameters")?
    } else {
        GaussianParams::new(args.amplitude, args.mean, args.sigma)
    };
    info!(
        "fitting {} samples from A={} mu={} sigma={}",
        xs.len(),
        initial.amplitude,
        initial.mean,
        initial.sigma
    );

    let fit = GaussianFitter::new()
        .with_initial(initial)
        .with_iterations(args.iterations)
        .fit(&xs, &ys)
        .context("Gaussian fit failed")?;

    println!("amplitude: {:.6}", fit.params.amplitude);
    println!("mean:      {:.6}", fit.params.mean);
    println!("sigma:     {:.6}", fit.params.sigma);
    println!("iterations: {}", fit.iterations);
    println!("residual sum of squares: {:.6e}", fit.residual_sum_squares);
    println!("rms residual: {:.6e}", fit.rms(xs.len()));
    let [r0, r1, r2] = fit.leading_residuals_squared;
    println!("leading squared residuals: {:.6e} {:.6e} {:.6e}", r0, r1, r2);

    if !fit.residual_sum_squares.is_finite() {
        warn!("fit diverged; try --estimate or a closer initial guess");
    }

    Ok(())
}

/// Parse `x y` lines; blank lines and `#` comments are skipped
fn parse_samples(text: &str) -> Result<(Vec<f64>, Vec<f64>)> {
    let mut xs = Vec::new();
    let mut ys = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() != 2 {
            bail!("line {}: expected 2 columns, found {}", lineno + 1, fields.len());
        }

        let parse = |field: &str| {
            field
                .parse::<f64>()
                .with_context(|| format!("line {}: '{}' is not a number", lineno + 1, field))
        };
        xs.push(parse(fields[0])?);
        ys.push(parse(fields[1])?);
    }

    Ok((xs, ys))
}
