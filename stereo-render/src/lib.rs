//! Static figures for matched STEREO event pairs
//!
//! ## Overview
//!
//! The analysis pipeline ends with a list of matched pairs. This crate turns
//! each pair into a standalone SVG file so the bursts can be inspected by
//! eye:
//!
//! ```text
//! AnalysisReport ──→ Renderer ──→ plots/event_000.svg
//!                             ──→ plots/event_001.svg
//!                             ──→ ...
//! ```
//!
//! ## Colour Scale
//!
//! Power is quantised into 50 equal-width levels spanning the global
//! `[min, max]` of the window, so colours are comparable across panels and
//! across figures of one run.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use stereo_core::{analyze, load_pair, AnalysisConfig, JsonContainer};
//! use stereo_render::render_all;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let container = JsonContainer::open("stereo_2009_03_21.json")?;
//! let report = analyze(load_pair(&container)?, &AnalysisConfig::default())?;
//! let written = render_all(&report, "stereo_2009_03_21", "plots")?;
//! println!("{} figures", written.len());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod scale;
pub mod svg;

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use stereo_core::{spectrogram::FrequencyVector, AnalysisReport, MatchedEventPair, PowerStats, Spacecraft};
use thiserror::Error;

// Re-export common types
pub use scale::{cell_edges, ColorScale};
pub use svg::{figure_name, ContourRenderer};

/// Result type for rendering
pub type RenderResult<T> = Result<T, RenderError>;

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Output directory or file could not be written
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Plotting backend failed
    #[error("plotting backend error: {0}")]
    Backend(String),

    /// Nothing to draw for one side of a pair
    #[error("event {index}: spacecraft {spacecraft} slice is empty")]
    EmptySlice {
        /// Match index
        index: usize,
        /// Empty side
        spacecraft: Spacecraft,
    },
}

/// Trait for figure writers
pub trait Renderer {
    /// Error type
    type Error;

    /// Write the figure for match `index`, returning its path
    fn render(
        &mut self,
        index: usize,
        pair: &MatchedEventPair,
        freq_a: &FrequencyVector,
        freq_b: &FrequencyVector,
        stats: PowerStats,
        source_name: &str,
    ) -> Result<PathBuf, Self::Error>;

    /// Counters since creation
    fn stats(&self) -> RenderStats;
}

/// Rendering statistics common to all renderers
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderStats {
    /// Figures written successfully
    pub figures_written: u64,
    /// Figures that failed
    pub figures_failed: u64,
    /// Power cells drawn across all figures
    pub cells_drawn: u64,
    /// Last error message
    pub last_error: Option<String>,
}

/// Render every match of a report into `out_dir`
///
/// Creates the directory if needed. Stops at the first failure.
pub fn render_all(
    report: &AnalysisReport,
    source_name: &str,
    out_dir: impl AsRef<Path>,
) -> RenderResult<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir).map_err(|source| RenderError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut renderer = ContourRenderer::new(out_dir);
    let mut written = Vec::with_capacity(report.matches.len());
    for (index, pair) in report.matches.iter().enumerate() {
        let path = renderer.render(
            index,
            pair,
            &report.pair.a.frequency,
            &report.pair.b.frequency,
            report.stats,
            source_name,
        )?;
        written.push(path);
    }

    info!(
        "rendered {} figures into {} ({} cells)",
        written.len(),
        out_dir.display(),
        renderer.stats().cells_drawn
    );
    Ok(written)
}
