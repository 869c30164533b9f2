//! End-to-end analysis of one observation window
//!
//! ## Stages
//!
//! ```text
//! StereoPair ─→ clean ─→ PowerStats ─→ filter (A, B) ─→ detect (A, B) ─→ match
//!                                                                          │
//!                                               AnalysisReport ←───────────┘
//! ```
//!
//! Stages run synchronously on fully materialised matrices. The channel
//! filter mutates the power matrices in place, so the report carries the
//! filtered data, not the raw input.
//!
//! ```rust,no_run
//! use stereo_core::{analyze, source::{load_pair, JsonContainer}, AnalysisConfig};
//!
//! # fn main() -> Result<(), stereo_core::AnalysisError> {
//! let container = JsonContainer::open("stereo_2009_03_21.json")?;
//! let report = analyze(load_pair(&container)?, &AnalysisConfig::default())?;
//! println!("{} matched events", report.matches.len());
//! # Ok(())
//! # }
//! ```

use log::info;

use crate::{
    clean::clean_pair,
    config::AnalysisConfig,
    detector::EventDetector,
    errors::AnalysisResult,
    events::{Event, MatchedEventPair},
    filter::ChannelFilter,
    matcher::EventMatcher,
    spectrogram::{PowerStats, Spacecraft, StereoPair},
};

/// Everything one analysis run produced
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Cleaned and filtered spectrograms
    pub pair: StereoPair,
    /// Global power statistics, taken before filtering
    pub stats: PowerStats,
    /// Channels blanked on A
    pub blanked_a: Vec<usize>,
    /// Channels blanked on B
    pub blanked_b: Vec<usize>,
    /// Events detected on A
    pub events_a: Vec<Event>,
    /// Events detected on B
    pub events_b: Vec<Event>,
    /// Matched pairs, in A detection order
    pub matches: Vec<MatchedEventPair>,
}

impl AnalysisReport {
    /// Events detected on one spacecraft
    pub fn events(&self, spacecraft: Spacecraft) -> &[Event] {
        match spacecraft {
            Spacecraft::A => &self.events_a,
            Spacecraft::B => &self.events_b,
        }
    }
}

/// Run cleaning, filtering, detection and matching on a raw pair
pub fn analyze(mut pair: StereoPair, config: &AnalysisConfig) -> AnalysisResult<AnalysisReport> {
    config.validate()?;

    clean_pair(&mut pair)?;
    let stats = PowerStats::from_pair(&pair)?;
    info!(
        "cleaned window: {} x {} (A), {} x {} (B), power [{:.3e}, {:.3e}], dt {:.1} s",
        pair.a.channels(),
        pair.a.samples(),
        pair.b.channels(),
        pair.b.samples(),
        stats.min,
        stats.max,
        stats.delta_t
    );

    let filter = ChannelFilter::from_config(config);
    let blanked_a = filter.apply(Spacecraft::A, &mut pair.a.power, stats);
    let blanked_b = filter.apply(Spacecraft::B, &mut pair.b.power, stats);

    let detector = EventDetector::from_config(config, stats);
    let events_a = detector.detect(&pair.a.power);
    let events_b = detector.detect(&pair.b.power);
    info!(
        "detected {} events on A, {} on B",
        events_a.len(),
        events_b.len()
    );

    let matcher = EventMatcher::from_config(config);
    let matches = matcher.match_events(&events_a, &pair.a, &events_b, &pair.b);
    info!("{} event pairs matched across spacecraft", matches.len());

    Ok(AnalysisReport {
        pair,
        stats,
        blanked_a,
        blanked_b,
        events_a,
        events_b,
        matches,
    })
}
