//! Core analysis engine for STEREO/WAVES radio burst detection
//!
//! Loads paired HFR spectrograms from the two STEREO spacecraft, removes
//! invalid and noisy channels, detects bursts on each spacecraft and pairs
//! the bursts that both spacecraft saw.
//!
//! Key properties:
//! - One synchronous pass per observation window
//! - Detection and matching are pure functions of the cleaned data
//! - Every failure surfaces as an [`AnalysisError`]
//!
//! ```no_run
//! use stereo_core::{analyze, load_pair, AnalysisConfig, JsonContainer};
//!
//! # fn main() -> Result<(), stereo_core::AnalysisError> {
//! let container = JsonContainer::open("window.json")?;
//! let report = analyze(load_pair(&container)?, &AnalysisConfig::default())?;
//!
//! for pair in &report.matches {
//!     println!("A#{} <-> B#{}: {} samples", pair.event_a, pair.event_b, pair.len());
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod clean;
pub mod config;
pub mod constants;
pub mod detector;
pub mod errors;
pub mod events;
pub mod filter;
pub mod matcher;
pub mod pipeline;
pub mod source;
pub mod spectrogram;

// Public API
pub use config::AnalysisConfig;
pub use detector::EventDetector;
pub use errors::{AnalysisError, AnalysisResult};
pub use events::{Event, EventSlice, MatchedEventPair};
pub use filter::ChannelFilter;
pub use matcher::EventMatcher;
pub use pipeline::{analyze, AnalysisReport};
pub use source::{load_pair, DatasetContainer, JsonContainer};
pub use spectrogram::{PowerStats, Spacecraft, Spectrogram, StereoPair};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
