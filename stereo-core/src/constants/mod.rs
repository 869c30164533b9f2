//! Constants for Stereo Core
//!
//! Every numeric default of the analysis lives here with its rationale. The
//! values seed [`AnalysisConfig`](crate::config::AnalysisConfig); components
//! read the configuration, never these constants directly.
//!
//! ## Organization
//!
//! - **Detection**: significance threshold, gap tolerance, minimum length
//! - **Timing**: light-travel and duration tolerances between spacecraft
//! - **Channels**: noisy and defective channel rules

/// Event detection thresholds.
pub mod detection;

/// Cross-spacecraft timing constraints.
pub mod timing;

/// Channel blanking rules and rendering levels.
pub mod channels;

pub use detection::{SIGNIFICANCE_FRACTION, PROXIMITY_TOLERANCE, WORTHWHILE_LENGTH};
pub use timing::{STEREO_DISTANCE_S, LENGTH_TOLERANCE_S};
pub use channels::{NOISE_MEDIAN_FRACTION, DEFECTIVE_CHANNELS, CONTOUR_LEVELS};
