//! Event Detection Thresholds
//!
//! Parameters of the gap-tolerant run-length scan that turns a power matrix
//! into a list of events.

/// Fraction of the global maximum power an index must exceed to be active.
///
/// A time index is active when the strongest channel at that index is above
/// `SIGNIFICANCE_FRACTION × max_power`. One fifth of the peak keeps type III
/// bursts and drops the quiet-sun background.
pub const SIGNIFICANCE_FRACTION: f64 = 0.2;

/// Number of consecutive inactive samples tolerated inside one event.
///
/// A gap of `PROXIMITY_TOLERANCE` samples keeps the event open; one more
/// closes it.
pub const PROXIMITY_TOLERANCE: usize = 8;

/// Minimum index count of an event worth matching.
///
/// Shorter events cannot give enough points to match or find direction.
/// Multiplied by the sample spacing this is the shortest event duration the
/// matcher considers.
pub const WORTHWHILE_LENGTH: usize = 20;
