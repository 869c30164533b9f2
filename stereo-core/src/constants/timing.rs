//! Cross-Spacecraft Timing Constraints
//!
//! The two STEREO spacecraft see the same burst at different times because
//! of their separation. These constants bound how far apart matched events
//! may be.

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Light-travel time between the spacecraft, upper bound (seconds).
///
/// The separation never exceeds two Earth-orbit radii, about 16
/// light-minutes.
pub const STEREO_DISTANCE_S: f64 = 16.0 * SECONDS_PER_MINUTE;

/// Tolerance on the duration difference of two matched events (seconds).
///
/// Roughly two sample spacings of the HFR receiver (38.8 s each).
pub const LENGTH_TOLERANCE_S: f64 = 77.6;
