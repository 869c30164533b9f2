//! Channel Quality Limits
//!
//! Rules for blanking frequency channels before detection.

/// Median power fraction above which a channel counts as noisy.
///
/// A channel whose median exceeds `NOISE_MEDIAN_FRACTION × max_power` is
/// dominated by systematic noise. Chosen by trial and error.
pub const NOISE_MEDIAN_FRACTION: f64 = 0.03;

/// Number of lowest channels blanked unconditionally on the defective
/// spacecraft.
pub const DEFECTIVE_CHANNELS: usize = 5;

/// Number of contour levels used when rendering matched events.
pub const CONTOUR_LEVELS: usize = 50;
