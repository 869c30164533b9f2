//! Analysis configuration
//!
//! All thresholds and tolerances of the pipeline travel in one
//! [`AnalysisConfig`] value that each component receives explicitly.
//! Defaults come from [`crate::constants`]; a JSON file may override any
//! subset of fields.
//!
//! ```rust
//! use stereo_core::AnalysisConfig;
//!
//! let config = AnalysisConfig::default()
//!     .with_proximity_tolerance(4)
//!     .with_worthwhile_length(10);
//! assert!(config.validate().is_ok());
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        DEFECTIVE_CHANNELS, LENGTH_TOLERANCE_S, NOISE_MEDIAN_FRACTION, PROXIMITY_TOLERANCE,
        SIGNIFICANCE_FRACTION, STEREO_DISTANCE_S, WORTHWHILE_LENGTH,
    },
    errors::{AnalysisError, AnalysisResult},
    spectrogram::Spacecraft,
};

/// Thresholds and tolerances for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Fraction of global max power an index must exceed to be active
    pub significance_fraction: f64,
    /// Inactive samples tolerated inside one event
    pub proximity_tolerance: usize,
    /// Maximum midpoint separation of matched events (seconds)
    pub stereo_distance_s: f64,
    /// Maximum duration difference of matched events (seconds)
    pub length_tolerance_s: f64,
    /// Minimum index count of an event considered for matching
    pub worthwhile_length: usize,
    /// Median fraction of global max above which a channel is blanked
    pub noise_median_fraction: f64,
    /// Lowest channels blanked on the defective spacecraft
    pub defective_channels: usize,
    /// Spacecraft with the defective low channels
    pub defective_spacecraft: Spacecraft,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            significance_fraction: SIGNIFICANCE_FRACTION,
            proximity_tolerance: PROXIMITY_TOLERANCE,
            stereo_distance_s: STEREO_DISTANCE_S,
            length_tolerance_s: LENGTH_TOLERANCE_S,
            worthwhile_length: WORTHWHILE_LENGTH,
            noise_median_fraction: NOISE_MEDIAN_FRACTION,
            defective_channels: DEFECTIVE_CHANNELS,
            defective_spacecraft: Spacecraft::A,
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a JSON file; missing fields keep defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| AnalysisError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that make the analysis meaningless
    pub fn validate(&self) -> AnalysisResult<()> {
        check_fraction("significance_fraction", self.significance_fraction)?;
        check_fraction("noise_median_fraction", self.noise_median_fraction)?;
        check_non_negative("stereo_distance_s", self.stereo_distance_s)?;
        check_non_negative("length_tolerance_s", self.length_tolerance_s)?;
        if self.worthwhile_length < 2 {
            // Single-index events have no span to slice
            return Err(AnalysisError::Config {
                field: "worthwhile_length",
                value: self.worthwhile_length.to_string(),
                reason: "must be at least 2",
            });
        }
        Ok(())
    }

    /// Set the significance fraction
    pub fn with_significance_fraction(mut self, fraction: f64) -> Self {
        self.significance_fraction = fraction;
        self
    }

    /// Set the gap tolerance in samples
    pub fn with_proximity_tolerance(mut self, samples: usize) -> Self {
        self.proximity_tolerance = samples;
        self
    }

    /// Set the cross-spacecraft distance tolerance in seconds
    pub fn with_stereo_distance(mut self, seconds: f64) -> Self {
        self.stereo_distance_s = seconds;
        self
    }

    /// Set the duration tolerance in seconds
    pub fn with_length_tolerance(mut self, seconds: f64) -> Self {
        self.length_tolerance_s = seconds;
        self
    }

    /// Set the minimum event length in samples
    pub fn with_worthwhile_length(mut self, samples: usize) -> Self {
        self.worthwhile_length = samples;
        self
    }

    /// Set the noisy-channel median fraction
    pub fn with_noise_median_fraction(mut self, fraction: f64) -> Self {
        self.noise_median_fraction = fraction;
        self
    }

    /// Set which spacecraft has defective low channels, and how many
    pub fn with_defective_channels(mut self, spacecraft: Spacecraft, channels: usize) -> Self {
        self.defective_spacecraft = spacecraft;
        self.defective_channels = channels;
        self
    }
}

fn check_fraction(field: &'static str, value: f64) -> AnalysisResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(AnalysisError::Config {
            field,
            value: value.to_string(),
            reason: "must lie in [0, 1]",
        })
    }
}

fn check_non_negative(field: &'static str, value: f64) -> AnalysisResult<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::Config {
            field,
            value: value.to_string(),
            reason: "must be non-negative",
        })
    }
}
