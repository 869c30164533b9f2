//! Spectrogram Data Model
//!
//! ## Overview
//!
//! One [`Spectrogram`] holds everything a single receiver recorded over the
//! observation window:
//!
//! ```text
//!                 time (s) ─────────────────────────→
//!               ┌──────────────────────────────────────┐
//! frequency     │ power[channel, sample]               │
//! (MHz)         │                                      │
//!   ↓           └──────────────────────────────────────┘
//! ```
//!
//! - `time`: one timestamp per column, monotonically increasing
//! - `frequency`: one frequency per row, constant over time
//! - `power`: `channels × samples` matrix
//!
//! A [`StereoPair`] bundles the two spacecraft of one window. After
//! cleaning both members share the same number of time samples.

use core::fmt;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::errors::{AnalysisError, AnalysisResult};

/// Power samples indexed `[channel, time]`
pub type PowerMatrix = Array2<f64>;

/// Ordered time stamps in seconds
pub type TimeVector = Array1<f64>;

/// Channel centre frequencies in MHz
pub type FrequencyVector = Array1<f64>;

/// Which STEREO spacecraft a dataset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Spacecraft {
    /// STEREO-A (ahead)
    A,
    /// STEREO-B (behind)
    B,
}

impl Spacecraft {
    /// Both spacecraft in canonical order
    pub const ALL: [Spacecraft; 2] = [Spacecraft::A, Spacecraft::B];

    /// Single-letter label used in dataset names and plots
    pub const fn label(&self) -> &'static str {
        match self {
            Spacecraft::A => "A",
            Spacecraft::B => "B",
        }
    }
}

impl fmt::Display for Spacecraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Spectrogram recorded by one spacecraft
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    /// Source spacecraft
    pub spacecraft: Spacecraft,
    /// Time of each column
    pub time: TimeVector,
    /// Frequency of each row
    pub frequency: FrequencyVector,
    /// Power matrix, `channels × samples`
    pub power: PowerMatrix,
}

impl Spectrogram {
    /// Build a spectrogram, checking that the axes agree with the matrix
    pub fn new(
        spacecraft: Spacecraft,
        time: TimeVector,
        frequency: FrequencyVector,
        power: PowerMatrix,
    ) -> AnalysisResult<Self> {
        let spectrogram = Self { spacecraft, time, frequency, power };
        spectrogram.check_shape()?;
        Ok(spectrogram)
    }

    /// Verify axis lengths against the power matrix
    pub fn check_shape(&self) -> AnalysisResult<()> {
        let (channels, samples) = self.power.dim();
        if self.frequency.len() != channels {
            return Err(AnalysisError::ShapeMismatch {
                spacecraft: self.spacecraft,
                axis: "frequency",
                expected: channels,
                actual: self.frequency.len(),
            });
        }
        if self.time.len() != samples {
            return Err(AnalysisError::ShapeMismatch {
                spacecraft: self.spacecraft,
                axis: "time",
                expected: samples,
                actual: self.time.len(),
            });
        }
        Ok(())
    }

    /// Number of frequency channels
    pub fn channels(&self) -> usize {
        self.power.nrows()
    }

    /// Number of time samples
    pub fn samples(&self) -> usize {
        self.power.ncols()
    }

    /// Sample spacing, taken from the first inter-sample gap
    pub fn delta_t(&self) -> Option<f64> {
        if self.time.len() < 2 {
            return None;
        }
        Some(self.time[1] - self.time[0])
    }

    /// True if every timestamp is strictly later than the previous one
    pub fn is_time_monotonic(&self) -> bool {
        self.time
            .iter()
            .zip(self.time.iter().skip(1))
            .all(|(prev, next)| next > prev)
    }

    /// Smallest and largest power values, ignoring NaN
    pub fn power_range(&self) -> Option<(f64, f64)> {
        power_range(self.power.iter().copied())
    }
}

/// The two spectrograms of one observation window
#[derive(Debug, Clone, PartialEq)]
pub struct StereoPair {
    /// STEREO-A
    pub a: Spectrogram,
    /// STEREO-B
    pub b: Spectrogram,
}

impl StereoPair {
    /// Pair two spectrograms
    pub fn new(a: Spectrogram, b: Spectrogram) -> Self {
        Self { a, b }
    }

    /// Access one member by spacecraft
    pub fn get(&self, spacecraft: Spacecraft) -> &Spectrogram {
        match spacecraft {
            Spacecraft::A => &self.a,
            Spacecraft::B => &self.b,
        }
    }

    /// Mutable access to one member by spacecraft
    pub fn get_mut(&mut self, spacecraft: Spacecraft) -> &mut Spectrogram {
        match spacecraft {
            Spacecraft::A => &mut self.a,
            Spacecraft::B => &mut self.b,
        }
    }
}

/// Global power statistics over both spacecraft
///
/// Computed once after cleaning and passed by value to the channel filter
/// and the detector, so later mutation of the matrices never moves the
/// thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerStats {
    /// Lowest power recorded in the window
    pub min: f64,
    /// Highest power recorded in the window
    pub max: f64,
    /// Sample spacing of spacecraft A in seconds
    pub delta_t: f64,
}

impl PowerStats {
    /// Gather statistics from a cleaned pair
    pub fn from_pair(pair: &StereoPair) -> AnalysisResult<Self> {
        let values = pair.a.power.iter().chain(pair.b.power.iter()).copied();
        let (min, max) = power_range(values).ok_or(AnalysisError::EmptyDataset {
            spacecraft: Spacecraft::A,
            axis: "power",
        })?;

        Ok(Self {
            min,
            max,
            delta_t: pair.a.delta_t().unwrap_or(0.0),
        })
    }
}

/// Min and max over an iterator, skipping NaN
fn power_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
