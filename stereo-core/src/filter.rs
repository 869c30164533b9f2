//! Noisy channel suppression
//!
//! Some HFR channels carry systematic noise for the whole window. Left in
//! place they would dominate the cross-channel maximum used by the
//! detector. The filter blanks them by overwriting the row with the global
//! minimum power:
//!
//! - any row whose median exceeds `noise_median_fraction × max_power`
//! - the lowest `defective_channels` rows of the defective spacecraft
//!
//! The transform is destructive and idempotent for a fixed [`PowerStats`]:
//! a blanked row has median `min_power`, which never trips the median test
//! again, and untouched rows are left exactly as they were.

use log::debug;
use ndarray::ArrayView1;

use crate::{
    config::AnalysisConfig,
    spectrogram::{PowerMatrix, PowerStats, Spacecraft},
};

/// Median of a row, NaN sorted last
pub fn median(row: ArrayView1<'_, f64>) -> f64 {
    let mut values: Vec<f64> = row.iter().copied().collect();
    if values.is_empty() {
        return f64::NAN;
    }
    values.sort_by(|a, b| a.total_cmp(b));

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        0.5 * (values[mid - 1] + values[mid])
    } else {
        values[mid]
    }
}

/// Channel filter settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelFilter {
    /// Median fraction of global max above which a row is blanked
    pub noise_median_fraction: f64,
    /// Lowest rows blanked on the defective spacecraft
    pub defective_channels: usize,
    /// Spacecraft with the defective rows
    pub defective_spacecraft: Spacecraft,
}

impl Default for ChannelFilter {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl ChannelFilter {
    /// Take the filter settings out of a run configuration
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            noise_median_fraction: config.noise_median_fraction,
            defective_channels: config.defective_channels,
            defective_spacecraft: config.defective_spacecraft,
        }
    }

    /// Blank noisy and defective rows in place
    ///
    /// Returns the indices of the rows that were blanked, in ascending order.
    pub fn apply(
        &self,
        spacecraft: Spacecraft,
        power: &mut PowerMatrix,
        stats: PowerStats,
    ) -> Vec<usize> {
        let noise_limit = self.noise_median_fraction * stats.max;
        let mut blanked = Vec::new();

        for (i, mut row) in power.rows_mut().into_iter().enumerate() {
            let defective = spacecraft == self.defective_spacecraft && i < self.defective_channels;
            if defective || median(row.view()) > noise_limit {
                row.fill(stats.min);
                blanked.push(i);
            }
        }

        debug!(
            "spacecraft {}: blanked {} of {} channels {:?}",
            spacecraft,
            blanked.len(),
            power.nrows(),
            blanked
        );
        blanked
    }
}
