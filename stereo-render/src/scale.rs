//! Quantised colour scale and cell geometry
//!
//! Power is binned into a fixed number of equal-width levels between the
//! global minimum and maximum of the window, so both panels of a figure
//! (and every figure of a run) share one colour mapping.

use plotters::prelude::*;
use plotters::style::colors::colormaps::ViridisRGB;
use stereo_core::{constants::CONTOUR_LEVELS, PowerStats};

/// Equal-width colour levels over a fixed power range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    /// Power mapped to the lowest level
    pub min: f64,
    /// Power mapped to the highest level
    pub max: f64,
    /// Number of levels
    pub levels: usize,
}

impl ColorScale {
    /// Scale spanning `[min, max]`; `levels` is raised to at least 1
    pub fn new(min: f64, max: f64, levels: usize) -> Self {
        Self { min, max, levels: levels.max(1) }
    }

    /// Scale over the global power range of a window
    pub fn from_stats(stats: PowerStats) -> Self {
        Self::new(stats.min, stats.max, CONTOUR_LEVELS)
    }

    /// Level of a power value, `None` for NaN
    ///
    /// Values outside the range clamp to the first or last level.
    pub fn level(&self, power: f64) -> Option<usize> {
        if power.is_nan() {
            return None;
        }
        let span = self.max - self.min;
        if !(span > 0.0) {
            return Some(0);
        }
        let norm = ((power - self.min) / span).clamp(0.0, 1.0);
        Some(((norm * self.levels as f64) as usize).min(self.levels - 1))
    }

    /// Lower power bound of a level
    pub fn level_floor(&self, level: usize) -> f64 {
        self.min + (self.max - self.min) * level as f64 / self.levels as f64
    }

    /// Colour of a level
    pub fn color(&self, level: usize) -> RGBColor {
        let frac = if self.levels > 1 {
            level.min(self.levels - 1) as f64 / (self.levels - 1) as f64
        } else {
            0.0f64
        };
        ViridisRGB.get_color(frac)
    }
}

/// Cell boundaries around sample positions
///
/// Inner edges sit halfway between neighbours; the outer edges extend by
/// half the neighbouring step. A single position gets a unit-wide cell.
pub fn cell_edges(centres: &[f64]) -> Vec<f64> {
    match centres {
        [] => Vec::new(),
        [only] => vec![only - 0.5, only + 0.5],
        _ => {
            let n = centres.len();
            let mut edges = Vec::with_capacity(n + 1);
            edges.push(centres[0] - 0.5 * (centres[1] - centres[0]));
            edges.extend(centres.windows(2).map(|w| 0.5 * (w[0] + w[1])));
            edges.push(centres[n - 1] + 0.5 * (centres[n - 1] - centres[n - 2]));
            edges
        }
    }
}

/// Smallest and largest finite value
pub(crate) fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
