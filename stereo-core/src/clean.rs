//! Loader cleanup for raw STEREO spectrograms
//!
//! Raw HFR files carry two kinds of invalid data:
//!
//! 1. **Uncalibrated channels**: a contiguous block of rows whose frequency
//!    is NaN. These rows are dropped from the frequency vector and the power
//!    matrix.
//! 2. **Interference gaps**: on even-numbered days the ground-station link
//!    leaves a contiguous span of NaN power columns. The span is dropped from
//!    the time vector and power matrix of *both* spacecraft so their time
//!    axes stay aligned.
//!
//! Afterwards both spacecraft must have the same number of time samples;
//! anything else is a fatal integrity error.
//!
//! ```text
//! before:  freq [f0 f1 NaN NaN f4]      power cols [.. .. NaN NaN .. ..]
//! after:   freq [f0 f1 f4]              power cols [.. .. .. ..]
//! ```

use core::ops::RangeInclusive;

use log::{debug, info, warn};
use ndarray::{Array1, Array2, Axis};

use crate::{
    errors::{AnalysisError, AnalysisResult},
    spectrogram::{Spacecraft, Spectrogram, StereoPair},
};

/// Inclusive index span from the first `true` to the last one
fn invalid_span<I>(values: I) -> Option<RangeInclusive<usize>>
where
    I: IntoIterator<Item = bool>,
{
    let mut first = None;
    let mut last = None;
    for (i, invalid) in values.into_iter().enumerate() {
        if invalid {
            first.get_or_insert(i);
            last = Some(i);
        }
    }
    Some(first?..=last?)
}

/// Indices of `0..len` that fall outside `span`
fn kept_indices(len: usize, span: &RangeInclusive<usize>) -> Vec<usize> {
    (0..len).filter(|i| !span.contains(i)).collect()
}

fn drop_rows(matrix: &Array2<f64>, keep: &[usize]) -> Array2<f64> {
    matrix.select(Axis(0), keep)
}

fn drop_columns(matrix: &Array2<f64>, keep: &[usize]) -> Array2<f64> {
    matrix.select(Axis(1), keep)
}

fn drop_entries(vector: &Array1<f64>, keep: &[usize]) -> Array1<f64> {
    vector.select(Axis(0), keep)
}

/// Remove the block of channels whose frequency is NaN
///
/// Every row from the first NaN frequency to the last one is dropped, even
/// a valid row caught in between. Returns the dropped span.
pub fn strip_invalid_channels(spectrogram: &mut Spectrogram) -> Option<RangeInclusive<usize>> {
    let span = invalid_span(spectrogram.frequency.iter().map(|f| f.is_nan()))?;
    let keep = kept_indices(spectrogram.channels(), &span);

    spectrogram.frequency = drop_entries(&spectrogram.frequency, &keep);
    spectrogram.power = drop_rows(&spectrogram.power, &keep);

    debug!(
        "spacecraft {}: dropped channels {}..={} with no calibration",
        spectrogram.spacecraft,
        span.start(),
        span.end()
    );
    Some(span)
}

/// Column span holding NaN power in either spacecraft
pub fn invalid_column_span(pair: &StereoPair) -> Option<RangeInclusive<usize>> {
    let span_of = |s: &Spectrogram| {
        invalid_span(
            s.power
                .axis_iter(Axis(1))
                .map(|column| column.iter().any(|v| v.is_nan())),
        )
    };

    match (span_of(&pair.a), span_of(&pair.b)) {
        (Some(a), Some(b)) => Some(*a.start().min(b.start())..=*a.end().max(b.end())),
        (a, b) => a.or(b),
    }
}

/// Remove a column span from a spectrogram; indices past its end are ignored
fn strip_columns(spectrogram: &mut Spectrogram, span: &RangeInclusive<usize>) {
    let keep = kept_indices(spectrogram.samples(), span);
    spectrogram.time = drop_entries(&spectrogram.time, &keep);
    spectrogram.power = drop_columns(&spectrogram.power, &keep);
}

/// Clean a freshly loaded pair in place
///
/// Fails with [`AnalysisError::LengthMismatch`] if the spacecraft disagree
/// on time-axis length afterwards, and with [`AnalysisError::EmptyDataset`]
/// if cleaning removed every channel or sample.
pub fn clean_pair(pair: &mut StereoPair) -> AnalysisResult<()> {
    for spacecraft in Spacecraft::ALL {
        let spectrogram = pair.get_mut(spacecraft);
        spectrogram.check_shape()?;
        strip_invalid_channels(spectrogram);
    }

    if let Some(span) = invalid_column_span(pair) {
        info!(
            "dropping interference columns {}..={} from both spacecraft",
            span.start(),
            span.end()
        );
        strip_columns(&mut pair.a, &span);
        strip_columns(&mut pair.b, &span);
    }

    for spacecraft in Spacecraft::ALL {
        let spectrogram = pair.get(spacecraft);
        if spectrogram.channels() == 0 {
            return Err(AnalysisError::EmptyDataset {
                spacecraft: spectrogram.spacecraft,
                axis: "frequency",
            });
        }
        if spectrogram.samples() == 0 {
            return Err(AnalysisError::EmptyDataset {
                spacecraft: spectrogram.spacecraft,
                axis: "time",
            });
        }
        if !spectrogram.is_time_monotonic() {
            warn!(
                "spacecraft {}: time vector is not monotonically increasing",
                spectrogram.spacecraft
            );
        }
    }

    if pair.a.samples() != pair.b.samples() {
        return Err(AnalysisError::LengthMismatch {
            a: pair.a.samples(),
            b: pair.b.samples(),
        });
    }

    Ok(())
}
