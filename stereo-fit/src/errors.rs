//! Error types for fitting failures
//!
//! - `LengthMismatch` and `InsufficientSamples` are input problems caught
//!   before the first iteration.
//! - `SingularMatrix` means the normal equations lost rank at some
//!   iteration, typically because the samples cannot constrain all three
//!   parameters.
//!
//! A fit that runs all its iterations but lands far from the data is not an
//! error; inspect [`crate::GaussianFit::residual_sum_squares`].

use thiserror::Error;

/// Result type for fitting operations
pub type FitResult<T> = Result<T, FitError>;

/// Fitting errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FitError {
    /// Normal equations are singular
    #[error("normal equations are singular at iteration {iteration}")]
    SingularMatrix {
        /// Zero-based iteration that failed
        iteration: usize,
    },

    /// `xs` and `ys` differ in length
    #[error("sample vectors differ in length: {xs} x values, {ys} y values")]
    LengthMismatch {
        /// Number of x values
        xs: usize,
        /// Number of y values
        ys: usize,
    },

    /// Fewer samples than free parameters
    #[error("need at least {required} samples, got {actual}")]
    InsufficientSamples {
        /// Minimum sample count
        required: usize,
        /// Samples supplied
        actual: usize,
    },
}
