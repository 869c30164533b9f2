//! Error Types for Spectrogram Analysis Failures
//!
//! ## Error Categories
//!
//! Every variant here is fatal for the invocation that raised it. Nothing in
//! the analysis path retries, and no partial results survive an error.
//!
//! ### Input Problems
//! - `Io`: the container file could not be opened or read
//! - `Parse`: the container is not well-formed
//! - `MissingDataset`: a required dataset path does not exist
//! - `InvalidDataset`: a dataset exists but has the wrong shape or content
//!
//! ### Data Integrity
//! - `ShapeMismatch`: axis vectors disagree with the power matrix
//! - `LengthMismatch`: the two spacecraft disagree on time-axis length after
//!   cleaning
//! - `EmptyDataset`: cleaning left nothing to analyse
//!
//! ### Configuration
//! - `Config`: a configuration value is outside its valid range
//!
//! Silent data-quality issues (an event that never matches, for example) are
//! not errors and never show up here.
//!
//! ```rust
//! use stereo_core::AnalysisError;
//!
//! fn exit_code(err: &AnalysisError) -> i32 {
//!     match err {
//!         AnalysisError::Config { .. } => 2,
//!         _ => 1,
//!     }
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::spectrogram::Spacecraft;

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Analysis errors
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Container file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Container or configuration file is not valid JSON
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying parser error
        #[source]
        source: serde_json::Error,
    },

    /// Dataset path not present in the container
    #[error("dataset '{0}' not found in container")]
    MissingDataset(String),

    /// Dataset present but unusable
    #[error("dataset '{name}' is invalid: {reason}")]
    InvalidDataset {
        /// Dataset path
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// Axis vector length disagrees with the power matrix
    #[error("spacecraft {spacecraft}: {axis} axis has {expected} entries in the power matrix but {actual} in its vector")]
    ShapeMismatch {
        /// Offending spacecraft
        spacecraft: Spacecraft,
        /// Which axis ("time" or "frequency")
        axis: &'static str,
        /// Length implied by the power matrix
        expected: usize,
        /// Length of the axis vector
        actual: usize,
    },

    /// The two spacecraft disagree on the number of time samples
    #[error("power arrays are different lengths: A has {a} samples, B has {b}")]
    LengthMismatch {
        /// Time samples for spacecraft A
        a: usize,
        /// Time samples for spacecraft B
        b: usize,
    },

    /// Nothing left to analyse
    #[error("spacecraft {spacecraft}: no {axis} samples left after cleaning")]
    EmptyDataset {
        /// Offending spacecraft
        spacecraft: Spacecraft,
        /// Which axis ran empty
        axis: &'static str,
    },

    /// Configuration value out of range
    #[error("invalid configuration: {field} = {value} ({reason})")]
    Config {
        /// Field name
        field: &'static str,
        /// Offending value, formatted
        value: String,
        /// Valid range description
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_mismatch_message() {
        let err = AnalysisError::LengthMismatch { a: 10, b: 12 };
        assert_eq!(
            err.to_string(),
            "power arrays are different lengths: A has 10 samples, B has 12"
        );
    }

    #[test]
    fn missing_dataset_names_path() {
        let err = AnalysisError::MissingDataset("spectrogram/Time_A".into());
        assert!(err.to_string().contains("spectrogram/Time_A"));
    }
}
