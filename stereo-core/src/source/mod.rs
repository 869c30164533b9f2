//! Dataset sources for spectrogram containers
//!
//! The raw observations arrive in a hierarchical container of named
//! datasets. This module defines the access trait and the dataset layout;
//! concrete encodings live in submodules.
//!
//! ## Module Organization
//!
//! - Core trait and dataset names (this file)
//! - `json` - JSON documents with nested groups
//!
//! ## Dataset Layout
//!
//! ```text
//! spectrogram/
//! ├── Time_A                 [samples]
//! ├── Time_B                 [samples]
//! ├── Frequency_A            [channels × k]   (column 0 used)
//! ├── Frequency_B            [channels × k]
//! ├── HFR_Ch1_S1Power_A      [channels × samples]
//! └── HFR_Ch1_S1Power_B      [channels × samples]
//! ```

pub mod json;

pub use json::JsonContainer;

use log::debug;
use ndarray::{Array1, Array2};

use crate::{
    errors::{AnalysisError, AnalysisResult},
    spectrogram::{Spacecraft, Spectrogram, StereoPair},
};

/// Dataset paths of one spacecraft inside the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetNames {
    /// Time vector
    pub time: &'static str,
    /// Frequency table (column 0 holds channel frequencies)
    pub frequency: &'static str,
    /// Power matrix
    pub power: &'static str,
}

impl DatasetNames {
    /// Standard dataset paths for a spacecraft
    pub const fn for_spacecraft(spacecraft: Spacecraft) -> Self {
        match spacecraft {
            Spacecraft::A => Self {
                time: "spectrogram/Time_A",
                frequency: "spectrogram/Frequency_A",
                power: "spectrogram/HFR_Ch1_S1Power_A",
            },
            Spacecraft::B => Self {
                time: "spectrogram/Time_B",
                frequency: "spectrogram/Frequency_B",
                power: "spectrogram/HFR_Ch1_S1Power_B",
            },
        }
    }
}

/// Read access to named numeric datasets
///
/// Invalid samples are returned as NaN; cleaning them up is the loader's
/// job, not the container's.
pub trait DatasetContainer {
    /// Read a one-dimensional dataset
    fn read_vector(&self, name: &str) -> AnalysisResult<Array1<f64>>;

    /// Read a two-dimensional dataset, row-major
    fn read_matrix(&self, name: &str) -> AnalysisResult<Array2<f64>>;

    /// Read the first column of a table, or the dataset itself if it is flat
    fn read_first_column(&self, name: &str) -> AnalysisResult<Array1<f64>> {
        match self.read_matrix(name) {
            Ok(matrix) if matrix.ncols() > 0 => Ok(matrix.column(0).to_owned()),
            Ok(_) => Err(AnalysisError::InvalidDataset {
                name: name.to_string(),
                reason: "table has no columns".into(),
            }),
            Err(AnalysisError::InvalidDataset { .. }) => self.read_vector(name),
            Err(e) => Err(e),
        }
    }
}

/// Read the raw spectrogram of one spacecraft
pub fn load_spectrogram<C: DatasetContainer + ?Sized>(
    container: &C,
    spacecraft: Spacecraft,
) -> AnalysisResult<Spectrogram> {
    let names = DatasetNames::for_spacecraft(spacecraft);
    let time = container.read_vector(names.time)?;
    let frequency = container.read_first_column(names.frequency)?;
    let power = container.read_matrix(names.power)?;

    debug!(
        "spacecraft {}: {} channels x {} samples loaded",
        spacecraft,
        power.nrows(),
        power.ncols()
    );

    Spectrogram::new(spacecraft, time, frequency, power)
}

/// Read both spacecraft from a container
pub fn load_pair<C: DatasetContainer + ?Sized>(container: &C) -> AnalysisResult<StereoPair> {
    let a = load_spectrogram(container, Spacecraft::A)?;
    let b = load_spectrogram(container, Spacecraft::B)?;
    Ok(StereoPair::new(a, b))
}
