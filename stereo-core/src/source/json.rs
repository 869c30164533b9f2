//! JSON-encoded spectrogram containers
//!
//! Groups are JSON objects, datasets are (nested) arrays of numbers.
//! Invalid samples are written as `null` (or the string `"NaN"`) since JSON
//! has no NaN literal.
//!
//! ```json
//! {
//!   "spectrogram": {
//!     "Time_A": [0.0, 38.0, 76.0],
//!     "Frequency_A": [[0.125, 0.0], [null, 0.0]],
//!     "HFR_Ch1_S1Power_A": [[1e-17, 2e-17, 3e-17], [null, null, null]]
//!   }
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2};
use serde_json::Value;

use super::DatasetContainer;
use crate::errors::{AnalysisError, AnalysisResult};

/// Container backed by a parsed JSON document
#[derive(Debug, Clone)]
pub struct JsonContainer {
    root: Value,
    path: Option<PathBuf>,
}

impl JsonContainer {
    /// Open and parse a container file
    pub fn open(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let root = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            AnalysisError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Ok(Self {
            root,
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap an already parsed document
    pub fn from_value(root: Value) -> Self {
        Self { root, path: None }
    }

    /// File the container was read from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Resolve a `/`-separated dataset path
    fn lookup(&self, name: &str) -> AnalysisResult<&Value> {
        name.split('/')
            .filter(|part| !part.is_empty())
            .try_fold(&self.root, |node, part| node.get(part))
            .ok_or_else(|| AnalysisError::MissingDataset(name.to_string()))
    }
}

impl DatasetContainer for JsonContainer {
    fn read_vector(&self, name: &str) -> AnalysisResult<Array1<f64>> {
        let items = as_array(name, self.lookup(name)?)?;
        let values = items
            .iter()
            .map(|item| as_sample(name, item))
            .collect::<AnalysisResult<Vec<f64>>>()?;
        Ok(Array1::from(values))
    }

    fn read_matrix(&self, name: &str) -> AnalysisResult<Array2<f64>> {
        let rows = as_array(name, self.lookup(name)?)?;
        let ncols = match rows.first() {
            Some(first) => as_array(name, first)?.len(),
            None => 0,
        };

        let mut flat = Vec::with_capacity(rows.len() * ncols);
        for (i, row) in rows.iter().enumerate() {
            let row = as_array(name, row)?;
            if row.len() != ncols {
                return Err(AnalysisError::InvalidDataset {
                    name: name.to_string(),
                    reason: format!("row {} has {} columns, expected {}", i, row.len(), ncols),
                });
            }
            for item in row {
                flat.push(as_sample(name, item)?);
            }
        }

        Array2::from_shape_vec((rows.len(), ncols), flat).map_err(|e| {
            AnalysisError::InvalidDataset {
                name: name.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

fn as_array<'a>(name: &str, value: &'a Value) -> AnalysisResult<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| AnalysisError::InvalidDataset {
        name: name.to_string(),
        reason: "expected an array".into(),
    })
}

fn as_sample(name: &str, value: &Value) -> AnalysisResult<f64> {
    match value {
        Value::Null => Ok(f64::NAN),
        Value::Number(n) => n.as_f64().ok_or_else(|| AnalysisError::InvalidDataset {
            name: name.to_string(),
            reason: format!("{} is not representable as f64", n),
        }),
        Value::String(s) if s.eq_ignore_ascii_case("nan") => Ok(f64::NAN),
        other => Err(AnalysisError::InvalidDataset {
            name: name.to_string(),
            reason: format!("expected a number, found {}", other),
        }),
    }
}
