//! Gaussian peak fitting for event profiles
//!
//! ## Overview
//!
//! Fits `y = A·exp(−(x−μ)²/(2σ²))` to sampled data by Gauss-Newton
//! iteration. Each iteration linearises the model around the current
//! parameters and solves the 3×3 normal equations
//!
//! ```text
//! (JᵀJ) δ = Jᵀr        r_i = y_i − model(x_i)
//! params ← params + δ
//! ```
//!
//! ## Behaviour
//!
//! - The iteration count is fixed; there is no convergence test.
//! - Gauss-Newton only converges from a reasonable starting point. Callers
//!   without a prior should start from [`GaussianParams::estimate`].
//! - A singular system aborts the fit with [`FitError::SingularMatrix`].
//!
//! ```rust
//! use stereo_fit::{GaussianFitter, GaussianParams};
//!
//! # fn main() -> Result<(), stereo_fit::FitError> {
//! let truth = GaussianParams::new(5.0, 2.0, 1.5);
//! let xs: Vec<f64> = (0..=100).map(|i| -5.0 + 0.1 * i as f64).collect();
//! let ys: Vec<f64> = xs.iter().map(|&x| truth.evaluate(x)).collect();
//!
//! let initial = GaussianParams::estimate(&xs, &ys)?;
//! let fit = GaussianFitter::new().with_initial(initial).fit(&xs, &ys)?;
//! assert!((fit.params.sigma - 1.5).abs() < 0.015);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod errors;
pub mod gaussian;
pub mod matrix;

// Public API
pub use errors::{FitError, FitResult};
pub use gaussian::{fit, fit_iteration, residuals, GaussianFit, GaussianFitter, GaussianParams};

/// Number of free model parameters
pub const PARAMETERS: usize = 3;

/// Default Gauss-Newton iteration count
pub const DEFAULT_ITERATIONS: usize = 10;
