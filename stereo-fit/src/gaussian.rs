//! Gaussian model and Gauss-Newton fitter
//!
//! ## Model
//!
//! ```text
//! g(x) = A·e,   e = exp(−(x−μ)²/(2σ²))
//!
//! ∂g/∂A = e
//! ∂g/∂μ = A(x−μ)/σ² · e
//! ∂g/∂σ = A(x−μ)²/σ³ · e
//! ```
//!
//! [`fit_iteration`] is pure: it maps one parameter set to the next and
//! never mutates its input. [`GaussianFitter`] folds it a fixed number of
//! times and reports the residuals at the final parameters.

use log::{debug, trace};

use crate::{
    errors::{FitError, FitResult},
    matrix::{NormalEquations, Vector},
    DEFAULT_ITERATIONS, PARAMETERS,
};

/// Parameters of a Gaussian peak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianParams {
    /// Peak height `A`
    pub amplitude: f64,
    /// Peak position `μ`
    pub mean: f64,
    /// Width `σ`
    pub sigma: f64,
}

impl Default for GaussianParams {
    fn default() -> Self {
        Self::new(1.0, 0.0, 1.0)
    }
}

impl GaussianParams {
    /// Create a parameter set
    pub const fn new(amplitude: f64, mean: f64, sigma: f64) -> Self {
        Self { amplitude, mean, sigma }
    }

    fn envelope(&self, x: f64) -> f64 {
        let d = x - self.mean;
        (-(d * d) / (2.0 * self.sigma * self.sigma)).exp()
    }

    /// Model value at `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        self.amplitude * self.envelope(x)
    }

    /// Partial derivatives `[∂A, ∂μ, ∂σ]` at `x`
    pub fn partials(&self, x: f64) -> Vector<PARAMETERS> {
        let e = self.envelope(x);
        let d = x - self.mean;
        let s2 = self.sigma * self.sigma;
        [
            e,
            self.amplitude * d / s2 * e,
            self.amplitude * d * d / (s2 * self.sigma) * e,
        ]
    }

    /// Moment-based starting point
    ///
    /// Amplitude is the largest sample, the mean is its x position and the
    /// width is the RMS distance from that position, weighted by the
    /// non-negative samples.
    pub fn estimate(xs: &[f64], ys: &[f64]) -> FitResult<Self> {
        validate(xs, ys)?;

        let (peak, &amplitude) = ys
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .ok_or(FitError::InsufficientSamples { required: PARAMETERS, actual: 0 })?;
        let mean = xs[peak];

        let (weight, moment) = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| (y.max(0.0), y.max(0.0) * (x - mean) * (x - mean)))
            .fold((0.0, 0.0), |(w, m), (wi, mi)| (w + wi, m + mi));

        let mut sigma = (moment / weight).sqrt();
        if !(sigma.is_finite() && sigma > 0.0) {
            let (lo, hi) = xs
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
            sigma = if hi > lo { 0.25 * (hi - lo) } else { 1.0 };
        }

        Ok(Self::new(amplitude, mean, sigma))
    }
}

/// `y_i − g(x_i)` for every sample
pub fn residuals(xs: &[f64], ys: &[f64], params: &GaussianParams) -> Vec<f64> {
    xs.iter().zip(ys).map(|(&x, &y)| y - params.evaluate(x)).collect()
}

/// One Gauss-Newton step
///
/// Returns `None` if the normal equations are singular. Samples beyond the
/// shorter of `xs` and `ys` are ignored.
pub fn fit_iteration(xs: &[f64], ys: &[f64], params: GaussianParams) -> Option<GaussianParams> {
    let mut normal = NormalEquations::<PARAMETERS>::default();
    for (&x, &y) in xs.iter().zip(ys) {
        normal.add_row(&params.partials(x), y - params.evaluate(x));
    }

    let [da, dmu, dsigma] = normal.solve()?;
    Some(GaussianParams::new(
        params.amplitude + da,
        params.mean + dmu,
        params.sigma + dsigma,
    ))
}

/// Outcome of a fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianFit {
    /// Parameters after the last iteration
    pub params: GaussianParams,
    /// Sum of squared residuals over all samples
    pub residual_sum_squares: f64,
    /// Squared residuals of the first three samples
    pub leading_residuals_squared: [f64; 3],
    /// Iterations performed
    pub iterations: usize,
}

impl GaussianFit {
    /// Root-mean-square residual
    pub fn rms(&self, samples: usize) -> f64 {
        (self.residual_sum_squares / samples as f64).sqrt()
    }
}

/// Fixed-iteration Gauss-Newton fitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianFitter {
    /// Starting parameters
    pub initial: GaussianParams,
    /// Number of iterations to run
    pub iterations: usize,
}

impl Default for GaussianFitter {
    fn default() -> Self {
        Self::new()
    }
}

impl GaussianFitter {
    /// Start at `(1, 0, 1)` and run the default iteration count
    pub fn new() -> Self {
        Self {
            initial: GaussianParams::default(),
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Set the starting parameters
    pub fn with_initial(mut self, initial: GaussianParams) -> Self {
        self.initial = initial;
        self
    }

    /// Set the iteration count
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Every parameter set visited, starting with the initial one
    pub fn trajectory(&self, xs: &[f64], ys: &[f64]) -> FitResult<Vec<GaussianParams>> {
        validate(xs, ys)?;

        let mut path = Vec::with_capacity(self.iterations + 1);
        let mut params = self.initial;
        path.push(params);

        for iteration in 0..self.iterations {
            params = fit_iteration(xs, ys, params).ok_or(FitError::SingularMatrix { iteration })?;
            trace!(
                "iteration {}: A={:.6} mu={:.6} sigma={:.6}",
                iteration,
                params.amplitude,
                params.mean,
                params.sigma
            );
            path.push(params);
        }

        Ok(path)
    }

    /// Run the fit
    pub fn fit(&self, xs: &[f64], ys: &[f64]) -> FitResult<GaussianFit> {
        let path = self.trajectory(xs, ys)?;
        let params = path.last().copied().unwrap_or(self.initial);

        let r = residuals(xs, ys, &params);
        let residual_sum_squares = r.iter().map(|v| v * v).sum();
        let leading_residuals_squared = [r[0] * r[0], r[1] * r[1], r[2] * r[2]];

        debug!(
            "fit over {} samples after {} iterations: A={:.4} mu={:.4} sigma={:.4} rss={:.3e}",
            xs.len(),
            self.iterations,
            params.amplitude,
            params.mean,
            params.sigma,
            residual_sum_squares
        );

        Ok(GaussianFit {
            params,
            residual_sum_squares,
            leading_residuals_squared,
            iterations: self.iterations,
        })
    }
}

/// Fit from `(1, 0, 1)` with the default iteration count
pub fn fit(xs: &[f64], ys: &[f64]) -> FitResult<GaussianFit> {
    GaussianFitter::new().fit(xs, ys)
}

fn validate(xs: &[f64], ys: &[f64]) -> FitResult<()> {
    if xs.len() != ys.len() {
        return Err(FitError::LengthMismatch { xs: xs.len(), ys: ys.len() });
    }
    if xs.len() < PARAMETERS {
        return Err(FitError::InsufficientSamples {
            required: PARAMETERS,
            actual: xs.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid(lo: f64, hi: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64).collect()
    }

    fn sample(params: GaussianParams, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| params.evaluate(x)).collect()
    }

    fn assert_params_close(actual: GaussianParams, expected: GaussianParams, tol: f64) {
        assert!(
            (actual.amplitude - expected.amplitude).abs() <= tol * expected.amplitude.abs()
                && (actual.mean - expected.mean).abs() <= tol * expected.mean.abs().max(1.0)
                && (actual.sigma - expected.sigma).abs() <= tol * expected.sigma.abs(),
            "{:?} not within {} of {:?}",
            actual,
            tol,
            expected
        );
    }

    #[test]
    fn test_partials_match_finite_differences() {
        let p = GaussianParams::new(3.0, 0.5, 1.3);
        let h = 1e-6;
        let x = 1.7;
        let [da, dmu, dsigma] = p.partials(x);

        let fd = |q: GaussianParams| (q.evaluate(x) - p.evaluate(x)) / h;
        assert!((da - fd(GaussianParams { amplitude: p.amplitude + h, ..p })).abs() < 1e-5);
        assert!((dmu - fd(GaussianParams { mean: p.mean + h, ..p })).abs() < 1e-5);
        assert!((dsigma - fd(GaussianParams { sigma: p.sigma + h, ..p })).abs() < 1e-5);
    }

    #[test]
    fn test_truth_is_a_fixed_point() {
        let truth = GaussianParams::new(5.0, 2.0, 1.5);
        let xs = grid(-5.0, 5.0, 101);
        let ys = sample(truth, &xs);

        for iterations in 1..=3 {
            let fit = GaussianFitter::new()
                .with_initial(truth)
                .with_iterations(iterations)
                .fit(&xs, &ys)
                .unwrap();
            assert_params_close(fit.params, truth, 1e-9);
            assert!(fit.residual_sum_squares < 1e-18);
            assert_eq!(fit.iterations, iterations);
        }
    }

    #[test]
    fn test_truth_is_a_fixed_point_at_spectrogram_scale() {
        let xs = grid(-5.0, 5.0, 101);

        for amplitude in [1e-6, 1e-12, 1e-17] {
            let truth = GaussianParams::new(amplitude, 0.5, 1.2);
            let ys = sample(truth, &xs);

            for iterations in 1..=3 {
                let fit = GaussianFitter::new()
                    .with_initial(truth)
                    .with_iterations(iterations)
                    .fit(&xs, &ys)
                    .unwrap();
                assert_eq!(fit.params, truth);
                assert_eq!(fit.residual_sum_squares, 0.0);
            }
        }
    }

    #[test]
    fn test_converges_from_estimate() {
        let truth = GaussianParams::new(5.0, 2.0, 1.5);
        let xs = grid(-5.0, 5.0, 101);
        let mut state = 2024u32;
        let ys: Vec<f64> = sample(truth, &xs)
            .into_iter()
            .map(|y| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                let uniform = ((state >> 16) & 0x7fff) as f64 / 32_768.0;
                y + (uniform * 2.0 - 1.0) * 1e-3
            })
            .collect();

        let initial = GaussianParams::estimate(&xs, &ys).unwrap();
        assert_eq!(initial.amplitude, ys.iter().cloned().fold(f64::MIN, f64::max));

        let fit = GaussianFitter::new().with_initial(initial).fit(&xs, &ys).unwrap();
        assert_params_close(fit.params, truth, 0.01);
    }

    #[test]
    fn test_default_start_near_unit_peak() {
        let truth = GaussianParams::new(2.0, 0.3, 1.2);
        let xs = grid(-4.0, 4.0, 41);
        let ys = sample(truth, &xs);

        let fit = fit(&xs, &ys).unwrap();
        assert_params_close(fit.params, truth, 1e-6);
        assert!(fit.leading_residuals_squared.iter().all(|r| *r < 1e-12));
    }

    #[test]
    fn test_trajectory_shape() {
        let truth = GaussianParams::new(2.0, 0.3, 1.2);
        let xs = grid(-4.0, 4.0, 41);
        let ys = sample(truth, &xs);
        let fitter = GaussianFitter::new().with_iterations(4);

        let path = fitter.trajectory(&xs, &ys).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], GaussianParams::default());
        assert_eq!(path[4], fitter.fit(&xs, &ys).unwrap().params);
    }

    #[test]
    fn test_leading_residuals_at_final_params() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 1.0, 1.0, 1.0];

        let fit = GaussianFitter::new().with_iterations(0).fit(&xs, &ys).unwrap();

        let expected = [
            0.0,
            (1.0 - (-0.5f64).exp()).powi(2),
            (1.0 - (-2.0f64).exp()).powi(2),
        ];
        for (a, e) in fit.leading_residuals_squared.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12);
        }
        let tail = (1.0 - (-4.5f64).exp()).powi(2);
        assert!((fit.residual_sum_squares - expected.iter().sum::<f64>() - tail).abs() < 1e-12);
    }

    #[test]
    fn test_singular_system() {
        let xs = [1.0; 5];
        let ys = [0.5; 5];

        let err = fit(&xs, &ys).unwrap_err();
        assert_eq!(err, FitError::SingularMatrix { iteration: 0 });
    }

    #[test]
    fn test_input_validation() {
        assert_eq!(
            fit(&[0.0, 1.0], &[1.0, 1.0]).unwrap_err(),
            FitError::InsufficientSamples { required: 3, actual: 2 }
        );
        assert_eq!(
            fit(&[0.0, 1.0, 2.0], &[1.0, 1.0]).unwrap_err(),
            FitError::LengthMismatch { xs: 3, ys: 2 }
        );
        assert!(GaussianParams::estimate(&[], &[]).is_err());
    }

    #[test]
    fn test_estimate_fallback_width() {
        // Only one positive sample: RMS width is zero
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, 0.0, 7.0, 0.0, 0.0];

        let p = GaussianParams::estimate(&xs, &ys).unwrap();
        assert_eq!(p, GaussianParams::new(7.0, 2.0, 1.0));
    }

    proptest! {
        #[test]
        fn iteration_from_truth_stays_at_truth(
            amplitude in 0.5f64..10.0,
            mean in -2.0f64..2.0,
            sigma in 0.5f64..3.0,
        ) {
            let truth = GaussianParams::new(amplitude, mean, sigma);
            let xs = grid(-10.0, 10.0, 201);
            let ys = sample(truth, &xs);

            let next = fit_iteration(&xs, &ys, truth).unwrap();
            prop_assert!((next.amplitude - amplitude).abs() < 1e-9);
            prop_assert!((next.mean - mean).abs() < 1e-9);
            prop_assert!((next.sigma - sigma).abs() < 1e-9);
        }
    }
}
