//! Fixed-size linear algebra for least-squares updates
//!
//! Matrices are plain nested arrays sized by const generics, so the 3×3
//! normal equations of the Gaussian fit never touch the heap.

/// Matrix type using const generics
pub type Matrix<const R: usize, const C: usize> = [[f64; C]; R];

/// Square matrix type
pub type SquareMatrix<const N: usize> = Matrix<N, N>;

/// Vector type
pub type Vector<const N: usize> = [f64; N];

/// Relative pivot size below which a system is treated as singular
pub const SINGULAR_THRESHOLD: f64 = 1e-12;

/// Solve A×x = b by Gaussian elimination with partial pivoting
///
/// Returns `None` when a pivot falls below [`SINGULAR_THRESHOLD`] relative
/// to the largest entry of `a`, or when `a` holds non-finite values.
pub fn solve<const N: usize>(a: &SquareMatrix<N>, b: &Vector<N>) -> Option<Vector<N>> {
    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0f64, |acc, v| acc.max(v.abs()));
    if !(scale.is_finite() && scale > 0.0) {
        return None;
    }

    let mut m = *a;
    let mut rhs = *b;

    // Forward elimination
    for k in 0..N {
        // Find pivot
        let mut max_row = k;
        let mut max_val = m[k][k].abs();
        for i in (k + 1)..N {
            if m[i][k].abs() > max_val {
                max_val = m[i][k].abs();
                max_row = i;
            }
        }

        if !(max_val > scale * SINGULAR_THRESHOLD) {
            return None;
        }

        if max_row != k {
            m.swap(k, max_row);
            rhs.swap(k, max_row);
        }

        for i in (k + 1)..N {
            let factor = m[i][k] / m[k][k];
            for j in k..N {
                m[i][j] -= factor * m[k][j];
            }
            rhs[i] -= factor * rhs[k];
        }
    }

    // Back substitution
    let mut x = [0.0; N];
    for i in (0..N).rev() {
        let mut sum = rhs[i];
        for j in (i + 1)..N {
            sum -= m[i][j] * x[j];
        }
        x[i] = sum / m[i][i];
    }

    Some(x)
}

/// Running sums of JᵀJ and Jᵀr, one Jacobian row at a time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalEquations<const N: usize> {
    /// Accumulated JᵀJ
    pub jtj: SquareMatrix<N>,
    /// Accumulated Jᵀr
    pub jtr: Vector<N>,
}

impl<const N: usize> Default for NormalEquations<N> {
    fn default() -> Self {
        Self {
            jtj: [[0.0; N]; N],
            jtr: [0.0; N],
        }
    }
}

impl<const N: usize> NormalEquations<N> {
    /// Add one Jacobian row and its residual
    pub fn add_row(&mut self, jacobian: &Vector<N>, residual: f64) {
        for i in 0..N {
            self.jtr[i] += jacobian[i] * residual;
            for j in 0..N {
                self.jtj[i][j] += jacobian[i] * jacobian[j];
            }
        }
    }

    /// Solve for the parameter step
    ///
    /// JᵀJ is scaled to a unit diagonal before elimination, so parameters
    /// whose sensitivities differ by many orders of magnitude do not look
    /// singular. A zero or non-finite diagonal entry is singular.
    pub fn solve(&self) -> Option<Vector<N>> {
        let mut scale = [0.0; N];
        for i in 0..N {
            let d = self.jtj[i][i];
            if !(d.is_finite() && d > 0.0) {
                return None;
            }
            scale[i] = 1.0 / d.sqrt();
        }

        let mut a = self.jtj;
        let mut b = self.jtr;
        for i in 0..N {
            for j in 0..N {
                a[i][j] *= scale[i] * scale[j];
            }
            b[i] *= scale[i];
        }

        let mut x = solve(&a, &b)?;
        for i in 0..N {
            x[i] *= scale[i];
        }
        Some(x)
    }
}
