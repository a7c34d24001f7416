//! Normal equations for ordinary least squares.
//!
//! For a design matrix `X` (n×p) and response `y` we solve
//!
//! ```text
//! (XᵗX) θ = Xᵗy
//! ```
//!
//! where every row of `X` is augmented with a leading constant `1.0`, so
//! `θ[0]` is the intercept and `θ[1..]` are the per-predictor coefficients.
//!
//! The system is accumulated densely, one observation at a time. The number of
//! predictors is expected to be small, so no sparsity is exploited.

use nalgebra::{DMatrix, DVector};

use crate::error::RegressionError;

/// `XᵗX` and `Xᵗy` for the intercept-augmented design.
///
/// Both are freshly allocated per fit and meant to be handed to
/// [`crate::math::solve_linear_system`], which consumes them.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalEquations {
    pub xtx: DMatrix<f64>,
    pub xty: DVector<f64>,
}

impl NormalEquations {
    /// Size of the system (`p + 1`).
    pub fn dim(&self) -> usize {
        self.xty.len()
    }
}

/// Check the shape and contents of a design/response pair.
///
/// Returns the number of predictors `p`. The row count is compared first so
/// that a mismatch is reported before anything else is looked at.
pub fn validate_design<R: AsRef<[f64]>>(x: &[R], y: &[f64]) -> Result<usize, RegressionError> {
    if x.len() != y.len() {
        return Err(RegressionError::mismatch(
            format!(
                "response length must equal design row count ({} rows, {} responses)",
                x.len(),
                y.len()
            ),
            x.len(),
            y.len(),
        ));
    }
    let Some(first) = x.first() else {
        return Err(RegressionError::EmptyDesign);
    };

    let p = first.as_ref().len();
    for (i, row) in x.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != p {
            return Err(RegressionError::mismatch(
                format!("design row {i} has the wrong number of predictors"),
                p,
                row.len(),
            ));
        }
        if let Some(j) = row.iter().position(|v| !v.is_finite()) {
            return Err(RegressionError::NonFiniteInput { row: i, column: j });
        }
        // The response is reported as column `p`, right after the predictors.
        if !y[i].is_finite() {
            return Err(RegressionError::NonFiniteInput { row: i, column: p });
        }
    }

    Ok(p)
}

/// Build `XᵗX` and `Xᵗy` for the intercept-augmented design.
pub fn build_normal_equations<R: AsRef<[f64]>>(
    x: &[R],
    y: &[f64],
) -> Result<NormalEquations, RegressionError> {
    let p = validate_design(x, y)?;
    let m = p + 1;

    let mut xtx = DMatrix::<f64>::zeros(m, m);
    let mut xty = DVector::<f64>::zeros(m);
    let mut xi = vec![0.0; m];

    for (row, &yi) in x.iter().zip(y) {
        xi[0] = 1.0;
        xi[1..].copy_from_slice(row.as_ref());

        for j in 0..m {
            xty[j] += xi[j] * yi;
            for k in 0..m {
                xtx[(j, k)] += xi[j] * xi[k];
            }
        }
    }

    Ok(NormalEquations { xtx, xty })
}
