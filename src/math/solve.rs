//! Dense linear solver: Gaussian elimination with partial pivoting.
//!
//! The solver takes `A` and `b` by value and eliminates in place, so a system
//! can be solved exactly once. Callers build a fresh system per fit.
//!
//! Singular systems are detected rather than divided through: a pivot whose
//! magnitude is not above `m · ε · ‖A‖∞` aborts the solve.

use nalgebra::{DMatrix, DVector};

use crate::error::RegressionError;

/// Solve `A·x = b` for square `A`.
///
/// Pivot ties are broken towards the lowest row index so results are
/// reproducible.
pub fn solve_linear_system(
    mut a: DMatrix<f64>,
    mut b: DVector<f64>,
) -> Result<DVector<f64>, RegressionError> {
    let m = b.len();
    if a.nrows() != a.ncols() {
        return Err(RegressionError::mismatch("coefficient matrix must be square", a.nrows(), a.ncols()));
    }
    if a.nrows() != m {
        return Err(RegressionError::mismatch(
            "right-hand side length must equal matrix size",
            a.nrows(),
            m,
        ));
    }

    let tolerance = pivot_tolerance(&a);

    for i in 0..m {
        let pivot_row = select_pivot_row(&a, i);
        if pivot_row != i {
            a.swap_rows(i, pivot_row);
            b.swap_rows(i, pivot_row);
        }

        let pivot = a[(i, i)];
        // `!(x > tol)` also catches NaN pivots.
        if !(pivot.abs() > tolerance) {
            return Err(RegressionError::SingularSystem {
                pivot: i,
                magnitude: pivot.abs(),
                tolerance,
            });
        }

        for j in (i + 1)..m {
            let factor = a[(j, i)] / pivot;
            b[j] -= factor * b[i];
            for k in i..m {
                a[(j, k)] -= factor * a[(i, k)];
            }
        }
    }

    let mut x = DVector::<f64>::zeros(m);
    for i in (0..m).rev() {
        let mut sum = 0.0;
        for k in (i + 1)..m {
            sum += a[(i, k)] * x[k];
        }
        x[i] = (b[i] - sum) / a[(i, i)];
    }

    Ok(x)
}

/// Row `j ≥ col` with the largest `|A[j][col]|`; the first one wins on ties.
fn select_pivot_row(a: &DMatrix<f64>, col: usize) -> usize {
    let mut best = col;
    let mut best_abs = a[(col, col)].abs();
    for j in (col + 1)..a.nrows() {
        let v = a[(j, col)].abs();
        if v > best_abs {
            best = j;
            best_abs = v;
        }
    }
    best
}

/// `m · ε · ‖A‖∞`, with the infinity norm taken as the largest absolute row sum.
fn pivot_tolerance(a: &DMatrix<f64>) -> f64 {
    let norm = a
        .row_iter()
        .map(|row| row.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0_f64, f64::max);
    a.nrows() as f64 * f64::EPSILON * norm
}
