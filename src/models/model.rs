//! Ordinary least squares model.
//!
//! A [`RegressionModel`] is fitted once from a design matrix and a response
//! vector and is immutable afterwards:
//!
//! - the normal equations are assembled (`math::normal`)
//! - solved by Gaussian elimination (`math::solve`)
//! - the solution is split into intercept and per-predictor coefficients
//! - R² and the residual variance are computed from the training rows
//!
//! Any failure (shape, singular system, undefined statistic) aborts the fit.

use nalgebra::DVector;

use crate::error::{RegressionError, Statistic};
use crate::math::{build_normal_equations, solve_linear_system};

/// Fitted linear model `y = intercept + Σ beta_j · x_j`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionModel {
    intercept: f64,
    beta: Vec<f64>,
    r_squared: f64,
    residual_variance: f64,
    n_obs: usize,
}

impl RegressionModel {
    /// Fit a model by ordinary least squares.
    ///
    /// Predictors that are zero in every observation carry no information;
    /// they are left out of the solve and get a coefficient of exactly `0.0`.
    pub fn fit<R: AsRef<[f64]>>(x: &[R], y: &[f64]) -> Result<Self, RegressionError> {
        let normal = build_normal_equations(x, y)?;
        let m = normal.dim();
        let n = y.len();
        let p = m - 1;

        // XᵗX[j][j] = Σ x_ij², which is zero only for an all-zero column.
        // The intercept column always has XᵗX[0][0] = n > 0.
        let active: Vec<usize> = (0..m).filter(|&j| normal.xtx[(j, j)] != 0.0).collect();

        let theta = if active.len() == m {
            solve_linear_system(normal.xtx, normal.xty)?
        } else {
            let a = normal.xtx.select_rows(&active).select_columns(&active);
            let b = normal.xty.select_rows(&active);
            let reduced = solve_linear_system(a, b)?;
            let mut theta = DVector::<f64>::zeros(m);
            for (slot, &j) in active.iter().enumerate() {
                theta[j] = reduced[slot];
            }
            theta
        };

        let intercept = theta[0];
        let beta: Vec<f64> = theta.iter().skip(1).copied().collect();

        let y_bar = y.iter().sum::<f64>() / n as f64;
        let mut tss = 0.0;
        let mut rss = 0.0;
        for (row, &yi) in x.iter().zip(y) {
            let fitted = linear_predictor(intercept, &beta, row.as_ref());
            tss += (yi - y_bar) * (yi - y_bar);
            rss += (yi - fitted) * (yi - fitted);
        }

        // Only an exactly constant response has TSS = 0; a large offset with a
        // small spread is still a valid fit.
        if y.iter().all(|&v| v == y[0]) || !(tss > 0.0) {
            return Err(RegressionError::degenerate(
                Statistic::RSquared,
                "response is constant, total sum of squares is zero",
            ));
        }
        if n <= p + 1 {
            return Err(RegressionError::degenerate(
                Statistic::ResidualVariance,
                format!("{n} observations leave no residual degrees of freedom for {p} predictors"),
            ));
        }

        Ok(Self {
            intercept,
            beta,
            r_squared: 1.0 - rss / tss,
            residual_variance: rss / (n - p - 1) as f64,
            n_obs: n,
        })
    }

    /// Rebuild a model from previously fitted values (e.g. a saved model file).
    pub fn from_parts(
        intercept: f64,
        coefficients: Vec<f64>,
        r_squared: f64,
        residual_variance: f64,
        n_obs: usize,
    ) -> Result<Self, RegressionError> {
        if !intercept.is_finite() {
            return Err(RegressionError::NonFiniteInput { row: 0, column: 0 });
        }
        if let Some(j) = coefficients.iter().position(|v| !v.is_finite()) {
            return Err(RegressionError::NonFiniteInput { row: 0, column: j + 1 });
        }
        let p = coefficients.len();
        if n_obs <= p + 1 {
            return Err(RegressionError::degenerate(
                Statistic::ResidualVariance,
                format!("{n_obs} observations leave no residual degrees of freedom for {p} predictors"),
            ));
        }
        if !(r_squared.is_finite() && r_squared <= 1.0) {
            return Err(RegressionError::degenerate(
                Statistic::RSquared,
                format!("stored value {r_squared} is outside (-inf, 1]"),
            ));
        }
        if !(residual_variance.is_finite() && residual_variance >= 0.0) {
            return Err(RegressionError::degenerate(
                Statistic::ResidualVariance,
                format!("stored value {residual_variance} is not a finite non-negative number"),
            ));
        }

        Ok(Self {
            intercept,
            beta: coefficients,
            r_squared,
            residual_variance,
            n_obs,
        })
    }

    /// Predict the response for one feature row.
    pub fn predict(&self, features: &[f64]) -> Result<f64, RegressionError> {
        if features.len() != self.beta.len() {
            return Err(RegressionError::mismatch(
                "feature vector length must equal the number of predictors",
                self.beta.len(),
                features.len(),
            ));
        }
        if let Some(j) = features.iter().position(|v| !v.is_finite()) {
            return Err(RegressionError::NonFiniteInput { row: 0, column: j });
        }
        Ok(linear_predictor(self.intercept, &self.beta, features))
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Per-predictor coefficients (intercept excluded).
    pub fn coefficients(&self) -> &[f64] {
        &self.beta
    }

    /// Coefficient of determination, `1 - RSS/TSS`.
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Unbiased noise variance estimate, `RSS / (n - p - 1)`.
    pub fn residual_variance(&self) -> f64 {
        self.residual_variance
    }

    pub fn residual_standard_error(&self) -> f64 {
        self.residual_variance.sqrt()
    }

    /// `1 - (1 - R²)(n - 1)/(n - p - 1)`.
    pub fn adjusted_r_squared(&self) -> f64 {
        let n = self.n_obs as f64;
        let p = self.beta.len() as f64;
        1.0 - (1.0 - self.r_squared) * (n - 1.0) / (n - p - 1.0)
    }

    pub fn n_observations(&self) -> usize {
        self.n_obs
    }

    pub fn n_predictors(&self) -> usize {
        self.beta.len()
    }

}

/// `intercept + Σ beta_j · x_j`; shared by fitting and prediction so both see
/// bit-identical values.
fn linear_predictor(intercept: f64, beta: &[f64], x: &[f64]) -> f64 {
    let mut prediction = intercept;
    for (b, v) in beta.iter().zip(x) {
        prediction += b * v;
    }
    prediction
}
