//! Error types.
//!
//! - [`RegressionError`]: typed failures of the numerical core (`math`, `models`)
//! - [`AppError`]: what the binary reports, carrying a process exit code

use thiserror::Error;

/// A fit diagnostic that can be undefined for some inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    RSquared,
    ResidualVariance,
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statistic::RSquared => write!(f, "R²"),
            Statistic::ResidualVariance => write!(f, "residual variance"),
        }
    }
}

/// Failures of the regression engine.
///
/// Every variant aborts a fit as a whole; no partially fitted model is ever
/// returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    #[error("dimension mismatch: {what} (expected {expected}, found {found})")]
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    #[error("singular system: pivot {pivot} has magnitude {magnitude:e}, not above tolerance {tolerance:e}")]
    SingularSystem {
        pivot: usize,
        magnitude: f64,
        tolerance: f64,
    },
    #[error("degenerate statistic: {statistic} is not computable ({reason})")]
    DegenerateStatistic { statistic: Statistic, reason: String },
    #[error("empty design matrix: at least one observation is required")]
    EmptyDesign,
    #[error("non-finite input value at row {row}, column {column}")]
    NonFiniteInput { row: usize, column: usize },
}

impl RegressionError {
    pub fn mismatch(what: impl Into<String>, expected: usize, found: usize) -> Self {
        RegressionError::DimensionMismatch {
            what: what.into(),
            expected,
            found,
        }
    }

    pub fn degenerate(statistic: Statistic, reason: impl Into<String>) -> Self {
        RegressionError::DegenerateStatistic {
            statistic,
            reason: reason.into(),
        }
    }

    /// Process exit code used when this error reaches the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            RegressionError::DimensionMismatch { .. } | RegressionError::NonFiniteInput { .. } => 2,
            RegressionError::EmptyDesign => 3,
            RegressionError::SingularSystem { .. } | RegressionError::DegenerateStatistic { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<RegressionError> for AppError {
    fn from(err: RegressionError) -> Self {
        AppError::new(err.exit_code(), format!("Regression failed: {err}"))
    }
}
