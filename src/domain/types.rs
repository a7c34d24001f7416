//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for prediction

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resolved configuration for a `mvr fit` run.
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub predictors_path: PathBuf,
    /// Separate response CSV. `None` when the response is a column of the
    /// predictors file (`target`).
    pub response_path: Option<PathBuf>,
    /// Name of the response column in single-file mode.
    pub target: Option<String>,
    /// CSV field delimiter.
    pub delimiter: u8,
    /// Number of rows echoed in the dataset preview.
    pub preview_rows: usize,
    /// Residual rows listed per side; 0 disables the ranking tables.
    pub top_n: usize,
    pub export_results: Option<PathBuf>,
    pub export_model: Option<PathBuf>,
    pub interactive: bool,
}

/// Parameters for a synthetic `y = intercept + Σ b_j x_j + ε` sample.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub rows: usize,
    pub seed: u64,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    /// Standard deviation of the Gaussian noise term.
    pub noise_sd: f64,
    /// Predictors are drawn uniformly from `[feature_min, feature_max]`.
    pub feature_min: f64,
    pub feature_max: f64,
}

/// Parsed observations ready for fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub predictor_names: Vec<String>,
    pub response_name: String,
    /// One row per observation, `predictor_names.len()` values each.
    pub x: Vec<Vec<f64>>,
    pub y: Vec<f64>,
}

impl Dataset {
    pub fn n_predictors(&self) -> usize {
        self.predictor_names.len()
    }
}

/// Summary stats about the predictor rows actually used for fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub n_rows: usize,
    pub predictor_means: Vec<f64>,
    pub predictor_min: Vec<f64>,
    pub predictor_max: Vec<f64>,
    pub y_mean: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl DatasetStats {
    /// Column-wise stats; `None` for an empty dataset.
    pub fn compute(dataset: &Dataset) -> Option<Self> {
        let n = dataset.y.len();
        if n == 0 || dataset.x.len() != n {
            return None;
        }
        let p = dataset.n_predictors();

        let mut sums = vec![0.0; p];
        let mut mins = vec![f64::INFINITY; p];
        let mut maxs = vec![f64::NEG_INFINITY; p];
        for row in &dataset.x {
            for (j, &v) in row.iter().enumerate().take(p) {
                sums[j] += v;
                mins[j] = mins[j].min(v);
                maxs[j] = maxs[j].max(v);
            }
        }

        let nf = n as f64;
        Some(Self {
            n_rows: n,
            predictor_means: sums.into_iter().map(|s| s / nf).collect(),
            predictor_min: mins,
            predictor_max: maxs,
            y_mean: dataset.y.iter().sum::<f64>() / nf,
            y_min: dataset.y.iter().copied().fold(f64::INFINITY, f64::min),
            y_max: dataset.y.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

/// Observed vs fitted value for one training row.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationResidual {
    /// 0-based row index in the dataset.
    pub row: usize,
    pub y_obs: f64,
    pub y_fit: f64,
    pub residual: f64,
}

/// Portable JSON representation of a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub tool: String,
    pub fitted_at: DateTime<Utc>,
    pub response: String,
    pub predictors: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    pub r_squared: f64,
    pub residual_variance: f64,
    pub n_observations: usize,
    /// Training means per predictor, used for the prediction confidence note.
    pub predictor_means: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_are_column_wise() {
        let dataset = Dataset {
            predictor_names: vec!["size".into(), "year".into()],
            response_name: "price".into(),
            x: vec![vec![1000.0, 1990.0], vec![2000.0, 2010.0], vec![3000.0, 2000.0]],
            y: vec![10.0, 30.0, 20.0],
        };
        let stats = DatasetStats::compute(&dataset).unwrap();
        assert_eq!(stats.n_rows, 3);
        assert_eq!(stats.predictor_means, vec![2000.0, 2000.0]);
        assert_eq!(stats.predictor_min, vec![1000.0, 1990.0]);
        assert_eq!(stats.predictor_max, vec![3000.0, 2010.0]);
        assert_eq!(stats.y_mean, 20.0);
        assert_eq!((stats.y_min, stats.y_max), (10.0, 30.0));
    }

    #[test]
    fn stats_of_empty_dataset_are_none() {
        let dataset = Dataset {
            predictor_names: vec!["a".into()],
            response_name: "y".into(),
            x: vec![],
            y: vec![],
        };
        assert!(DatasetStats::compute(&dataset).is_none());
    }
}
