//! Reporting utilities: residuals, prediction confidence and formatted output.

pub mod format;

pub use format::*;

use crate::domain::{Dataset, ObservationResidual};
use crate::error::AppError;
use crate::models::RegressionModel;

/// Compute fitted values and residuals for each training row.
pub fn compute_residuals(model: &RegressionModel, dataset: &Dataset) -> Result<Vec<ObservationResidual>, AppError> {
    let mut out = Vec::with_capacity(dataset.y.len());
    for (row, (x, &y_obs)) in dataset.x.iter().zip(&dataset.y).enumerate() {
        let y_fit = model.predict(x)?;
        out.push(ObservationResidual {
            row,
            y_obs,
            y_fit,
            residual: y_obs - y_fit,
        });
    }
    Ok(out)
}

/// Rows with the largest residuals on each side (top-N each).
#[derive(Debug, Clone)]
pub struct ResidualRanking {
    /// Observed above fitted, largest first.
    pub over: Vec<ObservationResidual>,
    /// Observed below fitted, most negative first.
    pub under: Vec<ObservationResidual>,
}

/// Rank residuals in both directions.
pub fn rank_residuals(residuals: &[ObservationResidual], top_n: usize) -> ResidualRanking {
    let mut sorted = residuals.to_vec();
    sorted.sort_by(|a, b| b.residual.partial_cmp(&a.residual).unwrap_or(std::cmp::Ordering::Equal));
    let over = sorted.iter().filter(|r| r.residual > 0.0).take(top_n).cloned().collect();

    sorted.reverse();
    let under = sorted.iter().filter(|r| r.residual < 0.0).take(top_n).cloned().collect();

    ResidualRanking { over, under }
}

/// How far a feature vector sits from the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proximity {
    Typical,
    Moderate,
    Far,
}

impl Proximity {
    pub fn note(self) -> &'static str {
        match self {
            Proximity::Typical => "Input values are within typical range of training data",
            Proximity::Moderate => "Note: Input values are moderately far from training data mean",
            Proximity::Far => {
                "Warning: Input values are far from training data mean - prediction may be less reliable"
            }
        }
    }
}

/// Relative Euclidean distance `√Σ((x_j − μ_j)/μ_j)²` from the training means.
///
/// Terms whose mean is zero contribute the absolute difference instead.
pub fn relative_distance(features: &[f64], means: &[f64]) -> f64 {
    features
        .iter()
        .zip(means)
        .map(|(&x, &mu)| {
            let d = if mu == 0.0 { x - mu } else { (x - mu) / mu };
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Classify a feature vector: > 2 is far, > 1 is moderately far.
pub fn assess_proximity(features: &[f64], means: &[f64]) -> Proximity {
    let d = relative_distance(features, means);
    if d > 2.0 {
        Proximity::Far
    } else if d > 1.0 {
        Proximity::Moderate
    } else {
        Proximity::Typical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residuals_use_model_predictions() {
        let dataset = Dataset {
            predictor_names: vec!["x".into()],
            response_name: "y".into(),
            x: vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]],
            y: vec![3.0, 5.5, 7.0, 9.0],
        };
        let model = RegressionModel::fit(&dataset.x, &dataset.y).unwrap();
        let residuals = compute_residuals(&model, &dataset).unwrap();

        assert_eq!(residuals.len(), 4);
        for r in &residuals {
            assert_eq!(r.y_fit, model.predict(&dataset.x[r.row]).unwrap());
            assert_eq!(r.residual, r.y_obs - r.y_fit);
        }
        // OLS residuals sum to zero when an intercept is fitted.
        let total: f64 = residuals.iter().map(|r| r.residual).sum();
        assert!(total.abs() < 1e-10);
    }

    #[test]
    fn ranking_splits_by_sign() {
        let residuals: Vec<ObservationResidual> = [0.0, 5.0, -5.0, 2.0, -1.0]
            .iter()
            .enumerate()
            .map(|(row, &residual)| ObservationResidual {
                row,
                y_obs: 100.0 + residual,
                y_fit: 100.0,
                residual,
            })
            .collect();

        let ranking = rank_residuals(&residuals, 1);
        assert_eq!(ranking.over.len(), 1);
        assert_eq!(ranking.over[0].row, 1);
        assert_eq!(ranking.under.len(), 1);
        assert_eq!(ranking.under[0].row, 2);

        let ranking = rank_residuals(&residuals, 10);
        assert_eq!(ranking.over.iter().map(|r| r.row).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(ranking.under.iter().map(|r| r.row).collect::<Vec<_>>(), vec![2, 4]);
    }

    #[test]
    fn proximity_thresholds() {
        let means = [2000.0, 1990.0];
        assert_eq!(assess_proximity(&[2100.0, 1995.0], &means), Proximity::Typical);
        // Size at 2.5x the mean puts the first term alone at 1.5.
        assert_eq!(assess_proximity(&[5000.0, 1990.0], &means), Proximity::Moderate);
        assert_eq!(assess_proximity(&[8000.0, 1990.0], &means), Proximity::Far);
    }

    #[test]
    fn zero_mean_uses_absolute_difference() {
        assert_eq!(relative_distance(&[0.5], &[0.0]), 0.5);
        assert_eq!(relative_distance(&[3.0, 4.0], &[0.0, 0.0]), 5.0);
    }
}
