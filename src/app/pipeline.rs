//! Shared "fit pipeline" logic.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> normal equations -> solve -> residuals -> rankings
//!
//! The handlers in `app` then only deal with printing and exports.

use crate::domain::{FitConfig, ObservationResidual};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_dataset};
use crate::models::RegressionModel;
use crate::report::ResidualRanking;

/// All computed outputs of a single `mvr fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub model: RegressionModel,
    pub residuals: Vec<ObservationResidual>,
    pub ranking: ResidualRanking,
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let ingest = load_dataset(config)?;
    fit_ingested(ingest, config.top_n)
}

/// Fit an already-loaded dataset.
pub fn fit_ingested(ingest: IngestedData, top_n: usize) -> Result<RunOutput, AppError> {
    let dataset = &ingest.dataset;
    log::debug!(
        "fitting {} observations with {} predictors",
        dataset.y.len(),
        dataset.n_predictors()
    );

    let model = RegressionModel::fit(&dataset.x, &dataset.y)?;
    log::info!(
        "fit complete: R²={:.6}, residual variance={:.6}",
        model.r_squared(),
        model.residual_variance()
    );

    let residuals = crate::report::compute_residuals(&model, dataset)?;
    let ranking = crate::report::rank_residuals(&residuals, top_n);

    Ok(RunOutput {
        ingest,
        model,
        residuals,
        ranking,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dataset, DatasetStats};

    fn ingest(x: Vec<Vec<f64>>, y: Vec<f64>) -> IngestedData {
        let dataset = Dataset {
            predictor_names: (1..=x[0].len()).map(|j| format!("x{j}")).collect(),
            response_name: "y".into(),
            x,
            y,
        };
        let stats = DatasetStats::compute(&dataset).unwrap();
        let n = dataset.y.len();
        IngestedData {
            dataset,
            stats,
            row_errors: Vec::new(),
            rows_read: n,
            rows_used: n,
        }
    }

    #[test]
    fn pipeline_fits_and_ranks() {
        let x = vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0], vec![5.0]];
        let y = vec![2.0, 4.5, 5.5, 8.5, 9.5];
        let run = fit_ingested(ingest(x, y), 1).unwrap();

        assert_eq!(run.residuals.len(), 5);
        assert!(run.ranking.over.len() <= 1);
        assert!(run.ranking.under.len() <= 1);
        assert!(run.model.r_squared() > 0.9);
    }

    #[test]
    fn computational_failures_map_to_exit_code_4() {
        // Second column duplicates the first.
        let x = vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0], vec![4.0, 4.0]];
        let y = vec![1.0, 2.0, 2.5, 4.0];
        let err = fit_ingested(ingest(x, y), 0).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
