//! Read/write model JSON files.
//!
//! Model JSON is the "portable" representation of a fit:
//! - predictor/response names
//! - intercept, coefficients and fit diagnostics
//! - training means per predictor (for prediction confidence notes)
//!
//! The schema is defined by `domain::ModelFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::ModelFile;
use crate::error::AppError;
use crate::io::ingest::IngestedData;
use crate::models::RegressionModel;

/// Build the serializable form of a fitted model.
pub fn model_file(model: &RegressionModel, ingest: &IngestedData) -> ModelFile {
    ModelFile {
        tool: "mvr".to_string(),
        fitted_at: Utc::now(),
        response: ingest.dataset.response_name.clone(),
        predictors: ingest.dataset.predictor_names.clone(),
        intercept: model.intercept(),
        coefficients: model.coefficients().to_vec(),
        r_squared: model.r_squared(),
        residual_variance: model.residual_variance(),
        n_observations: model.n_observations(),
        predictor_means: ingest.stats.predictor_means.clone(),
    }
}

/// Write a model JSON file.
pub fn write_model_json(path: &Path, model: &RegressionModel, ingest: &IngestedData) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create model JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &model_file(model, ingest))
        .map_err(|e| AppError::new(4, format!("Failed to write model JSON: {e}")))?;

    Ok(())
}

/// Read a model JSON file.
pub fn read_model_json(path: &Path) -> Result<ModelFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open model JSON '{}': {e}", path.display())))?;
    let saved: ModelFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid model JSON: {e}")))?;
    Ok(saved)
}

impl ModelFile {
    /// Restore the fitted model, checking the file is self-consistent.
    pub fn to_model(&self) -> Result<RegressionModel, AppError> {
        let p = self.coefficients.len();
        if self.predictors.len() != p || self.predictor_means.len() != p {
            return Err(AppError::new(
                2,
                format!(
                    "Invalid model JSON: {} coefficients, {} predictor names, {} predictor means.",
                    p,
                    self.predictors.len(),
                    self.predictor_means.len()
                ),
            ));
        }
        RegressionModel::from_parts(
            self.intercept,
            self.coefficients.clone(),
            self.r_squared,
            self.residual_variance,
            self.n_observations,
        )
        .map_err(|e| AppError::new(2, format!("Invalid model JSON: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved() -> ModelFile {
        ModelFile {
            tool: "mvr".into(),
            fitted_at: Utc::now(),
            response: "price".into(),
            predictors: vec!["size".into(), "year".into()],
            intercept: 1.0,
            coefficients: vec![2.0, 0.0],
            r_squared: 0.95,
            residual_variance: 0.25,
            n_observations: 20,
            predictor_means: vec![3.0, 0.0],
        }
    }

    #[test]
    fn model_file_json_restores_model() {
        let original = saved();
        let json = serde_json::to_string_pretty(&original).unwrap();
        let back: ModelFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);

        let model = back.to_model().unwrap();
        assert_eq!(model.predict(&[5.0, 0.0]).unwrap(), 11.0);
        assert_eq!(model.r_squared(), 0.95);
    }

    #[test]
    fn inconsistent_model_file_is_rejected() {
        let mut file = saved();
        file.predictors.pop();
        let err = file.to_model().unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let mut file = saved();
        file.residual_variance = -1.0;
        assert!(file.to_model().is_err());
    }
}
