//! Synthetic regression samples.
//!
//! Generates `y = intercept + Σ b_j x_j + ε` with uniformly drawn predictors and
//! Gaussian noise. The RNG is seeded, so the same config always yields the same
//! files.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Dataset, DatasetStats, SampleConfig};
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct SampleData {
    pub dataset: Dataset,
    pub stats: DatasetStats,
}

pub fn generate_sample(config: &SampleConfig) -> Result<SampleData, AppError> {
    if config.rows == 0 {
        return Err(AppError::new(2, "Sample row count must be > 0."));
    }
    if config.coefficients.is_empty() {
        return Err(AppError::new(2, "At least one coefficient is required."));
    }
    if !(config.intercept.is_finite() && config.coefficients.iter().all(|b| b.is_finite())) {
        return Err(AppError::new(2, "Sample coefficients must be finite."));
    }
    if !(config.feature_min.is_finite()
        && config.feature_max.is_finite()
        && config.feature_max > config.feature_min)
    {
        return Err(AppError::new(2, "Invalid feature range for sample generation."));
    }
    if !(config.noise_sd.is_finite() && config.noise_sd >= 0.0) {
        return Err(AppError::new(2, "Noise standard deviation must be finite and >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(0.0, config.noise_sd)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let p = config.coefficients.len();
    let mut x = Vec::with_capacity(config.rows);
    let mut y = Vec::with_capacity(config.rows);
    for _ in 0..config.rows {
        let row: Vec<f64> = (0..p)
            .map(|_| rng.gen_range(config.feature_min..=config.feature_max))
            .collect();
        let signal: f64 = row.iter().zip(&config.coefficients).map(|(v, b)| v * b).sum();
        y.push(config.intercept + signal + noise.sample(&mut rng));
        x.push(row);
    }

    let dataset = Dataset {
        predictor_names: (1..=p).map(|j| format!("x{j}")).collect(),
        response_name: "y".to_string(),
        x,
        y,
    };
    let stats = DatasetStats::compute(&dataset)
        .ok_or_else(|| AppError::new(4, "Generated sample is empty."))?;

    Ok(SampleData { dataset, stats })
}

/// Write `predictors.csv` and `response.csv` into `dir`, creating it if needed.
pub fn write_sample_csvs(dataset: &Dataset, dir: &Path) -> Result<(PathBuf, PathBuf), AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::new(4, format!("Failed to create '{}': {e}", dir.display())))?;

    let predictors_path = dir.join("predictors.csv");
    let response_path = dir.join("response.csv");

    let mut writer = csv::Writer::from_path(&predictors_path)
        .map_err(|e| AppError::new(4, format!("Failed to create '{}': {e}", predictors_path.display())))?;
    writer
        .write_record(&dataset.predictor_names)
        .map_err(|e| AppError::new(4, format!("Failed to write predictors header: {e}")))?;
    for row in &dataset.x {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .map_err(|e| AppError::new(4, format!("Failed to write predictors row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to write predictors CSV: {e}")))?;

    let mut writer = csv::Writer::from_path(&response_path)
        .map_err(|e| AppError::new(4, format!("Failed to create '{}': {e}", response_path.display())))?;
    writer
        .write_record([dataset.response_name.as_str()])
        .map_err(|e| AppError::new(4, format!("Failed to write response header: {e}")))?;
    for v in &dataset.y {
        writer
            .write_record([v.to_string()])
            .map_err(|e| AppError::new(4, format!("Failed to write response row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to write response CSV: {e}")))?;

    Ok((predictors_path, response_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RegressionModel;

    fn config() -> SampleConfig {
        SampleConfig {
            rows: 200,
            seed: 42,
            intercept: 5.0,
            coefficients: vec![2.0, -1.5, 0.25],
            noise_sd: 0.1,
            feature_min: 0.0,
            feature_max: 10.0,
        }
    }

    #[test]
    fn sample_is_deterministic_for_a_seed() {
        let a = generate_sample(&config()).unwrap();
        let b = generate_sample(&config()).unwrap();
        assert_eq!(a.dataset, b.dataset);

        let mut other = config();
        other.seed = 43;
        let c = generate_sample(&other).unwrap();
        assert_ne!(a.dataset.y, c.dataset.y);
    }

    #[test]
    fn fit_recovers_sample_coefficients() {
        let sample = generate_sample(&config()).unwrap();
        assert_eq!(sample.dataset.predictor_names, vec!["x1", "x2", "x3"]);
        assert_eq!(sample.stats.n_rows, 200);

        let model = RegressionModel::fit(&sample.dataset.x, &sample.dataset.y).unwrap();
        assert!((model.intercept() - 5.0).abs() < 0.15);
        for (got, want) in model.coefficients().iter().zip(&config().coefficients) {
            assert!((got - want).abs() < 0.02, "got {got}, want {want}");
        }
        assert!(model.r_squared() > 0.99);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let mut c = config();
        c.rows = 0;
        assert_eq!(generate_sample(&c).unwrap_err().exit_code(), 2);

        let mut c = config();
        c.feature_max = c.feature_min;
        assert!(generate_sample(&c).is_err());

        let mut c = config();
        c.noise_sd = -1.0;
        assert!(generate_sample(&c).is_err());
    }
}
