//! Export per-observation results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{Dataset, ObservationResidual};
use crate::error::AppError;

/// Write per-observation results to a CSV file.
pub fn write_results_csv(
    path: &Path,
    dataset: &Dataset,
    residuals: &[ObservationResidual],
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);
    write_results(&mut out, dataset, residuals)?;
    out.flush()
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV: {e}")))
}

/// Write the results table to any writer.
///
/// Columns: row number (1-based), every predictor, observed, fitted, residual.
pub fn write_results<W: Write>(
    out: &mut W,
    dataset: &Dataset,
    residuals: &[ObservationResidual],
) -> Result<(), AppError> {
    let mut header = vec!["row".to_string()];
    header.extend(dataset.predictor_names.iter().cloned());
    header.push(format!("{}_obs", dataset.response_name));
    header.push(format!("{}_fit", dataset.response_name));
    header.push("residual".to_string());
    writeln!(out, "{}", header.join(","))
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;

    for r in residuals {
        let features: Vec<String> = dataset
            .x
            .get(r.row)
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .unwrap_or_default();
        writeln!(
            out,
            "{},{},{},{:.10},{:.10}",
            r.row + 1,
            features.join(","),
            r.y_obs,
            r.y_fit,
            r.residual,
        )
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let dataset = Dataset {
            predictor_names: vec!["size".into(), "year".into()],
            response_name: "price".into(),
            x: vec![vec![1200.0, 1990.0]],
            y: vec![250.0],
        };
        let residuals = vec![ObservationResidual {
            row: 0,
            y_obs: 250.0,
            y_fit: 249.5,
            residual: 0.5,
        }];

        let mut buf = Vec::new();
        write_results(&mut buf, &dataset, &residuals).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "row,size,year,price_obs,price_fit,residual");
        assert_eq!(lines[1], "1,1200,1990,250,249.5000000000,0.5000000000");
    }
}
