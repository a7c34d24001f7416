//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{Dataset, ObservationResidual};
use crate::io::ingest::IngestedData;
use crate::models::RegressionModel;
use crate::report::{Proximity, ResidualRanking};

/// Echo the header and the first `rows` observations.
pub fn format_dataset_preview(dataset: &Dataset, rows: usize) -> String {
    let mut out = String::new();
    if rows == 0 {
        return out;
    }

    out.push_str(&format!(
        "First {} rows ({} -> {}):\n",
        rows.min(dataset.y.len()),
        dataset.predictor_names.join(", "),
        dataset.response_name
    ));
    for (i, (x, y)) in dataset.x.iter().zip(&dataset.y).take(rows).enumerate() {
        out.push_str(&format!("Row {}: {} -> {}\n", i + 1, fmt_vec(x), y));
    }
    out
}

/// Format the full run summary (dataset stats + coefficients + diagnostics).
pub fn format_run_summary(ingest: &IngestedData, model: &RegressionModel) -> String {
    let dataset = &ingest.dataset;
    let mut out = String::new();

    out.push_str("=== mvr - Multivariate Linear Regression (OLS) ===\n");
    out.push_str(&format!(
        "Observations: n={} | predictors: p={} | rows read={} | skipped={}\n",
        ingest.rows_used,
        dataset.n_predictors(),
        ingest.rows_read,
        ingest.row_errors.len(),
    ));
    out.push_str(&format!(
        "Response `{}`: mean={:.4} range=[{:.4}, {:.4}]\n",
        dataset.response_name, ingest.stats.y_mean, ingest.stats.y_min, ingest.stats.y_max
    ));
    for (j, name) in dataset.predictor_names.iter().enumerate() {
        out.push_str(&format!(
            "Predictor `{}`: mean={:.4} range=[{:.4}, {:.4}]\n",
            name, ingest.stats.predictor_means[j], ingest.stats.predictor_min[j], ingest.stats.predictor_max[j]
        ));
    }

    out.push_str("\nRegression results:\n");
    out.push_str(&format!("  {:<24} {:>18.6}\n", "Intercept (β₀)", model.intercept()));
    for (j, (name, beta)) in dataset
        .predictor_names
        .iter()
        .zip(model.coefficients())
        .enumerate()
    {
        let label = format!("{} (β{})", truncate(name, 18), subscript(j + 1));
        out.push_str(&format!("  {label:<24} {beta:>18.6}\n"));
    }

    out.push_str("\nGoodness of fit:\n");
    out.push_str(&format!("  R-squared          {:.6}\n", model.r_squared()));
    out.push_str(&format!("  Adjusted R-squared {:.6}\n", model.adjusted_r_squared()));
    out.push_str(&format!("  Residual variance  {:.6}\n", model.residual_variance()));
    out.push_str(&format!("  Residual std error {:.6}\n", model.residual_standard_error()));
    out.push_str(&format!(
        "\nThis means {:.1}% of the variance in {} is explained by {}.\n",
        model.r_squared() * 100.0,
        dataset.response_name,
        dataset.predictor_names.join(" and "),
    ));

    out
}

/// Format the largest positive/negative residual tables.
pub fn format_rankings(ranking: &ResidualRanking, dataset: &Dataset) -> String {
    let mut out = String::new();

    out.push_str("Largest positive residuals (observed above fit):\n");
    out.push_str(&format_table(&ranking.over, dataset));
    out.push('\n');

    out.push_str("Largest negative residuals (observed below fit):\n");
    out.push_str(&format_table(&ranking.under, dataset));

    out
}

/// Format one prediction with its confidence note.
pub fn format_prediction(
    names: &[String],
    features: &[f64],
    response_name: &str,
    prediction: f64,
    proximity: Proximity,
) -> String {
    let mut out = String::new();
    out.push_str("Prediction results:\n");
    for (name, v) in names.iter().zip(features) {
        out.push_str(&format!("  {name}: {v}\n"));
    }
    out.push_str(&format!("  Predicted {response_name}: {prediction:.2}\n"));
    out.push_str(&format!("  {}\n", proximity.note()));
    out
}

fn format_table(rows: &[ObservationResidual], dataset: &Dataset) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>6} {:>14} {:>14} {:>14}  {}\n",
        "row", "y_obs", "y_fit", "residual", "features"
    ));
    out.push_str(&format!("{:-<6} {:-<14} {:-<14} {:-<14}  {:-<8}\n", "", "", "", "", ""));

    for r in rows {
        let features = dataset.x.get(r.row).map(|x| fmt_vec(x)).unwrap_or_default();
        out.push_str(
            format!(
                "{:>6} {:>14.4} {:>14.4} {:>14.4}  {}\n",
                r.row + 1,
                r.y_obs,
                r.y_fit,
                r.residual,
                features
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn subscript(n: usize) -> String {
    const DIGITS: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];
    n.to_string()
        .chars()
        .map(|c| c.to_digit(10).map_or(c, |d| DIGITS[d as usize]))
        .collect()
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| x.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DatasetStats;
    use crate::report::{compute_residuals, rank_residuals};

    fn ingest() -> IngestedData {
        let dataset = Dataset {
            predictor_names: vec!["size".into(), "year".into()],
            response_name: "price".into(),
            x: vec![
                vec![1.0, 0.0],
                vec![2.0, 1.0],
                vec![3.0, 0.0],
                vec![4.0, 1.0],
                vec![5.0, 0.0],
            ],
            y: vec![3.0, 6.0, 7.5, 10.0, 11.0],
        };
        let stats = DatasetStats::compute(&dataset).unwrap();
        IngestedData {
            dataset,
            stats,
            row_errors: Vec::new(),
            rows_read: 5,
            rows_used: 5,
        }
    }

    #[test]
    fn summary_names_every_predictor() {
        let ingest = ingest();
        let model = RegressionModel::fit(&ingest.dataset.x, &ingest.dataset.y).unwrap();
        let text = format_run_summary(&ingest, &model);

        assert!(text.contains("Intercept (β₀)"));
        assert!(text.contains("size (β₁)"));
        assert!(text.contains("year (β₂)"));
        assert!(text.contains("explained by size and year"));
        assert!(text.contains("n=5"));
        assert!(text.contains("Predictor `size`: mean=3.0000 range=[1.0000, 5.0000]"));
        assert!(text.contains("Predictor `year`: mean=0.4000 range=[0.0000, 1.0000]"));
    }

    #[test]
    fn preview_limits_rows() {
        let ingest = ingest();
        let text = format_dataset_preview(&ingest.dataset, 2);
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("Row 2: [2, 1] -> 6"));
        assert!(format_dataset_preview(&ingest.dataset, 0).is_empty());
    }

    #[test]
    fn rankings_table_lists_rows() {
        let ingest = ingest();
        let model = RegressionModel::fit(&ingest.dataset.x, &ingest.dataset.y).unwrap();
        let residuals = compute_residuals(&model, &ingest.dataset).unwrap();
        let text = format_rankings(&rank_residuals(&residuals, 2), &ingest.dataset);
        assert!(text.contains("Largest positive residuals"));
        assert!(text.contains("Largest negative residuals"));
    }

    #[test]
    fn prediction_includes_note() {
        let names = vec!["size".to_string(), "year".to_string()];
        let text = format_prediction(&names, &[1500.0, 1999.0], "price", 123456.789, Proximity::Far);
        assert!(text.contains("size: 1500"));
        assert!(text.contains("Predicted price: 123456.79"));
        assert!(text.contains("far from training data"));
    }

    #[test]
    fn subscript_digits() {
        assert_eq!(subscript(12), "₁₂");
    }
}
