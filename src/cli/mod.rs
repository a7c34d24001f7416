//! Command-line parsing for the regression tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mvr", version, about = "Multivariate linear regression (ordinary least squares)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a model from CSV data and print coefficients and diagnostics.
    Fit(FitArgs),
    /// Predict responses with a saved model.
    Predict(PredictArgs),
    /// Read feature values from stdin and predict until a negative value is entered.
    Interactive(InteractiveArgs),
    /// Write a synthetic predictors/response CSV pair.
    Sample(SampleArgs),
}

/// Options for fitting.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Predictors CSV (header row + one column per predictor).
    #[arg(short = 'p', long, env = "MVR_PREDICTORS", value_name = "CSV")]
    pub predictors: PathBuf,

    /// Response CSV (header row + one value per line).
    #[arg(short = 'r', long, env = "MVR_RESPONSE", value_name = "CSV", conflicts_with = "target")]
    pub response: Option<PathBuf>,

    /// Take the response from this column of the predictors CSV instead.
    #[arg(short = 't', long, value_name = "COLUMN")]
    pub target: Option<String>,

    /// CSV field delimiter.
    #[arg(short = 'd', long, default_value_t = ',')]
    pub delimiter: char,

    /// Number of loaded rows to echo before fitting.
    #[arg(long, default_value_t = 5)]
    pub preview: usize,

    /// Show the N largest residuals on each side.
    #[arg(long, default_value_t = 0)]
    pub top: usize,

    /// Export per-row observed/fitted/residual values to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Save the fitted model as JSON.
    #[arg(long = "export-model", value_name = "JSON")]
    pub export_model: Option<PathBuf>,

    /// Start the interactive prediction loop after fitting.
    #[arg(short = 'i', long)]
    pub interactive: bool,
}

/// Options for one-shot predictions.
#[derive(Debug, Parser)]
pub struct PredictArgs {
    /// Model JSON produced by `mvr fit --export-model`.
    #[arg(short = 'm', long, env = "MVR_MODEL", value_name = "JSON")]
    pub model: PathBuf,

    /// Feature values in predictor order, e.g. `1200,1990` or `"1200 1990"`.
    /// Repeat the flag to predict several rows.
    #[arg(short = 'f', long = "features", required = true, value_name = "VALUES")]
    pub features: Vec<String>,
}

/// Options for the interactive loop on a saved model.
#[derive(Debug, Parser)]
pub struct InteractiveArgs {
    /// Model JSON produced by `mvr fit --export-model`.
    #[arg(short = 'm', long, env = "MVR_MODEL", value_name = "JSON")]
    pub model: PathBuf,
}

/// Options for synthetic sample generation.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Directory receiving `predictors.csv` and `response.csv`.
    #[arg(short = 'o', long, value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Number of observations.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub rows: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Intercept of the generating model.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub intercept: f64,

    /// Coefficients of the generating model, one per predictor.
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = [2.0, -0.5],
        allow_hyphen_values = true
    )]
    pub coefficients: Vec<f64>,

    /// Standard deviation of the Gaussian noise.
    #[arg(long, default_value_t = 1.0)]
    pub noise: f64,

    /// Lower bound of the uniform predictor range.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub feature_min: f64,

    /// Upper bound of the uniform predictor range.
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub feature_max: f64,
}

/// Split a `--features` value into numbers.
///
/// Values may be separated by commas, semicolons or whitespace.
pub fn parse_feature_list(s: &str) -> Result<Vec<f64>, String> {
    s.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("Invalid feature value '{t}'."))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_fit_with_target() {
        let cli = Cli::try_parse_from(["mvr", "fit", "-p", "houses.csv", "--target", "price", "--top", "3"]).unwrap();
        match cli.command {
            Command::Fit(args) => {
                assert_eq!(args.predictors, PathBuf::from("houses.csv"));
                assert_eq!(args.target.as_deref(), Some("price"));
                assert!(args.response.is_none());
                assert_eq!(args.top, 3);
                assert_eq!(args.delimiter, ',');
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn response_and_target_conflict() {
        let res = Cli::try_parse_from(["mvr", "fit", "-p", "x.csv", "-r", "y.csv", "-t", "price"]);
        assert!(res.is_err());
    }

    #[test]
    fn sample_accepts_negative_coefficients() {
        let cli = Cli::try_parse_from(["mvr", "sample", "-o", "out", "--coefficients", "-1.5,2"]).unwrap();
        match cli.command {
            Command::Sample(args) => assert_eq!(args.coefficients, vec![-1.5, 2.0]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn feature_lists_accept_common_separators() {
        assert_eq!(parse_feature_list("1200,1990").unwrap(), vec![1200.0, 1990.0]);
        assert_eq!(parse_feature_list("1.5 2.5").unwrap(), vec![1.5, 2.5]);
        assert_eq!(parse_feature_list("1;2; 3").unwrap(), vec![1.0, 2.0, 3.0]);
        assert!(parse_feature_list("1,abc").is_err());
    }
}
