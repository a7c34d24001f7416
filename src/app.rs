//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - runs the fit pipeline and prints reports
//! - writes optional exports
//! - serves predictions from saved models

use std::io;
use std::path::Path;

use clap::Parser;
use log::info;

use crate::cli::{Command, FitArgs, InteractiveArgs, PredictArgs, SampleArgs, parse_feature_list};
use crate::domain::{FitConfig, ModelFile, SampleConfig};
use crate::error::AppError;

pub mod interactive;
pub mod pipeline;

use interactive::{Session, run_interactive};

/// Entry point for the `mvr` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `mvr -p x.csv -r y.csv` behaves like `mvr fit -p x.csv -r y.csv`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Predict(args) => handle_predict(args),
        Command::Interactive(args) => handle_interactive(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args)?;
    let run = pipeline::run_fit(&config)?;

    let preview = crate::report::format_dataset_preview(&run.ingest.dataset, config.preview_rows);
    if !preview.is_empty() {
        println!("{preview}");
    }
    println!("{}", crate::report::format_run_summary(&run.ingest, &run.model));

    if config.top_n > 0 {
        println!(
            "{}",
            crate::report::format_rankings(&run.ranking, &run.ingest.dataset)
        );
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.ingest.dataset, &run.residuals)?;
        info!("wrote residuals to {}", path.display());
    }
    if let Some(path) = &config.export_model {
        crate::io::model_file::write_model_json(path, &run.model, &run.ingest)?;
        info!("wrote model to {}", path.display());
    }

    if config.interactive {
        let session = Session {
            model: &run.model,
            predictor_names: &run.ingest.dataset.predictor_names,
            predictor_means: &run.ingest.stats.predictor_means,
            response_name: &run.ingest.dataset.response_name,
        };
        run_interactive(&session, io::stdin().lock(), io::stdout().lock())?;
    }

    Ok(())
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let (saved, model) = load_model(&args.model)?;

    for raw in &args.features {
        let features = parse_feature_list(raw).map_err(|msg| AppError::new(2, msg))?;
        let prediction = model.predict(&features)?;
        let proximity = crate::report::assess_proximity(&features, &saved.predictor_means);
        println!(
            "{}",
            crate::report::format_prediction(
                &saved.predictors,
                &features,
                &saved.response,
                prediction,
                proximity
            )
        );
    }

    Ok(())
}

fn handle_interactive(args: InteractiveArgs) -> Result<(), AppError> {
    let (saved, model) = load_model(&args.model)?;
    let session = Session {
        model: &model,
        predictor_names: &saved.predictors,
        predictor_means: &saved.predictor_means,
        response_name: &saved.response,
    };
    let n = run_interactive(&session, io::stdin().lock(), io::stdout().lock())?;
    info!("{n} predictions made");
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        rows: args.rows,
        seed: args.seed,
        intercept: args.intercept,
        coefficients: args.coefficients,
        noise_sd: args.noise,
        feature_min: args.feature_min,
        feature_max: args.feature_max,
    };
    let sample = crate::data::generate_sample(&config)?;
    let (predictors, response) = crate::data::write_sample_csvs(&sample.dataset, &args.out_dir)?;

    println!(
        "Wrote {} rows: {} and {}",
        sample.stats.n_rows,
        predictors.display(),
        response.display()
    );
    Ok(())
}

fn load_model(path: &Path) -> Result<(ModelFile, crate::models::RegressionModel), AppError> {
    let saved = crate::io::model_file::read_model_json(path)?;
    let model = saved.to_model()?;
    info!(
        "loaded model for `{}` ({} predictors, fitted {})",
        saved.response,
        saved.predictors.len(),
        saved.fitted_at.format("%Y-%m-%d %H:%M UTC")
    );
    Ok((saved, model))
}

pub fn fit_config_from_args(args: &FitArgs) -> Result<FitConfig, AppError> {
    if args.response.is_none() && args.target.is_none() {
        return Err(AppError::new(
            2,
            "Provide a response file (--response / MVR_RESPONSE) or a --target column.",
        ));
    }
    let delimiter = u8::try_from(args.delimiter)
        .ok()
        .filter(|b| b.is_ascii())
        .ok_or_else(|| AppError::new(2, format!("Delimiter '{}' must be a single ASCII character.", args.delimiter)))?;

    Ok(FitConfig {
        predictors_path: args.predictors.clone(),
        response_path: args.response.clone(),
        target: args.target.clone(),
        delimiter,
        preview_rows: args.preview,
        top_n: args.top,
        export_results: args.export.clone(),
        export_model: args.export_model.clone(),
        interactive: args.interactive,
    })
}

/// Rewrite argv so flag-only invocations default to `mvr fit`.
///
/// Rules:
/// - `mvr`                     -> unchanged (clap prints usage)
/// - `mvr -p x.csv ...`        -> `mvr fit -p x.csv ...`
/// - `mvr --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "fit".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flags_only_invocation_becomes_fit() {
        assert_eq!(
            rewrite_args(argv(&["mvr", "-p", "x.csv", "-r", "y.csv"])),
            argv(&["mvr", "fit", "-p", "x.csv", "-r", "y.csv"])
        );
        assert_eq!(rewrite_args(argv(&["mvr", "--help"])), argv(&["mvr", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["mvr", "predict", "-m", "m.json"])),
            argv(&["mvr", "predict", "-m", "m.json"])
        );
        assert_eq!(rewrite_args(argv(&["mvr"])), argv(&["mvr"]));
    }

    fn fit_args() -> FitArgs {
        FitArgs {
            predictors: PathBuf::from("x.csv"),
            response: Some(PathBuf::from("y.csv")),
            target: None,
            delimiter: ';',
            preview: 3,
            top: 2,
            export: None,
            export_model: Some(PathBuf::from("model.json")),
            interactive: false,
        }
    }

    #[test]
    fn config_carries_cli_options() {
        let config = fit_config_from_args(&fit_args()).unwrap();
        assert_eq!(config.delimiter, b';');
        assert_eq!(config.preview_rows, 3);
        assert_eq!(config.top_n, 2);
        assert_eq!(config.export_model, Some(PathBuf::from("model.json")));
    }

    #[test]
    fn config_requires_a_response_source() {
        let mut args = fit_args();
        args.response = None;
        assert_eq!(fit_config_from_args(&args).unwrap_err().exit_code(), 2);

        args.target = Some("price".into());
        assert!(fit_config_from_args(&args).is_ok());
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let mut args = fit_args();
        args.delimiter = 'é';
        assert_eq!(fit_config_from_args(&args).unwrap_err().exit_code(), 2);
    }
}
