//! Interactive prediction loop.
//!
//! Prompts for each predictor by name, prints the prediction with a confidence
//! note, and repeats. A negative value or end of input stops the loop.
//!
//! The loop is generic over its input/output so tests can drive it with
//! in-memory buffers.

use std::io::{BufRead, Write};

use crate::error::AppError;
use crate::io::ingest::parse_decimal;
use crate::models::RegressionModel;
use crate::report::{assess_proximity, format_prediction};

/// What the loop needs to know about a fitted model.
#[derive(Debug, Clone, Copy)]
pub struct Session<'a> {
    pub model: &'a RegressionModel,
    pub predictor_names: &'a [String],
    pub predictor_means: &'a [f64],
    pub response_name: &'a str,
}

enum Entry {
    Value(f64),
    Stop,
}

/// Run the loop until the user stops it. Returns the number of predictions made.
pub fn run_interactive<R: BufRead, W: Write>(
    session: &Session<'_>,
    mut input: R,
    mut output: W,
) -> Result<usize, AppError> {
    writeln!(output, "Enter a negative value to exit.").map_err(write_error)?;

    let mut predictions = 0;
    loop {
        let mut features = Vec::with_capacity(session.predictor_names.len());
        for name in session.predictor_names {
            match read_entry(name, &mut input, &mut output)? {
                Entry::Value(v) => features.push(v),
                Entry::Stop => {
                    writeln!(output, "Exiting.").map_err(write_error)?;
                    return Ok(predictions);
                }
            }
        }

        let prediction = session.model.predict(&features)?;
        let proximity = assess_proximity(&features, session.predictor_means);
        log::debug!("interactive prediction {prediction} for {features:?}");
        write!(
            output,
            "{}",
            format_prediction(
                session.predictor_names,
                &features,
                session.response_name,
                prediction,
                proximity
            )
        )
        .map_err(write_error)?;
        predictions += 1;
    }
}

fn read_entry<R: BufRead, W: Write>(name: &str, input: &mut R, output: &mut W) -> Result<Entry, AppError> {
    loop {
        write!(output, "Enter {name}: ").map_err(write_error)?;
        output.flush().map_err(write_error)?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;
        if read == 0 {
            return Ok(Entry::Stop);
        }

        match parse_decimal(&line) {
            Some(v) if v < 0.0 => return Ok(Entry::Stop),
            Some(v) => return Ok(Entry::Value(v)),
            None => {
                writeln!(output, "Invalid input '{}'. Please enter a number.", line.trim()).map_err(write_error)?;
            }
        }
    }
}

fn write_error(e: std::io::Error) -> AppError {
    AppError::new(4, format!("Failed to write output: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn model() -> RegressionModel {
        // y = 1 + 2·size + 3·age on a small non-collinear grid.
        let x = vec![
            vec![1.0, 1.0],
            vec![2.0, 1.0],
            vec![3.0, 2.0],
            vec![4.0, 3.0],
            vec![5.0, 5.0],
        ];
        let y: Vec<f64> = x.iter().map(|r| 1.0 + 2.0 * r[0] + 3.0 * r[1]).collect();
        RegressionModel::fit(&x, &y).unwrap()
    }

    fn run(input: &str) -> (usize, String) {
        let model = model();
        let names = vec!["size".to_string(), "age".to_string()];
        let means = vec![3.0, 2.4];
        let session = Session {
            model: &model,
            predictor_names: &names,
            predictor_means: &means,
            response_name: "price",
        };
        let mut out = Vec::new();
        let n = run_interactive(&session, Cursor::new(input.as_bytes()), &mut out).unwrap();
        (n, String::from_utf8(out).unwrap())
    }

    #[test]
    fn predicts_until_negative_sentinel() {
        let (n, out) = run("3\n2\n4\n3\n-1\n");
        assert_eq!(n, 2);
        assert!(out.contains("Enter size: "));
        assert!(out.contains("Enter age: "));
        assert!(out.contains("Predicted price: 13.00"));
        assert!(out.contains("Predicted price: 18.00"));
        assert!(out.ends_with("Exiting.\n"));
    }

    #[test]
    fn invalid_entry_reprompts_same_predictor() {
        let (n, out) = run("abc\n3\n2\n");
        assert_eq!(n, 1);
        assert!(out.contains("Invalid input 'abc'"));
        assert_eq!(out.matches("Enter size: ").count(), 3);
        assert!(out.contains("Predicted price: 13.00"));
    }

    #[test]
    fn eof_stops_mid_round() {
        let (n, out) = run("3\n");
        assert_eq!(n, 0);
        assert!(!out.contains("Predicted"));
        assert!(out.contains("Exiting."));
    }

    #[test]
    fn comma_decimals_are_accepted() {
        let (n, out) = run("2,5\n1\n");
        assert_eq!(n, 1);
        assert!(out.contains("Predicted price: 9.00"));
    }
}
