//! CSV ingest and normalization.
//!
//! This module turns predictor/response CSV files into a clean [`Dataset`]
//! that is safe to fit.
//!
//! Design goals:
//! - **Tolerant number parsing**: comma decimals (`"1,5"`) are accepted
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no fitting logic here
//!
//! Two layouts are supported:
//! - two files: predictors (header + one column per predictor) and response
//!   (header + one value per line)
//! - one file with a named `--target` column holding the response

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::{debug, info, warn};

use crate::domain::{Dataset, DatasetStats, FitConfig};
use crate::error::AppError;
use crate::math::validate_design;

/// Which input a row error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFile {
    Predictors,
    Response,
}

impl fmt::Display for DataFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataFile::Predictors => write!(f, "predictors"),
            DataFile::Response => write!(f, "response"),
        }
    }
}

/// A row-level error encountered during ingest. The row was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub file: DataFile,
    pub line: usize,
    pub message: String,
}

/// Parsed predictor columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorTable {
    pub names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
}

/// Parsed response column.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseColumn {
    pub name: String,
    pub values: Vec<f64>,
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
}

/// Ingest output: dataset + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub dataset: Dataset,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load the dataset described by `config`.
pub fn load_dataset(config: &FitConfig) -> Result<IngestedData, AppError> {
    let predictors_file = open_csv(&config.predictors_path)?;

    let (table, response) = match (&config.target, &config.response_path) {
        (Some(target), _) => {
            info!(
                "Reading predictors and target `{target}` from {}",
                config.predictors_path.display()
            );
            read_with_target(predictors_file, config.delimiter, target)?
        }
        (None, Some(response_path)) => {
            info!("Reading predictor variables from {}", config.predictors_path.display());
            let table = read_predictors(predictors_file, config.delimiter)?;
            info!("Reading response variable from {}", response_path.display());
            let response = read_response(open_csv(response_path)?, config.delimiter)?;
            (table, response)
        }
        (None, None) => {
            return Err(AppError::new(
                2,
                "No response given: pass `--response <CSV>` or `--target <COLUMN>`.",
            ));
        }
    };

    for e in table.row_errors.iter().chain(&response.row_errors) {
        warn!("Skipping {} line {}: {}", e.file, e.line, e.message);
    }

    if table.rows.is_empty() {
        return Err(AppError::new(
            3,
            format!("No valid data found in '{}'.", config.predictors_path.display()),
        ));
    }
    if response.values.is_empty() {
        let path = config.response_path.as_deref().unwrap_or(config.predictors_path.as_path());
        return Err(AppError::new(3, format!("No valid data found in '{}'.", path.display())));
    }

    info!(
        "Loaded {} observations with {} predictors and {} response values",
        table.rows.len(),
        table.names.len(),
        response.values.len()
    );

    // Row counts must line up; the core reports a mismatch with both sizes.
    validate_design(&table.rows, &response.values).map_err(|e| {
        AppError::new(e.exit_code(), format!("Predictor and response data do not line up: {e}"))
    })?;

    let rows_read = table.rows_read;
    let mut row_errors = table.row_errors;
    row_errors.extend(response.row_errors);

    let dataset = Dataset {
        predictor_names: table.names,
        response_name: response.name,
        x: table.rows,
        y: response.values,
    };
    let stats = DatasetStats::compute(&dataset)
        .ok_or_else(|| AppError::new(3, "No valid rows remain after parsing."))?;
    let rows_used = dataset.y.len();

    Ok(IngestedData {
        dataset,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

/// Read a predictor table: a header row naming the columns, then one
/// observation per line.
///
/// The header defines the number of predictors. Extra trailing fields on a
/// data row are ignored; rows with too few fields or unparseable values are
/// skipped and recorded.
pub fn read_predictors<R: Read>(reader: R, delimiter: u8) -> Result<PredictorTable, AppError> {
    let mut reader = csv_reader(reader, delimiter);
    let headers = read_headers(&mut reader)?;
    let names: Vec<String> = headers.iter().map(normalize_header_name).collect();
    let p = names.len();

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        rows_read += 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    file: DataFile::Predictors,
                    line: idx + 2,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };
        let line = record_line(&record, idx);

        if record.len() > p {
            debug!("predictors line {line}: ignoring {} extra field(s)", record.len() - p);
        }
        match parse_fields(&record, 0..p) {
            Ok(values) => rows.push(values),
            Err(message) => row_errors.push(RowError {
                file: DataFile::Predictors,
                line,
                message,
            }),
        }
    }

    Ok(PredictorTable {
        names,
        rows,
        rows_read,
        row_errors,
    })
}

/// Read a response column: a header line, then one value per line.
///
/// Values that do not parse are retried after stripping everything except
/// digits, `.`, `,` and `-`; values that still fail are skipped and recorded.
pub fn read_response<R: Read>(reader: R, delimiter: u8) -> Result<ResponseColumn, AppError> {
    let mut reader = csv_reader(reader, delimiter);
    let headers = read_headers(&mut reader)?;
    let name = headers
        .get(0)
        .map(normalize_header_name)
        .unwrap_or_else(|| "y".to_string());

    let mut values = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        rows_read += 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    file: DataFile::Response,
                    line: idx + 2,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };
        let line = record_line(&record, idx);
        let text = response_text(&record, delimiter);

        if let Some(v) = parse_decimal(&text) {
            values.push(v);
            continue;
        }

        let cleaned = strip_non_numeric(&text);
        match parse_decimal(&cleaned) {
            Some(v) => {
                warn!("response line {line}: '{text}' is not a number, parsed '{cleaned}' as {v}");
                values.push(v);
            }
            None => row_errors.push(RowError {
                file: DataFile::Response,
                line,
                message: format!("Unable to parse '{text}' as a number."),
            }),
        }
    }

    Ok(ResponseColumn {
        name,
        values,
        rows_read,
        row_errors,
    })
}

/// Read a single table whose `target` column is the response and whose other
/// columns are predictors. A row with any unparseable value is skipped as a
/// whole so predictors and response stay aligned.
pub fn read_with_target<R: Read>(
    reader: R,
    delimiter: u8,
    target: &str,
) -> Result<(PredictorTable, ResponseColumn), AppError> {
    let mut reader = csv_reader(reader, delimiter);
    let headers = read_headers(&mut reader)?;
    let all_names: Vec<String> = headers.iter().map(normalize_header_name).collect();

    let wanted = normalize_header_name(target).to_ascii_lowercase();
    let target_idx = all_names
        .iter()
        .position(|n| n.to_ascii_lowercase() == wanted)
        .ok_or_else(|| AppError::new(2, format!("Missing target column: `{target}`")))?;
    if all_names.len() < 2 {
        return Err(AppError::new(
            2,
            "A target-column file needs at least one predictor column besides the target.",
        ));
    }

    let predictor_idx: Vec<usize> = (0..all_names.len()).filter(|&i| i != target_idx).collect();
    let names = predictor_idx.iter().map(|&i| all_names[i].clone()).collect();

    let mut rows = Vec::new();
    let mut values = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        rows_read += 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    file: DataFile::Predictors,
                    line: idx + 2,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };
        let line = record_line(&record, idx);

        let parsed = parse_fields(&record, predictor_idx.iter().copied())
            .and_then(|row| parse_fields(&record, [target_idx]).map(|y| (row, y[0])));
        match parsed {
            Ok((row, y)) => {
                rows.push(row);
                values.push(y);
            }
            Err(message) => row_errors.push(RowError {
                file: DataFile::Predictors,
                line,
                message,
            }),
        }
    }

    let table = PredictorTable {
        names,
        rows,
        rows_read,
        row_errors,
    };
    let response = ResponseColumn {
        name: all_names[target_idx].clone(),
        values,
        rows_read,
        row_errors: Vec::new(),
    };
    Ok((table, response))
}

/// Parse a number, accepting `,` as the decimal separator.
///
/// Returns `None` for empty, unparseable or non-finite input.
pub fn parse_decimal(s: &str) -> Option<f64> {
    let normalized = s.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    let v = normalized.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn strip_non_numeric(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect()
}

fn open_csv(path: &Path) -> Result<File, AppError> {
    File::open(path).map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))
}

fn csv_reader<R: Read>(reader: R, delimiter: u8) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn read_headers<R: Read>(reader: &mut csv::Reader<R>) -> Result<StringRecord, AppError> {
    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    if headers.iter().all(|h| normalize_header_name(h).is_empty()) {
        return Err(AppError::new(2, "Empty CSV: a header row is required."));
    }
    debug!("Header row: {}", headers.iter().collect::<Vec<_>>().join(","));
    Ok(headers)
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

/// 1-based file line of a record, falling back to the record index when the
/// reader did not track positions.
fn record_line(record: &StringRecord, idx: usize) -> usize {
    record
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(idx + 2)
}

fn parse_fields(
    record: &StringRecord,
    columns: impl IntoIterator<Item = usize>,
) -> Result<Vec<f64>, String> {
    columns
        .into_iter()
        .map(|j| {
            let raw = record
                .get(j)
                .ok_or_else(|| format!("Missing value in column {}.", j + 1))?;
            parse_decimal(raw).ok_or_else(|| format!("Invalid number '{raw}' in column {}.", j + 1))
        })
        .collect()
}

/// The text of a response line.
///
/// An unquoted comma decimal such as `12,5` splits into two fields under the
/// default delimiter; those are rejoined so `parse_decimal` sees `12,5`.
/// Three or more fields (e.g. `1,234,567`) are rejoined as well, which never
/// parses, so the line ends up as a row error instead of being truncated.
fn response_text(record: &StringRecord, delimiter: u8) -> String {
    if delimiter == b',' && record.len() > 2 {
        return record.iter().collect::<Vec<_>>().join(",");
    }
    match (record.get(0), record.get(1)) {
        (Some(int_part), Some(frac_part))
            if delimiter == b','
                && !frac_part.is_empty()
                && frac_part.chars().all(|c| c.is_ascii_digit()) =>
        {
            format!("{int_part},{frac_part}")
        }
        (Some(first), _) => first.to_string(),
        (None, _) => String::new(),
    }
}
