//! `mv-regress` library crate.
//!
//! The binary (`mvr`) is a thin wrapper around this library so that:
//!
//! - the regression core (`math`, `models`) is testable without spawning processes
//! - CSV ingest, reporting and model files stay separate from the numerics
//! - the model can be embedded elsewhere through `models::RegressionModel`

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
