//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - run configuration (`FitConfig`, `SampleConfig`)
//! - parsed observations and their summary (`Dataset`, `DatasetStats`)
//! - fit outputs (`ObservationResidual`, `ModelFile`)

pub mod types;

pub use types::*;
