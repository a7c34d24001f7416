//! Fitted regression models.
//!
//! The model owns only its fitted parameters and diagnostics; the training
//! data is borrowed during `fit` and never retained.

pub mod model;

pub use model::*;
