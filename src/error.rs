// File: src/error.rs
//! Error types for the triage engine.
//!
//! Only reference-data problems surface as `Err` values: a missing or
//! malformed condition table aborts construction, while secondary tables
//! degrade with a logged warning. Bad user input never produces an error;
//! `predict` always returns a fully formed [`PredictionResult`].
//!
//! [`PredictionResult`]: crate::core::types::PredictionResult

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Required reference data missing: {0}")]
    MissingData(String),

    #[error("Malformed reference data: {0}")]
    StructuralData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
