// src/lib.rs
//! Preliminary symptom-to-condition matching engine.
//!
//! Matches free-text, comma-separated symptom input against a small
//! reference dataset and returns the best candidate condition with a
//! heuristic confidence score. Not a medical diagnostic system.

pub mod core;
pub mod dataset;
pub mod error;

pub use crate::core::engine::TriageEngine;
pub use crate::core::store::ReferenceStore;
pub use crate::core::types::{PredictionResult, SeverityLabel};
pub use crate::error::EngineError;
