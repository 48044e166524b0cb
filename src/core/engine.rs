// File: src/core/engine.rs
//! The prediction engine: normalize, select the best candidate, assemble
//! the response.
//!
//! Output is a preliminary, non-authoritative assessment. Every response
//! path keeps the consult-a-professional framing; none claims certainty.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use tracing::error;

use crate::core::matching::match_symptoms;
use crate::core::normalize::normalize;
use crate::core::scoring::{classify_severity, weighted_score};
use crate::core::store::ReferenceStore;
use crate::core::types::{ConditionInfo, PredictionResult, SeverityLabel, StoreHealth};
use crate::error::EngineError;

/// Missing-symptom lists are truncated to this many entries.
const MISSING_LIMIT: usize = 10;

const ERROR_LABEL: &str = "Error";
const NO_MATCH_LABEL: &str = "Unknown Condition";

const EMPTY_INPUT_MESSAGE: &str = "No symptoms provided";
const UNUSABLE_INPUT_MESSAGE: &str = "No valid symptoms found after processing";
const PROCESSING_FAILURE_MESSAGE: &str = "Error analyzing symptoms";

const DESCRIPTION_FALLBACK: &str = "No detailed description available for this condition.";
const INFO_DESCRIPTION_FALLBACK: &str = "No description available";

const PRECAUTION_FALLBACK: [&str; 4] = [
    "Monitor your symptoms carefully",
    "Stay well hydrated",
    "Get adequate rest",
    "Consult a healthcare professional if symptoms persist or worsen",
];

const ERROR_PRECAUTIONS: [&str; 1] = ["Please consult a healthcare professional"];

const NO_MATCH_DESCRIPTION: &str = "Your symptoms don't match our database patterns. \
This could mean:\n\
\u{2022} Your symptoms are too general\n\
\u{2022} You may have a rare condition\n\
\u{2022} Symptoms need more specific description\n\n\
Please consult a healthcare professional for proper evaluation.";

const NO_MATCH_PRECAUTIONS: [&str; 4] = [
    "Consult a doctor for proper diagnosis",
    "Monitor your symptoms closely",
    "Note any changes or new symptoms",
    "Seek immediate care if symptoms worsen",
];

struct BestMatch {
    index: usize,
    score: f64,
    matched: Vec<String>,
    missing: Vec<String>,
}

/// The engine holds one immutable [`ReferenceStore`]; callers construct it
/// explicitly and keep it wherever predictions are issued. Prediction calls
/// are pure reads and safe to issue concurrently.
pub struct TriageEngine {
    store: ReferenceStore,
}

impl TriageEngine {
    pub fn new(store: ReferenceStore) -> Self {
        Self { store }
    }

    pub fn from_dir(dir: &Path) -> Result<Self, EngineError> {
        Ok(Self::new(ReferenceStore::from_dir(dir)?))
    }

    pub fn store(&self) -> &ReferenceStore {
        &self.store
    }

    /// Predict the most likely condition for raw comma-separated symptom
    /// text. Always returns a fully formed result: empty input, unusable
    /// input, no match, and internal failure each map to a dedicated
    /// response shape rather than an error.
    pub fn predict(&self, raw_text: &str) -> PredictionResult {
        if raw_text.trim().is_empty() {
            return error_response(EMPTY_INPUT_MESSAGE);
        }

        // The pipeline is pure computation over immutable tables; a panic
        // here is a bug, but it must not escape the prediction boundary.
        match catch_unwind(AssertUnwindSafe(|| self.run_pipeline(raw_text))) {
            Ok(result) => result,
            Err(_) => {
                error!("prediction pipeline panicked, returning generic failure response");
                error_response(PROCESSING_FAILURE_MESSAGE)
            }
        }
    }

    /// All condition names, in store order.
    pub fn condition_names(&self) -> Vec<&str> {
        self.store
            .conditions()
            .iter()
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Detail view of one condition, or `None` if the name is unknown.
    pub fn condition_info(&self, name: &str) -> Option<ConditionInfo> {
        let profile = self.store.profile(name)?;
        Some(ConditionInfo {
            name: profile.name.clone(),
            symptoms: profile.symptoms.clone(),
            description: self
                .store
                .description(name)
                .unwrap_or(INFO_DESCRIPTION_FALLBACK)
                .to_string(),
            precautions: self
                .store
                .precautions(name)
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
            symptom_count: profile.symptoms.len(),
        })
    }

    /// Per-table load status, for operational health checks.
    pub fn health(&self) -> StoreHealth {
        self.store.health()
    }

    fn run_pipeline(&self, raw_text: &str) -> PredictionResult {
        let user_symptoms = normalize(raw_text, self.store.synonyms());
        if user_symptoms.is_empty() {
            return error_response(UNUSABLE_INPUT_MESSAGE);
        }

        match self.best_candidate(&user_symptoms) {
            Some(best) => self.match_response(best, &user_symptoms),
            None => no_match_response(user_symptoms),
        }
    }

    /// Iterate every non-empty profile and keep the best-scoring candidate.
    ///
    /// Strict improvement only: the first condition to reach the maximum
    /// score wins ties, making store order the documented tie-break.
    fn best_candidate(&self, user_symptoms: &[String]) -> Option<BestMatch> {
        let mut best: Option<BestMatch> = None;

        for (index, profile) in self.store.conditions().iter().enumerate() {
            if profile.symptoms.is_empty() {
                continue;
            }

            let (matched, missing) = match_symptoms(user_symptoms, &profile.symptoms);
            let score = weighted_score(
                &matched,
                profile.symptoms.len(),
                user_symptoms,
                self.store.severities(),
            );

            if score > best.as_ref().map_or(0.0, |b| b.score) {
                best = Some(BestMatch {
                    index,
                    score,
                    matched,
                    missing,
                });
            }
        }

        best
    }

    fn match_response(&self, best: BestMatch, user_symptoms: &[String]) -> PredictionResult {
        let profile = &self.store.conditions()[best.index];

        let description = self
            .store
            .description(&profile.name)
            .unwrap_or(DESCRIPTION_FALLBACK)
            .to_string();
        let precautions = self
            .store
            .precautions(&profile.name)
            .map(<[String]>::to_vec)
            .unwrap_or_else(|| owned(&PRECAUTION_FALLBACK));

        let severity = classify_severity(&best.matched, self.store.severities());
        let unmatched_user_symptoms = user_symptoms
            .iter()
            .filter(|s| !best.matched.contains(s))
            .cloned()
            .collect();

        let mut missing = best.missing;
        missing.truncate(MISSING_LIMIT);

        PredictionResult {
            disease: profile.name.clone(),
            confidence: round3(best.score),
            matched: best.matched,
            missing,
            description,
            precautions,
            severity,
            total_user_symptoms: user_symptoms.len(),
            unmatched_user_symptoms,
        }
    }
}

fn no_match_response(user_symptoms: Vec<String>) -> PredictionResult {
    PredictionResult {
        disease: NO_MATCH_LABEL.to_string(),
        confidence: 0.0,
        matched: Vec::new(),
        missing: Vec::new(),
        description: NO_MATCH_DESCRIPTION.to_string(),
        precautions: owned(&NO_MATCH_PRECAUTIONS),
        severity: SeverityLabel::Unknown,
        total_user_symptoms: user_symptoms.len(),
        unmatched_user_symptoms: user_symptoms,
    }
}

fn error_response(message: &str) -> PredictionResult {
    PredictionResult {
        disease: ERROR_LABEL.to_string(),
        confidence: 0.0,
        matched: Vec::new(),
        missing: Vec::new(),
        description: message.to_string(),
        precautions: owned(&ERROR_PRECAUTIONS),
        severity: SeverityLabel::Unknown,
        total_user_symptoms: 0,
        unmatched_user_symptoms: Vec::new(),
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{RawTables, Table};

    fn store() -> ReferenceStore {
        let conditions = Table {
            headers: vec![
                "prognosis".into(),
                "fever".into(),
                "cough".into(),
                "fatigue".into(),
                "sneezing".into(),
            ],
            rows: vec![
                vec!["Flu".into(), "1".into(), "1".into(), "1".into(), "0".into()],
                vec![
                    "Allergy".into(),
                    "0".into(),
                    "0".into(),
                    "0".into(),
                    "1".into(),
                ],
            ],
        };
        ReferenceStore::from_tables(RawTables {
            conditions: Some(conditions),
            ..RawTables::default()
        })
        .unwrap()
    }

    #[test]
    fn test_empty_input_error_variant() {
        let engine = TriageEngine::new(store());
        let result = engine.predict("   ");
        assert_eq!(result.disease, "Error");
        assert_eq!(result.confidence, 0.0);
        assert!(result.matched.is_empty());
        assert!(result.missing.is_empty());
        assert_eq!(result.severity, SeverityLabel::Unknown);
        assert_eq!(result.description, "No symptoms provided");
    }

    #[test]
    fn test_unusable_input_is_distinguished_from_empty() {
        let engine = TriageEngine::new(store());
        let result = engine.predict("?!, ...");
        assert_eq!(result.disease, "Error");
        assert_eq!(result.description, "No valid symptoms found after processing");
    }

    #[test]
    fn test_no_match_variant_carries_all_user_tokens() {
        let engine = TriageEngine::new(store());
        let result = engine.predict("xyznonexistent");
        assert_eq!(result.disease, "Unknown Condition");
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.unmatched_user_symptoms, vec!["xyznonexistent"]);
        assert_eq!(result.total_user_symptoms, 1);
    }

    #[test]
    fn test_successful_match_shape() {
        let engine = TriageEngine::new(store());
        let result = engine.predict("fever, cough");
        assert_eq!(result.disease, "Flu");
        assert_eq!(result.matched, vec!["fever", "cough"]);
        assert_eq!(result.missing, vec!["fatigue"]);
        assert!((result.confidence - 0.667).abs() < 1e-9);
        assert_eq!(result.total_user_symptoms, 2);
        assert!(result.unmatched_user_symptoms.is_empty());
        // No severity table loaded, so the label stays Unknown.
        assert_eq!(result.severity, SeverityLabel::Unknown);
    }

    #[test]
    fn test_tie_break_prefers_store_order() {
        let conditions = Table {
            headers: vec!["prognosis".into(), "fever".into()],
            rows: vec![
                vec!["First".into(), "1".into()],
                vec!["Second".into(), "1".into()],
            ],
        };
        let store = ReferenceStore::from_tables(RawTables {
            conditions: Some(conditions),
            ..RawTables::default()
        })
        .unwrap();
        let engine = TriageEngine::new(store);
        assert_eq!(engine.predict("fever").disease, "First");
    }

    #[test]
    fn test_missing_list_is_capped() {
        let mut headers = vec!["prognosis".into(), "fever".into()];
        let mut row = vec!["Sprawling".into(), "1".into()];
        for i in 0..14 {
            headers.push(format!("symptom_{i}"));
            row.push("1".into());
        }
        let store = ReferenceStore::from_tables(RawTables {
            conditions: Some(Table {
                headers,
                rows: vec![row],
            }),
            ..RawTables::default()
        })
        .unwrap();
        let engine = TriageEngine::new(store);
        let result = engine.predict("fever");
        assert_eq!(result.disease, "Sprawling");
        assert_eq!(result.missing.len(), 10);
    }

    #[test]
    fn test_condition_surface() {
        let engine = TriageEngine::new(store());
        assert_eq!(engine.condition_names(), vec!["Flu", "Allergy"]);

        let info = engine.condition_info("Flu").unwrap();
        assert_eq!(info.symptom_count, 3);
        assert_eq!(info.description, "No description available");
        assert!(info.precautions.is_empty());

        assert!(engine.condition_info("Nope").is_none());
    }

    #[test]
    fn test_fallback_description_and_precautions_on_match() {
        let engine = TriageEngine::new(store());
        let result = engine.predict("sneezing");
        assert_eq!(result.disease, "Allergy");
        assert_eq!(
            result.description,
            "No detailed description available for this condition."
        );
        assert_eq!(result.precautions.len(), 4);
    }
}
