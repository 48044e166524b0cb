// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// A condition name paired with its associated symptom profile.
///
/// Symptoms keep the source dataset's spelling and column order; matching
/// applies its own case/separator-insensitive comparison key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionProfile {
    pub name: String,
    pub symptoms: Vec<String>,
}

/// A canonical symptom name plus the alternate phrasings that resolve to it.
/// Declaration order matters: the first group claiming a phrase wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymGroup {
    pub canonical: String,
    pub synonyms: Vec<String>,
}

/// Coarse bucket summarizing matched-symptom intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeverityLabel {
    Low,
    Moderate,
    High,
    Unknown,
}

impl fmt::Display for SeverityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SeverityLabel::Low => "Low",
            SeverityLabel::Moderate => "Moderate",
            SeverityLabel::High => "High",
            SeverityLabel::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// The outcome of one prediction call. Created fresh per call and owned
/// solely by the caller.
///
/// `confidence` is a heuristic match strength in `[0, 1]`, not a
/// probability, and never grounds for skipping professional evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub disease: String,
    /// Rounded to 3 decimals.
    pub confidence: f64,
    /// User tokens found in the winning condition, in user-input order.
    pub matched: Vec<String>,
    /// Condition symptoms the user did not report, capped at 10 entries.
    pub missing: Vec<String>,
    pub description: String,
    pub precautions: Vec<String>,
    pub severity: SeverityLabel,
    pub total_user_symptoms: usize,
    /// User tokens the winning condition did not account for.
    pub unmatched_user_symptoms: Vec<String>,
}

/// Detail view of a single condition, for the read-only lookup surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionInfo {
    pub name: String,
    pub symptoms: Vec<String>,
    pub description: String,
    pub precautions: Vec<String>,
    pub symptom_count: usize,
}

/// Load state of one reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStatus {
    /// The table was present and parsed.
    pub loaded: bool,
    /// The resulting structure holds at least one entry.
    pub populated: bool,
}

/// Per-table health probe for operational checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreHealth {
    pub conditions: TableStatus,
    pub descriptions: TableStatus,
    pub precautions: TableStatus,
    pub severities: TableStatus,
    pub synonyms: TableStatus,
}

impl StoreHealth {
    /// True when every table, optional ones included, is loaded and populated.
    pub fn fully_loaded(&self) -> bool {
        [
            self.conditions,
            self.descriptions,
            self.precautions,
            self.severities,
            self.synonyms,
        ]
        .iter()
        .all(|t| t.loaded && t.populated)
    }
}
