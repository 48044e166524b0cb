// File: src/core/scoring.rs
//! Confidence scoring and severity classification.
//!
//! Two different defaults apply to symptoms absent from the severity table:
//! weight 1 in the confidence blend, 0 in the severity classification. The
//! asymmetry is inherited behavior; unifying it would silently change
//! scores.

use std::collections::HashMap;

use crate::core::types::SeverityLabel;

const BASE_WEIGHT: f64 = 0.7;
const SEVERITY_WEIGHT: f64 = 0.3;

/// Weighted confidence for a candidate condition, in `[0, 1]`.
///
/// The base is the match ratio. When a severity table is present, a
/// severity-weighted overlap ratio is blended in at 30%, damped so a single
/// severe symptom cannot dominate broad overlap.
pub fn weighted_score(
    matched: &[String],
    total_condition_symptoms: usize,
    user_symptoms: &[String],
    severities: &HashMap<String, u32>,
) -> f64 {
    if total_condition_symptoms == 0 {
        return 0.0;
    }

    let base_score = matched.len() as f64 / total_condition_symptoms as f64;

    if severities.is_empty() {
        return base_score;
    }

    let matched_severity: u32 = matched
        .iter()
        .map(|s| severities.get(s).copied().unwrap_or(1))
        .sum();
    let total_severity: u32 = user_symptoms
        .iter()
        .map(|s| severities.get(s).copied().unwrap_or(1))
        .sum();

    if total_severity == 0 {
        return base_score;
    }

    let severity_ratio = matched_severity as f64 / total_severity as f64;
    (base_score * BASE_WEIGHT + severity_ratio * SEVERITY_WEIGHT).min(1.0)
}

/// Classify matched symptoms into a coarse severity bucket.
///
/// Unknown when nothing matched, no severity table is available, or every
/// matched symptom resolves to severity 0.
pub fn classify_severity(
    matched: &[String],
    severities: &HashMap<String, u32>,
) -> SeverityLabel {
    if matched.is_empty() || severities.is_empty() {
        return SeverityLabel::Unknown;
    }

    let resolved: Vec<u32> = matched
        .iter()
        .map(|s| severities.get(s).copied().unwrap_or(0))
        .collect();

    let max = resolved.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return SeverityLabel::Unknown;
    }

    let avg = resolved.iter().sum::<u32>() as f64 / resolved.len() as f64;

    if max >= 6 || avg >= 5.0 {
        SeverityLabel::High
    } else if max >= 4 || avg >= 3.0 {
        SeverityLabel::Moderate
    } else {
        SeverityLabel::Low
    }
}
