// File: src/core/matching.rs
//! Symptom overlap between a user's tokens and one condition profile.

use std::collections::HashSet;

/// Comparison key: lowercase with underscores folded to spaces.
///
/// Hyphens are left alone on purpose. This runs against already-normalized
/// condition data, where underscore-vs-space is the only spelling variance
/// that actually occurs; the normalizer handles hyphen variance upstream.
pub fn comparison_key(symptom: &str) -> String {
    symptom.to_lowercase().replace('_', " ")
}

/// Split a condition's symptom set into the user tokens it accounts for and
/// the condition symptoms the user did not report.
///
/// `matched` keeps the user's spelling in user-token order; `missing` keeps
/// the condition's spelling in profile order. Both inputs are unique, so
/// both outputs are too.
pub fn match_symptoms(
    user_tokens: &[String],
    condition_symptoms: &[String],
) -> (Vec<String>, Vec<String>) {
    let condition_keys: HashSet<String> = condition_symptoms
        .iter()
        .map(|s| comparison_key(s))
        .collect();
    let user_keys: HashSet<String> = user_tokens.iter().map(|s| comparison_key(s)).collect();

    let matched = user_tokens
        .iter()
        .filter(|s| condition_keys.contains(&comparison_key(s)))
        .cloned()
        .collect();

    let missing = condition_symptoms
        .iter()
        .filter(|s| !user_keys.contains(&comparison_key(s)))
        .cloned()
        .collect();

    (matched, missing)
}
