// File: src/core/normalize.rs
//! Raw symptom text to canonical token lists.
//!
//! Input is comma-separated free text. Each segment is lowercased, stripped
//! of punctuation, whitespace-collapsed, and resolved through the synonym
//! index; the result is deduplicated in first-occurrence order.

use std::collections::HashSet;

use crate::core::types::SynonymGroup;

/// Ordered synonym groups. Resolution walks groups in load order, so the
/// first group claiming a phrase wins.
#[derive(Debug, Clone, Default)]
pub struct SynonymIndex {
    groups: Vec<SynonymGroup>,
}

impl SynonymIndex {
    pub fn new(groups: Vec<SynonymGroup>) -> Self {
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Resolve a cleaned segment to its canonical symptom name.
    ///
    /// Two passes over the groups: an exact pass first, so dataset
    /// spellings match without any transformation cost, then a fallback
    /// pass with underscores and hyphens folded to spaces on both sides.
    /// Unresolved segments pass through unchanged.
    pub fn resolve(&self, segment: &str) -> String {
        for group in &self.groups {
            if segment == group.canonical || group.synonyms.iter().any(|s| s == segment) {
                return group.canonical.clone();
            }
        }

        let folded = fold_separators(segment);
        for group in &self.groups {
            if fold_separators(&group.canonical) == folded
                || group
                    .synonyms
                    .iter()
                    .any(|s| fold_separators(s) == folded)
            {
                return group.canonical.clone();
            }
        }

        segment.to_string()
    }
}

/// Convert raw input text to a deduplicated list of symptom tokens.
///
/// Empty or whitespace-only input yields an empty list, not an error.
pub fn normalize(text: &str, synonyms: &SynonymIndex) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut tokens = Vec::new();

    for segment in text.split(',') {
        let segment = segment.trim().to_lowercase();
        if segment.is_empty() {
            continue;
        }

        let cleaned = clean_segment(&segment);
        if cleaned.is_empty() {
            continue;
        }

        let token = synonyms.resolve(&cleaned);
        if seen.insert(token.clone()) {
            tokens.push(token);
        }
    }

    tokens
}

/// Strip everything but alphanumerics, internal whitespace, hyphens and
/// underscores, then collapse whitespace runs to single spaces.
fn clean_segment(segment: &str) -> String {
    let kept: String = segment
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(*c, '-' | '_'))
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn fold_separators(s: &str) -> String {
    s.replace(['_', '-'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SynonymIndex {
        SynonymIndex::new(vec![
            SynonymGroup {
                canonical: "fever".into(),
                synonyms: vec!["high temperature".into(), "pyrexia".into()],
            },
            SynonymGroup {
                canonical: "sore_throat".into(),
                synonyms: vec!["throat pain".into()],
            },
            // Second group also claims "pyrexia"; the first one must win.
            SynonymGroup {
                canonical: "chills".into(),
                synonyms: vec!["pyrexia".into(), "shivering".into()],
            },
        ])
    }

    #[test]
    fn test_empty_inputs_yield_no_tokens() {
        let idx = SynonymIndex::default();
        assert!(normalize("", &idx).is_empty());
        assert!(normalize("   ", &idx).is_empty());
        assert!(normalize(",,,", &idx).is_empty());
    }

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        let idx = SynonymIndex::default();
        let tokens = normalize("  Fever!!,  Dry    Cough. ", &idx);
        assert_eq!(tokens, vec!["fever", "dry cough"]);
    }

    #[test]
    fn test_deduplicates_preserving_first_occurrence() {
        let idx = index();
        let tokens = normalize("fever, cough, pyrexia, cough", &idx);
        assert_eq!(tokens, vec!["fever", "cough"]);
    }

    #[test]
    fn test_tokens_are_lowercase_without_forbidden_punctuation() {
        let idx = index();
        let tokens = normalize("Head-ache?!, NAUSEA (mild), vomiting;", &idx);
        for token in &tokens {
            assert_eq!(token, &token.to_lowercase());
            assert!(token
                .chars()
                .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_'));
        }
    }

    #[test]
    fn test_resolves_exact_synonym() {
        let idx = index();
        assert_eq!(idx.resolve("high temperature"), "fever");
        assert_eq!(idx.resolve("fever"), "fever");
    }

    #[test]
    fn test_first_declared_group_wins() {
        let idx = index();
        assert_eq!(idx.resolve("pyrexia"), "fever");
    }

    #[test]
    fn test_fallback_folds_hyphens_and_underscores() {
        let idx = index();
        assert_eq!(idx.resolve("sore-throat"), "sore_throat");
        assert_eq!(idx.resolve("sore throat"), "sore_throat");
        assert_eq!(idx.resolve("throat-pain"), "sore_throat");
    }

    #[test]
    fn test_unresolved_segment_passes_through() {
        let idx = index();
        assert_eq!(idx.resolve("elbow itch"), "elbow itch");
    }

    #[test]
    fn test_normalize_applies_synonyms() {
        let idx = index();
        let tokens = normalize("High Temperature, throat pain", &idx);
        assert_eq!(tokens, vec!["fever", "sore_throat"]);
    }
}
