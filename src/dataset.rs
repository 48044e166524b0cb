// File: src/dataset.rs
//! External reference-data boundary.
//!
//! The engine core never sniffs file headers or touches the filesystem;
//! everything it consumes arrives as an already-parsed [`Table`] record set
//! or synonym mapping. This module owns that boundary: locating key/value
//! columns by header substring and loading the JSON reference files the
//! example binary ships with.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::core::types::SynonymGroup;
use crate::error::EngineError;

pub const CONDITIONS_FILE: &str = "conditions.json";
pub const DESCRIPTIONS_FILE: &str = "descriptions.json";
pub const PRECAUTIONS_FILE: &str = "precautions.json";
pub const SEVERITY_FILE: &str = "severity.json";
pub const SYNONYMS_FILE: &str = "synonyms.json";

/// A tabular record set: named columns and string-valued rows.
///
/// Rows shorter than the header list are tolerated; absent cells read as
/// `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// First column whose header contains `needle` (case-insensitive).
    pub fn column_containing(&self, needle: &str) -> Option<usize> {
        let needle = needle.to_lowercase();
        self.headers
            .iter()
            .position(|h| h.to_lowercase().contains(&needle))
    }

    /// Key column for a lookup table: the first header containing
    /// "symptom" or "condition", else the first column.
    pub fn key_column(&self) -> usize {
        self.column_containing("symptom")
            .or_else(|| self.column_containing("condition"))
            .unwrap_or(0)
    }

    /// Value column for a lookup table: the first header containing
    /// `needle`, else the second column.
    pub fn value_column(&self, needle: &str) -> usize {
        self.column_containing(needle).unwrap_or(1)
    }

    /// Columns named `p1`, `p2`, ... in column order.
    pub fn precaution_columns(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, h)| {
                let h = h.trim();
                h.len() > 1
                    && h.starts_with('p')
                    && h[1..].chars().all(|c| c.is_ascii_digit())
            })
            .map(|(i, _)| i)
            .collect()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(String::as_str)
    }
}

/// Parse the synonym dictionary: a JSON object mapping a canonical symptom
/// name to an ordered list of alternate phrasings. Group order follows the
/// document, which is why `serde_json` runs with `preserve_order`.
pub fn parse_synonyms(doc: &Value) -> Result<Vec<SynonymGroup>, EngineError> {
    let object = doc.as_object().ok_or_else(|| {
        EngineError::StructuralData("synonym dictionary must be a JSON object".into())
    })?;

    let mut groups = Vec::with_capacity(object.len());
    for (canonical, value) in object {
        let synonyms = match value.as_array() {
            Some(list) => list
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
            None => {
                warn!(canonical = %canonical, "synonym entry is not a list, ignoring its synonyms");
                Vec::new()
            }
        };
        groups.push(SynonymGroup {
            canonical: canonical.clone(),
            synonyms,
        });
    }
    Ok(groups)
}

pub fn load_table(path: &Path) -> Result<Table, EngineError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

pub fn load_synonyms(path: &Path) -> Result<Vec<SynonymGroup>, EngineError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let doc: Value = serde_json::from_reader(reader)?;
    parse_synonyms(&doc)
}

/// The raw inputs for a [`ReferenceStore`]: the required condition table
/// plus whatever optional lookup tables were available.
///
/// [`ReferenceStore`]: crate::core::store::ReferenceStore
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    pub conditions: Option<Table>,
    pub descriptions: Option<Table>,
    pub precautions: Option<Table>,
    pub severities: Option<Table>,
    pub synonyms: Option<Vec<SynonymGroup>>,
}

/// Load all reference files from a directory.
///
/// The condition table is required; its absence is a [`EngineError::MissingData`].
/// Every other table is optional and degrades with a logged warning.
pub fn load_dir(dir: &Path) -> Result<RawTables, EngineError> {
    let conditions_path = dir.join(CONDITIONS_FILE);
    let conditions = load_table(&conditions_path).map_err(|e| match e {
        EngineError::Io(io) if io.kind() == ErrorKind::NotFound => {
            EngineError::MissingData(conditions_path.display().to_string())
        }
        other => other,
    })?;

    Ok(RawTables {
        conditions: Some(conditions),
        descriptions: load_optional_table(&dir.join(DESCRIPTIONS_FILE)),
        precautions: load_optional_table(&dir.join(PRECAUTIONS_FILE)),
        severities: load_optional_table(&dir.join(SEVERITY_FILE)),
        synonyms: load_optional_synonyms(&dir.join(SYNONYMS_FILE)),
    })
}

fn load_optional_table(path: &Path) -> Option<Table> {
    match load_table(path) {
        Ok(table) => Some(table),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "optional table unavailable, using fallback");
            None
        }
    }
}

fn load_optional_synonyms(path: &Path) -> Option<Vec<SynonymGroup>> {
    match load_synonyms(path) {
        Ok(groups) => Some(groups),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "synonyms unavailable, using exact matching only");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lookup_table() -> Table {
        Table {
            headers: vec!["Condition".into(), "Description".into()],
            rows: vec![vec!["Flu".into(), "A viral infection.".into()]],
        }
    }

    #[test]
    fn test_column_discovery_by_substring() {
        let table = lookup_table();
        assert_eq!(table.key_column(), 0);
        assert_eq!(table.value_column("description"), 1);
    }

    #[test]
    fn test_column_discovery_positional_fallback() {
        let table = Table {
            headers: vec!["name".into(), "text".into()],
            rows: vec![],
        };
        assert_eq!(table.key_column(), 0);
        assert_eq!(table.value_column("description"), 1);
    }

    #[test]
    fn test_precaution_columns_in_order() {
        let table = Table {
            headers: vec![
                "condition".into(),
                "p1".into(),
                "notes".into(),
                "p2".into(),
                "p10".into(),
                "px".into(),
            ],
            rows: vec![],
        };
        assert_eq!(table.precaution_columns(), vec![1, 3, 4]);
    }

    #[test]
    fn test_cell_tolerates_short_rows() {
        let table = Table {
            headers: vec!["a".into(), "b".into()],
            rows: vec![vec!["only".into()]],
        };
        assert_eq!(table.cell(0, 0), Some("only"));
        assert_eq!(table.cell(0, 1), None);
        assert_eq!(table.cell(1, 0), None);
    }

    #[test]
    fn test_parse_synonyms_keeps_declaration_order() {
        let doc = json!({
            "fever": ["high temperature", "pyrexia"],
            "cough": ["hacking cough"],
        });
        let groups = parse_synonyms(&doc).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].canonical, "fever");
        assert_eq!(groups[0].synonyms, vec!["high temperature", "pyrexia"]);
        assert_eq!(groups[1].canonical, "cough");
    }

    #[test]
    fn test_parse_synonyms_rejects_non_object() {
        let doc = json!(["not", "an", "object"]);
        assert!(matches!(
            parse_synonyms(&doc),
            Err(EngineError::StructuralData(_))
        ));
    }

    #[test]
    fn test_parse_synonyms_non_list_value_contributes_nothing() {
        let doc = json!({"fever": "oops", "cough": ["hacking cough"]});
        let groups = parse_synonyms(&doc).unwrap();
        assert!(groups[0].synonyms.is_empty());
        assert_eq!(groups[1].synonyms.len(), 1);
    }
}
