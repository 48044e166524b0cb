// File: src/core/store.rs
//! The read-only reference store.
//!
//! Built once from already-parsed tables, then shared freely: nothing in
//! here mutates after construction, so concurrent prediction calls need no
//! locking.

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};

use crate::core::normalize::SynonymIndex;
use crate::core::types::{ConditionProfile, StoreHealth, TableStatus};
use crate::dataset::{self, RawTables, Table};
use crate::error::EngineError;

/// Header marking the condition-name column of the condition table. Every
/// other column is a symptom-presence field.
const NAME_COLUMN_MARKER: &str = "prognosis";

pub struct ReferenceStore {
    conditions: Vec<ConditionProfile>,
    index: HashMap<String, usize>,
    descriptions: HashMap<String, String>,
    precautions: HashMap<String, Vec<String>>,
    severities: HashMap<String, u32>,
    synonyms: SynonymIndex,
    health: StoreHealth,
}

impl ReferenceStore {
    /// Build the store from raw tables. Only the condition table is
    /// required; each missing optional table degrades one capability and
    /// logs a warning.
    pub fn from_tables(raw: RawTables) -> Result<Self, EngineError> {
        let condition_table = raw
            .conditions
            .ok_or_else(|| EngineError::MissingData("condition table".into()))?;

        let (conditions, index) = build_profiles(&condition_table)?;
        info!(count = conditions.len(), "loaded condition profiles");

        let descriptions = match &raw.descriptions {
            Some(table) => build_descriptions(table),
            None => {
                warn!("description table unavailable, using fallback text");
                HashMap::new()
            }
        };
        if !descriptions.is_empty() {
            info!(count = descriptions.len(), "loaded condition descriptions");
        }

        let precautions = match &raw.precautions {
            Some(table) => build_precautions(table),
            None => {
                warn!("precaution table unavailable, using fallback list");
                HashMap::new()
            }
        };
        if !precautions.is_empty() {
            info!(count = precautions.len(), "loaded precaution lists");
        }

        let severities = match &raw.severities {
            Some(table) => build_severities(table),
            None => {
                warn!("severity table unavailable, scoring is unweighted");
                HashMap::new()
            }
        };
        if !severities.is_empty() {
            info!(count = severities.len(), "loaded symptom severities");
        }

        let synonyms = match raw.synonyms.clone() {
            Some(groups) => SynonymIndex::new(groups),
            None => {
                warn!("synonym dictionary unavailable, using exact matching only");
                SynonymIndex::default()
            }
        };
        if !synonyms.is_empty() {
            info!(groups = synonyms.group_count(), "loaded synonym groups");
        }

        let health = StoreHealth {
            conditions: TableStatus {
                loaded: true,
                populated: !conditions.is_empty(),
            },
            descriptions: TableStatus {
                loaded: raw.descriptions.is_some(),
                populated: !descriptions.is_empty(),
            },
            precautions: TableStatus {
                loaded: raw.precautions.is_some(),
                populated: !precautions.is_empty(),
            },
            severities: TableStatus {
                loaded: raw.severities.is_some(),
                populated: !severities.is_empty(),
            },
            synonyms: TableStatus {
                loaded: raw.synonyms.is_some(),
                populated: !synonyms.is_empty(),
            },
        };

        Ok(Self {
            conditions,
            index,
            descriptions,
            precautions,
            severities,
            synonyms,
            health,
        })
    }

    /// Load and build from a directory of JSON reference files.
    pub fn from_dir(dir: &Path) -> Result<Self, EngineError> {
        Self::from_tables(dataset::load_dir(dir)?)
    }

    /// All condition profiles in construction order. This order is the
    /// documented tie-break for equal-scoring candidates.
    pub fn conditions(&self) -> &[ConditionProfile] {
        &self.conditions
    }

    pub fn profile(&self, name: &str) -> Option<&ConditionProfile> {
        self.index.get(name).map(|&i| &self.conditions[i])
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.descriptions.get(name).map(String::as_str)
    }

    pub fn precautions(&self, name: &str) -> Option<&[String]> {
        self.precautions.get(name).map(Vec::as_slice)
    }

    pub fn severities(&self) -> &HashMap<String, u32> {
        &self.severities
    }

    pub fn synonyms(&self) -> &SynonymIndex {
        &self.synonyms
    }

    pub fn health(&self) -> StoreHealth {
        self.health
    }
}

/// Build condition profiles from the boolean presence table.
///
/// Duplicate condition names keep their first position but take the
/// last-seen row's profile. That mirrors the source data's semantics; the
/// warning exists because it usually signals a data-quality problem.
fn build_profiles(
    table: &Table,
) -> Result<(Vec<ConditionProfile>, HashMap<String, usize>), EngineError> {
    let name_col = table.column_containing(NAME_COLUMN_MARKER).ok_or_else(|| {
        EngineError::StructuralData(format!(
            "condition table has no '{NAME_COLUMN_MARKER}' column"
        ))
    })?;

    let mut conditions: Vec<ConditionProfile> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row_idx in 0..table.rows.len() {
        let Some(name) = table
            .cell(row_idx, name_col)
            .map(str::trim)
            .filter(|n| !n.is_empty())
        else {
            continue;
        };

        let symptoms: Vec<String> = table
            .headers
            .iter()
            .enumerate()
            .filter(|&(col, _)| col != name_col)
            .filter(|&(col, _)| is_present(table.cell(row_idx, col)))
            .map(|(_, header)| header.clone())
            .collect();

        match index.get(name) {
            Some(&slot) => {
                warn!(condition = name, "duplicate condition row, last one wins");
                conditions[slot].symptoms = symptoms;
            }
            None => {
                index.insert(name.to_string(), conditions.len());
                conditions.push(ConditionProfile {
                    name: name.to_string(),
                    symptoms,
                });
            }
        }
    }

    Ok((conditions, index))
}

fn is_present(cell: Option<&str>) -> bool {
    cell.and_then(|c| c.trim().parse::<i64>().ok()) == Some(1)
}

fn build_descriptions(table: &Table) -> HashMap<String, String> {
    let key_col = table.key_column();
    let value_col = table.value_column("description");

    let mut map = HashMap::new();
    for row_idx in 0..table.rows.len() {
        let Some(key) = non_blank_cell(table, row_idx, key_col) else {
            continue;
        };
        if let Some(value) = table.cell(row_idx, value_col) {
            map.insert(key.to_string(), value.trim().to_string());
        }
    }
    map
}

fn build_precautions(table: &Table) -> HashMap<String, Vec<String>> {
    let key_col = table.key_column();
    let value_cols = table.precaution_columns();

    let mut map = HashMap::new();
    for row_idx in 0..table.rows.len() {
        let Some(key) = non_blank_cell(table, row_idx, key_col) else {
            continue;
        };
        let items: Vec<String> = value_cols
            .iter()
            .filter_map(|&col| non_blank_cell(table, row_idx, col))
            .map(str::to_string)
            .collect();
        if !items.is_empty() {
            map.insert(key.to_string(), items);
        }
    }
    map
}

fn build_severities(table: &Table) -> HashMap<String, u32> {
    let key_col = table.key_column();
    let value_col = table.value_column("severity");

    let mut map = HashMap::new();
    for row_idx in 0..table.rows.len() {
        let Some(key) = non_blank_cell(table, row_idx, key_col) else {
            continue;
        };
        match table
            .cell(row_idx, value_col)
            .and_then(|c| c.trim().parse::<u32>().ok())
        {
            Some(weight) => {
                map.insert(key.to_string(), weight);
            }
            None => warn!(symptom = key, "severity value is not a non-negative integer, skipping"),
        }
    }
    map
}

fn non_blank_cell(table: &Table, row: usize, col: usize) -> Option<&str> {
    table
        .cell(row, col)
        .map(str::trim)
        .filter(|c| !c.is_empty())
}
