//! Worker record types and the positional row mapping that produces them.
//!
//! The directory endpoint returns rows as bare JSON arrays with a fixed
//! column layout instead of keyed objects. [`ColumnMapping`] captures that
//! layout so endpoint variants with shuffled or missing columns reuse the
//! same client.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::dates::{self, DatePolicy};
use crate::error::{LookupError, LookupResult};

/// Worker gender as encoded by the directory sheet.
///
/// The sheet uses French single-letter codes: `H` (homme) for male and `M`
/// (madame) for female. Anything else, including a missing column, maps to
/// [`Gender::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    /// Decode a raw gender cell.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "H" => Gender::Male,
            "M" => Gender::Female,
            _ => Gender::Unknown,
        }
    }
}

/// A single worker resolved from the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRecord {
    /// Employee number, the primary lookup key.
    pub matricule: String,
    /// Display name as recorded in the sheet.
    pub full_name: String,
    /// National identity card number, the alternate lookup key.
    pub national_id: String,
    pub gender: Gender,
    /// Entry date in canonical `YYYY-MM-DD` form, when the raw cell parsed.
    pub entry_date: Option<String>,
}

/// Positional layout of a directory row.
///
/// Indices are zero-based positions into the row array. `min_fields` is the
/// shortest row the mapping accepts; shorter rows are rejected as malformed
/// rather than read with silent defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub matricule: usize,
    pub full_name: usize,
    pub national_id: usize,
    /// Gender column, if the endpoint variant carries one.
    pub gender: Option<usize>,
    pub entry_date: usize,
    pub min_fields: usize,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            matricule: 0,
            full_name: 2,
            national_id: 3,
            gender: Some(4),
            entry_date: 13,
            min_fields: 14,
        }
    }
}

impl ColumnMapping {
    /// Map one matched row into a [`WorkerRecord`].
    ///
    /// A row whose identifier cells (matricule and national id) are both
    /// empty is treated as no match, the same as an empty result set.
    pub fn map_row(&self, row: &[Value], policy: DatePolicy) -> LookupResult<WorkerRecord> {
        if row.len() < self.min_fields {
            return Err(LookupError::malformed(format!(
                "row has {} fields, expected at least {}",
                row.len(),
                self.min_fields
            )));
        }

        let matricule = cell_text(row, self.matricule);
        let national_id = cell_text(row, self.national_id);
        if matricule.is_empty() && national_id.is_empty() {
            debug!("Matched row has no usable identifiers, treating as no match");
            return Err(LookupError::NotFound);
        }

        let gender = match self.gender {
            Some(index) => Gender::from_code(&cell_text(row, index)),
            None => Gender::Unknown,
        };
        let entry_date = dates::normalize(&cell_text(row, self.entry_date), policy);

        Ok(WorkerRecord {
            matricule,
            full_name: cell_text(row, self.full_name),
            national_id,
            gender,
            entry_date,
        })
    }
}

/// Read a cell as trimmed text. Numbers and booleans are rendered, anything
/// else (missing cell, null, nested structure) reads as empty.
fn cell_text(row: &[Value], index: usize) -> String {
    match row.get(index) {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}
