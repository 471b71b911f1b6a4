//! Diagnosis reference data.
//!
//! The catalog is loaded once per session and never mutated. Entries refer to diagnoses only
//! by code; a code with no matching catalog entry is still a valid reference, it simply has no
//! human-readable name.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A diagnosis as published by the diagnosis service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    /// Unique code, for example `"M24.2"`.
    pub code: String,

    /// Human-readable name.
    pub name: String,

    /// Optional Latin name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latin: Option<String>,
}

/// Read-only lookup over a loaded set of diagnoses.
///
/// Lookups use exact code equality. If the source list repeats a code, the first occurrence
/// wins.
#[derive(Clone, Debug, Default)]
pub struct DiagnosisCatalog {
    diagnoses: Vec<Diagnosis>,
    by_code: HashMap<String, usize>,
}

impl DiagnosisCatalog {
    pub fn new(diagnoses: Vec<Diagnosis>) -> Self {
        let mut by_code = HashMap::with_capacity(diagnoses.len());
        for (idx, diagnosis) in diagnoses.iter().enumerate() {
            by_code.entry(diagnosis.code.clone()).or_insert(idx);
        }
        Self { diagnoses, by_code }
    }

    pub fn get(&self, code: &str) -> Option<&Diagnosis> {
        self.by_code.get(code).map(|&idx| &self.diagnoses[idx])
    }

    /// Name of the diagnosis with exactly this code, if the catalog has one.
    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.get(code).map(|d| d.name.as_str())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    /// Codes in catalog order, as offered by a multi-select input.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.diagnoses.iter().map(|d| d.code.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnosis> {
        self.diagnoses.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnoses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnoses.is_empty()
    }
}

impl From<Vec<Diagnosis>> for DiagnosisCatalog {
    fn from(diagnoses: Vec<Diagnosis>) -> Self {
        Self::new(diagnoses)
    }
}

impl FromIterator<Diagnosis> for DiagnosisCatalog {
    fn from_iter<I: IntoIterator<Item = Diagnosis>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
