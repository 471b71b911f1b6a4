//! Patient and medical-entry data model.
//!
//! This crate defines the domain types exchanged with the patient service and a small set of
//! strict JSON parsing helpers:
//! - [`Entry`] / [`NewEntry`]: the discriminated union of clinical entry variants
//! - [`Diagnosis`] / [`DiagnosisCatalog`]: reference data for diagnosis codes
//! - [`Patient`]: demographics plus the ordered entry list
//!
//! The `type` discriminant is modelled by [`EntryDetails`], so every branch on the kind of an
//! entry is an exhaustive `match`.

pub mod diagnosis;
pub mod entry;
pub mod patient;

pub use diagnosis::{Diagnosis, DiagnosisCatalog};
pub use entry::{
    Discharge, Entry, EntryBase, EntryDetails, EntryId, EntryKind, HealthCheckDetails,
    HealthCheckRating, HospitalDetails, InvalidRating, NewEntry, OccupationalHealthcareDetails,
    SickLeave, UnknownEntryKind,
};
pub use patient::{Gender, Patient, PatientId};

pub use patientor_types::{CalendarDate, DateError, NonEmptyText, TextError};

use serde::de::DeserializeOwned;

/// Errors returned by the model crate.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("schema mismatch at {path}: {message}")]
    Schema { path: String, message: String },
}

/// Type alias for Results that can fail with a [`ModelError`].
pub type ModelResult<T> = Result<T, ModelError>;

/// Parse a patient (with entries) from the patient service's JSON.
///
/// # Errors
///
/// Returns [`ModelError::Schema`] naming the failing path (for example `gender` or
/// `entries.2`) when the JSON does not match the model.
pub fn parse_patient(json: &str) -> ModelResult<Patient> {
    parse_json(json)
}

/// Parse a single stored entry, as returned by entry creation.
///
/// # Errors
///
/// Returns [`ModelError::Schema`] when the JSON does not describe a valid entry.
pub fn parse_entry(json: &str) -> ModelResult<Entry> {
    parse_json(json)
}

/// Parse the diagnosis catalog.
///
/// # Errors
///
/// Returns [`ModelError::Schema`] when any element is not a valid diagnosis.
pub fn parse_diagnoses(json: &str) -> ModelResult<Vec<Diagnosis>> {
    parse_json(json)
}

fn parse_json<T: DeserializeOwned>(json: &str) -> ModelResult<T> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    match serde_path_to_error::deserialize::<_, T>(&mut deserializer) {
        Ok(value) => Ok(value),
        Err(err) => {
            let path = err.path().to_string();
            let path = if path.is_empty() || path == "." {
                "<root>".to_string()
            } else {
                path
            };
            Err(ModelError::Schema {
                path,
                message: err.into_inner().to_string(),
            })
        }
    }
}
