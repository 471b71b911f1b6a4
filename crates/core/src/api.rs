//! Boundary to the external patient and diagnosis services.
//!
//! The session controller only sees this trait. The HTTP binding lives in `patientor-client`;
//! tests use in-memory fakes.

use crate::constants::ERROR_MESSAGE_PREFIX;
use async_trait::async_trait;
use patientor_model::{Diagnosis, Entry, NewEntry, Patient, PatientId};

/// Errors returned by a [`PatientApi`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The service answered, but refused the request. `body` is its human-readable message.
    #[error("request rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message suitable for showing to the user.
    ///
    /// For rejections this is the service's own message with the fixed
    /// `"Something went wrong. Error: "` boilerplate removed when present.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected { body, .. } => {
                let body = body.trim();
                body.strip_prefix(ERROR_MESSAGE_PREFIX)
                    .unwrap_or(body)
                    .to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Operations consumed from the patient service.
#[async_trait]
pub trait PatientApi: Send + Sync {
    /// Fetch a patient with all entries. `Ok(None)` means the id does not resolve.
    async fn fetch_patient(&self, id: &PatientId) -> Result<Option<Patient>, ApiError>;

    /// Fetch the whole diagnosis catalog. May legitimately be empty.
    async fn fetch_diagnoses(&self) -> Result<Vec<Diagnosis>, ApiError>;

    /// Persist a new entry, returning it with its server-assigned id.
    async fn create_entry(&self, patient: &PatientId, entry: &NewEntry) -> Result<Entry, ApiError>;
}
