use crate::forms::DiagnosisInputStyle;

/// Validation failures raised while filling in or normalising an entry form.
///
/// Field names are the wire names used by [`crate::forms::EntryFormDispatcher::set_field`],
/// with dotted paths for sub-records (for example `discharge.criteria`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} is not a valid date: '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("invalid health check rating '{0}'")]
    InvalidRating(String),
    #[error("unknown form field '{0}'")]
    UnknownField(String),
    #[error("unknown diagnosis code '{0}'")]
    UnknownDiagnosis(String),
    #[error("this form takes diagnosis codes as {expected}")]
    WrongDiagnosisInput { expected: DiagnosisInputStyle },
    #[error("no entry type selected")]
    NoFormSelected,
}

pub type FormResult<T> = std::result::Result<T, FormError>;

/// Errors surfaced by the patient session controller.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to load patient data: {0}")]
    Fetch(#[source] crate::api::ApiError),
    #[error("failed to create entry: {0}")]
    Create(#[source] crate::api::ApiError),
    #[error("no patient loaded")]
    NotReady,
    #[error(transparent)]
    Form(#[from] FormError),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Invalid startup configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}
