//! # Patientor Core
//!
//! Core logic for viewing and extending a patient's clinical entries.
//!
//! This crate contains:
//! - Normalisation of raw form input into creation payloads ([`normalize`])
//! - Read-only entry views ([`detail`])
//! - Headless per-variant entry forms and the type selector ([`forms`])
//! - The patient session controller and its timed error notification ([`session`],
//!   [`notification`])
//!
//! **No transport concerns**: the patient service is reached through the [`PatientApi`] trait.
//! The HTTP binding lives in `patientor-client`.

pub mod api;
pub mod config;
pub mod constants;
pub mod detail;
pub mod error;
pub mod forms;
pub mod normalize;
pub mod notification;
pub mod session;

pub use api::{ApiError, PatientApi};
pub use config::{session_config_from_env_value, SessionConfig};
pub use detail::{render_entry, DiagnosisLine, EntryMarker, EntryView, PatientHeader, Severity};
pub use error::{ConfigError, FormError, FormResult, SessionError, SessionResult};
pub use forms::{
    ActiveForm, DiagnosisInput, DiagnosisInputStyle, EntryFormDispatcher, EntrySink, FormField,
    FormView, InputKind,
};
pub use notification::{Notification, Notifier};
pub use session::{PatientSession, SessionState};
