//! Constants used throughout the patientor core crate.

use std::time::Duration;

/// How long a submission-failure notification stays visible.
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Boilerplate the patient service prepends to rejection messages.
pub const ERROR_MESSAGE_PREFIX: &str = "Something went wrong. Error: ";

/// Text shown instead of the patient page when the id does not resolve.
pub const PATIENT_NOT_FOUND: &str = "Patient Not Found";
