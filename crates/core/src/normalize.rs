//! Raw form input to creation payload.
//!
//! Every function here is pure: it takes the strings a user typed or picked and either produces
//! a value that satisfies the entry model's invariants or reports the first problem found.
//!
//! Optional sub-records are two-state at this boundary. A sick leave is either fully present or
//! omitted; a partially filled one is dropped rather than submitted. A discharge has no absent
//! state, so both of its fields are required.

use crate::error::{FormError, FormResult};
use patientor_model::{
    CalendarDate, DateError, Discharge, EntryBase, HealthCheckRating, NewEntry, NonEmptyText,
    SickLeave,
};

/// Field names, shared with the form views.
pub mod field {
    pub const DESCRIPTION: &str = "description";
    pub const DATE: &str = "date";
    pub const SPECIALIST: &str = "specialist";
    pub const DIAGNOSIS_CODES: &str = "diagnosisCodes";
    pub const HEALTH_CHECK_RATING: &str = "healthCheckRating";
    pub const DISCHARGE_DATE: &str = "discharge.date";
    pub const DISCHARGE_CRITERIA: &str = "discharge.criteria";
    pub const EMPLOYER_NAME: &str = "employerName";
    pub const SICK_LEAVE_START: &str = "sickLeave.startDate";
    pub const SICK_LEAVE_END: &str = "sickLeave.endDate";
}

/// Raw values of the fields every entry kind has.
#[derive(Clone, Copy, Debug)]
pub struct RawBase<'a> {
    pub description: &'a str,
    pub date: &'a str,
    pub specialist: &'a str,
    pub diagnosis_codes: &'a [String],
}

pub fn required_text(name: &'static str, value: &str) -> FormResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(|_| FormError::MissingField(name))
}

pub fn required_date(name: &'static str, value: &str) -> FormResult<CalendarDate> {
    CalendarDate::parse(value).map_err(|e| match e {
        DateError::Empty => FormError::MissingField(name),
        DateError::Invalid(value) => FormError::InvalidDate { field: name, value },
    })
}

/// Split free-text diagnosis input on `,`, trimming each element.
///
/// Empty elements are kept: `""` parses to `[""]`, the placeholder an untouched input holds.
pub fn parse_diagnosis_codes(text: &str) -> Vec<String> {
    text.split(',').map(|code| code.trim().to_string()).collect()
}

/// Codes as they go into a payload.
///
/// Blank placeholders are dropped; if nothing is left the key is omitted. Codes unknown to the
/// catalog are kept as-is.
pub fn normalize_diagnosis_codes(codes: &[String]) -> Option<Vec<String>> {
    let codes: Vec<String> = codes
        .iter()
        .map(|code| code.trim())
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect();
    (!codes.is_empty()).then_some(codes)
}

/// Convert a rating selection (name or ordinal) to its ordinal value.
pub fn parse_rating(raw: &str) -> FormResult<HealthCheckRating> {
    if raw.trim().is_empty() {
        return Err(FormError::MissingField(field::HEALTH_CHECK_RATING));
    }
    raw.parse()
        .map_err(|_| FormError::InvalidRating(raw.trim().to_string()))
}

pub fn normalize_discharge(date: &str, criteria: &str) -> FormResult<Discharge> {
    Ok(Discharge {
        date: required_date(field::DISCHARGE_DATE, date)?,
        criteria: required_text(field::DISCHARGE_CRITERIA, criteria)?,
    })
}

/// `None` when either date is blank; both dates otherwise.
pub fn normalize_sick_leave(start: &str, end: &str) -> FormResult<Option<SickLeave>> {
    if start.trim().is_empty() || end.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(SickLeave {
        start_date: required_date(field::SICK_LEAVE_START, start)?,
        end_date: required_date(field::SICK_LEAVE_END, end)?,
    }))
}

pub fn normalize_base(raw: RawBase<'_>) -> FormResult<EntryBase> {
    Ok(EntryBase {
        description: required_text(field::DESCRIPTION, raw.description)?,
        date: required_date(field::DATE, raw.date)?,
        specialist: required_text(field::SPECIALIST, raw.specialist)?,
        diagnosis_codes: normalize_diagnosis_codes(raw.diagnosis_codes),
    })
}

/// Log a normalised payload before it leaves the form.
pub(crate) fn trace_payload(entry: &NewEntry) {
    match serde_json::to_string(entry) {
        Ok(json) => tracing::debug!(kind = %entry.kind(), payload = %json, "normalised entry"),
        Err(e) => tracing::debug!(kind = %entry.kind(), "normalised entry (unserialisable: {e})"),
    }
}
