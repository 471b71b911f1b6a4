//! Medical entries.
//!
//! An entry is one clinical fact recorded against a patient. Every entry shares the fields in
//! [`EntryBase`]; the `type` discriminant selects exactly one [`EntryDetails`] variant carrying
//! the fields that belong to that kind and no other.
//!
//! Wire shape (JSON, camelCase keys, flat object):
//!
//! ```text
//! {
//!   "id": "...",                       // stored entries only
//!   "description": "...",
//!   "date": "YYYY-MM-DD",
//!   "specialist": "...",
//!   "diagnosisCodes": ["..."],         // optional
//!   "type": "HealthCheck" | "Hospital" | "OccupationalHealthcare",
//!   ...variant fields
//! }
//! ```

use patientor_types::{CalendarDate, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Discriminant
// ============================================================================

/// The closed set of entry kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    HealthCheck,
    Hospital,
    OccupationalHealthcare,
}

impl EntryKind {
    /// All kinds, in the order they are offered to the user.
    pub const ALL: [EntryKind; 3] = [
        EntryKind::HealthCheck,
        EntryKind::OccupationalHealthcare,
        EntryKind::Hospital,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::HealthCheck => "HealthCheck",
            EntryKind::Hospital => "Hospital",
            EntryKind::OccupationalHealthcare => "OccupationalHealthcare",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no entry kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entry type '{0}'")]
pub struct UnknownEntryKind(pub String);

impl FromStr for EntryKind {
    type Err = UnknownEntryKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "HealthCheck" => Ok(EntryKind::HealthCheck),
            "Hospital" => Ok(EntryKind::Hospital),
            "OccupationalHealthcare" => Ok(EntryKind::OccupationalHealthcare),
            other => Err(UnknownEntryKind(other.to_owned())),
        }
    }
}

// ============================================================================
// Variant payloads
// ============================================================================

/// Ordinal risk level recorded by a health check.
///
/// Serialised as its number (`0..=3`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HealthCheckRating {
    Healthy = 0,
    LowRisk = 1,
    HighRisk = 2,
    CriticalRisk = 3,
}

impl HealthCheckRating {
    pub const ALL: [HealthCheckRating; 4] = [
        HealthCheckRating::Healthy,
        HealthCheckRating::LowRisk,
        HealthCheckRating::HighRisk,
        HealthCheckRating::CriticalRisk,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HealthCheckRating::Healthy => "Healthy",
            HealthCheckRating::LowRisk => "LowRisk",
            HealthCheckRating::HighRisk => "HighRisk",
            HealthCheckRating::CriticalRisk => "CriticalRisk",
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

/// Error returned for a rating outside `0..=3` or an unknown rating name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid health check rating '{0}'")]
pub struct InvalidRating(pub String);

impl TryFrom<u8> for HealthCheckRating {
    type Error = InvalidRating;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        HealthCheckRating::ALL
            .into_iter()
            .find(|r| r.ordinal() == value)
            .ok_or_else(|| InvalidRating(value.to_string()))
    }
}

impl From<HealthCheckRating> for u8 {
    fn from(rating: HealthCheckRating) -> Self {
        rating.ordinal()
    }
}

impl FromStr for HealthCheckRating {
    type Err = InvalidRating;

    /// Accepts a rating name (`"LowRisk"`) or its ordinal (`"1"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(rating) = HealthCheckRating::ALL.into_iter().find(|r| r.name() == s) {
            return Ok(rating);
        }
        s.parse::<u8>()
            .map_err(|_| InvalidRating(s.to_owned()))
            .and_then(HealthCheckRating::try_from)
    }
}

impl fmt::Display for HealthCheckRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hospital discharge. Both fields are always present.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discharge {
    pub date: CalendarDate,
    pub criteria: NonEmptyText,
}

/// Sick leave interval. Either fully present on an entry or absent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SickLeave {
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckDetails {
    pub health_check_rating: HealthCheckRating,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalDetails {
    pub discharge: Discharge,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupationalHealthcareDetails {
    pub employer_name: NonEmptyText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sick_leave: Option<SickLeave>,
}

/// Variant-specific fields, keyed by the `type` discriminant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntryDetails {
    HealthCheck(HealthCheckDetails),
    Hospital(HospitalDetails),
    OccupationalHealthcare(OccupationalHealthcareDetails),
}

impl EntryDetails {
    pub fn kind(&self) -> EntryKind {
        match self {
            EntryDetails::HealthCheck(_) => EntryKind::HealthCheck,
            EntryDetails::Hospital(_) => EntryKind::Hospital,
            EntryDetails::OccupationalHealthcare(_) => EntryKind::OccupationalHealthcare,
        }
    }
}

// ============================================================================
// Entries
// ============================================================================

/// Fields common to every entry kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryBase {
    pub description: NonEmptyText,
    pub date: CalendarDate,
    pub specialist: NonEmptyText,

    /// Ordered diagnosis codes. Codes are not required to exist in the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis_codes: Option<Vec<String>>,
}

/// An entry without a server-assigned id: the creation payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    #[serde(flatten)]
    pub base: EntryBase,

    #[serde(flatten)]
    pub details: EntryDetails,
}

impl NewEntry {
    pub fn kind(&self) -> EntryKind {
        self.details.kind()
    }

    /// Attach a server-assigned id, producing a stored entry.
    pub fn with_id(self, id: EntryId) -> Entry {
        Entry { id, entry: self }
    }
}

/// Opaque, server-assigned entry identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,

    #[serde(flatten)]
    pub entry: NewEntry,
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        self.entry.kind()
    }

    pub fn base(&self) -> &EntryBase {
        &self.entry.base
    }

    pub fn details(&self) -> &EntryDetails {
        &self.entry.details
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> EntryBase {
        EntryBase {
            description: NonEmptyText::new("Fractured arm").unwrap(),
            date: CalendarDate::parse("2024-01-02").unwrap(),
            specialist: NonEmptyText::new("Dr. X").unwrap(),
            diagnosis_codes: None,
        }
    }

    #[test]
    fn hospital_payload_carries_only_its_own_fields() {
        let entry = NewEntry {
            base: base(),
            details: EntryDetails::Hospital(HospitalDetails {
                discharge: Discharge {
                    date: CalendarDate::parse("2024-01-10").unwrap(),
                    criteria: NonEmptyText::new("Healed").unwrap(),
                },
            }),
        };

        let value = serde_json::to_value(&entry).expect("serialise");
        assert_eq!(
            value,
            json!({
                "type": "Hospital",
                "description": "Fractured arm",
                "date": "2024-01-02",
                "specialist": "Dr. X",
                "discharge": {"date": "2024-01-10", "criteria": "Healed"}
            })
        );
    }

    #[test]
    fn health_check_rating_is_numeric_on_the_wire() {
        let entry = NewEntry {
            base: base(),
            details: EntryDetails::HealthCheck(HealthCheckDetails {
                health_check_rating: HealthCheckRating::HighRisk,
            }),
        };
        let value = serde_json::to_value(&entry).expect("serialise");
        assert_eq!(value["healthCheckRating"], json!(2));
        assert_eq!(value["type"], json!("HealthCheck"));
    }

    #[test]
    fn parses_stored_occupational_entry() {
        let value = json!({
            "id": "fcd59fa6-c4b4-4fec-ac4d-df4fe1f85f62",
            "date": "2019-08-05",
            "type": "OccupationalHealthcare",
            "specialist": "MD House",
            "employerName": "HyPD",
            "diagnosisCodes": ["Z57.1", "Z74.3", "M51.2"],
            "description": "Patient mistakenly found himself in a nuclear plant waiting room.",
            "sickLeave": {"startDate": "2019-08-05", "endDate": "2019-08-28"}
        });

        let entry: Entry = serde_json::from_value(value).expect("parse entry");
        assert_eq!(entry.kind(), EntryKind::OccupationalHealthcare);
        assert_eq!(entry.id.as_str(), "fcd59fa6-c4b4-4fec-ac4d-df4fe1f85f62");
        match entry.details() {
            EntryDetails::OccupationalHealthcare(details) => {
                assert_eq!(details.employer_name.as_str(), "HyPD");
                let leave = details.sick_leave.as_ref().expect("sick leave");
                assert_eq!(leave.end_date.to_string(), "2019-08-28");
            }
            other => panic!("unexpected details: {other:?}"),
        }
    }

    #[test]
    fn rejects_partial_discharge() {
        let value = json!({
            "id": "1",
            "date": "2015-01-02",
            "type": "Hospital",
            "specialist": "MD House",
            "description": "Healing time appr. 2 weeks.",
            "discharge": {"date": "2015-01-16"}
        });
        assert!(serde_json::from_value::<Entry>(value).is_err());
    }

    #[test]
    fn rejects_unknown_entry_type() {
        let value = json!({
            "id": "1",
            "date": "2015-01-02",
            "type": "Dental",
            "specialist": "MD House",
            "description": "Checkup"
        });
        assert!(serde_json::from_value::<Entry>(value).is_err());
    }

    #[test]
    fn rejects_out_of_range_rating() {
        let value = json!({
            "id": "1",
            "date": "2015-01-02",
            "type": "HealthCheck",
            "specialist": "MD House",
            "description": "Yearly control visit.",
            "healthCheckRating": 4
        });
        assert!(serde_json::from_value::<Entry>(value).is_err());
    }

    #[test]
    fn rating_parses_from_name_or_ordinal() {
        assert_eq!("CriticalRisk".parse(), Ok(HealthCheckRating::CriticalRisk));
        assert_eq!("1".parse(), Ok(HealthCheckRating::LowRisk));
        assert_eq!(
            "4".parse::<HealthCheckRating>(),
            Err(InvalidRating("4".into()))
        );
        assert_eq!(
            "Fine".parse::<HealthCheckRating>(),
            Err(InvalidRating("Fine".into()))
        );
    }

    #[test]
    fn entry_kind_round_trips_through_names() {
        for kind in EntryKind::ALL {
            assert_eq!(kind.as_str().parse::<EntryKind>(), Ok(kind));
        }
        assert!("Dental".parse::<EntryKind>().is_err());
    }
}
