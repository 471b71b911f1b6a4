//! Patient demographics and entry list.

use crate::entry::Entry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Patient identifier as used in the patient service's URLs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(String);

impl PatientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PatientId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        })
    }
}

/// A patient with their ordered entries.
///
/// The entry list only ever grows during a viewing session; new entries are appended in the
/// order the service confirms them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: PatientId,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssn: Option<String>,

    pub occupation: String,
    pub gender: Gender,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,

    #[serde(default)]
    pub entries: Vec<Entry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_patient, EntryKind};

    #[test]
    fn parses_patient_with_mixed_entries() {
        let json = r#"{
            "id": "d2773598-f723-11e9-8f0b-362b9e155667",
            "name": "Martin Riggs",
            "dateOfBirth": "1979-01-30",
            "ssn": "300179-77A",
            "gender": "male",
            "occupation": "Cop",
            "entries": [
                {
                    "id": "fcd59fa6-c4b4-4fec-ac4d-df4fe1f85f62",
                    "date": "2019-08-05",
                    "type": "OccupationalHealthcare",
                    "specialist": "MD House",
                    "employerName": "HyPD",
                    "diagnosisCodes": ["Z57.1"],
                    "description": "Nuclear plant waiting room."
                },
                {
                    "id": "b4f4eca1-2aa7-4b13-9a18-4a5535c3c8da",
                    "date": "2019-10-20",
                    "specialist": "MD House",
                    "type": "HealthCheck",
                    "description": "Yearly control visit. Cholesterol levels back to normal.",
                    "healthCheckRating": 0
                }
            ]
        }"#;

        let patient = parse_patient(json).expect("parse patient");
        assert_eq!(patient.gender, Gender::Male);
        assert_eq!(patient.ssn.as_deref(), Some("300179-77A"));
        let kinds: Vec<_> = patient.entries.iter().map(Entry::kind).collect();
        assert_eq!(
            kinds,
            [EntryKind::OccupationalHealthcare, EntryKind::HealthCheck]
        );
    }

    #[test]
    fn entries_default_to_empty() {
        let json = r#"{
            "id": "d27736ec-f723-11e9-8f0b-362b9e155667",
            "name": "Hans Gruber",
            "gender": "other",
            "occupation": "Technician"
        }"#;
        let patient = parse_patient(json).expect("parse patient");
        assert!(patient.entries.is_empty());
        assert_eq!(patient.ssn, None);
    }
}
