//! Read-only entry views.
//!
//! [`render_entry`] picks the variant-specific presentation of a stored entry by matching on its
//! details, so adding an entry kind is a compile error here until it is handled.

use patientor_model::{
    CalendarDate, DiagnosisCatalog, Entry, EntryDetails, Gender, HealthCheckRating, Patient,
};
use serde::Serialize;
use std::fmt;

// ============================================================================
// View types
// ============================================================================

/// Icon shown next to the entry date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EntryMarker {
    MedicalInformation,
    LocalHospital,
    Work,
}

impl fmt::Display for EntryMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntryMarker::MedicalInformation => "[health check]",
            EntryMarker::LocalHospital => "[hospital]",
            EntryMarker::Work => "[occupational]",
        })
    }
}

/// Health indicator of a health-check entry, ordered from best to worst.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Healthy,
    LowRisk,
    HighRisk,
    CriticalRisk,
}

impl Severity {
    /// Conventional colour for the level.
    pub fn colour(self) -> &'static str {
        match self {
            Severity::Healthy => "green",
            Severity::LowRisk => "yellow",
            Severity::HighRisk => "orange",
            Severity::CriticalRisk => "red",
        }
    }
}

impl From<HealthCheckRating> for Severity {
    fn from(rating: HealthCheckRating) -> Self {
        match rating {
            HealthCheckRating::Healthy => Severity::Healthy,
            HealthCheckRating::LowRisk => Severity::LowRisk,
            HealthCheckRating::HighRisk => Severity::HighRisk,
            HealthCheckRating::CriticalRisk => Severity::CriticalRisk,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Healthy => "Healthy",
            Severity::LowRisk => "LowRisk",
            Severity::HighRisk => "HighRisk",
            Severity::CriticalRisk => "CriticalRisk",
        };
        write!(f, "{name} ({})", self.colour())
    }
}

/// One diagnosis code of an entry, with its catalog name when the code is known.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosisLine {
    pub code: String,
    pub name: Option<String>,
}

impl fmt::Display for DiagnosisLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} {name}", self.code),
            None => f.write_str(&self.code),
        }
    }
}

/// Presentation of one stored entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntryView {
    pub date: CalendarDate,
    pub marker: EntryMarker,
    /// Shown next to the marker. The employer for occupational entries.
    pub headline: Option<String>,
    pub description: String,
    /// Variant-specific lines between the description and the specialist.
    pub lines: Vec<String>,
    pub specialist: String,
    pub severity: Option<Severity>,
    /// Non-blank codes only. `None` when the codes are absent, empty or all blank (such as `[""]`).
    pub diagnoses: Option<Vec<DiagnosisLine>>,
}

impl fmt::Display for EntryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.marker)?;
        if let Some(headline) = &self.headline {
            write!(f, " {headline}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.description)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        if let Some(severity) = self.severity {
            writeln!(f, "health: {severity}")?;
        }
        writeln!(f, "diagnose by {}", self.specialist)?;
        for diagnosis in self.diagnoses.iter().flatten() {
            writeln!(f, "  - {diagnosis}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Build the view of a stored entry, annotating its diagnosis codes from `catalog`.
pub fn render_entry(entry: &Entry, catalog: &DiagnosisCatalog) -> EntryView {
    let base = entry.base();
    let mut view = EntryView {
        date: base.date,
        marker: EntryMarker::MedicalInformation,
        headline: None,
        description: base.description.to_string(),
        lines: Vec::new(),
        specialist: base.specialist.to_string(),
        severity: None,
        diagnoses: diagnosis_lines(base.diagnosis_codes.as_deref(), catalog),
    };

    match entry.details() {
        EntryDetails::HealthCheck(details) => {
            view.severity = Some(details.health_check_rating.into());
        }
        EntryDetails::Hospital(details) => {
            view.marker = EntryMarker::LocalHospital;
            view.lines.push(details.discharge.date.to_string());
            view.lines.push(details.discharge.criteria.to_string());
        }
        EntryDetails::OccupationalHealthcare(details) => {
            view.marker = EntryMarker::Work;
            view.headline = Some(details.employer_name.to_string());
            if let Some(leave) = &details.sick_leave {
                view.lines
                    .push(format!("sick leave {} to {}", leave.start_date, leave.end_date));
            }
        }
    }

    view
}

/// Render every entry of a patient in stored order.
pub fn render_entries(patient: &Patient, catalog: &DiagnosisCatalog) -> Vec<EntryView> {
    patient
        .entries
        .iter()
        .map(|entry| render_entry(entry, catalog))
        .collect()
}

fn diagnosis_lines(codes: Option<&[String]>, catalog: &DiagnosisCatalog) -> Option<Vec<DiagnosisLine>> {
    let lines: Vec<DiagnosisLine> = codes?
        .iter()
        .filter(|code| !code.trim().is_empty())
        .map(|code| DiagnosisLine {
            code: code.clone(),
            name: catalog.name_of(code).map(str::to_string),
        })
        .collect();
    (!lines.is_empty()).then_some(lines)
}

// ============================================================================
// Patient header
// ============================================================================

/// Demographic summary shown above the entry list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PatientHeader {
    pub name: String,
    pub gender: Gender,
    pub ssn: Option<String>,
    pub occupation: String,
    pub date_of_birth: Option<String>,
}

impl From<&Patient> for PatientHeader {
    fn from(patient: &Patient) -> Self {
        Self {
            name: patient.name.clone(),
            gender: patient.gender,
            ssn: patient.ssn.clone(),
            occupation: patient.occupation.clone(),
            date_of_birth: patient.date_of_birth.clone(),
        }
    }
}

impl fmt::Display for PatientHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.name, self.gender)?;
        if let Some(ssn) = &self.ssn {
            writeln!(f, "ssn: {ssn}")?;
        }
        if let Some(dob) = &self.date_of_birth {
            writeln!(f, "born: {dob}")?;
        }
        writeln!(f, "occupation: {}", self.occupation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patientor_model::{parse_entry, Diagnosis};

    fn catalog() -> DiagnosisCatalog {
        DiagnosisCatalog::new(vec![Diagnosis {
            code: "M24.2".into(),
            name: "Disorder of ligament".into(),
            latin: None,
        }])
    }

    #[test]
    fn health_check_shows_severity() {
        let entry = parse_entry(
            r#"{"id":"h1","type":"HealthCheck","description":"Yearly control visit",
                "date":"2019-10-20","specialist":"MD House","healthCheckRating":3}"#,
        )
        .expect("valid entry");

        let view = render_entry(&entry, &catalog());
        assert_eq!(view.marker, EntryMarker::MedicalInformation);
        assert_eq!(view.severity, Some(Severity::CriticalRisk));
        assert_eq!(view.severity.unwrap().colour(), "red");
        assert!(view.diagnoses.is_none());
    }

    #[test]
    fn severity_orders_best_to_worst() {
        assert!(Severity::CriticalRisk > Severity::HighRisk);
        assert!(Severity::HighRisk > Severity::LowRisk);
        assert!(Severity::LowRisk > Severity::Healthy);
        assert_eq!(Severity::from(HealthCheckRating::LowRisk).colour(), "yellow");
    }

    #[test]
    fn known_codes_are_annotated_and_unknown_listed_bare() {
        let entry = parse_entry(
            r#"{"id":"o1","type":"OccupationalHealthcare","description":"Strained ankle",
                "date":"2019-08-05","specialist":"MD House","employerName":"HyPD",
                "diagnosisCodes":["M24.2","Z99.9"]}"#,
        )
        .expect("valid entry");

        let view = render_entry(&entry, &catalog());
        assert_eq!(view.marker, EntryMarker::Work);
        assert_eq!(view.headline.as_deref(), Some("HyPD"));
        assert_eq!(
            view.diagnoses,
            Some(vec![
                DiagnosisLine {
                    code: "M24.2".into(),
                    name: Some("Disorder of ligament".into())
                },
                DiagnosisLine {
                    code: "Z99.9".into(),
                    name: None
                },
            ])
        );
        let text = view.to_string();
        assert!(text.contains("  - M24.2 Disorder of ligament\n"));
        assert!(text.contains("  - Z99.9\n"));
    }

    #[test]
    fn placeholder_codes_hide_the_section() {
        let entry = parse_entry(
            r#"{"id":"x1","type":"HealthCheck","description":"d","date":"2020-01-01",
                "specialist":"s","healthCheckRating":0,"diagnosisCodes":[""]}"#,
        )
        .expect("valid entry");
        assert!(render_entry(&entry, &catalog()).diagnoses.is_none());
    }

    #[test]
    fn hospital_lists_discharge() {
        let entry = parse_entry(
            r#"{"id":"d8","type":"Hospital","description":"Fractured arm","date":"2024-01-02",
                "specialist":"Dr. X","discharge":{"date":"2024-01-10","criteria":"Healed"}}"#,
        )
        .expect("valid entry");

        let view = render_entry(&entry, &DiagnosisCatalog::default());
        assert_eq!(
            view.to_string(),
            "2024-01-02 [hospital]\nFractured arm\n2024-01-10\nHealed\ndiagnose by Dr. X\n"
        );
    }

    #[test]
    fn occupational_shows_employer_and_sick_leave() {
        let entry = parse_entry(
            r#"{"id":"o3","type":"OccupationalHealthcare","description":"Back pain",
                "date":"2020-01-01","specialist":"MD House","employerName":"FBI",
                "sickLeave":{"startDate":"2020-01-01","endDate":"2020-01-05"}}"#,
        )
        .expect("valid entry");

        let view = render_entry(&entry, &DiagnosisCatalog::default());
        assert_eq!(view.marker, EntryMarker::Work);
        assert_eq!(view.headline.as_deref(), Some("FBI"));
        assert_eq!(view.lines, ["sick leave 2020-01-01 to 2020-01-05"]);
        assert_eq!(
            view.to_string(),
            "2020-01-01 [occupational] FBI\nBack pain\nsick leave 2020-01-01 to 2020-01-05\ndiagnose by MD House\n"
        );
    }

    #[test]
    fn occupational_without_sick_leave_has_no_interval() {
        let entry = parse_entry(
            r#"{"id":"o4","type":"OccupationalHealthcare","description":"Checkup",
                "date":"2020-02-01","specialist":"MD House","employerName":"FBI"}"#,
        )
        .expect("valid entry");

        assert!(render_entry(&entry, &DiagnosisCatalog::default()).lines.is_empty());
    }

    #[test]
    fn header_lists_demographics() {
        let header = PatientHeader {
            name: "John McClane".into(),
            gender: Gender::Male,
            ssn: Some("090786-122X".into()),
            occupation: "New york city cop".into(),
            date_of_birth: None,
        };
        assert_eq!(
            header.to_string(),
            "John McClane (male)\nssn: 090786-122X\noccupation: New york city cop\n"
        );
    }
}
