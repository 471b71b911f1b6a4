use super::common::{CommonFields, DiagnosisInput, DiagnosisInputStyle};
use super::{FormField, FormView, InputKind};
use crate::error::{FormError, FormResult};
use crate::normalize::{self, field};
use patientor_model::{
    DiagnosisCatalog, EntryDetails, EntryKind, NewEntry, OccupationalHealthcareDetails,
};
use std::sync::Arc;

/// Creation form for `OccupationalHealthcare` entries.
///
/// The sick-leave dates are optional as a pair: unless both are filled in, the payload carries
/// no `sickLeave` at all.
#[derive(Clone, Debug)]
pub struct OccupationalHealthcareForm {
    catalog: Arc<DiagnosisCatalog>,
    common: CommonFields,
    employer_name: String,
    sick_leave_start: String,
    sick_leave_end: String,
}

impl OccupationalHealthcareForm {
    pub fn new(catalog: Arc<DiagnosisCatalog>, style: DiagnosisInputStyle) -> Self {
        Self {
            catalog,
            common: CommonFields::new(style),
            employer_name: String::new(),
            sick_leave_start: String::new(),
            sick_leave_end: String::new(),
        }
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> FormResult<()> {
        if self.common.set(name, value)? {
            return Ok(());
        }
        match name {
            field::EMPLOYER_NAME => self.employer_name = value.to_string(),
            field::SICK_LEAVE_START => self.sick_leave_start = value.to_string(),
            field::SICK_LEAVE_END => self.sick_leave_end = value.to_string(),
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    pub fn view(&self) -> FormView {
        let mut fields = self.common.leading_fields();
        fields.push(FormField::required(
            field::EMPLOYER_NAME,
            "Employer Name",
            InputKind::Text,
            &self.employer_name,
        ));
        fields.push(FormField::optional(
            field::SICK_LEAVE_START,
            "Sick Leave Start Date",
            InputKind::Date,
            &self.sick_leave_start,
        ));
        fields.push(FormField::optional(
            field::SICK_LEAVE_END,
            "Sick Leave End Date",
            InputKind::Date,
            &self.sick_leave_end,
        ));
        fields.push(self.common.diagnosis_field(&self.catalog));

        FormView {
            kind: EntryKind::OccupationalHealthcare,
            title: "New OccupationalHealthcareEntry".into(),
            fields,
        }
    }

    pub fn normalize(&self) -> FormResult<NewEntry> {
        let base = self.common.normalize()?;
        let employer_name = normalize::required_text(field::EMPLOYER_NAME, &self.employer_name)?;
        let sick_leave =
            normalize::normalize_sick_leave(&self.sick_leave_start, &self.sick_leave_end)?;
        Ok(NewEntry {
            base,
            details: EntryDetails::OccupationalHealthcare(OccupationalHealthcareDetails {
                employer_name,
                sick_leave,
            }),
        })
    }

    pub fn cancel(&mut self) {
        *self = Self::new(self.catalog.clone(), self.common.diagnoses.style());
    }

    pub(crate) fn diagnoses_mut(&mut self) -> (&mut DiagnosisInput, &DiagnosisCatalog) {
        (&mut self.common.diagnoses, &self.catalog)
    }
}

impl PartialEq for OccupationalHealthcareForm {
    fn eq(&self, other: &Self) -> bool {
        self.common == other.common
            && self.employer_name == other.employer_name
            && self.sick_leave_start == other.sick_leave_start
            && self.sick_leave_end == other.sick_leave_end
    }
}
