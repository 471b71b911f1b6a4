use super::common::{CommonFields, DiagnosisInput, DiagnosisInputStyle};
use super::{FormField, FormView, InputKind};
use crate::error::{FormError, FormResult};
use crate::normalize::{self, field};
use patientor_model::{DiagnosisCatalog, EntryDetails, EntryKind, HospitalDetails, NewEntry};
use std::sync::Arc;

/// Creation form for `Hospital` entries. Both discharge fields are required.
#[derive(Clone, Debug)]
pub struct HospitalForm {
    catalog: Arc<DiagnosisCatalog>,
    common: CommonFields,
    discharge_date: String,
    discharge_criteria: String,
}

impl HospitalForm {
    pub fn new(catalog: Arc<DiagnosisCatalog>, style: DiagnosisInputStyle) -> Self {
        Self {
            catalog,
            common: CommonFields::new(style),
            discharge_date: String::new(),
            discharge_criteria: String::new(),
        }
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> FormResult<()> {
        if self.common.set(name, value)? {
            return Ok(());
        }
        match name {
            field::DISCHARGE_DATE => self.discharge_date = value.to_string(),
            field::DISCHARGE_CRITERIA => self.discharge_criteria = value.to_string(),
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    pub fn view(&self) -> FormView {
        let mut fields = self.common.leading_fields();
        fields.push(FormField::required(
            field::DISCHARGE_DATE,
            "Discharge Date",
            InputKind::Date,
            &self.discharge_date,
        ));
        fields.push(FormField::required(
            field::DISCHARGE_CRITERIA,
            "Discharge Criteria",
            InputKind::Text,
            &self.discharge_criteria,
        ));
        fields.push(self.common.diagnosis_field(&self.catalog));

        FormView {
            kind: EntryKind::Hospital,
            title: "New HospitalEntry".into(),
            fields,
        }
    }

    pub fn normalize(&self) -> FormResult<NewEntry> {
        let base = self.common.normalize()?;
        let discharge =
            normalize::normalize_discharge(&self.discharge_date, &self.discharge_criteria)?;
        Ok(NewEntry {
            base,
            details: EntryDetails::Hospital(HospitalDetails { discharge }),
        })
    }

    pub fn cancel(&mut self) {
        *self = Self::new(self.catalog.clone(), self.common.diagnoses.style());
    }

    pub(crate) fn diagnoses_mut(&mut self) -> (&mut DiagnosisInput, &DiagnosisCatalog) {
        (&mut self.common.diagnoses, &self.catalog)
    }
}

impl PartialEq for HospitalForm {
    fn eq(&self, other: &Self) -> bool {
        self.common == other.common
            && self.discharge_date == other.discharge_date
            && self.discharge_criteria == other.discharge_criteria
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fractured_arm() -> HospitalForm {
        let mut form = HospitalForm::new(
            Arc::new(DiagnosisCatalog::default()),
            DiagnosisInputStyle::Selection,
        );
        form.set_field("description", "Fractured arm").unwrap();
        form.set_field("date", "2024-01-02").unwrap();
        form.set_field("specialist", "Dr. X").unwrap();
        form.set_field("discharge.date", "2024-01-10").unwrap();
        form.set_field("discharge.criteria", "Healed").unwrap();
        form
    }

    #[test]
    fn payload_has_exactly_the_hospital_fields() {
        let entry = fractured_arm().normalize().expect("valid form");
        let value = serde_json::to_value(&entry).unwrap();
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
    fn missing_criteria_blocks_submission() {
        let mut form = fractured_arm();
        form.set_field("discharge.criteria", "").unwrap();
        assert_eq!(
            form.normalize(),
            Err(FormError::MissingField("discharge.criteria"))
        );
    }

    #[test]
    fn view_lists_fields_in_order() {
        let view = fractured_arm().view();
        let names: Vec<_> = view.fields.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            [
                "description",
                "date",
                "specialist",
                "discharge.date",
                "discharge.criteria",
                "diagnosisCodes"
            ]
        );
        assert!(view.fields[3].required);
        assert!(!view.fields[5].required);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut form = fractured_arm();
        form.cancel();
        let once = form.clone();
        form.cancel();
        assert_eq!(form, once);
        assert_eq!(form.view().fields.iter().filter(|f| !f.value.is_empty()).count(), 0);
        assert_eq!(
            form.normalize(),
            Err(FormError::MissingField("description"))
        );
    }
}
