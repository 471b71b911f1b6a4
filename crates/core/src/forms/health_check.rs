use super::common::{CommonFields, DiagnosisInput, DiagnosisInputStyle};
use super::{FormField, FormView, InputKind};
use crate::error::{FormError, FormResult};
use crate::normalize::{self, field};
use patientor_model::{
    DiagnosisCatalog, EntryDetails, EntryKind, HealthCheckDetails, HealthCheckRating, NewEntry,
};
use std::sync::Arc;

/// Creation form for `HealthCheck` entries.
///
/// The rating starts unselected and must be picked before the form normalises.
#[derive(Clone, Debug)]
pub struct HealthCheckForm {
    catalog: Arc<DiagnosisCatalog>,
    common: CommonFields,
    rating: String,
}

impl HealthCheckForm {
    pub fn new(catalog: Arc<DiagnosisCatalog>, style: DiagnosisInputStyle) -> Self {
        Self {
            catalog,
            common: CommonFields::new(style),
            rating: String::new(),
        }
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> FormResult<()> {
        if self.common.set(name, value)? {
            return Ok(());
        }
        match name {
            field::HEALTH_CHECK_RATING => {
                self.rating = value.to_string();
                Ok(())
            }
            other => Err(FormError::UnknownField(other.to_string())),
        }
    }

    pub fn view(&self) -> FormView {
        let options = HealthCheckRating::ALL
            .iter()
            .map(|r| r.name().to_string())
            .collect();

        let mut fields = self.common.leading_fields();
        fields.push(FormField::required(
            field::HEALTH_CHECK_RATING,
            "HealthCheck Rating",
            InputKind::Select(options),
            &self.rating,
        ));
        fields.push(self.common.diagnosis_field(&self.catalog));

        FormView {
            kind: EntryKind::HealthCheck,
            title: "New HealthCheckEntry".into(),
            fields,
        }
    }

    pub fn normalize(&self) -> FormResult<NewEntry> {
        let base = self.common.normalize()?;
        let health_check_rating = normalize::parse_rating(&self.rating)?;
        Ok(NewEntry {
            base,
            details: EntryDetails::HealthCheck(HealthCheckDetails {
                health_check_rating,
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

impl PartialEq for HealthCheckForm {
    fn eq(&self, other: &Self) -> bool {
        self.common == other.common && self.rating == other.rating
    }
}
