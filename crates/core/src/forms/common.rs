//! State shared by every entry form: the common text fields and the diagnosis input.

use super::{FormField, InputKind};
use crate::error::{FormError, FormResult};
use crate::normalize::{self, field, RawBase};
use patientor_model::{DiagnosisCatalog, EntryBase};
use serde::Serialize;
use std::fmt;

/// How a form collects diagnosis codes. Fixed for the lifetime of a form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum DiagnosisInputStyle {
    /// A comma-separated text field.
    FreeText,
    /// A multi-select over catalog codes.
    #[default]
    Selection,
}

impl fmt::Display for DiagnosisInputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagnosisInputStyle::FreeText => "free text",
            DiagnosisInputStyle::Selection => "a selection",
        })
    }
}

/// Diagnosis codes as entered so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosisInput {
    FreeText(String),
    Selection(Vec<String>),
}

impl DiagnosisInput {
    pub fn empty(style: DiagnosisInputStyle) -> Self {
        match style {
            DiagnosisInputStyle::FreeText => DiagnosisInput::FreeText(String::new()),
            DiagnosisInputStyle::Selection => DiagnosisInput::Selection(Vec::new()),
        }
    }

    pub fn style(&self) -> DiagnosisInputStyle {
        match self {
            DiagnosisInput::FreeText(_) => DiagnosisInputStyle::FreeText,
            DiagnosisInput::Selection(_) => DiagnosisInputStyle::Selection,
        }
    }

    /// Replace the free-text value.
    pub fn set_text(&mut self, text: &str) -> FormResult<()> {
        match self {
            DiagnosisInput::FreeText(current) => {
                *current = text.to_string();
                Ok(())
            }
            DiagnosisInput::Selection(_) => Err(FormError::WrongDiagnosisInput {
                expected: DiagnosisInputStyle::Selection,
            }),
        }
    }

    /// Select or deselect one catalog code. Returns whether the code is now selected.
    pub fn toggle(&mut self, code: &str, catalog: &DiagnosisCatalog) -> FormResult<bool> {
        let selected = self.selection_mut()?;
        if let Some(pos) = selected.iter().position(|c| c == code) {
            selected.remove(pos);
            return Ok(false);
        }
        if !catalog.contains(code) {
            return Err(FormError::UnknownDiagnosis(code.to_string()));
        }
        selected.push(code.to_string());
        Ok(true)
    }

    /// Replace the selection. A single comma-joined value (browser autofill) is split first.
    pub fn set_selection<S: AsRef<str>>(
        &mut self,
        codes: &[S],
        catalog: &DiagnosisCatalog,
    ) -> FormResult<()> {
        let codes: Vec<String> = match codes {
            [single] => single.as_ref().split(',').map(str::to_string).collect(),
            many => many.iter().map(|c| c.as_ref().to_string()).collect(),
        };
        if let Some(unknown) = codes.iter().find(|c| !catalog.contains(c)) {
            return Err(FormError::UnknownDiagnosis(unknown.clone()));
        }
        *self.selection_mut()? = codes;
        Ok(())
    }

    /// The codes this input currently represents, placeholders included.
    pub fn codes(&self) -> Vec<String> {
        match self {
            DiagnosisInput::FreeText(text) => normalize::parse_diagnosis_codes(text),
            DiagnosisInput::Selection(codes) => codes.clone(),
        }
    }

    /// Display value, joined the way a multi-select shows its picks.
    pub fn display_value(&self) -> String {
        match self {
            DiagnosisInput::FreeText(text) => text.clone(),
            DiagnosisInput::Selection(codes) => codes.join(", "),
        }
    }

    fn selection_mut(&mut self) -> FormResult<&mut Vec<String>> {
        match self {
            DiagnosisInput::Selection(codes) => Ok(codes),
            DiagnosisInput::FreeText(_) => Err(FormError::WrongDiagnosisInput {
                expected: DiagnosisInputStyle::FreeText,
            }),
        }
    }
}

/// Description, date, specialist and diagnoses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CommonFields {
    pub description: String,
    pub date: String,
    pub specialist: String,
    pub diagnoses: DiagnosisInput,
}

impl CommonFields {
    pub fn new(style: DiagnosisInputStyle) -> Self {
        Self {
            description: String::new(),
            date: String::new(),
            specialist: String::new(),
            diagnoses: DiagnosisInput::empty(style),
        }
    }

    /// Set one of the common fields. Returns `Ok(false)` if `name` is not a common field.
    pub fn set(&mut self, name: &str, value: &str) -> FormResult<bool> {
        match name {
            field::DESCRIPTION => self.description = value.to_string(),
            field::DATE => self.date = value.to_string(),
            field::SPECIALIST => self.specialist = value.to_string(),
            field::DIAGNOSIS_CODES => self.diagnoses.set_text(value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub fn normalize(&self) -> FormResult<EntryBase> {
        let codes = self.diagnoses.codes();
        normalize::normalize_base(RawBase {
            description: &self.description,
            date: &self.date,
            specialist: &self.specialist,
            diagnosis_codes: &codes,
        })
    }

    /// Leading fields: description, date, specialist.
    pub fn leading_fields(&self) -> Vec<FormField> {
        vec![
            FormField::required(
                field::DESCRIPTION,
                "Description",
                InputKind::Text,
                &self.description,
            ),
            FormField::required(field::DATE, "Date", InputKind::Date, &self.date),
            FormField::required(
                field::SPECIALIST,
                "Specialist",
                InputKind::Text,
                &self.specialist,
            ),
        ]
    }

    /// Trailing diagnosis field.
    pub fn diagnosis_field(&self, catalog: &DiagnosisCatalog) -> FormField {
        let input = match self.diagnoses.style() {
            DiagnosisInputStyle::FreeText => InputKind::Text,
            DiagnosisInputStyle::Selection => {
                InputKind::MultiSelect(catalog.codes().map(str::to_string).collect())
            }
        };
        FormField::optional(
            field::DIAGNOSIS_CODES,
            "Diagnosis Codes",
            input,
            &self.diagnoses.display_value(),
        )
    }
}
