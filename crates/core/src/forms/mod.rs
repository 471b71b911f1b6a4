//! Entry creation forms.
//!
//! Forms are headless: each one owns the raw strings a user has entered and exposes a
//! [`FormView`] describing what a front end should draw. [`EntryFormDispatcher`] holds the
//! entry-type selector and at most one mounted form.

pub mod common;
pub mod health_check;
pub mod hospital;
pub mod occupational;

pub use common::{DiagnosisInput, DiagnosisInputStyle};
pub use health_check::HealthCheckForm;
pub use hospital::HospitalForm;
pub use occupational::OccupationalHealthcareForm;

use crate::error::{FormError, FormResult, SessionResult};
use crate::normalize;
use async_trait::async_trait;
use patientor_model::{DiagnosisCatalog, Entry, EntryKind, NewEntry};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Rendered form description
// ============================================================================

/// The kind of control a field is drawn with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "input", content = "options", rename_all = "camelCase")]
pub enum InputKind {
    Text,
    Date,
    Select(Vec<String>),
    MultiSelect(Vec<String>),
}

/// One field of a rendered form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FormField {
    /// Wire name accepted by `set_field`.
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub input: InputKind,
    pub value: String,
    pub required: bool,
}

impl FormField {
    pub fn required(name: &'static str, label: &'static str, input: InputKind, value: &str) -> Self {
        Self {
            name,
            label,
            input,
            value: value.to_string(),
            required: true,
        }
    }

    pub fn optional(name: &'static str, label: &'static str, input: InputKind, value: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, label, input, value)
        }
    }
}

/// A rendered form: title plus fields in display order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub kind: EntryKind,
    pub title: String,
    pub fields: Vec<FormField>,
}

impl fmt::Display for FormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for field in &self.fields {
            let marker = if field.required { "*" } else { "" };
            write!(f, "  {}{marker} [{}]", field.label, field.name)?;
            match &field.input {
                InputKind::Text => write!(f, " text")?,
                InputKind::Date => write!(f, " date")?,
                InputKind::Select(options) => write!(f, " one of: {}", options.join(", "))?,
                InputKind::MultiSelect(options) if options.is_empty() => {
                    write!(f, " any of: (no diagnoses)")?
                }
                InputKind::MultiSelect(options) => write!(f, " any of: {}", options.join(", "))?,
            }
            if !field.value.is_empty() {
                write!(f, " = {}", field.value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ============================================================================
// Submission target
// ============================================================================

/// Receiver of normalised entries. Implemented by the patient session.
#[async_trait]
pub trait EntrySink: Send {
    async fn submit_entry(&mut self, entry: NewEntry) -> SessionResult<Entry>;
}

// ============================================================================
// Dispatcher
// ============================================================================

/// The mounted form, one variant per entry kind.
#[derive(Clone, Debug, PartialEq)]
pub enum ActiveForm {
    HealthCheck(HealthCheckForm),
    Hospital(HospitalForm),
    OccupationalHealthcare(OccupationalHealthcareForm),
}

impl ActiveForm {
    pub fn new(kind: EntryKind, catalog: Arc<DiagnosisCatalog>, style: DiagnosisInputStyle) -> Self {
        match kind {
            EntryKind::HealthCheck => ActiveForm::HealthCheck(HealthCheckForm::new(catalog, style)),
            EntryKind::Hospital => ActiveForm::Hospital(HospitalForm::new(catalog, style)),
            EntryKind::OccupationalHealthcare => {
                ActiveForm::OccupationalHealthcare(OccupationalHealthcareForm::new(catalog, style))
            }
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            ActiveForm::HealthCheck(_) => EntryKind::HealthCheck,
            ActiveForm::Hospital(_) => EntryKind::Hospital,
            ActiveForm::OccupationalHealthcare(_) => EntryKind::OccupationalHealthcare,
        }
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> FormResult<()> {
        match self {
            ActiveForm::HealthCheck(form) => form.set_field(name, value),
            ActiveForm::Hospital(form) => form.set_field(name, value),
            ActiveForm::OccupationalHealthcare(form) => form.set_field(name, value),
        }
    }

    pub fn view(&self) -> FormView {
        match self {
            ActiveForm::HealthCheck(form) => form.view(),
            ActiveForm::Hospital(form) => form.view(),
            ActiveForm::OccupationalHealthcare(form) => form.view(),
        }
    }

    pub fn normalize(&self) -> FormResult<NewEntry> {
        match self {
            ActiveForm::HealthCheck(form) => form.normalize(),
            ActiveForm::Hospital(form) => form.normalize(),
            ActiveForm::OccupationalHealthcare(form) => form.normalize(),
        }
    }

    pub fn cancel(&mut self) {
        match self {
            ActiveForm::HealthCheck(form) => form.cancel(),
            ActiveForm::Hospital(form) => form.cancel(),
            ActiveForm::OccupationalHealthcare(form) => form.cancel(),
        }
    }

    fn diagnoses_mut(&mut self) -> (&mut DiagnosisInput, &DiagnosisCatalog) {
        match self {
            ActiveForm::HealthCheck(form) => form.diagnoses_mut(),
            ActiveForm::Hospital(form) => form.diagnoses_mut(),
            ActiveForm::OccupationalHealthcare(form) => form.diagnoses_mut(),
        }
    }
}

/// Entry-type selector plus the form mounted for the current selection.
///
/// Changing the selection always mounts a fresh form, so input never carries over from one
/// entry type to another.
#[derive(Clone, Debug)]
pub struct EntryFormDispatcher {
    catalog: Arc<DiagnosisCatalog>,
    style: DiagnosisInputStyle,
    selection: Option<EntryKind>,
    form: Option<ActiveForm>,
}

impl EntryFormDispatcher {
    /// Create a dispatcher with nothing selected.
    ///
    /// # Arguments
    ///
    /// * `catalog` - Diagnosis catalog offered by selection-style inputs.
    /// * `style` - How every form mounted by this dispatcher collects diagnosis codes.
    pub fn new(catalog: Arc<DiagnosisCatalog>, style: DiagnosisInputStyle) -> Self {
        Self {
            catalog,
            style,
            selection: None,
            form: None,
        }
    }

    /// Change the entry-type selection. `None` unmounts the form.
    pub fn select(&mut self, kind: Option<EntryKind>) {
        self.selection = kind;
        self.form = kind.map(|kind| ActiveForm::new(kind, self.catalog.clone(), self.style));
    }

    pub fn selection(&self) -> Option<EntryKind> {
        self.selection
    }

    pub fn style(&self) -> DiagnosisInputStyle {
        self.style
    }

    pub fn form(&self) -> Option<&ActiveForm> {
        self.form.as_ref()
    }

    /// The mounted form's view, or `None` when no entry type is selected.
    pub fn view(&self) -> Option<FormView> {
        self.form.as_ref().map(ActiveForm::view)
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> FormResult<()> {
        self.form_mut()?.set_field(name, value)
    }

    /// Select or deselect one catalog code on the mounted form.
    pub fn toggle_diagnosis(&mut self, code: &str) -> FormResult<bool> {
        let (input, catalog) = self.form_mut()?.diagnoses_mut();
        input.toggle(code, catalog)
    }

    /// Replace the mounted form's diagnosis selection.
    pub fn set_diagnosis_selection<S: AsRef<str>>(&mut self, codes: &[S]) -> FormResult<()> {
        let (input, catalog) = self.form_mut()?.diagnoses_mut();
        input.set_selection(codes, catalog)
    }

    /// Normalise the mounted form into a creation payload.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NoFormSelected`] when nothing is mounted, otherwise the first
    /// validation failure of the form.
    pub fn normalize(&self) -> FormResult<NewEntry> {
        let entry = self
            .form
            .as_ref()
            .ok_or(FormError::NoFormSelected)?
            .normalize()?;
        normalize::trace_payload(&entry);
        Ok(entry)
    }

    /// Reset the mounted form to its initial empty state. The selection is kept.
    pub fn cancel(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.cancel();
        }
    }

    /// Normalise the mounted form and hand the payload to `sink`.
    ///
    /// Form state is left untouched whatever the outcome.
    pub async fn submit<S: EntrySink + ?Sized>(&self, sink: &mut S) -> SessionResult<Entry> {
        let entry = self.normalize()?;
        sink.submit_entry(entry).await
    }

    fn form_mut(&mut self) -> FormResult<&mut ActiveForm> {
        self.form.as_mut().ok_or(FormError::NoFormSelected)
    }
}
