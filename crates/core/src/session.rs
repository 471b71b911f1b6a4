//! Patient viewing session.
//!
//! A session loads one patient together with the diagnosis catalog, exposes the entry views and
//! the entry forms while the patient is shown, and appends entries the service confirms. Creation
//! failures surface through the session's [`Notifier`].

use crate::api::PatientApi;
use crate::config::SessionConfig;
use crate::detail::{self, EntryView, PatientHeader};
use crate::error::{SessionError, SessionResult};
use crate::forms::{DiagnosisInputStyle, EntryFormDispatcher, EntrySink};
use crate::notification::Notifier;
use async_trait::async_trait;
use patientor_model::{DiagnosisCatalog, Entry, NewEntry, Patient, PatientId};
use std::sync::Arc;

/// Observable phase of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Fetches in flight, or never started.
    Loading,
    /// The requested patient does not exist. Entry controls are unavailable.
    NotFound,
    /// Patient and catalog are loaded.
    Ready,
}

#[derive(Debug)]
enum Phase {
    Loading,
    NotFound,
    Ready(Loaded),
}

#[derive(Debug)]
struct Loaded {
    patient: Patient,
    catalog: Arc<DiagnosisCatalog>,
    forms: EntryFormDispatcher,
}

/// Session controller for one patient page.
#[derive(Debug)]
pub struct PatientSession<A: PatientApi> {
    api: A,
    style: DiagnosisInputStyle,
    phase: Phase,
    notifier: Notifier,
}

impl<A: PatientApi> PatientSession<A> {
    /// Create a session in the `Loading` state. Forms use selection-style diagnosis input.
    pub fn new(api: A, config: &SessionConfig) -> Self {
        Self {
            api,
            style: DiagnosisInputStyle::default(),
            phase: Phase::Loading,
            notifier: Notifier::new(config.notification_timeout()),
        }
    }

    /// Use `style` for diagnosis input on forms mounted after the next load.
    pub fn with_diagnosis_style(mut self, style: DiagnosisInputStyle) -> Self {
        self.style = style;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetch the patient and the diagnosis catalog concurrently.
    ///
    /// Any previously shown patient is discarded first.
    ///
    /// # Returns
    ///
    /// The new state: `Ready` or `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Fetch`] if either fetch fails. The session then stays `Loading`.
    pub async fn load(&mut self, patient_id: &PatientId) -> SessionResult<SessionState> {
        self.phase = Phase::Loading;
        self.notifier.clear();

        let (patient, diagnoses) = tokio::join!(
            self.api.fetch_patient(patient_id),
            self.api.fetch_diagnoses()
        );

        let Some(patient) = patient.map_err(SessionError::Fetch)? else {
            tracing::warn!(patient_id = %patient_id, "patient not found");
            self.phase = Phase::NotFound;
            return Ok(SessionState::NotFound);
        };
        let catalog = Arc::new(DiagnosisCatalog::new(
            diagnoses.map_err(SessionError::Fetch)?,
        ));

        tracing::info!(
            patient_id = %patient_id,
            entries = patient.entries.len(),
            diagnoses = catalog.len(),
            "patient loaded"
        );
        let forms = EntryFormDispatcher::new(catalog.clone(), self.style);
        self.phase = Phase::Ready(Loaded {
            patient,
            catalog,
            forms,
        });
        Ok(SessionState::Ready)
    }

    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Loading => SessionState::Loading,
            Phase::NotFound => SessionState::NotFound,
            Phase::Ready(_) => SessionState::Ready,
        }
    }

    pub fn patient(&self) -> Option<&Patient> {
        self.loaded().map(|l| &l.patient)
    }

    pub fn catalog(&self) -> Option<&DiagnosisCatalog> {
        self.loaded().map(|l| l.catalog.as_ref())
    }

    pub fn forms(&self) -> Option<&EntryFormDispatcher> {
        self.loaded().map(|l| &l.forms)
    }

    pub fn forms_mut(&mut self) -> Option<&mut EntryFormDispatcher> {
        match &mut self.phase {
            Phase::Ready(loaded) => Some(&mut loaded.forms),
            _ => None,
        }
    }

    pub fn header(&self) -> Option<PatientHeader> {
        self.patient().map(PatientHeader::from)
    }

    /// Views of every entry in stored order.
    pub fn entry_views(&self) -> Option<Vec<EntryView>> {
        self.loaded()
            .map(|l| detail::render_entries(&l.patient, &l.catalog))
    }

    pub fn notifications(&self) -> &Notifier {
        &self.notifier
    }

    /// Create an entry for the shown patient.
    ///
    /// On success the confirmed entry is appended and returned. On failure the notification
    /// is raised with the service's message and the entry list is left as it was.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotReady`] if no patient is shown.
    /// - [`SessionError::Create`] if the service refuses or cannot be reached.
    pub async fn create_entry(&mut self, entry: NewEntry) -> SessionResult<Entry> {
        let Phase::Ready(loaded) = &mut self.phase else {
            return Err(SessionError::NotReady);
        };

        match self.api.create_entry(&loaded.patient.id, &entry).await {
            Ok(created) => {
                tracing::info!(
                    patient_id = %loaded.patient.id,
                    entry_id = %created.id,
                    kind = %created.kind(),
                    "entry added"
                );
                loaded.patient.entries.push(created.clone());
                Ok(created)
            }
            Err(e) => {
                let message = e.user_message();
                tracing::error!(patient_id = %loaded.patient.id, "failed to add entry: {message}");
                self.notifier.raise(message);
                Err(SessionError::Create(e))
            }
        }
    }

    /// Normalise the mounted form and create the entry. The form keeps its input either way.
    pub async fn submit_form(&mut self) -> SessionResult<Entry> {
        let entry = self.forms().ok_or(SessionError::NotReady)?.normalize()?;
        self.create_entry(entry).await
    }

    fn loaded(&self) -> Option<&Loaded> {
        match &self.phase {
            Phase::Ready(loaded) => Some(loaded),
            _ => None,
        }
    }
}

#[async_trait]
impl<A: PatientApi> EntrySink for PatientSession<A> {
    async fn submit_entry(&mut self, entry: NewEntry) -> SessionResult<Entry> {
        self.create_entry(entry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::error::FormError;
    use patientor_model::{parse_patient, Diagnosis, EntryId, EntryKind};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Barrier;

    const PATIENT: &str = r#"{
        "id": "d2773336-f723-11e9-8f0b-362b9e155667",
        "name": "John McClane",
        "dateOfBirth": "1986-07-09",
        "ssn": "090786-122X",
        "gender": "male",
        "occupation": "New york city cop",
        "entries": [{
            "id": "b4f4eca1-2aa7-4b13-9a18-4a5535c3c8da",
            "date": "2019-10-20",
            "specialist": "MD House",
            "type": "HealthCheck",
            "description": "Yearly control visit. Cholesterol levels back to normal.",
            "healthCheckRating": 0
        }]
    }"#;

    struct FakeApi {
        patient: Option<Patient>,
        diagnoses: Vec<Diagnosis>,
        rejection: Option<ApiError>,
        created: Mutex<Vec<NewEntry>>,
        barrier: Option<Barrier>,
    }

    impl FakeApi {
        fn with_patient() -> Self {
            Self {
                patient: Some(parse_patient(PATIENT).expect("fixture")),
                diagnoses: vec![Diagnosis {
                    code: "M24.2".into(),
                    name: "Disorder of ligament".into(),
                    latin: None,
                }],
                rejection: None,
                created: Mutex::new(Vec::new()),
                barrier: None,
            }
        }

        fn rejecting(body: &str) -> Self {
            Self {
                rejection: Some(ApiError::Rejected {
                    status: 400,
                    body: body.into(),
                }),
                ..Self::with_patient()
            }
        }

        async fn rendezvous(&self) {
            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }
        }
    }

    #[async_trait]
    impl PatientApi for FakeApi {
        async fn fetch_patient(&self, id: &PatientId) -> Result<Option<Patient>, ApiError> {
            self.rendezvous().await;
            Ok(self.patient.clone().filter(|p| &p.id == id))
        }

        async fn fetch_diagnoses(&self) -> Result<Vec<Diagnosis>, ApiError> {
            self.rendezvous().await;
            Ok(self.diagnoses.clone())
        }

        async fn create_entry(
            &self,
            _patient: &PatientId,
            entry: &NewEntry,
        ) -> Result<Entry, ApiError> {
            if let Some(err) = &self.rejection {
                return Err(err.clone());
            }
            let mut created = self.created.lock().unwrap();
            created.push(entry.clone());
            Ok(entry.clone().with_id(EntryId::new(format!("new-{}", created.len()))))
        }
    }

    fn patient_id() -> PatientId {
        PatientId::new("d2773336-f723-11e9-8f0b-362b9e155667")
    }

    fn fill_hospital_form(session: &mut PatientSession<FakeApi>) {
        let forms = session.forms_mut().expect("ready");
        forms.select(Some(EntryKind::Hospital));
        forms.set_field("description", "Fractured arm").unwrap();
        forms.set_field("date", "2024-01-02").unwrap();
        forms.set_field("specialist", "Dr. X").unwrap();
        forms.set_field("discharge.date", "2024-01-10").unwrap();
        forms.set_field("discharge.criteria", "Healed").unwrap();
    }

    #[tokio::test]
    async fn unknown_patient_hides_entry_controls() {
        let mut session = PatientSession::new(FakeApi::with_patient(), &SessionConfig::default());
        let state = session
            .load(&PatientId::new("no-such-patient"))
            .await
            .expect("load");

        assert_eq!(state, SessionState::NotFound);
        assert!(session.patient().is_none());
        assert!(session.forms().is_none());
        assert!(session.entry_views().is_none());
        assert!(matches!(
            session.submit_form().await,
            Err(SessionError::NotReady)
        ));
    }

    #[tokio::test]
    async fn load_exposes_patient_and_catalog() {
        let mut session = PatientSession::new(FakeApi::with_patient(), &SessionConfig::default());
        assert_eq!(session.state(), SessionState::Loading);

        session.load(&patient_id()).await.expect("load");
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.catalog().map(DiagnosisCatalog::len), Some(1));
        assert_eq!(session.entry_views().map(|v| v.len()), Some(1));
        assert_eq!(session.header().unwrap().name, "John McClane");
        assert_eq!(session.forms().unwrap().selection(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_run_concurrently() {
        let api = FakeApi {
            barrier: Some(Barrier::new(2)),
            ..FakeApi::with_patient()
        };
        let mut session = PatientSession::new(api, &SessionConfig::default());

        // Sequential fetches would wait on the barrier forever.
        let state = tokio::time::timeout(Duration::from_secs(1), session.load(&patient_id()))
            .await
            .expect("both fetches in flight together")
            .expect("load");
        assert_eq!(state, SessionState::Ready);
    }

    #[tokio::test]
    async fn confirmed_entry_is_appended() {
        let mut session = PatientSession::new(FakeApi::with_patient(), &SessionConfig::default());
        session.load(&patient_id()).await.expect("load");
        fill_hospital_form(&mut session);

        let entry = session.submit_form().await.expect("created");

        assert_eq!(entry.id.as_str(), "new-1");
        let patient = session.patient().unwrap();
        assert_eq!(patient.entries.len(), 2);
        assert_eq!(patient.entries.last(), Some(&entry));

        let sent = session.api().created.lock().unwrap();
        let json = serde_json::to_value(&sent[0]).unwrap();
        assert_eq!(json["type"], "Hospital");
        assert!(json.get("healthCheckRating").is_none());
        assert!(json.get("employerName").is_none());
        drop(sent);

        assert!(session.notifications().current().is_none());
        // The form keeps its input after submission.
        let view = session.forms().unwrap().view().unwrap();
        assert_eq!(view.fields[0].value, "Fractured arm");
    }

    #[tokio::test(start_paused = true)]
    async fn rejection_raises_a_timed_notification() {
        let mut session = PatientSession::new(
            FakeApi::rejecting("Something went wrong. Error: Date is required"),
            &SessionConfig::default(),
        );
        session.load(&patient_id()).await.expect("load");
        fill_hospital_form(&mut session);

        let err = session.submit_form().await.expect_err("rejected");
        assert!(matches!(err, SessionError::Create(ApiError::Rejected { .. })));
        assert_eq!(
            session.notifications().current().map(|n| n.message),
            Some("Date is required".to_string())
        );
        assert_eq!(session.patient().unwrap().entries.len(), 1);

        tokio::time::sleep(Duration::from_millis(5_100)).await;
        assert!(session.notifications().current().is_none());
        assert_eq!(session.patient().unwrap().entries.len(), 1);
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_service() {
        let mut session = PatientSession::new(FakeApi::with_patient(), &SessionConfig::default());
        session.load(&patient_id()).await.expect("load");
        fill_hospital_form(&mut session);
        session
            .forms_mut()
            .unwrap()
            .set_field("discharge.date", "")
            .unwrap();

        let err = session.submit_form().await.expect_err("invalid");
        assert!(matches!(
            err,
            SessionError::Form(FormError::MissingField("discharge.date"))
        ));
        assert!(session.api().created.lock().unwrap().is_empty());
        assert!(session.notifications().current().is_none());
    }

    #[tokio::test]
    async fn standalone_dispatcher_submits_into_session() {
        let mut session = PatientSession::new(FakeApi::with_patient(), &SessionConfig::default());
        session.load(&patient_id()).await.expect("load");

        let catalog = Arc::new(session.catalog().unwrap().clone());
        let mut forms = EntryFormDispatcher::new(catalog, DiagnosisInputStyle::FreeText);
        forms.select(Some(EntryKind::OccupationalHealthcare));
        forms.set_field("description", "Strained back").unwrap();
        forms.set_field("date", "2024-02-01").unwrap();
        forms.set_field("specialist", "Dr. Z").unwrap();
        forms.set_field("employerName", "HyPD").unwrap();
        forms.set_field("diagnosisCodes", "M24.2").unwrap();

        let entry = forms.submit(&mut session).await.expect("created");
        assert_eq!(entry.kind(), EntryKind::OccupationalHealthcare);
        assert_eq!(session.patient().unwrap().entries.len(), 2);
    }
}
