use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use patientor_client::{ClientConfig, HttpPatientApi, API_URL_ENV, REQUEST_TIMEOUT_SECS_ENV};
use patientor_core::config::NOTIFICATION_SECS_ENV;
use patientor_core::constants::PATIENT_NOT_FOUND;
use patientor_core::normalize::field;
use patientor_core::{
    render_entry, session_config_from_env_value, DiagnosisInputStyle, EntryFormDispatcher,
    PatientApi, PatientSession, SessionConfig, SessionError, SessionState,
};
use patientor_model::{DiagnosisCatalog, EntryKind, PatientId};

#[derive(Parser)]
#[command(name = "patientor")]
#[command(about = "Patient entry viewer and editor")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a patient and their entries
    Show {
        /// Patient id
        patient_id: String,
        /// Print the patient as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the diagnosis catalog
    Diagnoses,
    /// Print the creation form for an entry type
    Form {
        /// HealthCheck, Hospital or OccupationalHealthcare
        kind: EntryKind,
        /// Take diagnosis codes as comma-separated text instead of a selection
        #[arg(long)]
        free_text: bool,
    },
    /// Add an entry to a patient
    Add(AddArgs),
}

#[derive(Args)]
struct AddArgs {
    /// Patient id
    patient_id: String,
    /// HealthCheck, Hospital or OccupationalHealthcare
    kind: EntryKind,
    #[arg(long)]
    description: Option<String>,
    /// Date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    specialist: Option<String>,
    /// Diagnosis codes (comma-separated)
    #[arg(long)]
    diagnosis_codes: Option<String>,
    /// Health check rating, by name or number (HealthCheck)
    #[arg(long)]
    rating: Option<String>,
    /// Discharge date (Hospital)
    #[arg(long)]
    discharge_date: Option<String>,
    /// Discharge criteria (Hospital)
    #[arg(long)]
    discharge_criteria: Option<String>,
    /// Employer name (OccupationalHealthcare)
    #[arg(long)]
    employer: Option<String>,
    /// Sick leave start date (OccupationalHealthcare)
    #[arg(long)]
    sick_leave_start: Option<String>,
    /// Sick leave end date (OccupationalHealthcare)
    #[arg(long)]
    sick_leave_end: Option<String>,
}

impl AddArgs {
    /// Form values given on the command line, keyed by field name.
    fn field_values(&self) -> Vec<(&'static str, &str)> {
        [
            (field::DESCRIPTION, &self.description),
            (field::DATE, &self.date),
            (field::SPECIALIST, &self.specialist),
            (field::DIAGNOSIS_CODES, &self.diagnosis_codes),
            (field::HEALTH_CHECK_RATING, &self.rating),
            (field::DISCHARGE_DATE, &self.discharge_date),
            (field::DISCHARGE_CRITERIA, &self.discharge_criteria),
            (field::EMPLOYER_NAME, &self.employer),
            (field::SICK_LEAVE_START, &self.sick_leave_start),
            (field::SICK_LEAVE_END, &self.sick_leave_end),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
        .collect()
    }
}

/// Main entry point for the patientor CLI
///
/// Configuration is read once here and passed down.
///
/// # Environment Variables
/// - `PATIENTOR_API_URL`: patient service base URL (default: "http://localhost:3001/api")
/// - `PATIENTOR_REQUEST_TIMEOUT_SECS`: per-request timeout (default: 10)
/// - `PATIENTOR_NOTIFICATION_SECS`: how long error notifications stay visible (default: 5)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patientor=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'patientor --help' for commands");
        return Ok(());
    };

    let client_config = ClientConfig::from_env_values(
        std::env::var(API_URL_ENV).ok(),
        std::env::var(REQUEST_TIMEOUT_SECS_ENV).ok(),
    )?;
    let session_config = session_config_from_env_value(std::env::var(NOTIFICATION_SECS_ENV).ok())?;
    let api = HttpPatientApi::new(&client_config)?;
    tracing::info!("++ Using patient service at {}", client_config.base_url());

    match command {
        Commands::Show { patient_id, json } => show(api, &session_config, patient_id, json).await,
        Commands::Diagnoses => diagnoses(&api).await,
        Commands::Form { kind, free_text } => form(&api, kind, free_text).await,
        Commands::Add(args) => add(api, &session_config, args).await,
    }
}

async fn show(
    api: HttpPatientApi,
    config: &SessionConfig,
    patient_id: String,
    json: bool,
) -> anyhow::Result<()> {
    let mut session = PatientSession::new(api, config);
    if session.load(&PatientId::new(patient_id)).await? == SessionState::NotFound {
        println!("{PATIENT_NOT_FOUND}");
        return Ok(());
    }

    if let (true, Some(patient)) = (json, session.patient()) {
        println!("{}", serde_json::to_string_pretty(patient)?);
        return Ok(());
    }
    if let Some(header) = session.header() {
        println!("{header}");
    }
    println!("entries");
    for view in session.entry_views().unwrap_or_default() {
        println!("{view}");
    }
    Ok(())
}

async fn diagnoses(api: &HttpPatientApi) -> anyhow::Result<()> {
    let catalog = api.fetch_diagnoses().await?;
    if catalog.is_empty() {
        println!("No diagnoses found.");
    }
    for diagnosis in catalog {
        match diagnosis.latin {
            Some(latin) => println!("{} {} ({latin})", diagnosis.code, diagnosis.name),
            None => println!("{} {}", diagnosis.code, diagnosis.name),
        }
    }
    Ok(())
}

async fn form(api: &HttpPatientApi, kind: EntryKind, free_text: bool) -> anyhow::Result<()> {
    let style = if free_text {
        DiagnosisInputStyle::FreeText
    } else {
        DiagnosisInputStyle::Selection
    };
    let catalog = match style {
        DiagnosisInputStyle::FreeText => DiagnosisCatalog::default(),
        DiagnosisInputStyle::Selection => DiagnosisCatalog::new(api.fetch_diagnoses().await?),
    };

    let mut dispatcher = EntryFormDispatcher::new(Arc::new(catalog), style);
    dispatcher.select(Some(kind));
    if let Some(view) = dispatcher.view() {
        print!("{view}");
    }
    Ok(())
}

async fn add(api: HttpPatientApi, config: &SessionConfig, args: AddArgs) -> anyhow::Result<()> {
    let mut session =
        PatientSession::new(api, config).with_diagnosis_style(DiagnosisInputStyle::FreeText);
    let patient_id = PatientId::new(args.patient_id.clone());
    if session.load(&patient_id).await? == SessionState::NotFound {
        println!("{PATIENT_NOT_FOUND}");
        return Ok(());
    }

    let forms = session
        .forms_mut()
        .context("entry forms unavailable for this patient")?;
    forms.select(Some(args.kind));
    for (name, value) in args.field_values() {
        forms
            .set_field(name, value)
            .with_context(|| format!("field '{name}' does not apply to {} entries", args.kind))?;
    }

    match session.submit_form().await {
        Ok(entry) => {
            let catalog = session.catalog().cloned().unwrap_or_default();
            println!("Added entry {}", entry.id);
            print!("{}", render_entry(&entry, &catalog));
            Ok(())
        }
        Err(SessionError::Create(e)) => {
            tracing::error!("Add entry error: {:?}", e);
            if let Some(notification) = session.notifications().current() {
                eprintln!("{}", notification.message);
            }
            session.notifications().cleared().await;
            Err(anyhow::Error::new(e).context("entry was not added"))
        }
        Err(e) => Err(e.into()),
    }
}
