use crate::{ClientConfig, ClientError};
use async_trait::async_trait;
use patientor_core::{ApiError, PatientApi};
use patientor_model::{
    parse_diagnoses, parse_entry, parse_patient, Diagnosis, Entry, NewEntry, Patient, PatientId,
};
use reqwest::{Response, StatusCode, Url};

/// [`PatientApi`] over HTTP.
#[derive(Clone, Debug)]
pub struct HttpPatientApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpPatientApi {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url().clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Transport(format!("cannot extend base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

/// Body text of a successful response, or a rejection carrying the service's message.
async fn success_text(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(ApiError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl PatientApi for HttpPatientApi {
    async fn fetch_patient(&self, id: &PatientId) -> Result<Option<Patient>, ApiError> {
        let url = self.endpoint(&["patients", id.as_str()])?;
        tracing::debug!(%url, "fetching patient");

        let response = self.client.get(url).send().await.map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = success_text(response).await?;
        if body.trim().is_empty() || body.trim() == "null" {
            return Ok(None);
        }
        parse_patient(&body)
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn fetch_diagnoses(&self) -> Result<Vec<Diagnosis>, ApiError> {
        let url = self.endpoint(&["diagnoses"])?;
        tracing::debug!(%url, "fetching diagnoses");

        let response = self.client.get(url).send().await.map_err(transport)?;
        let body = success_text(response).await?;
        parse_diagnoses(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn create_entry(&self, patient: &PatientId, entry: &NewEntry) -> Result<Entry, ApiError> {
        let url = self.endpoint(&["patients", patient.as_str(), "entries"])?;
        tracing::debug!(%url, kind = %entry.kind(), "creating entry");

        let response = self
            .client
            .post(url)
            .json(entry)
            .send()
            .await
            .map_err(transport)?;
        let body = success_text(response).await?;
        parse_entry(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
