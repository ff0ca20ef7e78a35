/// Tutor API Client: the data-access layer for the remote tutoring service.
///
/// Every call to the problem bank or the worksheet renderer goes through `TutorBackend`.
/// Handlers never build URLs themselves.
///
/// No retries and no caching: a failed call surfaces to the caller as `TutorApiError`.
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{GenerateWorksheetRequest, GeneratedWorksheet, Problem, ProblemQuery, Worksheet};

#[derive(Debug, Error)]
pub enum TutorApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// FastAPI-style error body: `{"detail": "..."}` or `{"detail": [ ... ]}`.
#[derive(Debug, Deserialize)]
struct RemoteError {
    detail: serde_json::Value,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The remote operations the console depends on. Carried in `AppState` as
/// `Arc<dyn TutorBackend>`.
#[async_trait]
pub trait TutorBackend: Send + Sync {
    async fn list_problems(&self, query: &ProblemQuery) -> Result<Vec<Problem>, TutorApiError>;

    async fn get_problem(&self, id: i64) -> Result<Problem, TutorApiError>;

    async fn problems_by_codes(&self, codes: &[String]) -> Result<Vec<Problem>, TutorApiError>;

    /// Submits the final problem order. The renderer packs it with the same grid rules as
    /// the preview.
    async fn generate_worksheet(
        &self,
        request: &GenerateWorksheetRequest,
    ) -> Result<GeneratedWorksheet, TutorApiError>;

    async fn list_worksheets(&self) -> Result<Vec<Worksheet>, TutorApiError>;

    async fn download_worksheet(&self, id: i64) -> Result<Bytes, TutorApiError>;

    async fn delete_worksheet(&self, id: i64) -> Result<(), TutorApiError>;
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP implementation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct TutorApiClient {
    client: Client,
    base_url: String,
}

impl TutorApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TutorApiError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Sends the request and deserializes a JSON body. `what` names the resource for
    /// not-found errors and logs.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, TutorApiError> {
        let response = check_status(request.send().await?, what).await?;
        let body = response.text().await?;
        debug!("Tutor API returned {} bytes for {what}", body.len());
        serde_json::from_str(&body).map_err(TutorApiError::Parse)
    }
}

#[async_trait]
impl TutorBackend for TutorApiClient {
    async fn list_problems(&self, query: &ProblemQuery) -> Result<Vec<Problem>, TutorApiError> {
        let request = self.client.get(self.url("/api/problems/")).query(query);
        self.send_json(request, "problem list").await
    }

    async fn get_problem(&self, id: i64) -> Result<Problem, TutorApiError> {
        let request = self.client.get(self.url(&format!("/api/problems/{id}")));
        self.send_json(request, &format!("problem {id}")).await
    }

    async fn problems_by_codes(&self, codes: &[String]) -> Result<Vec<Problem>, TutorApiError> {
        let request = self
            .client
            .post(self.url("/api/problems/by-codes"))
            .json(codes);
        self.send_json(request, "problem codes").await
    }

    async fn generate_worksheet(
        &self,
        request: &GenerateWorksheetRequest,
    ) -> Result<GeneratedWorksheet, TutorApiError> {
        let http = self
            .client
            .post(self.url("/api/worksheets/generate"))
            .json(request);
        self.send_json(http, "worksheet renderer").await
    }

    async fn list_worksheets(&self) -> Result<Vec<Worksheet>, TutorApiError> {
        let request = self.client.get(self.url("/api/worksheets/"));
        self.send_json(request, "worksheet list").await
    }

    async fn download_worksheet(&self, id: i64) -> Result<Bytes, TutorApiError> {
        let what = format!("worksheet {id}");
        let response = self
            .client
            .get(self.url(&format!("/api/worksheets/{id}/download")))
            .send()
            .await?;
        let response = check_status(response, &what).await?;
        Ok(response.bytes().await?)
    }

    async fn delete_worksheet(&self, id: i64) -> Result<(), TutorApiError> {
        let what = format!("worksheet {id}");
        let response = self
            .client
            .delete(self.url(&format!("/api/worksheets/{id}")))
            .send()
            .await?;
        check_status(response, &what).await?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

/// Maps non-2xx responses onto `TutorApiError`, passing successful ones through.
async fn check_status(response: Response, what: &str) -> Result<Response, TutorApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(TutorApiError::NotFound(what.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    warn!("Tutor API returned {status} for {what}: {body}");
    Err(TutorApiError::Api {
        status: status.as_u16(),
        message: remote_error_message(&body),
    })
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Extracts the `detail` message from an error body, falling back to the raw body.
fn remote_error_message(body: &str) -> String {
    match serde_json::from_str::<RemoteError>(body) {
        Ok(RemoteError {
            detail: serde_json::Value::String(message),
        }) => message,
        Ok(RemoteError { detail }) => detail.to_string(),
        Err(_) => body.to_string(),
    }
}
