//! Luna backend HTTP client
//!
//! JSON over HTTP against the REST backend. The credential travels in the
//! `x-user-token` header. Status codes are mapped so that only a 401 becomes
//! `Error::Unauthenticated`; everything else leaves the session alone.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::result::{Error, Result};
use crate::domain::{
    Credential, CyclePrediction, NewSymptomLog, PeriodStatus, ProfileInput, SymptomEntry,
    TrendSummary,
};
use crate::ports::CycleBackend;

const TOKEN_HEADER: &str = "x-user-token";

/// Luna backend client
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    timeout: Duration,
}

/// `{ "error": "..." }` bodies sent with failed requests
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(alias = "user_token")]
    token: String,
}

#[derive(Debug, Default, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssistantResponse {
    #[serde(default)]
    reply: Option<String>,
}

#[derive(Debug, Serialize)]
struct FirstPeriodRequest {
    start_date: NaiveDate,
}

#[derive(Debug, Serialize)]
struct AssistantRequest<'a> {
    message: &'a str,
}

impl HttpBackend {
    /// Create a client for the given API base URL, e.g. `http://localhost:8000/api`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("Invalid API URL '{}': {}", base_url, e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(Error::Config(format!(
                "API URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder, credential: &Credential) -> RequestBuilder {
        request.header(TOKEN_HEADER, credential.as_str())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| self.map_request_error(e))?;
        check_response_status(response).await
    }

    async fn read_json<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| Error::Other(format!("Unexpected response from server: {}", e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, credential: &Credential) -> Result<T> {
        let request = self.authorized(self.client.get(self.url(path)), credential);
        let response = self.send(request).await?;
        self.read_json(response).await
    }

    /// Map transport errors to user-facing messages
    fn map_request_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::transient(format!(
                "Request timed out after {} seconds",
                self.timeout.as_secs()
            ))
        } else if error.is_connect() {
            Error::transient("Unable to connect to the Luna server")
        } else {
            Error::transient(format!("Request failed: {}", error))
        }
    }
}

/// Prefer the server's `{error}` message, then raw text
fn error_message(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return Some(parsed.error);
    }
    let text = body.trim();
    if text.is_empty() || text.starts_with('<') {
        None
    } else {
        Some(text.to_string())
    }
}

/// Check response status and return the matching error kind
async fn check_response_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let code = status.as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);

    match code {
        401 => Err(Error::unauthenticated(
            message.unwrap_or_else(|| "Your session has expired.".to_string()),
        )),
        404 => Err(Error::not_found(
            message.unwrap_or_else(|| "Resource not found.".to_string()),
        )),
        408 | 429 => Err(Error::transient(
            message.unwrap_or_else(|| format!("Server busy (HTTP {}), try again", code)),
        )),
        500..=599 => Err(Error::transient(match message {
            Some(m) => format!("HTTP {}: {}", code, m),
            None => format!("HTTP {}", code),
        })),
        _ => Err(Error::Rejected(
            message.unwrap_or_else(|| format!("Request failed: HTTP {}", code)),
        )),
    }
}

#[async_trait]
impl CycleBackend for HttpBackend {
    async fn period_status(&self, credential: &Credential) -> Result<PeriodStatus> {
        self.get_json("status", credential).await
    }

    async fn trend_summary(&self, credential: &Credential) -> Result<TrendSummary> {
        self.get_json("trend", credential).await
    }

    async fn predictions(&self, credential: &Credential) -> Result<Vec<CyclePrediction>> {
        self.get_json("predictions", credential).await
    }

    async fn symptom_logs(&self, credential: &Credential) -> Result<Vec<SymptomEntry>> {
        self.get_json("logs", credential).await
    }

    async fn create_profile(&self, profile: &ProfileInput) -> Result<Credential> {
        let request = self.client.post(self.url("profile")).json(profile);
        let response = self.send(request).await?;
        let body: TokenResponse = self.read_json(response).await?;

        Credential::new(body.token)
            .ok_or_else(|| Error::Other("Server did not return a session token".to_string()))
    }

    async fn record_first_period_start(
        &self,
        credential: &Credential,
        start: NaiveDate,
    ) -> Result<()> {
        let request = self
            .authorized(self.client.post(self.url("first-period")), credential)
            .json(&FirstPeriodRequest { start_date: start });
        self.send(request).await?;
        Ok(())
    }

    async fn record_period_start(&self, credential: &Credential) -> Result<Option<String>> {
        let request = self.authorized(self.client.put(self.url("update-period")), credential);
        let response = self.send(request).await?;

        // Confirmation text is optional
        let body: MessageResponse = response.json().await.unwrap_or_default();
        Ok(body.message)
    }

    async fn record_symptom(&self, credential: &Credential, log: &NewSymptomLog) -> Result<()> {
        let request = self
            .authorized(self.client.post(self.url("logger")), credential)
            .json(log);
        self.send(request).await?;
        Ok(())
    }

    async fn update_profile(&self, credential: &Credential, profile: &ProfileInput) -> Result<()> {
        let request = self
            .authorized(self.client.put(self.url("profile")), credential)
            .json(profile);
        self.send(request).await?;
        Ok(())
    }

    async fn ask_assistant(&self, credential: &Credential, message: &str) -> Result<String> {
        let request = self
            .authorized(self.client.post(self.url("assistant")), credential)
            .json(&AssistantRequest { message });
        let response = self.send(request).await?;
        let body: AssistantResponse = self.read_json(response).await?;
        Ok(body.reply.unwrap_or_else(|| "No reply.".to_string()))
    }

    async fn symptom_report_pdf(&self, credential: &Credential) -> Result<Vec<u8>> {
        let request = self.authorized(self.client.get(self.url("logs/pdf")), credential);
        let response = match self.send(request).await {
            Err(Error::NotFound(_)) => {
                return Err(Error::not_found("No symptom logs to export."));
            }
            other => other?,
        };

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::transient(format!("Download interrupted: {}", e)))?;
        Ok(bytes.to_vec())
    }
}
