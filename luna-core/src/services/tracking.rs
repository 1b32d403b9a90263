//! Period and symptom writes, plus the assistant chat

use crate::domain::result::{Error, Result};
use crate::domain::NewSymptomLog;
use crate::services::gateway::AuthorizedBackend;

const PERIOD_RECORDED: &str = "New period start recorded.";

pub struct TrackingService {
    api: AuthorizedBackend,
}

impl TrackingService {
    pub fn new(api: AuthorizedBackend) -> Self {
        Self { api }
    }

    /// Record that a period started today; returns the confirmation to show
    pub async fn record_period_start(&self) -> Result<String> {
        let message = self.api.record_period_start().await?;
        Ok(message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| PERIOD_RECORDED.to_string()))
    }

    /// Validate, then send a symptom log
    pub async fn record_symptom(&self, symptom: &str, severity: &str) -> Result<NewSymptomLog> {
        let log = NewSymptomLog::new(symptom, severity)?;
        self.api.record_symptom(&log).await?;
        Ok(log)
    }

    pub async fn ask_assistant(&self, message: &str) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::validation("Please type a message."));
        }
        self.api.ask_assistant(message).await
    }
}
