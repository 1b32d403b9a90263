//! Credential-aware backend access
//!
//! Every authenticated call goes through here. A missing credential or a
//! 401 from the backend ends the session; all other failures are returned
//! untouched and leave the credential alone. A 401 only ends the session
//! whose credential the request carried: if a newer credential was stored
//! while the request was in flight, it is kept.

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{
    Credential, CyclePrediction, NewSymptomLog, PeriodStatus, ProfileInput, SymptomEntry,
    TrendSummary,
};
use crate::ports::CycleBackend;
use crate::services::credentials::{CredentialStore, EndReason};

#[derive(Clone)]
pub struct AuthorizedBackend {
    backend: Arc<dyn CycleBackend>,
    credentials: Arc<CredentialStore>,
}

impl AuthorizedBackend {
    pub fn new(backend: Arc<dyn CycleBackend>, credentials: Arc<CredentialStore>) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    /// The unwrapped backend, for calls made before a credential exists
    pub fn backend(&self) -> &Arc<dyn CycleBackend> {
        &self.backend
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    fn credential(&self) -> Result<Credential> {
        match self.credentials.get() {
            Some(credential) => Ok(credential),
            None => {
                self.credentials.end_session(EndReason::CredentialMissing)?;
                Err(Error::unauthenticated("No saved session. Please set up your profile."))
            }
        }
    }

    fn settle<T>(&self, sent: &Credential, result: Result<T>) -> Result<T> {
        if matches!(&result, Err(e) if e.is_unauthenticated()) {
            let current = self.credentials.get();
            if current.is_none() || current.as_ref() == Some(sent) {
                self.credentials.end_session(EndReason::CredentialRejected)?;
            }
        }
        result
    }

    pub async fn period_status(&self) -> Result<PeriodStatus> {
        let credential = self.credential()?;
        self.settle(&credential, self.backend.period_status(&credential).await)
    }

    pub async fn trend_summary(&self) -> Result<TrendSummary> {
        let credential = self.credential()?;
        self.settle(&credential, self.backend.trend_summary(&credential).await)
    }

    pub async fn predictions(&self) -> Result<Vec<CyclePrediction>> {
        let credential = self.credential()?;
        self.settle(&credential, self.backend.predictions(&credential).await)
    }

    pub async fn symptom_logs(&self) -> Result<Vec<SymptomEntry>> {
        let credential = self.credential()?;
        self.settle(&credential, self.backend.symptom_logs(&credential).await)
    }

    pub async fn record_period_start(&self) -> Result<Option<String>> {
        let credential = self.credential()?;
        self.settle(&credential, self.backend.record_period_start(&credential).await)
    }

    pub async fn record_symptom(&self, log: &NewSymptomLog) -> Result<()> {
        let credential = self.credential()?;
        self.settle(&credential, self.backend.record_symptom(&credential, log).await)
    }

    pub async fn update_profile(&self, profile: &ProfileInput) -> Result<()> {
        let credential = self.credential()?;
        self.settle(&credential, self.backend.update_profile(&credential, profile).await)
    }

    pub async fn ask_assistant(&self, message: &str) -> Result<String> {
        let credential = self.credential()?;
        self.settle(&credential, self.backend.ask_assistant(&credential, message).await)
    }

    pub async fn symptom_report_pdf(&self) -> Result<Vec<u8>> {
        let credential = self.credential()?;
        self.settle(&credential, self.backend.symptom_report_pdf(&credential).await)
    }
}
