//! Cycle backend port
//!
//! Defines the REST collaborator the client talks to. Everything after
//! profile creation carries the current credential; implementations map
//! credential rejections to `Error::Unauthenticated` and nothing else.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::result::Result;
use crate::domain::{
    Credential, CyclePrediction, NewSymptomLog, PeriodStatus, ProfileInput, SymptomEntry,
    TrendSummary,
};

/// Backend reads and writes used by the client
///
/// Reads are independent: any one may fail without affecting the others.
/// Writes are single calls, safe to retry.
#[async_trait]
pub trait CycleBackend: Send + Sync {
    // === Reads ===

    /// Current phase and cycle day
    async fn period_status(&self, credential: &Credential) -> Result<PeriodStatus>;

    /// Symptom trend for the current part of the cycle
    async fn trend_summary(&self, credential: &Credential) -> Result<TrendSummary>;

    /// Upcoming predicted periods, nearest first
    async fn predictions(&self, credential: &Credential) -> Result<Vec<CyclePrediction>>;

    /// All symptom logs
    async fn symptom_logs(&self, credential: &Credential) -> Result<Vec<SymptomEntry>>;

    // === Writes ===

    /// Create a profile; returns the credential for the new profile
    async fn create_profile(&self, profile: &ProfileInput) -> Result<Credential>;

    /// Record the start of the period entered during setup
    async fn record_first_period_start(
        &self,
        credential: &Credential,
        start: NaiveDate,
    ) -> Result<()>;

    /// "I got my period today"; returns the backend's confirmation message
    async fn record_period_start(&self, credential: &Credential) -> Result<Option<String>>;

    async fn record_symptom(&self, credential: &Credential, log: &NewSymptomLog) -> Result<()>;

    async fn update_profile(&self, credential: &Credential, profile: &ProfileInput) -> Result<()>;

    // === Other ===

    /// Ask the wellness assistant a question
    async fn ask_assistant(&self, credential: &Credential, message: &str) -> Result<String>;

    /// Symptom report rendered by the backend as PDF bytes
    async fn symptom_report_pdf(&self, credential: &Credential) -> Result<Vec<u8>>;
}
