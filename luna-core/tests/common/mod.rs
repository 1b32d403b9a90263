//! Trait-level fake backend shared by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use luna_core::adapters::MemoryStore;
use luna_core::config::Config;
use luna_core::domain::result::{Error, Result};
use luna_core::domain::{
    Credential, CyclePrediction, NewSymptomLog, PeriodStatus, Phase, ProfileInput, SymptomEntry,
    TrendSummary,
};
use luna_core::ports::CycleBackend;
use luna_core::LunaContext;

pub const TOKEN: &str = "token-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Unauthorized,
    Unavailable,
    Rejected,
}

impl Failure {
    fn error(self) -> Error {
        match self {
            Failure::Unauthorized => Error::unauthenticated("Invalid token"),
            Failure::Unavailable => Error::transient("HTTP 503"),
            Failure::Rejected => Error::Rejected("Bad request".to_string()),
        }
    }
}

type Hook = Box<dyn FnOnce() + Send>;

/// In-memory backend; operations can be made to fail by name
pub struct FakeBackend {
    failures: Mutex<HashMap<&'static str, Failure>>,
    hooks: Mutex<HashMap<&'static str, Hook>>,
    calls: Mutex<HashMap<&'static str, u32>>,
    pub status: Mutex<PeriodStatus>,
    pub predictions: Mutex<Vec<CyclePrediction>>,
    pub logs: Mutex<Vec<SymptomEntry>>,
    pub symptoms_recorded: Mutex<Vec<NewSymptomLog>>,
    tokens_issued: AtomicU32,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            failures: Mutex::new(HashMap::new()),
            hooks: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
            status: Mutex::new(PeriodStatus {
                phase: Phase::Follicular,
                day_in_cycle: 9,
            }),
            predictions: Mutex::new(vec![
                CyclePrediction::new(1, "2025-03-01").with_end("2025-03-05"),
                CyclePrediction::new(2, "2025-03-29"),
            ]),
            logs: Mutex::new(Vec::new()),
            symptoms_recorded: Mutex::new(Vec::new()),
            tokens_issued: AtomicU32::new(0),
        }
    }

    pub fn fail(&self, op: &'static str, failure: Failure) {
        self.failures.lock().unwrap().insert(op, failure);
    }

    pub fn recover(&self, op: &'static str) {
        self.failures.lock().unwrap().remove(op);
    }

    /// Run `hook` inside the next call to `op`, before it answers
    pub fn during(&self, op: &'static str, hook: impl FnOnce() + Send + 'static) {
        self.hooks.lock().unwrap().insert(op, Box::new(hook));
    }

    pub fn calls(&self, op: &'static str) -> u32 {
        self.calls.lock().unwrap().get(op).copied().unwrap_or(0)
    }

    fn enter(&self, op: &'static str, credential: Option<&Credential>) -> Result<()> {
        *self.calls.lock().unwrap().entry(op).or_insert(0) += 1;

        let hook = self.hooks.lock().unwrap().remove(op);
        if let Some(hook) = hook {
            hook();
        }

        if let Some(failure) = self.failures.lock().unwrap().get(op) {
            return Err(failure.error());
        }
        match credential {
            Some(c) if c.as_str() != TOKEN => Err(Error::unauthenticated("Invalid token")),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl CycleBackend for FakeBackend {
    async fn period_status(&self, credential: &Credential) -> Result<PeriodStatus> {
        self.enter("status", Some(credential))?;
        Ok(*self.status.lock().unwrap())
    }

    async fn trend_summary(&self, credential: &Credential) -> Result<TrendSummary> {
        self.enter("trend", Some(credential))?;
        Ok(TrendSummary {
            message: Some("Energy tends to rise now.".to_string()),
            common_symptoms: vec!["Acne".to_string()],
        })
    }

    async fn predictions(&self, credential: &Credential) -> Result<Vec<CyclePrediction>> {
        self.enter("predictions", Some(credential))?;
        Ok(self.predictions.lock().unwrap().clone())
    }

    async fn symptom_logs(&self, credential: &Credential) -> Result<Vec<SymptomEntry>> {
        self.enter("logs", Some(credential))?;
        Ok(self.logs.lock().unwrap().clone())
    }

    async fn create_profile(&self, _profile: &ProfileInput) -> Result<Credential> {
        self.enter("create_profile", None)?;
        self.tokens_issued.fetch_add(1, Ordering::SeqCst);
        Credential::new(TOKEN).ok_or_else(|| Error::Other("empty token".to_string()))
    }

    async fn record_first_period_start(
        &self,
        credential: &Credential,
        _start: NaiveDate,
    ) -> Result<()> {
        self.enter("first_period", Some(credential))
    }

    async fn record_period_start(&self, credential: &Credential) -> Result<Option<String>> {
        self.enter("update_period", Some(credential))?;
        Ok(None)
    }

    async fn record_symptom(&self, credential: &Credential, log: &NewSymptomLog) -> Result<()> {
        self.enter("logger", Some(credential))?;
        self.symptoms_recorded.lock().unwrap().push(log.clone());
        Ok(())
    }

    async fn update_profile(&self, credential: &Credential, _profile: &ProfileInput) -> Result<()> {
        self.enter("update_profile", Some(credential))
    }

    async fn ask_assistant(&self, credential: &Credential, message: &str) -> Result<String> {
        self.enter("assistant", Some(credential))?;
        Ok(format!("You asked: {}", message))
    }

    async fn symptom_report_pdf(&self, credential: &Credential) -> Result<Vec<u8>> {
        self.enter("pdf", Some(credential))?;
        if self.logs.lock().unwrap().is_empty() {
            return Err(Error::not_found("No symptom logs to export."));
        }
        Ok(b"%PDF-1.4".to_vec())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A context over shared in-memory state; rebuild it to simulate a restart
pub fn context(store: &Arc<MemoryStore>, backend: &Arc<FakeBackend>) -> LunaContext {
    LunaContext::with_parts(Config::default(), store.clone(), backend.clone())
}
