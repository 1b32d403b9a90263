//! Luna Core - client logic for cycle tracking
//!
//! This crate implements the client following hexagonal architecture:
//!
//! - **domain**: Pure types and computations (predictions, calendar, phases, screens)
//! - **ports**: Trait definitions for external dependencies (CycleBackend, StateStore)
//! - **services**: Orchestration (session gate, credential store, screen loaders)
//! - **adapters**: Concrete implementations (reqwest backend, JSON state file)

pub mod adapters;
pub mod config;
pub mod domain;
mod log_migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::{HttpBackend, JsonFileStore};
use config::Config;
use ports::{CycleBackend, StateStore};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{
    CalendarCell, Credential, CycleInsight, CyclePrediction, MonthCursor, NextPeriod,
    PeriodStatus, Phase, ProfileInput, Screen, SetupMode, SymptomEntry, TrendSummary,
};

/// Main context for Luna operations
///
/// Wires the durable state, the backend client and every service.
/// Services share one credential store, so a rejection seen anywhere
/// ends the session everywhere.
pub struct LunaContext {
    pub config: Config,
    pub credentials: Arc<CredentialStore>,
    pub onboarding: OnboardingFlag,
    pub api: AuthorizedBackend,
    pub view_service: ViewService,
    pub tracking_service: TrackingService,
    pub export_service: ExportService,
}

impl LunaContext {
    /// Create a context backed by the luna directory and the configured backend
    pub fn new(luna_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(luna_dir)?;
        let config = Config::load(luna_dir)?;

        let store: Arc<dyn StateStore> = Arc::new(JsonFileStore::new(luna_dir));
        let backend: Arc<dyn CycleBackend> =
            Arc::new(HttpBackend::new(&config.api_url, config.timeout)?);

        Ok(Self::with_parts(config, store, backend))
    }

    /// Build from explicit parts; used by tests and alternate front ends
    pub fn with_parts(
        config: Config,
        store: Arc<dyn StateStore>,
        backend: Arc<dyn CycleBackend>,
    ) -> Self {
        let credentials = Arc::new(CredentialStore::new(Arc::clone(&store)));
        let onboarding = OnboardingFlag::new(store);
        let api = AuthorizedBackend::new(backend, Arc::clone(&credentials));

        Self {
            config,
            credentials,
            onboarding,
            view_service: ViewService::new(api.clone()),
            tracking_service: TrackingService::new(api.clone()),
            export_service: ExportService::new(api.clone()),
            api,
        }
    }

    /// A session gate for an interactive run
    pub fn session_gate(&self) -> SessionGate {
        SessionGate::new(self.api.clone(), self.onboarding.clone())
    }
}
