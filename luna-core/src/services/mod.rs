//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on one concern of the client.

pub mod credentials;
mod export;
pub mod fetch;
mod gateway;
pub mod logging;
mod onboarding;
mod session;
mod tracking;
mod views;

pub use credentials::{CredentialStore, EndReason, SessionEnded};
pub use export::{ExportService, DEFAULT_EXPORT_NAME};
pub use fetch::{Batch, DataFetchOrchestrator, LoadPhase, LoadedView, SourceRole, ViewModel};
pub use gateway::AuthorizedBackend;
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use onboarding::OnboardingFlag;
pub use session::{SessionGate, UiState};
pub use tracking::TrackingService;
pub use views::{CalendarView, HomeView, InsightsView, Section, ViewService};
