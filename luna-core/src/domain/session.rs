//! Top-level screen state machine
//!
//! ```text
//!            acknowledged            profile saved
//!  Welcome ──────────────► Setup ──────────────────► MainApp
//!     ▲                   (onboarding)                 │  ▲
//!     │                                  update cycle  │  │ saved / cancelled
//!     │                                         info   ▼  │
//!     │                                          Setup (update)
//!     └──────────── session ended (from any state) ────────┘
//! ```
//!
//! The table lives in [`Screen::on`]. Side effects (persisting the flag,
//! calling the backend) belong to the session gate service, not here.

use serde::Serialize;

/// Why the profile form is being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupMode {
    /// First run: saving creates the profile and completes onboarding
    Onboarding,
    /// Reached from the main app; onboarding stays complete
    UpdateCycleInfo,
}

/// The top-level experience currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", content = "mode", rename_all = "snake_case")]
pub enum Screen {
    Welcome,
    ProfileSetup(SetupMode),
    MainApp,
}

/// Inputs to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    OnboardingAcknowledged,
    ProfileSaved,
    UpdateCycleInfoRequested,
    UpdateCancelled,
    SessionEnded,
}

impl Screen {
    /// Screen shown on a cold start
    pub fn initial(onboarding_complete: bool) -> Self {
        if onboarding_complete {
            Screen::MainApp
        } else {
            Screen::Welcome
        }
    }

    /// Transition table
    ///
    /// Returns `None` when the event does not apply to the current screen.
    /// `SessionEnded` applies everywhere, including `Welcome` itself, so
    /// repeated delivery is harmless.
    pub fn on(self, event: SessionEvent) -> Option<Screen> {
        use SessionEvent::*;

        match (self, event) {
            (_, SessionEnded) => Some(Screen::Welcome),
            (Screen::Welcome, OnboardingAcknowledged) => {
                Some(Screen::ProfileSetup(SetupMode::Onboarding))
            }
            (Screen::ProfileSetup(_), ProfileSaved) => Some(Screen::MainApp),
            (Screen::MainApp, UpdateCycleInfoRequested) => {
                Some(Screen::ProfileSetup(SetupMode::UpdateCycleInfo))
            }
            (Screen::ProfileSetup(SetupMode::UpdateCycleInfo), UpdateCancelled) => {
                Some(Screen::MainApp)
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Screen::Welcome => "welcome",
            Screen::ProfileSetup(SetupMode::Onboarding) => "setup",
            Screen::ProfileSetup(SetupMode::UpdateCycleInfo) => "update_cycle_info",
            Screen::MainApp => "main",
        }
    }
}
