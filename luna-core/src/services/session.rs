//! Session gate - decides which top-level screen is shown
//!
//! Wraps the pure [`Screen`] transition table with its side effects: reading
//! the onboarding flag on a cold start, saving the profile through the
//! backend, and listening for "session ended" from anywhere in the process.
//!
//! The gate drains pending session-ended signals before every operation and
//! again after every await, so a request completing after a logout can never
//! bring `MainApp` back.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::domain::result::{Error, Result};
use crate::domain::{ProfileInput, Screen, SessionEvent, SetupMode};
use crate::services::credentials::{CredentialStore, SessionEnded};
use crate::services::gateway::AuthorizedBackend;
use crate::services::onboarding::OnboardingFlag;

/// Per-process UI state, dropped whenever the session ends
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub trend_popup_shown: bool,
    pub last_error: Option<String>,
}

pub struct SessionGate {
    screen: Screen,
    api: AuthorizedBackend,
    onboarding: OnboardingFlag,
    signals: broadcast::Receiver<SessionEnded>,
    ui: UiState,
}

impl SessionGate {
    /// Cold start: `MainApp` if onboarding is complete, else `Welcome`
    pub fn new(api: AuthorizedBackend, onboarding: OnboardingFlag) -> Self {
        let signals = api.credentials().subscribe();
        let screen = Screen::initial(onboarding.is_complete());

        Self {
            screen,
            api,
            onboarding,
            signals,
            ui: UiState::default(),
        }
    }

    /// Current screen, after applying any pending session-ended signal
    pub fn screen(&mut self) -> Screen {
        self.pump();
        self.screen
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    fn credentials(&self) -> &Arc<CredentialStore> {
        self.api.credentials()
    }

    /// Apply pending signals; returns true when the session ended
    ///
    /// A lagged receiver has missed at least one signal, which can only have
    /// been a session end.
    pub fn pump(&mut self) -> bool {
        let mut ended = false;
        loop {
            match self.signals.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => ended = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if ended {
            self.apply(SessionEvent::SessionEnded);
        }
        ended
    }

    /// Run one event through the table; ignored events return false
    fn apply(&mut self, event: SessionEvent) -> bool {
        match self.screen.on(event) {
            Some(next) => {
                if event == SessionEvent::SessionEnded {
                    self.ui = UiState::default();
                }
                self.screen = next;
                true
            }
            None => false,
        }
    }

    fn step(&mut self, event: SessionEvent) -> Screen {
        self.pump();
        self.apply(event);
        self.screen
    }

    pub fn acknowledge_welcome(&mut self) -> Screen {
        self.step(SessionEvent::OnboardingAcknowledged)
    }

    pub fn request_cycle_update(&mut self) -> Screen {
        self.step(SessionEvent::UpdateCycleInfoRequested)
    }

    pub fn cancel_update(&mut self) -> Screen {
        self.step(SessionEvent::UpdateCancelled)
    }

    /// Sign out from the main app
    ///
    /// The gate returns to `Welcome` even when the store refused the removal;
    /// the `Storage` error tells the caller the old session is still on disk.
    pub fn sign_out(&mut self) -> Result<Screen> {
        let cleared = self.credentials().clear();
        self.pump();
        cleared.map(|()| self.screen)
    }

    /// True only the first time it is asked within a session
    pub fn take_trend_popup(&mut self) -> bool {
        self.pump();
        let first = !self.ui.trend_popup_shown;
        self.ui.trend_popup_shown = true;
        first
    }

    /// Save the profile form shown on the current screen
    ///
    /// On any failure the screen stays on the form and neither the
    /// credential nor the onboarding flag changes (except a rejected
    /// credential, which ends the session).
    pub async fn save_profile(&mut self, input: ProfileInput, today: NaiveDate) -> Result<Screen> {
        self.pump();
        let mode = match self.screen {
            Screen::ProfileSetup(mode) => mode,
            other => {
                return Err(Error::Other(format!(
                    "Profile setup is not open (current screen: {})",
                    other.name()
                )))
            }
        };

        let result = match mode {
            SetupMode::Onboarding => self.save_onboarding(&input, today).await,
            SetupMode::UpdateCycleInfo => self.save_update(&input, today).await,
        };

        match result {
            Ok(()) => {
                self.ui.last_error = None;
                Ok(self.screen)
            }
            Err(e) => {
                self.ui.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn save_onboarding(&mut self, input: &ProfileInput, today: NaiveDate) -> Result<()> {
        input.validate(today)?;

        let backend = self.api.backend().clone();
        let credential = backend.create_profile(input).await?;
        backend
            .record_first_period_start(&credential, input.last_period)
            .await?;

        if self.pump() {
            // Ended while saving; the new credential is dropped unstored
            return Ok(());
        }

        self.onboarding.mark_complete()?;
        if !self.credentials().set(credential) {
            let _ = self.onboarding.reset();
            return Err(Error::storage("Could not save your session on this device."));
        }
        self.apply(SessionEvent::ProfileSaved);
        Ok(())
    }

    async fn save_update(&mut self, input: &ProfileInput, today: NaiveDate) -> Result<()> {
        input.validate(today)?;

        let outcome = self.api.update_profile(input).await;
        if self.pump() {
            return outcome;
        }
        outcome?;

        self.apply(SessionEvent::ProfileSaved);
        Ok(())
    }
}
