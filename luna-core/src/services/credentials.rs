//! Session credential store
//!
//! Holds the one live credential of this installation, mirrored in memory and
//! in the durable `StateStore`. Ending the session is announced on a
//! broadcast channel; consumers only ever observe that signal, never the
//! store itself.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::domain::result::{Error, Result};
use crate::domain::Credential;
use crate::ports::{StateStore, CREDENTIAL_KEY, ONBOARDING_KEY};

const SIGNAL_CAPACITY: usize = 16;

/// Why the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The user signed out
    SignedOut,
    /// The backend rejected the credential
    CredentialRejected,
    /// A call needed a credential and none was stored
    CredentialMissing,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::SignedOut => "signed_out",
            EndReason::CredentialRejected => "credential_rejected",
            EndReason::CredentialMissing => "credential_missing",
        }
    }
}

/// Process-wide "session ended" notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEnded {
    pub reason: EndReason,
}

pub struct CredentialStore {
    store: Arc<dyn StateStore>,
    current: Mutex<Option<Credential>>,
    signal: broadcast::Sender<SessionEnded>,
}

impl CredentialStore {
    /// Load the persisted credential; an unreadable store counts as signed out
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        let current = store
            .get(CREDENTIAL_KEY)
            .ok()
            .flatten()
            .and_then(Credential::new);
        let (signal, _) = broadcast::channel(SIGNAL_CAPACITY);

        Self {
            store,
            current: Mutex::new(current),
            signal,
        }
    }

    pub fn get(&self) -> Option<Credential> {
        match self.current.lock() {
            Ok(current) => current.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_present(&self) -> bool {
        self.get().is_some()
    }

    /// Persist a new credential
    ///
    /// Returns `false` when it could not be written; the in-memory value is
    /// then absent too, so memory never claims a session the disk lacks.
    pub fn set(&self, credential: Credential) -> bool {
        let persisted = self.store.set(CREDENTIAL_KEY, credential.as_str()).is_ok();
        let value = if persisted { Some(credential) } else { None };
        self.replace(value);
        persisted
    }

    /// Sign out
    pub fn clear(&self) -> Result<()> {
        self.end_session(EndReason::SignedOut)
    }

    /// Forget the credential and onboarding, then announce the end
    ///
    /// Always emits, even when nothing was stored or the store refused the
    /// removal: listeners only see the signal, and handling it twice is
    /// harmless. A `Storage` error means the old session is still on disk
    /// and would come back on the next start; calling again retries.
    pub fn end_session(&self, reason: EndReason) -> Result<()> {
        self.replace(None);
        let credential_removed = self.store.remove(CREDENTIAL_KEY);
        let onboarding_removed = self.store.remove(ONBOARDING_KEY);
        // No receivers is fine
        let _ = self.signal.send(SessionEnded { reason });

        credential_removed
            .and(onboarding_removed)
            .map_err(|e| Error::storage(format!("Could not sign out on this device: {}", e)))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEnded> {
        self.signal.subscribe()
    }

    fn replace(&self, value: Option<Credential>) {
        match self.current.lock() {
            Ok(mut current) => *current = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}
