//! Onboarding-complete flag

use std::sync::Arc;

use crate::domain::result::Result;
use crate::ports::{StateStore, ONBOARDING_KEY};

const DONE: &str = "true";

/// Durable "first-time setup finished" flag, independent of the credential
#[derive(Clone)]
pub struct OnboardingFlag {
    store: Arc<dyn StateStore>,
}

impl OnboardingFlag {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Unreadable state counts as not onboarded
    pub fn is_complete(&self) -> bool {
        matches!(self.store.get(ONBOARDING_KEY), Ok(Some(value)) if value == DONE)
    }

    pub fn mark_complete(&self) -> Result<()> {
        self.store.set(ONBOARDING_KEY, DONE)
    }

    pub fn reset(&self) -> Result<()> {
        self.store.remove(ONBOARDING_KEY)
    }
}
