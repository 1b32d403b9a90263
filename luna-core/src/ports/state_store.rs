//! Durable client state port

use crate::domain::result::Result;

/// Key holding the session credential
pub const CREDENTIAL_KEY: &str = "user_token";

/// Key holding the onboarding-complete flag
pub const ONBOARDING_KEY: &str = "onboarding_done";

/// Small durable key-value store surviving restarts
///
/// Implementations must make each call atomic: after `set` returns `Ok`
/// a restart observes the new value.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}
