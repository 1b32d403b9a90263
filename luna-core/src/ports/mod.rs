//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod backend;
mod state_store;

pub use backend::CycleBackend;
pub use state_store::{StateStore, CREDENTIAL_KEY, ONBOARDING_KEY};
