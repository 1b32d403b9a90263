//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest HTTP client for the CycleBackend port
//! - JSON file under an fs2 lock for the StateStore port
//! - In-memory StateStore for tests

pub mod file_store;
pub mod http;
pub mod memory;

#[cfg(test)]
pub mod backend_mock;

pub use file_store::JsonFileStore;
pub use http::HttpBackend;
pub use memory::MemoryStore;
