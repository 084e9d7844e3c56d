//! Persistence for the SafetyNet data document and the request-level service on top of it.

pub mod service;
pub mod store;

pub use service::AlertService;
pub use store::{JsonFileStore, MemoryStore, SnapshotStore};
