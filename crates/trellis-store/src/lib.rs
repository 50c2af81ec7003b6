//! Asynchronous task store over the REST persistence collaborator:
//! cached canonical set, validated boundary, optimistic mutations with
//! per-task rollback.

pub mod backend;
pub mod config;
pub mod store;

pub use backend::{Backend, BackendError, HttpBackend};
pub use config::StoreConfig;
pub use store::{StoreError, TaskStore};

/// The production pairing: the store over the reqwest backend.
pub type HttpTaskStore = TaskStore<HttpBackend>;
