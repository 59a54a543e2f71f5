//! Application layer - Use cases and orchestration.
//!
//! Services depend on the `DocumentRepository` port rather than on a
//! concrete storage backend, so they run the same against the file store
//! and the in-memory store.

pub mod services;

pub use services::{DocumentService, IdentifierGenerator};
