//! crates/doc_tracker_core/src/ports.rs
//!
//! Defines the storage contract used by the session and document stores.
//! The trait is the boundary of the hexagonal architecture: the stores only
//! see this port, so the JSON-file adapter and the in-memory adapter are
//! interchangeable.

use async_trait::async_trait;
use crate::domain::{Document, PersistedSession, User};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The backing store refused the write or read (I/O failure, quota exceeded).
    #[error("Storage failure: {0}")]
    Storage(String),
    /// Persisted data exists but could not be decoded.
    #[error("Corrupt persisted data in {0}: {1}")]
    Corrupt(String, String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Local persistent storage holding three independent records.
///
/// Every `save_*` call replaces the whole record; there are no partial writes.
#[async_trait]
pub trait StorageService: Send + Sync {
    // --- User Directory ---
    /// Returns an empty list when nothing has been stored yet.
    async fn load_users(&self) -> PortResult<Vec<User>>;

    async fn save_users(&self, users: &[User]) -> PortResult<()>;

    // --- Current Session ---
    async fn load_session(&self) -> PortResult<Option<PersistedSession>>;

    async fn save_session(&self, session: &PersistedSession) -> PortResult<()>;

    /// Removing an absent session is not an error.
    async fn clear_session(&self) -> PortResult<()>;

    // --- Document Collection ---
    /// `None` means the collection has never been persisted, which is different
    /// from a persisted empty collection.
    async fn load_documents(&self) -> PortResult<Option<Vec<Document>>>;

    async fn save_documents(&self, documents: &[Document]) -> PortResult<()>;
}
