//! services/tracker/src/stores/mod.rs
//!
//! The two state containers: the session store (who is logged in) and the
//! document store (documents and their version histories). Both are plain
//! structs built over a `StorageService` and handed to the command layer; every
//! mutating method writes through to storage before updating memory.

pub mod documents;
mod seed;
pub mod session;

use doc_tracker_core::ports::PortError;

pub use documents::DocumentStore;
pub use session::SessionStore;

/// Errors surfaced by the stores. A failed call never changes in-memory state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("A user with this email already exists")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("No active session")]
    NotAuthenticated,

    /// The storage write failed; the cause is logged, the message stays generic.
    #[error("Could not save changes to local storage")]
    PersistenceFailure(#[source] PortError),

    /// Persisted state could not be read back.
    #[error("Could not read local storage")]
    LoadFailure(#[source] PortError),
}

/// A convenience type alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

pub(crate) fn persistence_failure(what: &str, err: PortError) -> StoreError {
    tracing::error!("Failed to persist {}: {}", what, err);
    StoreError::PersistenceFailure(err)
}

pub(crate) fn load_failure(what: &str, err: PortError) -> StoreError {
    tracing::error!("Failed to load {}: {}", what, err);
    StoreError::LoadFailure(err)
}
