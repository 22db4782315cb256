//! services/tracker/src/error.rs
//!
//! Defines the primary error type for the tracker binary.

use crate::config::ConfigError;
use crate::stores::StoreError;
use crate::validation::ValidationError;
use doc_tracker_core::ports::PortError;
use uuid::Uuid;

/// The primary error type for the `tracker` service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A store rejected the operation (bad credentials, storage write failed, ...).
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Form input failed validation before reaching a store.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Represents an error that propagated up from the storage port.
    #[error("Storage error: {0}")]
    Port(#[from] PortError),

    /// A document id did not match anything in the collection.
    #[error("Document {0} not found")]
    DocumentNotFound(Uuid),

    /// The command needs a logged-in user.
    #[error("Not logged in. Run `tracker login` or `tracker register` first")]
    LoginRequired,

    /// Represents an error while writing JSON output.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Represents a standard Input/Output error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
