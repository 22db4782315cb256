//! services/tracker/src/cli/state.rs
//!
//! The application state built once at startup and handed to every command:
//! configuration plus the two initialized stores.

use crate::config::Config;
use crate::stores::{DocumentStore, SessionStore, StoreResult};
use doc_tracker_core::ports::StorageService;
use std::sync::Arc;
use tracing::debug;

pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: SessionStore,
    pub documents: DocumentStore,
}

impl AppState {
    /// Builds both stores over `storage`, restores the session and loads the
    /// document collection.
    pub async fn init(config: Arc<Config>, storage: Arc<dyn StorageService>) -> StoreResult<Self> {
        let mut sessions = SessionStore::new(storage.clone(), config.simulated_latency);
        sessions.restore_session().await?;

        let mut documents = DocumentStore::new(storage, config.default_author.clone());
        documents.load_all().await?;

        debug!("Application state initialized");
        Ok(Self {
            config,
            sessions,
            documents,
        })
    }

    /// Tears down both stores.
    pub fn dispose(self) {
        self.sessions.dispose();
        self.documents.dispose();
    }
}
