//! services/tracker/src/adapters/json_file.rs
//!
//! The production storage adapter: a concrete implementation of the
//! `StorageService` port that keeps each record as a pretty-printed JSON file
//! inside a data directory.
//!
//! Writes go to a sibling temporary file which is then renamed over the
//! target, so a crash mid-write never leaves a truncated record behind.
//! There is no locking; two processes sharing the directory can overwrite
//! each other's writes.

use async_trait::async_trait;
use doc_tracker_core::domain::{Document, PersistedSession, User};
use doc_tracker_core::ports::{PortError, PortResult, StorageService};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

pub const USERS_FILE: &str = "registered_users.json";
pub const SESSION_FILE: &str = "current_session.json";
pub const DOCUMENTS_FILE: &str = "academic_documents.json";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A storage adapter backed by JSON files in one directory.
#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    root: PathBuf,
}

impl JsonFileStorage {
    /// Opens the data directory, creating it if needed.
    pub async fn open(root: impl Into<PathBuf>) -> PortResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            PortError::Storage(format!("cannot create data directory {}: {}", root.display(), e))
        })?;
        debug!("Using data directory {}", root.display());
        Ok(Self { root })
    }

    fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    /// Reads and decodes a record; `Ok(None)` when the file does not exist.
    async fn read<T: DeserializeOwned>(&self, file: &str) -> PortResult<Option<T>> {
        let path = self.path(file);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PortError::Storage(format!("cannot read {}: {}", path.display(), e)))
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| PortError::Corrupt(file.to_string(), e.to_string()))
    }

    async fn write<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> PortResult<()> {
        let path = self.path(file);
        let content = serde_json::to_string_pretty(value)
            .map_err(|e| PortError::Storage(format!("cannot serialize {}: {}", file, e)))?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| PortError::Storage(format!("cannot write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| PortError::Storage(format!("cannot replace {}: {}", path.display(), e)))?;

        debug!("Wrote {}", path.display());
        Ok(())
    }

    async fn remove(&self, file: &str) -> PortResult<()> {
        let path = self.path(file);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Storage(format!("cannot remove {}: {}", path.display(), e))),
        }
    }
}

//=========================================================================================
// Implementation of the StorageService Port
//=========================================================================================

#[async_trait]
impl StorageService for JsonFileStorage {
    async fn load_users(&self) -> PortResult<Vec<User>> {
        Ok(self.read(USERS_FILE).await?.unwrap_or_default())
    }

    async fn save_users(&self, users: &[User]) -> PortResult<()> {
        self.write(USERS_FILE, users).await
    }

    async fn load_session(&self) -> PortResult<Option<PersistedSession>> {
        self.read(SESSION_FILE).await
    }

    async fn save_session(&self, session: &PersistedSession) -> PortResult<()> {
        self.write(SESSION_FILE, session).await
    }

    async fn clear_session(&self) -> PortResult<()> {
        self.remove(SESSION_FILE).await
    }

    async fn load_documents(&self) -> PortResult<Option<Vec<Document>>> {
        self.read(DOCUMENTS_FILE).await
    }

    async fn save_documents(&self, documents: &[Document]) -> PortResult<()> {
        self.write(DOCUMENTS_FILE, documents).await
    }
}
