//! services/tracker/src/adapters/memory.rs
//!
//! An in-memory `StorageService` for the store and command tests. Writes can
//! be switched to fail, either all of them or only the session record, to
//! exercise the persistence-failure paths.

use async_trait::async_trait;
use doc_tracker_core::domain::{Document, PersistedSession, User};
use doc_tracker_core::ports::{PortError, PortResult, StorageService};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Records {
    users: Vec<User>,
    session: Option<PersistedSession>,
    documents: Option<Vec<Document>>,
}

#[derive(Default)]
pub struct MemoryStorage {
    records: Mutex<Records>,
    fail_writes: AtomicBool,
    fail_session_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every save and clear fails with `PortError::Storage`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// When set, only saving or clearing the session fails.
    pub fn set_fail_session_writes(&self, fail: bool) {
        self.fail_session_writes.store(fail, Ordering::SeqCst);
    }

    fn records(&self) -> PortResult<MutexGuard<'_, Records>> {
        self.records
            .lock()
            .map_err(|_| PortError::Storage("memory storage lock poisoned".to_string()))
    }

    fn check_writable(&self) -> PortResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PortError::Storage("storage quota exceeded".to_string()));
        }
        Ok(())
    }

    fn check_session_writable(&self) -> PortResult<()> {
        self.check_writable()?;
        if self.fail_session_writes.load(Ordering::SeqCst) {
            return Err(PortError::Storage("storage quota exceeded".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageService for MemoryStorage {
    async fn load_users(&self) -> PortResult<Vec<User>> {
        Ok(self.records()?.users.clone())
    }

    async fn save_users(&self, users: &[User]) -> PortResult<()> {
        self.check_writable()?;
        self.records()?.users = users.to_vec();
        Ok(())
    }

    async fn load_session(&self) -> PortResult<Option<PersistedSession>> {
        Ok(self.records()?.session.clone())
    }

    async fn save_session(&self, session: &PersistedSession) -> PortResult<()> {
        self.check_session_writable()?;
        self.records()?.session = Some(session.clone());
        Ok(())
    }

    async fn clear_session(&self) -> PortResult<()> {
        self.check_session_writable()?;
        self.records()?.session = None;
        Ok(())
    }

    async fn load_documents(&self) -> PortResult<Option<Vec<Document>>> {
        Ok(self.records()?.documents.clone())
    }

    async fn save_documents(&self, documents: &[Document]) -> PortResult<()> {
        self.check_writable()?;
        self.records()?.documents = Some(documents.to_vec());
        Ok(())
    }
}
