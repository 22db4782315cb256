//! services/tracker/src/stores/documents.rs
//!
//! The document store: the in-memory document collection mirrored to local
//! storage on every mutation.
//!
//! Each mutating method builds the next collection, writes it through the
//! storage port and only then swaps it in, so memory and storage agree after
//! every call and a failed write changes nothing. Lookups that miss are
//! silent no-ops; deciding what a miss means is up to the caller.

use chrono::Utc;
use doc_tracker_core::domain::{
    Document, DocumentStatus, DocumentUpdate, NewDocument, NewVersion, Version, VersionStatus,
    INITIAL_VERSION,
};
use doc_tracker_core::ports::StorageService;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::seed::sample_documents;
use super::{load_failure, persistence_failure, StoreResult};

pub struct DocumentStore {
    storage: Arc<dyn StorageService>,
    default_author: String,
    documents: Vec<Document>,
}

impl DocumentStore {
    /// Creates an empty store. Call `load_all` before use.
    pub fn new(storage: Arc<dyn StorageService>, default_author: impl Into<String>) -> Self {
        Self {
            storage,
            default_author: default_author.into(),
            documents: Vec::new(),
        }
    }

    /// Loads the persisted collection, seeding the example document on first run.
    pub async fn load_all(&mut self) -> StoreResult<()> {
        let persisted = self
            .storage
            .load_documents()
            .await
            .map_err(|e| load_failure("documents", e))?;

        match persisted {
            Some(documents) => {
                info!("Loaded {} documents", documents.len());
                self.documents = documents;
            }
            None => {
                info!("No documents stored yet, seeding the example document");
                self.commit(sample_documents(Utc::now())).await?;
            }
        }
        Ok(())
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn get_document_by_id(&self, id: Uuid) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Creates a draft document with a single current version `1.0.0`.
    pub async fn add_document(&mut self, data: NewDocument) -> StoreResult<Document> {
        let now = Utc::now();
        let author = data
            .author
            .unwrap_or_else(|| self.default_author.clone());

        let document = Document {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            category: data.category,
            created_at: now,
            updated_at: now,
            current_version: INITIAL_VERSION.to_string(),
            tags: data.tags,
            status: DocumentStatus::Draft,
            versions: vec![Version {
                id: Uuid::new_v4(),
                version: INITIAL_VERSION.to_string(),
                description: "Initial version".to_string(),
                changes: "Document created".to_string(),
                author,
                created_at: now,
                status: VersionStatus::Current,
                file_location: String::new(),
                file_name: String::new(),
                prompts: Vec::new(),
                related_documents: Vec::new(),
                attached_files: Vec::new(),
            }],
        };

        let mut next = self.documents.clone();
        next.push(document.clone());
        self.commit(next).await?;

        info!("Created document {} ({})", document.id, document.title);
        Ok(document)
    }

    /// Shallow-merges `updates` and refreshes `updated_at`.
    ///
    /// Returns the updated document, or `None` without touching storage when
    /// `id` is unknown.
    pub async fn update_document(
        &mut self,
        id: Uuid,
        updates: DocumentUpdate,
    ) -> StoreResult<Option<Document>> {
        let Some(index) = self.position(id) else {
            debug!("update_document: {} not found", id);
            return Ok(None);
        };

        let mut next = self.documents.clone();
        let document = &mut next[index];
        updates.apply_to(document);
        document.updated_at = Utc::now();
        let updated = document.clone();

        self.commit(next).await?;
        info!("Updated document {}", id);
        Ok(Some(updated))
    }

    /// Removes the document. Returns whether anything was removed.
    pub async fn delete_document(&mut self, id: Uuid) -> StoreResult<bool> {
        let Some(index) = self.position(id) else {
            debug!("delete_document: {} not found", id);
            return Ok(false);
        };

        let mut next = self.documents.clone();
        let removed = next.remove(index);
        self.commit(next).await?;

        info!("Deleted document {} ({})", removed.id, removed.title);
        Ok(true)
    }

    /// Appends a new current version and archives every earlier one.
    ///
    /// The version string is taken as given: it is not checked for format or
    /// for being greater than the previous one.
    pub async fn add_version(
        &mut self,
        document_id: Uuid,
        data: NewVersion,
    ) -> StoreResult<Option<Document>> {
        let Some(index) = self.position(document_id) else {
            debug!("add_version: {} not found", document_id);
            return Ok(None);
        };

        let now = Utc::now();
        let version = Version {
            id: Uuid::new_v4(),
            version: data.version,
            description: data.description,
            changes: data.changes,
            author: data
                .author
                .unwrap_or_else(|| self.default_author.clone()),
            created_at: now,
            status: VersionStatus::Current,
            file_location: data.file_location,
            file_name: data.file_name,
            prompts: data.prompts,
            related_documents: data.related_documents,
            attached_files: data.attached_files,
        };

        let mut next = self.documents.clone();
        let document = &mut next[index];
        for existing in &mut document.versions {
            existing.status = VersionStatus::Archived;
        }
        document.current_version = version.version.clone();
        document.versions.push(version);
        document.updated_at = now;
        let updated = document.clone();

        self.commit(next).await?;
        info!(
            "Added version {} to document {}",
            updated.current_version, document_id
        );
        Ok(Some(updated))
    }

    /// Drops the in-memory collection. Storage is left as is.
    pub fn dispose(self) {
        debug!("Document store disposed with {} documents", self.documents.len());
    }

    //=====================================================================================
    // Internals
    //=====================================================================================

    fn position(&self, id: Uuid) -> Option<usize> {
        self.documents.iter().position(|d| d.id == id)
    }

    /// Persists `next` in full, then makes it the in-memory state.
    async fn commit(&mut self, next: Vec<Document>) -> StoreResult<()> {
        self.storage
            .save_documents(&next)
            .await
            .map_err(|e| persistence_failure("documents", e))?;
        self.documents = next;
        Ok(())
    }
}
