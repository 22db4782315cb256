//! crates/doc_tracker_core/src/queries.rs
//!
//! Read-only views over the document collection: list filtering, the
//! dashboard summary and version-history ordering. All data is passed in by
//! the caller; nothing here touches storage.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::domain::{Document, DocumentStatus, Version};

/// Number of documents shown in the dashboard's "recent" panel.
pub const RECENT_DOCUMENTS_LIMIT: usize = 5;

/// A document counts as recently updated within this many days.
pub const RECENT_UPDATE_WINDOW_DAYS: i64 = 7;

//=========================================================================================
// List Filtering
//=========================================================================================

/// Filters applied by the document list. `None` means "all".
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub search: Option<String>,
    pub status: Option<DocumentStatus>,
    pub category: Option<String>,
}

impl DocumentFilter {
    pub fn is_active(&self) -> bool {
        self.search.as_deref().is_some_and(|s| !s.is_empty())
            || self.status.is_some()
            || self.category.is_some()
    }

    /// Search is a case-insensitive substring match on title or description.
    pub fn matches(&self, document: &Document) -> bool {
        let matches_search = match self.search.as_deref() {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                document.title.to_lowercase().contains(&term)
                    || document.description.to_lowercase().contains(&term)
            }
        };
        let matches_status = self.status.map_or(true, |s| document.status == s);
        let matches_category = self
            .category
            .as_deref()
            .map_or(true, |c| document.category == c);

        matches_search && matches_status && matches_category
    }
}

/// Returns the documents matching `filter`, preserving collection order.
pub fn filter_documents<'a>(documents: &'a [Document], filter: &DocumentFilter) -> Vec<&'a Document> {
    documents.iter().filter(|d| filter.matches(d)).collect()
}

/// Distinct categories present in the collection, sorted.
pub fn categories(documents: &[Document]) -> Vec<String> {
    documents
        .iter()
        .map(|d| d.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

//=========================================================================================
// Dashboard
//=========================================================================================

/// Headline numbers shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_documents: usize,
    /// Documents whose status is anything but archived.
    pub active_documents: usize,
    pub total_versions: usize,
    pub recent_updates: usize,
}

pub fn dashboard_stats(documents: &[Document], now: DateTime<Utc>) -> DashboardStats {
    let window = Duration::days(RECENT_UPDATE_WINDOW_DAYS);
    DashboardStats {
        total_documents: documents.len(),
        active_documents: documents
            .iter()
            .filter(|d| d.status != DocumentStatus::Archived)
            .count(),
        total_versions: documents.iter().map(|d| d.versions.len()).sum(),
        recent_updates: documents
            .iter()
            .filter(|d| now - d.updated_at <= window)
            .count(),
    }
}

/// The `limit` most recently updated documents, newest first.
pub fn recent_documents(documents: &[Document], limit: usize) -> Vec<&Document> {
    let mut sorted: Vec<&Document> = documents.iter().collect();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    sorted.truncate(limit);
    sorted
}

//=========================================================================================
// Version History
//=========================================================================================

/// A document's versions ordered for display, newest first.
pub fn versions_newest_first(document: &Document) -> Vec<&Version> {
    let mut versions: Vec<&Version> = document.versions.iter().collect();
    versions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    versions
}
