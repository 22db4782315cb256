//! crates/doc_tracker_core/src/domain.rs
//!
//! Defines the core data structures for the application.
//! These are plain nested values: documents own their versions, versions own
//! their prompts, attached files and related-document links. Field names are
//! serialized in camelCase so the persisted layout stays stable.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// How long a session stays valid after login or registration. Not sliding.
pub const SESSION_TTL_HOURS: i64 = 24;

/// The version string every new document starts from.
pub const INITIAL_VERSION: &str = "1.0.0";

//=========================================================================================
// Users and Sessions
//=========================================================================================

/// Academic profile attached to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub institution: String,
    pub degree: String,
    pub field: String,
}

/// A partial profile; only the `Some` fields are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.institution.is_none() && self.degree.is_none() && self.field.is_none()
    }

    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(institution) = &self.institution {
            profile.institution = institution.clone();
        }
        if let Some(degree) = &self.degree {
            profile.degree = degree.clone();
        }
        if let Some(field) = &self.field {
            profile.field = field.clone();
        }
    }
}

// Stored entry in the user directory. The password is kept exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub profile: Profile,
}

impl User {
    /// The non-authoritative projection carried by a session.
    pub fn to_session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            profile: self.profile.clone(),
        }
    }
}

/// Data captured by the registration form.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub institution: String,
    pub degree: String,
    pub field: String,
}

/// The identity visible to the rest of the application while logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub profile: Profile,
}

/// A session as written to local storage: the user projection plus an absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub user: SessionUser,
    pub expires_at: DateTime<Utc>,
}

impl PersistedSession {
    /// Starts a session at `now` that expires `SESSION_TTL_HOURS` later.
    pub fn start(user: SessionUser, now: DateTime<Utc>) -> Self {
        Self {
            user,
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

//=========================================================================================
// Documents and Versions
//=========================================================================================

/// Workflow status of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Draft,
    Review,
    Approved,
    Archived,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Review => "review",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a version is the live one or part of the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    Current,
    Archived,
}

/// A free-text record of one AI interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: Uuid,
    pub name: String,
    pub content: String,
    pub ai_used: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
}

/// A link to an external document. Nothing is fetched or validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedDocument {
    pub name: String,
    pub url: String,
}

/// Metadata describing a file. No file bytes are stored anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedFile {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: String,
    /// Human-readable size such as "2.3 MB"; not a byte count.
    pub size: String,
    pub upload_date: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
}

/// One entry in a document's append-only history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub id: Uuid,
    pub version: String,
    pub description: String,
    pub changes: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub status: VersionStatus,
    #[serde(default)]
    pub file_location: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub prompts: Vec<Prompt>,
    #[serde(default)]
    pub related_documents: Vec<RelatedDocument>,
    #[serde(default)]
    pub attached_files: Vec<AttachedFile>,
}

/// A user-created academic work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub current_version: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: DocumentStatus,
    pub versions: Vec<Version>,
}

impl Document {
    /// The version flagged as current, if the history is well formed.
    pub fn current(&self) -> Option<&Version> {
        self.versions
            .iter()
            .find(|v| v.status == VersionStatus::Current)
    }

    /// Checks the single-current-version invariant.
    pub fn has_consistent_history(&self) -> bool {
        let mut current = self
            .versions
            .iter()
            .filter(|v| v.status == VersionStatus::Current);
        match (current.next(), current.next()) {
            (Some(v), None) => v.version == self.current_version,
            _ => false,
        }
    }
}

//=========================================================================================
// Inputs for Document Mutations
//=========================================================================================

/// Data captured by the "new document" form.
#[derive(Debug, Clone, Default)]
pub struct NewDocument {
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: Option<String>,
}

/// A shallow set of field edits; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct DocumentUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<DocumentStatus>,
}

impl DocumentUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.status.is_none()
    }

    pub fn apply_to(self, document: &mut Document) {
        if let Some(title) = self.title {
            document.title = title;
        }
        if let Some(description) = self.description {
            document.description = description;
        }
        if let Some(category) = self.category {
            document.category = category;
        }
        if let Some(tags) = self.tags {
            document.tags = tags;
        }
        if let Some(status) = self.status {
            document.status = status;
        }
    }
}

/// Data captured by the "add version" form.
#[derive(Debug, Clone, Default)]
pub struct NewVersion {
    pub version: String,
    pub description: String,
    pub changes: String,
    pub author: Option<String>,
    pub file_location: String,
    pub file_name: String,
    pub prompts: Vec<Prompt>,
    pub related_documents: Vec<RelatedDocument>,
    pub attached_files: Vec<AttachedFile>,
}
