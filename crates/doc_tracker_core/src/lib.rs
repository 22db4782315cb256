pub mod domain;
pub mod ports;
pub mod queries;
pub mod versioning;

pub use domain::{
    AttachedFile, Document, DocumentStatus, DocumentUpdate, NewDocument, NewVersion,
    PersistedSession, Profile, ProfileUpdate, Prompt, Registration, RelatedDocument,
    SessionUser, User, Version, VersionStatus,
};
pub use ports::{PortError, PortResult, StorageService};
pub use queries::{DashboardStats, DocumentFilter};
pub use versioning::{SemVer, VersionBump};
