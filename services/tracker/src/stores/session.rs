//! services/tracker/src/stores/session.rs
//!
//! The session store: holds the logged-in user and manages the locally
//! persisted user directory.
//!
//! Credentials are compared as plain strings and sessions are a stored
//! projection of the user with a fixed 24 hour expiry. This is a local
//! convenience gate, not an authentication system.

use chrono::Utc;
use doc_tracker_core::domain::{
    PersistedSession, Profile, ProfileUpdate, Registration, SessionUser, User,
};
use doc_tracker_core::ports::{PortError, StorageService};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use super::{load_failure, persistence_failure, StoreError, StoreResult};

pub struct SessionStore {
    storage: Arc<dyn StorageService>,
    simulated_latency: Duration,
    session: Option<PersistedSession>,
}

impl SessionStore {
    /// Creates an empty store. Call `restore_session` before use.
    pub fn new(storage: Arc<dyn StorageService>, simulated_latency: Duration) -> Self {
        Self {
            storage,
            simulated_latency,
            session: None,
        }
    }

    /// Picks up a persisted session if it has not expired.
    ///
    /// An expired or unreadable session is cleared from storage and the store
    /// stays logged out. Only a failing read of healthy storage is an error.
    pub async fn restore_session(&mut self) -> StoreResult<Option<&SessionUser>> {
        self.session = None;

        let persisted = match self.storage.load_session().await {
            Ok(persisted) => persisted,
            Err(PortError::Corrupt(file, reason)) => {
                warn!("Discarding unreadable session in {}: {}", file, reason);
                self.clear_persisted().await;
                return Ok(None);
            }
            Err(e) => return Err(load_failure("session", e)),
        };

        match persisted {
            Some(session) if session.is_valid_at(Utc::now()) => {
                info!("Restored session for {}", session.user.email);
                self.session = Some(session);
            }
            Some(session) => {
                info!("Session for {} expired at {}", session.user.email, session.expires_at);
                self.clear_persisted().await;
            }
            None => {}
        }
        Ok(self.session.as_ref().map(|s| &s.user))
    }

    /// Creates a user and logs them in.
    pub async fn register(&mut self, data: Registration) -> StoreResult<SessionUser> {
        self.simulate_latency().await;

        // 1. Read the directory fresh; another process may have written to it.
        let mut users = self
            .storage
            .load_users()
            .await
            .map_err(|e| load_failure("user directory", e))?;

        // 2. Enforce unique emails.
        if users.iter().any(|u| u.email == data.email) {
            warn!("Registration rejected, {} already exists", data.email);
            return Err(StoreError::DuplicateEmail);
        }

        // 3. Append the new user. The password is stored as typed.
        let user = User {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            password: data.password,
            created_at: Utc::now(),
            profile: Profile {
                institution: data.institution,
                degree: data.degree,
                field: data.field,
            },
        };
        let session_user = user.to_session_user();
        let previous = users.clone();
        users.push(user);
        self.storage
            .save_users(&users)
            .await
            .map_err(|e| persistence_failure("user directory", e))?;

        // 4. Start the session. Without it the new entry is rolled back.
        match self.start_session(session_user).await {
            Ok(user) => {
                info!("Registered user {}", user.email);
                Ok(user)
            }
            Err(e) => {
                self.restore_users(&previous).await;
                Err(e)
            }
        }
    }

    /// Logs in with an exact email and password match.
    pub async fn login(&mut self, email: &str, password: &str) -> StoreResult<SessionUser> {
        self.simulate_latency().await;

        let users = self
            .storage
            .load_users()
            .await
            .map_err(|e| load_failure("user directory", e))?;

        let user = users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .ok_or_else(|| {
                warn!("Login rejected for {}", email);
                StoreError::InvalidCredentials
            })?;

        self.start_session(user.to_session_user()).await
    }

    /// Ends the session. Logging out while logged out is fine, and a failure
    /// to clear storage is logged but still logs out in memory.
    pub async fn logout(&mut self) {
        self.clear_persisted().await;
        if let Some(session) = self.session.take() {
            info!("Logged out {}", session.user.email);
        }
    }

    /// Merges `update` into the profile of the session and of the matching
    /// directory entry. The session keeps its original expiry.
    pub async fn update_profile(&mut self, update: ProfileUpdate) -> StoreResult<SessionUser> {
        let mut session = self
            .active_session()
            .await?
            .cloned()
            .ok_or(StoreError::NotAuthenticated)?;
        update.apply_to(&mut session.user.profile);

        let previous = self
            .storage
            .load_users()
            .await
            .map_err(|e| load_failure("user directory", e))?;
        let mut users = previous.clone();
        for user in users.iter_mut().filter(|u| u.id == session.user.id) {
            update.apply_to(&mut user.profile);
        }

        self.storage
            .save_users(&users)
            .await
            .map_err(|e| persistence_failure("user directory", e))?;
        if let Err(e) = self.storage.save_session(&session).await {
            self.restore_users(&previous).await;
            return Err(persistence_failure("session", e));
        }

        info!("Updated profile for {}", session.user.email);
        let user = session.user.clone();
        self.session = Some(session);
        Ok(user)
    }

    /// The logged-in user, if any. A session that has expired since it was
    /// restored is cleared here.
    pub async fn current_user(&mut self) -> StoreResult<Option<SessionUser>> {
        Ok(self.active_session().await?.map(|s| s.user.clone()))
    }

    /// Whether a non-expired session is held in memory.
    pub fn is_authenticated(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.is_valid_at(Utc::now()))
    }

    /// Drops the in-memory session. Storage is left as is.
    pub fn dispose(self) {
        tracing::debug!("Session store disposed");
    }

    //=====================================================================================
    // Internals
    //=====================================================================================

    async fn active_session(&mut self) -> StoreResult<Option<&PersistedSession>> {
        let expired = self
            .session
            .as_ref()
            .is_some_and(|s| !s.is_valid_at(Utc::now()));
        if expired {
            info!("Session expired, logging out");
            self.storage
                .clear_session()
                .await
                .map_err(|e| persistence_failure("session", e))?;
            self.session = None;
        }
        Ok(self.session.as_ref())
    }

    async fn start_session(&mut self, user: SessionUser) -> StoreResult<SessionUser> {
        let session = PersistedSession::start(user, Utc::now());
        self.storage
            .save_session(&session)
            .await
            .map_err(|e| persistence_failure("session", e))?;
        info!("Session started for {}, expires {}", session.user.email, session.expires_at);
        let user = session.user.clone();
        self.session = Some(session);
        Ok(user)
    }

    async fn clear_persisted(&self) {
        if let Err(e) = self.storage.clear_session().await {
            warn!("Could not clear persisted session: {}", e);
        }
    }

    /// Puts the user directory back after a later write in the same call failed.
    async fn restore_users(&self, previous: &[User]) {
        if let Err(e) = self.storage.save_users(previous).await {
            tracing::error!("Could not roll back the user directory: {}", e);
        }
    }

    async fn simulate_latency(&self) {
        if !self.simulated_latency.is_zero() {
            tokio::time::sleep(self.simulated_latency).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStorage;
    use assert_matches::assert_matches;
    use chrono::Duration as ChronoDuration;

    fn registration(email: &str) -> Registration {
        Registration {
            name: "Ana Torres".into(),
            email: email.into(),
            password: "secret1".into(),
            institution: "UNAM".into(),
            degree: "doctorado".into(),
            field: "Computer Science".into(),
        }
    }

    fn store(storage: &Arc<MemoryStorage>) -> SessionStore {
        SessionStore::new(storage.clone(), Duration::ZERO)
    }

    #[tokio::test]
    async fn register_then_login_returns_registered_profile() {
        let storage = Arc::new(MemoryStorage::new());
        let mut sessions = store(&storage);

        let registered = sessions.register(registration("ana@uni.edu")).await.unwrap();
        assert!(sessions.is_authenticated());
        sessions.logout().await;
        assert!(!sessions.is_authenticated());

        let logged_in = sessions.login("ana@uni.edu", "secret1").await.unwrap();
        assert_eq!(logged_in, registered);
        assert_eq!(logged_in.profile.institution, "UNAM");
        assert_eq!(logged_in.profile.field, "Computer Science");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_and_directory_unchanged() {
        let storage = Arc::new(MemoryStorage::new());
        let mut sessions = store(&storage);
        let first = sessions.register(registration("ana@uni.edu")).await.unwrap();

        let mut again = registration("ana@uni.edu");
        again.name = "Someone Else".into();
        assert_matches!(sessions.register(again).await, Err(StoreError::DuplicateEmail));

        let users = storage.load_users().await.unwrap();
        assert_eq!(users.iter().filter(|u| u.email == "ana@uni.edu").count(), 1);
        // The failed attempt left the active session alone.
        assert_eq!(sessions.current_user().await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let storage = Arc::new(MemoryStorage::new());
        let mut sessions = store(&storage);
        sessions.register(registration("ana@uni.edu")).await.unwrap();
        sessions.logout().await;

        assert_matches!(
            sessions.login("ana@uni.edu", "wrong").await,
            Err(StoreError::InvalidCredentials)
        );
        assert_matches!(
            sessions.login("nobody@uni.edu", "secret1").await,
            Err(StoreError::InvalidCredentials)
        );
        assert!(!sessions.is_authenticated());
    }

    #[tokio::test]
    async fn restore_picks_up_a_live_session() {
        let storage = Arc::new(MemoryStorage::new());
        let registered = store(&storage)
            .register(registration("ana@uni.edu"))
            .await
            .unwrap();

        let mut restarted = store(&storage);
        let restored = restarted.restore_session().await.unwrap().cloned();
        assert_eq!(restored, Some(registered));
        assert!(restarted.is_authenticated());
    }

    #[tokio::test]
    async fn restore_after_expiry_is_logged_out_and_clears_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let user = SessionUser {
            id: Uuid::new_v4(),
            name: "Ana".into(),
            email: "ana@uni.edu".into(),
            profile: Profile::default(),
        };
        let stale = PersistedSession::start(user, Utc::now() - ChronoDuration::hours(25));
        storage.save_session(&stale).await.unwrap();

        let mut sessions = store(&storage);
        assert_eq!(sessions.restore_session().await.unwrap(), None);
        assert!(!sessions.is_authenticated());
        assert!(storage.load_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_profile_merges_into_session_and_directory() {
        let storage = Arc::new(MemoryStorage::new());
        let mut sessions = store(&storage);
        let registered = sessions.register(registration("ana@uni.edu")).await.unwrap();
        let expiry_before = storage.load_session().await.unwrap().unwrap().expires_at;

        let updated = sessions
            .update_profile(ProfileUpdate {
                institution: Some("MIT".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.profile.institution, "MIT");
        assert_eq!(updated.profile.degree, registered.profile.degree);

        let stored = storage.load_users().await.unwrap();
        assert_eq!(stored[0].profile.institution, "MIT");
        let persisted = storage.load_session().await.unwrap().unwrap();
        assert_eq!(persisted.user.profile.institution, "MIT");
        assert_eq!(persisted.expires_at, expiry_before);
    }

    #[tokio::test]
    async fn update_profile_requires_a_session() {
        let storage = Arc::new(MemoryStorage::new());
        let mut sessions = store(&storage);
        assert_matches!(
            sessions.update_profile(ProfileUpdate::default()).await,
            Err(StoreError::NotAuthenticated)
        );
    }

    #[tokio::test]
    async fn failed_write_leaves_state_unchanged() {
        let storage = Arc::new(MemoryStorage::new());
        let mut sessions = store(&storage);
        sessions.register(registration("ana@uni.edu")).await.unwrap();
        sessions.logout().await;

        storage.set_fail_writes(true);
        assert_matches!(
            sessions.register(registration("bo@uni.edu")).await,
            Err(StoreError::PersistenceFailure(_))
        );
        assert_matches!(
            sessions.login("ana@uni.edu", "secret1").await,
            Err(StoreError::PersistenceFailure(_))
        );
        assert!(!sessions.is_authenticated());
        assert_eq!(storage.load_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn register_rolls_back_the_directory_when_the_session_cannot_be_saved() {
        let storage = Arc::new(MemoryStorage::new());
        let mut sessions = store(&storage);

        storage.set_fail_session_writes(true);
        assert_matches!(
            sessions.register(registration("ana@uni.edu")).await,
            Err(StoreError::PersistenceFailure(_))
        );
        assert!(storage.load_users().await.unwrap().is_empty());
        assert!(!sessions.is_authenticated());

        // Once storage recovers the same email can register.
        storage.set_fail_session_writes(false);
        assert!(sessions.register(registration("ana@uni.edu")).await.is_ok());
        assert_eq!(storage.load_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_profile_keeps_records_in_step_when_the_session_cannot_be_saved() {
        let storage = Arc::new(MemoryStorage::new());
        let mut sessions = store(&storage);
        let registered = sessions.register(registration("ana@uni.edu")).await.unwrap();

        storage.set_fail_session_writes(true);
        assert_matches!(
            sessions
                .update_profile(ProfileUpdate {
                    institution: Some("MIT".into()),
                    ..Default::default()
                })
                .await,
            Err(StoreError::PersistenceFailure(_))
        );

        assert_eq!(storage.load_users().await.unwrap()[0].profile.institution, "UNAM");
        let persisted = storage.load_session().await.unwrap().unwrap();
        assert_eq!(persisted.user.profile.institution, "UNAM");
        assert_eq!(sessions.current_user().await.unwrap(), Some(registered));
    }

    #[tokio::test]
    async fn session_expiring_after_restore_is_cleared_on_next_check() {
        let storage = Arc::new(MemoryStorage::new());
        let mut sessions = store(&storage);
        sessions.register(registration("ana@uni.edu")).await.unwrap();

        let mut stale = storage.load_session().await.unwrap().unwrap();
        stale.expires_at = Utc::now() - ChronoDuration::minutes(1);
        sessions.session = Some(stale);

        assert!(!sessions.is_authenticated());
        assert_eq!(sessions.current_user().await.unwrap(), None);
        assert!(sessions.session.is_none());
        assert!(storage.load_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn logout_succeeds_even_if_storage_cannot_be_cleared() {
        let storage = Arc::new(MemoryStorage::new());
        let mut sessions = store(&storage);
        sessions.register(registration("ana@uni.edu")).await.unwrap();

        storage.set_fail_session_writes(true);
        sessions.logout().await;
        assert!(!sessions.is_authenticated());
        assert_eq!(sessions.current_user().await.unwrap(), None);
    }
}
