//! Repository trait for bearer-token sessions.

use crate::domain::entities::{NewSession, Session, SessionCounts, SessionOverview};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for session persistence.
///
/// Sessions are looked up by the keyed fingerprint of their bearer token.
/// No method takes a lock: concurrent `touch` / `deactivate` calls on the same
/// row are last-write-wins.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSessionRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Inserts a session, or returns the existing row if one already holds
    /// the same `token_hash`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, session: NewSession) -> Result<Session, AppError>;

    /// Finds a session by exact token fingerprint.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AppError>;

    /// Sets `is_active = false` on one session.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn deactivate(&self, id: i64) -> Result<(), AppError>;

    /// Sets `last_used` on one session.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn touch(&self, id: i64, at: DateTime<Utc>) -> Result<(), AppError>;

    /// Deactivates the active session matching `token_hash`, if any.
    ///
    /// Returns the number of rows changed (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn deactivate_by_token_hash(&self, token_hash: &str) -> Result<u64, AppError>;

    /// Deactivates every active session owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn deactivate_all_for_user(&self, user_id: i64) -> Result<u64, AppError>;

    /// Deletes sessions whose `expires_at` is before `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;

    /// Deletes inactive sessions created before `cutoff`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_inactive_created_before(&self, cutoff: DateTime<Utc>)
    -> Result<u64, AppError>;

    /// Lists sessions with their owners, most recently used first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_overview(&self, active_only: bool) -> Result<Vec<SessionOverview>, AppError>;

    /// Counts sessions by state at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn counts(&self, now: DateTime<Utc>) -> Result<SessionCounts, AppError>;

    /// Verifies the backing store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be queried.
    async fn ping(&self) -> Result<(), AppError>;
}
