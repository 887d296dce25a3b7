//! Session entity binding a bearer token to a user.

use chrono::{DateTime, Utc};

/// A server-side session record.
///
/// The session carries its own expiry and active flag, independent of the
/// expiry claim embedded in the token. A session authenticates iff
/// `is_active && now <= expires_at`.
///
/// `token_hash` is a keyed fingerprint of the bearer token; the raw token is
/// never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

impl Session {
    /// Returns true if the session is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Input data for creating a session.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: i64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Session joined with its owner, for operator listings.
#[derive(Debug, Clone)]
pub struct SessionOverview {
    pub session: Session,
    pub user_name: String,
    pub user_email: String,
}

/// Aggregate session counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCounts {
    pub total: i64,
    pub active: i64,
    /// Sessions past `expires_at`, whether or not they were deactivated yet.
    pub expired: i64,
}

impl SessionCounts {
    pub fn inactive(&self) -> i64 {
        self.total - self.active
    }
}
