//! Session-based bearer authentication.
//!
//! [`AuthService`] issues signed tokens backed by session rows and resolves an
//! inbound token to its user. Expiry is lazy: an expired session is
//! deactivated the first time it is presented, not by a timer.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::{NewSession, Session, SessionCounts, SessionOverview, User};
use crate::domain::repositories::{SessionRepository, UserRepository};
use crate::error::{AppError, AuthError};
use crate::utils::jwt::{JwtCodec, TokenClaims};
use crate::utils::secure_token::fingerprint;

/// Identity attached to a request that passed the gate.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub session_id: i64,
}

/// A freshly minted bearer token and the session backing it.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub session: Session,
}

/// Service for issuing, validating and revoking bearer-token sessions.
///
/// Session rows store an HMAC-SHA256 fingerprint of the token (keyed by the
/// same secret that signs tokens), never the token itself.
///
/// Both repository parameters may be trait objects, which is how
/// [`crate::state::AppState`] holds them.
pub struct AuthService<S, U>
where
    S: SessionRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    sessions: Arc<S>,
    users: Arc<U>,
    codec: JwtCodec,
    secret: String,
    session_ttl: Duration,
}

impl<S, U> AuthService<S, U>
where
    S: SessionRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `sessions` - session repository
    /// - `users` - user repository, used to resolve session owners
    /// - `secret` - signs tokens and keys token fingerprints
    /// - `session_ttl` - lifetime of newly issued sessions
    pub fn new(sessions: Arc<S>, users: Arc<U>, secret: &str, session_ttl: Duration) -> Self {
        Self {
            sessions,
            users,
            codec: JwtCodec::new(secret),
            secret: secret.to_string(),
            session_ttl,
        }
    }

    fn token_hash(&self, token: &str) -> String {
        fingerprint(&self.secret, token)
    }

    /// Mints a token for `user` and records an active session for it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if signing or the insert fails.
    pub async fn issue_session(&self, user: &User) -> Result<IssuedSession, AppError> {
        self.issue_session_at(user, Utc::now()).await
    }

    /// [`Self::issue_session`] with an explicit issue time.
    ///
    /// # Errors
    ///
    /// See [`Self::issue_session`].
    pub async fn issue_session_at(
        &self,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<IssuedSession, AppError> {
        let claims = TokenClaims::new(user.id, &user.email, now, self.session_ttl)?;
        let token = self.codec.sign(&claims)?;
        let expires_at = now + self.session_ttl;

        let session = self
            .sessions
            .create(NewSession {
                user_id: user.id,
                token_hash: self.token_hash(&token),
                expires_at,
            })
            .await?;

        tracing::debug!(user_id = user.id, session_id = session.id, "Issued session");

        Ok(IssuedSession {
            token,
            expires_at,
            session,
        })
    }

    /// Resolves a bearer token to its user.
    ///
    /// On success the session's `last_used` is advanced; a failure to record
    /// it is logged and ignored.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MissingToken`] - empty token
    /// - [`AuthError::InvalidSignature`] - signature or claims do not verify
    /// - [`AuthError::UserNotFound`] - token subject no longer exists
    /// - [`AuthError::SessionInactive`] - session was revoked or already expired,
    ///   or its row was pruned
    /// - [`AuthError::SessionExpired`] - session passed `expires_at`; it is
    ///   deactivated before returning
    /// - [`AuthError::StorageUnavailable`] - repository failure
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        self.authenticate_at(token, Utc::now()).await
    }

    /// [`Self::authenticate`] evaluated at `now`.
    ///
    /// # Errors
    ///
    /// See [`Self::authenticate`].
    pub async fn authenticate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedUser, AuthError> {
        let result = self.check_token(token, now).await;

        if let Err(e) = &result {
            metrics::counter!("auth_rejections_total", "reason" => e.reason()).increment(1);
            tracing::debug!(reason = e.reason(), "Authentication rejected");
        }

        result
    }

    async fn check_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedUser, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::MissingToken);
        }

        let claims = self.codec.verify(token)?;
        let token_hash = self.token_hash(token);

        let existing = self
            .sessions
            .find_by_token_hash(&token_hash)
            .await
            .map_err(AuthError::storage)?;

        let (session, owner) = match existing {
            Some(session) => (session, None),
            // Tokens minted here always carry a jti and a row; a missing row
            // means it was revoked and pruned.
            None if claims.jti.is_some() => return Err(AuthError::SessionInactive),
            None => {
                let (session, user) = self.bootstrap_session(&claims, token_hash).await?;
                (session, Some(user))
            }
        };

        if !session.is_active {
            return Err(AuthError::SessionInactive);
        }

        if session.is_expired_at(now) {
            self.sessions
                .deactivate(session.id)
                .await
                .map_err(AuthError::storage)?;
            tracing::info!(
                session_id = session.id,
                user_id = session.user_id,
                "Session expired, deactivated"
            );
            return Err(AuthError::SessionExpired);
        }

        let user = match owner {
            Some(user) => user,
            None => self
                .users
                .find_by_id(session.user_id)
                .await
                .map_err(AuthError::storage)?
                .ok_or(AuthError::UserNotFound)?,
        };

        if let Err(e) = self.sessions.touch(session.id, now).await {
            tracing::warn!(session_id = session.id, error = %e, "Failed to update last_used");
        }

        Ok(AuthenticatedUser {
            user,
            session_id: session.id,
        })
    }

    /// Creates the session row for a verified token minted before sessions
    /// were tracked (no `jti`). Expiry comes from the token's `exp` claim.
    async fn bootstrap_session(
        &self,
        claims: &TokenClaims,
        token_hash: String,
    ) -> Result<(Session, User), AuthError> {
        let user = self
            .users
            .find_by_id(claims.user_id)
            .await
            .map_err(AuthError::storage)?
            .ok_or(AuthError::UserNotFound)?;

        let expires_at = claims.expires_at().ok_or(AuthError::InvalidSignature)?;

        let session = self
            .sessions
            .create(NewSession {
                user_id: user.id,
                token_hash,
                expires_at,
            })
            .await
            .map_err(AuthError::storage)?;

        tracing::info!(
            user_id = user.id,
            session_id = session.id,
            "Created session for untracked token"
        );

        Ok((session, user))
    }

    /// Deactivates the session for `token`.
    ///
    /// Revoking an unknown or already inactive session is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn revoke_session(&self, token: &str) -> Result<(), AppError> {
        let changed = self
            .sessions
            .deactivate_by_token_hash(&self.token_hash(token))
            .await?;

        tracing::debug!(changed, "Revoked session");
        Ok(())
    }

    /// Deactivates every active session owned by `user_id`.
    ///
    /// Returns the number of sessions deactivated.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn revoke_all_sessions(&self, user_id: i64) -> Result<u64, AppError> {
        let count = self.sessions.deactivate_all_for_user(user_id).await?;
        tracing::info!(user_id, count, "Revoked all sessions");
        Ok(count)
    }

    /// Deletes sessions past expiry at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn prune_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        self.sessions.delete_expired(now).await
    }

    /// Deletes inactive sessions created before `cutoff`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn prune_stale_inactive_sessions(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        self.sessions.delete_inactive_created_before(cutoff).await
    }

    /// Lists sessions with their owners.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_sessions(&self, active_only: bool) -> Result<Vec<SessionOverview>, AppError> {
        self.sessions.list_overview(active_only).await
    }

    /// Counts sessions by state at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn session_stats(&self, now: DateTime<Utc>) -> Result<SessionCounts, AppError> {
        self.sessions.counts(now).await
    }

    /// Checks that the session store answers.
    ///
    /// # Errors
    ///
    /// Returns the repository error if the store is unreachable.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.sessions.ping().await
    }
}
