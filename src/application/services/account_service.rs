//! Account management: registration, login, profile and password reset.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use crate::application::services::auth_service::{AuthService, IssuedSession};
use crate::domain::entities::{NewUser, ProfileUpdate, User};
use crate::domain::repositories::{SessionRepository, UserRepository};
use crate::error::AppError;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::secure_token::{generate_hex_token, sha256_hex};

/// Random bytes in a password reset token.
const RESET_TOKEN_BYTES: usize = 32;

/// A pending password reset.
#[derive(Debug, Clone)]
pub struct PasswordReset {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Service for user accounts.
///
/// Session handling is delegated to [`AuthService`], so a successful
/// registration or login always ends with a freshly issued session.
pub struct AccountService<S, U>
where
    S: SessionRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    users: Arc<U>,
    auth: Arc<AuthService<S, U>>,
    reset_ttl: Duration,
}

impl<S, U> AccountService<S, U>
where
    S: SessionRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    /// Creates a new account service.
    ///
    /// `reset_ttl` bounds how long a password reset token stays valid.
    pub fn new(users: Arc<U>, auth: Arc<AuthService<S, U>>, reset_ttl: Duration) -> Self {
        Self {
            users,
            auth,
            reset_ttl,
        }
    }

    /// Registers a user and signs them in.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] on hashing or database errors.
    pub async fn register(
        &self,
        name: String,
        email: String,
        password: &str,
    ) -> Result<(User, IssuedSession), AppError> {
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(
                "User already exists with this email",
                json!({ "email": email }),
            ));
        }

        let user = self
            .users
            .create(NewUser {
                email,
                password_hash: hash_password(password)?,
                name,
            })
            .await?;

        let session = self.auth.issue_session(&user).await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok((user, session))
    }

    /// Checks credentials and issues a new session.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with the same message whether the
    /// email is unknown or the password is wrong.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(User, IssuedSession), AppError> {
        let invalid = || AppError::bad_request("Invalid email or password", json!({}));

        let user = self.users.find_by_email(email).await?.ok_or_else(invalid)?;

        if !verify_password(password, &user.password_hash)? {
            tracing::debug!(user_id = user.id, "Login rejected: wrong password");
            return Err(invalid());
        }

        let session = self.auth.issue_session(&user).await?;

        tracing::info!(user_id = user.id, session_id = session.session.id, "User logged in");
        Ok((user, session))
    }

    /// Applies a partial profile update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the new email belongs to someone else.
    /// Returns [`AppError::NotFound`] if the user no longer exists.
    pub async fn update_profile(
        &self,
        user_id: i64,
        update: ProfileUpdate,
    ) -> Result<User, AppError> {
        if update.is_empty() {
            return self
                .users
                .find_by_id(user_id)
                .await?
                .ok_or_else(|| AppError::not_found("User not found", json!({ "id": user_id })));
        }

        if let Some(email) = &update.email
            && let Some(owner) = self.users.find_by_email(email).await?
            && owner.id != user_id
        {
            return Err(AppError::conflict(
                "Email already in use by another user",
                json!({ "email": email }),
            ));
        }

        self.users.update_profile(user_id, update).await
    }

    /// Starts a password reset for `email`.
    ///
    /// Only the SHA-256 digest of the returned token is stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no user has this email.
    pub async fn request_password_reset(&self, email: &str) -> Result<PasswordReset, AppError> {
        let user = self.users.find_by_email(email).await?.ok_or_else(|| {
            AppError::not_found("User not found with this email", json!({ "email": email }))
        })?;

        let token = generate_hex_token(RESET_TOKEN_BYTES)?;
        let expires_at = Utc::now() + self.reset_ttl;

        self.users
            .set_reset_token(user.id, &sha256_hex(&token), expires_at)
            .await?;

        tracing::info!(user_id = user.id, "Password reset requested");
        Ok(PasswordReset { token, expires_at })
    }

    /// Sets a new password using a reset token and signs the user out
    /// everywhere.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the token is unknown or expired.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_reset_token(&sha256_hex(token), Utc::now())
            .await?
            .ok_or_else(|| AppError::bad_request("Invalid or expired reset token", json!({})))?;

        self.users
            .update_password(user.id, &hash_password(new_password)?)
            .await?;
        let revoked = self.auth.revoke_all_sessions(user.id).await?;

        tracing::info!(user_id = user.id, revoked, "Password reset completed");
        Ok(())
    }
}
