//! Shared application state injected into handlers and middleware.

use std::sync::Arc;

use chrono::Duration;

use crate::application::services::{AccountService, AuthService, CampusService};
use crate::domain::repositories::{CampusRepository, SessionRepository, UserRepository};

pub type SharedAuthService = AuthService<dyn SessionRepository, dyn UserRepository>;
pub type SharedAccountService = AccountService<dyn SessionRepository, dyn UserRepository>;
pub type SharedCampusService = CampusService<dyn CampusRepository>;

/// Session-related settings needed to assemble the services.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub session_ttl: Duration,
    pub password_reset_ttl: Duration,
    pub expose_reset_token: bool,
}

/// Application state cloned into every request.
///
/// Services hold repository trait objects, so the same state can be built on
/// PostgreSQL in production and on in-memory repositories in tests.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<SharedAuthService>,
    pub account_service: Arc<SharedAccountService>,
    pub campus_service: Arc<SharedCampusService>,
    /// Return raw password reset tokens in API responses (development only).
    pub expose_reset_token: bool,
}

impl AppState {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        users: Arc<dyn UserRepository>,
        campus: Arc<dyn CampusRepository>,
        settings: &AuthSettings,
    ) -> Self {
        let auth_service = Arc::new(AuthService::new(
            sessions,
            users.clone(),
            &settings.jwt_secret,
            settings.session_ttl,
        ));
        let account_service = Arc::new(AccountService::new(
            users,
            auth_service.clone(),
            settings.password_reset_ttl,
        ));

        Self {
            auth_service,
            account_service,
            campus_service: Arc::new(CampusService::new(campus)),
            expose_reset_token: settings.expose_reset_token,
        }
    }
}
