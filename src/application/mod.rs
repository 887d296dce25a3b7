//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide the API that HTTP handlers
//! and the admin CLI call into.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Session gate and session lifecycle
//! - [`services::account_service::AccountService`] - Registration, login, profile, password reset
//! - [`services::campus_service::CampusService`] - Read-only campus catalogue
//! - [`session_pruner`] - Scheduled session pruning through [`services::AuthService`]

pub mod services;
pub mod session_pruner;
