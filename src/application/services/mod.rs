//! Business logic services for the application layer.

pub mod account_service;
pub mod auth_service;
pub mod campus_service;

pub use account_service::{AccountService, PasswordReset};
pub use auth_service::{AuthService, AuthenticatedUser, IssuedSession};
pub use campus_service::CampusService;
