//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow` structs.
//!
//! # Repositories
//!
//! - [`PgSessionRepository`] - Bearer-token sessions
//! - [`PgUserRepository`] - User accounts and password reset state
//! - [`PgCampusRepository`] - Read-only academic and campus records

pub mod pg_campus_repository;
pub mod pg_session_repository;
pub mod pg_user_repository;

pub use pg_campus_repository::PgCampusRepository;
pub use pg_session_repository::PgSessionRepository;
pub use pg_user_repository::PgUserRepository;
