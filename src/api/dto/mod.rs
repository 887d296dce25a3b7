//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Catalogue records are served as their domain
//! entities and have no DTO here.

pub mod auth;
pub mod health;
pub mod profile;
