//! Security helpers shared by the services and the admin CLI.
//!
//! - [`jwt`] - Signed bearer token encoding and verification
//! - [`password`] - Argon2 password hashing
//! - [`secure_token`] - Random tokens and token fingerprints

pub mod jwt;
pub mod password;
pub mod secure_token;
