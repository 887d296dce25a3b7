//! REST API layer for HTTP request/response handling.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Session gate, rate limiting and tracing
//! - [`routes`] - Route tables

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
