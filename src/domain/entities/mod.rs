//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without persistence concerns. Separate
//! structs describe creation input (`NewUser`, `NewSession`) and partial
//! updates (`ProfileUpdate`).
//!
//! # Entity Types
//!
//! - [`User`] - A registered portal account
//! - [`Session`] - A server-side record binding a bearer token to a user
//! - [`campus`] - Read-only academic and campus-life records

pub mod campus;
pub mod session;
pub mod user;

pub use campus::{
    College, Event, Hostel, MessMenu, Semester, SemesterDetails, Subject, Teacher, TimetableEntry,
};
pub use session::{NewSession, Session, SessionCounts, SessionOverview};
pub use user::{NewUser, ProfileUpdate, User};
