//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod campus;
pub mod health;

pub use auth::{
    forgot_password_handler, login_handler, logout_all_handler, logout_handler, me_handler,
    register_handler, reset_password_handler, update_profile_handler,
};
pub use campus::{
    college_handler, events_handler, faculty_handler, faculty_member_handler, hostel_handler,
    mess_handler, semester_details_handler, semesters_handler, subjects_handler,
    timetable_handler,
};
pub use health::health_handler;
