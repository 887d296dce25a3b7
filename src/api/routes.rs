//! API route tables.
//!
//! Routes here carry no middleware; [`crate::routes`] attaches the session
//! gate, rate limiting and tracing.

use crate::api::handlers::{
    college_handler, events_handler, faculty_handler, faculty_member_handler,
    forgot_password_handler, hostel_handler, login_handler, logout_all_handler, logout_handler,
    me_handler, mess_handler, register_handler, reset_password_handler, semester_details_handler,
    semesters_handler, subjects_handler, timetable_handler, update_profile_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// Account endpoints reachable without a session.
///
/// # Endpoints
///
/// - `POST /auth/register`        - Create an account, returns a token
/// - `POST /auth/login`           - Exchange credentials for a token
/// - `POST /auth/logout`          - Revoke the presented token's session
/// - `POST /auth/forgot-password` - Issue a password reset token
/// - `POST /auth/reset-password`  - Set a new password with a reset token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/auth/forgot-password", post(forgot_password_handler))
        .route("/auth/reset-password", post(reset_password_handler))
}

/// Endpoints that require a valid session.
///
/// # Endpoints
///
/// - `GET  /auth/me`                        - Caller's profile
/// - `PUT  /auth/profile`                   - Partial profile update
/// - `POST /auth/logout-all`                - Revoke all caller sessions
/// - `GET  /academics/semesters`            - All semesters
/// - `GET  /academics/subjects/{semester}`  - Subjects of a semester
/// - `GET  /academics/details/{semester}`   - Semester with subjects
/// - `GET  /timetable/{semester}`           - Weekly timetable
/// - `GET  /faculty`, `/faculty/{id}`       - Faculty directory
/// - `GET  /events`, `/mess`, `/hostel`, `/college`
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me_handler))
        .route("/auth/profile", put(update_profile_handler))
        .route("/auth/logout-all", post(logout_all_handler))
        .route("/academics/semesters", get(semesters_handler))
        .route("/academics/subjects/{semester_id}", get(subjects_handler))
        .route(
            "/academics/details/{semester_id}",
            get(semester_details_handler),
        )
        .route("/timetable/{semester_id}", get(timetable_handler))
        .route("/faculty", get(faculty_handler))
        .route("/faculty/{id}", get(faculty_member_handler))
        .route("/events", get(events_handler))
        .route("/mess", get(mess_handler))
        .route("/hostel", get(hostel_handler))
        .route("/college", get(college_handler))
}
