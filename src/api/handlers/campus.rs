//! Handlers for the campus catalogue. All routes sit behind the session gate.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::domain::entities::{
    College, Event, Hostel, MessMenu, Semester, SemesterDetails, Subject, Teacher, TimetableEntry,
};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/academics/semesters`
pub async fn semesters_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Semester>>, AppError> {
    Ok(Json(state.campus_service.semesters().await?))
}

/// `GET /api/academics/subjects/{semester_id}`
pub async fn subjects_handler(
    State(state): State<AppState>,
    Path(semester_id): Path<i64>,
) -> Result<Json<Vec<Subject>>, AppError> {
    Ok(Json(state.campus_service.subjects(semester_id).await?))
}

/// Semester with its subjects.
///
/// # Endpoint
///
/// `GET /api/academics/details/{semester_id}`
///
/// # Errors
///
/// Returns 404 if the semester does not exist.
pub async fn semester_details_handler(
    State(state): State<AppState>,
    Path(semester_id): Path<i64>,
) -> Result<Json<SemesterDetails>, AppError> {
    Ok(Json(
        state.campus_service.semester_details(semester_id).await?,
    ))
}

/// `GET /api/timetable/{semester_id}`
pub async fn timetable_handler(
    State(state): State<AppState>,
    Path(semester_id): Path<i64>,
) -> Result<Json<Vec<TimetableEntry>>, AppError> {
    Ok(Json(state.campus_service.timetable(semester_id).await?))
}

/// `GET /api/faculty`
pub async fn faculty_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Teacher>>, AppError> {
    Ok(Json(state.campus_service.faculty().await?))
}

/// `GET /api/faculty/{id}`, 404 if unknown.
pub async fn faculty_member_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Teacher>, AppError> {
    Ok(Json(state.campus_service.faculty_member(id).await?))
}

/// `GET /api/events`
pub async fn events_handler(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.campus_service.events().await?))
}

/// `GET /api/mess`
pub async fn mess_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<MessMenu>>, AppError> {
    Ok(Json(state.campus_service.mess_menus().await?))
}

/// `GET /api/hostel`
pub async fn hostel_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Hostel>>, AppError> {
    Ok(Json(state.campus_service.hostels().await?))
}

/// `GET /api/college`, 404 when no college record exists.
pub async fn college_handler(State(state): State<AppState>) -> Result<Json<College>, AppError> {
    Ok(Json(state.campus_service.college().await?))
}
