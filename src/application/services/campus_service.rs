//! Read-only campus catalogue service.

use crate::domain::entities::{
    College, Event, Hostel, MessMenu, Semester, SemesterDetails, Subject, Teacher, TimetableEntry,
};
use crate::domain::repositories::CampusRepository;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;

/// Service exposing academic and campus-life records to signed-in users.
pub struct CampusService<R: CampusRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: CampusRepository + ?Sized> CampusService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn semesters(&self) -> Result<Vec<Semester>, AppError> {
        self.repository.list_semesters().await
    }

    pub async fn subjects(&self, semester_id: i64) -> Result<Vec<Subject>, AppError> {
        self.repository.list_subjects(semester_id).await
    }

    /// A semester with its subjects.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the semester does not exist.
    pub async fn semester_details(&self, semester_id: i64) -> Result<SemesterDetails, AppError> {
        let semester = self
            .repository
            .find_semester(semester_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Semester not found", json!({ "semester_id": semester_id }))
            })?;

        let subjects = self.repository.list_subjects(semester_id).await?;

        Ok(SemesterDetails { semester, subjects })
    }

    pub async fn timetable(&self, semester_id: i64) -> Result<Vec<TimetableEntry>, AppError> {
        self.repository.list_timetable(semester_id).await
    }

    pub async fn faculty(&self) -> Result<Vec<Teacher>, AppError> {
        self.repository.list_teachers().await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no teacher has this ID.
    pub async fn faculty_member(&self, id: i64) -> Result<Teacher, AppError> {
        self.repository
            .find_teacher(id)
            .await?
            .ok_or_else(|| AppError::not_found("Faculty member not found", json!({ "id": id })))
    }

    pub async fn events(&self) -> Result<Vec<Event>, AppError> {
        self.repository.list_events().await
    }

    pub async fn mess_menus(&self) -> Result<Vec<MessMenu>, AppError> {
        self.repository.list_mess_menus().await
    }

    pub async fn hostels(&self) -> Result<Vec<Hostel>, AppError> {
        self.repository.list_hostels().await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when no college record exists.
    pub async fn college(&self) -> Result<College, AppError> {
        self.repository
            .find_college()
            .await?
            .ok_or_else(|| AppError::not_found("College information not found", json!({})))
    }
}
