//! Repository trait for the read-only campus catalogue.

use crate::domain::entities::{
    College, Event, Hostel, MessMenu, Semester, Subject, Teacher, TimetableEntry,
};
use crate::error::AppError;
use async_trait::async_trait;

/// Read-only access to academic and campus-life records.
///
/// All methods return [`AppError::Internal`] on database errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampusRepository: Send + Sync {
    async fn list_semesters(&self) -> Result<Vec<Semester>, AppError>;

    async fn find_semester(&self, id: i64) -> Result<Option<Semester>, AppError>;

    /// Subjects of one semester, ordered by code.
    async fn list_subjects(&self, semester_id: i64) -> Result<Vec<Subject>, AppError>;

    /// Timetable of one semester, ordered by day then period.
    async fn list_timetable(&self, semester_id: i64) -> Result<Vec<TimetableEntry>, AppError>;

    async fn list_teachers(&self) -> Result<Vec<Teacher>, AppError>;

    async fn find_teacher(&self, id: i64) -> Result<Option<Teacher>, AppError>;

    /// Events ordered by date.
    async fn list_events(&self) -> Result<Vec<Event>, AppError>;

    async fn list_mess_menus(&self) -> Result<Vec<MessMenu>, AppError>;

    async fn list_hostels(&self) -> Result<Vec<Hostel>, AppError>;

    /// The first college record, if any.
    async fn find_college(&self) -> Result<Option<College>, AppError>;
}
