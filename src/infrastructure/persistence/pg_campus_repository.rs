//! PostgreSQL implementation of the campus catalogue.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{
    College, Event, Hostel, MessMenu, Semester, Subject, Teacher, TimetableEntry,
};
use crate::domain::repositories::CampusRepository;
use crate::error::AppError;

/// PostgreSQL repository for read-only campus records.
pub struct PgCampusRepository {
    pool: Arc<PgPool>,
}

impl PgCampusRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TeacherRow {
    id: i64,
    name: String,
    email: String,
    department: String,
    designation: String,
    qualification: Option<String>,
    experience: Option<String>,
    phone: Option<String>,
    linkedin: Option<String>,
    specialization: Option<String>,
    bio: Option<String>,
    office_hours: Option<String>,
    research_areas: Option<String>,
}

impl From<TeacherRow> for Teacher {
    fn from(r: TeacherRow) -> Self {
        Teacher {
            id: r.id,
            name: r.name,
            email: r.email,
            department: r.department,
            designation: r.designation,
            qualification: r.qualification,
            experience: r.experience,
            phone: r.phone,
            linkedin: r.linkedin,
            specialization: r.specialization,
            bio: r.bio,
            office_hours: r.office_hours,
            research_areas: r.research_areas,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SemesterRow {
    id: i64,
    name: String,
    description: Option<String>,
    credits: i32,
    duration: Option<String>,
}

impl From<SemesterRow> for Semester {
    fn from(r: SemesterRow) -> Self {
        Semester {
            id: r.id,
            name: r.name,
            description: r.description,
            credits: r.credits,
            duration: r.duration,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SubjectRow {
    id: i64,
    name: String,
    code: String,
    semester_id: i64,
    teacher_id: Option<i64>,
    credits: i32,
    prerequisites: Option<String>,
    syllabus: Option<String>,
    topics: Option<String>,
    learning_outcomes: Option<String>,
    exam_details: Option<String>,
    roadmap: Option<String>,
}

impl From<SubjectRow> for Subject {
    fn from(r: SubjectRow) -> Self {
        Subject {
            id: r.id,
            name: r.name,
            code: r.code,
            semester_id: r.semester_id,
            teacher_id: r.teacher_id,
            credits: r.credits,
            prerequisites: r.prerequisites,
            syllabus: r.syllabus,
            topics: r.topics,
            learning_outcomes: r.learning_outcomes,
            exam_details: r.exam_details,
            roadmap: r.roadmap,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TimetableRow {
    id: i64,
    semester_id: i64,
    day: String,
    period: i32,
    start_time: Option<String>,
    end_time: Option<String>,
    subject_id: Option<i64>,
    room: Option<String>,
}

impl From<TimetableRow> for TimetableEntry {
    fn from(r: TimetableRow) -> Self {
        TimetableEntry {
            id: r.id,
            semester_id: r.semester_id,
            day: r.day,
            period: r.period,
            start_time: r.start_time,
            end_time: r.end_time,
            subject_id: r.subject_id,
            room: r.room,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EventRow {
    id: i64,
    title: String,
    date: NaiveDate,
    time: Option<String>,
    venue: Option<String>,
    description: Option<String>,
    organizer: Option<String>,
    category: Option<String>,
}

impl From<EventRow> for Event {
    fn from(r: EventRow) -> Self {
        Event {
            id: r.id,
            title: r.title,
            date: r.date,
            time: r.time,
            venue: r.venue,
            description: r.description,
            organizer: r.organizer,
            category: r.category,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MessMenuRow {
    id: i64,
    day: String,
    breakfast: String,
    lunch: String,
    dinner: String,
}

#[derive(sqlx::FromRow)]
struct HostelRow {
    id: i64,
    name: String,
}

#[derive(sqlx::FromRow)]
struct CollegeRow {
    id: i64,
    name: String,
    info: Option<String>,
}

const TEACHER_COLUMNS: &str = "id, name, email, department, designation, qualification, \
     experience, phone, linkedin, specialization, bio, office_hours, research_areas";

const SUBJECT_COLUMNS: &str = "id, name, code, semester_id, teacher_id, credits, prerequisites, \
     syllabus, topics, learning_outcomes, exam_details, roadmap";

#[async_trait]
impl CampusRepository for PgCampusRepository {
    async fn list_semesters(&self) -> Result<Vec<Semester>, AppError> {
        let rows = sqlx::query_as::<_, SemesterRow>(
            "SELECT id, name, description, credits, duration FROM semesters ORDER BY id",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Semester::from).collect())
    }

    async fn find_semester(&self, id: i64) -> Result<Option<Semester>, AppError> {
        let row = sqlx::query_as::<_, SemesterRow>(
            "SELECT id, name, description, credits, duration FROM semesters WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Semester::from))
    }

    async fn list_subjects(&self, semester_id: i64) -> Result<Vec<Subject>, AppError> {
        let rows = sqlx::query_as::<_, SubjectRow>(&format!(
            "SELECT {SUBJECT_COLUMNS} FROM subjects WHERE semester_id = $1 ORDER BY code"
        ))
        .bind(semester_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Subject::from).collect())
    }

    async fn list_timetable(&self, semester_id: i64) -> Result<Vec<TimetableEntry>, AppError> {
        // Weekday order, not alphabetical.
        let rows = sqlx::query_as::<_, TimetableRow>(
            r#"
            SELECT id, semester_id, day, period, start_time, end_time, subject_id, room
            FROM timetable_entries
            WHERE semester_id = $1
            ORDER BY array_position(
                         ARRAY['Monday','Tuesday','Wednesday','Thursday','Friday','Saturday','Sunday'],
                         day),
                     period
            "#,
        )
        .bind(semester_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(TimetableEntry::from).collect())
    }

    async fn list_teachers(&self) -> Result<Vec<Teacher>, AppError> {
        let rows = sqlx::query_as::<_, TeacherRow>(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers ORDER BY name"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Teacher::from).collect())
    }

    async fn find_teacher(&self, id: i64) -> Result<Option<Teacher>, AppError> {
        let row = sqlx::query_as::<_, TeacherRow>(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Teacher::from))
    }

    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, date, time, venue, description, organizer, category
            FROM events
            ORDER BY date, id
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn list_mess_menus(&self) -> Result<Vec<MessMenu>, AppError> {
        let rows = sqlx::query_as::<_, MessMenuRow>(
            "SELECT id, day, breakfast, lunch, dinner FROM mess_menus ORDER BY id",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| MessMenu {
                id: r.id,
                day: r.day,
                breakfast: r.breakfast,
                lunch: r.lunch,
                dinner: r.dinner,
            })
            .collect())
    }

    async fn list_hostels(&self) -> Result<Vec<Hostel>, AppError> {
        let rows = sqlx::query_as::<_, HostelRow>("SELECT id, name FROM hostels ORDER BY id")
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| Hostel {
                id: r.id,
                name: r.name,
            })
            .collect())
    }

    async fn find_college(&self) -> Result<Option<College>, AppError> {
        let row =
            sqlx::query_as::<_, CollegeRow>("SELECT id, name, info FROM colleges ORDER BY id LIMIT 1")
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(row.map(|r| College {
            id: r.id,
            name: r.name,
            info: r.info,
        }))
    }
}
