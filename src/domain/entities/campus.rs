//! Read-only campus catalogue records.
//!
//! These are served as-is to authenticated clients, so they derive
//! `Serialize` directly.

use chrono::NaiveDate;
use serde::Serialize;

/// A faculty member. Contact credentials are not part of this record.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub department: String,
    pub designation: String,
    pub qualification: Option<String>,
    pub experience: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub specialization: Option<String>,
    pub bio: Option<String>,
    pub office_hours: Option<String>,
    pub research_areas: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub credits: i32,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub semester_id: i64,
    pub teacher_id: Option<i64>,
    pub credits: i32,
    pub prerequisites: Option<String>,
    pub syllabus: Option<String>,
    pub topics: Option<String>,
    pub learning_outcomes: Option<String>,
    pub exam_details: Option<String>,
    pub roadmap: Option<String>,
}

/// A semester together with its subjects.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SemesterDetails {
    #[serde(flatten)]
    pub semester: Semester,
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    pub id: i64,
    pub semester_id: i64,
    pub day: String,
    pub period: i32,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub subject_id: Option<i64>,
    pub room: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub venue: Option<String>,
    pub description: Option<String>,
    pub organizer: Option<String>,
    pub category: Option<String>,
}

/// Daily mess menu.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MessMenu {
    pub id: i64,
    pub day: String,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Hostel {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct College {
    pub id: i64,
    pub name: String,
    pub info: Option<String>,
}
