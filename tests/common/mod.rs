#![allow(dead_code)]

//! In-memory repositories and state builders shared by the integration tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use campus_portal::domain::entities::{
    College, Event, Hostel, MessMenu, NewSession, NewUser, ProfileUpdate, Semester, Session,
    SessionCounts, SessionOverview, Subject, Teacher, TimetableEntry, User,
};
use campus_portal::domain::repositories::{CampusRepository, SessionRepository, UserRepository};
use campus_portal::error::AppError;
use campus_portal::state::{AppState, AuthSettings};
use campus_portal::utils::password::hash_password;

pub const TEST_SECRET: &str = "test-signing-secret-0123";
pub const TEST_PASSWORD: &str = "secret123";

fn unavailable() -> AppError {
    AppError::internal("Database error", json!({ "kind": "unavailable" }))
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    /// Inserts a user with [`TEST_PASSWORD`] directly, bypassing registration.
    pub fn seed(&self, name: &str, email: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            name: name.to_string(),
            roll_number: None,
            branch: None,
            semester: None,
            section: None,
            skills: vec![],
            achievements: vec![],
            profile_image: None,
            reset_token_hash: None,
            reset_token_expires_at: None,
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    pub fn remove(&self, id: i64) {
        self.users.lock().unwrap().retain(|u| u.id != id);
    }

    pub fn get(&self, id: i64) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::conflict(
                "User already exists with this email",
                json!({ "email": user.email }),
            ));
        }

        let now = Utc::now();
        let created = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            roll_number: None,
            branch: None,
            semester: None,
            section: None,
            skills: vec![],
            achievements: vec![],
            profile_image: None,
            reset_token_hash: None,
            reset_token_expires_at: None,
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn update_profile(&self, id: i64, update: ProfileUpdate) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": id })))?;

        update.apply_to(user);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_reset_token(
        &self,
        id: i64,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.reset_token_hash = Some(token_hash.to_string());
            user.reset_token_expires_at = Some(expires_at);
        }
        Ok(())
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| {
                u.reset_token_hash.as_deref() == Some(token_hash) && u.has_valid_reset_token(now)
            })
            .cloned())
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.password_hash = password_hash.to_string();
            user.reset_token_hash = None;
            user.reset_token_expires_at = None;
        }
        Ok(())
    }
}

// ─── Sessions ────────────────────────────────────────────────────────────────

pub struct InMemorySessionRepository {
    sessions: Mutex<Vec<Session>>,
    next_id: AtomicI64,
    users: Arc<InMemoryUserRepository>,
    unavailable: AtomicBool,
    fail_touch: AtomicBool,
}

impl InMemorySessionRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            sessions: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(0),
            users,
            unavailable: AtomicBool::new(false),
            fail_touch: AtomicBool::new(false),
        }
    }

    /// Makes every call fail as if the database were down.
    pub fn set_unavailable(&self, value: bool) {
        self.unavailable.store(value, Ordering::SeqCst);
    }

    /// Makes only `touch` fail.
    pub fn set_fail_touch(&self, value: bool) {
        self.fail_touch.store(value, Ordering::SeqCst);
    }

    pub fn all(&self) -> Vec<Session> {
        self.sessions.lock().unwrap().clone()
    }

    pub fn get(&self, id: i64) -> Option<Session> {
        self.all().into_iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// Inserts a row with explicit timestamps.
    pub fn insert(&self, session: Session) {
        self.next_id.fetch_max(session.id, Ordering::SeqCst);
        self.sessions.lock().unwrap().push(session);
    }

    fn check(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }

    fn update<F: Fn(&mut Session) -> bool>(&self, f: F) -> u64 {
        self.sessions
            .lock()
            .unwrap()
            .iter_mut()
            .map(|s| f(s))
            .filter(|changed| *changed)
            .count() as u64
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: NewSession) -> Result<Session, AppError> {
        self.check()?;
        let mut sessions = self.sessions.lock().unwrap();

        if let Some(existing) = sessions.iter().find(|s| s.token_hash == session.token_hash) {
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let created = Session {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id: session.user_id,
            token_hash: session.token_hash,
            expires_at: session.expires_at,
            is_active: true,
            created_at: now,
            last_used: now,
        };
        sessions.push(created.clone());
        Ok(created)
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AppError> {
        self.check()?;
        Ok(self.all().into_iter().find(|s| s.token_hash == token_hash))
    }

    async fn deactivate(&self, id: i64) -> Result<(), AppError> {
        self.check()?;
        self.update(|s| {
            if s.id == id {
                s.is_active = false;
            }
            false
        });
        Ok(())
    }

    async fn touch(&self, id: i64, at: DateTime<Utc>) -> Result<(), AppError> {
        self.check()?;
        if self.fail_touch.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.update(|s| {
            if s.id == id {
                s.last_used = at;
            }
            false
        });
        Ok(())
    }

    async fn deactivate_by_token_hash(&self, token_hash: &str) -> Result<u64, AppError> {
        self.check()?;
        Ok(self.update(|s| {
            let hit = s.token_hash == token_hash && s.is_active;
            if hit {
                s.is_active = false;
            }
            hit
        }))
    }

    async fn deactivate_all_for_user(&self, user_id: i64) -> Result<u64, AppError> {
        self.check()?;
        Ok(self.update(|s| {
            let hit = s.user_id == user_id && s.is_active;
            if hit {
                s.is_active = false;
            }
            hit
        }))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        self.check()?;
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.expires_at >= now);
        Ok((before - sessions.len()) as u64)
    }

    async fn delete_inactive_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        self.check()?;
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.is_active || s.created_at >= cutoff);
        Ok((before - sessions.len()) as u64)
    }

    async fn list_overview(&self, active_only: bool) -> Result<Vec<SessionOverview>, AppError> {
        self.check()?;
        let mut rows: Vec<SessionOverview> = self
            .all()
            .into_iter()
            .filter(|s| !active_only || s.is_active)
            .filter_map(|session| {
                let owner = self.users.get(session.user_id)?;
                Some(SessionOverview {
                    session,
                    user_name: owner.name,
                    user_email: owner.email,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.session.last_used.cmp(&a.session.last_used));
        Ok(rows)
    }

    async fn counts(&self, now: DateTime<Utc>) -> Result<SessionCounts, AppError> {
        self.check()?;
        let sessions = self.all();
        Ok(SessionCounts {
            total: sessions.len() as i64,
            active: sessions.iter().filter(|s| s.is_active).count() as i64,
            expired: sessions.iter().filter(|s| s.is_expired_at(now)).count() as i64,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check()
    }
}

// ─── Campus ──────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryCampusRepository {
    pub semesters: Vec<Semester>,
    pub subjects: Vec<Subject>,
    pub timetable: Vec<TimetableEntry>,
    pub teachers: Vec<Teacher>,
    pub events: Vec<Event>,
    pub mess_menus: Vec<MessMenu>,
    pub hostels: Vec<Hostel>,
    pub college: Option<College>,
}

impl InMemoryCampusRepository {
    /// A small catalogue: one semester with two subjects and one teacher.
    pub fn seeded() -> Self {
        Self {
            semesters: vec![Semester {
                id: 1,
                name: "Semester 1".to_string(),
                description: Some("Foundations".to_string()),
                credits: 22,
                duration: Some("6 months".to_string()),
            }],
            subjects: vec![
                subject(10, "Engineering Mathematics I", "MA101"),
                subject(11, "Programming in C", "CS101"),
            ],
            timetable: vec![TimetableEntry {
                id: 1,
                semester_id: 1,
                day: "Monday".to_string(),
                period: 1,
                start_time: Some("09:00".to_string()),
                end_time: Some("09:50".to_string()),
                subject_id: Some(10),
                room: Some("A-101".to_string()),
            }],
            teachers: vec![Teacher {
                id: 5,
                name: "Dr. Meera Rao".to_string(),
                email: "meera@college.edu".to_string(),
                department: "Computer Science".to_string(),
                designation: "Professor".to_string(),
                qualification: Some("PhD".to_string()),
                experience: None,
                phone: None,
                linkedin: None,
                specialization: Some("Compilers".to_string()),
                bio: None,
                office_hours: None,
                research_areas: None,
            }],
            events: vec![Event {
                id: 1,
                title: "Tech Fest".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
                time: Some("10:00".to_string()),
                venue: Some("Main Auditorium".to_string()),
                description: None,
                organizer: None,
                category: Some("Technical".to_string()),
            }],
            mess_menus: vec![MessMenu {
                id: 1,
                day: "Monday".to_string(),
                breakfast: "Poha".to_string(),
                lunch: "Rice, Dal".to_string(),
                dinner: "Roti, Paneer".to_string(),
            }],
            hostels: vec![Hostel {
                id: 1,
                name: "Boys Hostel A".to_string(),
            }],
            college: Some(College {
                id: 1,
                name: "Government Engineering College".to_string(),
                info: None,
            }),
        }
    }
}

fn subject(id: i64, name: &str, code: &str) -> Subject {
    Subject {
        id,
        name: name.to_string(),
        code: code.to_string(),
        semester_id: 1,
        teacher_id: Some(5),
        credits: 4,
        prerequisites: None,
        syllabus: None,
        topics: None,
        learning_outcomes: None,
        exam_details: None,
        roadmap: None,
    }
}

#[async_trait]
impl CampusRepository for InMemoryCampusRepository {
    async fn list_semesters(&self) -> Result<Vec<Semester>, AppError> {
        Ok(self.semesters.clone())
    }

    async fn find_semester(&self, id: i64) -> Result<Option<Semester>, AppError> {
        Ok(self.semesters.iter().find(|s| s.id == id).cloned())
    }

    async fn list_subjects(&self, semester_id: i64) -> Result<Vec<Subject>, AppError> {
        Ok(self
            .subjects
            .iter()
            .filter(|s| s.semester_id == semester_id)
            .cloned()
            .collect())
    }

    async fn list_timetable(&self, semester_id: i64) -> Result<Vec<TimetableEntry>, AppError> {
        Ok(self
            .timetable
            .iter()
            .filter(|t| t.semester_id == semester_id)
            .cloned()
            .collect())
    }

    async fn list_teachers(&self) -> Result<Vec<Teacher>, AppError> {
        Ok(self.teachers.clone())
    }

    async fn find_teacher(&self, id: i64) -> Result<Option<Teacher>, AppError> {
        Ok(self.teachers.iter().find(|t| t.id == id).cloned())
    }

    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        Ok(self.events.clone())
    }

    async fn list_mess_menus(&self) -> Result<Vec<MessMenu>, AppError> {
        Ok(self.mess_menus.clone())
    }

    async fn list_hostels(&self) -> Result<Vec<Hostel>, AppError> {
        Ok(self.hostels.clone())
    }

    async fn find_college(&self) -> Result<Option<College>, AppError> {
        Ok(self.college.clone())
    }
}

// ─── State ───────────────────────────────────────────────────────────────────

/// Application state plus handles on the repositories behind it.
pub struct TestContext {
    pub state: AppState,
    pub users: Arc<InMemoryUserRepository>,
    pub sessions: Arc<InMemorySessionRepository>,
}

pub fn test_settings() -> AuthSettings {
    AuthSettings {
        jwt_secret: TEST_SECRET.to_string(),
        session_ttl: Duration::days(7),
        password_reset_ttl: Duration::hours(1),
        expose_reset_token: true,
    }
}

pub fn create_test_state() -> TestContext {
    create_test_state_with_campus(InMemoryCampusRepository::seeded())
}

pub fn create_test_state_with_campus(campus: InMemoryCampusRepository) -> TestContext {
    let users = Arc::new(InMemoryUserRepository::default());
    let sessions = Arc::new(InMemorySessionRepository::new(users.clone()));

    let state = AppState::new(
        sessions.clone(),
        users.clone(),
        Arc::new(campus),
        &test_settings(),
    );

    TestContext {
        state,
        users,
        sessions,
    }
}

// ─── PostgreSQL fixtures ─────────────────────────────────────────────────────

pub async fn insert_user(pool: &sqlx::PgPool, name: &str, email: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, 'x') RETURNING id",
    )
    .bind(name)
    .bind(email)
    .fetch_one(pool)
    .await
    .unwrap()
}
