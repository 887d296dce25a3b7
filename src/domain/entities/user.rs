//! User entity representing a registered portal account.

use chrono::{DateTime, Utc};

/// A registered user.
///
/// `password_hash` and the reset-token fields never leave the server; API
/// responses are built from the public projection in the DTO layer.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub roll_number: Option<String>,
    pub branch: Option<String>,
    pub semester: Option<i32>,
    pub section: Option<String>,
    pub skills: Vec<String>,
    pub achievements: Vec<String>,
    pub profile_image: Option<String>,
    pub reset_token_hash: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Returns true if a password reset token is pending and valid at `now`.
    pub fn has_valid_reset_token(&self, now: DateTime<Utc>) -> bool {
        self.reset_token_hash.is_some() && self.reset_token_expires_at.is_some_and(|e| now <= e)
    }
}

/// Input data for registering a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

/// Partial update of a user's profile.
///
/// `None` fields are left unchanged. `profile_image: Some(None)` clears the
/// image; `Some(Some(url))` sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub roll_number: Option<String>,
    pub branch: Option<String>,
    pub semester: Option<i32>,
    pub section: Option<String>,
    pub skills: Option<Vec<String>>,
    pub achievements: Option<Vec<String>>,
    pub profile_image: Option<Option<String>>,
}

impl ProfileUpdate {
    /// Returns true when no field would change.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the present fields to `user` in place.
    ///
    /// Used by storage backends that cannot express the update declaratively.
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(roll_number) = self.roll_number {
            user.roll_number = Some(roll_number);
        }
        if let Some(branch) = self.branch {
            user.branch = Some(branch);
        }
        if let Some(semester) = self.semester {
            user.semester = Some(semester);
        }
        if let Some(section) = self.section {
            user.section = Some(section);
        }
        if let Some(skills) = self.skills {
            user.skills = skills;
        }
        if let Some(achievements) = self.achievements {
            user.achievements = achievements;
        }
        if let Some(profile_image) = self.profile_image {
            user.profile_image = profile_image;
        }
    }
}
