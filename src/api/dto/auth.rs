//! DTOs for account and session endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::User;

/// Request body for `POST /api/auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// Minimal identity returned alongside a fresh token.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Response for register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}

/// Public projection of a user. Never carries password or reset state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub roll_number: Option<String>,
    pub branch: Option<String>,
    pub semester: Option<i32>,
    pub section: Option<String>,
    pub skills: Vec<String>,
    pub achievements: Vec<String>,
    pub profile_image: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            roll_number: user.roll_number,
            branch: user.branch,
            semester: user.semester,
            section: user.section,
            skills: user.skills,
            achievements: user.achievements,
            profile_image: user.profile_image,
        }
    }
}

/// `{ "user": ... }` wrapper, optionally with a message.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response for `POST /api/auth/forgot-password`.
///
/// `reset_token` is only present when the server runs with
/// `EXPOSE_RESET_TOKEN` enabled.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let valid = RegisterRequest {
            name: "Asha".to_string(),
            email: "a@x.com".to_string(),
            password: "pw123456".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_password = RegisterRequest {
            password: "12345".to_string(),
            ..valid
        };
        let errors = short_password.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_register_rejects_bad_email_and_empty_name() {
        let request = RegisterRequest {
            name: String::new(),
            email: "not-an-email".to_string(),
            password: "pw123456".to_string(),
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_reset_request_uses_camel_case() {
        let request: ResetPasswordRequest =
            serde_json::from_str(r#"{"token":"abc","newPassword":"secret1"}"#).unwrap();

        assert_eq!(request.new_password, "secret1");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_forgot_response_omits_token_by_default() {
        let response = ForgotPasswordResponse {
            message: "sent".to_string(),
            reset_token: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("resetToken").is_none());
    }
}
