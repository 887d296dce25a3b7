//! Handlers for account and session endpoints.

use axum::{
    Extension, Json,
    extract::{FromRequestParts, Request, State},
    http::StatusCode,
};
use axum_auth::AuthBearer;
use serde_json::json;
use validator::Validate;

use crate::api::dto::auth::{
    AuthResponse, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, MessageResponse,
    RegisterRequest, ResetPasswordRequest, UserResponse, UserSummary,
};
use crate::api::dto::profile::UpdateProfileRequest;
use crate::application::services::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Registers an account and returns a session token.
///
/// # Endpoint
///
/// `POST /api/auth/register`
///
/// # Errors
///
/// Returns 400 if validation fails.
/// Returns 409 if the email is already registered.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    payload.validate()?;

    let (user, issued) = state
        .account_service
        .register(payload.name, payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            token: issued.token,
            user: UserSummary::from(&user),
        }),
    ))
}

/// Exchanges credentials for a session token.
///
/// # Endpoint
///
/// `POST /api/auth/login`
///
/// # Errors
///
/// Returns 400 for malformed input and for wrong credentials alike.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let (user, issued) = state
        .account_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token: issued.token,
        user: UserSummary::from(&user),
    }))
}

/// Revokes the session of the presented bearer token.
///
/// Not behind the session gate: an expired or already revoked token can
/// still be logged out.
///
/// # Endpoint
///
/// `POST /api/auth/logout`
///
/// # Errors
///
/// Returns 400 if no bearer token is present.
pub async fn logout_handler(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<MessageResponse>, AppError> {
    let (mut parts, _) = req.into_parts();
    let token = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|AuthBearer(token)| token)
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("No token provided", json!({})))?;

    state.auth_service.revoke_session(&token).await?;

    Ok(Json(MessageResponse::new("Logout successful")))
}

/// Revokes every session of the caller, including the current one.
///
/// # Endpoint
///
/// `POST /api/auth/logout-all`
pub async fn logout_all_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .auth_service
        .revoke_all_sessions(auth.user.id)
        .await?;

    Ok(Json(MessageResponse::new(
        "Logged out from all devices successfully",
    )))
}

/// Returns the caller's profile.
///
/// # Endpoint
///
/// `GET /api/auth/me`
pub async fn me_handler(Extension(auth): Extension<AuthenticatedUser>) -> Json<UserResponse> {
    Json(UserResponse {
        message: None,
        user: auth.user.into(),
    })
}

/// Partially updates the caller's profile.
///
/// # Endpoint
///
/// `PUT /api/auth/profile`
///
/// # Errors
///
/// Returns 400 if validation fails.
/// Returns 409 if the new email belongs to another user.
pub async fn update_profile_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    let user = state
        .account_service
        .update_profile(auth.user.id, payload.into())
        .await?;

    Ok(Json(UserResponse {
        message: Some("Profile updated successfully".to_string()),
        user: user.into(),
    }))
}

/// Starts a password reset.
///
/// # Endpoint
///
/// `POST /api/auth/forgot-password`
///
/// # Errors
///
/// Returns 404 if no account uses the email.
pub async fn forgot_password_handler(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AppError> {
    payload.validate()?;

    let reset = state
        .account_service
        .request_password_reset(&payload.email)
        .await?;

    Ok(Json(ForgotPasswordResponse {
        message: "Password reset link sent to your email".to_string(),
        reset_token: state.expose_reset_token.then_some(reset.token),
    }))
}

/// Completes a password reset and revokes all sessions of the account.
///
/// # Endpoint
///
/// `POST /api/auth/reset-password`
///
/// # Errors
///
/// Returns 400 if the token is invalid or expired.
pub async fn reset_password_handler(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    state
        .account_service
        .reset_password(&payload.token, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password reset successful")))
}
