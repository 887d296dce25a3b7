//! Session gate middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::{
    error::{AppError, AuthError},
    state::AppState,
};

/// Authenticates requests using the session bound to their bearer token.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract token from `Authorization` header
/// 2. Resolve it through [`crate::application::services::AuthService::authenticate`]
/// 3. Insert the resulting
///    [`AuthenticatedUser`](crate::application::services::AuthenticatedUser)
///    into request extensions
/// 4. Continue to next middleware/handler
///
/// # Errors
///
/// - `401` missing token, unknown user, inactive or expired session
/// - `403` token signature does not verify
/// - `503` session store unreachable
///
/// 401 responses carry `WWW-Authenticate: Bearer` per RFC 6750.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/api/auth/me", get(me_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| AuthError::MissingToken)?;

    let authenticated = st.auth_service.authenticate(&token).await?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(authenticated);

    Ok(next.run(req).await)
}
