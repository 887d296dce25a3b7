//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`        - Health check (public)
//! - `/api/auth/*`         - Account endpoints; `me`, `profile`, `logout-all` gated
//! - `/api/*`              - Campus catalogue (session required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Configured origin allow-list
//! - **Rate limiting** - Per-IP token bucket, stricter on public account routes
//! - **Session gate** - Bearer token resolved through the session store
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use anyhow::Context;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

fn routes(state: AppState, rate_limited: bool) -> Router {
    let mut public = api::routes::public_routes();
    let mut protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    if rate_limited {
        public = public.layer(rate_limit::auth_layer());
        protected = protected.layer(rate_limit::layer());
    }

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", public.merge(protected))
        .with_state(state)
        .layer(tracing::layer())
}

/// Routes with the session gate and tracing, without rate limiting, CORS or
/// path normalization.
///
/// Rate limiting keys on the peer address; this router serves callers that
/// do not attach `ConnectInfo`.
pub fn api_router(state: AppState) -> Router {
    routes(state, false)
}

/// Constructs the production router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `cors_origins` - origins allowed to call the API from a browser
///
/// # Errors
///
/// Returns an error if an origin is not a valid header value.
pub fn app_router(
    state: AppState,
    cors_origins: &[String],
) -> anyhow::Result<NormalizePath<Router>> {
    let origins = cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin '{origin}'"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    let router = routes(state, true).layer(cors);

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
