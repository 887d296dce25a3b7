//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, the session pruner and the Axum
//! server lifecycle.

use crate::application::session_pruner::run_session_pruner;
use crate::config::Config;
use crate::domain::repositories::SessionRepository;
use crate::infrastructure::persistence::{
    PgCampusRepository, PgSessionRepository, PgUserRepository,
};
use crate::routes::app_router;
use crate::state::{AppState, AuthSettings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Opens the PostgreSQL pool with the configured limits.
///
/// # Errors
///
/// Returns an error if the database is unreachable within the connect timeout.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Applies pending migrations from `./migrations`.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Background session pruner (unless disabled)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    migrate(&pool).await?;
    tracing::info!("Migrations applied");

    let pool = Arc::new(pool);
    let sessions: Arc<dyn SessionRepository> = Arc::new(PgSessionRepository::new(pool.clone()));
    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let campus = Arc::new(PgCampusRepository::new(pool.clone()));

    let state = AppState::new(
        sessions,
        users,
        campus,
        &AuthSettings {
            jwt_secret: config.jwt_secret.clone(),
            session_ttl: config.session_ttl(),
            password_reset_ttl: config.password_reset_ttl(),
            expose_reset_token: config.expose_reset_token,
        },
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let pruner = config.prune_interval().map(|period| {
        tracing::info!(period_secs = period.as_secs(), "Session pruner started");
        tokio::spawn(run_session_pruner(
            state.auth_service.clone(),
            period,
            config.session_retention(),
            shutdown_rx,
        ))
    });

    let app = app_router(state, &config.cors_origins)?;

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    let _ = shutdown_tx.send(true);
    if let Some(handle) = pruner
        && let Err(e) = handle.await
    {
        tracing::warn!(error = %e, "Session pruner task failed");
    }

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
