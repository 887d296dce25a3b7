//! CLI administration tool for campus-portal.
//!
//! Inspects and maintains login sessions and the database without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List sessions (only active ones with --active)
//! cargo run --bin admin -- sessions list --active
//!
//! # Session counts
//! cargo run --bin admin -- sessions stats
//!
//! # Delete expired sessions and inactive sessions older than 30 days
//! cargo run --bin admin -- sessions prune --retention-days 30
//!
//! # Sign a user out everywhere
//! cargo run --bin admin -- sessions revoke-user student@college.edu
//!
//! # Database
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`, or `DB_HOST` / `DB_PORT` / `DB_USER` / `DB_PASSWORD` / `DB_NAME`
//! - `JWT_SECRET` (session commands only)

use campus_portal::application::services::AuthService;
use campus_portal::application::session_pruner::prune_sessions;
use campus_portal::config::{Config, mask_connection_string};
use campus_portal::domain::repositories::{SessionRepository, UserRepository};
use campus_portal::infrastructure::persistence::{PgSessionRepository, PgUserRepository};
use campus_portal::server;
use campus_portal::state::SharedAuthService;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing campus-portal.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect and maintain login sessions
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// List sessions with their owners, most recently used first
    List {
        /// Only show active sessions
        #[arg(long)]
        active: bool,
    },

    /// Show session counts
    Stats,

    /// Delete expired sessions and old inactive ones
    Prune {
        /// Inactive sessions created more than this many days ago are deleted
        #[arg(long, default_value_t = 30)]
        retention_days: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Revoke every active session of a user
    RevokeUser {
        /// Email of the user
        email: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;
    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    match cli.command {
        Commands::Sessions { action } => {
            let config = Config::from_env()?;
            handle_session_action(action, &pool, &config).await?
        }
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches session commands through the same [`AuthService`] the server uses.
async fn handle_session_action(
    action: SessionAction,
    pool: &PgPool,
    config: &Config,
) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let sessions: Arc<dyn SessionRepository> = Arc::new(PgSessionRepository::new(pool.clone()));
    let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool));
    let auth = AuthService::new(
        sessions,
        users.clone(),
        &config.jwt_secret,
        config.session_ttl(),
    );

    match action {
        SessionAction::List { active } => list_sessions(&auth, active).await?,
        SessionAction::Stats => show_stats(&auth).await?,
        SessionAction::Prune {
            retention_days,
            yes,
        } => prune(&auth, retention_days, yes).await?,
        SessionAction::RevokeUser { email, yes } => {
            revoke_user(&auth, users.as_ref(), &email, yes).await?;
        }
    }

    Ok(())
}

/// Prints a session table.
///
/// ```text
/// 🔐 Sessions
///
///   ID    User                      Created            Last used          Expires            Status
///   ───────────────────────────────────────────────────────────────────────────────────────────────
///   12    Asha <a@college.edu>      2025-06-01 10:30   2025-06-03 08:12   2025-06-08 10:30   ACTIVE
/// ```
async fn list_sessions(auth: &SharedAuthService, active_only: bool) -> Result<()> {
    println!("{}", "🔐 Sessions".bright_blue().bold());
    println!();

    let sessions = auth
        .list_sessions(active_only)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list sessions: {}", e))?;

    if sessions.is_empty() {
        println!("{}", "  No sessions found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<40} {:<18} {:<18} {:<18} {}",
        "ID".bright_white().bold(),
        "User".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Expires".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(110).bright_black());

    let now = Utc::now();
    for row in &sessions {
        let session = &row.session;
        let status = if !session.is_active {
            "INACTIVE".bright_black()
        } else if session.is_expired_at(now) {
            "EXPIRED".yellow()
        } else {
            "ACTIVE".green()
        };

        let owner = format!("{} <{}>", row.user_name, row.user_email);

        println!(
            "  {:<5} {:<40} {:<18} {:<18} {:<18} {}",
            session.id.to_string().bright_black(),
            owner.cyan(),
            session.created_at.format("%Y-%m-%d %H:%M").to_string(),
            session.last_used.format("%Y-%m-%d %H:%M").to_string(),
            session.expires_at.format("%Y-%m-%d %H:%M").to_string(),
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        sessions.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Displays session counts.
async fn show_stats(auth: &SharedAuthService) -> Result<()> {
    println!("{}", "📊 Session statistics".bright_blue().bold());
    println!();

    let counts = auth
        .session_stats(Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count sessions: {}", e))?;

    println!(
        "  Total:    {}",
        counts.total.to_string().bright_white().bold()
    );
    println!("  Active:   {}", counts.active.to_string().green().bold());
    println!(
        "  Inactive: {}",
        counts.inactive().to_string().bright_black().bold()
    );
    println!("  Expired:  {}", counts.expired.to_string().yellow().bold());
    println!();

    Ok(())
}

/// Runs both prune passes after confirmation (default: No).
async fn prune(auth: &SharedAuthService, retention_days: i64, skip_confirm: bool) -> Result<()> {
    if retention_days < 1 {
        anyhow::bail!("--retention-days must be at least 1");
    }

    println!("{}", "🧹 Prune sessions".bright_blue().bold());
    println!();
    println!("  Deletes expired sessions, and inactive sessions created more than");
    println!(
        "  {} days ago.",
        retention_days.to_string().bright_white().bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete these sessions?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let report = prune_sessions(auth, Utc::now(), Duration::days(retention_days))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prune sessions: {}", e))?;

    println!();
    println!(
        "{} {} expired, {} stale inactive",
        "✅ Deleted".green().bold(),
        report.expired.to_string().bright_white().bold(),
        report.stale_inactive.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Deactivates all sessions of the user with `email`.
async fn revoke_user(
    auth: &SharedAuthService,
    users: &dyn UserRepository,
    email: &str,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔒 Revoke user sessions".bright_blue().bold());
    println!();

    let user = users
        .find_by_email(email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("User not found")?;

    println!("  User: {} <{}>", user.name.cyan(), user.email.cyan());
    println!("  ID:   {}", user.id.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Revoke all sessions of this user?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let count = auth
        .revoke_all_sessions(user.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke sessions: {}", e))?;

    println!();
    println!(
        "{} {} session(s) revoked",
        "✅".green(),
        count.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
        DbAction::Migrate => {
            println!("{}", "📦 Applying migrations...".bright_blue());

            server::migrate(pool).await?;

            println!("{}", "✅ Migrations up to date".green().bold());
        }
    }

    Ok(())
}
