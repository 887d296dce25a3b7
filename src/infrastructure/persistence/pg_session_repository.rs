//! PostgreSQL implementation of session repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewSession, Session, SessionCounts, SessionOverview};
use crate::domain::repositories::SessionRepository;
use crate::error::AppError;

/// PostgreSQL repository for bearer-token sessions.
///
/// `token_hash` carries a unique index, which makes [`SessionRepository::create`]
/// safe to race: two requests bootstrapping the same token both get the one row.
pub struct PgSessionRepository {
    pool: Arc<PgPool>,
}

impl PgSessionRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: i64,
    user_id: i64,
    token_hash: String,
    expires_at: DateTime<Utc>,
    is_active: bool,
    created_at: DateTime<Utc>,
    last_used: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(r: SessionRow) -> Self {
        Session {
            id: r.id,
            user_id: r.user_id,
            token_hash: r.token_hash,
            expires_at: r.expires_at,
            is_active: r.is_active,
            created_at: r.created_at,
            last_used: r.last_used,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OverviewRow {
    #[sqlx(flatten)]
    session: SessionRow,
    user_name: String,
    user_email: String,
}

#[derive(sqlx::FromRow)]
struct CountsRow {
    total: i64,
    active: i64,
    expired: i64,
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(&self, session: NewSession) -> Result<Session, AppError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO sessions (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (token_hash) DO UPDATE SET token_hash = EXCLUDED.token_hash
            RETURNING id, user_id, token_hash, expires_at, is_active, created_at, last_used
            "#,
        )
        .bind(session.user_id)
        .bind(&session.token_hash)
        .bind(session.expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, token_hash, expires_at, is_active, created_at, last_used
            FROM sessions
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Session::from))
    }

    async fn deactivate(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE sessions SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn touch(&self, id: i64, at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query("UPDATE sessions SET last_used = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn deactivate_by_token_hash(&self, token_hash: &str) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET is_active = FALSE
            WHERE token_hash = $1 AND is_active
            "#,
        )
        .bind(token_hash)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn deactivate_all_for_user(&self, user_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET is_active = FALSE
            WHERE user_id = $1 AND is_active
            "#,
        )
        .bind(user_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < $1")
            .bind(now)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_inactive_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE NOT is_active AND created_at < $1
            "#,
        )
        .bind(cutoff)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn list_overview(&self, active_only: bool) -> Result<Vec<SessionOverview>, AppError> {
        let rows = sqlx::query_as::<_, OverviewRow>(
            r#"
            SELECT s.id, s.user_id, s.token_hash, s.expires_at, s.is_active,
                   s.created_at, s.last_used,
                   u.name AS user_name, u.email AS user_email
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE NOT $1 OR s.is_active
            ORDER BY s.last_used DESC
            "#,
        )
        .bind(active_only)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SessionOverview {
                session: r.session.into(),
                user_name: r.user_name,
                user_email: r.user_email,
            })
            .collect())
    }

    async fn counts(&self, now: DateTime<Utc>) -> Result<SessionCounts, AppError> {
        let row = sqlx::query_as::<_, CountsRow>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE is_active) AS active,
                   COUNT(*) FILTER (WHERE expires_at < $1) AS expired
            FROM sessions
            "#,
        )
        .bind(now)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(SessionCounts {
            total: row.total,
            active: row.active,
            expired: row.expired,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
