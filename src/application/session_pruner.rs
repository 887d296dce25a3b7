//! Scheduled removal of expired and stale sessions.
//!
//! Expiry is enforced lazily by the authentication gate, so expired rows stay
//! in the table until something deletes them. This worker bounds table growth
//! by running both [`AuthService`] prune passes on a fixed interval.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};

use crate::application::services::AuthService;
use crate::domain::repositories::{SessionRepository, UserRepository};
use crate::error::AppError;
use crate::state::SharedAuthService;

/// Rows removed by one prune pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub expired: u64,
    pub stale_inactive: u64,
}

impl PruneReport {
    pub fn total(&self) -> u64 {
        self.expired + self.stale_inactive
    }
}

/// Deletes sessions past expiry, then inactive sessions created more than
/// `retention` before `now`.
///
/// # Errors
///
/// Returns the first repository error; a failed first pass skips the second.
pub async fn prune_sessions<S, U>(
    auth: &AuthService<S, U>,
    now: DateTime<Utc>,
    retention: Duration,
) -> Result<PruneReport, AppError>
where
    S: SessionRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    let expired = auth.prune_expired_sessions(now).await?;
    let stale_inactive = auth.prune_stale_inactive_sessions(now - retention).await?;

    Ok(PruneReport {
        expired,
        stale_inactive,
    })
}

/// Runs [`prune_sessions`] every `period` until `shutdown` flips to `true`.
///
/// The first pass runs immediately. Failures are logged and retried on the
/// next tick.
pub async fn run_session_pruner(
    auth: Arc<SharedAuthService>,
    period: StdDuration,
    retention: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match prune_sessions(auth.as_ref(), Utc::now(), retention).await {
                    Ok(report) if report.total() > 0 => tracing::info!(
                        expired = report.expired,
                        stale_inactive = report.stale_inactive,
                        "Pruned sessions"
                    ),
                    Ok(_) => tracing::debug!("Session prune found nothing to delete"),
                    Err(e) => tracing::warn!(error = %e, "Session prune failed"),
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    tracing::info!("Session pruner stopped");
                    break;
                }
            }
        }
    }
}
