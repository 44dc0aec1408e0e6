//! Anonymous sessions. A session id is the only key that scopes stored resumes.
//!
//! Ids are 32 random bytes, hex-encoded. Sessions idle longer than the
//! configured age are deactivated by a background task, never deleted.

pub mod handlers;
pub mod middleware;

use std::time::Duration;

use chrono::Utc;
use rand::RngCore;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::resume::SessionRow;

pub const SESSION_HEADER: &str = "x-session-id";

const SESSION_ID_BYTES: usize = 32;
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// The caller's session, placed in request extensions by [`middleware::require_session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn generate_session_id() -> String {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Cheap shape check done before any database lookup.
pub fn is_well_formed(session_id: &str) -> bool {
    session_id.len() == SESSION_ID_BYTES * 2
        && session_id.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

pub async fn create_session(pool: &PgPool) -> Result<String, AppError> {
    let session_id = generate_session_id();
    sqlx::query("INSERT INTO sessions (session_id) VALUES ($1)")
        .bind(&session_id)
        .execute(pool)
        .await?;

    info!("Created session {}…", &session_id[..8]);
    Ok(session_id)
}

/// True for an active session. A successful check counts as activity.
pub async fn validate_session(pool: &PgPool, session_id: &str) -> Result<bool, AppError> {
    if !is_well_formed(session_id) {
        return Ok(false);
    }

    let touched: Option<String> = sqlx::query_scalar(
        r#"
        UPDATE sessions
        SET last_activity = NOW()
        WHERE session_id = $1 AND is_active
        RETURNING session_id
        "#,
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?;

    Ok(touched.is_some())
}

pub async fn get_session_info(pool: &PgPool, session_id: &str) -> Result<Option<SessionRow>, AppError> {
    Ok(sqlx::query_as::<_, SessionRow>(
        "SELECT session_id, created_at, last_activity, is_active FROM sessions WHERE session_id = $1",
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?)
}

/// Deactivates sessions idle for more than `max_age_days`. Returns how many.
pub async fn cleanup_old_sessions(pool: &PgPool, max_age_days: i64) -> Result<u64, AppError> {
    let cutoff = Utc::now() - chrono::Duration::days(max_age_days);
    let result = sqlx::query(
        "UPDATE sessions SET is_active = FALSE WHERE is_active AND last_activity < $1",
    )
    .bind(cutoff)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Runs [`cleanup_old_sessions`] every hour for the life of the process.
pub fn spawn_cleanup_task(pool: PgPool, max_age_days: i64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            ticker.tick().await;
            match cleanup_old_sessions(&pool, max_age_days).await {
                Ok(0) => {}
                Ok(n) => info!("Deactivated {n} sessions idle for more than {max_age_days} days"),
                Err(e) => warn!("Session cleanup failed: {e}"),
            }
        }
    })
}
