//! Fasting session MCP tools

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::Database;
use crate::models::{FastingSession, FastingSessionCreate, User};

/// Response for get_fast_status
#[derive(Debug, Serialize)]
pub struct FastStatusResponse {
    pub active: bool,
    pub session: Option<FastingSession>,
    /// Hours elapsed so far, present only while a fast is active
    pub elapsed_hours: Option<f64>,
    /// Hours remaining until the target, clamped at zero
    pub remaining_hours: Option<f64>,
}

/// Response for list_fasts
#[derive(Debug, Serialize)]
pub struct ListFastsResponse {
    pub sessions: Vec<FastingSession>,
    pub completed_total: i64,
}

/// Start a fast for a user
pub fn start_fast(
    db: &Database,
    user_id: i64,
    target_hours: f64,
    started_at: Option<String>,
    notes: Option<String>,
) -> Result<FastingSession, String> {
    if target_hours <= 0.0 {
        return Err("target_hours must be greater than 0".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let user = User::get_by_id(&conn, user_id)
        .map_err(|e| format!("Failed to get user: {}", e))?;
    if user.is_none() {
        return Err(format!("User not found with id: {}", user_id));
    }

    let active = FastingSession::get_active(&conn, user_id)
        .map_err(|e| format!("Failed to check active fast: {}", e))?;
    if let Some(active) = active {
        return Err(format!(
            "A fast is already active (started {}). End it before starting a new one.",
            active.started_at
        ));
    }

    FastingSession::start(
        &conn,
        &FastingSessionCreate {
            user_id,
            started_at,
            target_hours,
            notes,
        },
    )
    .map_err(|e| format!("Failed to start fast: {}", e))
}

/// End the active fast for a user
pub fn end_fast(
    db: &Database,
    user_id: i64,
    ended_at: Option<String>,
) -> Result<FastingSession, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let active = FastingSession::get_active(&conn, user_id)
        .map_err(|e| format!("Failed to check active fast: {}", e))?
        .ok_or_else(|| format!("No active fast for user {}", user_id))?;

    FastingSession::end(&conn, active.id, ended_at.as_deref())
        .map_err(|e| format!("Failed to end fast: {}", e))?
        .ok_or_else(|| "Fast disappeared while ending".to_string())
}

/// The current fast, with elapsed and remaining hours
pub fn get_fast_status(db: &Database, user_id: i64) -> Result<FastStatusResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let active = FastingSession::get_active(&conn, user_id)
        .map_err(|e| format!("Failed to check active fast: {}", e))?;

    match active {
        Some(session) => {
            let elapsed = session
                .started_at
                .parse::<DateTime<Utc>>()
                .ok()
                .map(|start| (Utc::now() - start).num_seconds() as f64 / 3600.0);
            let remaining = elapsed.map(|e| (session.target_hours - e).max(0.0));

            Ok(FastStatusResponse {
                active: true,
                session: Some(session),
                elapsed_hours: elapsed.map(|h| (h * 10.0).round() / 10.0),
                remaining_hours: remaining.map(|h| (h * 10.0).round() / 10.0),
            })
        }
        None => Ok(FastStatusResponse {
            active: false,
            session: None,
            elapsed_hours: None,
            remaining_hours: None,
        }),
    }
}

/// List past fasts, newest first
pub fn list_fasts(db: &Database, user_id: i64, limit: i64) -> Result<ListFastsResponse, String> {
    let limit = limit.clamp(1, 200);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let sessions = FastingSession::list(&conn, user_id, limit)
        .map_err(|e| format!("Failed to list fasts: {}", e))?;

    let completed_total = FastingSession::count_completed(&conn, user_id)
        .map_err(|e| format!("Failed to count completed fasts: {}", e))?;

    Ok(ListFastsResponse {
        sessions,
        completed_total,
    })
}
