//! Fasting session model
//!
//! Timed fasts with a target duration. A session is active until ended; it is
//! completed when the elapsed time reaches the target.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A fasting session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FastingSession {
    pub id: i64,
    pub user_id: i64,
    pub started_at: String, // ISO 8601 timestamp
    pub ended_at: Option<String>,
    pub target_hours: f64,
    pub completed: bool,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for starting a fast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FastingSessionCreate {
    pub user_id: i64,
    pub started_at: Option<String>, // defaults to now
    pub target_hours: f64,
    pub notes: Option<String>,
}

impl FastingSession {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let completed: i64 = row.get("completed")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            started_at: row.get("started_at")?,
            ended_at: row.get("ended_at")?,
            target_hours: row.get("target_hours")?,
            completed: completed != 0,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Start a new fast
    pub fn start(conn: &Connection, data: &FastingSessionCreate) -> DbResult<Self> {
        let started_at = data
            .started_at
            .clone()
            .unwrap_or_else(|| Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string());

        conn.execute(
            r#"
            INSERT INTO fasting_sessions (user_id, started_at, target_hours, notes)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![data.user_id, started_at, data.target_hours, data.notes],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a session by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM fasting_sessions WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(session) => Ok(Some(session)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The active (not yet ended) session for a user, if any
    pub fn get_active(conn: &Connection, user_id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM fasting_sessions
             WHERE user_id = ?1 AND ended_at IS NULL
             ORDER BY started_at DESC LIMIT 1",
        )?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(session) => Ok(Some(session)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// End a session, marking it completed if the target was reached
    pub fn end(conn: &Connection, id: i64, ended_at: Option<&str>) -> DbResult<Option<Self>> {
        let session = match Self::get_by_id(conn, id)? {
            Some(s) => s,
            None => return Ok(None),
        };

        let ended = ended_at
            .map(|s| s.to_string())
            .unwrap_or_else(|| Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string());

        let completed = elapsed_hours(&session.started_at, &ended)
            .map(|h| h >= session.target_hours)
            .unwrap_or(false);

        conn.execute(
            "UPDATE fasting_sessions SET ended_at = ?1, completed = ?2, updated_at = datetime('now')
             WHERE id = ?3",
            params![ended, completed as i64, id],
        )?;

        Self::get_by_id(conn, id)
    }

    /// List sessions for a user, newest first
    pub fn list(conn: &Connection, user_id: i64, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM fasting_sessions WHERE user_id = ?1
             ORDER BY started_at DESC LIMIT ?2",
        )?;

        let sessions = stmt
            .query_map(params![user_id, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sessions)
    }

    /// Count completed fasts for a user
    pub fn count_completed(conn: &Connection, user_id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM fasting_sessions WHERE user_id = ?1 AND completed = 1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

/// Hours between two ISO 8601 timestamps, None if either fails to parse
fn elapsed_hours(start: &str, end: &str) -> Option<f64> {
    let start: DateTime<Utc> = start.parse().ok()?;
    let end: DateTime<Utc> = end.parse().ok()?;
    Some((end - start).num_seconds() as f64 / 3600.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_hours() {
        let h = elapsed_hours("2026-01-09T20:00:00Z", "2026-01-10T12:00:00Z").unwrap();
        assert!((h - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_elapsed_hours_bad_input() {
        assert!(elapsed_hours("not a time", "2026-01-10T12:00:00Z").is_none());
    }
}
