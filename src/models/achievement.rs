//! Achievement model
//!
//! Stores unlocked achievement codes per user. The unlock rules themselves
//! live in `metabolic::achievements`.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// An unlocked achievement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub user_id: i64,
    pub code: String,
    pub unlocked_at: String,
}

impl Achievement {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            code: row.get("code")?,
            unlocked_at: row.get("unlocked_at")?,
        })
    }

    /// Record an unlock; a duplicate code for the same user is a no-op
    pub fn unlock(conn: &Connection, user_id: i64, code: &str) -> DbResult<()> {
        conn.execute(
            "INSERT INTO achievements (user_id, code) VALUES (?1, ?2)
             ON CONFLICT(user_id, code) DO NOTHING",
            params![user_id, code],
        )?;
        Ok(())
    }

    /// List unlocked achievements for a user, oldest first
    pub fn list(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM achievements WHERE user_id = ?1 ORDER BY unlocked_at, id",
        )?;

        let achievements = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(achievements)
    }

    /// Unlocked codes for a user
    pub fn unlocked_codes(conn: &Connection, user_id: i64) -> DbResult<Vec<String>> {
        let mut stmt = conn.prepare("SELECT code FROM achievements WHERE user_id = ?1")?;

        let codes = stmt
            .query_map([user_id], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(codes)
    }
}
