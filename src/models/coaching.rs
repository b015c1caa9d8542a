//! Coaching message model
//!
//! AI-generated coaching content, stored so past advice can be reviewed.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A stored coaching message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachingMessage {
    pub id: i64,
    pub user_id: i64,
    pub topic: String,
    pub content: String,
    pub model: Option<String>,
    pub created_at: String,
}

/// Data for storing a coaching message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachingMessageCreate {
    pub user_id: i64,
    pub topic: String,
    pub content: String,
    pub model: Option<String>,
}

impl CoachingMessage {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            topic: row.get("topic")?,
            content: row.get("content")?,
            model: row.get("model")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Store a coaching message
    pub fn create(conn: &Connection, data: &CoachingMessageCreate) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO coaching_messages (user_id, topic, content, model)
             VALUES (?1, ?2, ?3, ?4)",
            params![data.user_id, data.topic, data.content, data.model],
        )?;

        let id = conn.last_insert_rowid();
        let mut stmt = conn.prepare("SELECT * FROM coaching_messages WHERE id = ?1")?;
        Ok(stmt.query_row([id], Self::from_row)?)
    }

    /// List messages for a user, newest first
    pub fn list(conn: &Connection, user_id: i64, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM coaching_messages WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC LIMIT ?2",
        )?;

        let messages = stmt
            .query_map(params![user_id, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(messages)
    }
}
