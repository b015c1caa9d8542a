//! Weight entry model
//!
//! Daily scale readings, one per user per date.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A single scale reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: i64,
    pub user_id: i64,
    pub date: String, // ISO date: "2026-01-09"
    pub weight_lb: f64,
    pub notes: Option<String>,
    pub created_at: String,
}

impl WeightEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            weight_lb: row.get("weight_lb")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Record a weight for a date; a second reading for the same date wins
    pub fn log(
        conn: &Connection,
        user_id: i64,
        date: &str,
        weight_lb: f64,
        notes: Option<&str>,
    ) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO weight_entries (user_id, date, weight_lb, notes)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id, date) DO UPDATE SET
                weight_lb = excluded.weight_lb,
                notes = excluded.notes
            "#,
            params![user_id, date, weight_lb, notes],
        )?;

        let mut stmt =
            conn.prepare("SELECT * FROM weight_entries WHERE user_id = ?1 AND date = ?2")?;
        Ok(stmt.query_row(params![user_id, date], Self::from_row)?)
    }

    /// List entries for a user, oldest first, optionally bounded by dates
    pub fn history(
        conn: &Connection,
        user_id: i64,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> DbResult<Vec<Self>> {
        let mut sql = String::from("SELECT * FROM weight_entries WHERE user_id = ?1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(start) = start_date {
            params_vec.push(Box::new(start.to_string()));
            sql.push_str(&format!(" AND date >= ?{}", params_vec.len()));
        }
        if let Some(end) = end_date {
            params_vec.push(Box::new(end.to_string()));
            sql.push_str(&format!(" AND date <= ?{}", params_vec.len()));
        }

        sql.push_str(" ORDER BY date ASC");

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let entries = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// First and latest reading for a user, if any exist
    pub fn first_and_latest(conn: &Connection, user_id: i64) -> DbResult<Option<(Self, Self)>> {
        let entries = Self::history(conn, user_id, None, None)?;
        match (entries.first(), entries.last()) {
            (Some(first), Some(last)) => Ok(Some((first.clone(), last.clone()))),
            _ => Ok(None),
        }
    }

    /// Delete an entry
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM weight_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
