//! Supplement models
//!
//! The regimen (what should be taken) and the log (what was actually taken).

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A supplement in the user's regimen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplement {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub dosage: Option<String>,   // e.g., "5000 IU"
    pub schedule: Option<String>, // e.g., "morning"
    pub active: bool,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for adding a supplement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplementCreate {
    pub user_id: i64,
    pub name: String,
    pub dosage: Option<String>,
    pub schedule: Option<String>,
    pub notes: Option<String>,
}

/// Data for updating a supplement; unspecified fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplementUpdate {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub schedule: Option<String>,
    pub notes: Option<String>,
}

/// A single logged dose
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplementLog {
    pub id: i64,
    pub supplement_id: i64,
    pub date: String,
    pub taken_at: String,
    pub notes: Option<String>,
}

impl Supplement {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let active: i64 = row.get("active")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            dosage: row.get("dosage")?,
            schedule: row.get("schedule")?,
            active: active != 0,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Add a supplement to the regimen
    pub fn create(conn: &Connection, data: &SupplementCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO supplements (user_id, name, dosage, schedule, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![data.user_id, data.name, data.dosage, data.schedule, data.notes],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a supplement by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM supplements WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(supplement) => Ok(Some(supplement)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List supplements for a user
    pub fn list(conn: &Connection, user_id: i64, active_only: bool) -> DbResult<Vec<Self>> {
        let sql = if active_only {
            "SELECT * FROM supplements WHERE user_id = ?1 AND active = 1 ORDER BY name"
        } else {
            "SELECT * FROM supplements WHERE user_id = ?1 ORDER BY name"
        };

        let mut stmt = conn.prepare(sql)?;
        let supplements = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(supplements)
    }

    /// Update a supplement; unspecified fields are left untouched
    pub fn update(conn: &Connection, id: i64, data: &SupplementUpdate) -> DbResult<Option<Self>> {
        if Self::get_by_id(conn, id)?.is_none() {
            return Ok(None);
        }

        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(ref dosage) = data.dosage {
            updates.push(format!("dosage = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(dosage.clone()));
        }
        if let Some(ref schedule) = data.schedule {
            updates.push(format!("schedule = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(schedule.clone()));
        }
        if let Some(ref notes) = data.notes {
            updates.push(format!("notes = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(notes.clone()));
        }

        if !updates.is_empty() {
            updates.push("updated_at = datetime('now')".to_string());
            params_vec.push(Box::new(id));
            let sql = format!(
                "UPDATE supplements SET {} WHERE id = ?{}",
                updates.join(", "),
                params_vec.len()
            );
            let params_refs: Vec<&dyn rusqlite::ToSql> =
                params_vec.iter().map(|p| p.as_ref()).collect();
            conn.execute(&sql, params_refs.as_slice())?;
        }

        Self::get_by_id(conn, id)
    }

    /// Mark a supplement inactive, preserving its history
    pub fn deactivate(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        conn.execute(
            "UPDATE supplements SET active = 0, updated_at = datetime('now') WHERE id = ?1",
            [id],
        )?;
        Self::get_by_id(conn, id)
    }
}

impl SupplementLog {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            supplement_id: row.get("supplement_id")?,
            date: row.get("date")?,
            taken_at: row.get("taken_at")?,
            notes: row.get("notes")?,
        })
    }

    /// Record a dose taken
    pub fn log(
        conn: &Connection,
        supplement_id: i64,
        date: &str,
        notes: Option<&str>,
    ) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO supplement_logs (supplement_id, date, notes) VALUES (?1, ?2, ?3)",
            params![supplement_id, date, notes],
        )?;

        let id = conn.last_insert_rowid();
        let mut stmt = conn.prepare("SELECT * FROM supplement_logs WHERE id = ?1")?;
        Ok(stmt.query_row([id], Self::from_row)?)
    }

    /// List doses for a supplement within a date range, newest first
    pub fn history(
        conn: &Connection,
        supplement_id: i64,
        start_date: &str,
        end_date: &str,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM supplement_logs
             WHERE supplement_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date DESC, taken_at DESC",
        )?;

        let logs = stmt
            .query_map(params![supplement_id, start_date, end_date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }
}
