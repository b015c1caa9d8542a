//! Meal Entry model
//!
//! Represents food consumed, logged directly with its nutrition values.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Meal type enum
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Unspecified,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
            MealType::Unspecified => "unspecified",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "breakfast" => MealType::Breakfast,
            "lunch" => MealType::Lunch,
            "dinner" => MealType::Dinner,
            "snack" => MealType::Snack,
            _ => MealType::Unspecified,
        }
    }
}

/// A logged meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealEntry {
    pub id: i64,
    pub user_id: i64,
    pub date: String, // ISO date
    pub meal_type: MealType,
    pub description: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a meal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealEntryCreate {
    pub user_id: i64,
    pub date: String,
    pub meal_type: MealType,
    pub description: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub notes: Option<String>,
}

/// Data for updating a meal entry; unspecified fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealEntryUpdate {
    pub meal_type: Option<MealType>,
    pub description: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
    pub notes: Option<String>,
}

impl MealEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_type_str: String = row.get("meal_type")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            meal_type: MealType::from_str(&meal_type_str),
            description: row.get("description")?,
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            carbs: row.get("carbs")?,
            fats: row.get("fats")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new meal entry
    pub fn create(conn: &Connection, data: &MealEntryCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO meal_entries
                (user_id, date, meal_type, description, calories, protein, carbs, fats, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                data.user_id,
                data.date,
                data.meal_type.as_str(),
                data.description,
                data.calories,
                data.protein,
                data.carbs,
                data.fats,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a meal entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meal_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List entries for a user and date
    pub fn list_for_date(conn: &Connection, user_id: i64, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meal_entries WHERE user_id = ?1 AND date = ?2 ORDER BY created_at",
        )?;

        let entries = stmt
            .query_map(params![user_id, date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// List entries for a user within a date range, oldest first
    pub fn list_for_range(
        conn: &Connection,
        user_id: i64,
        start_date: &str,
        end_date: &str,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meal_entries
             WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date, created_at",
        )?;

        let entries = stmt
            .query_map(params![user_id, start_date, end_date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Update a meal entry; unspecified fields are left untouched
    pub fn update(conn: &Connection, id: i64, data: &MealEntryUpdate) -> DbResult<Option<Self>> {
        let entry = Self::get_by_id(conn, id)?;
        if entry.is_none() {
            return Ok(None);
        }

        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref meal_type) = data.meal_type {
            updates.push(format!("meal_type = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(meal_type.as_str().to_string()));
        }
        if let Some(ref description) = data.description {
            updates.push(format!("description = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(description.clone()));
        }
        if let Some(calories) = data.calories {
            updates.push(format!("calories = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(calories));
        }
        if let Some(protein) = data.protein {
            updates.push(format!("protein = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(protein));
        }
        if let Some(carbs) = data.carbs {
            updates.push(format!("carbs = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(carbs));
        }
        if let Some(fats) = data.fats {
            updates.push(format!("fats = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(fats));
        }
        if let Some(ref notes) = data.notes {
            updates.push(format!("notes = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(notes.clone()));
        }

        if !updates.is_empty() {
            updates.push("updated_at = datetime('now')".to_string());
            params_vec.push(Box::new(id));
            let sql = format!(
                "UPDATE meal_entries SET {} WHERE id = ?{}",
                updates.join(", "),
                params_vec.len()
            );
            let params_refs: Vec<&dyn rusqlite::ToSql> =
                params_vec.iter().map(|p| p.as_ref()).collect();
            conn.execute(&sql, params_refs.as_slice())?;
        }

        Self::get_by_id(conn, id)
    }

    /// Delete a meal entry
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meal_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
