//! Supplement regimen MCP tools

use serde::Serialize;

use crate::db::Database;
use crate::models::{Supplement, SupplementCreate, SupplementLog, SupplementUpdate, User};

/// Response for supplement_history
#[derive(Debug, Serialize)]
pub struct SupplementHistoryResponse {
    pub supplement: Supplement,
    pub doses: Vec<SupplementLog>,
}

/// Add a supplement to a user's regimen
pub fn add_supplement(
    db: &Database,
    user_id: i64,
    name: &str,
    dosage: Option<String>,
    schedule: Option<String>,
    notes: Option<String>,
) -> Result<Supplement, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name must not be empty".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let user = User::get_by_id(&conn, user_id)
        .map_err(|e| format!("Failed to get user: {}", e))?;
    if user.is_none() {
        return Err(format!("User not found with id: {}", user_id));
    }

    Supplement::create(
        &conn,
        &SupplementCreate {
            user_id,
            name: name.to_string(),
            dosage,
            schedule,
            notes,
        },
    )
    .map_err(|e| format!("Failed to add supplement: {}", e))
}

/// List a user's supplements
pub fn list_supplements(
    db: &Database,
    user_id: i64,
    active_only: bool,
) -> Result<Vec<Supplement>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Supplement::list(&conn, user_id, active_only)
        .map_err(|e| format!("Failed to list supplements: {}", e))
}

/// Update a supplement's details
pub fn update_supplement(
    db: &Database,
    id: i64,
    data: &SupplementUpdate,
) -> Result<Option<Supplement>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Supplement::update(&conn, id, data).map_err(|e| format!("Failed to update supplement: {}", e))
}

/// Deactivate a supplement, keeping its dose history
pub fn deactivate_supplement(db: &Database, id: i64) -> Result<Supplement, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Supplement::deactivate(&conn, id)
        .map_err(|e| format!("Failed to deactivate supplement: {}", e))?
        .ok_or_else(|| format!("Supplement not found with id: {}", id))
}

/// Record a dose taken on a date
pub fn log_supplement_dose(
    db: &Database,
    supplement_id: i64,
    date: &str,
    notes: Option<&str>,
) -> Result<SupplementLog, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let supplement = Supplement::get_by_id(&conn, supplement_id)
        .map_err(|e| format!("Failed to get supplement: {}", e))?
        .ok_or_else(|| format!("Supplement not found with id: {}", supplement_id))?;

    if !supplement.active {
        return Err(format!(
            "Supplement '{}' is inactive; reactivate or add it again before logging doses",
            supplement.name
        ));
    }

    SupplementLog::log(&conn, supplement_id, date, notes)
        .map_err(|e| format!("Failed to log dose: {}", e))
}

/// Dose history for a supplement within a date range
pub fn supplement_history(
    db: &Database,
    supplement_id: i64,
    start_date: &str,
    end_date: &str,
) -> Result<SupplementHistoryResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let supplement = Supplement::get_by_id(&conn, supplement_id)
        .map_err(|e| format!("Failed to get supplement: {}", e))?
        .ok_or_else(|| format!("Supplement not found with id: {}", supplement_id))?;

    let doses = SupplementLog::history(&conn, supplement_id, start_date, end_date)
        .map_err(|e| format!("Failed to get dose history: {}", e))?;

    Ok(SupplementHistoryResponse { supplement, doses })
}
