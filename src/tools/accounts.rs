//! User account MCP tools

use serde::Serialize;

use crate::db::Database;
use crate::models::{User, UserCreate, UserUpdate};

/// Response for list_users
#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<User>,
    pub total: usize,
}

/// Create a user account
pub fn create_user(db: &Database, name: &str, email: &str) -> Result<User, String> {
    let name = name.trim();
    let email = email.trim();

    if name.is_empty() {
        return Err("Name must not be empty".to_string());
    }
    if email.is_empty() || !email.contains('@') {
        return Err(format!("Invalid email address: {}", email));
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let existing = User::get_by_email(&conn, email)
        .map_err(|e| format!("Failed to check email: {}", e))?;
    if existing.is_some() {
        return Err(format!("A user with email {} already exists", email));
    }

    User::create(
        &conn,
        &UserCreate {
            name: name.to_string(),
            email: email.to_string(),
        },
    )
    .map_err(|e| format!("Failed to create user: {}", e))
}

/// Get a user by id or email
pub fn get_user(
    db: &Database,
    id: Option<i64>,
    email: Option<&str>,
) -> Result<Option<User>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    match (id, email) {
        (Some(id), _) => {
            User::get_by_id(&conn, id).map_err(|e| format!("Failed to get user: {}", e))
        }
        (None, Some(email)) => {
            User::get_by_email(&conn, email).map_err(|e| format!("Failed to get user: {}", e))
        }
        (None, None) => Err("Must provide either id or email".to_string()),
    }
}

/// List all user accounts
pub fn list_users(db: &Database) -> Result<ListUsersResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let users = User::list(&conn).map_err(|e| format!("Failed to list users: {}", e))?;
    let total = users.len();

    Ok(ListUsersResponse { users, total })
}

/// Update a user's name or email
pub fn update_user(
    db: &Database,
    id: i64,
    name: Option<String>,
    email: Option<String>,
) -> Result<Option<User>, String> {
    if let Some(ref email) = email {
        if !email.contains('@') {
            return Err(format!("Invalid email address: {}", email));
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    User::update(&conn, id, &UserUpdate { name, email })
        .map_err(|e| format!("Failed to update user: {}", e))
}

/// Delete a user account and all of its records
pub fn delete_user(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    User::delete(&conn, id).map_err(|e| format!("Failed to delete user: {}", e))
}
