//! Profile model
//!
//! Metabolic profile, one row per user. Columns are nullable so a profile can
//! be filled in piecemeal; the goals calculator only runs on a complete one.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::metabolic::{ActivityLevel, ProfileMetrics, Sex};

/// Stored metabolic profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: i64,
    pub weight_lb: Option<f64>,
    pub height_in: Option<f64>,
    pub age: Option<f64>,
    pub sex: Option<String>,
    pub activity_level: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Partial profile update; unspecified fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub weight_lb: Option<f64>,
    pub height_in: Option<f64>,
    pub age: Option<f64>,
    pub sex: Option<String>,
    pub activity_level: Option<String>,
}

impl Profile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get("user_id")?,
            weight_lb: row.get("weight_lb")?,
            height_in: row.get("height_in")?,
            age: row.get("age")?,
            sex: row.get("sex")?,
            activity_level: row.get("activity_level")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get the profile for a user
    pub fn get(conn: &Connection, user_id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles WHERE user_id = ?1")?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Upsert a partial profile update
    ///
    /// Creates the row if missing, then applies only the specified fields.
    pub fn upsert(conn: &Connection, user_id: i64, data: &ProfileUpdate) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO profiles (user_id) VALUES (?1)
             ON CONFLICT(user_id) DO NOTHING",
            [user_id],
        )?;

        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(weight_lb) = data.weight_lb {
            updates.push(format!("weight_lb = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(weight_lb));
        }
        if let Some(height_in) = data.height_in {
            updates.push(format!("height_in = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(height_in));
        }
        if let Some(age) = data.age {
            updates.push(format!("age = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(age));
        }
        if let Some(ref sex) = data.sex {
            updates.push(format!("sex = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(Sex::from_str(sex).as_str().to_string()));
        }
        if let Some(ref activity) = data.activity_level {
            updates.push(format!("activity_level = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(ActivityLevel::from_str(activity).as_str().to_string()));
        }

        if !updates.is_empty() {
            updates.push("updated_at = datetime('now')".to_string());
            params_vec.push(Box::new(user_id));
            let sql = format!(
                "UPDATE profiles SET {} WHERE user_id = ?{}",
                updates.join(", "),
                params_vec.len()
            );
            let params_refs: Vec<&dyn rusqlite::ToSql> =
                params_vec.iter().map(|p| p.as_ref()).collect();
            conn.execute(&sql, params_refs.as_slice())?;
        }

        Self::get(conn, user_id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Convert to calculator input if every field is present
    pub fn metrics(&self) -> Option<ProfileMetrics> {
        Some(ProfileMetrics {
            weight_lb: self.weight_lb?,
            height_in: self.height_in?,
            age: self.age?,
            sex: Sex::from_str(self.sex.as_deref()?),
            activity: ActivityLevel::from_str(self.activity_level.as_deref()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn test_db() -> Database {
        let db = Database::new_in_memory().unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();
        db.with_conn(|conn| {
            crate::models::User::create(
                conn,
                &crate::models::UserCreate {
                    name: "Test".to_string(),
                    email: "test@example.com".to_string(),
                },
            )
        })
        .unwrap();
        db
    }

    #[test]
    fn test_partial_upsert_preserves_other_fields() {
        let db = test_db();
        let conn = db.get_conn().unwrap();

        Profile::upsert(
            &conn,
            1,
            &ProfileUpdate {
                weight_lb: Some(220.0),
                sex: Some("male".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        let profile = Profile::upsert(
            &conn,
            1,
            &ProfileUpdate {
                height_in: Some(71.0),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(profile.weight_lb, Some(220.0));
        assert_eq!(profile.height_in, Some(71.0));
        assert_eq!(profile.sex.as_deref(), Some("male"));
    }

    #[test]
    fn test_incomplete_profile_has_no_metrics() {
        let db = test_db();
        let conn = db.get_conn().unwrap();

        let profile = Profile::upsert(
            &conn,
            1,
            &ProfileUpdate {
                weight_lb: Some(220.0),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(profile.metrics().is_none());
    }

    #[test]
    fn test_complete_profile_yields_metrics() {
        let db = test_db();
        let conn = db.get_conn().unwrap();

        let profile = Profile::upsert(
            &conn,
            1,
            &ProfileUpdate {
                weight_lb: Some(312.0),
                height_in: Some(72.0),
                age: Some(61.0),
                sex: Some("male".to_string()),
                activity_level: Some("very_active".to_string()),
            },
        )
        .unwrap();

        let metrics = profile.metrics().unwrap();
        assert_eq!(metrics.weight_lb, 312.0);
        assert_eq!(metrics.activity, ActivityLevel::VeryActive);
    }
}
