//! Daily goal model
//!
//! Persists the five daily habit flags, one row per user per date. Updates
//! merge into the existing row and the stored win score is recomputed from
//! the full merged flag set.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::metabolic::{DailyGoalFlags, DailyGoalFlagsUpdate};

/// A stored daily goal record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyGoal {
    pub id: i64,
    pub user_id: i64,
    pub date: String, // ISO date
    pub flags: DailyGoalFlags,
    pub win_score: u8,
    pub created_at: String,
    pub updated_at: String,
}

impl DailyGoal {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let flags = DailyGoalFlags {
            meals_logged: row.get::<_, i64>("meals_logged")? != 0,
            protein_goal_met: row.get::<_, i64>("protein_goal_met")? != 0,
            fast_completed: row.get::<_, i64>("fast_completed")? != 0,
            exercise_done: row.get::<_, i64>("exercise_done")? != 0,
            water_goal_met: row.get::<_, i64>("water_goal_met")? != 0,
        };
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            flags,
            win_score: row.get::<_, i64>("win_score")? as u8,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get the record for a user and date
    pub fn get(conn: &Connection, user_id: i64, date: &str) -> DbResult<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM daily_goals WHERE user_id = ?1 AND date = ?2")?;

        let result = stmt.query_row(params![user_id, date], Self::from_row);
        match result {
            Ok(goal) => Ok(Some(goal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Merge a partial flag update into the record for (user, date)
    ///
    /// Creates the row (all flags false) if missing. Flags absent from the
    /// update keep their stored values; the win score is recomputed from the
    /// merged set, never from the delta.
    pub fn merge(
        conn: &Connection,
        user_id: i64,
        date: &str,
        update: &DailyGoalFlagsUpdate,
    ) -> DbResult<Self> {
        let existing = Self::get(conn, user_id, date)?
            .map(|g| g.flags)
            .unwrap_or_default();

        let merged = existing.merged(update);
        let win_score = merged.win_score();

        conn.execute(
            r#"
            INSERT INTO daily_goals
                (user_id, date, meals_logged, protein_goal_met, fast_completed,
                 exercise_done, water_goal_met, win_score)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(user_id, date) DO UPDATE SET
                meals_logged = excluded.meals_logged,
                protein_goal_met = excluded.protein_goal_met,
                fast_completed = excluded.fast_completed,
                exercise_done = excluded.exercise_done,
                water_goal_met = excluded.water_goal_met,
                win_score = excluded.win_score,
                updated_at = datetime('now')
            "#,
            params![
                user_id,
                date,
                merged.meals_logged as i64,
                merged.protein_goal_met as i64,
                merged.fast_completed as i64,
                merged.exercise_done as i64,
                merged.water_goal_met as i64,
                win_score as i64,
            ],
        )?;

        Self::get(conn, user_id, date)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Full history for a user, most recent date first (streak ordering)
    pub fn history_descending(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM daily_goals WHERE user_id = ?1 ORDER BY date DESC")?;

        let goals = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(goals)
    }

    /// Records within a date window, most recent date first
    pub fn window_descending(
        conn: &Connection,
        user_id: i64,
        start_date: &str,
        end_date: &str,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM daily_goals
             WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date DESC",
        )?;

        let goals = stmt
            .query_map(params![user_id, start_date, end_date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(goals)
    }

    /// Count of days with a perfect win score
    pub fn count_perfect_days(conn: &Connection, user_id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM daily_goals WHERE user_id = ?1 AND win_score = 5",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Count of days with the meal-logging flag set
    pub fn count_days_logged(conn: &Connection, user_id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM daily_goals WHERE user_id = ?1 AND meals_logged = 1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{User, UserCreate};

    fn test_db() -> Database {
        let db = Database::new_in_memory().unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();
        db.with_conn(|conn| {
            User::create(
                conn,
                &UserCreate {
                    name: "Test".to_string(),
                    email: "test@example.com".to_string(),
                },
            )
        })
        .unwrap();
        db
    }

    #[test]
    fn test_merge_creates_then_updates_single_row() {
        let db = test_db();
        let conn = db.get_conn().unwrap();

        let first = DailyGoal::merge(
            &conn,
            1,
            "2026-01-09",
            &DailyGoalFlagsUpdate {
                meals_logged: Some(true),
                protein_goal_met: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(first.win_score, 2);

        // Toggling one flag leaves the other four untouched
        let second = DailyGoal::merge(
            &conn,
            1,
            "2026-01-09",
            &DailyGoalFlagsUpdate {
                meals_logged: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(!second.flags.meals_logged);
        assert!(second.flags.protein_goal_met);
        assert_eq!(second.win_score, 1);
        assert_eq!(second.id, first.id);

        // Still one row for the (user, date) pair
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM daily_goals WHERE user_id = 1 AND date = '2026-01-09'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_history_ordering_is_descending() {
        let db = test_db();
        let conn = db.get_conn().unwrap();

        for date in ["2026-01-07", "2026-01-09", "2026-01-08"] {
            DailyGoal::merge(
                &conn,
                1,
                date,
                &DailyGoalFlagsUpdate {
                    meals_logged: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        let history = DailyGoal::history_descending(&conn, 1).unwrap();
        let dates: Vec<&str> = history.iter().map(|g| g.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-01-09", "2026-01-08", "2026-01-07"]);
    }

    #[test]
    fn test_perfect_day_count() {
        let db = test_db();
        let conn = db.get_conn().unwrap();

        DailyGoal::merge(
            &conn,
            1,
            "2026-01-09",
            &DailyGoalFlagsUpdate {
                meals_logged: Some(true),
                protein_goal_met: Some(true),
                fast_completed: Some(true),
                exercise_done: Some(true),
                water_goal_met: Some(true),
            },
        )
        .unwrap();

        assert_eq!(DailyGoal::count_perfect_days(&conn, 1).unwrap(), 1);
        assert_eq!(DailyGoal::count_days_logged(&conn, 1).unwrap(), 1);
    }
}
