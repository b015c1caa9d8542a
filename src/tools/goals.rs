//! Daily goal, weight, and progress MCP tools
//!
//! The write paths here (flag updates, weight logging) also run the
//! achievement evaluator so unlocks land in the same response the assistant
//! is already reporting from.

use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::Database;
use crate::metabolic::{
    compute_streaks, compute_weekly_aggregate, evaluate_achievements, DailyGoalFlagsUpdate,
    ProgressStats, StreakSummary, UnlockedAchievement, WeeklyAggregate, QUALIFYING_SCORE,
};
use crate::models::{Achievement, DailyGoal, FastingSession, User, WeightEntry};

/// Response for update_daily_goals
#[derive(Debug, Serialize)]
pub struct UpdateDailyGoalsResponse {
    pub goal: DailyGoal,
    pub qualifies: bool,
    pub new_achievements: Vec<UnlockedAchievement>,
}

/// Response for log_weight
#[derive(Debug, Serialize)]
pub struct LogWeightResponse {
    pub entry: WeightEntry,
    /// Pounds lost since the first recorded weight, negative when gaining
    pub total_change_lb: Option<f64>,
    pub new_achievements: Vec<UnlockedAchievement>,
}

/// Response for get_weight_history
#[derive(Debug, Serialize)]
pub struct WeightHistoryResponse {
    pub entries: Vec<WeightEntry>,
    pub starting_weight_lb: Option<f64>,
    pub latest_weight_lb: Option<f64>,
    pub total_change_lb: Option<f64>,
}

/// Response for get_streaks
#[derive(Debug, Serialize)]
pub struct StreaksResponse {
    pub streaks: StreakSummary,
    pub qualifying_score: u8,
    pub days_recorded: usize,
}

/// Response for get_weekly_summary
#[derive(Debug, Serialize)]
pub struct WeeklySummaryResponse {
    pub start_date: String,
    pub end_date: String,
    pub summary: WeeklyAggregate,
}

/// Response for list_achievements
#[derive(Debug, Serialize)]
pub struct ListAchievementsResponse {
    pub achievements: Vec<Achievement>,
    pub total: usize,
}

/// Response for check_achievements
#[derive(Debug, Serialize)]
pub struct CheckAchievementsResponse {
    pub new_achievements: Vec<UnlockedAchievement>,
    pub total_unlocked: usize,
}

fn require_user(conn: &Connection, user_id: i64) -> Result<(), String> {
    let user = User::get_by_id(conn, user_id)
        .map_err(|e| format!("Failed to get user: {}", e))?;
    if user.is_none() {
        return Err(format!("User not found with id: {}", user_id));
    }
    Ok(())
}

/// Aggregate the stats the achievement rules are evaluated against
fn collect_progress_stats(conn: &Connection, user_id: i64) -> Result<ProgressStats, String> {
    let history = DailyGoal::history_descending(conn, user_id)
        .map_err(|e| format!("Failed to load goal history: {}", e))?;
    let flags: Vec<_> = history.iter().map(|g| g.flags).collect();
    let streaks = compute_streaks(&flags);

    let total_days_logged = DailyGoal::count_days_logged(conn, user_id)
        .map_err(|e| format!("Failed to count logged days: {}", e))? as u32;
    let perfect_days = DailyGoal::count_perfect_days(conn, user_id)
        .map_err(|e| format!("Failed to count perfect days: {}", e))? as u32;

    let pounds_lost = WeightEntry::first_and_latest(conn, user_id)
        .map_err(|e| format!("Failed to load weight history: {}", e))?
        .map(|(first, latest)| first.weight_lb - latest.weight_lb)
        .unwrap_or(0.0);

    let fasts_completed = FastingSession::count_completed(conn, user_id)
        .map_err(|e| format!("Failed to count fasts: {}", e))? as u32;

    Ok(ProgressStats {
        total_days_logged,
        current_streak: streaks.current_streak,
        longest_streak: streaks.longest_streak,
        perfect_days,
        pounds_lost,
        fasts_completed,
    })
}

/// Evaluate achievement rules and persist any new unlocks
fn sync_achievements(conn: &Connection, user_id: i64) -> Result<Vec<UnlockedAchievement>, String> {
    let stats = collect_progress_stats(conn, user_id)?;
    let already = Achievement::unlocked_codes(conn, user_id)
        .map_err(|e| format!("Failed to load unlocked achievements: {}", e))?;

    let new = evaluate_achievements(&stats, &already);
    for unlocked in &new {
        Achievement::unlock(conn, user_id, unlocked.code)
            .map_err(|e| format!("Failed to record achievement: {}", e))?;
    }

    Ok(new)
}

/// Merge a partial flag update into the record for (user, date)
pub fn update_daily_goals(
    db: &Database,
    user_id: i64,
    date: &str,
    update: &DailyGoalFlagsUpdate,
) -> Result<UpdateDailyGoalsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    require_user(&conn, user_id)?;

    let goal = DailyGoal::merge(&conn, user_id, date, update)
        .map_err(|e| format!("Failed to update daily goals: {}", e))?;

    let new_achievements = sync_achievements(&conn, user_id)?;

    Ok(UpdateDailyGoalsResponse {
        qualifies: goal.flags.qualifies(),
        goal,
        new_achievements,
    })
}

/// Get the goal record for a user and date
pub fn get_daily_goals(
    db: &Database,
    user_id: i64,
    date: &str,
) -> Result<Option<DailyGoal>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    DailyGoal::get(&conn, user_id, date).map_err(|e| format!("Failed to get daily goals: {}", e))
}

/// Record a weight for a date
pub fn log_weight(
    db: &Database,
    user_id: i64,
    date: &str,
    weight_lb: f64,
    notes: Option<&str>,
) -> Result<LogWeightResponse, String> {
    if weight_lb <= 0.0 {
        return Err("weight_lb must be greater than 0".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    require_user(&conn, user_id)?;

    let entry = WeightEntry::log(&conn, user_id, date, weight_lb, notes)
        .map_err(|e| format!("Failed to log weight: {}", e))?;

    let total_change_lb = WeightEntry::first_and_latest(&conn, user_id)
        .map_err(|e| format!("Failed to load weight history: {}", e))?
        .map(|(first, latest)| first.weight_lb - latest.weight_lb);

    let new_achievements = sync_achievements(&conn, user_id)?;

    Ok(LogWeightResponse {
        entry,
        total_change_lb,
        new_achievements,
    })
}

/// Delete a weight entry by id
pub fn delete_weight_entry(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    WeightEntry::delete(&conn, id).map_err(|e| format!("Failed to delete weight entry: {}", e))
}

/// Weight history with start/latest/change summary
pub fn get_weight_history(
    db: &Database,
    user_id: i64,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<WeightHistoryResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entries = WeightEntry::history(&conn, user_id, start_date, end_date)
        .map_err(|e| format!("Failed to get weight history: {}", e))?;

    let starting = entries.first().map(|e| e.weight_lb);
    let latest = entries.last().map(|e| e.weight_lb);
    let change = match (starting, latest) {
        (Some(s), Some(l)) => Some(s - l),
        _ => None,
    };

    Ok(WeightHistoryResponse {
        entries,
        starting_weight_lb: starting,
        latest_weight_lb: latest,
        total_change_lb: change,
    })
}

/// Current and longest streaks over the full goal history
pub fn get_streaks(db: &Database, user_id: i64) -> Result<StreaksResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let history = DailyGoal::history_descending(&conn, user_id)
        .map_err(|e| format!("Failed to load goal history: {}", e))?;
    let flags: Vec<_> = history.iter().map(|g| g.flags).collect();

    Ok(StreaksResponse {
        streaks: compute_streaks(&flags),
        qualifying_score: QUALIFYING_SCORE,
        days_recorded: history.len(),
    })
}

/// Weekly roll-up over the seven days ending at end_date
pub fn get_weekly_summary(
    db: &Database,
    user_id: i64,
    end_date: &str,
) -> Result<WeeklySummaryResponse, String> {
    let end = NaiveDate::parse_from_str(end_date, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date (expected YYYY-MM-DD): {}", end_date))?;
    let start = end - Duration::days(6);
    let start_date = start.format("%Y-%m-%d").to_string();

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let records = DailyGoal::window_descending(&conn, user_id, &start_date, end_date)
        .map_err(|e| format!("Failed to load goal window: {}", e))?;
    let flags: Vec<_> = records.iter().map(|g| g.flags).collect();

    Ok(WeeklySummaryResponse {
        start_date,
        end_date: end_date.to_string(),
        summary: compute_weekly_aggregate(&flags),
    })
}

/// Re-evaluate achievement rules and unlock anything newly earned
pub fn check_achievements(
    db: &Database,
    user_id: i64,
) -> Result<CheckAchievementsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    require_user(&conn, user_id)?;

    let new_achievements = sync_achievements(&conn, user_id)?;
    let total_unlocked = Achievement::list(&conn, user_id)
        .map_err(|e| format!("Failed to list achievements: {}", e))?
        .len();

    Ok(CheckAchievementsResponse {
        new_achievements,
        total_unlocked,
    })
}

/// Unlocked achievements for a user
pub fn list_achievements(db: &Database, user_id: i64) -> Result<ListAchievementsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let achievements = Achievement::list(&conn, user_id)
        .map_err(|e| format!("Failed to list achievements: {}", e))?;
    let total = achievements.len();

    Ok(ListAchievementsResponse {
        achievements,
        total,
    })
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
    fn test_first_goal_update_unlocks_first_day() {
        let db = test_db();

        let response = update_daily_goals(
            &db,
            1,
            "2026-01-09",
            &DailyGoalFlagsUpdate {
                meals_logged: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(response.goal.win_score, 1);
        assert!(!response.qualifies);
        assert!(response
            .new_achievements
            .iter()
            .any(|a| a.code == "first_day"));

        // A second update does not re-award it
        let again = update_daily_goals(
            &db,
            1,
            "2026-01-09",
            &DailyGoalFlagsUpdate {
                exercise_done: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(again.new_achievements.iter().all(|a| a.code != "first_day"));
    }

    #[test]
    fn test_weight_change_is_first_minus_latest() {
        let db = test_db();

        log_weight(&db, 1, "2026-01-01", 312.0, None).unwrap();
        let response = log_weight(&db, 1, "2026-01-20", 306.5, None).unwrap();

        assert_eq!(response.total_change_lb, Some(5.5));
        assert!(response
            .new_achievements
            .iter()
            .any(|a| a.code == "lost_5"));
    }

    #[test]
    fn test_weekly_summary_window_is_seven_days() {
        let db = test_db();

        // Nine qualifying days; only the last seven fall in the window
        for day in 1..=9 {
            let date = format!("2026-01-{:02}", day);
            update_daily_goals(
                &db,
                1,
                &date,
                &DailyGoalFlagsUpdate {
                    meals_logged: Some(true),
                    protein_goal_met: Some(true),
                    fast_completed: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        let response = get_weekly_summary(&db, 1, "2026-01-09").unwrap();
        assert_eq!(response.start_date, "2026-01-03");
        assert_eq!(response.summary.days_logged, 7);
        assert_eq!(response.summary.average_win_score, 3);
        assert_eq!(response.summary.current_streak, 7);
    }

    #[test]
    fn test_check_achievements_on_demand() {
        let db = test_db();

        // A single weigh-in earns nothing: no loss, no days logged
        log_weight(&db, 1, "2026-01-01", 300.0, None).unwrap();
        let response = check_achievements(&db, 1).unwrap();
        assert!(response.new_achievements.is_empty());
        assert_eq!(response.total_unlocked, 0);

        update_daily_goals(
            &db,
            1,
            "2026-01-02",
            &DailyGoalFlagsUpdate {
                meals_logged: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

        // The write path already synced, so a re-check finds nothing new
        let response = check_achievements(&db, 1).unwrap();
        assert!(response.new_achievements.is_empty());
        assert_eq!(response.total_unlocked, 1);
    }

    #[test]
    fn test_streaks_over_full_history() {
        let db = test_db();

        // Two qualifying days, then a non-qualifying one in the middle
        for (date, score3) in [
            ("2026-01-07", true),
            ("2026-01-08", false),
            ("2026-01-09", true),
        ] {
            update_daily_goals(
                &db,
                1,
                date,
                &DailyGoalFlagsUpdate {
                    meals_logged: Some(true),
                    protein_goal_met: Some(score3),
                    fast_completed: Some(score3),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        let response = get_streaks(&db, 1).unwrap();
        assert_eq!(response.streaks.current_streak, 1);
        assert_eq!(response.streaks.longest_streak, 1);
        assert_eq!(response.days_recorded, 3);
    }
}
