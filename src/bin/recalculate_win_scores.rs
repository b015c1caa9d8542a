//! Simple utility to recalculate stored win scores from the habit flag columns
//! Usage: cargo run --bin recalculate_win_scores -- [user_id]

use std::path::PathBuf;

fn get_database_path() -> PathBuf {
    std::env::var("LEANLOG_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("leanlog.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let user_filter: Option<i64> = args.get(1).map(|s| s.parse()).transpose()?;

    let db_path = get_database_path();
    println!("Database: {}", db_path.display());

    let database = leanlog::db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        let users = leanlog::models::User::list(conn)?;
        let users: Vec<_> = users
            .into_iter()
            .filter(|u| user_filter.map_or(true, |id| u.id == id))
            .collect();

        if users.is_empty() {
            println!("No matching users");
            return Ok(());
        }

        for user in &users {
            let history = leanlog::models::DailyGoal::history_descending(conn, user.id)?;
            println!(
                "\nUser {} ({}): {} goal records",
                user.id,
                user.name,
                history.len()
            );

            let mut fixed = 0;
            for goal in &history {
                let expected = goal.flags.win_score();
                if expected != goal.win_score {
                    println!(
                        "  {}: stored {} -> recalculated {}",
                        goal.date, goal.win_score, expected
                    );
                    conn.execute(
                        "UPDATE daily_goals SET win_score = ?1, updated_at = datetime('now')
                         WHERE id = ?2",
                        rusqlite::params![expected as i64, goal.id],
                    )?;
                    fixed += 1;
                }
            }

            if fixed == 0 {
                println!("  All win scores consistent");
            } else {
                println!("  Fixed {} record(s)", fixed);
            }
        }

        Ok(())
    })?;

    Ok(())
}
