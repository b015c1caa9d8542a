//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // Get current version
    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Run migrations
    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USERS
        -- One row per account
        -- ============================================
        CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,

            -- Metadata
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_users_email ON users(email);

        -- ============================================
        -- PROFILES
        -- Metabolic profile, one per user
        -- ============================================
        CREATE TABLE profiles (
            user_id INTEGER PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
            weight_lb REAL,                      -- body weight in pounds
            height_in REAL,                      -- height in inches
            age REAL,                            -- age in years
            sex TEXT CHECK(sex IN ('male', 'female', 'other')),
            activity_level TEXT CHECK(activity_level IN
                ('sedentary', 'light', 'moderate', 'active', 'very_active')),

            -- Metadata
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- WEIGHT ENTRIES
        -- Daily scale readings
        -- ============================================
        CREATE TABLE weight_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            date TEXT NOT NULL,                  -- ISO date: "2026-01-09"
            weight_lb REAL NOT NULL,

            -- Metadata
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),

            UNIQUE(user_id, date)                -- one reading per day
        );

        CREATE INDEX idx_weight_entries_user_date ON weight_entries(user_id, date);

        -- ============================================
        -- MEAL ENTRIES
        -- What was actually consumed
        -- ============================================
        CREATE TABLE meal_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            date TEXT NOT NULL,                  -- ISO date
            meal_type TEXT NOT NULL CHECK(meal_type IN ('breakfast', 'lunch', 'dinner', 'snack', 'unspecified')),
            description TEXT NOT NULL,

            -- Nutrition as consumed
            calories REAL NOT NULL DEFAULT 0,
            protein REAL NOT NULL DEFAULT 0,     -- grams
            carbs REAL NOT NULL DEFAULT 0,       -- grams
            fats REAL NOT NULL DEFAULT 0,        -- grams

            -- Metadata
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meal_entries_user_date ON meal_entries(user_id, date);
        CREATE INDEX idx_meal_entries_type ON meal_entries(meal_type);

        -- ============================================
        -- FASTING SESSIONS
        -- Timed fasts with a target duration
        -- ============================================
        CREATE TABLE fasting_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            started_at TEXT NOT NULL,
            ended_at TEXT,                       -- null while the fast is active
            target_hours REAL NOT NULL DEFAULT 16.0,
            completed INTEGER NOT NULL DEFAULT 0, -- boolean: ended at/after target

            -- Metadata
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_fasting_sessions_user ON fasting_sessions(user_id, started_at);

        -- ============================================
        -- SUPPLEMENTS
        -- The supplement regimen (what should be taken)
        -- ============================================
        CREATE TABLE supplements (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            dosage TEXT,                         -- e.g., "5000 IU", "2 capsules"
            schedule TEXT,                       -- e.g., "morning", "with dinner"
            active INTEGER NOT NULL DEFAULT 1,   -- boolean

            -- Metadata
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_supplements_user ON supplements(user_id, active);

        -- ============================================
        -- SUPPLEMENT LOGS
        -- Individual doses taken
        -- ============================================
        CREATE TABLE supplement_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            supplement_id INTEGER NOT NULL REFERENCES supplements(id) ON DELETE CASCADE,
            date TEXT NOT NULL,                  -- ISO date
            taken_at TEXT NOT NULL DEFAULT (datetime('now')),

            -- Metadata
            notes TEXT
        );

        CREATE INDEX idx_supplement_logs_supplement_date ON supplement_logs(supplement_id, date);

        -- ============================================
        -- DAILY GOALS
        -- Five habit flags per user per day; win_score is the count of set flags
        -- ============================================
        CREATE TABLE daily_goals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            date TEXT NOT NULL,                  -- ISO date

            meals_logged INTEGER NOT NULL DEFAULT 0,
            protein_goal_met INTEGER NOT NULL DEFAULT 0,
            fast_completed INTEGER NOT NULL DEFAULT 0,
            exercise_done INTEGER NOT NULL DEFAULT 0,
            water_goal_met INTEGER NOT NULL DEFAULT 0,

            win_score INTEGER NOT NULL DEFAULT 0, -- derived: count of set flags (0-5)

            -- Metadata
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),

            UNIQUE(user_id, date)                -- one record per user per day
        );

        CREATE INDEX idx_daily_goals_user_date ON daily_goals(user_id, date);

        -- ============================================
        -- ACHIEVEMENTS
        -- Unlocked achievement codes, never re-awarded
        -- ============================================
        CREATE TABLE achievements (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            code TEXT NOT NULL,
            unlocked_at TEXT NOT NULL DEFAULT (datetime('now')),

            UNIQUE(user_id, code)
        );

        CREATE INDEX idx_achievements_user ON achievements(user_id);

        -- ============================================
        -- COACHING MESSAGES
        -- AI-generated coaching content, stored for review
        -- ============================================
        CREATE TABLE coaching_messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            topic TEXT NOT NULL,
            content TEXT NOT NULL,
            model TEXT,                          -- model that produced the content

            -- Metadata
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_coaching_messages_user ON coaching_messages(user_id);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}
