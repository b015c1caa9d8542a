//! LeanLog Status Tool
//!
//! Provides runtime status information about the LeanLog service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Daily tracking instructions for AI assistants
pub const TRACKING_INSTRUCTIONS: &str = r#"
# LeanLog Daily Tracking Instructions

This guide explains how to run a user's daily weight-loss tracking with the
LeanLog tools.

## Overview

LeanLog tracks, per user:
1. **Profile** - Weight, height, age, sex, activity level (drives nutrition goals)
2. **Weight** - One scale reading per day
3. **Meals** - Free-form entries with calories and macros
4. **Fasts** - Timed fasting sessions with a target duration
5. **Supplements** - A regimen plus a dose log
6. **Daily Goals** - Five habit flags that roll up into a win score

## The Win Score

Each day has five boolean flags:

| Flag | Meaning |
|------|---------|
| `meals_logged` | All meals for the day were recorded |
| `protein_goal_met` | Protein intake reached the daily goal |
| `fast_completed` | A fast reached its target duration |
| `exercise_done` | Any intentional exercise happened |
| `water_goal_met` | Water intake reached the daily goal |

The **win score** is simply how many of the five are true (0-5). A day with a
score of **3 or more** counts toward the streak. Streaks are consecutive
qualifying days ending at the most recent recorded day.

**Flag updates merge.** Calling `update_daily_goals` with only
`exercise_done: true` leaves the other four flags exactly as they were. Set a
flag to `false` explicitly to clear it. The score is always recomputed from
the full merged set.

## Nutrition Goals

`get_nutrition_goals` computes daily targets from the stored profile using
Mifflin-St Jeor BMR, an activity multiplier, and a fixed 500 kcal deficit:

- Calories = TDEE - 500
- Protein = 0.75 g per lb of body weight
- Fats = 0.35 g per lb of body weight
- Carbs = remaining calories at 4 kcal/g
- Fiber = 35 g

The profile must be complete (weight, height, age, sex, activity level) or the
tool reports which fields are missing. Keep the profile weight current by
copying in the latest scale reading when it drifts.

Activity levels: `sedentary`, `light`, `moderate`, `active`, `very_active`.

## Daily Workflow

1. `log_weight(user_id, date, weight_lb)` - Morning scale reading
2. `log_meal(...)` for each meal, with calories/protein/carbs/fats
3. `start_fast` after the last meal; `end_fast` when the fast breaks
4. `log_supplement_dose` for each supplement taken
5. `update_daily_goals(user_id, date, ...)` - Set the flags that were earned
6. `get_streaks` / `get_weekly_summary` - Show progress

Dates use ISO format: YYYY-MM-DD. Do not guess the current date; ask the user
or use a calendar tool if one is available.

## Setting Flags Honestly

- `meals_logged`: set only when the user confirms the day is fully logged
- `protein_goal_met`: compare the day's protein total from `list_meals`
  against the `protein_g` goal from `get_nutrition_goals`
- `fast_completed`: set when `end_fast` returns `completed: true`
- `exercise_done` / `water_goal_met`: user's word is enough

## Achievements

`update_daily_goals` and `log_weight` check achievement rules automatically
and report anything newly unlocked. `list_achievements` shows the full set.
Never unlock anything by hand.

## Coaching

`get_coaching` generates a short coaching message from the user's recent
numbers (weight trend, streak, weekly average) via an external chat API and
stores it. `list_coaching_messages` retrieves past messages. Requires the
LEANLOG_COACH_API_KEY environment variable.

## Food Lookup

`lookup_food` queries an external nutrition API for per-serving calories and
macros of a free-text food description. Use it to fill in `log_meal` values
the user does not know. Requires LEANLOG_NUTRITION_API_KEY.

## Reports

`export_progress_report` writes a PDF with the weight trend chart, win-score
history, and streak summary for a date range. Give the user the returned file
path.

## Quick Reference

| Task | Tool |
|------|------|
| Create account | `create_user` |
| Find account | `get_user` / `list_users` |
| Update profile | `update_profile` |
| Daily targets | `get_nutrition_goals` |
| Record weight | `log_weight` |
| Weight history | `get_weight_history` |
| Log a meal | `log_meal` |
| Day's meals + totals | `list_meals` |
| Fix a meal | `update_meal` / `delete_meal` |
| Look up food macros | `lookup_food` |
| Start/end a fast | `start_fast` / `end_fast` |
| Current fast | `get_fast_status` |
| Manage regimen | `add_supplement` / `list_supplements` / `deactivate_supplement` |
| Record a dose | `log_supplement_dose` |
| Set habit flags | `update_daily_goals` |
| Day's flags + score | `get_daily_goals` |
| Streaks | `get_streaks` |
| Week roll-up | `get_weekly_summary` |
| Unlocked achievements | `list_achievements` |
| Coaching message | `get_coaching` |
| PDF report | `export_progress_report` |
"#;

/// Runtime status of the LeanLog service
#[derive(Debug, Clone, Serialize)]
pub struct LeanLogStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> LeanLogStatus {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        LeanLogStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
