//! Metabolic and habit computation
//!
//! Pure functions: nutrition goal calculation, daily win scores and streaks,
//! and achievement unlock evaluation. No I/O, no database access.

pub mod achievements;
pub mod goals;
pub mod winscore;

pub use achievements::{
    evaluate_achievements, AchievementRule, ProgressStats, UnlockedAchievement, ACHIEVEMENT_RULES,
};
pub use goals::{
    basal_metabolic_rate, calculate_nutrition_goals, total_daily_energy_expenditure,
    ActivityLevel, NutritionGoals, ProfileMetrics, Sex,
};
pub use winscore::{
    compute_streaks, compute_weekly_aggregate, DailyGoalFlags, DailyGoalFlagsUpdate,
    StreakSummary, WeeklyAggregate, QUALIFYING_SCORE,
};
