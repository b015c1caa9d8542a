//! Daily win-score and streak aggregation
//!
//! Converts the five daily habit flags into a 0-5 win score and reduces
//! sequences of daily records into streak and weekly statistics.

use serde::{Deserialize, Serialize};

/// Minimum win score for a day to count toward a streak
pub const QUALIFYING_SCORE: u8 = 3;

/// The five daily habit flags for one user and one calendar date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyGoalFlags {
    pub meals_logged: bool,
    pub protein_goal_met: bool,
    pub fast_completed: bool,
    pub exercise_done: bool,
    pub water_goal_met: bool,
}

/// Partial update of daily goal flags
///
/// Unspecified flags keep their prior values; the win score is recomputed
/// from the full merged set, never from the delta alone.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DailyGoalFlagsUpdate {
    pub meals_logged: Option<bool>,
    pub protein_goal_met: Option<bool>,
    pub fast_completed: Option<bool>,
    pub exercise_done: Option<bool>,
    pub water_goal_met: Option<bool>,
}

impl DailyGoalFlags {
    /// Win score: count of flags currently true (0-5)
    pub fn win_score(&self) -> u8 {
        [
            self.meals_logged,
            self.protein_goal_met,
            self.fast_completed,
            self.exercise_done,
            self.water_goal_met,
        ]
        .iter()
        .filter(|&&f| f)
        .count() as u8
    }

    /// Whether this day counts toward a streak
    pub fn qualifies(&self) -> bool {
        self.win_score() >= QUALIFYING_SCORE
    }

    /// Merge a partial update into this flag set
    pub fn merged(&self, update: &DailyGoalFlagsUpdate) -> Self {
        Self {
            meals_logged: update.meals_logged.unwrap_or(self.meals_logged),
            protein_goal_met: update.protein_goal_met.unwrap_or(self.protein_goal_met),
            fast_completed: update.fast_completed.unwrap_or(self.fast_completed),
            exercise_done: update.exercise_done.unwrap_or(self.exercise_done),
            water_goal_met: update.water_goal_met.unwrap_or(self.water_goal_met),
        }
    }
}

/// Streak statistics over a daily-record history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Derived weekly statistics, never stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyAggregate {
    pub days_logged: u32,
    pub average_win_score: i32,
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Compute current and longest streaks from daily flag records
///
/// `records` must be sorted descending by date with at most one record per
/// date. The current streak is the leading run of qualifying days; the
/// longest streak is the maximum run anywhere in the list. Missing dates are
/// not detected: only present records are scanned, so a gap behaves like a
/// non-qualifying day only if a record exists for it. Callers supply one
/// record per date, not one per logged entry.
pub fn compute_streaks(records: &[DailyGoalFlags]) -> StreakSummary {
    let mut current_streak: u32 = 0;
    let mut longest_streak: u32 = 0;
    let mut run: u32 = 0;
    let mut leading_run_open = true;

    for flags in records {
        if flags.qualifies() {
            run += 1;
            if run > longest_streak {
                longest_streak = run;
            }
        } else {
            if leading_run_open {
                current_streak = run;
                leading_run_open = false;
            }
            run = 0;
        }
    }

    // The list ended while the leading run was still open
    if leading_run_open {
        current_streak = run;
    }

    StreakSummary {
        current_streak,
        longest_streak,
    }
}

/// Compute weekly statistics over a caller-supplied window of daily records
///
/// `records` follow the same ordering contract as [`compute_streaks`]. An
/// empty window yields all zeros rather than dividing by zero.
pub fn compute_weekly_aggregate(records: &[DailyGoalFlags]) -> WeeklyAggregate {
    if records.is_empty() {
        return WeeklyAggregate::default();
    }

    let days_logged = records.iter().filter(|r| r.meals_logged).count() as u32;

    let score_sum: u32 = records.iter().map(|r| r.win_score() as u32).sum();
    let average_win_score = (score_sum as f64 / records.len() as f64).round() as i32;

    let streaks = compute_streaks(records);

    WeeklyAggregate {
        days_logged,
        average_win_score,
        current_streak: streaks.current_streak,
        longest_streak: streaks.longest_streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a flag set with the given win score (flags filled left to right)
    fn flags_with_score(score: u8) -> DailyGoalFlags {
        DailyGoalFlags {
            meals_logged: score >= 1,
            protein_goal_met: score >= 2,
            fast_completed: score >= 3,
            exercise_done: score >= 4,
            water_goal_met: score >= 5,
        }
    }

    #[test]
    fn test_win_score_counts_true_flags() {
        let two = DailyGoalFlags {
            meals_logged: true,
            protein_goal_met: true,
            ..Default::default()
        };
        assert_eq!(two.win_score(), 2);

        assert_eq!(flags_with_score(5).win_score(), 5);
        assert_eq!(DailyGoalFlags::default().win_score(), 0);
    }

    #[test]
    fn test_merge_preserves_unspecified_flags() {
        let existing = DailyGoalFlags {
            meals_logged: true,
            protein_goal_met: true,
            ..Default::default()
        };

        let update = DailyGoalFlagsUpdate {
            meals_logged: Some(false),
            ..Default::default()
        };

        let merged = existing.merged(&update);
        assert!(!merged.meals_logged);
        assert!(merged.protein_goal_met);
        assert_eq!(merged.win_score(), 1);
    }

    #[test]
    fn test_merge_empty_update_is_identity() {
        let existing = flags_with_score(4);
        let merged = existing.merged(&DailyGoalFlagsUpdate::default());
        assert_eq!(merged, existing);
    }

    #[test]
    fn test_streaks_reference_week() {
        // Scores [5,4,5,3,4,2,5] most-recent-first: the 2 breaks the leading
        // run of 5; the trailing 5 starts a run of 1.
        let records: Vec<DailyGoalFlags> =
            [5, 4, 5, 3, 4, 2, 5].iter().map(|&s| flags_with_score(s)).collect();

        let streaks = compute_streaks(&records);
        assert_eq!(streaks.current_streak, 5);
        assert_eq!(streaks.longest_streak, 5);
    }

    #[test]
    fn test_streaks_longest_after_break() {
        // Current streak is short, longest run sits deeper in history
        let records: Vec<DailyGoalFlags> =
            [4, 2, 5, 5, 5, 5, 1, 3].iter().map(|&s| flags_with_score(s)).collect();

        let streaks = compute_streaks(&records);
        assert_eq!(streaks.current_streak, 1);
        assert_eq!(streaks.longest_streak, 4);
    }

    #[test]
    fn test_streaks_all_qualifying() {
        let records: Vec<DailyGoalFlags> = vec![flags_with_score(3); 10];
        let streaks = compute_streaks(&records);
        assert_eq!(streaks.current_streak, 10);
        assert_eq!(streaks.longest_streak, 10);
    }

    #[test]
    fn test_streaks_leading_day_breaks() {
        let records: Vec<DailyGoalFlags> =
            [1, 3, 3, 3].iter().map(|&s| flags_with_score(s)).collect();

        let streaks = compute_streaks(&records);
        assert_eq!(streaks.current_streak, 0);
        assert_eq!(streaks.longest_streak, 3);
    }

    #[test]
    fn test_streaks_empty_history() {
        let streaks = compute_streaks(&[]);
        assert_eq!(streaks.current_streak, 0);
        assert_eq!(streaks.longest_streak, 0);
    }

    #[test]
    fn test_weekly_average_rounding() {
        // [5,4,5,3,4,2,5] sums to 28, 28/7 = 4 exactly
        let records: Vec<DailyGoalFlags> =
            [5, 4, 5, 3, 4, 2, 5].iter().map(|&s| flags_with_score(s)).collect();

        let agg = compute_weekly_aggregate(&records);
        assert_eq!(agg.average_win_score, 4);
        // Every score >= 1 sets meals_logged in the helper
        assert_eq!(agg.days_logged, 7);
        assert_eq!(agg.current_streak, 5);
        assert_eq!(agg.longest_streak, 5);
    }

    #[test]
    fn test_weekly_days_logged_counts_meal_flag_only() {
        // Three records, only one with meals_logged set
        let records = vec![
            DailyGoalFlags {
                exercise_done: true,
                water_goal_met: true,
                ..Default::default()
            },
            DailyGoalFlags {
                meals_logged: true,
                ..Default::default()
            },
            DailyGoalFlags::default(),
        ];

        let agg = compute_weekly_aggregate(&records);
        assert_eq!(agg.days_logged, 1);
        assert_eq!(agg.average_win_score, 1); // (2 + 1 + 0) / 3 = 1
    }

    #[test]
    fn test_weekly_aggregate_empty_window() {
        let agg = compute_weekly_aggregate(&[]);
        assert_eq!(agg, WeeklyAggregate::default());
    }
}
