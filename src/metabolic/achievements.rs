//! Achievement unlock evaluation
//!
//! Pure rule evaluator: given aggregate progress stats and the set of codes
//! already unlocked, returns the newly unlocked achievements.

use serde::Serialize;

/// Aggregate progress statistics the rules are evaluated against
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressStats {
    pub total_days_logged: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Days with a perfect win score of 5
    pub perfect_days: u32,
    /// Pounds lost since the first recorded weight (negative when gaining)
    pub pounds_lost: f64,
    pub fasts_completed: u32,
}

/// A single achievement rule
pub struct AchievementRule {
    pub code: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    check: fn(&ProgressStats) -> bool,
}

/// An achievement the evaluator has just unlocked
#[derive(Debug, Clone, Serialize)]
pub struct UnlockedAchievement {
    pub code: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// Static rule table, evaluated in order
pub const ACHIEVEMENT_RULES: &[AchievementRule] = &[
    AchievementRule {
        code: "first_day",
        title: "Day One",
        description: "Log your first day of meals",
        check: |s| s.total_days_logged >= 1,
    },
    AchievementRule {
        code: "week_logged",
        title: "Consistency",
        description: "Log meals on 7 days",
        check: |s| s.total_days_logged >= 7,
    },
    AchievementRule {
        code: "month_logged",
        title: "Habit Formed",
        description: "Log meals on 30 days",
        check: |s| s.total_days_logged >= 30,
    },
    AchievementRule {
        code: "streak_3",
        title: "On a Roll",
        description: "Hit a 3-day win streak",
        check: |s| s.longest_streak >= 3,
    },
    AchievementRule {
        code: "streak_7",
        title: "Full Week",
        description: "Hit a 7-day win streak",
        check: |s| s.longest_streak >= 7,
    },
    AchievementRule {
        code: "streak_30",
        title: "Unstoppable",
        description: "Hit a 30-day win streak",
        check: |s| s.longest_streak >= 30,
    },
    AchievementRule {
        code: "perfect_day",
        title: "Perfect Five",
        description: "Score 5/5 on a single day",
        check: |s| s.perfect_days >= 1,
    },
    AchievementRule {
        code: "perfect_week",
        title: "Flawless",
        description: "Score 5/5 on 7 days",
        check: |s| s.perfect_days >= 7,
    },
    AchievementRule {
        code: "lost_5",
        title: "First Five",
        description: "Lose 5 pounds",
        check: |s| s.pounds_lost >= 5.0,
    },
    AchievementRule {
        code: "lost_10",
        title: "Ten Down",
        description: "Lose 10 pounds",
        check: |s| s.pounds_lost >= 10.0,
    },
    AchievementRule {
        code: "lost_25",
        title: "Quarter Century",
        description: "Lose 25 pounds",
        check: |s| s.pounds_lost >= 25.0,
    },
    AchievementRule {
        code: "first_fast",
        title: "Fast Start",
        description: "Complete your first fast",
        check: |s| s.fasts_completed >= 1,
    },
    AchievementRule {
        code: "ten_fasts",
        title: "Fasting Veteran",
        description: "Complete 10 fasts",
        check: |s| s.fasts_completed >= 10,
    },
];

/// Evaluate all rules against the stats, skipping already-unlocked codes
///
/// An unlocked code is never re-awarded; the caller persists the returned
/// codes and feeds them back on the next evaluation.
pub fn evaluate_achievements(
    stats: &ProgressStats,
    already_unlocked: &[String],
) -> Vec<UnlockedAchievement> {
    ACHIEVEMENT_RULES
        .iter()
        .filter(|rule| !already_unlocked.iter().any(|c| c == rule.code))
        .filter(|rule| (rule.check)(stats))
        .map(|rule| UnlockedAchievement {
            code: rule.code,
            title: rule.title,
            description: rule.description,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_stats_no_unlocks() {
        let unlocked = evaluate_achievements(&ProgressStats::default(), &[]);
        assert!(unlocked.is_empty());
    }

    #[test]
    fn test_first_day_and_streak() {
        let stats = ProgressStats {
            total_days_logged: 1,
            longest_streak: 3,
            current_streak: 3,
            ..Default::default()
        };

        let codes: Vec<&str> = evaluate_achievements(&stats, &[])
            .iter()
            .map(|a| a.code)
            .collect();

        assert_eq!(codes, vec!["first_day", "streak_3"]);
    }

    #[test]
    fn test_already_unlocked_not_reawarded() {
        let stats = ProgressStats {
            total_days_logged: 10,
            longest_streak: 3,
            ..Default::default()
        };

        let already = vec!["first_day".to_string(), "streak_3".to_string()];
        let codes: Vec<&str> = evaluate_achievements(&stats, &already)
            .iter()
            .map(|a| a.code)
            .collect();

        assert_eq!(codes, vec!["week_logged"]);
    }

    #[test]
    fn test_weight_loss_thresholds() {
        let stats = ProgressStats {
            pounds_lost: 12.5,
            ..Default::default()
        };

        let codes: Vec<&str> = evaluate_achievements(&stats, &[])
            .iter()
            .map(|a| a.code)
            .collect();

        assert!(codes.contains(&"lost_5"));
        assert!(codes.contains(&"lost_10"));
        assert!(!codes.contains(&"lost_25"));
    }

    #[test]
    fn test_weight_gain_unlocks_nothing() {
        let stats = ProgressStats {
            pounds_lost: -4.0,
            ..Default::default()
        };
        let codes: Vec<&str> = evaluate_achievements(&stats, &[])
            .iter()
            .map(|a| a.code)
            .collect();
        assert!(!codes.iter().any(|c| c.starts_with("lost_")));
    }

    #[test]
    fn test_rule_codes_unique() {
        let mut codes: Vec<&str> = ACHIEVEMENT_RULES.iter().map(|r| r.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), ACHIEVEMENT_RULES.len());
    }
}
