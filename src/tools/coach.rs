//! Coaching MCP tools
//!
//! Builds a prompt from the user's recent numbers, asks the chat API for a
//! short coaching message, and stores the result.

use crate::db::Database;
use crate::external::CoachClient;
use crate::metabolic::compute_streaks;
use crate::models::{
    CoachingMessage, CoachingMessageCreate, DailyGoal, Profile, User, WeightEntry,
};

const COACH_SYSTEM_PROMPT: &str = "You are a supportive, practical weight-loss coach. \
Keep responses under 150 words. Be specific about the user's numbers, celebrate real \
progress, and suggest one concrete next step. Never give medical advice.";

/// Snapshot of user data the prompt is built from
struct CoachContext {
    user_name: String,
    current_weight: Option<f64>,
    total_change_lb: Option<f64>,
    current_streak: u32,
    longest_streak: u32,
    days_recorded: usize,
}

fn load_context(db: &Database, user_id: i64) -> Result<CoachContext, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let user = User::get_by_id(&conn, user_id)
        .map_err(|e| format!("Failed to get user: {}", e))?
        .ok_or_else(|| format!("User not found with id: {}", user_id))?;

    let weights = WeightEntry::first_and_latest(&conn, user_id)
        .map_err(|e| format!("Failed to load weight history: {}", e))?;

    let current_weight = weights
        .as_ref()
        .map(|(_, latest)| latest.weight_lb)
        .or_else(|| {
            Profile::get(&conn, user_id)
                .ok()
                .flatten()
                .and_then(|p| p.weight_lb)
        });
    let total_change_lb = weights.map(|(first, latest)| first.weight_lb - latest.weight_lb);

    let history = DailyGoal::history_descending(&conn, user_id)
        .map_err(|e| format!("Failed to load goal history: {}", e))?;
    let flags: Vec<_> = history.iter().map(|g| g.flags).collect();
    let streaks = compute_streaks(&flags);

    Ok(CoachContext {
        user_name: user.name,
        current_weight,
        total_change_lb,
        current_streak: streaks.current_streak,
        longest_streak: streaks.longest_streak,
        days_recorded: history.len(),
    })
}

fn build_prompt(ctx: &CoachContext, topic: &str) -> String {
    let mut lines = vec![format!("Coaching topic: {}", topic)];
    lines.push(format!("User: {}", ctx.user_name));

    if let Some(weight) = ctx.current_weight {
        lines.push(format!("Current weight: {:.1} lb", weight));
    }
    match ctx.total_change_lb {
        Some(change) if change >= 0.0 => lines.push(format!("Lost so far: {:.1} lb", change)),
        Some(change) => lines.push(format!("Gained so far: {:.1} lb", -change)),
        None => {}
    }
    lines.push(format!(
        "Habit streak: {} days current, {} days best, {} days tracked overall",
        ctx.current_streak, ctx.longest_streak, ctx.days_recorded
    ));

    lines.join("\n")
}

/// Generate a coaching message for a user and store it
pub async fn get_coaching(
    db: &Database,
    client: &CoachClient,
    user_id: i64,
    topic: &str,
) -> Result<CoachingMessage, String> {
    let topic = if topic.trim().is_empty() {
        "general check-in"
    } else {
        topic.trim()
    };

    let ctx = load_context(db, user_id)?;
    let prompt = build_prompt(&ctx, topic);

    let reply = client.generate(COACH_SYSTEM_PROMPT, &prompt).await?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    CoachingMessage::create(
        &conn,
        &CoachingMessageCreate {
            user_id,
            topic: topic.to_string(),
            content: reply.content,
            model: reply.model,
        },
    )
    .map_err(|e| format!("Failed to store coaching message: {}", e))
}

/// List stored coaching messages, newest first
pub fn list_coaching_messages(
    db: &Database,
    user_id: i64,
    limit: i64,
) -> Result<Vec<CoachingMessage>, String> {
    let limit = limit.clamp(1, 100);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    CoachingMessage::list(&conn, user_id, limit)
        .map_err(|e| format!("Failed to list coaching messages: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_progress_lines() {
        let ctx = CoachContext {
            user_name: "Robert".to_string(),
            current_weight: Some(306.5),
            total_change_lb: Some(5.5),
            current_streak: 4,
            longest_streak: 9,
            days_recorded: 30,
        };

        let prompt = build_prompt(&ctx, "plateau");
        assert!(prompt.contains("plateau"));
        assert!(prompt.contains("306.5 lb"));
        assert!(prompt.contains("Lost so far: 5.5 lb"));
        assert!(prompt.contains("4 days current"));
    }

    #[test]
    fn test_prompt_reports_gain_without_negative_sign() {
        let ctx = CoachContext {
            user_name: "Robert".to_string(),
            current_weight: Some(315.0),
            total_change_lb: Some(-3.0),
            current_streak: 0,
            longest_streak: 2,
            days_recorded: 5,
        };

        let prompt = build_prompt(&ctx, "motivation");
        assert!(prompt.contains("Gained so far: 3.0 lb"));
        assert!(!prompt.contains("-3.0"));
    }
}
