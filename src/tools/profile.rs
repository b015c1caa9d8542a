//! Profile and nutrition goal MCP tools

use serde::Serialize;

use crate::db::Database;
use crate::metabolic::{
    basal_metabolic_rate, calculate_nutrition_goals, total_daily_energy_expenditure,
    NutritionGoals,
};
use crate::models::{Profile, ProfileUpdate, User};

/// Response for get_nutrition_goals
#[derive(Debug, Serialize)]
pub struct NutritionGoalsResponse {
    pub user_id: i64,
    pub goals: NutritionGoals,
    /// BMR and TDEE behind the numbers, rounded to one decimal
    pub bmr: f64,
    pub tdee: f64,
}

fn require_user(db: &Database, user_id: i64) -> Result<User, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    User::get_by_id(&conn, user_id)
        .map_err(|e| format!("Failed to get user: {}", e))?
        .ok_or_else(|| format!("User not found with id: {}", user_id))
}

/// Update a user's metabolic profile; unspecified fields are left untouched
pub fn update_profile(
    db: &Database,
    user_id: i64,
    data: &ProfileUpdate,
) -> Result<Profile, String> {
    if let Some(weight) = data.weight_lb {
        if weight <= 0.0 {
            return Err("weight_lb must be greater than 0".to_string());
        }
    }
    if let Some(height) = data.height_in {
        if height <= 0.0 {
            return Err("height_in must be greater than 0".to_string());
        }
    }
    if let Some(age) = data.age {
        if age <= 0.0 {
            return Err("age must be greater than 0".to_string());
        }
    }

    require_user(db, user_id)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Profile::upsert(&conn, user_id, data).map_err(|e| format!("Failed to update profile: {}", e))
}

/// Get a user's stored profile
pub fn get_profile(db: &Database, user_id: i64) -> Result<Option<Profile>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Profile::get(&conn, user_id).map_err(|e| format!("Failed to get profile: {}", e))
}

/// Compute daily nutrition goals from the stored profile
///
/// Errors name the missing fields when the profile is incomplete.
pub fn get_nutrition_goals(db: &Database, user_id: i64) -> Result<NutritionGoalsResponse, String> {
    require_user(db, user_id)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = Profile::get(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| {
            format!(
                "No profile for user {}. Call update_profile with weight_lb, height_in, age, sex, and activity_level first.",
                user_id
            )
        })?;

    let metrics = profile.metrics().ok_or_else(|| {
        let mut missing = Vec::new();
        if profile.weight_lb.is_none() {
            missing.push("weight_lb");
        }
        if profile.height_in.is_none() {
            missing.push("height_in");
        }
        if profile.age.is_none() {
            missing.push("age");
        }
        if profile.sex.is_none() {
            missing.push("sex");
        }
        if profile.activity_level.is_none() {
            missing.push("activity_level");
        }
        format!("Profile incomplete; missing: {}", missing.join(", "))
    })?;

    let goals = calculate_nutrition_goals(&metrics);
    let bmr = (basal_metabolic_rate(&metrics) * 10.0).round() / 10.0;
    let tdee = (total_daily_energy_expenditure(&metrics) * 10.0).round() / 10.0;

    Ok(NutritionGoalsResponse {
        user_id,
        goals,
        bmr,
        tdee,
    })
}
