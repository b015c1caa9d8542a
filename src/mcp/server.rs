//! LeanLog MCP Server Implementation
//!
//! Implements the MCP server with all LeanLog tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::external::{CoachClient, NutritionApiClient};
use crate::metabolic::DailyGoalFlagsUpdate;
use crate::models::{MealEntryUpdate, MealType, ProfileUpdate, SupplementUpdate};
use crate::tools::status::StatusTracker;
use crate::tools::{accounts, coach, fasting, goals, meals, profile, reports, supplements};

/// LeanLog MCP Service
#[derive(Clone)]
pub struct LeanLogService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    coach_client: CoachClient,
    nutrition_client: NutritionApiClient,
    tool_router: ToolRouter<LeanLogService>,
}

impl LeanLogService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            coach_client: CoachClient::from_env(),
            nutrition_client: NutritionApiClient::from_env(),
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Account Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateUserParams {
    /// Display name
    pub name: String,
    /// Email address, unique per account
    pub email: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetUserParams {
    /// User ID (preferred lookup)
    pub id: Option<i64>,
    /// Email address, used when id is absent
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteUserParams {
    /// User ID to delete; removes the account and everything it owns
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateUserParams {
    /// User ID to update
    pub id: i64,
    /// New display name (optional)
    pub name: Option<String>,
    /// New email address (optional)
    pub email: Option<String>,
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    pub user_id: i64,
    /// Body weight in pounds
    pub weight_lb: Option<f64>,
    /// Height in inches
    pub height_in: Option<f64>,
    /// Age in years
    pub age: Option<f64>,
    /// Sex: male, female, or other
    pub sex: Option<String>,
    /// Activity level: sedentary, light, moderate, active, or very_active
    pub activity_level: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserIdParams {
    pub user_id: i64,
}

// ============================================================================
// Weight Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWeightParams {
    pub user_id: i64,
    /// ISO date (YYYY-MM-DD); a second reading for the same date replaces the first
    pub date: String,
    /// Weight in pounds
    pub weight_lb: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteWeightEntryParams {
    /// Weight entry ID to delete
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WeightHistoryParams {
    pub user_id: i64,
    /// Inclusive start date (optional)
    pub start_date: Option<String>,
    /// Inclusive end date (optional)
    pub end_date: Option<String>,
}

// ============================================================================
// Meal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    pub user_id: i64,
    /// ISO date (YYYY-MM-DD)
    pub date: String,
    /// breakfast, lunch, dinner, snack, or unspecified
    #[serde(default = "default_meal_type")]
    pub meal_type: String,
    /// What was eaten
    pub description: String,
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fats: f64,
    pub notes: Option<String>,
}

fn default_meal_type() -> String {
    "unspecified".to_string()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMealsParams {
    pub user_id: i64,
    /// ISO date (YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateMealParams {
    /// Meal entry ID to update
    pub id: i64,
    pub meal_type: Option<String>,
    pub description: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteMealParams {
    /// Meal entry ID to delete
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupFoodParams {
    /// Free-text food description, e.g. "2 eggs and a slice of toast"
    pub query: String,
}

// ============================================================================
// Fasting Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StartFastParams {
    pub user_id: i64,
    /// Target fast length in hours, e.g. 16
    pub target_hours: f64,
    /// ISO 8601 start timestamp; defaults to now
    pub started_at: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EndFastParams {
    pub user_id: i64,
    /// ISO 8601 end timestamp; defaults to now
    pub ended_at: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFastsParams {
    pub user_id: i64,
    /// Maximum sessions to return (default 20)
    #[serde(default = "default_fast_limit")]
    pub limit: i64,
}

fn default_fast_limit() -> i64 {
    20
}

// ============================================================================
// Supplement Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddSupplementParams {
    pub user_id: i64,
    pub name: String,
    /// e.g. "5000 IU"
    pub dosage: Option<String>,
    /// e.g. "morning"
    pub schedule: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListSupplementsParams {
    pub user_id: i64,
    /// Only active supplements (default true)
    #[serde(default = "default_active_only")]
    pub active_only: bool,
}

fn default_active_only() -> bool {
    true
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateSupplementParams {
    /// Supplement ID to update
    pub id: i64,
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub schedule: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeactivateSupplementParams {
    /// Supplement ID to deactivate
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogSupplementDoseParams {
    pub supplement_id: i64,
    /// ISO date (YYYY-MM-DD)
    pub date: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SupplementHistoryParams {
    pub supplement_id: i64,
    /// Inclusive start date
    pub start_date: String,
    /// Inclusive end date
    pub end_date: String,
}

// ============================================================================
// Daily Goal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateDailyGoalsParams {
    pub user_id: i64,
    /// ISO date (YYYY-MM-DD)
    pub date: String,
    /// Unspecified flags keep their stored values
    pub meals_logged: Option<bool>,
    pub protein_goal_met: Option<bool>,
    pub fast_completed: Option<bool>,
    pub exercise_done: Option<bool>,
    pub water_goal_met: Option<bool>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDailyGoalsParams {
    pub user_id: i64,
    /// ISO date (YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WeeklySummaryParams {
    pub user_id: i64,
    /// Last day of the seven-day window (YYYY-MM-DD)
    pub end_date: String,
}

// ============================================================================
// Coaching Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetCoachingParams {
    pub user_id: i64,
    /// What to coach on, e.g. "plateau" or "motivation" (default: general check-in)
    #[serde(default)]
    pub topic: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListCoachingMessagesParams {
    pub user_id: i64,
    /// Maximum messages to return (default 10)
    #[serde(default = "default_coaching_limit")]
    pub limit: i64,
}

fn default_coaching_limit() -> i64 {
    10
}

// ============================================================================
// Report Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportProgressReportParams {
    pub user_id: i64,
    /// Inclusive start date (YYYY-MM-DD)
    pub start_date: String,
    /// Inclusive end date (YYYY-MM-DD)
    pub end_date: String,
    /// Absolute path for the PDF file
    pub output_path: String,
}

// ============================================================================
// Helpers
// ============================================================================

fn json_result<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn json_option<T: serde::Serialize>(
    value: Option<T>,
    not_found: String,
) -> Result<CallToolResult, McpError> {
    match value {
        Some(v) => json_result(&v),
        None => {
            let json = format!(r#"{{"error": "{}"}}"#, not_found);
            Ok(CallToolResult::success(vec![Content::text(json)]))
        }
    }
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl LeanLogService {
    // --- Status ---

    #[tool(description = "Get the current status of the LeanLog service including build info, database status, and process information")]
    async fn leanlog_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        json_result(&status)
    }

    #[tool(description = "Get step-by-step instructions for daily weight-loss tracking. Call this when starting a tracking session or when unsure how to use the LeanLog tools.")]
    fn tracking_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::TRACKING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(TRACKING_INSTRUCTIONS)]))
    }

    // --- Accounts ---

    #[tool(description = "Create a user account")]
    fn create_user(&self, Parameters(p): Parameters<CreateUserParams>) -> Result<CallToolResult, McpError> {
        let result = accounts::create_user(&self.database, &p.name, &p.email)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a user account by id or email")]
    fn get_user(&self, Parameters(p): Parameters<GetUserParams>) -> Result<CallToolResult, McpError> {
        let result = accounts::get_user(&self.database, p.id, p.email.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_option(result, "User not found".to_string())
    }

    #[tool(description = "List all user accounts")]
    fn list_users(&self) -> Result<CallToolResult, McpError> {
        let result = accounts::list_users(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a user's name or email")]
    fn update_user(&self, Parameters(p): Parameters<UpdateUserParams>) -> Result<CallToolResult, McpError> {
        let result = accounts::update_user(&self.database, p.id, p.name, p.email)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_option(result, format!("User not found with id: {}", p.id))
    }

    #[tool(description = "Delete a user account and all of its records")]
    fn delete_user(&self, Parameters(p): Parameters<DeleteUserParams>) -> Result<CallToolResult, McpError> {
        let deleted = accounts::delete_user(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&serde_json::json!({ "deleted": deleted, "id": p.id }))
    }

    // --- Profile & Nutrition Goals ---

    #[tool(description = "Update a user's metabolic profile (weight, height, age, sex, activity level). Unspecified fields are left untouched.")]
    fn update_profile(&self, Parameters(p): Parameters<UpdateProfileParams>) -> Result<CallToolResult, McpError> {
        let data = ProfileUpdate {
            weight_lb: p.weight_lb,
            height_in: p.height_in,
            age: p.age,
            sex: p.sex,
            activity_level: p.activity_level,
        };
        let result = profile::update_profile(&self.database, p.user_id, &data)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a user's stored metabolic profile")]
    fn get_profile(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database, p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_option(result, format!("No profile for user {}", p.user_id))
    }

    #[tool(description = "Compute daily nutrition goals (calories, protein, carbs, fats, fiber) from the stored profile using Mifflin-St Jeor BMR, an activity multiplier, and a 500 kcal deficit")]
    fn get_nutrition_goals(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let result = profile::get_nutrition_goals(&self.database, p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Weight ---

    #[tool(description = "Record a weight for a date. A second reading for the same date replaces the first. Reports newly unlocked achievements.")]
    fn log_weight(&self, Parameters(p): Parameters<LogWeightParams>) -> Result<CallToolResult, McpError> {
        let result = goals::log_weight(&self.database, p.user_id, &p.date, p.weight_lb, p.notes.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a weight entry, e.g. to remove a mistaken reading")]
    fn delete_weight_entry(&self, Parameters(p): Parameters<DeleteWeightEntryParams>) -> Result<CallToolResult, McpError> {
        let deleted = goals::delete_weight_entry(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&serde_json::json!({ "deleted": deleted, "id": p.id }))
    }

    #[tool(description = "Weight history for a user with starting/latest weight and total change")]
    fn get_weight_history(&self, Parameters(p): Parameters<WeightHistoryParams>) -> Result<CallToolResult, McpError> {
        let result = goals::get_weight_history(&self.database, p.user_id, p.start_date.as_deref(), p.end_date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Meals ---

    #[tool(description = "Log a meal with its calories and macros")]
    fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let result = meals::log_meal(
            &self.database, p.user_id, &p.date, &p.meal_type, &p.description,
            p.calories, p.protein, p.carbs, p.fats, p.notes,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List a user's meals for a date with calorie and macro totals")]
    fn list_meals(&self, Parameters(p): Parameters<ListMealsParams>) -> Result<CallToolResult, McpError> {
        let result = meals::list_meals(&self.database, p.user_id, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a meal entry; unspecified fields are left untouched")]
    fn update_meal(&self, Parameters(p): Parameters<UpdateMealParams>) -> Result<CallToolResult, McpError> {
        let data = MealEntryUpdate {
            meal_type: p.meal_type.as_deref().map(MealType::from_str),
            description: p.description,
            calories: p.calories,
            protein: p.protein,
            carbs: p.carbs,
            fats: p.fats,
            notes: p.notes,
        };
        let result = meals::update_meal(&self.database, p.id, &data)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_option(result, format!("Meal entry not found with id: {}", p.id))
    }

    #[tool(description = "Delete a meal entry")]
    fn delete_meal(&self, Parameters(p): Parameters<DeleteMealParams>) -> Result<CallToolResult, McpError> {
        let deleted = meals::delete_meal(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&serde_json::json!({ "deleted": deleted, "id": p.id }))
    }

    #[tool(description = "Look up per-serving calories and macros for a free-text food description via the external nutrition API")]
    async fn lookup_food(&self, Parameters(p): Parameters<LookupFoodParams>) -> Result<CallToolResult, McpError> {
        let result = meals::lookup_food(&self.nutrition_client, &p.query)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Fasting ---

    #[tool(description = "Start a timed fast with a target duration in hours")]
    fn start_fast(&self, Parameters(p): Parameters<StartFastParams>) -> Result<CallToolResult, McpError> {
        let result = fasting::start_fast(&self.database, p.user_id, p.target_hours, p.started_at, p.notes)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "End the active fast. Marks it completed when the target duration was reached.")]
    fn end_fast(&self, Parameters(p): Parameters<EndFastParams>) -> Result<CallToolResult, McpError> {
        let result = fasting::end_fast(&self.database, p.user_id, p.ended_at)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "The currently active fast with elapsed and remaining hours")]
    fn get_fast_status(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let result = fasting::get_fast_status(&self.database, p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List past fasting sessions, newest first, with the completed total")]
    fn list_fasts(&self, Parameters(p): Parameters<ListFastsParams>) -> Result<CallToolResult, McpError> {
        let result = fasting::list_fasts(&self.database, p.user_id, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Supplements ---

    #[tool(description = "Add a supplement to a user's regimen")]
    fn add_supplement(&self, Parameters(p): Parameters<AddSupplementParams>) -> Result<CallToolResult, McpError> {
        let result = supplements::add_supplement(&self.database, p.user_id, &p.name, p.dosage, p.schedule, p.notes)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List a user's supplements (active only by default)")]
    fn list_supplements(&self, Parameters(p): Parameters<ListSupplementsParams>) -> Result<CallToolResult, McpError> {
        let result = supplements::list_supplements(&self.database, p.user_id, p.active_only)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a supplement's details; unspecified fields are left untouched")]
    fn update_supplement(&self, Parameters(p): Parameters<UpdateSupplementParams>) -> Result<CallToolResult, McpError> {
        let data = SupplementUpdate {
            name: p.name,
            dosage: p.dosage,
            schedule: p.schedule,
            notes: p.notes,
        };
        let result = supplements::update_supplement(&self.database, p.id, &data)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_option(result, format!("Supplement not found with id: {}", p.id))
    }

    #[tool(description = "Deactivate a supplement, preserving its dose history")]
    fn deactivate_supplement(&self, Parameters(p): Parameters<DeactivateSupplementParams>) -> Result<CallToolResult, McpError> {
        let result = supplements::deactivate_supplement(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Record a supplement dose taken on a date")]
    fn log_supplement_dose(&self, Parameters(p): Parameters<LogSupplementDoseParams>) -> Result<CallToolResult, McpError> {
        let result = supplements::log_supplement_dose(&self.database, p.supplement_id, &p.date, p.notes.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Dose history for a supplement within a date range")]
    fn supplement_history(&self, Parameters(p): Parameters<SupplementHistoryParams>) -> Result<CallToolResult, McpError> {
        let result = supplements::supplement_history(&self.database, p.supplement_id, &p.start_date, &p.end_date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Daily Goals & Progress ---

    #[tool(description = "Update the five daily habit flags for a date. Unspecified flags keep their stored values; the win score is recomputed from the merged set. Reports newly unlocked achievements.")]
    fn update_daily_goals(&self, Parameters(p): Parameters<UpdateDailyGoalsParams>) -> Result<CallToolResult, McpError> {
        let update = DailyGoalFlagsUpdate {
            meals_logged: p.meals_logged,
            protein_goal_met: p.protein_goal_met,
            fast_completed: p.fast_completed,
            exercise_done: p.exercise_done,
            water_goal_met: p.water_goal_met,
        };
        let result = goals::update_daily_goals(&self.database, p.user_id, &p.date, &update)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get the habit flags and win score for a user and date")]
    fn get_daily_goals(&self, Parameters(p): Parameters<GetDailyGoalsParams>) -> Result<CallToolResult, McpError> {
        let result = goals::get_daily_goals(&self.database, p.user_id, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_option(result, format!("No goal record for {} on {}", p.user_id, p.date))
    }

    #[tool(description = "Current and longest streaks of qualifying days (win score >= 3) over the full goal history")]
    fn get_streaks(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let result = goals::get_streaks(&self.database, p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Weekly roll-up (days logged, average win score, streaks) over the seven days ending at end_date")]
    fn get_weekly_summary(&self, Parameters(p): Parameters<WeeklySummaryParams>) -> Result<CallToolResult, McpError> {
        let result = goals::get_weekly_summary(&self.database, p.user_id, &p.end_date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Re-evaluate achievement rules for a user and unlock anything newly earned")]
    fn check_achievements(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let result = goals::check_achievements(&self.database, p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List a user's unlocked achievements")]
    fn list_achievements(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let result = goals::list_achievements(&self.database, p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Coaching ---

    #[tool(description = "Generate a short coaching message from the user's recent numbers via the external chat API, and store it")]
    async fn get_coaching(&self, Parameters(p): Parameters<GetCoachingParams>) -> Result<CallToolResult, McpError> {
        let result = coach::get_coaching(&self.database, &self.coach_client, p.user_id, &p.topic)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List stored coaching messages, newest first")]
    fn list_coaching_messages(&self, Parameters(p): Parameters<ListCoachingMessagesParams>) -> Result<CallToolResult, McpError> {
        let result = coach::list_coaching_messages(&self.database, p.user_id, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Reports ---

    #[tool(description = "Generate a PDF progress report with the weight trend chart, win-score history, and streak summary for a date range")]
    fn export_progress_report(&self, Parameters(p): Parameters<ExportProgressReportParams>) -> Result<CallToolResult, McpError> {
        let result = reports::generate_progress_report(&self.database, p.user_id, &p.start_date, &p.end_date, &p.output_path)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for LeanLogService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "leanlog".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("LeanLog".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "LeanLog - Weight loss, habit, and metabolic goal tracking. \
                 IMPORTANT: Call tracking_instructions when starting a tracking session. \
                 Accounts: create/get/list/update_user. \
                 Profile: update_profile/get_profile, get_nutrition_goals (Mifflin-St Jeor with 500 kcal deficit). \
                 Weight: log_weight/get_weight_history. \
                 Meals: log_meal/list_meals/update_meal/delete_meal, lookup_food for unknown macros. \
                 Fasting: start_fast/end_fast/get_fast_status/list_fasts. \
                 Supplements: add/list/update/deactivate_supplement, log_supplement_dose, supplement_history. \
                 Daily goals: update_daily_goals merges the five habit flags and recomputes the 0-5 win score; \
                 get_daily_goals/get_streaks/get_weekly_summary/list_achievements. \
                 Coaching: get_coaching/list_coaching_messages. \
                 Reports: export_progress_report writes a PDF."
                    .into(),
            ),
        }
    }
}
