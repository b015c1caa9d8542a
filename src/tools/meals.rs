//! Meal logging MCP tools

use serde::Serialize;

use crate::db::Database;
use crate::external::nutrition_api::FoodLookupItem;
use crate::external::NutritionApiClient;
use crate::models::{MealEntry, MealEntryCreate, MealEntryUpdate, MealType, User};

/// Macro totals across a set of meal entries
#[derive(Debug, Default, Serialize)]
pub struct MealTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// Response for list_meals
#[derive(Debug, Serialize)]
pub struct ListMealsResponse {
    pub date: String,
    pub meals: Vec<MealEntry>,
    pub totals: MealTotals,
}

/// Response for lookup_food
#[derive(Debug, Serialize)]
pub struct LookupFoodResponse {
    pub query: String,
    pub items: Vec<FoodLookupItem>,
}

fn sum_totals(meals: &[MealEntry]) -> MealTotals {
    let mut totals = MealTotals::default();
    for meal in meals {
        totals.calories += meal.calories;
        totals.protein += meal.protein;
        totals.carbs += meal.carbs;
        totals.fats += meal.fats;
    }
    totals
}

/// Log a meal for a user and date
#[allow(clippy::too_many_arguments)]
pub fn log_meal(
    db: &Database,
    user_id: i64,
    date: &str,
    meal_type: &str,
    description: &str,
    calories: f64,
    protein: f64,
    carbs: f64,
    fats: f64,
    notes: Option<String>,
) -> Result<MealEntry, String> {
    if description.trim().is_empty() {
        return Err("Description must not be empty".to_string());
    }
    if calories < 0.0 || protein < 0.0 || carbs < 0.0 || fats < 0.0 {
        return Err("Nutrition values must not be negative".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let user = User::get_by_id(&conn, user_id)
        .map_err(|e| format!("Failed to get user: {}", e))?;
    if user.is_none() {
        return Err(format!("User not found with id: {}", user_id));
    }

    let data = MealEntryCreate {
        user_id,
        date: date.to_string(),
        meal_type: MealType::from_str(meal_type),
        description: description.trim().to_string(),
        calories,
        protein,
        carbs,
        fats,
        notes,
    };

    MealEntry::create(&conn, &data).map_err(|e| format!("Failed to log meal: {}", e))
}

/// List a user's meals for a date with macro totals
pub fn list_meals(db: &Database, user_id: i64, date: &str) -> Result<ListMealsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let meals = MealEntry::list_for_date(&conn, user_id, date)
        .map_err(|e| format!("Failed to list meals: {}", e))?;

    let totals = sum_totals(&meals);

    Ok(ListMealsResponse {
        date: date.to_string(),
        meals,
        totals,
    })
}

/// Update a meal entry
pub fn update_meal(
    db: &Database,
    id: i64,
    data: &MealEntryUpdate,
) -> Result<Option<MealEntry>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    MealEntry::update(&conn, id, data).map_err(|e| format!("Failed to update meal: {}", e))
}

/// Delete a meal entry
pub fn delete_meal(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    MealEntry::delete(&conn, id).map_err(|e| format!("Failed to delete meal: {}", e))
}

/// Look up nutrition facts for a free-text food query via the external API
pub async fn lookup_food(
    client: &NutritionApiClient,
    query: &str,
) -> Result<LookupFoodResponse, String> {
    let query = query.trim();
    if query.is_empty() {
        return Err("Query must not be empty".to_string());
    }

    let items = client.lookup(query).await?;

    Ok(LookupFoodResponse {
        query: query.to_string(),
        items,
    })
}
