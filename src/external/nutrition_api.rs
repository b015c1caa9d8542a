//! Food-nutrition lookup client
//!
//! Thin proxy to a food-search endpoint returning per-serving calories and
//! macros. API key and base URL come from the environment.

use serde::{Deserialize, Serialize};

/// Default endpoint when LEANLOG_NUTRITION_API_URL is unset
const DEFAULT_API_URL: &str = "https://api.calorieninjas.com/v1/nutrition";

/// One food item from the lookup service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLookupItem {
    pub name: String,
    #[serde(default)]
    pub serving_size_g: f64,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbohydrates_total_g: f64,
    #[serde(default)]
    pub fat_total_g: f64,
    #[serde(default)]
    pub fiber_g: f64,
}

#[derive(Debug, Deserialize)]
struct FoodLookupResponse {
    items: Vec<FoodLookupItem>,
}

/// Nutrition lookup API client
#[derive(Clone)]
pub struct NutritionApiClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl NutritionApiClient {
    /// Build a client from environment configuration
    pub fn from_env() -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: std::env::var("LEANLOG_NUTRITION_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_key: std::env::var("LEANLOG_NUTRITION_API_KEY").ok(),
        }
    }

    /// Look up nutrition facts for a free-text food query
    pub async fn lookup(&self, query: &str) -> Result<Vec<FoodLookupItem>, String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| "LEANLOG_NUTRITION_API_KEY is not set".to_string())?;

        let response = self
            .http
            .get(&self.api_url)
            .header("X-Api-Key", api_key)
            .query(&[("query", query)])
            .send()
            .await
            .map_err(|e| format!("Nutrition API request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Nutrition API returned {}: {}", status, body));
        }

        let parsed: FoodLookupResponse = response
            .json()
            .await
            .map_err(|e| format!("Nutrition API response decode failed: {}", e))?;

        Ok(parsed.items)
    }
}
