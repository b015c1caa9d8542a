//! Third-party HTTP integrations
//!
//! Thin proxies to the chat-completion and food-nutrition lookup services.

pub mod coach;
pub mod nutrition_api;

pub use coach::CoachClient;
pub use nutrition_api::NutritionApiClient;
