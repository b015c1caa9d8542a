//! Data models
//!
//! Rust structs representing database entities.

mod achievement;
mod coaching;
mod daily_goal;
mod fasting;
mod meal_entry;
mod profile;
mod supplement;
mod user;
mod weight_entry;

pub use achievement::Achievement;
pub use coaching::{CoachingMessage, CoachingMessageCreate};
pub use daily_goal::DailyGoal;
pub use fasting::{FastingSession, FastingSessionCreate};
pub use meal_entry::{MealEntry, MealEntryCreate, MealEntryUpdate, MealType};
pub use profile::{Profile, ProfileUpdate};
pub use supplement::{Supplement, SupplementCreate, SupplementLog, SupplementUpdate};
pub use user::{User, UserCreate, UserUpdate};
pub use weight_entry::WeightEntry;
