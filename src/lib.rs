//! LeanLog Library
//!
//! Core functionality for weight loss, habit, and metabolic goal tracking.

pub mod build_info;
pub mod db;
pub mod external;
pub mod mcp;
pub mod metabolic;
pub mod models;
pub mod tools;
