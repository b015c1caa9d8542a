//! MCP tool implementations
//!
//! Plain functions over the database, called by the MCP server layer.

pub mod accounts;
pub mod coach;
pub mod fasting;
pub mod goals;
pub mod meals;
pub mod profile;
pub mod reports;
pub mod status;
pub mod supplements;
