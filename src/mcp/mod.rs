//! MCP server layer

pub mod server;

pub use server::LeanLogService;
