// Presentation layer - MCP tools and transports
pub mod app_state;
pub mod handlers;
pub mod tools;
