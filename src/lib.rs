//! MCP resource server for local project files.
//!
//! Walks a root directory, keeps the eligible text files in an in-memory
//! catalog, and serves `resources/list` and `resources/read` over JSON-RPC
//! 2.0 stdio to editors and other MCP-aware hosts. Read-only.

pub mod catalog;
pub mod config;
pub mod filter;
pub mod handlers;
pub mod logging;
pub mod protocol;
pub mod scanner;
pub mod server;

pub mod schema;
