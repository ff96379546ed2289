//! Shellwright MCP Protocol
//!
//! This crate provides shared protocol definitions for the Model Context Protocol (MCP)
//! tools exposed by the shellwright terminal recorder and consumed by demoplay.
//!
//! # Features
//!
//! - **Shared Tool Definitions**: All shellwright tools defined in one place
//! - **Type Safety**: JSON-RPC envelopes and MCP result content as typed structures
//! - **Validation**: Input validation for tool parameters before they hit the wire
//! - **Versioning**: Protocol version management
//!
//! # Example
//!
//! ```rust
//! use shellwright_mcp_protocol::{validation::ToolValidator, ShellTool, PROTOCOL_VERSION};
//!
//! let tool = ShellTool::from_name("shell_record_start").unwrap();
//! let args = shellwright_mcp_protocol::serde_json::json!({"session_id": "s-1", "fps": 4});
//! assert!(ToolValidator::validate_tool_params(tool.name(), &args).is_ok());
//! println!("Protocol version: {}", PROTOCOL_VERSION);
//! ```

pub mod protocol;
pub mod tools;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use protocol::*;
pub use tools::ShellTool;
pub use types::*;

#[cfg(feature = "serde")]
pub use serde_json;

/// MCP protocol revision that introduced the streamable HTTP transport
pub const PROTOCOL_VERSION: &str = "2025-03-26";

/// Client information announced during `initialize`
pub const CLIENT_NAME: &str = "demoplay";
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");
