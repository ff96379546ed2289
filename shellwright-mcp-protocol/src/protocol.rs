//! MCP protocol constants

/// Standard MCP methods
pub mod methods {
    /// Initialize the MCP connection
    pub const INITIALIZE: &str = "initialize";
    /// Sent by the client once the initialize response has been received
    pub const INITIALIZED: &str = "notifications/initialized";
    /// Call a specific tool
    pub const TOOLS_CALL: &str = "tools/call";
}

/// Streamable HTTP transport details
pub mod http {
    /// Path appended to the shellwright base URL
    pub const ENDPOINT_PATH: &str = "/mcp";
    /// Header carrying the server-assigned MCP session
    pub const SESSION_HEADER: &str = "mcp-session-id";
    /// Accept header required by streamable HTTP servers
    pub const ACCEPT: &str = "application/json, text/event-stream";
    /// Content type of server-sent event responses
    pub const EVENT_STREAM: &str = "text/event-stream";
}

/// MCP capability definitions
#[cfg(feature = "serde")]
pub mod capabilities {
    use serde_json::{json, Value};

    /// Client capabilities. demoplay only calls tools, so it advertises nothing.
    pub fn client_capabilities() -> Value {
        json!({})
    }
}

/// Timeout configurations (in seconds)
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 5;
/// Upper bound for a single tool call; `shell_send` may legitimately block for its `delay_ms`.
pub const DEFAULT_TOOL_TIMEOUT: u64 = 120;

/// Limits enforced by client-side validation
pub const MAX_FPS: u64 = 60;
pub const MAX_DELAY_MS: u64 = 60_000;
pub const MAX_ARTIFACT_NAME_LEN: usize = 100;
