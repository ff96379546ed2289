//! Core MCP types and data structures

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// MCP tool execution result
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct McpToolResult {
    /// Result content
    #[cfg_attr(feature = "serde", serde(default))]
    pub content: Vec<McpContent>,
    /// Whether this is an error result
    #[cfg_attr(
        feature = "serde",
        serde(rename = "isError", default, skip_serializing_if = "Option::is_none")
    )]
    pub is_error: Option<bool>,
}

impl McpToolResult {
    /// Concatenation of every text item, or `None` when the result carries no text at all
    pub fn text(&self) -> Option<String> {
        let mut text: Option<String> = None;
        for item in &self.content {
            if let McpContent::Text { text: chunk } = item {
                text.get_or_insert_with(String::new).push_str(chunk);
            }
        }
        text
    }

    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }
}

/// Content types for MCP responses
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum McpContent {
    /// Plain text content
    #[cfg_attr(feature = "serde", serde(rename = "text"))]
    Text { text: String },
    /// Image content (base64 encoded)
    #[cfg_attr(feature = "serde", serde(rename = "image"))]
    Image {
        data: String,
        #[cfg_attr(feature = "serde", serde(rename = "mimeType"))]
        mime_type: String,
    },
    /// Any content type demoplay does not consume (audio, embedded resources, ...)
    #[cfg_attr(feature = "serde", serde(other))]
    Other,
}

/// MCP error information
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct McpError {
    /// Error code (JSON-RPC style)
    pub code: i32,
    /// Error message
    pub message: String,
    /// Additional error data
    #[cfg(feature = "serde")]
    #[cfg_attr(feature = "serde", serde(default))]
    pub data: Option<serde_json::Value>,
    #[cfg(not(feature = "serde"))]
    pub data: Option<String>,
}

/// JSON-RPC 2.0 request. Notifications carry no `id`.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

#[cfg(feature = "serde")]
impl JsonRpcRequest {
    pub fn call(id: u64, method: &str, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id: Some(id),
            method: method.to_string(),
            params: Some(params),
        }
    }

    pub fn notification(method: &str) -> Self {
        Self {
            jsonrpc: "2.0",
            id: None,
            method: method.to_string(),
            params: None,
        }
    }
}

/// JSON-RPC 2.0 response
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[allow(dead_code)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<McpError>,
}

#[cfg(feature = "serde")]
impl JsonRpcResponse {
    /// True when this response answers the request with the given id
    pub fn answers(&self, id: u64) -> bool {
        self.id.as_ref().and_then(serde_json::Value::as_u64) == Some(id)
    }
}

/// Common error types
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("Tool not found: {0}")]
    ToolNotFound(String),
}

/// Terminal colour themes understood by shellwright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Theme {
    OneDark,
    OneLight,
    Dracula,
    SolarizedDark,
    Nord,
}

impl Theme {
    /// Get all supported themes
    pub fn all() -> Vec<Theme> {
        vec![
            Theme::OneDark,
            Theme::OneLight,
            Theme::Dracula,
            Theme::SolarizedDark,
            Theme::Nord,
        ]
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::OneDark => "one-dark",
            Theme::OneLight => "one-light",
            Theme::Dracula => "dracula",
            Theme::SolarizedDark => "solarized-dark",
            Theme::Nord => "nord",
        }
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Theme, ProtocolError> {
        Theme::all()
            .into_iter()
            .find(|theme| theme.as_str() == s)
            .ok_or_else(|| ProtocolError::InvalidParameters(format!("Unknown theme: {}", s)))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::OneDark
    }
}
