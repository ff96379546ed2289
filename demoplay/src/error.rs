use std::path::PathBuf;

use shellwright_mcp_protocol::ProtocolError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("unknown demo: {name}. Available: {}", available.join(", "))]
    UnknownScenario {
        name: String,
        available: Vec<&'static str>,
    },

    #[error("cannot connect to shellwright at {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("MCP protocol error: {message}")]
    Protocol { message: String },

    #[error("RPC error {code} for {method}: {message}")]
    Rpc {
        method: String,
        code: i32,
        message: String,
    },

    #[error("tool {tool} failed: {message}")]
    Tool { tool: String, message: String },

    #[error("invalid arguments: {0}")]
    InvalidArguments(#[from] ProtocolError),

    #[error("{tool} response is missing `{field}`")]
    MissingField { tool: String, field: String },

    #[error("download of {url} failed with HTTP {status}")]
    Download { url: String, status: u16 },

    #[error("artifact filename {filename:?} has no usable file name")]
    BadFilename { filename: String },

    #[error("output directory {path} is not usable: {message}")]
    OutputDir { path: PathBuf, message: String },

    #[error("session {session_id} has not been sanitized; refusing to record")]
    Unsanitized { session_id: String },

    #[error("session {session_id} is already recording")]
    RecordingActive { session_id: String },

    #[error("session {session_id} has no active recording")]
    RecordingInactive { session_id: String },
}

impl DemoError {
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn missing_field(tool: &str, field: &str) -> Self {
        Self::MissingField {
            tool: tool.to_string(),
            field: field.to_string(),
        }
    }

    /// Whether a transport failure means the remote end could not be reached.
    ///
    /// Transport errors are classified by kind first and by message second. Only
    /// [`HttpTransport::connect`](crate::transport::HttpTransport::connect) uses this to
    /// decide on [`DemoError::Connect`]; a failure later in a run stays as it is.
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::Connect { .. } => true,
            Self::Http(error) => {
                error.is_connect() || error.is_timeout() || mentions_connection(&error.to_string())
            }
            Self::Io(error) => matches!(
                error.kind(),
                std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::NotConnected
            ),
            _ => false,
        }
    }

    /// Process exit status for failures reported without a backtrace of causes
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        1
    }
}

fn mentions_connection(message: &str) -> bool {
    message.to_ascii_lowercase().contains("connection")
}
