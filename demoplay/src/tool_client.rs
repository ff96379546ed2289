//! Single tool invocations and result normalization

use serde_json::{Map, Value};
use shellwright_mcp_protocol::validation::ToolValidator;
use tracing::{debug, info};

use crate::error::{DemoError, Result};
use crate::transport::ToolTransport;

/// Key the raw-text fallback is stored under when a result is viewed as JSON
pub const RAW_KEY: &str = "raw";

/// Normalized response of one tool invocation
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCallResult {
    /// The text payload decoded as JSON
    Structured(Value),
    /// The text payload was not JSON; kept verbatim
    Raw(String),
    /// The tool returned no text at all
    Empty,
}

impl ToolCallResult {
    /// Classify the concatenated text of a tool result
    pub fn from_text(text: Option<String>) -> Self {
        match text {
            None => Self::Empty,
            Some(text) => match serde_json::from_str::<Value>(&text) {
                Ok(value) => Self::Structured(value),
                Err(_) => Self::Raw(text),
            },
        }
    }

    /// JSON view of the result; raw text is wrapped as `{"raw": text}`
    pub fn to_value(&self) -> Value {
        match self {
            Self::Structured(value) => value.clone(),
            Self::Raw(text) => {
                let mut wrapped = Map::new();
                wrapped.insert(RAW_KEY.to_string(), Value::String(text.clone()));
                Value::Object(wrapped)
            }
            Self::Empty => Value::Object(Map::new()),
        }
    }

    /// String field of a structured result
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self {
            Self::Structured(value) => value.get(key).and_then(Value::as_str),
            Self::Raw(_) | Self::Empty => None,
        }
    }

    pub fn require_str(&self, tool: &str, key: &str) -> Result<&str> {
        self.get_str(key)
            .ok_or_else(|| DemoError::missing_field(tool, key))
    }

    /// Best-effort textual content: raw text, or the `content` field of a structured result
    pub fn text(&self) -> &str {
        match self {
            Self::Raw(text) => text,
            Self::Structured(_) => self.get_str("content").unwrap_or_default(),
            Self::Empty => "",
        }
    }
}

/// Wraps the transport with validation, call logging and result normalization
pub struct ToolClient {
    transport: Box<dyn ToolTransport>,
}

impl ToolClient {
    pub fn new(transport: Box<dyn ToolTransport>) -> Self {
        Self { transport }
    }

    pub async fn invoke(&self, operation: &str, arguments: Value) -> Result<ToolCallResult> {
        ToolValidator::validate_tool_params(operation, &arguments)?;
        info!("{}", describe_call(operation, &arguments));

        let result = self.transport.call_tool(operation, arguments).await?;
        let text = result.text();

        if result.is_error() {
            return Err(DemoError::Tool {
                tool: operation.to_string(),
                message: text.unwrap_or_default(),
            });
        }

        let normalized = ToolCallResult::from_text(text);
        debug!(tool = operation, result = ?normalized, "tool returned");
        Ok(normalized)
    }

    pub async fn close(&self) -> Result<()> {
        self.transport.close().await
    }
}

/// `name(key=value, ...)` without the session id
fn describe_call(operation: &str, arguments: &Value) -> String {
    let rendered = arguments
        .as_object()
        .map(|map| {
            map.iter()
                .filter(|(key, _)| key.as_str() != "session_id")
                .map(|(key, value)| format!("{key}={}", render_value(value)))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();
    format!("{operation}({rendered})")
}

/// Strings are shown with escapes visible so control keys stay readable in logs
fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => format!("{text:?}"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ScriptedTransport;
    use serde_json::json;

    #[test]
    fn non_json_text_falls_back_to_raw() {
        let result = ToolCallResult::from_text(Some("bash: jq: command not found".to_string()));
        assert_eq!(
            result.to_value(),
            json!({"raw": "bash: jq: command not found"})
        );
        assert_eq!(result.text(), "bash: jq: command not found");
        assert_eq!(result.get_str("raw"), None);
    }

    #[test]
    fn json_text_is_structured() {
        let result = ToolCallResult::from_text(Some(r#"{"shell_session_id":"s-1"}"#.to_string()));
        assert_eq!(result.get_str("shell_session_id"), Some("s-1"));
        assert!(result.require_str("shell_start", "missing").is_err());
    }

    #[test]
    fn no_text_is_empty_and_blank_text_is_raw() {
        assert_eq!(ToolCallResult::from_text(None), ToolCallResult::Empty);
        assert_eq!(ToolCallResult::Empty.to_value(), json!({}));
        assert_eq!(
            ToolCallResult::from_text(Some(String::new())).to_value(),
            json!({"raw": ""})
        );
    }

    #[test]
    fn call_description_omits_session_id() {
        let described = describe_call(
            "shell_send",
            &json!({"session_id": "secret-ish", "input": "f", "delay_ms": 1500}),
        );
        assert!(!described.contains("secret-ish"));
        assert!(described.starts_with("shell_send("));
        assert!(described.contains("input=\"f\""));
        assert!(described.contains("delay_ms=1500"));
    }

    #[tokio::test]
    async fn invoke_normalizes_unstructured_payloads() {
        let transport = ScriptedTransport::new().respond_text("shell_read", "$ pane-patrol\n");
        let calls = transport.calls();
        let client = ToolClient::new(Box::new(transport));

        let result = client
            .invoke("shell_read", json!({"session_id": "s-1"}))
            .await
            .unwrap();

        assert_eq!(result, ToolCallResult::Raw("$ pane-patrol\n".to_string()));
        assert_eq!(calls.names(), vec!["shell_read"]);
    }

    #[tokio::test]
    async fn invoke_rejects_invalid_arguments_before_sending() {
        let transport = ScriptedTransport::new();
        let calls = transport.calls();
        let client = ToolClient::new(Box::new(transport));

        let error = client
            .invoke("shell_record_start", json!({"session_id": "s-1", "fps": 0}))
            .await
            .unwrap_err();

        assert!(matches!(error, DemoError::InvalidArguments(_)));
        assert!(calls.names().is_empty());
    }

    #[tokio::test]
    async fn tool_error_results_are_fatal() {
        let transport = ScriptedTransport::new().respond_error("shell_stop", "unknown session");
        let client = ToolClient::new(Box::new(transport));

        let error = client
            .invoke("shell_stop", json!({"session_id": "gone"}))
            .await
            .unwrap_err();

        match error {
            DemoError::Tool { tool, message } => {
                assert_eq!(tool, "shell_stop");
                assert_eq!(message, "unknown session");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
