//! Input validation utilities for shellwright tools

use crate::tools::ShellTool;
use crate::types::{ProtocolError, Theme};

#[cfg(feature = "serde")]
use serde_json::Value;

/// Validate tool parameters
pub struct ToolValidator;

impl ToolValidator {
    /// Validate parameters for any tool by name
    #[cfg(feature = "serde")]
    pub fn validate_tool_params(tool_name: &str, params: &Value) -> Result<(), ProtocolError> {
        let tool = ShellTool::from_name(tool_name)?;

        if !params.is_object() {
            return Err(ProtocolError::InvalidParameters(
                "arguments must be a JSON object".to_string(),
            ));
        }

        if tool.needs_session() {
            let session_id = Self::get_string_param(params, "session_id")?;
            validate_session_id(session_id)?;
        }

        match tool {
            ShellTool::Start => Self::validate_start_params(params),
            ShellTool::Send => Self::validate_send_params(params),
            ShellTool::RecordStart => Self::validate_record_start_params(params),
            ShellTool::RecordStop | ShellTool::Screenshot => {
                match params.get("name").and_then(Value::as_str) {
                    Some(name) => validate_artifact_name(name),
                    None => Ok(()),
                }
            }
            ShellTool::Read | ShellTool::Stop => Ok(()),
        }
    }

    /// Validate shell_start parameters
    #[cfg(feature = "serde")]
    fn validate_start_params(params: &Value) -> Result<(), ProtocolError> {
        let command = Self::get_string_param(params, "command")?;
        if command.trim().is_empty() {
            return Err(ProtocolError::InvalidParameters(
                "command cannot be empty".to_string(),
            ));
        }

        if let Some(args) = params.get("args") {
            let all_strings = args
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false);
            if !all_strings {
                return Err(ProtocolError::InvalidParameters(
                    "args must be an array of strings".to_string(),
                ));
            }
        }

        for key in ["cols", "rows"] {
            if params.get(key).is_some() && Self::get_u64_param(params, key)? == 0 {
                return Err(ProtocolError::InvalidParameters(format!(
                    "{} must be greater than zero",
                    key
                )));
            }
        }

        if let Some(theme) = params.get("theme") {
            let theme = theme.as_str().ok_or_else(|| {
                ProtocolError::InvalidParameters("theme must be a string".to_string())
            })?;
            Theme::parse(theme)?;
        }

        Ok(())
    }

    /// Validate shell_send parameters
    #[cfg(feature = "serde")]
    fn validate_send_params(params: &Value) -> Result<(), ProtocolError> {
        Self::get_string_param(params, "input")?;

        if params.get("delay_ms").is_some() {
            let delay = Self::get_u64_param(params, "delay_ms")?;
            if delay > crate::MAX_DELAY_MS {
                return Err(ProtocolError::InvalidParameters(format!(
                    "delay_ms cannot exceed {}",
                    crate::MAX_DELAY_MS
                )));
            }
        }

        Ok(())
    }

    /// Validate shell_record_start parameters
    #[cfg(feature = "serde")]
    fn validate_record_start_params(params: &Value) -> Result<(), ProtocolError> {
        if params.get("fps").is_none() {
            return Ok(());
        }

        let fps = Self::get_u64_param(params, "fps")?;
        if fps == 0 || fps > crate::MAX_FPS {
            return Err(ProtocolError::InvalidParameters(format!(
                "fps must be between 1 and {}",
                crate::MAX_FPS
            )));
        }

        Ok(())
    }

    #[cfg(feature = "serde")]
    fn get_string_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, ProtocolError> {
        params
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| ProtocolError::InvalidParameters(format!("{} is required", key)))
    }

    #[cfg(feature = "serde")]
    fn get_u64_param(params: &Value, key: &str) -> Result<u64, ProtocolError> {
        params.get(key).and_then(Value::as_u64).ok_or_else(|| {
            ProtocolError::InvalidParameters(format!("{} must be a non-negative integer", key))
        })
    }
}

/// Validate a shell session identifier
pub fn validate_session_id(session_id: &str) -> Result<(), ProtocolError> {
    if session_id.trim().is_empty() {
        return Err(ProtocolError::InvalidParameters(
            "session_id cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validate a screenshot or recording name.
///
/// Names end up as file names on the shellwright side, so path separators are refused.
pub fn validate_artifact_name(name: &str) -> Result<(), ProtocolError> {
    if name.is_empty() {
        return Err(ProtocolError::InvalidParameters(
            "Artifact name cannot be empty".to_string(),
        ));
    }

    if name.len() > crate::MAX_ARTIFACT_NAME_LEN {
        return Err(ProtocolError::InvalidParameters(format!(
            "Artifact name cannot be longer than {} characters",
            crate::MAX_ARTIFACT_NAME_LEN
        )));
    }

    let forbidden_chars = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
    if name.chars().any(|c| forbidden_chars.contains(&c)) || name == "." || name == ".." {
        return Err(ProtocolError::InvalidParameters(
            "Artifact name contains forbidden characters".to_string(),
        ));
    }

    Ok(())
}
