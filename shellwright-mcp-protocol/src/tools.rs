//! The shellwright tool catalogue

use crate::types::ProtocolError;

/// The operations shellwright exposes over MCP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellTool {
    Start,
    Send,
    Read,
    RecordStart,
    RecordStop,
    Screenshot,
    Stop,
}

impl ShellTool {
    pub fn all() -> Vec<ShellTool> {
        vec![
            ShellTool::Start,
            ShellTool::Send,
            ShellTool::Read,
            ShellTool::RecordStart,
            ShellTool::RecordStop,
            ShellTool::Screenshot,
            ShellTool::Stop,
        ]
    }

    /// Wire name of the tool
    pub fn name(&self) -> &'static str {
        match self {
            ShellTool::Start => "shell_start",
            ShellTool::Send => "shell_send",
            ShellTool::Read => "shell_read",
            ShellTool::RecordStart => "shell_record_start",
            ShellTool::RecordStop => "shell_record_stop",
            ShellTool::Screenshot => "shell_screenshot",
            ShellTool::Stop => "shell_stop",
        }
    }

    pub fn from_name(name: &str) -> Result<ShellTool, ProtocolError> {
        ShellTool::all()
            .into_iter()
            .find(|tool| tool.name() == name)
            .ok_or_else(|| ProtocolError::ToolNotFound(name.to_string()))
    }

    /// Whether the tool addresses an existing shell session
    pub fn needs_session(&self) -> bool {
        !matches!(self, ShellTool::Start)
    }
}
