//! Remote shell sessions.
//!
//! A session is sanitized as part of [`SessionController::open`]: the prompt is
//! reset before anything else is sent, so no frame captured later can show the
//! host or user name.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::json;
use shellwright_mcp_protocol::ShellTool;
use tracing::{debug, info, warn};

use crate::config::ShellConfig;
use crate::error::{DemoError, Result};
use crate::keys;
use crate::tool_client::{ToolCallResult, ToolClient};

pub const SANITIZE_DELAY_MS: u64 = 500;
pub const SSH_DELAY_MS: u64 = 3000;
pub const CLEAR_DELAY_MS: u64 = 500;

/// Active frame capture on a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recording {
    pub fps: u32,
}

#[derive(Debug)]
pub struct Session {
    id: String,
    scenario: String,
    sanitized: bool,
    hop: Option<String>,
    pub(crate) recording: Option<Recording>,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn is_sanitized(&self) -> bool {
        self.sanitized
    }

    /// Host reached over ssh, if any
    pub fn hop(&self) -> Option<&str> {
        self.hop.as_deref()
    }

    pub fn recording(&self) -> Option<Recording> {
        self.recording
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }
}

pub struct SessionController<'a> {
    client: &'a ToolClient,
}

impl<'a> SessionController<'a> {
    pub fn new(client: &'a ToolClient) -> Self {
        Self { client }
    }

    /// Start a shell and immediately neutralize its prompt
    pub async fn open(&self, scenario: &str, shell: &ShellConfig) -> Result<Session> {
        let tool = ShellTool::Start.name();
        let result = self
            .client
            .invoke(
                tool,
                json!({
                    "command": shell.command,
                    "args": shell.args,
                    "cols": shell.cols,
                    "rows": shell.rows,
                    "theme": shell.theme.as_str(),
                }),
            )
            .await?;
        let id = result.require_str(tool, "shell_session_id")?.to_string();

        let mut session = Session {
            id,
            scenario: scenario.to_string(),
            sanitized: false,
            hop: None,
            recording: None,
        };

        if let Err(error) = self.sanitize(&mut session, None).await {
            // No session reaches the caller, so the shell is stopped here
            if let Err(close_error) = self.close(session).await {
                warn!("could not stop the shell after a failed sanitize: {close_error}");
            }
            return Err(error);
        }
        debug!(session = %session.id, scenario, "shell started and sanitized");

        Ok(session)
    }

    /// ssh to `host`, then neutralize the remote prompt and clear away any banner.
    ///
    /// Must happen before recording starts.
    pub async fn hop(&self, session: &mut Session, host: &str) -> Result<()> {
        self.spawn_shell(session, &format!("ssh {host}"), SSH_DELAY_MS)
            .await?;
        self.sanitize(session, None).await?;
        self.clear(session).await?;
        session.hop = Some(host.to_string());
        Ok(())
    }

    /// Run a command that replaces the foreground shell (ssh, a new tmux session).
    ///
    /// The session counts as unsanitized until [`SessionController::sanitize`] runs again.
    pub async fn spawn_shell(&self, session: &mut Session, command: &str, delay_ms: u64) -> Result<()> {
        if session.is_recording() {
            return Err(DemoError::RecordingActive {
                session_id: session.id.clone(),
            });
        }

        session.sanitized = false;
        self.send(session, &keys::line(command), delay_ms).await?;
        Ok(())
    }

    /// Reset the prompt, optionally chaining one more command onto the same line
    pub async fn sanitize(&self, session: &mut Session, and_then: Option<&str>) -> Result<()> {
        let command = match and_then {
            Some(extra) => format!("{} && {extra}", keys::NEUTRAL_PROMPT),
            None => keys::NEUTRAL_PROMPT.to_string(),
        };
        self.send(session, &keys::line(&command), SANITIZE_DELAY_MS)
            .await?;
        session.sanitized = true;
        Ok(())
    }

    pub async fn clear(&self, session: &Session) -> Result<()> {
        self.send(session, &keys::line(keys::CLEAR), CLEAR_DELAY_MS)
            .await?;
        Ok(())
    }

    /// Type `input` into the shell; shellwright waits `delay_ms` before replying
    pub async fn send(&self, session: &Session, input: &str, delay_ms: u64) -> Result<ToolCallResult> {
        self.client
            .invoke(
                ShellTool::Send.name(),
                json!({
                    "session_id": session.id,
                    "input": input,
                    "delay_ms": delay_ms,
                }),
            )
            .await
    }

    /// Read the terminal buffer and log a short preview of it
    pub async fn read(&self, session: &Session) -> Result<String> {
        let result = self
            .client
            .invoke(ShellTool::Read.name(), json!({ "session_id": session.id }))
            .await?;
        let text = result.text().to_string();

        for line in preview(&text) {
            debug!("    | {line}");
        }
        Ok(text)
    }

    /// Stop the shell. An active recording is not stopped here.
    pub async fn close(&self, session: Session) -> Result<()> {
        self.client
            .invoke(ShellTool::Stop.name(), json!({ "session_id": session.id }))
            .await?;
        info!(scenario = %session.scenario, "shell stopped");
        Ok(())
    }
}

/// First three non-blank lines, without escape sequences, cut to 100 characters
fn preview(text: &str) -> Vec<String> {
    strip_ansi(text)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(3)
        .map(|line| line.chars().take(100).collect())
        .collect()
}

fn strip_ansi(text: &str) -> String {
    static ANSI_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = ANSI_REGEX.get_or_init(|| {
        // CSI sequences: ESC [ parameters final-letter
        Regex::new(r"\x1B\[[0-9;?]*[a-zA-Z]").expect("Valid ANSI regex")
    });
    regex.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ScriptedTransport;

    fn client(transport: ScriptedTransport) -> ToolClient {
        ToolClient::new(Box::new(transport))
    }

    #[tokio::test]
    async fn open_sanitizes_before_returning() {
        let transport = ScriptedTransport::new();
        let calls = transport.calls();
        let client = client(transport);
        let sessions = SessionController::new(&client);

        let session = sessions
            .open("scan", &ShellConfig::default())
            .await
            .unwrap();

        assert_eq!(session.id(), "shell-1");
        assert!(session.is_sanitized());
        assert!(!session.is_recording());
        assert_eq!(calls.names(), vec!["shell_start", "shell_send"]);
        assert_eq!(calls.inputs(), vec!["export PS1='$ '\r"]);

        let entries = calls.entries();
        let start_args = &entries[0].1;
        assert_eq!(start_args["args"], json!(["--login", "-i"]));
        assert_eq!(start_args["cols"], 140);
        assert_eq!(start_args["rows"], 35);
        assert_eq!(start_args["theme"], "one-dark");
    }

    #[tokio::test]
    async fn open_fails_without_session_id() {
        let transport =
            ScriptedTransport::new().respond_text("shell_start", "started, but no id for you");
        let calls = transport.calls();
        let client = client(transport);

        let error = SessionController::new(&client)
            .open("scan", &ShellConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(error, DemoError::MissingField { .. }));
        assert_eq!(calls.names(), vec!["shell_start"]);
    }

    #[tokio::test]
    async fn failed_sanitize_stops_the_new_shell() {
        let transport = ScriptedTransport::new().fail("shell_send", "broken pipe");
        let calls = transport.calls();
        let client = client(transport);

        let error = SessionController::new(&client)
            .open("scan", &ShellConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(error, DemoError::Protocol { .. }));
        assert_eq!(calls.names(), vec!["shell_start", "shell_send", "shell_stop"]);
        let entries = calls.entries();
        assert_eq!(entries[2].1["session_id"], "shell-1");
    }

    #[tokio::test]
    async fn failed_sanitize_keeps_its_error_when_stop_fails_too() {
        let transport = ScriptedTransport::new()
            .fail("shell_send", "broken pipe")
            .fail("shell_stop", "session vanished");
        let client = client(transport);

        let error = SessionController::new(&client)
            .open("scan", &ShellConfig::default())
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "MCP protocol error: broken pipe");
    }

    #[tokio::test]
    async fn hop_sanitizes_and_clears_the_remote_shell() {
        let transport = ScriptedTransport::new();
        let calls = transport.calls();
        let client = client(transport);
        let sessions = SessionController::new(&client);

        let mut session = sessions.open("scan", &ShellConfig::default()).await.unwrap();
        sessions.hop(&mut session, "aspire").await.unwrap();

        assert_eq!(session.hop(), Some("aspire"));
        assert!(session.is_sanitized());
        assert_eq!(
            calls.inputs(),
            vec![
                "export PS1='$ '\r",
                "ssh aspire\r",
                "export PS1='$ '\r",
                "clear\r"
            ]
        );
        let entries = calls.entries();
        let ssh_args = &entries[2].1;
        assert_eq!(ssh_args["delay_ms"], 3000);
    }

    #[tokio::test]
    async fn hop_is_refused_while_recording() {
        let client = client(ScriptedTransport::new());
        let sessions = SessionController::new(&client);
        let mut session = sessions.open("scan", &ShellConfig::default()).await.unwrap();
        session.recording = Some(Recording { fps: 4 });

        let error = sessions.hop(&mut session, "aspire").await.unwrap_err();
        assert!(matches!(error, DemoError::RecordingActive { .. }));
    }

    #[tokio::test]
    async fn spawned_shell_needs_sanitizing_again() {
        let transport = ScriptedTransport::new();
        let calls = transport.calls();
        let client = client(transport);
        let sessions = SessionController::new(&client);
        let mut session = sessions.open("supervisor", &ShellConfig::default()).await.unwrap();

        sessions
            .spawn_shell(&mut session, "tmux new-session -s demo", 1500)
            .await
            .unwrap();
        assert!(!session.is_sanitized());

        sessions
            .sanitize(&mut session, Some("tmux set-option status off"))
            .await
            .unwrap();
        assert!(session.is_sanitized());
        assert_eq!(
            calls.inputs().last().map(String::as_str),
            Some("export PS1='$ ' && tmux set-option status off\r")
        );
    }

    #[tokio::test]
    async fn read_returns_raw_buffer_text() {
        let transport =
            ScriptedTransport::new().respond_text("shell_read", "\x1b[32m$\x1b[0m scan\n");
        let client = client(transport);
        let sessions = SessionController::new(&client);
        let session = sessions.open("scan", &ShellConfig::default()).await.unwrap();

        let text = sessions.read(&session).await.unwrap();
        assert_eq!(text, "\x1b[32m$\x1b[0m scan\n");
    }

    #[test]
    fn preview_skips_blank_lines_and_escapes() {
        let long = "x".repeat(150);
        let text = format!("\n\x1b[1m$ \x1b[0mpane-patrol scan\n   \n[\n{long}\nignored\n");
        let lines = preview(&text);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "$ pane-patrol scan");
        assert_eq!(lines[1], "[");
        assert_eq!(lines[2].len(), 100);
    }
}
