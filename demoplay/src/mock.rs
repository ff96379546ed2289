//! Scripted stand-ins for the shellwright service, shared by the unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use shellwright_mcp_protocol::{McpContent, McpToolResult};

use crate::artifact::ArtifactFetcher;
use crate::error::{DemoError, Result};
use crate::transport::ToolTransport;

pub const FETCH: &str = "fetch";

/// Ordered record of every tool call and download
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<(String, Value)>>>);

impl CallLog {
    fn push(&self, name: &str, arguments: Value) {
        self.0.lock().unwrap().push((name.to_string(), arguments));
    }

    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries().into_iter().map(|(name, _)| name).collect()
    }

    /// Inputs passed to `shell_send`, in order
    pub fn inputs(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(name, _)| name == "shell_send")
            .filter_map(|(_, args)| args["input"].as_str().map(str::to_string))
            .collect()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names().iter().position(|n| n == name)
    }
}

enum Scripted {
    Result(McpToolResult),
    Fail(String),
}

#[derive(Default)]
pub struct ScriptedTransport {
    log: CallLog,
    scripted: Mutex<HashMap<String, VecDeque<Scripted>>>,
    closed: Arc<Mutex<bool>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> CallLog {
        self.log.clone()
    }

    pub fn closed_flag(&self) -> Arc<Mutex<bool>> {
        Arc::clone(&self.closed)
    }

    fn push(self, tool: &str, scripted: Scripted) -> Self {
        self.scripted
            .lock()
            .unwrap()
            .entry(tool.to_string())
            .or_default()
            .push_back(scripted);
        self
    }

    /// Queue a text reply for the next call of `tool`
    pub fn respond_text(self, tool: &str, text: &str) -> Self {
        self.push(tool, Scripted::Result(text_result(text, false)))
    }

    pub fn respond_json(self, tool: &str, value: Value) -> Self {
        self.respond_text(tool, &value.to_string())
    }

    /// Queue an `isError` reply for the next call of `tool`
    pub fn respond_error(self, tool: &str, text: &str) -> Self {
        self.push(tool, Scripted::Result(text_result(text, true)))
    }

    /// Queue a transport failure for the next call of `tool`
    pub fn fail(self, tool: &str, message: &str) -> Self {
        self.push(tool, Scripted::Fail(message.to_string()))
    }

    fn default_reply(name: &str, arguments: &Value) -> McpToolResult {
        let artifact = |extension: &str| {
            let file = format!(
                "{}.{extension}",
                arguments["name"].as_str().unwrap_or("capture")
            );
            json!({
                "filename": file,
                "download_url": format!("http://recorder.test/files/{file}"),
            })
            .to_string()
        };

        let text = match name {
            "shell_start" => json!({"shell_session_id": "shell-1"}).to_string(),
            "shell_screenshot" => artifact("png"),
            "shell_record_stop" => artifact("gif"),
            "shell_read" => "$ pane-patrol scan\n\n[ ]\n".to_string(),
            _ => json!({"success": true}).to_string(),
        };
        text_result(&text, false)
    }
}

#[async_trait]
impl ToolTransport for ScriptedTransport {
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<McpToolResult> {
        self.log.push(name, arguments.clone());

        let scripted = self
            .scripted
            .lock()
            .unwrap()
            .get_mut(name)
            .and_then(VecDeque::pop_front);

        match scripted {
            Some(Scripted::Result(result)) => Ok(result),
            Some(Scripted::Fail(message)) => Err(DemoError::protocol(message)),
            None => Ok(Self::default_reply(name, &arguments)),
        }
    }

    async fn close(&self) -> Result<()> {
        *self.closed.lock().unwrap() = true;
        Ok(())
    }
}

fn text_result(text: &str, is_error: bool) -> McpToolResult {
    McpToolResult {
        content: vec![McpContent::Text {
            text: text.to_string(),
        }],
        is_error: Some(is_error),
    }
}

/// Serves fixed bytes for every URL and logs each fetch
pub struct MockFetcher {
    log: CallLog,
    body: Vec<u8>,
}

impl MockFetcher {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            body: b"GIF89a".to_vec(),
        }
    }

    pub fn with_body(log: CallLog, body: &[u8]) -> Self {
        Self {
            log,
            body: body.to_vec(),
        }
    }
}

#[async_trait]
impl ArtifactFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.log.push(FETCH, json!(url));
        Ok(self.body.clone())
    }
}
