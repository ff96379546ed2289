//! MCP streamable HTTP transport.
//!
//! Every JSON-RPC message is POSTed to the shellwright `/mcp` endpoint. The server
//! answers either with a plain JSON body or with a short server-sent event stream
//! whose `data:` events carry the reply.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde_json::{json, Value};
use shellwright_mcp_protocol::{
    capabilities, http, methods, JsonRpcRequest, JsonRpcResponse, McpToolResult, CLIENT_NAME,
    CLIENT_VERSION, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TOOL_TIMEOUT, PROTOCOL_VERSION,
};
use tracing::{debug, warn};

use crate::error::{DemoError, Result};

/// Invokes named tools on the remote service
#[async_trait]
pub trait ToolTransport: Send + Sync {
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<McpToolResult>;

    /// Release the connection. Transports without connection state do nothing.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    session_id: Option<String>,
    counter: AtomicU64,
}

impl HttpTransport {
    /// Open an MCP session: `initialize`, then `notifications/initialized`.
    ///
    /// Failures to reach the endpoint are reported as [`DemoError::Connect`].
    pub async fn connect(endpoint: &str) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT))
            .timeout(Duration::from_secs(DEFAULT_TOOL_TIMEOUT))
            .build()?;

        let mut transport = Self {
            client,
            endpoint: endpoint.to_string(),
            session_id: None,
            counter: AtomicU64::new(0),
        };

        transport.initialize().await.map_err(|error| {
            if error.is_connectivity() {
                DemoError::Connect {
                    url: endpoint.to_string(),
                    message: error.to_string(),
                }
            } else {
                error
            }
        })?;

        Ok(transport)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn initialize(&mut self) -> Result<()> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": capabilities::client_capabilities(),
            "clientInfo": {
                "name": CLIENT_NAME,
                "version": CLIENT_VERSION,
            }
        });
        let id = self.next_id();
        let response = self
            .post(&JsonRpcRequest::call(id, methods::INITIALIZE, params))
            .await?;

        self.session_id = response
            .headers()
            .get(http::SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let result = read_result(methods::INITIALIZE, id, response).await?;
        let server = result
            .pointer("/serverInfo/name")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown");
        let protocol = result
            .get("protocolVersion")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown");
        debug!(server, protocol, session = ?self.session_id, "MCP session initialized");

        let response = self
            .post(&JsonRpcRequest::notification(methods::INITIALIZED))
            .await?;
        ensure_success(methods::INITIALIZED, response).await?;
        Ok(())
    }

    fn next_id(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    async fn post(&self, request: &JsonRpcRequest) -> Result<Response> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, http::ACCEPT)
            .json(request);

        if let Some(session_id) = &self.session_id {
            builder = builder.header(http::SESSION_HEADER, session_id);
        }

        Ok(builder.send().await?)
    }
}

#[async_trait]
impl ToolTransport for HttpTransport {
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<McpToolResult> {
        let id = self.next_id();
        let params = json!({
            "name": name,
            "arguments": arguments,
        });
        let response = self
            .post(&JsonRpcRequest::call(id, methods::TOOLS_CALL, params))
            .await?;
        let result = read_result(name, id, response).await?;
        Ok(serde_json::from_value(result)?)
    }

    async fn close(&self) -> Result<()> {
        let Some(session_id) = &self.session_id else {
            return Ok(());
        };

        let response = self
            .client
            .delete(&self.endpoint)
            .header(http::SESSION_HEADER, session_id)
            .send()
            .await?;

        // Servers may refuse client-initiated termination with 405
        if !response.status().is_success() && response.status().as_u16() != 405 {
            warn!(status = %response.status(), "MCP session termination was rejected");
        }
        Ok(())
    }
}

async fn ensure_success(method: &str, response: Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(DemoError::protocol(format!(
        "{method} returned HTTP {status}: {}",
        body.trim()
    )))
}

/// Extract the `result` of the reply to request `id`
async fn read_result(method: &str, id: u64, response: Response) -> Result<Value> {
    let status = response.status();
    let is_stream = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(http::EVENT_STREAM));
    let body = response.text().await?;

    if !status.is_success() {
        return Err(DemoError::protocol(format!(
            "{method} returned HTTP {status}: {}",
            body.trim()
        )));
    }

    let reply = if is_stream {
        reply_from_events(&body, id)
    } else {
        serde_json::from_str::<JsonRpcResponse>(&body).ok()
    }
    .ok_or_else(|| DemoError::protocol(format!("no JSON-RPC reply to {method} (id {id})")))?;

    if let Some(error) = reply.error {
        return Err(DemoError::Rpc {
            method: method.to_string(),
            code: error.code,
            message: error.message,
        });
    }

    reply
        .result
        .ok_or_else(|| DemoError::protocol(format!("{method} reply has neither result nor error")))
}

fn reply_from_events(body: &str, id: u64) -> Option<JsonRpcResponse> {
    parse_sse_data(body)
        .iter()
        .filter_map(|data| serde_json::from_str::<JsonRpcResponse>(data).ok())
        .find(|reply| reply.answers(id))
}

/// Collect the `data` payload of every event in a server-sent event stream
pub fn parse_sse_data(body: &str) -> Vec<String> {
    let mut events = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in body.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            if !current.is_empty() {
                events.push(current.join("\n"));
                current.clear();
            }
            continue;
        }
        if let Some(data) = line.strip_prefix("data:") {
            current.push(data.strip_prefix(' ').unwrap_or(data));
        }
    }

    if !current.is_empty() {
        events.push(current.join("\n"));
    }
    events
}
