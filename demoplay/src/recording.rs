//! Frame recordings and screenshots on a session

use serde_json::json;
use shellwright_mcp_protocol::ShellTool;
use tracing::info;

use crate::artifact::{Artifact, ArtifactKind};
use crate::error::{DemoError, Result};
use crate::session::{Recording, Session};
use crate::tool_client::ToolClient;

/// Starts and stops captures. Returned artifacts still have to be retrieved by the caller.
pub struct RecordingController<'a> {
    client: &'a ToolClient,
}

impl<'a> RecordingController<'a> {
    pub fn new(client: &'a ToolClient) -> Self {
        Self { client }
    }

    /// Begin capturing frames. Refused until the session's prompt is sanitized.
    pub async fn start(&self, session: &mut Session, fps: u32) -> Result<()> {
        if !session.is_sanitized() {
            return Err(DemoError::Unsanitized {
                session_id: session.id().to_string(),
            });
        }
        if session.is_recording() {
            return Err(DemoError::RecordingActive {
                session_id: session.id().to_string(),
            });
        }

        self.client
            .invoke(
                ShellTool::RecordStart.name(),
                json!({ "session_id": session.id(), "fps": fps }),
            )
            .await?;
        session.recording = Some(Recording { fps });
        info!(scenario = %session.scenario(), fps, "recording started");
        Ok(())
    }

    pub async fn stop(&self, session: &mut Session, name: &str) -> Result<Artifact> {
        if !session.is_recording() {
            return Err(DemoError::RecordingInactive {
                session_id: session.id().to_string(),
            });
        }

        let result = self
            .client
            .invoke(
                ShellTool::RecordStop.name(),
                json!({ "session_id": session.id(), "name": name }),
            )
            .await?;
        session.recording = None;
        Ok(Artifact::from_result(ArtifactKind::Recording, name, result))
    }

    pub async fn screenshot(&self, session: &Session, name: &str) -> Result<Artifact> {
        let result = self
            .client
            .invoke(
                ShellTool::Screenshot.name(),
                json!({ "session_id": session.id(), "name": name }),
            )
            .await?;
        Ok(Artifact::from_result(ArtifactKind::Screenshot, name, result))
    }
}
