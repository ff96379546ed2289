//! `pane-patrol scan`: one-shot JSON output filtered to detected agents

use std::time::Duration;

use async_trait::async_trait;

use super::{pause, Scenario, ScenarioContext, ScenarioId};
use crate::artifact::Artifact;
use crate::error::Result;
use crate::keys;
use crate::session::Session;

/// Mostly static output, so a low frame rate keeps the GIF small
const FPS: u32 = 4;

pub struct ScanDemo;

/// The scan piped through jq so only panes with a recognised agent are shown
pub fn scan_command(binary: &str) -> String {
    format!(
        "clear && {binary} scan 2>/dev/null \
         | jq '[ .[] | select(.agent != \"unknown\") | {{target, agent, blocked, reason, waiting_for}} ]'"
    )
}

#[async_trait]
impl Scenario for ScanDemo {
    fn id(&self) -> ScenarioId {
        ScenarioId::Scan
    }

    fn description(&self) -> &'static str {
        "CLI scan showing JSON output with agent detection"
    }

    async fn perform(
        &self,
        ctx: &ScenarioContext<'_>,
        session: &mut Session,
        artifacts: &mut Vec<Artifact>,
    ) -> Result<()> {
        ctx.recorder.start(session, FPS).await?;

        ctx.sessions
            .send(session, &keys::line(&scan_command(&ctx.config.pane_patrol)), 500)
            .await?;
        // The parsers take milliseconds; this covers pane capture, the ssh round trip and jq
        pause(Duration::from_secs(8)).await;
        ctx.sessions.read(session).await?;

        artifacts.push(ctx.screenshot(session, "scan-output").await?);
        pause(Duration::from_secs(2)).await;

        artifacts.push(ctx.stop_recording(session, "demo-scan").await?);
        Ok(())
    }
}
