//! Supervisor TUI: cycle the display filter, select a pane and jump to it.
//!
//! The key presses encode pane-patrol's bindings: `f` cycles blocked → agents → all
//! → blocked, `j` moves the cursor down skipping session headers, Enter switches the
//! tmux client to the selected pane. The supervisor must run inside tmux for the
//! jump to work, hence the dedicated `demo` session.

use std::time::Duration;

use async_trait::async_trait;

use super::{pause, Scenario, ScenarioContext, ScenarioId};
use crate::artifact::Artifact;
use crate::error::Result;
use crate::keys;
use crate::session::Session;

/// Interactive redraws need a smoother capture than the scan
const FPS: u32 = 10;
const TMUX_SESSION: &str = "demo";
const FILTER_DELAY_MS: u64 = 1500;

pub struct SupervisorDemo;

#[async_trait]
impl Scenario for SupervisorDemo {
    fn id(&self) -> ScenarioId {
        ScenarioId::Supervisor
    }

    fn description(&self) -> &'static str {
        "Supervisor TUI with filter cycling and jump-to-pane"
    }

    async fn perform(
        &self,
        ctx: &ScenarioContext<'_>,
        session: &mut Session,
        artifacts: &mut Vec<Artifact>,
    ) -> Result<()> {
        let sessions = &ctx.sessions;

        // Fresh tmux session with a neutral prompt and no status bar, not recorded
        sessions
            .spawn_shell(
                session,
                &format!(
                    "tmux kill-session -t {TMUX_SESSION} 2>/dev/null; tmux new-session -s {TMUX_SESSION}"
                ),
                1500,
            )
            .await?;
        sessions
            .sanitize(session, Some("tmux set-option status off"))
            .await?;
        sessions.clear(session).await?;

        ctx.recorder.start(session, FPS).await?;
        pause(Duration::from_secs(1)).await;

        let launch = format!("clear && {}", ctx.config.pane_patrol);
        sessions.send(session, &keys::line(&launch), 8000).await?;
        artifacts.push(ctx.screenshot(session, "supervisor-blocked").await?);

        for filter in ["agents", "all"] {
            sessions.send(session, "f", FILTER_DELAY_MS).await?;
            artifacts.push(
                ctx.screenshot(session, &format!("supervisor-{filter}"))
                    .await?,
            );
        }
        // Back to the blocked filter; the cursor lands on the first pane
        sessions.send(session, "f", FILTER_DELAY_MS).await?;

        // One step down reaches the pane with a pending question dialog
        sessions.send(session, "j", 500).await?;
        pause(Duration::from_secs(1)).await;
        artifacts.push(ctx.screenshot(session, "supervisor-selected").await?);

        sessions.send(session, keys::ENTER, 2000).await?;
        artifacts.push(ctx.screenshot(session, "supervisor-jump").await?);
        pause(Duration::from_secs(1)).await;

        artifacts.push(ctx.stop_recording(session, "demo-supervisor").await?);

        sessions.send(session, &keys::tmux('d'), 1000).await?;
        sessions
            .send(
                session,
                &keys::line(&format!("tmux kill-session -t {TMUX_SESSION} 2>/dev/null")),
                500,
            )
            .await?;
        Ok(())
    }
}
