//! Named demo scenarios and the runner that gives each one a clean session.
//!
//! Every scenario runs the same frame: open a sanitized shell, hop to the demo host
//! if one is configured, [`Scenario::perform`], leave the host again and close the
//! shell. Whatever happens inside `perform`, an active recording is stopped and the
//! shell is closed before the runner returns.

pub mod scan;
pub mod supervisor;

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::artifact::{Artifact, ArtifactRetriever};
use crate::config::{DemoConfig, ShellConfig};
use crate::error::Result;
use crate::keys;
use crate::recording::RecordingController;
use crate::session::{Session, SessionController};
use crate::tool_client::ToolClient;

pub use scan::ScanDemo;
pub use supervisor::SupervisorDemo;

const EXIT_DELAY_MS: u64 = 500;

/// Closed registry of the demos this tool knows how to record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenarioId {
    Scan,
    Supervisor,
}

impl ScenarioId {
    /// All scenarios in the order a full run records them
    pub fn all() -> Vec<ScenarioId> {
        vec![ScenarioId::Scan, ScenarioId::Supervisor]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Scan => "scan",
            ScenarioId::Supervisor => "supervisor",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::all().iter().map(ScenarioId::name).collect()
    }

    pub fn parse(name: &str) -> Option<ScenarioId> {
        Self::all().into_iter().find(|id| id.name() == name)
    }

    pub fn scenario(&self) -> Box<dyn Scenario> {
        match self {
            ScenarioId::Scan => Box::new(ScanDemo),
            ScenarioId::Supervisor => Box::new(SupervisorDemo),
        }
    }
}

/// One hand-written demo
#[async_trait]
pub trait Scenario: Send + Sync {
    fn id(&self) -> ScenarioId;

    fn description(&self) -> &'static str;

    fn shell(&self, config: &DemoConfig) -> ShellConfig {
        config.shell.clone()
    }

    /// The scripted part of the demo, run on an open, sanitized session.
    ///
    /// Artifacts are pushed as soon as they are on disk so a later failure does not lose track of them.
    async fn perform(
        &self,
        ctx: &ScenarioContext<'_>,
        session: &mut Session,
        artifacts: &mut Vec<Artifact>,
    ) -> Result<()>;
}

/// Everything a scenario needs; borrowed for the duration of one run
pub struct ScenarioContext<'a> {
    pub config: &'a DemoConfig,
    pub sessions: SessionController<'a>,
    pub recorder: RecordingController<'a>,
    pub retriever: &'a ArtifactRetriever,
}

impl<'a> ScenarioContext<'a> {
    pub fn new(config: &'a DemoConfig, client: &'a ToolClient, retriever: &'a ArtifactRetriever) -> Self {
        Self {
            config,
            sessions: SessionController::new(client),
            recorder: RecordingController::new(client),
            retriever,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Take a screenshot and download it
    pub async fn screenshot(&self, session: &Session, name: &str) -> Result<Artifact> {
        let artifact = self.recorder.screenshot(session, name).await?;
        self.retriever.retrieve(artifact, self.output_dir()).await
    }

    /// Stop the recording and download it
    pub async fn stop_recording(&self, session: &mut Session, name: &str) -> Result<Artifact> {
        let artifact = self.recorder.stop(session, name).await?;
        self.retriever.retrieve(artifact, self.output_dir()).await
    }
}

/// Fixed wait for remote effects that give no completion signal
pub async fn pause(duration: Duration) {
    info!("waiting {:.1}s...", duration.as_secs_f64());
    tokio::time::sleep(duration).await;
}

#[derive(Debug)]
pub struct ScenarioOutcome {
    pub id: ScenarioId,
    pub duration: Duration,
    pub artifacts: Vec<Artifact>,
}

pub async fn run_scenario(scenario: &dyn Scenario, ctx: &ScenarioContext<'_>) -> Result<ScenarioOutcome> {
    let id = scenario.id();
    println!();
    println!("{}", "=".repeat(60));
    println!("🎬 Recording: pane-patrol {}", id.name());
    println!("{}", "=".repeat(60));

    let started = Instant::now();
    let mut session = ctx
        .sessions
        .open(id.name(), &scenario.shell(ctx.config))
        .await?;
    let mut artifacts = Vec::new();

    let performed = perform_on_host(scenario, ctx, &mut session, &mut artifacts).await;
    let released = release(ctx, session).await;

    match (performed, released) {
        (Err(error), Err(close_error)) => {
            warn!("could not close the shell after a failure: {close_error}");
            Err(error)
        }
        (Err(error), Ok(())) | (Ok(()), Err(error)) => Err(error),
        (Ok(()), Ok(())) => Ok(ScenarioOutcome {
            id,
            duration: started.elapsed(),
            artifacts,
        }),
    }
}

async fn perform_on_host(
    scenario: &dyn Scenario,
    ctx: &ScenarioContext<'_>,
    session: &mut Session,
    artifacts: &mut Vec<Artifact>,
) -> Result<()> {
    if let Some(host) = &ctx.config.demo_host {
        ctx.sessions.hop(session, host).await?;
    }

    scenario.perform(ctx, session, artifacts).await?;

    if session.hop().is_some() {
        ctx.sessions
            .send(session, &keys::line("exit"), EXIT_DELAY_MS)
            .await?;
    }
    Ok(())
}

/// Stop a recording left running by a failed step, then close the shell
async fn release(ctx: &ScenarioContext<'_>, mut session: Session) -> Result<()> {
    if session.is_recording() {
        let name = format!("{}-aborted", session.scenario());
        warn!("stopping recording left running on {}", session.scenario());
        if let Err(error) = ctx.recorder.stop(&mut session, &name).await {
            warn!("could not stop the recording: {error}");
        }
    }
    ctx.sessions.close(session).await
}
