//! Runs the requested demos one after another over a single shellwright connection

use std::path::Path;

use tracing::{info, warn};

use crate::artifact::ArtifactRetriever;
use crate::config::DemoConfig;
use crate::error::{DemoError, Result};
use crate::report::RunReport;
use crate::scenario::{run_scenario, ScenarioContext, ScenarioId};
use crate::tool_client::ToolClient;
use crate::transport::{HttpTransport, ToolTransport};

/// How the top level should react to a failed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    UnknownScenario,
    /// shellwright is not running or not reachable
    Connectivity,
    Fatal,
}

/// Only a failure to establish the connection counts as connectivity; anything
/// that goes wrong once connected is fatal.
pub fn classify(error: &DemoError) -> FailureClass {
    match error {
        DemoError::UnknownScenario { .. } => FailureClass::UnknownScenario,
        DemoError::Connect { .. } => FailureClass::Connectivity,
        _ => FailureClass::Fatal,
    }
}

/// Map names onto the registry. No names means every demo, in registry order.
pub fn resolve<S: AsRef<str>>(names: &[S]) -> Result<Vec<ScenarioId>> {
    if names.is_empty() {
        return Ok(ScenarioId::all());
    }

    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            ScenarioId::parse(name).ok_or_else(|| DemoError::UnknownScenario {
                name: name.to_string(),
                available: ScenarioId::names(),
            })
        })
        .collect()
}

pub struct Orchestrator {
    config: DemoConfig,
}

impl Orchestrator {
    pub fn new(config: DemoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    /// Resolve, connect and record. Names are checked before anything touches the network.
    pub async fn run<S: AsRef<str>>(&self, names: &[S]) -> Result<RunReport> {
        let ids = resolve(names)?;
        let listed: Vec<_> = ids.iter().map(ScenarioId::name).collect();
        println!("🎥 Recording demos: {}", listed.join(", "));
        println!("📁 Output: {}", self.config.output_dir.display());

        prepare_output_dir(&self.config.output_dir).await?;

        let endpoint = self.config.endpoint();
        let transport = HttpTransport::connect(&endpoint).await?;
        println!("✅ Connected to shellwright at {endpoint}");

        self.run_with(Box::new(transport), ArtifactRetriever::http(), &ids)
            .await
    }

    /// Run `ids` serially on an already connected transport, then close it
    pub async fn run_with(
        &self,
        transport: Box<dyn ToolTransport>,
        retriever: ArtifactRetriever,
        ids: &[ScenarioId],
    ) -> Result<RunReport> {
        let client = ToolClient::new(transport);
        let ctx = ScenarioContext::new(&self.config, &client, &retriever);
        let mut report = RunReport::begin();

        let mut failure = None;
        for id in ids {
            match run_scenario(id.scenario().as_ref(), &ctx).await {
                Ok(outcome) => {
                    info!(
                        demo = id.name(),
                        artifacts = outcome.artifacts.len(),
                        "demo recorded"
                    );
                    report.record(outcome);
                }
                Err(error) => {
                    failure = Some(error);
                    break;
                }
            }
        }

        if let Err(error) = client.close().await {
            warn!("could not close the shellwright session: {error}");
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(report),
        }
    }
}

async fn prepare_output_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|error| DemoError::OutputDir {
            path: path.to_path_buf(),
            message: error.to_string(),
        })
}
