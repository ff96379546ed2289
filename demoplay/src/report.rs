//! End-of-run summary

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::scenario::ScenarioOutcome;

#[derive(Debug)]
pub struct RunReport {
    pub started_at: DateTime<Local>,
    started: Instant,
    pub outcomes: Vec<ScenarioOutcome>,
}

impl RunReport {
    pub fn begin() -> Self {
        Self {
            started_at: Local::now(),
            started: Instant::now(),
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: ScenarioOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn artifact_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.artifacts.len()).sum()
    }

    /// Lines of the printed report
    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![
            "📊 Demo Report".to_string(),
            "==============".to_string(),
            format!("Started: {}", self.started_at.format("%Y-%m-%d %H:%M:%S")),
            format!("Total duration: {:.2}s", self.elapsed().as_secs_f64()),
            format!(
                "Demos recorded: {} ({} artifacts)",
                self.outcomes.len(),
                self.artifact_count()
            ),
            String::new(),
        ];

        for outcome in &self.outcomes {
            lines.push(format!(
                "✅ {} ({:.2}s)",
                outcome.id.name(),
                outcome.duration.as_secs_f64()
            ));
            for artifact in &outcome.artifacts {
                let location = artifact.local_path.as_ref().map_or_else(
                    || "(not downloaded)".to_string(),
                    |path| path.display().to_string(),
                );
                lines.push(format!("   {} {}: {location}", artifact.kind, artifact.name));
            }
        }
        lines
    }

    pub fn print(&self) {
        for line in self.render() {
            println!("{line}");
        }
    }
}
