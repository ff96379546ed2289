//! demoplay - scripted terminal demos for pane-patrol
//!
//! Drives a shellwright service over MCP: opens a remote shell, hides the prompt,
//! records a fixed sequence of keystrokes and downloads the resulting GIFs and
//! screenshots.

pub mod artifact;
pub mod config;
pub mod error;
pub mod keys;
pub mod orchestrator;
pub mod recording;
pub mod report;
pub mod scenario;
pub mod session;
pub mod tool_client;
pub mod transport;

#[cfg(test)]
mod mock;

pub use config::{ConfigOverrides, DemoConfig, ShellConfig};
pub use error::{DemoError, Result};
pub use orchestrator::{classify, FailureClass, Orchestrator};
pub use report::RunReport;
pub use scenario::ScenarioId;
