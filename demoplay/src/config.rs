//! Run configuration.
//!
//! Resolved once at startup from the environment (and optional CLI overrides) and
//! then passed explicitly to every component.

use std::path::PathBuf;

use shellwright_mcp_protocol::Theme;

pub const ENV_URL: &str = "SHELLWRIGHT_URL";
pub const ENV_OUTPUT: &str = "SHELLWRIGHT_OUTPUT";
pub const ENV_HOST: &str = "DEMO_HOST";
pub const ENV_BINARY: &str = "PANE_PATROL";

pub const DEFAULT_URL: &str = "http://localhost:7498";
pub const DEFAULT_OUTPUT: &str = "./demo/output";
pub const DEFAULT_HOST: &str = "aspire";
pub const DEFAULT_BINARY: &str = "~/bin/pane-patrol";

/// How to launch shellwright when it is not reachable
pub const START_HINT: &str =
    "npx -y @dwmkerr/shellwright --http --font-size 16 --cols 140 --rows 35";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Base URL of the shellwright HTTP server (without the `/mcp` suffix)
    pub shellwright_url: String,
    /// Directory artifacts are written into
    pub output_dir: PathBuf,
    /// ssh alias of the machine the demo runs on; `None` records locally
    pub demo_host: Option<String>,
    /// Path of the pane-patrol binary on the demo machine
    pub pane_patrol: String,
    pub shell: ShellConfig,
}

/// Terminal the remote shell is started in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub command: String,
    pub args: Vec<String>,
    pub cols: u16,
    pub rows: u16,
    pub theme: Theme,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            command: "bash".to_string(),
            args: vec!["--login".to_string(), "-i".to_string()],
            cols: 140,
            rows: 35,
            theme: Theme::OneDark,
        }
    }
}

/// Values given on the command line take precedence over the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub shellwright_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub demo_host: Option<String>,
    pub pane_patrol: Option<String>,
}

impl DemoConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            shellwright_url: get(ENV_URL, DEFAULT_URL),
            output_dir: PathBuf::from(get(ENV_OUTPUT, DEFAULT_OUTPUT)),
            demo_host: host_or_local(get(ENV_HOST, DEFAULT_HOST)),
            pane_patrol: get(ENV_BINARY, DEFAULT_BINARY),
            shell: ShellConfig::default(),
        }
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(url) = overrides.shellwright_url {
            self.shellwright_url = url;
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if let Some(host) = overrides.demo_host {
            self.demo_host = host_or_local(host);
        }
        if let Some(binary) = overrides.pane_patrol {
            self.pane_patrol = binary;
        }
        self
    }

    /// Full MCP endpoint URL
    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.shellwright_url.trim_end_matches('/'),
            shellwright_mcp_protocol::http::ENDPOINT_PATH
        )
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// An empty host means "record on the machine shellwright runs on"
fn host_or_local(host: String) -> Option<String> {
    let trimmed = host.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
