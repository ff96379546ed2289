//! Screenshots and recordings produced by shellwright, and fetching them to disk

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::error::{DemoError, Result};
use crate::tool_client::ToolCallResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Screenshot,
    Recording,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Screenshot => write!(f, "screenshot"),
            Self::Recording => write!(f, "recording"),
        }
    }
}

/// Where shellwright serves an artifact from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSource {
    pub url: String,
    pub filename: String,
}

impl DownloadSource {
    /// Present only when the result carries both `download_url` and `filename`
    pub fn from_result(result: &ToolCallResult) -> Option<Self> {
        Some(Self {
            url: result.get_str("download_url")?.to_string(),
            filename: result.get_str("filename")?.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub name: String,
    /// Reply of the capture tool, possibly pointing at a download
    pub result: ToolCallResult,
    /// Set once the artifact has been written to the output directory
    pub local_path: Option<PathBuf>,
}

impl Artifact {
    pub fn from_result(kind: ArtifactKind, name: &str, result: ToolCallResult) -> Self {
        Self {
            kind,
            name: name.to_string(),
            result,
            local_path: None,
        }
    }

    pub fn source(&self) -> Option<DownloadSource> {
        DownloadSource::from_result(&self.result)
    }
}

/// Fetches artifact bytes from a download URL
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

#[async_trait]
impl ArtifactFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DemoError::Download {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

pub struct ArtifactRetriever {
    fetcher: Box<dyn ArtifactFetcher>,
}

impl ArtifactRetriever {
    pub fn new(fetcher: Box<dyn ArtifactFetcher>) -> Self {
        Self { fetcher }
    }

    pub fn http() -> Self {
        Self::new(Box::new(HttpFetcher::default()))
    }

    /// Download the artifact a tool result points at, if it points at one.
    ///
    /// Results without both a download URL and a filename are ignored and the
    /// output directory is left untouched. An existing file is overwritten.
    pub async fn maybe_download(
        &self,
        result: &ToolCallResult,
        output_dir: &Path,
    ) -> Result<Option<PathBuf>> {
        match DownloadSource::from_result(result) {
            Some(source) => self.download(&source, output_dir).await.map(Some),
            None => Ok(None),
        }
    }

    /// [`Self::maybe_download`] for a capture, recording where it landed
    pub async fn retrieve(&self, mut artifact: Artifact, output_dir: &Path) -> Result<Artifact> {
        artifact.local_path = self.maybe_download(&artifact.result, output_dir).await?;
        Ok(artifact)
    }

    async fn download(&self, source: &DownloadSource, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(local_file_name(&source.filename)?);
        let bytes = self.fetcher.fetch(&source.url).await?;
        tokio::fs::write(&path, &bytes).await?;
        info!("saved: {}", path.display());
        Ok(path)
    }
}

/// Only the last component of a server-supplied filename is used
fn local_file_name(filename: &str) -> Result<&str> {
    Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| DemoError::BadFilename {
            filename: filename.to_string(),
        })
}
