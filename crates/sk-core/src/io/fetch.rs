//! Repository snapshot download.
//!
//! Streams `<base>/<owner>/<repo>/archive/refs/heads/<branch>.zip` into a
//! named temporary file. The file lives exactly as long as the returned
//! [`FetchedArchive`].

use std::path::Path;

use futures::StreamExt;
use reqwest::Client;
use sk_schema::{SkillName, SourceDescriptor};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::Reporter;

/// Branch substitutions tried when a download fails with a bad status.
pub const BRANCH_FALLBACKS: &[(&str, &str)] = &[("main", "master")];

/// Snapshot download failure.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The host answered with a non-success status.
    #[error("Download failed with HTTP {status}: {url}")]
    DownloadFailed {
        /// HTTP status code.
        status: u16,
        /// URL that was requested.
        url: String,
    },

    /// Transport failure.
    #[error("Network unavailable: {0}")]
    Network(#[from] reqwest::Error),

    /// Writing the temporary file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A downloaded archive on disk. Dropping it deletes the file.
#[derive(Debug)]
pub struct FetchedArchive {
    file: NamedTempFile,
    descriptor: SourceDescriptor,
    size: u64,
}

impl FetchedArchive {
    /// Location of the zip on disk.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Descriptor the archive was actually fetched for. Its branch differs
    /// from the request when a fallback branch was used.
    pub fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    /// Bytes written.
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Downloads repository snapshots over HTTP.
#[derive(Debug, Clone)]
pub struct ArchiveFetcher {
    client: Client,
    base_url: Option<String>,
}

impl ArchiveFetcher {
    /// Fetcher that downloads from each descriptor's own host.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: None,
        }
    }

    /// Serve archives from `base_url` instead of `https://<host>`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    /// Download URL for `desc`.
    pub fn archive_url(&self, desc: &SourceDescriptor) -> String {
        let base = self
            .base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}", desc.host()));
        format!(
            "{base}/{}/{}/archive/refs/heads/{}.zip",
            desc.owner(),
            desc.repo(),
            desc.branch()
        )
    }

    /// Download the snapshot for `desc`.
    ///
    /// A bad status on a branch listed in [`BRANCH_FALLBACKS`] is retried
    /// once on its substitute. Transport errors are not retried.
    pub async fn fetch(
        &self,
        desc: &SourceDescriptor,
        name: &SkillName,
        reporter: &dyn Reporter,
    ) -> Result<FetchedArchive, FetchError> {
        match self.download(desc, name, reporter).await {
            Err(FetchError::DownloadFailed { status, url }) => {
                let Some(fallback) = fallback_branch(desc.branch()) else {
                    return Err(FetchError::DownloadFailed { status, url });
                };
                tracing::debug!("{url} returned {status}, retrying on branch '{fallback}'");
                self.download(&desc.with_branch(fallback), name, reporter)
                    .await
            }
            other => other,
        }
    }

    async fn download(
        &self,
        desc: &SourceDescriptor,
        name: &SkillName,
        reporter: &dyn Reporter,
    ) -> Result<FetchedArchive, FetchError> {
        let url = self.archive_url(desc);
        tracing::debug!("Downloading {url}");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::DownloadFailed {
                status: response.status().as_u16(),
                url,
            });
        }

        let total = response.content_length();
        reporter.downloading(name, 0, total);

        let tmp = tempfile::Builder::new()
            .prefix("sk-")
            .suffix(".zip")
            .tempfile()?;
        let mut file = tokio::fs::File::from_std(tmp.reopen()?);
        let mut stream = response.bytes_stream();
        let mut size: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            size += chunk.len() as u64;
            reporter.downloading(name, size, total);
        }
        file.flush().await?;

        Ok(FetchedArchive {
            file: tmp,
            descriptor: desc.clone(),
            size,
        })
    }
}

fn fallback_branch(branch: &str) -> Option<&'static str> {
    BRANCH_FALLBACKS
        .iter()
        .find(|(from, _)| *from == branch)
        .map(|(_, to)| *to)
}
