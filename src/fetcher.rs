//! File transfer seam and the wget-based implementation
//!
//! The [`FileFetcher`] trait isolates the transfer mechanism so the
//! orchestrator never cares whether bytes move through a subprocess or a
//! native client. The shipped implementation shells out to `wget`.

use crate::error::{FetchError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Captured output of a successful transfer, retained for audit logging
#[must_use]
#[derive(Debug, Clone, Default)]
pub struct FetchOutput {
    /// Full standard output of the fetcher
    pub stdout: String,
    /// Full standard error of the fetcher (verbose transfer log for wget)
    pub stderr: String,
}

/// Trait for transferring one remote file to a local destination
///
/// Implementations perform a single blocking transfer with no retries and no
/// partial-file cleanup: on failure, whatever was written so far may remain
/// at the destination.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Transfer `url` to `destination` (an absolute path whose parent
    /// directory already exists).
    ///
    /// # Errors
    ///
    /// Returns a [`Fetch`](crate::Error::Fetch) error when the transfer
    /// could not be started or did not complete successfully.
    async fn fetch(&self, url: &str, destination: &Path) -> Result<FetchOutput>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

/// Fetcher that invokes the external `wget` binary
///
/// Runs `wget -v -O {destination} {url}`, capturing both streams in full.
/// The destination is absolute, so no working directory is set on the child.
pub struct WgetFetcher {
    binary_path: PathBuf,
}

impl WgetFetcher {
    /// Create a fetcher with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Attempt to find `wget` in PATH.
    ///
    /// Returns `None` when the binary is not installed.
    pub fn from_path() -> Option<Self> {
        which::which("wget").ok().map(Self::new)
    }
}

#[async_trait]
impl FileFetcher for WgetFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<FetchOutput> {
        let output = Command::new(&self.binary_path)
            .arg("-v")
            .arg("-O")
            .arg(destination)
            .arg(url)
            .output()
            .await
            .map_err(|source| FetchError::Spawn {
                binary: self.binary_path.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(FetchError::NonZeroExit {
                code: output.status.code(),
                stderr,
            }
            .into());
        }

        Ok(FetchOutput { stdout, stderr })
    }

    fn name(&self) -> &'static str {
        "wget"
    }
}
