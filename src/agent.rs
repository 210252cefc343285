//! Pipeline orchestration: integration, manifest, then per-file downloads
//!
//! The run is strictly sequential. Failures during the two metadata stages
//! are fatal and abort the run; every per-file problem (invariant violation,
//! path resolution, transfer failure) is logged, counted, and isolated to
//! that entry so one bad URL never sinks the batch.

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetcher::{FileFetcher, WgetFetcher};
use crate::paths::resolve_download_path;
use crate::types::{Manifest, PackageIds, RunSummary};

/// Orchestrates one download run for a single integration job
pub struct IntegrationDownloader {
    config: Config,
    client: ApiClient,
    fetcher: Box<dyn FileFetcher>,
}

impl std::fmt::Debug for IntegrationDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationDownloader")
            .field("config", &self.config)
            .field("fetcher", &self.fetcher.name())
            .finish_non_exhaustive()
    }
}

impl IntegrationDownloader {
    /// Create a downloader using `wget` discovered from PATH.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSupported`] when no `wget` binary is installed.
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = WgetFetcher::from_path()
            .ok_or_else(|| Error::NotSupported("wget binary not found in PATH".to_string()))?;
        Ok(Self::with_fetcher(config, Box::new(fetcher)))
    }

    /// Create a downloader with an explicit transfer implementation.
    ///
    /// The seam exists so tests and embedders can swap the subprocess-based
    /// fetcher for something else without touching orchestration.
    pub fn with_fetcher(config: Config, fetcher: Box<dyn FileFetcher>) -> Self {
        let client = ApiClient::new(&config);
        Self {
            config,
            client,
            fetcher,
        }
    }

    /// Execute the full pipeline and return the aggregate outcome.
    ///
    /// # Errors
    ///
    /// Any failure fetching the integration or the manifest (transport,
    /// unexpected status, malformed body) is fatal and returned here.
    /// Per-entry download failures are not errors; they are reflected in the
    /// returned [`RunSummary`].
    pub async fn run(&self) -> Result<RunSummary> {
        let integration = self
            .client
            .fetch_integration(&self.config.integration_id)
            .await?;
        tracing::info!(
            uuid = %integration.uuid,
            dataset = %integration.dataset_id,
            packages = integration.package_ids.len(),
            "resolved integration"
        );

        // The manifest is requested even for an empty package list; the
        // server answers with an empty manifest and the run completes.
        let packages = PackageIds::from(&integration);
        let manifest = self.client.fetch_manifest(&packages).await?;
        tracing::info!(entries = manifest.data.len(), "resolved download manifest");

        Ok(self.download_all(&manifest).await)
    }

    /// Download every manifest entry in order, isolating per-entry failures
    async fn download_all(&self, manifest: &Manifest) -> RunSummary {
        let mut summary = RunSummary::default();

        for entry in &manifest.data {
            if !entry.is_downloadable() {
                tracing::warn!(
                    node_id = %entry.node_id,
                    "manifest entry missing file name or url, skipping"
                );
                summary.skipped += 1;
                continue;
            }

            // Resolver logs the cause on failure; the entry is skipped.
            let destination = match resolve_download_path(
                &self.config.output_dir,
                &entry.path,
                &entry.file_name,
            )
            .await
            {
                Ok(path) => path,
                Err(_) => {
                    summary.skipped += 1;
                    continue;
                }
            };

            match self.fetcher.fetch(&entry.url, &destination).await {
                Ok(output) => {
                    tracing::info!(
                        path = %destination.display(),
                        fetcher = self.fetcher.name(),
                        "downloaded file"
                    );
                    tracing::debug!(
                        stdout = %output.stdout,
                        stderr = %output.stderr,
                        "fetcher output"
                    );
                    summary.downloaded += 1;
                }
                Err(e) => {
                    tracing::error!(
                        file = %entry.file_name,
                        error = %e,
                        "download failed"
                    );
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            downloaded = summary.downloaded,
            skipped = summary.skipped,
            failed = summary.failed,
            "download run complete"
        );
        summary
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::fetcher::FetchOutput;
    use crate::types::ManifestEntry;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Records every fetch and writes a marker payload to the destination
    #[derive(Clone, Default)]
    struct RecordingFetcher {
        calls: Arc<Mutex<Vec<String>>>,
        fail_urls: Vec<String>,
    }

    #[async_trait]
    impl FileFetcher for RecordingFetcher {
        async fn fetch(&self, url: &str, destination: &Path) -> crate::Result<FetchOutput> {
            self.calls.lock().unwrap().push(url.to_string());
            if self.fail_urls.iter().any(|f| f == url) {
                return Err(FetchError::NonZeroExit {
                    code: Some(8),
                    stderr: "server error".into(),
                }
                .into());
            }
            tokio::fs::write(destination, b"payload").await?;
            Ok(FetchOutput::default())
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn config_with_output(output_dir: &Path) -> Config {
        Config {
            integrations_host: "http://127.0.0.1:1".into(),
            api_host: "http://127.0.0.1:1".into(),
            integration_id: "job-1".into(),
            output_dir: output_dir.to_path_buf(),
            session_token: "tok".into(),
        }
    }

    fn entry(file_name: &str, path: &[&str], url: &str) -> ManifestEntry {
        ManifestEntry {
            node_id: format!("N:package:{file_name}"),
            file_name: file_name.into(),
            path: path.iter().map(|s| s.to_string()).collect(),
            url: url.into(),
        }
    }

    #[tokio::test]
    async fn entries_with_missing_fields_are_skipped_without_fetching() {
        let root = TempDir::new().unwrap();
        let fetcher = RecordingFetcher::default();
        let downloader = IntegrationDownloader::with_fetcher(
            config_with_output(root.path()),
            Box::new(fetcher.clone()),
        );

        let manifest = Manifest {
            data: vec![
                entry("", &[], "http://x/nameless"),
                entry("no-url.csv", &[], ""),
                entry("good.csv", &[], "http://x/good.csv"),
            ],
        };
        let summary = downloader.download_all(&manifest).await;

        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.downloaded, 1);
        assert_eq!(fetcher.calls.lock().unwrap().len(), 1);
        assert!(root.path().join("good.csv").is_file());
    }

    #[tokio::test]
    async fn failed_download_does_not_stop_later_entries() {
        let root = TempDir::new().unwrap();
        let fetcher = RecordingFetcher {
            fail_urls: vec!["http://x/b.csv".into()],
            ..Default::default()
        };
        let downloader = IntegrationDownloader::with_fetcher(
            config_with_output(root.path()),
            Box::new(fetcher.clone()),
        );

        let manifest = Manifest {
            data: vec![
                entry("a.csv", &[], "http://x/a.csv"),
                entry("b.csv", &[], "http://x/b.csv"),
                entry("c.csv", &[], "http://x/c.csv"),
            ],
        };
        let summary = downloader.download_all(&manifest).await;

        assert_eq!(summary.downloaded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 3);
        assert_eq!(fetcher.calls.lock().unwrap().len(), 3);
        assert!(root.path().join("a.csv").is_file());
        assert!(!root.path().join("b.csv").exists());
        assert!(root.path().join("c.csv").is_file());
    }

    #[tokio::test]
    async fn path_resolution_failure_skips_the_entry() {
        let root = TempDir::new().unwrap();
        // Occupy "sub" with a regular file so directory creation fails.
        std::fs::write(root.path().join("sub"), b"in the way").unwrap();

        let fetcher = RecordingFetcher::default();
        let downloader = IntegrationDownloader::with_fetcher(
            config_with_output(root.path()),
            Box::new(fetcher.clone()),
        );

        let manifest = Manifest {
            data: vec![
                entry("a.csv", &["sub"], "http://x/a.csv"),
                entry("b.csv", &[], "http://x/b.csv"),
            ],
        };
        let summary = downloader.download_all(&manifest).await;

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.downloaded, 1);
        assert_eq!(*fetcher.calls.lock().unwrap(), vec!["http://x/b.csv"]);
    }

    #[test]
    fn new_reports_missing_wget_as_not_supported() {
        let root = TempDir::new().unwrap();
        // Only meaningful where wget is absent; otherwise the constructor
        // succeeds and there is nothing to assert.
        if which::which("wget").is_err() {
            let err = IntegrationDownloader::new(config_with_output(root.path())).unwrap_err();
            assert!(matches!(err, Error::NotSupported(_)));
        }
    }

    #[tokio::test]
    async fn empty_manifest_produces_zeroed_summary() {
        let root = TempDir::new().unwrap();
        let fetcher = RecordingFetcher::default();
        let downloader = IntegrationDownloader::with_fetcher(
            config_with_output(root.path()),
            Box::new(fetcher.clone()),
        );

        let summary = downloader.download_all(&Manifest::default()).await;

        assert_eq!(summary, RunSummary::default());
        assert!(fetcher.calls.lock().unwrap().is_empty());
    }
}
