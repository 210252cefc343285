//! Binary entrypoint: env configuration, logging setup, and exit coding.

use integration_dl::{Config, IntegrationDownloader};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let downloader = match IntegrationDownloader::new(config) {
        Ok(downloader) => downloader,
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize downloader");
            return ExitCode::FAILURE;
        }
    };

    match downloader.run().await {
        Ok(summary) if summary.has_failures() => {
            tracing::error!(
                downloaded = summary.downloaded,
                failed = summary.failed,
                "run finished with failed downloads"
            );
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "run aborted");
            ExitCode::FAILURE
        }
    }
}
