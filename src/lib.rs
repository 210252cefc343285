//! # integration-dl
//!
//! Download agent for Pennsieve "integration" jobs: fetches a job descriptor
//! from the remote API, resolves its data packages into time-limited signed
//! URLs via a download manifest, and materializes each file on local disk
//! under a directory structure mirroring its logical path.
//!
//! The pipeline has three stages, run strictly in sequence:
//! 1. resolve the integration (job metadata),
//! 2. resolve the referenced packages into a signed download manifest,
//! 3. fetch each manifest entry, isolating per-file failures so one bad URL
//!    never aborts the batch.
//!
//! ## Quick Start
//!
//! ```no_run
//! use integration_dl::{Config, IntegrationDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let downloader = IntegrationDownloader::new(config)?;
//!
//!     let summary = downloader.run().await?;
//!     println!(
//!         "downloaded {} files ({} skipped, {} failed)",
//!         summary.downloaded, summary.skipped, summary.failed
//!     );
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Pipeline orchestration
pub mod agent;
/// Typed HTTP client for the integration and manifest endpoints
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// File transfer seam and the wget implementation
pub mod fetcher;
/// Destination path resolution
pub mod paths;
/// Wire types and the run summary
pub mod types;

// Re-export commonly used types
pub use agent::IntegrationDownloader;
pub use client::ApiClient;
pub use config::Config;
pub use error::{Error, FetchError, Result};
pub use fetcher::{FetchOutput, FileFetcher, WgetFetcher};
pub use types::{Integration, Manifest, ManifestEntry, PackageIds, RunSummary};
