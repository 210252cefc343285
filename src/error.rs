//! Error types for integration-dl
//!
//! The error taxonomy mirrors the pipeline's propagation policy: the two
//! metadata endpoints distinguish transport failure, unexpected HTTP status,
//! and decode failure as separate variants, while per-file problems (path
//! resolution, fetch) are isolated by the orchestrator and never abort a run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for integration-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for integration-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The environment variable or key that caused the error
        key: Option<String>,
    },

    /// Transport-level failure (DNS, connection, reset) talking to the API
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success HTTP status
    #[error("{endpoint} returned status {status}")]
    UnexpectedStatus {
        /// Which endpoint answered (e.g. "integration", "download-manifest")
        endpoint: &'static str,
        /// The HTTP status code received
        status: u16,
        /// The response body, kept for diagnostics
        body: String,
    },

    /// The API response body did not match the expected JSON shape
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        /// Which endpoint produced the body
        endpoint: &'static str,
        /// The underlying deserialization error
        source: serde_json::Error,
    },

    /// I/O error (directory creation, file writes)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File transfer error
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Operation not supported (missing binary, not implemented)
    #[error("not supported: {0}")]
    NotSupported(String),
}

/// File transfer errors
#[derive(Debug, Error)]
pub enum FetchError {
    /// The fetcher process could not be started
    #[error("failed to spawn {binary}: {source}")]
    Spawn {
        /// Path to the binary that failed to spawn
        binary: PathBuf,
        /// The underlying spawn error
        source: std::io::Error,
    },

    /// The fetcher process exited with a non-zero status
    #[error("fetcher exited with status {code:?}")]
    NonZeroExit {
        /// The process exit code, if one was available
        code: Option<i32>,
        /// Captured standard error, kept as the failure detail
        stderr: String,
    },
}
