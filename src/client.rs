//! Typed HTTP client for the integration and manifest endpoints
//!
//! Each call distinguishes three failure kinds: [`Error::Network`] for
//! transport problems, [`Error::UnexpectedStatus`] for non-2xx answers (body
//! captured for diagnostics), and [`Error::Decode`] when the body does not
//! match the expected shape. No request timeout is configured; a hung remote
//! blocks the run, and retrying is the caller's (or scheduler's) problem.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{Integration, Manifest, PackageIds};
use serde::de::DeserializeOwned;

/// Endpoint label used in error and log context for integration fetches
const INTEGRATION_ENDPOINT: &str = "integration";
/// Endpoint label used in error and log context for manifest fetches
const MANIFEST_ENDPOINT: &str = "download-manifest";

/// Client for the two metadata endpoints of the remote API
pub struct ApiClient {
    http: reqwest::Client,
    integrations_host: String,
    api_host: String,
    session_token: String,
}

impl ApiClient {
    /// Create a client from the agent configuration
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            integrations_host: config.integrations_host.clone(),
            api_host: config.api_host.clone(),
            session_token: config.session_token.clone(),
        }
    }

    /// Fetch the integration job descriptor.
    ///
    /// Issues `GET {integrations_host}/integrations/{id}` with the session
    /// token as a bearer credential.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`], [`Error::UnexpectedStatus`] or
    /// [`Error::Decode`] depending on where the request failed.
    pub async fn fetch_integration(&self, integration_id: &str) -> Result<Integration> {
        let url = format!("{}/integrations/{}", self.integrations_host, integration_id);
        tracing::debug!(url = %url, "fetching integration");

        let response = self
            .http
            .get(&url)
            .header("accept", "application/json")
            .header("Authorization", format!("Bearer {}", self.session_token))
            .send()
            .await?;

        decode(INTEGRATION_ENDPOINT, response).await
    }

    /// Resolve a set of package identifiers into a signed download manifest.
    ///
    /// Issues `POST {api_host}/packages/download-manifest?api_key={token}`
    /// with the serialized [`PackageIds`] as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`], [`Error::UnexpectedStatus`] or
    /// [`Error::Decode`] depending on where the request failed.
    pub async fn fetch_manifest(&self, packages: &PackageIds) -> Result<Manifest> {
        let url = format!("{}/packages/download-manifest", self.api_host);
        tracing::debug!(url = %url, packages = packages.node_ids.len(), "fetching manifest");

        let response = self
            .http
            .post(&url)
            .query(&[("api_key", self.session_token.as_str())])
            .header("accept", "*/*")
            .json(packages)
            .send()
            .await?;

        decode(MANIFEST_ENDPOINT, response).await
    }
}

/// Check the response status and decode the body as the expected shape
async fn decode<T: DeserializeOwned>(
    endpoint: &'static str,
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::error!(endpoint, status = status.as_u16(), body = %body, "unexpected status");
        return Err(Error::UnexpectedStatus {
            endpoint,
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|source| Error::Decode { endpoint, source })
}
