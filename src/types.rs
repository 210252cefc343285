//! Wire types for the integration and manifest endpoints, plus the run summary
//!
//! Every wire field is defaulted: the remote service is free to omit fields
//! (a response like `{"packageIds":[...]}` is valid), and partial descriptors
//! still parse instead of failing the whole run.

use serde::{Deserialize, Serialize};

/// A server-side job descriptor naming a dataset and the packages it covers
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Integration {
    /// Unique identifier of the integration
    pub uuid: String,

    /// Identifier of the owning application
    pub application_id: i64,

    /// Node identifier of the owning dataset
    pub dataset_id: String,

    /// Node identifiers of the packages this job covers (order preserved,
    /// uniqueness not required)
    pub package_ids: Vec<String>,

    /// Opaque parameter bag, not interpreted by this crate
    pub params: serde_json::Value,
}

/// Request body for the manifest endpoint, serialized as `{"nodeIds":[...]}`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageIds {
    /// The package node identifiers to resolve
    pub node_ids: Vec<String>,
}

impl From<&Integration> for PackageIds {
    fn from(integration: &Integration) -> Self {
        Self {
            node_ids: integration.package_ids.clone(),
        }
    }
}

/// The server's mapping of requested packages to downloadable file entries
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Manifest entries, one per downloadable file, in server order
    pub data: Vec<ManifestEntry>,
}

/// One downloadable file within a manifest
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManifestEntry {
    /// Node identifier of the package this file belongs to
    pub node_id: String,

    /// File name for the destination on disk
    pub file_name: String,

    /// Logical directory path under the output root; empty means the root
    pub path: Vec<String>,

    /// Time-limited download URL
    pub url: String,
}

impl ManifestEntry {
    /// Whether this entry satisfies the download invariant: a download is
    /// only attempted when both the file name and the URL are non-empty.
    #[must_use]
    pub fn is_downloadable(&self) -> bool {
        !self.file_name.is_empty() && !self.url.is_empty()
    }
}

/// Aggregate outcome of one download run
#[must_use]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Entries fetched and written to disk
    pub downloaded: usize,
    /// Entries skipped before a transfer was attempted (invariant violation
    /// or path-resolution failure)
    pub skipped: usize,
    /// Entries whose transfer was attempted and failed
    pub failed: usize,
}

impl RunSummary {
    /// Total number of manifest entries processed
    #[must_use]
    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }

    /// Whether any attempted transfer failed
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
