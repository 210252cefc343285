//! Configuration for the download agent
//!
//! All process configuration is collected once at startup into an explicit
//! [`Config`] record; nothing reads the environment mid-run.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Environment variable naming the integration (job) to resolve
pub const ENV_INTEGRATION_ID: &str = "INTEGRATION_ID";
/// Environment variable naming the output root directory
pub const ENV_OUTPUT_DIR: &str = "OUTPUT_DIR";
/// Environment variable carrying the session credential
pub const ENV_SESSION_TOKEN: &str = "SESSION_TOKEN";
/// Environment variable naming the host used for the manifest request
pub const ENV_API_HOST: &str = "PENNSIEVE_API_HOST";
/// Environment variable naming the host used for the integration request
pub const ENV_INTEGRATIONS_HOST: &str = "PENNSIEVE_API_HOST2";

/// Runtime configuration for [`IntegrationDownloader`](crate::IntegrationDownloader)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the host serving `/integrations/{id}`
    pub integrations_host: String,

    /// Base URL of the host serving `/packages/download-manifest`
    pub api_host: String,

    /// Identifier of the integration job to resolve
    pub integration_id: String,

    /// Root directory under which downloaded files are materialized
    pub output_dir: PathBuf,

    /// Session credential sent as a bearer token / api_key
    pub session_token: String,
}

impl Config {
    /// Build a configuration from the process environment.
    ///
    /// Reads `INTEGRATION_ID`, `OUTPUT_DIR`, `SESSION_TOKEN`,
    /// `PENNSIEVE_API_HOST` and `PENNSIEVE_API_HOST2` once. Both hosts must
    /// parse as absolute URLs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending variable when one is
    /// missing, empty, or not a valid URL.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            integrations_host: required_host(ENV_INTEGRATIONS_HOST)?,
            api_host: required_host(ENV_API_HOST)?,
            integration_id: required(ENV_INTEGRATION_ID)?,
            output_dir: PathBuf::from(required(ENV_OUTPUT_DIR)?),
            session_token: required(ENV_SESSION_TOKEN)?,
        })
    }
}

/// Read a required environment variable, rejecting unset and empty values
fn required(key: &'static str) -> Result<String> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::Config {
            message: format!("required environment variable {key} is not set"),
            key: Some(key.to_string()),
        }),
    }
}

/// Read a required environment variable that must be an absolute URL
fn required_host(key: &'static str) -> Result<String> {
    let value = required(key)?;
    Url::parse(&value).map_err(|e| Error::Config {
        message: format!("{key} is not a valid URL: {e}"),
        key: Some(key.to_string()),
    })?;
    Ok(value)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ALL_VARS: [&str; 5] = [
        ENV_INTEGRATION_ID,
        ENV_OUTPUT_DIR,
        ENV_SESSION_TOKEN,
        ENV_API_HOST,
        ENV_INTEGRATIONS_HOST,
    ];

    fn set_all_valid() {
        // set_var/remove_var are unsafe in edition 2024; serial_test keeps
        // these tests from racing each other on the process environment.
        unsafe {
            std::env::set_var(ENV_INTEGRATION_ID, "job-1");
            std::env::set_var(ENV_OUTPUT_DIR, "/out");
            std::env::set_var(ENV_SESSION_TOKEN, "tok-123");
            std::env::set_var(ENV_API_HOST, "https://api.example.org");
            std::env::set_var(ENV_INTEGRATIONS_HOST, "https://api2.example.org");
        }
    }

    fn clear_all() {
        unsafe {
            for var in ALL_VARS {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn from_env_reads_all_five_variables() {
        set_all_valid();
        let config = Config::from_env().unwrap();
        assert_eq!(config.integration_id, "job-1");
        assert_eq!(config.output_dir, PathBuf::from("/out"));
        assert_eq!(config.session_token, "tok-123");
        assert_eq!(config.api_host, "https://api.example.org");
        assert_eq!(config.integrations_host, "https://api2.example.org");
        clear_all();
    }

    #[test]
    #[serial]
    fn missing_variable_is_config_error_naming_the_key() {
        set_all_valid();
        unsafe {
            std::env::remove_var(ENV_SESSION_TOKEN);
        }
        let err = Config::from_env().unwrap_err();
        match err {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some(ENV_SESSION_TOKEN)),
            other => panic!("expected Config error, got {other:?}"),
        }
        clear_all();
    }

    #[test]
    #[serial]
    fn empty_variable_is_rejected_like_missing() {
        set_all_valid();
        unsafe {
            std::env::set_var(ENV_INTEGRATION_ID, "");
        }
        let err = Config::from_env().unwrap_err();
        match err {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some(ENV_INTEGRATION_ID)),
            other => panic!("expected Config error, got {other:?}"),
        }
        clear_all();
    }

    #[test]
    #[serial]
    fn non_url_host_is_rejected() {
        set_all_valid();
        unsafe {
            std::env::set_var(ENV_API_HOST, "not a url");
        }
        let err = Config::from_env().unwrap_err();
        match err {
            Error::Config { key, message } => {
                assert_eq!(key.as_deref(), Some(ENV_API_HOST));
                assert!(message.contains("not a valid URL"));
            }
            other => panic!("expected Config error, got {other:?}"),
        }
        clear_all();
    }
}
