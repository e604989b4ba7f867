//! Client configuration.

use serde::{Deserialize, Serialize};

use crate::error::{OpenViduError, OpenViduResult};
use crate::protocol_constants::DEFAULT_REQUEST_TIMEOUT_SECS;

/// Configuration for connecting to one OpenVidu deployment.
///
/// All fields except `url` and `secret` have sensible defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the deployment (e.g. `https://media.example.com:4443/`).
    pub url: String,

    /// Deployment secret used as the basic-auth password.
    pub secret: String,

    /// Timeout applied to every REST request (seconds).
    pub request_timeout_secs: u64,

    /// Accept self-signed TLS certificates (development deployments only).
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    /// Creates a configuration with default timeouts for the given deployment.
    pub fn new(url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`OpenViduError::Configuration`] if any value would make every
    /// request fail.
    pub fn validate(&self) -> OpenViduResult<()> {
        if self.url.trim().is_empty() {
            return Err(OpenViduError::Configuration("url must not be empty".into()));
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(OpenViduError::Configuration(format!(
                "url must start with http:// or https://, got {}",
                self.url
            )));
        }
        if self.secret.is_empty() {
            return Err(OpenViduError::Configuration(
                "secret must not be empty".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(OpenViduError::Configuration(
                "request_timeout_secs must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            secret: String::new(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            accept_invalid_certs: false,
        }
    }
}
