//! Inspector configuration.
//!
//! Supports loading from YAML files with environment variable overrides.

use std::path::Path;

use anyhow::{Context, Result};
use openvidu_core::ClientConfig;
use serde::Deserialize;

/// Inspector configuration loaded from YAML with environment overrides.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Base URL of the OpenVidu deployment.
    /// Override: `OPENVIDU_URL`
    pub url: String,

    /// Deployment secret.
    /// Override: `OPENVIDU_SECRET`
    pub secret: String,

    /// Timeout for each REST request (seconds).
    /// Override: `OPENVIDU_REQUEST_TIMEOUT`
    pub request_timeout_secs: u64,

    /// Accept self-signed certificates (development deployments).
    pub accept_invalid_certs: bool,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        let client = ClientConfig::default();
        Self {
            url: "https://localhost:4443/".to_string(),
            secret: String::new(),
            request_timeout_secs: client.request_timeout_secs,
            accept_invalid_certs: client.accept_invalid_certs,
        }
    }
}

impl InspectorConfig {
    /// Loads configuration from a YAML file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies overrides looked up by environment variable name.
    ///
    /// Unparseable values are ignored with a warning.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("OPENVIDU_URL") {
            self.url = url;
        }

        if let Some(secret) = lookup("OPENVIDU_SECRET") {
            self.secret = secret;
        }

        if let Some(val) = lookup("OPENVIDU_REQUEST_TIMEOUT") {
            match val.parse() {
                Ok(secs) => self.request_timeout_secs = secs,
                Err(_) => log::warn!("Ignoring invalid OPENVIDU_REQUEST_TIMEOUT: {}", val),
            }
        }
    }

    /// Converts to openvidu-core's client configuration.
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            url: self.url.clone(),
            secret: self.secret.clone(),
            request_timeout_secs: self.request_timeout_secs,
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }
}
