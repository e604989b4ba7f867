//! reqwest implementation of the OpenVidu REST transport.
//!
//! Handles URL building, basic auth, timeouts and status mapping. Response
//! bodies are read as text and decoded with serde_json so that schema
//! mismatches surface as [`TransportError::Decode`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;

use super::OpenViduTransport;
use crate::config::ClientConfig;
use crate::error::{OpenViduError, OpenViduResult, TransportError, TransportResult};
use crate::protocol_constants::{
    connection_path, session_path, BASIC_AUTH_USER, CONFIG_PATH, SESSIONS_PATH, TOKENS_PATH,
};
use crate::types::{
    CreatedSession, OpenViduConfig, SessionList, SessionProperties, SessionSnapshot, Token,
    TokenOptions, TokenRequest,
};
use crate::utils::build_api_url;

/// Authenticated REST transport for one OpenVidu deployment.
///
/// Cloning is cheap; the underlying reqwest client pools connections.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    secret: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`OpenViduError::Configuration`] if the configuration is invalid
    /// or the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> OpenViduResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| {
                OpenViduError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self::with_client(client, config))
    }

    /// Creates a transport that shares an existing HTTP client.
    #[must_use]
    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.url.clone(),
            secret: config.secret.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// Returns the deployment base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one authenticated request and returns the response body.
    ///
    /// HTTP 404 maps to [`TransportError::NotFound`] carrying `path`; any
    /// other non-success status maps to [`TransportError::HttpStatus`].
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> TransportResult<String> {
        let url = build_api_url(&self.base_url, path);

        log::info!("[REST] {} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .basic_auth(BASIC_AUTH_USER, Some(&self.secret))
            .timeout(self.timeout);

        if let Some(body) = body {
            log::debug!("[REST] Request body: {}", body);
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let start = Instant::now();
        let res = request.send().await;

        log::info!(
            "[REST] {} {} completed in {:?}: {:?}",
            method,
            path,
            start.elapsed(),
            res.as_ref().map(|r| r.status())
        );

        let res = res?;
        let status = res.status();
        let response_text = res.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(TransportError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            return Err(TransportError::HttpStatus(status.as_u16(), response_text));
        }

        log::debug!("[REST] Response body: {}", response_text);
        Ok(response_text)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> TransportResult<T> {
        let text = self.send(Method::GET, path, None).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl OpenViduTransport for HttpTransport {
    async fn list_sessions(&self) -> TransportResult<SessionList> {
        self.get_json(SESSIONS_PATH).await
    }

    async fn get_session(&self, session_id: &str) -> TransportResult<SessionSnapshot> {
        self.get_json(&session_path(session_id)).await
    }

    async fn get_config(&self) -> TransportResult<OpenViduConfig> {
        self.get_json(CONFIG_PATH).await
    }

    async fn create_session(
        &self,
        properties: &SessionProperties,
    ) -> TransportResult<CreatedSession> {
        let body = serde_json::to_string(properties)?;
        let text = self.send(Method::POST, SESSIONS_PATH, Some(body)).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn close_session(&self, session_id: &str) -> TransportResult<()> {
        self.send(Method::DELETE, &session_path(session_id), None)
            .await
            .map(|_| ())
    }

    async fn disconnect(&self, session_id: &str, connection_id: &str) -> TransportResult<()> {
        self.send(
            Method::DELETE,
            &connection_path(session_id, connection_id),
            None,
        )
        .await
        .map(|_| ())
    }

    async fn create_token(
        &self,
        session_id: &str,
        options: &TokenOptions,
    ) -> TransportResult<Token> {
        let body = serde_json::to_string(&TokenRequest {
            session: session_id,
            role: options.role,
            data: &options.data,
        })?;
        let text = self.send(Method::POST, TOKENS_PATH, Some(body)).await?;
        Ok(serde_json::from_str(&text)?)
    }
}
