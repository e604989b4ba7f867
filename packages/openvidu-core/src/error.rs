//! Centralized error types for the OpenVidu client library.
//!
//! Two layers:
//! - [`TransportError`] for anything the REST transport reports
//! - [`OpenViduError`] for the object model, which turns transport not-found
//!   conditions into session/connection specific kinds where the ids are known

use thiserror::Error;

/// Trait for error types that provide machine-readable error codes.
///
/// Implement this trait to provide consistent error codes across different
/// error conversion paths.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;
}

// ─────────────────────────────────────────────────────────────────────────────
// Transport Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while talking to the OpenVidu REST API.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request to the server failed (connect, TLS, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success HTTP status other than 404.
    #[error("HTTP error {0}: {1}")]
    HttpStatus(u16, String),

    /// Server reported the addressed resource does not exist (HTTP 404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Response body did not match the expected schema.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Convenient Result alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

impl TransportError {
    /// Returns true if the server reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true if the server answered with the given HTTP status.
    #[must_use]
    pub fn has_status(&self, status: u16) -> bool {
        match self {
            Self::HttpStatus(code, _) => *code == status,
            Self::NotFound(_) => status == 404,
            _ => false,
        }
    }

    /// Returns true if the request timed out before the server answered.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}

impl ErrorCode for TransportError {
    fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "http_request_failed",
            Self::HttpStatus(_, _) => "http_error_status",
            Self::NotFound(_) => "not_found",
            Self::Decode(_) => "decode_error",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Object Model Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by [`OpenViduClient`](crate::OpenViduClient) and
/// [`Session`](crate::Session) operations.
///
/// The not-found kinds mean local state is stale relative to the server;
/// callers holding objects they did not just fetch should expect them.
#[derive(Debug, Error)]
pub enum OpenViduError {
    /// The session id is not part of the current server-confirmed state.
    #[error("Session does not exist: {0}")]
    SessionDoesNotExist(String),

    /// The session object was invalidated by an earlier fetch.
    #[error("Session is no longer valid: {0}")]
    SessionInvalid(String),

    /// No connection with this id exists inside the session.
    #[error("Connection {connection_id} does not exist in session {session_id}")]
    ConnectionDoesNotExist {
        session_id: String,
        connection_id: String,
    },

    /// Client configuration is unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Any other transport or decoding failure, passed through unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Convenient Result alias for client and session operations.
pub type OpenViduResult<T> = Result<T, OpenViduError>;

impl OpenViduError {
    /// Returns true for the session/connection not-found kinds.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SessionDoesNotExist(_)
                | Self::SessionInvalid(_)
                | Self::ConnectionDoesNotExist { .. }
        )
    }
}

impl ErrorCode for OpenViduError {
    fn code(&self) -> &'static str {
        match self {
            Self::SessionDoesNotExist(_) => "session_does_not_exist",
            Self::SessionInvalid(_) => "session_invalid",
            Self::ConnectionDoesNotExist { .. } => "connection_does_not_exist",
            Self::Configuration(_) => "configuration_error",
            Self::Transport(e) => e.code(),
        }
    }
}
