//! Fixed OpenVidu REST protocol constants.
//!
//! These values are defined by the OpenVidu server API and changing them
//! would break compatibility with real deployments.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

// ─────────────────────────────────────────────────────────────────────────────
// Authentication
// ─────────────────────────────────────────────────────────────────────────────

/// User name for HTTP basic auth against the OpenVidu REST API.
///
/// The password is the deployment secret (`OPENVIDU_SECRET` on the server).
pub const BASIC_AUTH_USER: &str = "OPENVIDUAPP";

// ─────────────────────────────────────────────────────────────────────────────
// REST Paths
// ─────────────────────────────────────────────────────────────────────────────

/// Collection of all active sessions (GET lists, POST creates).
pub const SESSIONS_PATH: &str = "api/sessions";

/// Token generation endpoint.
pub const TOKENS_PATH: &str = "api/tokens";

/// Deployment-wide configuration endpoint.
pub const CONFIG_PATH: &str = "config";

/// Characters escaped in an id used as a path segment (everything but RFC 3986
/// unreserved characters).
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Path of a single session resource.
#[must_use]
pub fn session_path(session_id: &str) -> String {
    format!(
        "{SESSIONS_PATH}/{}",
        utf8_percent_encode(session_id, PATH_SEGMENT)
    )
}

/// Path of a single connection inside a session.
#[must_use]
pub fn connection_path(session_id: &str, connection_id: &str) -> String {
    format!(
        "{}/connection/{}",
        session_path(session_id),
        utf8_percent_encode(connection_id, PATH_SEGMENT)
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP
// ─────────────────────────────────────────────────────────────────────────────

/// Default timeout for REST requests (seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
