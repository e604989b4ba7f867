//! REST transport abstraction.
//!
//! The object model depends on [`OpenViduTransport`] rather than on an HTTP
//! client, so sessions only hold a shared handle to the transport and tests
//! can substitute an in-memory implementation.
//!
//! # Module Structure
//!
//! - `http` - `HttpTransport`, the reqwest implementation

pub mod http;

use async_trait::async_trait;

use crate::error::TransportResult;
use crate::types::{
    CreatedSession, OpenViduConfig, SessionList, SessionProperties, SessionSnapshot, Token,
    TokenOptions,
};

/// Operations the client and session objects need from the server.
///
/// Implementations must report a missing session-scoped resource as
/// [`TransportError::NotFound`](crate::error::TransportError::NotFound) so
/// callers can tell it apart from other failures.
#[async_trait]
pub trait OpenViduTransport: Send + Sync {
    /// Fetches every active session with its connections.
    async fn list_sessions(&self) -> TransportResult<SessionList>;

    /// Fetches a single session with its connections.
    ///
    /// # Arguments
    /// * `session_id` - Id of the session to fetch
    async fn get_session(&self, session_id: &str) -> TransportResult<SessionSnapshot>;

    /// Fetches the deployment-wide configuration.
    async fn get_config(&self) -> TransportResult<OpenViduConfig>;

    /// Creates a session with the given properties.
    async fn create_session(
        &self,
        properties: &SessionProperties,
    ) -> TransportResult<CreatedSession>;

    /// Closes a session, disconnecting every participant.
    async fn close_session(&self, session_id: &str) -> TransportResult<()>;

    /// Forcibly disconnects one connection from a session.
    ///
    /// # Arguments
    /// * `session_id` - Session the connection belongs to
    /// * `connection_id` - Connection to drop
    async fn disconnect(&self, session_id: &str, connection_id: &str) -> TransportResult<()>;

    /// Generates a connection token for a session.
    async fn create_token(
        &self,
        session_id: &str,
        options: &TokenOptions,
    ) -> TransportResult<Token>;
}

pub use http::HttpTransport;
