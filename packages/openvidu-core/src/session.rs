//! Local mirror of one OpenVidu session.
//!
//! A [`Session`] is shared as `Arc<Session>` between the client's mapping and
//! any external holder. The client updates it in place on every top-level
//! fetch, so holders always observe the latest known state, or a session that
//! is legibly invalid once the server no longer reports it.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{OpenViduError, OpenViduResult, TransportError};
use crate::transport::OpenViduTransport;
use crate::types::{Connection, SessionInfo, SessionSnapshot, Token, TokenOptions};

/// Mutable part of a session, replaced wholesale on each reconcile.
struct SessionState {
    info: SessionInfo,
    /// Connections in server order.
    connections: Vec<Connection>,
}

/// One media session and its connections.
///
/// Holds only a shared handle to the transport, never to the owning client.
pub struct Session {
    id: String,
    transport: Arc<dyn OpenViduTransport>,
    state: RwLock<SessionState>,
    /// Cleared once the server stops reporting the session; never set again.
    valid: AtomicBool,
}

impl Session {
    /// Builds a session from a freshly decoded snapshot.
    pub(crate) fn from_snapshot(
        snapshot: SessionSnapshot,
        transport: Arc<dyn OpenViduTransport>,
    ) -> Self {
        let (info, connections) = snapshot.into_parts();
        let connections = unique_connections(&info.session_id, connections);
        Self::from_parts(info, connections, transport)
    }

    pub(crate) fn from_parts(
        info: SessionInfo,
        connections: Vec<Connection>,
        transport: Arc<dyn OpenViduTransport>,
    ) -> Self {
        Self {
            id: info.session_id.clone(),
            transport,
            state: RwLock::new(SessionState { info, connections }),
            valid: AtomicBool::new(true),
        }
    }

    /// Returns the session id. Available even after invalidation.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns false once the session disappeared from the server.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::SeqCst)
    }

    /// Number of connections as of the last successful fetch.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.state.read().connections.len()
    }

    /// Returns a copy of the session attributes.
    #[must_use]
    pub fn properties(&self) -> SessionInfo {
        self.state.read().info.clone()
    }

    /// Creation timestamp in Unix milliseconds.
    #[must_use]
    pub fn created_at(&self) -> u64 {
        self.state.read().info.created_at
    }

    /// Whether the server reported the session as being recorded.
    #[must_use]
    pub fn is_being_recorded(&self) -> bool {
        self.state.read().info.recording
    }

    /// Returns the current connections in server order.
    ///
    /// # Errors
    ///
    /// Returns [`OpenViduError::SessionInvalid`] if the session was invalidated.
    pub fn get_connections(&self) -> OpenViduResult<Vec<Connection>> {
        if !self.is_valid() {
            return Err(OpenViduError::SessionInvalid(self.id.clone()));
        }
        Ok(self.state.read().connections.clone())
    }

    /// Returns one connection by id.
    ///
    /// # Errors
    ///
    /// Returns [`OpenViduError::SessionInvalid`] if the session was invalidated
    /// and [`OpenViduError::ConnectionDoesNotExist`] if no connection matches.
    pub fn get_connection(&self, connection_id: &str) -> OpenViduResult<Connection> {
        if !self.is_valid() {
            return Err(OpenViduError::SessionInvalid(self.id.clone()));
        }
        self.state
            .read()
            .connections
            .iter()
            .find(|c| c.connection_id == connection_id)
            .cloned()
            .ok_or_else(|| self.connection_gone(connection_id))
    }

    /// Re-fetches this session and replaces its connections.
    ///
    /// # Errors
    ///
    /// Returns [`OpenViduError::SessionDoesNotExist`] if the session is already
    /// invalid or the server reports it gone (which invalidates it). Other
    /// transport failures pass through unchanged.
    pub async fn fetch(&self) -> OpenViduResult<()> {
        self.ensure_valid()?;

        match self.transport.get_session(&self.id).await {
            Ok(snapshot) => {
                // A top-level fetch may have invalidated us while the request was in flight
                self.ensure_valid()?;
                self.reconcile(snapshot);
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(self.gone()),
            Err(e) => Err(e.into()),
        }
    }

    /// Closes the session on the server, disconnecting every participant.
    ///
    /// Invalidates this object on success. The client's mapping keeps the
    /// entry until its next fetch.
    ///
    /// # Errors
    ///
    /// Returns [`OpenViduError::SessionDoesNotExist`] if the session is already
    /// invalid or the server no longer knows it.
    pub async fn close(&self) -> OpenViduResult<()> {
        self.ensure_valid()?;

        match self.transport.close_session(&self.id).await {
            Ok(()) => {
                log::info!("[OpenVidu] Closed session {}", self.id);
                self.invalidate();
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(self.gone()),
            Err(e) => Err(e.into()),
        }
    }

    /// Forcibly disconnects one connection.
    ///
    /// Local connections are not patched; call [`fetch`](Self::fetch) to
    /// observe the change.
    ///
    /// # Errors
    ///
    /// - [`OpenViduError::ConnectionDoesNotExist`] if the server does not know
    ///   the connection
    /// - [`OpenViduError::SessionDoesNotExist`] if the session is invalid or the
    ///   server no longer knows it
    pub async fn disconnect(&self, connection_id: &str) -> OpenViduResult<()> {
        self.ensure_valid()?;

        match self.transport.disconnect(&self.id, connection_id).await {
            Ok(()) => {
                log::info!(
                    "[OpenVidu] Disconnected {} from session {}",
                    connection_id,
                    self.id
                );
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(self.connection_gone(connection_id)),
            // The connection endpoint answers 400 when the session itself is gone
            Err(e @ TransportError::HttpStatus(400, _)) => {
                log::debug!("[OpenVidu] Disconnect rejected: {}", e);
                Err(self.gone())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Generates a connection token for this session.
    ///
    /// # Errors
    ///
    /// Returns [`OpenViduError::SessionDoesNotExist`] if the session is already
    /// invalid or the server no longer knows it.
    pub async fn generate_token(&self, options: &TokenOptions) -> OpenViduResult<Token> {
        self.ensure_valid()?;

        match self.transport.create_token(&self.id, options).await {
            Ok(token) => Ok(token),
            Err(e) if e.is_not_found() => Err(self.gone()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces attributes and connections with a fresh snapshot.
    pub(crate) fn reconcile(&self, snapshot: SessionSnapshot) {
        if snapshot.session_id != self.id {
            log::warn!(
                "[OpenVidu] Ignoring snapshot for {} in session {}",
                snapshot.session_id,
                self.id
            );
            return;
        }

        let reported = snapshot.connections.number_of_elements;
        let (info, connections) = snapshot.into_parts();
        if reported != connections.len() {
            log::warn!(
                "[OpenVidu] Session {} reports {} connections but lists {}",
                self.id,
                reported,
                connections.len()
            );
        }

        let connections = unique_connections(&self.id, connections);

        let mut state = self.state.write();
        log::debug!(
            "[OpenVidu] Session {}: {} -> {} connections",
            self.id,
            state.connections.len(),
            connections.len()
        );
        state.info = info;
        state.connections = connections;
    }

    /// Marks the session as gone. One-way.
    pub(crate) fn invalidate(&self) {
        if self.valid.swap(false, Ordering::SeqCst) {
            log::info!("[OpenVidu] Session {} invalidated", self.id);
        }
    }

    fn ensure_valid(&self) -> OpenViduResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(OpenViduError::SessionDoesNotExist(self.id.clone()))
        }
    }

    /// Invalidates the session and returns the matching error.
    fn gone(&self) -> OpenViduError {
        self.invalidate();
        OpenViduError::SessionDoesNotExist(self.id.clone())
    }

    fn connection_gone(&self, connection_id: &str) -> OpenViduError {
        OpenViduError::ConnectionDoesNotExist {
            session_id: self.id.clone(),
            connection_id: connection_id.to_string(),
        }
    }
}

/// Keeps the first connection for each id, in server order.
fn unique_connections(session_id: &str, connections: Vec<Connection>) -> Vec<Connection> {
    let mut seen = HashSet::with_capacity(connections.len());
    connections
        .into_iter()
        .filter(|c| {
            let first = seen.insert(c.connection_id.clone());
            if !first {
                log::warn!(
                    "[OpenVidu] Duplicate connection {} in session {}, keeping first",
                    c.connection_id,
                    session_id
                );
            }
            first
        })
        .collect()
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("valid", &self.is_valid())
            .field("connection_count", &self.connection_count())
            .finish()
    }
}
