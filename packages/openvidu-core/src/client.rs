//! Top-level OpenVidu client.
//!
//! [`OpenViduClient`] owns the mapping from session id to [`Session`] and
//! reconciles it against each fetched snapshot:
//!
//! - ids present before and after keep their `Session` object, updated in place
//! - ids only in the snapshot get a new `Session`
//! - ids only in the old mapping are invalidated and dropped
//!
//! Sessions made with [`OpenViduClient::create_session`] wait outside the
//! mapping until a fetch reports their id, at which point that same object
//! is adopted.
//!
//! Nothing refreshes implicitly; callers see new server state only after
//! [`OpenViduClient::fetch`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::config::ClientConfig;
use crate::error::{OpenViduError, OpenViduResult};
use crate::session::Session;
use crate::transport::{HttpTransport, OpenViduTransport};
use crate::types::{OpenViduConfig, SessionInfo, SessionProperties};

/// Client for one OpenVidu deployment.
///
/// # Concurrency design
///
/// - `sessions` is a `RwLock<Vec<_>>` because it is rebuilt as a whole on each
///   fetch and read as a complete list in server order.
/// - The transport call completes before the write guard is taken, so the
///   guard is never held across an await and readers see either the old or
///   the new mapping.
/// - `created` holds sessions created locally but not yet reported by a fetch.
///   Lock order is `sessions` then `created`.
pub struct OpenViduClient {
    transport: Arc<dyn OpenViduTransport>,
    sessions: RwLock<Vec<Arc<Session>>>,
    created: Mutex<HashMap<String, Arc<Session>>>,
}

impl OpenViduClient {
    /// Creates a client talking HTTP to the configured deployment.
    ///
    /// The mapping starts empty; call [`fetch`](Self::fetch) to populate it.
    ///
    /// # Errors
    ///
    /// Returns [`OpenViduError::Configuration`] if the configuration is invalid.
    pub fn new(config: &ClientConfig) -> OpenViduResult<Self> {
        let transport = HttpTransport::new(config)?;
        log::info!("[OpenVidu] Client created for {}", transport.base_url());
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Creates a client and performs the initial fetch.
    ///
    /// # Errors
    ///
    /// Returns configuration errors, or any error from the initial fetch.
    pub async fn connect(config: &ClientConfig) -> OpenViduResult<Self> {
        let client = Self::new(config)?;
        client.fetch().await?;
        Ok(client)
    }

    /// Creates a client on top of an arbitrary transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn OpenViduTransport>) -> Self {
        Self {
            transport,
            sessions: RwLock::new(Vec::new()),
            created: Mutex::new(HashMap::new()),
        }
    }

    /// Fetches the deployment configuration. Never cached.
    ///
    /// # Errors
    ///
    /// Transport failures pass through unchanged.
    pub async fn get_config(&self) -> OpenViduResult<OpenViduConfig> {
        Ok(self.transport.get_config().await?)
    }

    /// Fetches all sessions and reconciles the local mapping.
    ///
    /// On error the mapping is left untouched.
    ///
    /// # Errors
    ///
    /// Transport failures pass through unchanged.
    pub async fn fetch(&self) -> OpenViduResult<()> {
        let list = self.transport.list_sessions().await?;

        if list.number_of_elements != list.content.len() {
            log::warn!(
                "[OpenVidu] Server reports {} sessions but lists {}",
                list.number_of_elements,
                list.content.len()
            );
        }

        let mut sessions = self.sessions.write();
        let mut pending = std::mem::take(&mut *self.created.lock());

        let mut previous: HashMap<String, Arc<Session>> = sessions
            .drain(..)
            .map(|s| (s.id().to_string(), s))
            .collect();
        let mut seen = HashSet::with_capacity(list.content.len());
        let mut next = Vec::with_capacity(list.content.len());
        let (mut updated, mut created) = (0usize, 0usize);

        for snapshot in list.content {
            if !seen.insert(snapshot.session_id.clone()) {
                log::warn!(
                    "[OpenVidu] Duplicate session {} in snapshot, keeping first",
                    snapshot.session_id
                );
                continue;
            }

            if let Some(adopted) = pending.remove(&snapshot.session_id) {
                if adopted.is_valid() {
                    // The server recreated this id, so any older object is stale
                    if let Some(old) = previous.remove(&snapshot.session_id) {
                        old.invalidate();
                        updated += 1;
                    } else {
                        created += 1;
                    }
                    adopted.reconcile(snapshot);
                    next.push(adopted);
                    continue;
                }
            }

            // An invalidated object is never revived, even if the id comes back
            match previous.remove(&snapshot.session_id) {
                Some(existing) if existing.is_valid() => {
                    existing.reconcile(snapshot);
                    next.push(existing);
                    updated += 1;
                }
                _ => {
                    next.push(Arc::new(Session::from_snapshot(
                        snapshot,
                        self.transport.clone(),
                    )));
                    created += 1;
                }
            }
        }

        if !pending.is_empty() {
            log::debug!(
                "[OpenVidu] {} created sessions not reported by this fetch",
                pending.len()
            );
        }

        let removed = previous.len();
        for stale in previous.into_values() {
            stale.invalidate();
        }

        *sessions = next;

        log::info!(
            "[OpenVidu] Fetched {} sessions ({} updated, {} new, {} removed)",
            sessions.len(),
            updated,
            created,
            removed
        );
        Ok(())
    }

    /// Returns all known sessions in server order.
    #[must_use]
    pub fn get_sessions(&self) -> Vec<Arc<Session>> {
        self.sessions.read().clone()
    }

    /// Returns the session with the given id from the local mapping.
    ///
    /// # Errors
    ///
    /// Returns [`OpenViduError::SessionDoesNotExist`] if the id is not in the
    /// mapping. This never contacts the server.
    pub fn get_session(&self, session_id: &str) -> OpenViduResult<Arc<Session>> {
        self.sessions
            .read()
            .iter()
            .find(|s| s.id() == session_id)
            .cloned()
            .ok_or_else(|| OpenViduError::SessionDoesNotExist(session_id.to_string()))
    }

    /// Returns true if the id is in the local mapping.
    #[must_use]
    pub fn has_session(&self, session_id: &str) -> bool {
        self.sessions.read().iter().any(|s| s.id() == session_id)
    }

    /// Number of sessions in the local mapping.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Creates a session on the server.
    ///
    /// The new session starts with no connections. The local mapping is not
    /// changed; the next [`fetch`](Self::fetch) that reports the id adopts the
    /// returned object, keeping its identity. If that fetch does not report it,
    /// the object is left out of the mapping.
    ///
    /// # Errors
    ///
    /// Transport failures pass through unchanged (e.g. HTTP 409 when the custom
    /// session id is already taken).
    pub async fn create_session(
        &self,
        properties: &SessionProperties,
    ) -> OpenViduResult<Arc<Session>> {
        let created = self.transport.create_session(properties).await?;
        let info = SessionInfo::from_created(&created, properties);
        let session = Arc::new(Session::from_parts(
            info,
            Vec::new(),
            self.transport.clone(),
        ));

        self.created
            .lock()
            .insert(created.id.clone(), session.clone());

        log::info!("[OpenVidu] Created session {}", created.id);
        Ok(session)
    }
}
