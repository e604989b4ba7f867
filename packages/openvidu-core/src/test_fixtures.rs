//! Shared test fixtures: REST payloads and an in-memory transport.
//!
//! Every builder returns a freshly owned `Value`, so tests can mutate one
//! payload without affecting another.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::error::{TransportError, TransportResult};
use crate::protocol_constants::{connection_path, session_path};
use crate::transport::OpenViduTransport;
use crate::types::{
    CreatedSession, OpenViduConfig, SessionList, SessionProperties, SessionSnapshot, Token,
    TokenOptions,
};

pub const URL_BASE: &str = "http://test.openvidu.io:4443/";
pub const SECRET: &str = "MY_SECRET";

// ─────────────────────────────────────────────────────────────────────────────
// Payload Builders
// ─────────────────────────────────────────────────────────────────────────────

/// A connection publishing one camera stream.
pub fn publisher_connection_json(connection_id: &str) -> Value {
    json!({
        "connectionId": connection_id, "createdAt": 1538482606412u64, "location": "",
        "platform": "Chrome 69.0.3497.100 on Linux 64-bit",
        "token": "wss://localhost:4443?sessionId=TestSession&token=2ezkertrimk6nttk&role=PUBLISHER&turnUsername=H0EQLL&turnCredential=kjh48u",
        "role": "PUBLISHER", "serverData": "", "clientData": "TestClient1",
        "publishers": [{
            "createdAt": 1538482606976u64, "streamId": "vhdxz7abbfirh2lh_CAMERA_CLVAU",
            "mediaOptions": {
                "hasAudio": true, "audioActive": true, "hasVideo": true, "videoActive": true,
                "typeOfVideo": "CAMERA", "frameRate": 30,
                "videoDimensions": "{\"width\":640,\"height\":480}", "filter": {}
            }
        }],
        "subscribers": []
    })
}

/// A connection subscribed to the stream of `vhdxz7abbfirh2lh`.
pub fn subscriber_connection_json(connection_id: &str) -> Value {
    json!({
        "connectionId": connection_id, "createdAt": 1538482607659u64, "location": "",
        "platform": "Chrome 69.0.3497.100 on Linux 64-bit",
        "token": "wss://localhost:4443?sessionId=TestSession&token=ovj1b4ysuqmcirti&role=PUBLISHER&turnUsername=INOAHN&turnCredential=oujrqd",
        "role": "PUBLISHER", "serverData": "", "clientData": "TestClient2",
        "publishers": [],
        "subscribers": [{
            "createdAt": 1538482607799u64, "streamId": "vhdxz7abbfirh2lh_CAMERA_CLVAU",
            "publisher": "vhdxz7abbfirh2lh"
        }]
    })
}

/// A session fragment with the given connections.
pub fn session_json(session_id: &str, connections: Vec<Value>) -> Value {
    json!({
        "sessionId": session_id, "createdAt": 1538482606338u64, "mediaMode": "ROUTED",
        "recordingMode": "MANUAL", "defaultOutputMode": "COMPOSED",
        "defaultRecordingLayout": "BEST_FIT", "customSessionId": "TestSession",
        "connections": {"numberOfElements": connections.len(), "content": connections},
        "recording": false
    })
}

/// A session fragment with one publisher and one subscriber connection.
pub fn default_session_json(session_id: &str) -> Value {
    session_json(
        session_id,
        vec![
            publisher_connection_json("vhdxz7abbfirh2lh"),
            subscriber_connection_json("maxawd3ysuj1rxvq"),
        ],
    )
}

/// A session list response.
pub fn session_list_json(sessions: Vec<Value>) -> Value {
    json!({"numberOfElements": sessions.len(), "content": sessions})
}

/// Two sessions, `TestSession` and `TestSession2`, two connections each.
pub fn sessions_json() -> Value {
    session_list_json(vec![
        default_session_json("TestSession"),
        default_session_json("TestSession2"),
    ])
}

/// An empty session list response.
pub fn no_sessions_json() -> Value {
    session_list_json(vec![])
}

/// A `GET config` response from a 2.9 deployment.
pub fn config_json() -> Value {
    json!({
        "version": "2.9.0", "openviduPublicurl": URL_BASE, "openviduCdr": false,
        "maxRecvBandwidth": 1000, "minRecvBandwidth": 300, "maxSendBandwidth": 1000,
        "minSendBandwidth": 300, "openviduRecording": true, "openviduRecordingVersion": "2.8.0",
        "openviduRecordingPath": "/opt/openvidu/recordings/",
        "openviduRecordingPublicAccess": true,
        "openviduRecordingNotification": "publisher_moderator",
        "openviduRecordingCustomLayout": "/opt/openvidu/custom-layout/",
        "openviduRecordingAutostopTimeout": 120, "openviduWebhook": true,
        "openviduWebhookEndpoint": "http://localhost:7777/webhook/",
        "openviduWebhookHeaders": ["Authorization: Basic YWJjZDphYmNk"],
        "openviduWebhookEvents": ["recordingStatusChanged"]
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock Transport
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory stand-in for the OpenVidu server.
///
/// Holds the current server state as a session list payload. Mutating
/// operations (close, disconnect, create) update that payload the way the
/// real server would, and every call is counted.
pub struct MockTransport {
    sessions: Mutex<Value>,
    config: Mutex<Value>,
    pub list_calls: AtomicUsize,
    pub session_calls: AtomicUsize,
    pub config_calls: AtomicUsize,
    pub close_calls: AtomicUsize,
    pub token_calls: AtomicUsize,
}

impl MockTransport {
    /// Creates a server holding [`sessions_json`].
    pub fn new() -> Self {
        Self::with_sessions(sessions_json())
    }

    /// Creates a server holding the given session list payload.
    pub fn with_sessions(sessions: Value) -> Self {
        Self {
            sessions: Mutex::new(sessions),
            config: Mutex::new(config_json()),
            list_calls: AtomicUsize::new(0),
            session_calls: AtomicUsize::new(0),
            config_calls: AtomicUsize::new(0),
            close_calls: AtomicUsize::new(0),
            token_calls: AtomicUsize::new(0),
        }
    }

    /// Replaces the server state returned by subsequent calls.
    pub fn set_sessions(&self, sessions: Value) {
        *self.sessions.lock() = sessions;
    }

    /// Replaces the configuration returned by subsequent calls.
    pub fn set_config(&self, config: Value) {
        *self.config.lock() = config;
    }

    fn find_session(&self, session_id: &str) -> Option<Value> {
        self.sessions.lock()["content"]
            .as_array()
            .and_then(|all| all.iter().find(|s| s["sessionId"] == session_id))
            .cloned()
    }
}

fn count(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

#[async_trait]
impl OpenViduTransport for MockTransport {
    async fn list_sessions(&self) -> TransportResult<SessionList> {
        count(&self.list_calls);
        let payload = self.sessions.lock().clone();
        Ok(serde_json::from_value(payload)?)
    }

    async fn get_session(&self, session_id: &str) -> TransportResult<SessionSnapshot> {
        count(&self.session_calls);
        let payload = self
            .find_session(session_id)
            .ok_or_else(|| TransportError::NotFound(session_path(session_id)))?;
        Ok(serde_json::from_value(payload)?)
    }

    async fn get_config(&self) -> TransportResult<OpenViduConfig> {
        count(&self.config_calls);
        let payload = self.config.lock().clone();
        Ok(serde_json::from_value(payload)?)
    }

    async fn create_session(
        &self,
        properties: &SessionProperties,
    ) -> TransportResult<CreatedSession> {
        let id = properties
            .custom_session_id
            .clone()
            .unwrap_or_else(|| "ses_generated".to_string());
        if self.find_session(&id).is_some() {
            return Err(TransportError::HttpStatus(409, String::new()));
        }

        let mut sessions = self.sessions.lock();
        let mut fragment = session_json(&id, vec![]);
        fragment["createdAt"] = json!(1600000000000u64);
        if let Some(all) = sessions["content"].as_array_mut() {
            all.push(fragment);
        }
        let total = sessions["content"].as_array().map_or(0, Vec::len);
        sessions["numberOfElements"] = json!(total);

        Ok(CreatedSession {
            id,
            created_at: 1600000000000,
        })
    }

    async fn close_session(&self, session_id: &str) -> TransportResult<()> {
        count(&self.close_calls);
        let mut sessions = self.sessions.lock();
        let all = sessions["content"]
            .as_array_mut()
            .ok_or_else(|| TransportError::HttpStatus(500, "malformed fixture".into()))?;
        let before = all.len();
        all.retain(|s| s["sessionId"] != session_id);
        if all.len() == before {
            return Err(TransportError::NotFound(session_path(session_id)));
        }
        let total = all.len();
        sessions["numberOfElements"] = json!(total);
        Ok(())
    }

    async fn disconnect(&self, session_id: &str, connection_id: &str) -> TransportResult<()> {
        let mut sessions = self.sessions.lock();
        let session = sessions["content"]
            .as_array_mut()
            .and_then(|all| all.iter_mut().find(|s| s["sessionId"] == session_id))
            .ok_or_else(|| TransportError::HttpStatus(400, String::new()))?;

        let connections = session["connections"]["content"]
            .as_array_mut()
            .ok_or_else(|| TransportError::HttpStatus(500, "malformed fixture".into()))?;
        let before = connections.len();
        connections.retain(|c| c["connectionId"] != connection_id);
        if connections.len() == before {
            return Err(TransportError::NotFound(connection_path(
                session_id,
                connection_id,
            )));
        }
        let total = connections.len();
        session["connections"]["numberOfElements"] = json!(total);
        Ok(())
    }

    async fn create_token(
        &self,
        session_id: &str,
        options: &TokenOptions,
    ) -> TransportResult<Token> {
        count(&self.token_calls);
        if self.find_session(session_id).is_none() {
            return Err(TransportError::NotFound("api/tokens".into()));
        }
        Ok(Token {
            token: format!("wss://localhost:4443?sessionId={session_id}&token=tok_mock"),
            session: session_id.to_string(),
            role: options.role,
            data: options.data.clone(),
        })
    }
}
