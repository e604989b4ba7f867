//! Wire schemas and value objects for the OpenVidu REST API.
//!
//! Every fetch decodes into freshly owned values; nothing here is shared
//! between snapshots or mutated after construction.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Enumerations
// ─────────────────────────────────────────────────────────────────────────────

/// How media flows between participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaMode {
    /// Media is routed through the server.
    #[default]
    Routed,
    /// Media is sent peer to peer.
    Relayed,
}

/// When the server records a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordingMode {
    /// Recording starts only on explicit request.
    #[default]
    Manual,
    /// Recording starts with the first published stream.
    Always,
}

/// Recording output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputMode {
    /// All streams mixed into one file.
    #[default]
    Composed,
    /// One file per stream.
    Individual,
}

/// Arrangement of streams in a composed recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordingLayout {
    #[default]
    BestFit,
    PictureInPicture,
    VerticalPresentation,
    HorizontalPresentation,
    Custom,
}

/// Signaling role of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Can only subscribe to streams.
    Subscriber,
    /// Can subscribe and publish.
    #[default]
    Publisher,
    /// Can publish, subscribe and force-disconnect others.
    Moderator,
}

/// Source of a published video track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoType {
    Camera,
    Screen,
    Custom,
    Ipcam,
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Snapshots
// ─────────────────────────────────────────────────────────────────────────────

/// Response of `GET api/sessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionList {
    /// Element count as reported by the server.
    pub number_of_elements: usize,
    /// Sessions in server order.
    pub content: Vec<SessionSnapshot>,
}

/// One session as returned by the server, including its connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub created_at: u64,
    pub media_mode: MediaMode,
    pub recording_mode: RecordingMode,
    pub default_output_mode: OutputMode,
    /// Only meaningful for composed output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_recording_layout: Option<RecordingLayout>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_string_as_none"
    )]
    pub custom_session_id: Option<String>,
    pub connections: ConnectionList,
    pub recording: bool,
}

impl SessionSnapshot {
    /// Splits the snapshot into session attributes and its connections.
    pub fn into_parts(self) -> (SessionInfo, Vec<Connection>) {
        let info = SessionInfo {
            session_id: self.session_id,
            created_at: self.created_at,
            media_mode: self.media_mode,
            recording_mode: self.recording_mode,
            default_output_mode: self.default_output_mode,
            default_recording_layout: self.default_recording_layout,
            custom_session_id: self.custom_session_id,
            recording: self.recording,
        };
        (info, self.connections.content)
    }
}

/// Connection collection nested in a session snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionList {
    pub number_of_elements: usize,
    pub content: Vec<Connection>,
}

/// Session attributes without the connection list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub session_id: String,
    pub created_at: u64,
    pub media_mode: MediaMode,
    pub recording_mode: RecordingMode,
    pub default_output_mode: OutputMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_recording_layout: Option<RecordingLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_session_id: Option<String>,
    pub recording: bool,
}

impl SessionInfo {
    /// Builds attributes for a session the server just created.
    ///
    /// The creation response only carries id and timestamp, so the rest
    /// comes from the properties that were requested.
    pub fn from_created(created: &CreatedSession, properties: &SessionProperties) -> Self {
        Self {
            session_id: created.id.clone(),
            created_at: created.created_at,
            media_mode: properties.media_mode,
            recording_mode: properties.recording_mode,
            default_output_mode: properties.default_output_mode,
            default_recording_layout: properties.default_recording_layout,
            custom_session_id: properties.custom_session_id.clone(),
            recording: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Connections and Streams
// ─────────────────────────────────────────────────────────────────────────────

/// One participant's link to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub connection_id: String,
    pub created_at: u64,
    pub location: String,
    /// Browser / user-agent description.
    pub platform: String,
    /// Full WebSocket URL with session id, token, role and TURN credentials.
    pub token: String,
    pub role: Role,
    pub server_data: String,
    pub client_data: String,
    pub publishers: Vec<Publisher>,
    pub subscribers: Vec<Subscriber>,
}

impl Connection {
    /// Returns a query parameter embedded in the connection token URL.
    ///
    /// Useful for `turnUsername` / `turnCredential` and the raw `token` value.
    #[must_use]
    pub fn token_param(&self, name: &str) -> Option<&str> {
        let (_, query) = self.token.split_once('?')?;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// Returns true if the connection sends at least one stream.
    #[must_use]
    pub fn is_publishing(&self) -> bool {
        !self.publishers.is_empty()
    }

    /// Finds a published stream by id.
    #[must_use]
    pub fn publisher(&self, stream_id: &str) -> Option<&Publisher> {
        self.publishers.iter().find(|p| p.stream_id == stream_id)
    }
}

/// A stream sent by a connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    pub created_at: u64,
    pub stream_id: String,
    pub media_options: MediaOptions,
}

/// Media properties of a published stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaOptions {
    pub has_audio: bool,
    pub audio_active: bool,
    pub has_video: bool,
    pub video_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_of_video: Option<VideoType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<u32>,
    /// JSON-encoded `{"width":..,"height":..}` as sent by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_dimensions: Option<String>,
    /// `None` when no filter is applied (absent, `null` or `{}` on the wire).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_filter_as_none"
    )]
    pub filter: Option<Filter>,
}

impl MediaOptions {
    /// Parses the encoded video dimensions.
    ///
    /// Returns `None` if the stream has no dimensions or they are malformed.
    #[must_use]
    pub fn dimensions(&self) -> Option<VideoDimensions> {
        self.video_dimensions
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}

/// Decoded video dimensions of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDimensions {
    pub width: u32,
    pub height: u32,
}

/// A media filter applied to a published stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(rename = "type")]
    pub filter_type: String,
    #[serde(default)]
    pub options: Value,
}

/// A stream received by a connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub created_at: u64,
    pub stream_id: String,
    /// Connection id of the publisher this subscription reads from.
    #[serde(rename = "publisher")]
    pub publisher_connection_id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Requests and Responses
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `POST api/sessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProperties {
    pub media_mode: MediaMode,
    pub recording_mode: RecordingMode,
    pub default_output_mode: OutputMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_recording_layout: Option<RecordingLayout>,
    /// Requested session id; the server generates one when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_session_id: Option<String>,
}

impl Default for SessionProperties {
    fn default() -> Self {
        Self {
            media_mode: MediaMode::default(),
            recording_mode: RecordingMode::default(),
            default_output_mode: OutputMode::default(),
            default_recording_layout: Some(RecordingLayout::default()),
            custom_session_id: None,
        }
    }
}

/// Response of `POST api/sessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSession {
    pub id: String,
    pub created_at: u64,
}

/// Options for a new connection token.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenOptions {
    pub role: Role,
    /// Opaque server data attached to the connection.
    pub data: String,
}

/// Body of `POST api/tokens`.
#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub session: &'a str,
    pub role: Role,
    pub data: &'a str,
}

/// Response of `POST api/tokens`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// WebSocket URL handed to the browser client.
    pub token: String,
    pub session: String,
    pub role: Role,
    #[serde(default)]
    pub data: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Deployment Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Response of `GET config`.
///
/// The server object is held as received, so serialising the value
/// reproduces the response key for key (including `null`s and values whose
/// type differs from what this client expects). Typed accessors read the
/// well-known keys and return `None` when a key is absent or mistyped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpenViduConfig {
    fields: Map<String, Value>,
}

impl OpenViduConfig {
    /// Raw value of a configuration key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Every key as sent by the server.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    fn bool_field(&self, key: &str) -> Option<bool> {
        self.fields.get(key).and_then(Value::as_bool)
    }

    fn u32_field(&self, key: &str) -> Option<u32> {
        self.fields
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
    }

    fn str_list_field(&self, key: &str) -> Option<Vec<&str>> {
        self.fields
            .get(key)?
            .as_array()?
            .iter()
            .map(Value::as_str)
            .collect()
    }

    pub fn version(&self) -> Option<&str> {
        self.str_field("version")
    }

    pub fn public_url(&self) -> Option<&str> {
        self.str_field("openviduPublicurl")
    }

    pub fn cdr_enabled(&self) -> Option<bool> {
        self.bool_field("openviduCdr")
    }

    /// Bandwidth limits in kbps. Negative or oversized values read as `None`.
    pub fn max_recv_bandwidth(&self) -> Option<u32> {
        self.u32_field("maxRecvBandwidth")
    }

    pub fn min_recv_bandwidth(&self) -> Option<u32> {
        self.u32_field("minRecvBandwidth")
    }

    pub fn max_send_bandwidth(&self) -> Option<u32> {
        self.u32_field("maxSendBandwidth")
    }

    pub fn min_send_bandwidth(&self) -> Option<u32> {
        self.u32_field("minSendBandwidth")
    }

    pub fn recording_enabled(&self) -> Option<bool> {
        self.bool_field("openviduRecording")
    }

    pub fn recording_version(&self) -> Option<&str> {
        self.str_field("openviduRecordingVersion")
    }

    pub fn recording_path(&self) -> Option<&str> {
        self.str_field("openviduRecordingPath")
    }

    pub fn recording_public_access(&self) -> Option<bool> {
        self.bool_field("openviduRecordingPublicAccess")
    }

    pub fn recording_notification(&self) -> Option<&str> {
        self.str_field("openviduRecordingNotification")
    }

    pub fn recording_custom_layout(&self) -> Option<&str> {
        self.str_field("openviduRecordingCustomLayout")
    }

    pub fn recording_autostop_timeout(&self) -> Option<u32> {
        self.u32_field("openviduRecordingAutostopTimeout")
    }

    pub fn webhook_enabled(&self) -> Option<bool> {
        self.bool_field("openviduWebhook")
    }

    pub fn webhook_endpoint(&self) -> Option<&str> {
        self.str_field("openviduWebhookEndpoint")
    }

    pub fn webhook_headers(&self) -> Option<Vec<&str>> {
        self.str_list_field("openviduWebhookHeaders")
    }

    pub fn webhook_events(&self) -> Option<Vec<&str>> {
        self.str_list_field("openviduWebhookEvents")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoding Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn empty_filter_as_none<'de, D>(deserializer: D) -> Result<Option<Filter>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(other) => Filter::deserialize(other)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
