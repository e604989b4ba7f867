//! OpenVidu Core - client library for the OpenVidu REST API.
//!
//! This crate mirrors the server-side state of an OpenVidu deployment
//! (sessions, connections, publishers, subscribers) in local objects that are
//! fetched and refreshed explicitly. It never touches media; only metadata
//! about sessions and participants.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`client`]: Top-level client owning the session mapping and its reconciliation
//! - [`session`]: Per-session object with its own refresh and invalidation
//! - [`types`]: Wire schemas and immutable value objects
//! - [`transport`]: REST transport trait and its reqwest implementation
//! - [`config`]: Client configuration
//! - [`error`]: Centralized error types
//!
//! # Abstraction Traits
//!
//! - [`OpenViduTransport`](transport::OpenViduTransport): Talking to the server.
//!   [`HttpTransport`](transport::HttpTransport) is the default implementation;
//!   tests and embedders can provide their own.
//!
//! # Example
//! ```ignore
//! let client = OpenViduClient::connect(&ClientConfig::new(url, secret)).await?;
//! let session = client.get_session("TestSession")?;
//! // ... later
//! client.fetch().await?;
//! if !session.is_valid() {
//!     // the server closed it
//! }
//! ```

#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod protocol_constants;
pub mod session;
pub mod transport;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_fixtures;

// Re-export commonly used types at the crate root
pub use client::OpenViduClient;
pub use config::ClientConfig;
pub use error::{ErrorCode, OpenViduError, OpenViduResult, TransportError, TransportResult};
pub use session::Session;
pub use transport::{HttpTransport, OpenViduTransport};
pub use utils::now_millis;

// Re-export value objects
pub use types::{
    Connection, Filter, MediaMode, MediaOptions, OpenViduConfig, OutputMode, Publisher,
    RecordingLayout, RecordingMode, Role, SessionInfo, SessionProperties, Subscriber, Token,
    TokenOptions, VideoDimensions, VideoType,
};
