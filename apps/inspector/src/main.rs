//! OpenVidu Inspect - command-line view of an OpenVidu deployment.
//!
//! Fetches the session snapshot once and prints sessions, connections and
//! streams, or performs a single administrative action.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use openvidu_core::{now_millis, Connection, OpenViduClient, Session};

use crate::config::InspectorConfig;

/// OpenVidu Inspect - list and manage sessions on an OpenVidu deployment.
#[derive(Parser, Debug)]
#[command(name = "openvidu-inspect")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (YAML).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(short, long, default_value = "warn", env = "OPENVIDU_LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// Deployment base URL (overrides config file).
    #[arg(short, long)]
    url: Option<String>,

    /// Deployment secret (overrides config file).
    #[arg(short, long)]
    secret: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every session with its connections (default).
    Sessions,
    /// Show one session with publishers and subscribers.
    Session {
        /// Session id.
        id: String,
    },
    /// Print the deployment configuration.
    Config,
    /// Close a session, disconnecting every participant.
    Close {
        /// Session id.
        id: String,
    },
    /// Force one connection out of a session.
    Disconnect {
        /// Session id.
        session_id: String,
        /// Connection id.
        connection_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .format_timestamp_millis()
        .init();

    log::info!("OpenVidu Inspect v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config =
        InspectorConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Apply CLI overrides
    if let Some(url) = args.url {
        config.url = url;
    }
    if let Some(secret) = args.secret {
        config.secret = secret;
    }

    log::info!(
        "Configuration: url={}, request_timeout_secs={}",
        config.url,
        config.request_timeout_secs
    );

    let client = OpenViduClient::connect(&config.to_client_config())
        .await
        .with_context(|| format!("Failed to fetch sessions from {}", config.url))?;

    match args.command.unwrap_or(Command::Sessions) {
        Command::Sessions => {
            let sessions = client.get_sessions();
            println!("{} session(s)", client.session_count());
            for session in &sessions {
                print_session(session, false)?;
            }
        }
        Command::Session { id } => {
            let session = client.get_session(&id)?;
            print_session(&session, true)?;
        }
        Command::Config => {
            let server_config = client
                .get_config()
                .await
                .context("Failed to fetch configuration")?;
            for (key, value) in server_config.as_map() {
                println!("{key}: {value}");
            }
        }
        Command::Close { id } => {
            client.get_session(&id)?.close().await?;
            println!("Closed {id}");
        }
        Command::Disconnect {
            session_id,
            connection_id,
        } => {
            client
                .get_session(&session_id)?
                .disconnect(&connection_id)
                .await?;
            println!("Disconnected {connection_id} from {session_id}");
        }
    }

    Ok(())
}

fn print_session(session: &Session, detailed: bool) -> Result<()> {
    let info = session.properties();
    let age_secs = now_millis().saturating_sub(info.created_at) / 1000;
    println!(
        "{} ({:?}, {:?} recording{}) age {}s, {} connection(s)",
        session.id(),
        info.media_mode,
        info.recording_mode,
        if info.recording { ", recording now" } else { "" },
        age_secs,
        session.connection_count()
    );

    for connection in session.get_connections()? {
        print_connection(&connection, detailed);
    }
    Ok(())
}

fn print_connection(connection: &Connection, detailed: bool) {
    println!(
        "  {} {:?} [{}] {}",
        connection.connection_id, connection.role, connection.platform, connection.client_data
    );
    if !detailed {
        return;
    }

    for publisher in &connection.publishers {
        let options = &publisher.media_options;
        let dimensions = options
            .dimensions()
            .map(|d| format!("{}x{}", d.width, d.height))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "    pub {} audio={} video={} {} {}fps filter={}",
            publisher.stream_id,
            options.audio_active,
            options.video_active,
            dimensions,
            options.frame_rate.unwrap_or(0),
            options
                .filter
                .as_ref()
                .map_or("none", |f| f.filter_type.as_str())
        );
    }
    for subscriber in &connection.subscribers {
        println!(
            "    sub {} from {}",
            subscriber.stream_id, subscriber.publisher_connection_id
        );
    }
}
