//! Card tic-tac-toe client entry point.
//!
//! Wires together the configuration, the WebSocket connection, the asset
//! loader, and the console input source, then runs the single-threaded event
//! loop that owns the [`GameSession`].
//!
//! # Usage
//!
//! ```text
//! tactoe-client [OPTIONS]
//!
//! Options:
//!   --server-url <URL>    Game server WebSocket endpoint [default: ws://localhost:8080/ws]
//!   --config <PATH>       Config file [default: platform config dir]
//!   --asset-root <DIR>    Directory card graphic paths are resolved against [default: .]
//!   --width <W>           Initial viewport width [default: 1280]
//!   --height <H>          Initial viewport height [default: 720]
//!   --frame-rate <FPS>    Animation ticks per second [default: 60]
//!   --write-config        Write the effective config file and exit
//! ```
//!
//! # Event loop (for beginners)
//!
//! ```text
//!  network task ──FrameReceived──┐
//!  stdin task ────ConsoleCommand─┤
//!  asset reads ───SpriteLoaded───┼──▶ tokio::select! ──▶ GameSession method
//!  frame interval ──tick─────────┘                         │
//!                                                          ▼
//!                                                drain outbox → WebSocket
//! ```
//!
//! `tokio::select!` waits on every source at once and runs exactly one
//! branch per iteration, so each event is fully applied before the next one
//! is looked at.  Background tasks only forward events into channels; none
//! of them touches game state.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, trace, warn};
use tracing_subscriber::EnvFilter;

use tactoe_client::application::game_session::GameSession;
use tactoe_client::application::message_router::route_frame;
use tactoe_client::infrastructure::{
    assets::FsAssetLoader,
    console::{spawn_console_reader, ConsoleCommand},
    network::{ClientNetworkError, GameConnection, GameConnectionConfig, NetworkEvent},
    storage::config::{config_file_path, load_config, save_config, AppConfig},
    ui_bridge::{ConnectionStatus, SceneSnapshot},
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Card tic-tac-toe client.
///
/// Flags override the config file; the config file overrides built-in
/// defaults.
#[derive(Debug, Parser)]
#[command(
    name = "tactoe-client",
    about = "Interactive client for networked card tic-tac-toe",
    version
)]
struct Cli {
    /// WebSocket endpoint of the game server.
    #[arg(long, env = "TACTOE_SERVER_URL")]
    server_url: Option<String>,

    /// Path to a TOML config file.  Without it the platform config directory
    /// is used, and a missing file means built-in defaults.
    #[arg(long, env = "TACTOE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory that card graphic paths are resolved against.
    #[arg(long, default_value = ".", env = "TACTOE_ASSET_ROOT")]
    asset_root: PathBuf,

    /// Initial viewport width.
    #[arg(long)]
    width: Option<u32>,

    /// Initial viewport height.
    #[arg(long)]
    height: Option<u32>,

    /// Animation ticks per second.
    #[arg(long)]
    frame_rate: Option<u32>,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    write_config: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration.
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(url) = &self.server_url {
            config.network.server_url = url.clone();
        }
        if let Some(width) = self.width {
            config.display.width = width;
        }
        if let Some(height) = self.height {
            config.display.height = height;
        }
        if let Some(rate) = self.frame_rate {
            config.display.frame_rate = rate;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_overrides(&mut config);

    // RUST_LOG wins over the config file's log level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.client.log_level)),
        )
        .init();

    if cli.write_config {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => config_file_path().context("no config path available")?,
        };
        save_config(&config, &path)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        info!("configuration written to {}", path.display());
        return Ok(());
    }

    info!("tactoe client starting");
    run(config, cli.asset_root).await
}

async fn run(config: AppConfig, asset_root: PathBuf) -> anyhow::Result<()> {
    let running = Arc::new(AtomicBool::new(true));

    // ── Assets and session ────────────────────────────────────────────────────
    let (assets, mut asset_rx) = FsAssetLoader::new(asset_root);
    let mut session = GameSession::new(config.session_config(), Box::new(assets));

    // ── Network connection ────────────────────────────────────────────────────
    let connection = Arc::new(GameConnection::new(GameConnectionConfig {
        server_url: config.network.server_url.clone(),
        reconnect_interval: config.reconnect_interval(),
    }));
    let mut network_rx = Arc::clone(&connection).start(Arc::clone(&running)).await;
    let mut connection_status = ConnectionStatus::Disconnected;

    // ── Input and frame pacing ────────────────────────────────────────────────
    let mut console_rx = spawn_console_reader();
    let mut frames = time::interval(config.frame_interval());
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        "tactoe client ready; connecting to {}",
        config.network.server_url
    );

    // ── Main event loop ───────────────────────────────────────────────────────
    loop {
        tokio::select! {
            Some(event) = network_rx.recv() => match event {
                NetworkEvent::Connected { server_url } => {
                    info!("connected to {server_url}");
                    connection_status = ConnectionStatus::Connected;
                }
                NetworkEvent::Disconnected => {
                    warn!("connection lost; reconnect in progress");
                    connection_status = ConnectionStatus::Disconnected;
                }
                NetworkEvent::FrameReceived(text) => {
                    route_frame(&mut session, &text);
                }
            },

            Some(command) = console_rx.recv() => match command {
                ConsoleCommand::Input(event) => {
                    session.handle_input(event, std::time::Instant::now());
                }
                ConsoleCommand::Dump => {
                    match SceneSnapshot::capture(&session, connection_status).to_json_pretty() {
                        Ok(json) => println!("{json}"),
                        Err(e) => warn!("could not serialize scene: {e}"),
                    }
                }
                ConsoleCommand::Quit => break,
            },

            Some(loaded) = asset_rx.recv() => session.on_sprite_loaded(loaded),

            tick = frames.tick() => {
                let moved = session.on_frame(tick.into_std());
                if moved && tracing::enabled!(tracing::Level::TRACE) {
                    let snapshot = SceneSnapshot::capture(&session, connection_status);
                    trace!(?snapshot, "frame");
                }
            }

            _ = &mut shutdown => {
                info!("shutdown signal received");
                break;
            }
        }

        flush_outbox(&mut session, &connection).await;
    }

    running.store(false, Ordering::Relaxed);
    info!("tactoe client stopped");
    Ok(())
}

/// Sends every queued message.  Messages produced while disconnected are
/// dropped.
async fn flush_outbox(session: &mut GameSession, connection: &GameConnection) {
    for msg in session.drain_outbox() {
        match connection.send_message(&msg).await {
            Ok(()) => {}
            Err(ClientNetworkError::NotConnected) => {
                debug!(kind = msg.kind(), "not connected; message dropped");
            }
            Err(e) => warn!(kind = msg.kind(), "failed to send message: {e}"),
        }
    }
}
