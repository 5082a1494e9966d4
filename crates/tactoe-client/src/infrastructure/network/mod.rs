//! Network infrastructure for the client application.
//!
//! Maintains the WebSocket connection to the game server and forwards every
//! inbound text frame to the event loop.
//!
//! Architecture:
//! - `GameConnection` owns the write half of the socket (shared behind a
//!   `tokio::sync::Mutex` so `send_message` can be called from the loop).
//! - A spawned task runs the reconnect loop and the read loop; inbound
//!   frames, connects and disconnects are forwarded on an `mpsc` channel.
//! - Frames are forwarded as raw text.  Decoding happens in the application
//!   layer so that unknown message kinds are logged in one place.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use tactoe_core::{encode_client_message, ClientMessage, ProtocolError};
use thiserror::Error;
use tokio::{
    net::TcpStream,
    sync::{mpsc, Mutex},
    time,
};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message as WsMessage},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;

/// Errors that can occur in the client network layer.
#[derive(Debug, Error)]
pub enum ClientNetworkError {
    /// No connection is open; the message was dropped.
    #[error("not connected to the game server")]
    NotConnected,
    /// A message could not be encoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    /// The WebSocket write failed.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

/// Configuration for the game server connection.
#[derive(Debug, Clone)]
pub struct GameConnectionConfig {
    /// WebSocket endpoint, e.g. `ws://localhost:8080/ws`.
    pub server_url: String,
    /// Delay between reconnection attempts.
    pub reconnect_interval: Duration,
}

impl Default for GameConnectionConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://localhost:8080/ws".to_string(),
            reconnect_interval: Duration::from_secs(3),
        }
    }
}

/// Events emitted by the network layer to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    /// The WebSocket handshake completed.
    Connected { server_url: String },
    /// One text frame from the server.
    FrameReceived(String),
    /// The connection was lost; a reconnect is scheduled.
    Disconnected,
}

/// Manages the WebSocket connection from the client to the game server.
pub struct GameConnection {
    config: GameConnectionConfig,
    sink: Arc<Mutex<Option<WsSink>>>,
}

impl GameConnection {
    /// Creates a new (not yet connected) `GameConnection`.
    pub fn new(config: GameConnectionConfig) -> Self {
        Self {
            config,
            sink: Arc::new(Mutex::new(None)),
        }
    }

    /// Starts the reconnect loop in a background task.
    ///
    /// Returns a channel receiver that delivers [`NetworkEvent`]s to the
    /// caller.  The loop runs until `running` is set to `false` or the
    /// receiver is dropped.
    pub async fn start(self: Arc<Self>, running: Arc<AtomicBool>) -> mpsc::Receiver<NetworkEvent> {
        let (tx, rx) = mpsc::channel(128);
        let this = Arc::clone(&self);

        tokio::spawn(async move {
            while running.load(Ordering::Relaxed) && !tx.is_closed() {
                match connect_async(this.config.server_url.as_str()).await {
                    Ok((stream, _response)) => {
                        info!("connected to game server at {}", this.config.server_url);
                        let (write_half, read_half) = stream.split();
                        *this.sink.lock().await = Some(write_half);

                        let connected = NetworkEvent::Connected {
                            server_url: this.config.server_url.clone(),
                        };
                        if tx.send(connected).await.is_ok() {
                            Self::read_loop(read_half, &tx).await;
                        }

                        *this.sink.lock().await = None;
                        let _ = tx.send(NetworkEvent::Disconnected).await;
                        info!(
                            "disconnected from game server; reconnecting in {:?}",
                            this.config.reconnect_interval
                        );
                    }
                    Err(e) => {
                        warn!("could not connect to game server at {}: {e}", this.config.server_url);
                    }
                }

                if running.load(Ordering::Relaxed) {
                    time::sleep(this.config.reconnect_interval).await;
                }
            }
            debug!("network task stopped");
        });

        rx
    }

    /// Reads frames until the socket closes, forwarding text frames on `tx`.
    async fn read_loop(mut reader: SplitStream<WsStream>, tx: &mpsc::Sender<NetworkEvent>) {
        loop {
            let frame = match reader.next().await {
                Some(Ok(frame)) => frame,
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                    debug!("game server stream ended");
                    break;
                }
                Some(Err(e)) => {
                    warn!("WebSocket read error: {e}");
                    break;
                }
            };

            match frame {
                WsMessage::Text(text) => {
                    if tx.send(NetworkEvent::FrameReceived(text)).await.is_err() {
                        break;
                    }
                }
                WsMessage::Close(_) => {
                    debug!("game server closed the connection");
                    break;
                }
                WsMessage::Binary(bytes) => {
                    debug!(len = bytes.len(), "ignoring binary frame");
                }
                // Ping/Pong are answered by tungstenite itself.
                _ => {}
            }
        }
    }

    /// Encodes and sends a message.
    ///
    /// # Errors
    ///
    /// Returns [`ClientNetworkError::NotConnected`] while no connection is
    /// open (the message is dropped, not queued), or the encode/write error.
    pub async fn send_message(&self, msg: &ClientMessage) -> Result<(), ClientNetworkError> {
        let text = encode_client_message(msg)?;
        let mut guard = self.sink.lock().await;
        let sink = guard.as_mut().ok_or(ClientNetworkError::NotConnected)?;
        sink.send(WsMessage::Text(text)).await?;
        debug!(kind = msg.kind(), "message sent");
        Ok(())
    }

    /// `true` while a connection is open.
    pub async fn is_connected(&self) -> bool {
        self.sink.lock().await.is_some()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
