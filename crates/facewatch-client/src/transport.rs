//! WebSocket transport for the client.
//!
//! Provides [`ConnectedClient`], which carries envelopes between the runtime
//! and a stream server over one WebSocket. This is a thin layer that moves
//! JSON text frames; event semantics stay in the Sans-IO
//! [`crate::ChannelManager`].
//!
//! The transport owns reconnection. Each successful (re)connect is reported as
//! [`ChannelEvent::Connected`] and each loss as
//! [`ChannelEvent::Disconnected`]; the controller above never retries on its
//! own.

use std::time::Duration;

use facewatch_proto::Envelope;
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Message, client::IntoClientRequest},
};

use crate::ChannelEvent;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// URL is not a valid WebSocket request target.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Exponential reconnection backoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Delay before the first reconnect attempt.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Consecutive failed attempts before giving up. `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            max_attempts: None,
        }
    }
}

impl ReconnectPolicy {
    /// Largest doubling applied to `initial_delay`.
    const MAX_SHIFT: u32 = 16;

    /// Delay before reconnect attempt number `attempt` (zero-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.min(Self::MAX_SHIFT);
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Whether attempt number `attempt` (zero-based) may run.
    pub fn allows(&self, attempt: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempt < max)
    }
}

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Timeout for a single WebSocket handshake.
    pub connect_timeout: Duration,
    /// Backoff used after a failed first handshake or a lost connection.
    pub reconnect: ReconnectPolicy,
    /// Capacity of the envelope channels in each direction.
    pub channel_capacity: usize,
}

impl TransportConfig {
    /// Defaults suitable for a local server.
    pub fn development() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            reconnect: ReconnectPolicy::default(),
            channel_capacity: 256,
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::development()
    }
}

/// Handle to a connected client with WebSocket transport.
///
/// Envelopes are sent and received through the channels; an internal task
/// handles the socket and reconnection.
pub struct ConnectedClient {
    /// Send envelopes to the server.
    pub to_server: mpsc::Sender<Envelope>,
    /// Receive connection notifications and server envelopes.
    pub from_server: mpsc::Receiver<ChannelEvent>,
    /// Abort handle to stop the connection task.
    abort_handle: tokio::task::AbortHandle,
}

impl ConnectedClient {
    /// Stop the connection.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Connect to a stream server with the default configuration.
pub async fn connect(url: &str) -> Result<ConnectedClient, TransportError> {
    connect_with_config(url, TransportConfig::default()).await
}

/// Connect to a stream server.
///
/// Only the URL is checked here. Every handshake, the first included, runs in
/// the background task: an unreachable server is reported as
/// [`ChannelEvent::Disconnected`] and retried under the reconnect policy until
/// a handshake succeeds, which is reported as [`ChannelEvent::Connected`].
///
/// # Errors
///
/// - `TransportError::InvalidUrl` if `url` is not a WebSocket URL
pub async fn connect_with_config(
    url: &str,
    config: TransportConfig,
) -> Result<ConnectedClient, TransportError> {
    url.into_client_request().map_err(|e| TransportError::InvalidUrl(e.to_string()))?;

    let capacity = config.channel_capacity.max(1);
    let (to_server_tx, to_server_rx) = mpsc::channel::<Envelope>(capacity);
    let (from_server_tx, from_server_rx) = mpsc::channel::<ChannelEvent>(capacity);

    let handle =
        tokio::spawn(run_connection(url.to_string(), config, to_server_rx, from_server_tx));

    Ok(ConnectedClient {
        to_server: to_server_tx,
        from_server: from_server_rx,
        abort_handle: handle.abort_handle(),
    })
}

async fn open(url: &str, timeout: Duration) -> Result<WsStream, TransportError> {
    let (stream, _response) = tokio::time::timeout(timeout, connect_async(url))
        .await
        .map_err(|_| TransportError::Connection(format!("handshake timed out after {timeout:?}")))?
        .map_err(|e| TransportError::Connection(e.to_string()))?;
    Ok(stream)
}

/// Why a socket session ended.
enum SessionEnd {
    /// Socket lost; reconnect.
    Lost(String),
    /// Runtime dropped its side; stop.
    Shutdown,
}

/// Run the connection, reconnecting with backoff until the runtime goes away
/// or the policy gives up.
async fn run_connection(
    url: String,
    config: TransportConfig,
    mut to_server: mpsc::Receiver<Envelope>,
    from_server: mpsc::Sender<ChannelEvent>,
) {
    let mut stream = match open(&url, config.connect_timeout).await {
        Ok(ws) => {
            tracing::info!(url = %url, "connected");
            Some(ws)
        },
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "first connect failed, retrying");
            let reason = e.to_string();
            if from_server.send(ChannelEvent::Disconnected { reason }).await.is_err() {
                return;
            }
            None
        },
    };
    let mut attempt: u32 = 0;

    loop {
        if let Some(ws) = stream.take() {
            attempt = 0;
            if from_server.send(ChannelEvent::Connected).await.is_err() {
                return;
            }

            match run_session(ws, &mut to_server, &from_server).await {
                SessionEnd::Shutdown => return,
                SessionEnd::Lost(reason) => {
                    tracing::warn!(%reason, "connection lost");
                    if from_server.send(ChannelEvent::Disconnected { reason }).await.is_err() {
                        return;
                    }
                },
            }
        }

        if !config.reconnect.allows(attempt) {
            tracing::error!(attempts = attempt, "giving up on reconnect");
            return;
        }

        let delay = config.reconnect.delay_for(attempt);
        attempt = attempt.saturating_add(1);
        tokio::time::sleep(delay).await;

        if from_server.is_closed() {
            return;
        }

        match open(&url, config.connect_timeout).await {
            Ok(ws) => {
                tracing::info!(url = %url, attempt, "reconnected");
                stream = Some(ws);
            },
            Err(e) => tracing::warn!(error = %e, attempt, "reconnect failed"),
        }
    }
}

/// Pump envelopes both ways over one socket until it closes.
async fn run_session(
    ws: WsStream,
    to_server: &mut mpsc::Receiver<Envelope>,
    from_server: &mpsc::Sender<ChannelEvent>,
) -> SessionEnd {
    let (mut sink, mut source) = ws.split();

    loop {
        tokio::select! {
            incoming = source.next() => match incoming {
                Some(Ok(Message::Text(text))) => match Envelope::decode(&text) {
                    Ok(envelope) => {
                        if from_server.send(ChannelEvent::Message(envelope)).await.is_err() {
                            return SessionEnd::Shutdown;
                        }
                    },
                    Err(e) => tracing::warn!(error = %e, "dropping undecodable message"),
                },
                Some(Ok(Message::Close(frame))) => {
                    let reason = frame
                        .map_or_else(|| "closed by server".to_string(), |f| f.reason.to_string());
                    return SessionEnd::Lost(reason);
                },
                Some(Ok(_)) => {},
                Some(Err(e)) => return SessionEnd::Lost(e.to_string()),
                None => return SessionEnd::Lost("stream ended".to_string()),
            },

            outgoing = to_server.recv() => match outgoing {
                Some(envelope) => match envelope.encode() {
                    Ok(text) => {
                        if let Err(e) = sink.send(Message::Text(text)).await {
                            return SessionEnd::Lost(e.to_string());
                        }
                    },
                    Err(e) => tracing::warn!(error = %e, event = %envelope.event, "dropping unencodable envelope"),
                },
                None => {
                    let _ = sink.send(Message::Close(None)).await;
                    return SessionEnd::Shutdown;
                },
            },
        }
    }
}
