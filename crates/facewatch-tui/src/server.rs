//! In-process simulated stream server.
//!
//! Runs a stand-in for the stream server in-process so the viewer works
//! without a network or a camera. Envelopes flow through mpsc channels the
//! same way the WebSocket transport delivers them.
//!
//! [`StreamServer`] holds the server-side session state and is driven
//! synchronously; [`spawn_server`] wraps it in a tokio task that also paces
//! the frame broadcast.

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use facewatch_client::ChannelEvent;
use facewatch_proto::{
    Envelope, InboundEvent, OutboundEvent,
    payloads::{ChatMessage, ClientInfo, ClientUpdate, ProcessedFrame, RecordingStatus},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde_json::json;
use tokio::{sync::mpsc, time::MissedTickBehavior};

/// Client id used for the single in-process viewer.
pub const LOCAL_CLIENT_ID: &str = "local";

/// Server-to-viewer notification the viewer does not subscribe to.
const PROCESSING_STATUS: &str = "processing_status";

/// Username given to viewers until they announce themselves.
const DEFAULT_USERNAME: &str = "Anonymous";

/// Bytes of noise carried by each synthetic frame.
const FRAME_BYTES: usize = 48;

/// Simulation settings.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Delay between broadcast frames.
    pub frame_interval: Duration,
    /// Viewers accepted at once. Further connections are refused.
    pub max_clients: usize,
    /// Upper bound on simulated detections per frame.
    pub max_faces: u32,
    /// Whether detection starts enabled.
    pub detection_enabled: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(1000 / 30),
            max_clients: 5,
            max_faces: 3,
            detection_enabled: false,
        }
    }
}

/// Server-side session state.
pub struct StreamServer<R: Rng> {
    config: SimulationConfig,
    clients: Vec<ClientInfo>,
    detection_enabled: bool,
    recording: Option<String>,
    rng: R,
}

impl<R: Rng> StreamServer<R> {
    /// Create a server with no viewers.
    pub fn new(config: SimulationConfig, rng: R) -> Self {
        let detection_enabled = config.detection_enabled;
        Self { config, clients: Vec::new(), detection_enabled, recording: None, rng }
    }

    /// Connected viewers in connection order.
    pub fn clients(&self) -> &[ClientInfo] {
        &self.clients
    }

    /// Output file of the running recording.
    pub fn recording(&self) -> Option<&str> {
        self.recording.as_deref()
    }

    /// Server-side detection switch.
    pub fn detection_enabled(&self) -> bool {
        self.detection_enabled
    }

    /// Register a viewer. Returns the envelopes to broadcast, or `None` if
    /// the server is full.
    pub fn accept(&mut self, client_id: &str) -> Option<Vec<Envelope>> {
        if self.clients.len() >= self.config.max_clients {
            tracing::warn!(client_id, max = self.config.max_clients, "server full, refusing viewer");
            return None;
        }

        self.clients.push(ClientInfo {
            id: Some(client_id.to_string()),
            username: Some(DEFAULT_USERNAME.to_string()),
            connected_at: Some(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
        });
        Some(self.roster_update().into_iter().collect())
    }

    /// Forget a viewer. Returns the envelopes to broadcast.
    pub fn disconnect(&mut self, client_id: &str) -> Vec<Envelope> {
        self.clients.retain(|c| c.id.as_deref() != Some(client_id));
        self.roster_update().into_iter().collect()
    }

    /// Apply one viewer envelope. Returns the envelopes to broadcast.
    pub fn handle(&mut self, client_id: &str, envelope: Envelope) -> Vec<Envelope> {
        let event = match OutboundEvent::decode(envelope) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(client_id, error = %e, "dropping viewer envelope");
                return Vec::new();
            },
        };

        match event {
            OutboundEvent::UserJoined(joined) => {
                let Some(client) =
                    self.clients.iter_mut().find(|c| c.id.as_deref() == Some(client_id))
                else {
                    return Vec::new();
                };
                client.username = Some(joined.username);
                self.roster_update().into_iter().collect()
            },
            OutboundEvent::ChatMessage(ChatMessage { username, message }) => {
                encode(InboundEvent::ChatMessage(ChatMessage { username, message }))
                    .into_iter()
                    .collect()
            },
            OutboundEvent::ToggleProcessing(enabled) => {
                self.detection_enabled = enabled;
                vec![Envelope::new(PROCESSING_STATUS, Some(json!({ "enabled": enabled })))]
            },
            OutboundEvent::StartRecording => {
                if self.recording.is_some() {
                    return Vec::new();
                }
                let filename =
                    chrono::Local::now().format("recording_%Y%m%d_%H%M%S.avi").to_string();
                self.recording = Some(filename.clone());
                encode(InboundEvent::RecordingStatus(RecordingStatus::started(filename)))
                    .into_iter()
                    .collect()
            },
            OutboundEvent::StopRecording => {
                if self.recording.take().is_none() {
                    return Vec::new();
                }
                encode(InboundEvent::RecordingStatus(RecordingStatus::stopped()))
                    .into_iter()
                    .collect()
            },
        }
    }

    /// Next broadcast frame. `None` while nobody is watching.
    pub fn next_frame(&mut self) -> Option<Envelope> {
        if self.clients.is_empty() {
            return None;
        }

        let mut noise = [0u8; FRAME_BYTES];
        self.rng.fill(&mut noise[..]);
        let num_faces = if self.detection_enabled {
            self.rng.random_range(0..=self.config.max_faces)
        } else {
            0
        };

        encode(InboundEvent::ProcessedFrame(ProcessedFrame {
            frame: format!("data:image/jpeg;base64,{}", STANDARD.encode(noise)),
            num_faces,
            client_count: Some(self.clients.len() as u32),
        }))
    }

    fn roster_update(&self) -> Option<Envelope> {
        encode(InboundEvent::ClientUpdate(ClientUpdate {
            count: self.clients.len() as u32,
            clients: self.clients.clone(),
        }))
    }
}

fn encode(event: InboundEvent) -> Option<Envelope> {
    let name = event.name();
    match event.into_envelope() {
        Ok(envelope) => Some(envelope),
        Err(e) => {
            tracing::warn!(event = name, error = %e, "failed to encode server event");
            None
        },
    }
}

/// Handle to a running in-process server.
pub struct ServerHandle {
    /// Send envelopes to the server.
    pub to_server: mpsc::Sender<Envelope>,
    /// Receive connection notifications and server envelopes.
    pub from_server: mpsc::Receiver<ChannelEvent>,
    /// Abort handle to stop the server task.
    abort_handle: tokio::task::AbortHandle,
}

impl ServerHandle {
    /// Stop the server.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Spawn an in-process simulated server with one connected viewer.
///
/// The viewer is reported as connected immediately, followed by the roster.
/// The server runs as a tokio task until the viewer side is dropped or the
/// handle is stopped.
pub fn spawn_server(config: SimulationConfig) -> ServerHandle {
    let (client_tx, server_rx) = mpsc::channel::<Envelope>(32);
    let (server_tx, client_rx) = mpsc::channel::<ChannelEvent>(64);

    let handle = tokio::spawn(async move {
        let frame_interval = config.frame_interval;
        let server = StreamServer::new(config, StdRng::from_os_rng());
        let _ = serve(server, LOCAL_CLIENT_ID, frame_interval, server_rx, server_tx).await;
        tracing::debug!("simulated server stopped");
    });

    ServerHandle { to_server: client_tx, from_server: client_rx, abort_handle: handle.abort_handle() }
}

/// Serve one viewer until either side of its channel closes. Returns the
/// server with that viewer removed from the roster.
async fn serve<R: Rng>(
    mut server: StreamServer<R>,
    client_id: &str,
    frame_interval: Duration,
    mut inbox: mpsc::Receiver<Envelope>,
    outbox: mpsc::Sender<ChannelEvent>,
) -> StreamServer<R> {
    let Some(welcome) = server.accept(client_id) else {
        return server;
    };

    if outbox.send(ChannelEvent::Connected).await.is_ok() && deliver(&outbox, welcome).await.is_ok()
    {
        let mut ticker = tokio::time::interval(frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let outgoing = tokio::select! {
                maybe_envelope = inbox.recv() => match maybe_envelope {
                    Some(envelope) => server.handle(client_id, envelope),
                    None => break,
                },
                _ = ticker.tick() => server.next_frame().into_iter().collect(),
            };

            if deliver(&outbox, outgoing).await.is_err() {
                break;
            }
        }
    }

    // Nobody is left to receive the roster update
    let _ = server.disconnect(client_id);
    tracing::debug!(client_id, viewers = server.clients().len(), "viewer left");
    server
}

async fn deliver(
    tx: &mpsc::Sender<ChannelEvent>,
    envelopes: Vec<Envelope>,
) -> Result<(), mpsc::error::SendError<ChannelEvent>> {
    for envelope in envelopes {
        tx.send(ChannelEvent::Message(envelope)).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use facewatch_proto::{names, payloads::UserJoined};

    use super::*;

    fn server() -> StreamServer<StdRng> {
        StreamServer::new(SimulationConfig::default(), StdRng::seed_from_u64(7))
    }

    fn viewer(event: OutboundEvent) -> Envelope {
        event.into_envelope().expect("encode")
    }

    fn decode(envelope: Envelope) -> InboundEvent {
        InboundEvent::decode(envelope).expect("server envelope")
    }

    #[test]
    fn accept_broadcasts_anonymous_roster() {
        let mut server = server();
        let out = server.accept("a").expect("room for viewer");

        let [update] = out.as_slice() else { panic!("one envelope expected") };
        let InboundEvent::ClientUpdate(update) = decode(update.clone()) else {
            panic!("client_update expected")
        };
        assert_eq!(update.count, 1);
        assert_eq!(update.clients[0].username.as_deref(), Some("Anonymous"));
        assert_eq!(update.clients[0].connected_at.as_ref().map(String::len), Some(19));
    }

    #[test]
    fn refuses_past_capacity() {
        let mut server = server();
        for id in ["a", "b", "c", "d", "e"] {
            assert!(server.accept(id).is_some());
        }
        assert!(server.accept("f").is_none());
        assert_eq!(server.clients().len(), 5);
    }

    #[test]
    fn user_joined_renames_viewer() {
        let mut server = server();
        let _ = server.accept("a");
        let out = server.handle(
            "a",
            viewer(OutboundEvent::UserJoined(UserJoined { username: "alice".into() })),
        );

        assert_eq!(out.len(), 1);
        assert_eq!(server.clients()[0].username.as_deref(), Some("alice"));
    }

    #[test]
    fn chat_is_echoed() {
        let mut server = server();
        let _ = server.accept("a");
        let chat = ChatMessage { username: "alice".into(), message: "hi".into() };
        let out = server.handle("a", viewer(OutboundEvent::ChatMessage(chat.clone())));

        assert_eq!(out.into_iter().map(decode).collect::<Vec<_>>(), [InboundEvent::ChatMessage(
            chat
        )]);
    }

    #[test]
    fn recording_runs_once() {
        let mut server = server();
        let _ = server.accept("a");

        let started = server.handle("a", viewer(OutboundEvent::StartRecording));
        assert_eq!(started.len(), 1);
        let filename = server.recording().expect("recording").to_string();
        assert!(filename.starts_with("recording_") && filename.ends_with(".avi"));

        assert!(server.handle("a", viewer(OutboundEvent::StartRecording)).is_empty());

        let stopped = server.handle("a", viewer(OutboundEvent::StopRecording));
        assert_eq!(stopped.into_iter().map(decode).collect::<Vec<_>>(), [
            InboundEvent::RecordingStatus(RecordingStatus::stopped())
        ]);
        assert!(server.handle("a", viewer(OutboundEvent::StopRecording)).is_empty());
    }

    #[test]
    fn frames_have_no_faces_while_detection_is_off() {
        let mut server = server();
        assert!(server.next_frame().is_none(), "no frames without viewers");
        let _ = server.accept("a");

        for _ in 0..20 {
            let InboundEvent::ProcessedFrame(frame) = decode(server.next_frame().expect("frame"))
            else {
                panic!("processed_frame expected")
            };
            assert_eq!(frame.num_faces, 0);
            assert!(frame.frame.starts_with("data:image/jpeg;base64,"));
            assert_eq!(frame.client_count, Some(1));
        }

        let out = server.handle("a", viewer(OutboundEvent::ToggleProcessing(true)));
        assert_eq!(out[0].event, PROCESSING_STATUS);
        assert!(server.detection_enabled());
    }

    #[test]
    fn disconnect_shrinks_roster() {
        let mut server = server();
        let _ = server.accept("a");
        let _ = server.accept("b");

        let out = server.disconnect("a");
        assert_eq!(out[0].event, names::CLIENT_UPDATE);
        assert_eq!(server.clients().len(), 1);
    }

    #[tokio::test]
    async fn closed_viewer_channel_leaves_roster() {
        let (to_server, inbox) = mpsc::channel(4);
        let (outbox, mut from_server) = mpsc::channel(64);
        drop(to_server);

        let server = serve(server(), "a", Duration::from_secs(60), inbox, outbox).await;

        assert!(server.clients().is_empty());
        assert_eq!(from_server.recv().await, Some(ChannelEvent::Connected));
    }

    #[tokio::test]
    async fn spawned_server_greets_viewer() {
        let mut handle = spawn_server(SimulationConfig::default());

        assert_eq!(handle.from_server.recv().await, Some(ChannelEvent::Connected));
        let Some(ChannelEvent::Message(envelope)) = handle.from_server.recv().await else {
            panic!("roster expected")
        };
        assert_eq!(envelope.event, names::CLIENT_UPDATE);

        handle.stop();
    }
}
