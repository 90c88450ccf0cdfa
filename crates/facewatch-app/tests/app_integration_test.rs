//! Integration tests for App and Bridge behavior.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - The view model reflects the server's latest state
//! - Outbound envelopes carry the expected event names and payloads
//! - The transcript holds exactly the expected lines, in order

use facewatch_app::{
    App, AppAction, AppEvent, Bridge, ConnectionState, KeyInput, RecordingControls,
    RecordingState, START_RECORDING_KEY, STOP_RECORDING_KEY, TOGGLE_DETECTION_KEY,
};
use facewatch_client::{ChannelEvent, Envelope, OutboundEvent};
use facewatch_proto::{names, payloads::UserJoined};
use serde_json::json;

/// Process actions from App through Bridge and update App state.
fn process_actions(app: &mut App, bridge: &mut Bridge, actions: Vec<AppAction>) -> Vec<Envelope> {
    let mut pending = actions;
    while !pending.is_empty() {
        for action in std::mem::take(&mut pending) {
            match action {
                AppAction::OpenChannel | AppAction::Emit(_) => {
                    for event in bridge.process_app_action(action) {
                        pending.extend(app.handle(event));
                    }
                },
                AppAction::Render | AppAction::Quit => {},
            }
        }
    }

    bridge.take_outgoing()
}

/// Feed a transport notification through Bridge into App.
fn receive(app: &mut App, bridge: &mut Bridge, event: ChannelEvent) -> Vec<Envelope> {
    let mut outgoing = Vec::new();
    for event in bridge.handle_channel_event(event) {
        let actions = app.handle(event);
        outgoing.extend(process_actions(app, bridge, actions));
    }
    outgoing
}

/// Simulate a server message.
fn server_event(app: &mut App, bridge: &mut Bridge, name: &str, data: serde_json::Value) {
    let outgoing = receive(app, bridge, ChannelEvent::Message(Envelope::new(name, Some(data))));
    assert!(outgoing.is_empty(), "server events never trigger emits");
}

/// Press a key and collect the envelopes it produced.
fn press(app: &mut App, bridge: &mut Bridge, key: KeyInput) -> Vec<Envelope> {
    let actions = app.handle(AppEvent::Key(key));
    process_actions(app, bridge, actions)
}

fn type_text(app: &mut App, bridge: &mut Bridge, text: &str) {
    for c in text.chars() {
        assert!(press(app, bridge, KeyInput::Char(c)).is_empty());
    }
}

/// A joined, connected viewer with the connect notice already in the
/// transcript.
fn connected_viewer(username: &str) -> (App, Bridge) {
    let mut app = App::new("ws://localhost:5000".into());
    let mut bridge = Bridge::new();

    type_text(&mut app, &mut bridge, username);
    assert!(press(&mut app, &mut bridge, KeyInput::Enter).is_empty());
    assert!(bridge.channel().is_open());

    let outgoing = receive(&mut app, &mut bridge, ChannelEvent::Connected);
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].event, names::USER_JOINED);

    (app, bridge)
}

fn transcript(app: &App) -> Vec<String> {
    app.view().transcript().messages().iter().map(ToString::to_string).collect()
}

#[test]
fn join_opens_channel_and_announces() {
    let mut app = App::new("ws://localhost:5000".into());
    let mut bridge = Bridge::new();

    type_text(&mut app, &mut bridge, " alice ");
    assert!(press(&mut app, &mut bridge, KeyInput::Enter).is_empty());
    assert_eq!(app.connection_state(), &ConnectionState::Connecting);

    let outgoing = receive(&mut app, &mut bridge, ChannelEvent::Connected);

    // Oracle: presence announced with the trimmed name
    assert_eq!(outgoing.len(), 1);
    assert_eq!(
        OutboundEvent::decode(outgoing[0].clone()),
        Ok(OutboundEvent::UserJoined(UserJoined { username: "alice".into() }))
    );
    assert_eq!(app.connection_state(), &ConnectionState::Connected);
    assert_eq!(transcript(&app), ["System: Connected to stream"]);
}

#[test]
fn empty_identity_never_opens_channel() {
    let mut app = App::new("ws://localhost:5000".into());
    let mut bridge = Bridge::new();

    type_text(&mut app, &mut bridge, "   ");
    assert!(press(&mut app, &mut bridge, KeyInput::Enter).is_empty());

    // Oracle: gate flagged, no channel, no events
    assert!(app.gate().has_error());
    assert!(!bridge.channel().is_open());
    assert!(app.session().is_none());
}

#[test]
fn chat_round_trip_appears_once() {
    let (mut app, mut bridge) = connected_viewer("alice");

    type_text(&mut app, &mut bridge, "hello");
    let outgoing = press(&mut app, &mut bridge, KeyInput::Enter);
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].data, Some(json!({"username": "alice", "message": "hello"})));

    // Server echoes to every viewer, including the sender
    server_event(
        &mut app,
        &mut bridge,
        names::CHAT_MESSAGE,
        json!({"username": "alice", "message": "hello"}),
    );

    // Oracle: exactly one line for the message
    assert_eq!(transcript(&app), ["System: Connected to stream", "alice: hello"]);
}

#[test]
fn recording_started_then_stopped() {
    let (mut app, mut bridge) = connected_viewer("alice");

    let outgoing = press(&mut app, &mut bridge, START_RECORDING_KEY);
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].event, names::START_RECORDING);
    assert_eq!(outgoing[0].data, None);
    assert_eq!(app.view().recording(), RecordingState::Idle, "request is not a state change");

    server_event(
        &mut app,
        &mut bridge,
        names::RECORDING_STATUS,
        json!({"status": "started", "filename": "recording_20240501_120000.mp4"}),
    );
    assert_eq!(app.view().recording_controls(), RecordingControls {
        start_enabled: false,
        stop_enabled: true,
        indicator_active: true,
    });
    assert_eq!(app.view().recording_file(), Some("recording_20240501_120000.mp4"));

    let outgoing = press(&mut app, &mut bridge, STOP_RECORDING_KEY);
    assert_eq!(outgoing[0].event, names::STOP_RECORDING);

    server_event(&mut app, &mut bridge, names::RECORDING_STATUS, json!({"status": "stopped"}));

    // Oracle: all four effects reversed
    assert_eq!(app.view().recording_controls(), RecordingControls {
        start_enabled: true,
        stop_enabled: false,
        indicator_active: false,
    });
    assert_eq!(app.view().recording_file(), None);
    assert_eq!(transcript(&app), [
        "System: Connected to stream",
        "System: Recording started",
        "System: Recording stopped",
    ]);
}

#[test]
fn unknown_recording_status_means_stopped() {
    let (mut app, mut bridge) = connected_viewer("alice");
    server_event(&mut app, &mut bridge, names::RECORDING_STATUS, json!({"status": "started"}));
    server_event(&mut app, &mut bridge, names::RECORDING_STATUS, json!({"status": "paused"}));

    assert_eq!(app.view().recording(), RecordingState::Idle);
    assert_eq!(transcript(&app).last().map(String::as_str), Some("System: Recording stopped"));
}

#[test]
fn non_string_recording_status_means_stopped() {
    let (mut app, mut bridge) = connected_viewer("alice");

    for status in [json!(0), json!(true)] {
        server_event(&mut app, &mut bridge, names::RECORDING_STATUS, json!({"status": "started"}));
        assert_eq!(app.view().recording(), RecordingState::Active);

        server_event(&mut app, &mut bridge, names::RECORDING_STATUS, json!({"status": status}));

        // Oracle: controls reverted and the stop notice appended
        assert_eq!(app.view().recording(), RecordingState::Idle);
        assert!(app.view().recording_controls().start_enabled);
        assert_eq!(transcript(&app).last().map(String::as_str), Some("System: Recording stopped"));
    }
}

#[test]
fn detection_toggle_twice() {
    let (mut app, mut bridge) = connected_viewer("alice");
    let mut labels = vec![app.view().detection_label()];
    let mut payloads = Vec::new();

    for _ in 0..2 {
        for envelope in press(&mut app, &mut bridge, TOGGLE_DETECTION_KEY) {
            assert_eq!(envelope.event, names::TOGGLE_PROCESSING);
            payloads.push(envelope.data);
        }
        labels.push(app.view().detection_label());
    }

    // Oracle: optimistic labels, one emit per press
    assert_eq!(labels, ["Detection: OFF", "Detection: ON", "Detection: OFF"]);
    assert_eq!(payloads, [Some(json!(true)), Some(json!(false))]);
    assert_eq!(transcript(&app), [
        "System: Connected to stream",
        "System: Detection enabled",
        "System: Detection disabled",
    ]);
}

#[test]
fn frames_and_roster_replace_wholesale() {
    let (mut app, mut bridge) = connected_viewer("alice");

    server_event(&mut app, &mut bridge, names::PROCESSED_FRAME, json!({"frame": "a", "num_faces": 3}));
    server_event(
        &mut app,
        &mut bridge,
        names::PROCESSED_FRAME,
        json!({"frame": "b", "num_faces": 1, "client_count": 2}),
    );
    server_event(
        &mut app,
        &mut bridge,
        names::CLIENT_UPDATE,
        json!({"count": 2, "clients": [
            {"id": "s1", "username": "bob", "connected_at": "2024-05-01 12:00:00"},
            {"id": "s2", "username": "", "connected_at": "2024-05-01 12:00:05"},
        ]}),
    );

    let view = app.view();
    assert_eq!(view.face_count_label(), "Faces Detected: 1");
    assert_eq!(view.frame().map(|f| f.image_data.as_str()), Some("b"));
    assert_eq!(view.frames_received(), 2);
    assert_eq!(view.viewer_count_label(), "Total Viewers: 2");

    let names: Vec<_> = view.roster().entries.iter().map(|e| e.display_name()).collect();
    let avatars: Vec<_> = view.roster().entries.iter().map(|e| e.avatar()).collect();
    assert_eq!(names, ["bob", "Anonymous"]);
    assert_eq!(avatars, ["B", "?"]);

    server_event(&mut app, &mut bridge, names::CLIENT_UPDATE, json!({"count": 0, "clients": []}));

    // Oracle: empty update leaves nothing behind
    assert!(app.view().roster().entries.is_empty());
    assert_eq!(app.view().viewer_count_label(), "Total Viewers: 0");
}

#[test]
fn malformed_events_are_skipped() {
    let (mut app, mut bridge) = connected_viewer("alice");

    server_event(&mut app, &mut bridge, names::PROCESSED_FRAME, json!({"frame": "a", "num_faces": 4}));
    server_event(&mut app, &mut bridge, names::PROCESSED_FRAME, json!({"frame": "b"}));
    server_event(&mut app, &mut bridge, names::CHAT_MESSAGE, json!("not an object"));
    server_event(&mut app, &mut bridge, "server_stats", json!({"fps": 30}));

    // Oracle: state from the last valid event survives
    assert_eq!(app.view().face_count_label(), "Faces Detected: 4");
    assert_eq!(transcript(&app), ["System: Connected to stream"]);
}

#[test]
fn reconnect_re_announces_presence() {
    let (mut app, mut bridge) = connected_viewer("alice");

    let outgoing =
        receive(&mut app, &mut bridge, ChannelEvent::Disconnected { reason: "reset".into() });
    assert!(outgoing.is_empty());
    assert_eq!(app.connection_state(), &ConnectionState::Disconnected);

    let outgoing = receive(&mut app, &mut bridge, ChannelEvent::Connected);
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].event, names::USER_JOINED);
    assert_eq!(transcript(&app), [
        "System: Connected to stream",
        "System: Connected to stream"
    ]);
}

#[test]
fn dispatcher_api_matches_keys() {
    let (mut app, _bridge) = connected_viewer("alice");

    assert_eq!(app.start_recording(), vec![AppAction::Emit(OutboundEvent::StartRecording)]);
    assert_eq!(app.stop_recording(), vec![AppAction::Emit(OutboundEvent::StopRecording)]);
    assert!(matches!(app.toggle_detection().as_slice(), [
        AppAction::Emit(OutboundEvent::ToggleProcessing(true)),
        AppAction::Render
    ]));
}
