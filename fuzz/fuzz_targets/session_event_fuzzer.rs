//! Fuzz target for the session state machine
//!
//! Drives a joined viewer with an arbitrary interleaving of key presses,
//! server envelopes (valid names with arbitrary JSON payloads) and
//! disconnects. Checks after every step that:
//! - The transcript never shrinks
//! - Recording controls stay mutually exclusive
//! - Nothing is emitted before the identity gate is passed
//!
//! The fuzzer should NEVER panic.

#![no_main]

use arbitrary::Arbitrary;
use facewatch_app::{App, AppAction, AppEvent, Bridge, KeyInput};
use facewatch_client::{ChannelEvent, Envelope};
use facewatch_proto::names;
use libfuzzer_sys::fuzz_target;

const EVENT_NAMES: [&str; 6] = [
    names::CONNECT,
    names::PROCESSED_FRAME,
    names::CLIENT_UPDATE,
    names::CHAT_MESSAGE,
    names::RECORDING_STATUS,
    "unknown_event",
];

#[derive(Debug, Arbitrary)]
enum Step {
    Char(char),
    Enter,
    Backspace,
    Function(u8),
    Scroll(bool),
    Server { name: u8, payload: String },
    Disconnect,
    Reconnect,
}

fn drain(app: &mut App, bridge: &mut Bridge, actions: Vec<AppAction>) {
    let mut pending = actions;
    while !pending.is_empty() {
        for action in std::mem::take(&mut pending) {
            if matches!(action, AppAction::OpenChannel | AppAction::Emit(_)) {
                for event in bridge.process_app_action(action) {
                    pending.extend(app.handle(event));
                }
            }
        }
    }
}

fuzz_target!(|steps: Vec<Step>| {
    let mut app = App::new("fuzz".into());
    let mut bridge = Bridge::new();

    for step in steps {
        let before = app.view().transcript().len();
        let joined = app.session().is_some();

        let actions = match step {
            Step::Char(c) => app.handle(AppEvent::Key(KeyInput::Char(c))),
            Step::Enter => app.handle(AppEvent::Key(KeyInput::Enter)),
            Step::Backspace => app.handle(AppEvent::Key(KeyInput::Backspace)),
            Step::Function(n) => app.handle(AppEvent::Key(KeyInput::F(n % 4))),
            Step::Scroll(up) => {
                let key = if up { KeyInput::PageUp } else { KeyInput::PageDown };
                app.handle(AppEvent::Key(key))
            },
            Step::Server { name, payload } => {
                let name = EVENT_NAMES[usize::from(name) % EVENT_NAMES.len()];
                let data = serde_json_value(&payload);
                let mut actions = Vec::new();
                for event in bridge.handle_channel_event(ChannelEvent::Message(Envelope::new(name, data))) {
                    actions.extend(app.handle(event));
                }
                actions
            },
            Step::Disconnect => {
                let mut actions = Vec::new();
                for event in bridge.handle_channel_event(ChannelEvent::Disconnected { reason: "fuzz".into() }) {
                    actions.extend(app.handle(event));
                }
                actions
            },
            Step::Reconnect => {
                let mut actions = Vec::new();
                for event in bridge.handle_channel_event(ChannelEvent::Connected) {
                    actions.extend(app.handle(event));
                }
                actions
            },
        };

        drain(&mut app, &mut bridge, actions);
        let outgoing = bridge.take_outgoing();

        if !joined && app.session().is_none() {
            assert!(outgoing.is_empty(), "emitted before join");
        }
        assert!(app.view().transcript().len() >= before, "transcript shrank");

        let controls = app.view().recording_controls();
        assert_ne!(controls.start_enabled, controls.stop_enabled);
        assert_eq!(controls.indicator_active, controls.stop_enabled);
    }
});

/// Parse the payload as JSON, falling back to a JSON string.
fn serde_json_value(payload: &str) -> Option<facewatch_proto::envelope::Value> {
    if payload.is_empty() {
        return None;
    }
    Some(
        payload
            .parse()
            .unwrap_or_else(|_| facewatch_proto::envelope::Value::String(payload.to_string())),
    )
}
