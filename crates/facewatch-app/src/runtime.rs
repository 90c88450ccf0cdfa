//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: session state machine
//! - [`Bridge`]: channel bridge
//! - [`Driver`]: Platform-specific I/O
//!
//! Everything runs on one task. Each input event and each channel event is
//! handled to completion, including the actions it produces, before the next
//! one is looked at.

use facewatch_client::ChannelEvent;

use crate::{App, AppAction, AppEvent, Bridge, Driver};

/// Upper bound on channel events drained per cycle, so input stays
/// responsive under a steady frame stream.
const MAX_CHANNEL_EVENTS_PER_CYCLE: usize = 64;

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
pub struct Runtime<D: Driver> {
    driver: D,
    app: App,
    bridge: Bridge,
    server_addr: String,
}

impl<D: Driver> Runtime<D> {
    /// Create a new runtime with the given driver.
    pub fn new(driver: D, server_addr: String) -> Self {
        let app = App::new(server_addr.clone());
        Self { driver, app, bridge: Bridge::new(), server_addr }
    }

    /// Run the main event loop until the App asks to quit.
    ///
    /// This is the core orchestration loop that:
    /// 1. Polls for input events from the driver
    /// 2. Drains channel notifications in arrival order
    /// 3. Processes actions and events between App and Bridge
    /// 4. Sends outgoing envelopes through the driver
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        loop {
            let should_quit = self.process_cycle().await?;
            if should_quit {
                break;
            }
        }

        self.driver.stop();
        Ok(())
    }

    /// Feed one event to the App and execute the resulting actions.
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn handle_event(&mut self, event: AppEvent) -> Result<bool, D::Error> {
        let actions = self.app.handle(event);
        self.process_actions(actions).await
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        if let Some(event) = self.driver.poll_event().await?
            && self.handle_event(event).await?
        {
            return Ok(true);
        }

        if !self.driver.is_connected() {
            return Ok(false);
        }

        for _ in 0..MAX_CHANNEL_EVENTS_PER_CYCLE {
            let Some(event) = self.driver.recv().await else {
                break;
            };
            if self.handle_channel_event(event).await? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    async fn handle_channel_event(&mut self, event: ChannelEvent) -> Result<bool, D::Error> {
        let events = self.bridge.handle_channel_event(event);
        for event in events {
            if self.handle_event(event).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    AppAction::OpenChannel => {
                        let was_open = self.bridge.channel().is_open();
                        let events = self.bridge.process_app_action(action);
                        for event in events {
                            pending_actions.extend(self.app.handle(event));
                        }
                        if !was_open && self.bridge.channel().is_open() {
                            pending_actions.extend(self.connect().await);
                        }
                    },
                    AppAction::Emit(_) => {
                        let events = self.bridge.process_app_action(action);
                        for event in events {
                            pending_actions.extend(self.app.handle(event));
                        }
                        self.send_outgoing().await;
                    },
                }
            }
        }
        Ok(false)
    }

    /// Establish the channel. A failed attempt is reported to the App rather
    /// than ending the session.
    async fn connect(&mut self) -> Vec<AppAction> {
        tracing::info!(server = %self.server_addr, "opening channel");
        match self.driver.connect(&self.server_addr).await {
            Ok(()) => vec![],
            Err(e) => {
                tracing::warn!(error = %e, "failed to open channel");
                self.app.handle(AppEvent::Disconnected { reason: e.to_string() })
            },
        }
    }

    /// Send all pending outgoing envelopes. Emits are fire-and-forget: a
    /// failed send is logged and dropped.
    async fn send_outgoing(&mut self) {
        let envelopes = self.bridge.take_outgoing();
        for envelope in envelopes {
            let event = envelope.event.clone();
            if let Err(e) = self.driver.send(envelope).await {
                tracing::warn!(event = %event, error = %e, "failed to send event");
            }
        }
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
