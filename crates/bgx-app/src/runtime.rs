//! Generic runtime for a device-detail screen.
//!
//! The Runtime is the single owner of all screen state. It coordinates
//! between:
//! - [`App`]: screen state machine
//! - [`Dispatcher`]: transport request queue
//! - [`Driver`]: frontend I/O
//! - [`Subscription`]: transport events
//!
//! Events published by the transport on any thread and inputs reported by the
//! driver are funneled through [`Runtime::step`], one at a time, before they
//! touch any state. Actions returned by the App are executed afterwards on the
//! same loop, so widget updates are always decoupled from event delivery.

use crate::{App, AppAction, AppEvent, Dispatcher, Driver, Subscription};

/// Consecutive transport events processed before user input is polled first.
pub const MAX_TRANSPORT_BURST: usize = 16;

enum Next<E> {
    Transport(Option<bgx_core::TransportEvent>),
    Input(Result<Option<AppEvent>, E>),
}

/// Generic runtime that orchestrates App, Dispatcher and Driver.
pub struct Runtime<D: Driver> {
    driver: D,
    app: App,
    dispatcher: Dispatcher,
    subscription: Subscription,
    transport_burst: usize,
}

impl<D: Driver> Runtime<D> {
    /// Create a runtime for a screen bound to a transport subscription.
    pub fn new(driver: D, app: App, subscription: Subscription) -> Self {
        Self { driver, app, dispatcher: Dispatcher::new(), subscription, transport_burst: 0 }
    }

    /// Run the screen until it closes, then tear down.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails. Teardown happens either way.
    pub async fn run(mut self) -> Result<(), D::Error> {
        let result = self.run_until_closed().await;
        self.teardown();
        result
    }

    async fn run_until_closed(&mut self) -> Result<(), D::Error> {
        if self.start()? {
            return Ok(());
        }

        loop {
            if self.step().await? {
                return Ok(());
            }
        }
    }

    /// Enter the screen: seed the mode and identity, draw the first frame.
    ///
    /// Returns `true` if the screen closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails.
    pub fn start(&mut self) -> Result<bool, D::Error> {
        let actions = self.app.enter();
        self.process_actions(actions)
    }

    /// Process exactly one transport event or user input.
    ///
    /// Transport events take priority over user input when both are ready,
    /// except that after [`MAX_TRANSPORT_BURST`] transport events in a row
    /// user input is polled first. Returns `true` if the screen closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails.
    pub async fn step(&mut self) -> Result<bool, D::Error> {
        if self.app.is_closed() {
            return Ok(true);
        }

        let next = if self.transport_burst >= MAX_TRANSPORT_BURST {
            self.transport_burst = 0;
            tokio::select! {
                biased;

                input = self.driver.poll_input() => Next::Input(input),
                maybe_event = self.subscription.recv() => Next::Transport(maybe_event),
            }
        } else {
            tokio::select! {
                biased;

                maybe_event = self.subscription.recv() => Next::Transport(maybe_event),
                input = self.driver.poll_input() => Next::Input(input),
            }
        };

        let event = match next {
            Next::Transport(Some(event)) => {
                self.transport_burst = self.transport_burst.saturating_add(1);
                AppEvent::from(event)
            },
            Next::Transport(None) => {
                tracing::info!("transport event channel closed");
                return Ok(true);
            },
            Next::Input(input) => {
                self.transport_burst = 0;
                input?.unwrap_or(AppEvent::Tick)
            },
        };

        let actions = self.app.handle(event);
        self.process_actions(actions)
    }

    /// Execute actions returned by the App. Returns `true` if should close.
    fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut close = false;

        for action in actions {
            match action {
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::Close => close = true,
                AppAction::ShowModeIndicator(indicator) => {
                    self.driver.show_mode_indicator(indicator);
                },
                AppAction::Notify { message } => self.driver.notify(&message),
                AppAction::OpenFirmwareUpdate { device_uuid, part_id } => {
                    self.driver.open_firmware_update(&device_uuid, part_id)?;
                },

                // Transport requests go through the dispatcher
                AppAction::WriteSerialData { .. }
                | AppAction::WriteBusMode { .. }
                | AppAction::ReadBusMode
                | AppAction::Disconnect
                | AppAction::GetDeviceInfo => {
                    let _ = self.dispatcher.process_app_action(action);
                },
            }
        }

        self.send_outgoing_requests();
        Ok(close)
    }

    /// Hand all pending requests to the driver. Failures drop the request.
    fn send_outgoing_requests(&mut self) {
        for request in self.dispatcher.take_outgoing() {
            if let Err(e) = self.driver.send_request(request) {
                tracing::warn!("Failed to send transport request: {:?}", e);
            }
        }
    }

    /// Unsubscribe from transport events and stop the driver.
    ///
    /// Only the first call has any effect.
    pub fn teardown(&mut self) {
        if !self.subscription.unsubscribe() {
            return;
        }

        tracing::info!(device = %self.app.device_name(), "closing device details");
        self.driver.stop();
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Whether transport events are still being received.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_active()
    }
}
