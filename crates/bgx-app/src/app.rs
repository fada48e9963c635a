//! Device-detail screen state machine.
//!
//! This module defines the [`App`] state machine, which holds the state of one
//! device-detail screen completely decoupled from I/O and threading.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Tracks the connection lifecycle and closes the screen on disconnect.
//! - Coordinates the bus mode between user selections and device
//!   confirmations.
//! - Maintains the attributed text log.
//! - Holds the device identity needed for the firmware-update hand-off.

use bgx_core::{
    BusMode, ConnectionState, DeviceIdentity, FirmwareHandoff, ModeIndicator, Origin, PartId,
    SelectableMode,
};

use crate::{
    AppAction, AppEvent, BusModeCoordinator, ConnectionTracker, Lifecycle, TextLog,
};

/// Title shown when the device has no advertised name.
pub const UNNAMED_DEVICE: &str = "No device name";

/// Device-detail screen state machine.
///
/// All screen state lives here and is dropped with the screen. Nothing is
/// shared across screens.
#[derive(Debug, Clone)]
pub struct App {
    /// Screen title.
    device_name: String,
    /// Connection lifecycle.
    connection: ConnectionTracker,
    /// Confirmed or optimistically asserted bus mode.
    bus_mode: BusModeCoordinator,
    /// Attributed display log.
    log: TextLog,
    /// Identity from the latest device-info event. `None` until one arrives
    /// after the current connection.
    identity: Option<DeviceIdentity>,
    /// A device-info request is outstanding.
    identity_requested: bool,
    /// Screen has torn down. Every later event is dropped.
    closed: bool,
}

impl App {
    /// Create a screen for a device. Missing names get a placeholder title.
    pub fn new(device_name: Option<String>) -> Self {
        Self {
            device_name: device_name.unwrap_or_else(|| UNNAMED_DEVICE.to_string()),
            connection: ConnectionTracker::new(),
            bus_mode: BusModeCoordinator::new(),
            log: TextLog::new(),
            identity: None,
            identity_requested: false,
            closed: false,
        }
    }

    /// Seed state on screen entry.
    pub fn enter(&mut self) -> Vec<AppAction> {
        tracing::info!(device = %self.device_name, "entering device details");
        self.identity_requested = true;
        vec![AppAction::ReadBusMode, AppAction::GetDeviceInfo, AppAction::Render]
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        if self.closed {
            tracing::debug!(?event, "screen closed, dropping event");
            return vec![];
        }

        match event {
            AppEvent::Tick => vec![],
            AppEvent::ConnectionStatus { code } => {
                let lifecycle = self.connection.on_status_code(code);
                self.on_lifecycle(lifecycle)
            },
            AppEvent::ModeState { code } => {
                let indicator = self.bus_mode.on_mode_code(code);
                Self::indicator_actions(indicator)
            },
            AppEvent::DataReceived { data } => {
                self.log.append(&data, Origin::Remote);
                vec![AppAction::Render]
            },
            AppEvent::DeviceInfo { device_uuid, part_id } => {
                self.set_identity(device_uuid, part_id);
                vec![AppAction::Render]
            },
            AppEvent::SendMessage { text } => self.send_message(text),
            AppEvent::SelectMode(mode) => self.select_mode(mode),
            AppEvent::ClearLog => self.clear_log(),
            AppEvent::FirmwareUpdate => self.request_firmware_update(),
            AppEvent::Back => self.back(),
        }
    }

    /// Send a message. The local echo does not wait for the transport.
    pub fn send_message(&mut self, text: String) -> Vec<AppAction> {
        if self.closed {
            return vec![];
        }

        self.log.append(&text, Origin::Local);
        vec![AppAction::WriteSerialData { text }, AppAction::Render]
    }

    /// Select a mode radio.
    pub fn select_mode(&mut self, mode: SelectableMode) -> Vec<AppAction> {
        if self.closed {
            return vec![];
        }

        match self.bus_mode.on_user_select(mode) {
            Some(request) => vec![
                AppAction::WriteBusMode { mode: request.mode },
                AppAction::ShowModeIndicator(request.indicator),
                AppAction::Render,
            ],
            None => vec![],
        }
    }

    /// Clear the displayed log.
    pub fn clear_log(&mut self) -> Vec<AppAction> {
        if self.closed {
            return vec![];
        }

        self.log.clear();
        vec![AppAction::Render]
    }

    /// Hand off to the firmware-update flow if the identity allows it.
    pub fn request_firmware_update(&self) -> Vec<AppAction> {
        if self.closed {
            return vec![];
        }

        match FirmwareHandoff::prepare(self.identity.as_ref()) {
            Ok(FirmwareHandoff { device_uuid, part_id }) => {
                tracing::info!(%device_uuid, ?part_id, "starting firmware update");
                vec![AppAction::OpenFirmwareUpdate { device_uuid, part_id }]
            },
            Err(err) => {
                tracing::info!(%err, "firmware update refused");
                vec![AppAction::Notify { message: err.to_string() }]
            },
        }
    }

    /// Leave the screen: disconnect, then tear down.
    pub fn back(&mut self) -> Vec<AppAction> {
        if self.closed {
            return vec![];
        }

        tracing::debug!("back pressed, disconnecting");
        self.closed = true;
        vec![AppAction::Disconnect, AppAction::Close]
    }

    fn on_lifecycle(&mut self, lifecycle: Lifecycle) -> Vec<AppAction> {
        match lifecycle {
            Lifecycle::Terminated => {
                tracing::info!(device = %self.device_name, "device disconnected, closing");
                self.closed = true;
                vec![AppAction::Close]
            },
            Lifecycle::Active => match self.connection.state() {
                ConnectionState::Connecting | ConnectionState::Interrogating => {
                    // Identity must be re-reported after every reconnection
                    self.identity = None;
                    self.identity_requested = false;
                    vec![AppAction::Render]
                },
                ConnectionState::Connected if self.identity.is_none() && !self.identity_requested => {
                    self.identity_requested = true;
                    vec![AppAction::GetDeviceInfo, AppAction::Render]
                },
                ConnectionState::Connected
                | ConnectionState::Disconnecting
                | ConnectionState::Disconnected
                | ConnectionState::Unknown => vec![AppAction::Render],
            },
        }
    }

    fn set_identity(&mut self, device_uuid: String, part_id: PartId) {
        tracing::debug!(%device_uuid, ?part_id, "device info received");
        self.identity = Some(DeviceIdentity { device_uuid, part_id });
        self.identity_requested = false;
    }

    fn indicator_actions(indicator: Option<ModeIndicator>) -> Vec<AppAction> {
        match indicator {
            Some(indicator) => vec![AppAction::ShowModeIndicator(indicator), AppAction::Render],
            None => vec![],
        }
    }

    /// Screen title.
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Current bus mode.
    pub fn bus_mode(&self) -> BusMode {
        self.bus_mode.current()
    }

    /// The display log.
    pub fn log(&self) -> &TextLog {
        &self.log
    }

    /// Identity from the latest device-info event.
    pub fn identity(&self) -> Option<&DeviceIdentity> {
        self.identity.as_ref()
    }

    /// Whether the screen has torn down.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
