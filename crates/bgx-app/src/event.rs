//! Application input events.
//!
//! This module defines [`AppEvent`], the complete set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - Transport notifications delivered through the [`crate::EventChannel`].
//! - User interactions reported by the frontend driver.

use bgx_core::{PartId, SelectableMode, TransportEvent};

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Periodic tick.
    Tick,

    /// Connection status changed.
    ConnectionStatus {
        /// Raw connection state code.
        code: u8,
    },

    /// Bus mode confirmed by the device.
    ModeState {
        /// Raw bus mode code.
        code: u8,
    },

    /// Serial data received from the peripheral.
    DataReceived {
        /// Text chunk.
        data: String,
    },

    /// Device identity reported.
    DeviceInfo {
        /// Device UUID string.
        device_uuid: String,
        /// Module part.
        part_id: PartId,
    },

    /// User submitted a message.
    SendMessage {
        /// Message text.
        text: String,
    },

    /// User picked a mode radio.
    SelectMode(SelectableMode),

    /// User cleared the log.
    ClearLog,

    /// User asked for a firmware update.
    FirmwareUpdate,

    /// User left the screen.
    Back,
}

impl From<TransportEvent> for AppEvent {
    fn from(event: TransportEvent) -> Self {
        match event {
            TransportEvent::ConnectionStatus { code } => Self::ConnectionStatus { code },
            TransportEvent::ModeState { code } => Self::ModeState { code },
            TransportEvent::DataReceived { data } => Self::DataReceived { data },
            TransportEvent::DeviceInfo { device_uuid, part_id } => {
                Self::DeviceInfo { device_uuid, part_id }
            },
        }
    }
}
