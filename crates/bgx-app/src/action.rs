//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute on
//! its owner loop.

use bgx_core::{BusMode, ModeIndicator, PartId};

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Tear the screen down and release the event subscription.
    Close,

    /// Set the Stream/Command radios.
    ShowModeIndicator(ModeIndicator),

    /// Show a user-visible notice.
    Notify {
        /// Notice text.
        message: String,
    },

    /// Hand off to the firmware-update flow.
    OpenFirmwareUpdate {
        /// Device UUID, forwarded unchanged.
        device_uuid: String,
        /// Module part, never invalid.
        part_id: PartId,
    },

    /// Write a user message to the peripheral.
    WriteSerialData {
        /// Message text without line terminator.
        text: String,
    },

    /// Request a bus mode switch.
    WriteBusMode {
        /// Requested mode.
        mode: BusMode,
    },

    /// Read back the current bus mode.
    ReadBusMode,

    /// Drop the connection.
    Disconnect,

    /// Request the device identity.
    GetDeviceInfo,
}

impl AppAction {
    /// Whether this action is handed to the transport.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::WriteSerialData { .. }
                | Self::WriteBusMode { .. }
                | Self::ReadBusMode
                | Self::Disconnect
                | Self::GetDeviceInfo
        )
    }
}
