//! Transport interface.
//!
//! The transport owns the GATT connection. Screens only see the events it
//! publishes and the fire-and-forget requests they hand it. There is no
//! request/response correlation: outcomes of a request come back, if at all,
//! as later events.

use crate::{BusMode, PartId};

/// Notification published by the transport.
///
/// Connection status and bus mode carry raw wire codes; decoding (and the
/// mapping of unknown codes) is the consumer's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Connection status changed.
    ConnectionStatus {
        /// [`crate::ConnectionState`] wire code.
        code: u8,
    },

    /// Bus mode changed or was read back.
    ModeState {
        /// [`BusMode`] wire code.
        code: u8,
    },

    /// Serial data arrived from the peripheral.
    DataReceived {
        /// Decoded text chunk.
        data: String,
    },

    /// Device interrogation finished.
    DeviceInfo {
        /// Device UUID string.
        device_uuid: String,
        /// Module part.
        part_id: PartId,
    },
}

impl TransportEvent {
    /// Event kind name, for diagnostics and per-kind ordering.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionStatus { .. } => "connection-status-change",
            Self::ModeState { .. } => "mode-state-change",
            Self::DataReceived { .. } => "data-received",
            Self::DeviceInfo { .. } => "device-info",
        }
    }
}

/// Request handed to the transport. Best effort, no reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportRequest {
    /// Write raw serial data (already CRLF-terminated).
    WriteSerialData {
        /// Bytes to write, as text.
        value: String,
    },

    /// Switch the peripheral's bus mode.
    WriteBusMode {
        /// Requested mode.
        mode: BusMode,
    },

    /// Read back the current bus mode.
    ReadBusMode,

    /// Drop the connection.
    Disconnect,

    /// Publish the device identity.
    GetDeviceInfo,
}
