//! Emulated BGX peripheral.
//!
//! A Sans-IO stand-in for the transport plus the device behind it. Each
//! request is answered with the events a real BGXpress service would publish:
//!
//! - mode reads and writes are confirmed with a mode-state event; rejected
//!   writes confirm the unchanged mode
//! - serial writes are looped back in stream mode and answered in command mode
//! - disconnects report `Disconnecting` then `Disconnected`, after which the
//!   peripheral goes silent

use bgx_core::{BusMode, ConnectionState, PartId, TransportEvent, TransportRequest};

/// Firmware version line reported by the `ver` command.
pub const FIRMWARE_VERSION: &str = "BGX13P.1.2.2738.2-1524-2738";

/// Emulated peripheral configuration.
#[derive(Debug, Clone)]
pub struct PeripheralConfig {
    /// UUID reported by device-info.
    pub device_uuid: String,
    /// Part reported by device-info.
    pub part_id: PartId,
    /// Mode on connection.
    pub initial_mode: BusMode,
    /// Whether mode writes take effect.
    pub accept_mode_changes: bool,
}

impl Default for PeripheralConfig {
    fn default() -> Self {
        Self {
            device_uuid: "0d8a3f5e-6c1b-4a2e-9f7d-5b3c8e1a2f40".to_string(),
            part_id: PartId::Bgx13P,
            initial_mode: BusMode::Stream,
            accept_mode_changes: true,
        }
    }
}

/// Emulated peripheral state.
#[derive(Debug, Clone)]
pub struct SimPeripheral {
    config: PeripheralConfig,
    mode: BusMode,
    connection: ConnectionState,
}

impl SimPeripheral {
    /// Create a disconnected peripheral.
    pub fn new(config: PeripheralConfig) -> Self {
        let mode = config.initial_mode;
        Self { config, mode, connection: ConnectionState::Disconnected }
    }

    /// Bring the link up. Returns the status events of a fresh connection.
    pub fn connect(&mut self) -> Vec<TransportEvent> {
        self.connection = ConnectionState::Connected;
        [ConnectionState::Connecting, ConnectionState::Interrogating, ConnectionState::Connected]
            .into_iter()
            .filter_map(status_event)
            .collect()
    }

    /// Drop the link from the device side.
    pub fn drop_link(&mut self) -> Vec<TransportEvent> {
        self.connection = ConnectionState::Disconnected;
        status_event(ConnectionState::Disconnected).into_iter().collect()
    }

    /// Answer a request.
    pub fn handle_request(&mut self, request: TransportRequest) -> Vec<TransportEvent> {
        if self.connection != ConnectionState::Connected {
            tracing::debug!(?request, "peripheral not connected, request dropped");
            return vec![];
        }

        match request {
            TransportRequest::ReadBusMode => vec![self.mode_event()],
            TransportRequest::WriteBusMode { mode } => {
                if self.config.accept_mode_changes && mode != BusMode::Unknown {
                    self.mode = mode;
                } else {
                    tracing::debug!(requested = ?mode, current = ?self.mode, "mode change rejected");
                }
                vec![self.mode_event()]
            },
            TransportRequest::WriteSerialData { value } => self.serial_response(value),
            TransportRequest::GetDeviceInfo => vec![TransportEvent::DeviceInfo {
                device_uuid: self.config.device_uuid.clone(),
                part_id: self.config.part_id,
            }],
            TransportRequest::Disconnect => {
                self.connection = ConnectionState::Disconnected;
                [ConnectionState::Disconnecting, ConnectionState::Disconnected]
                    .into_iter()
                    .filter_map(status_event)
                    .collect()
            },
        }
    }

    fn serial_response(&self, value: String) -> Vec<TransportEvent> {
        match self.mode {
            BusMode::Stream => vec![TransportEvent::DataReceived { data: value }],
            BusMode::LocalCommand | BusMode::RemoteCommand => {
                let response = match value.trim() {
                    "" => return vec![],
                    "ver" => format!("{FIRMWARE_VERSION}\r\n"),
                    _ => "OK\r\n".to_string(),
                };
                vec![TransportEvent::DataReceived { data: response }]
            },
            BusMode::Unknown => vec![],
        }
    }

    fn mode_event(&self) -> TransportEvent {
        TransportEvent::ModeState { code: self.mode.code() }
    }

    /// Current bus mode on the device.
    pub fn mode(&self) -> BusMode {
        self.mode
    }

    /// Current link state.
    pub fn connection(&self) -> ConnectionState {
        self.connection
    }
}

fn status_event(state: ConnectionState) -> Option<TransportEvent> {
    state.code().map(|code| TransportEvent::ConnectionStatus { code })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected(config: PeripheralConfig) -> SimPeripheral {
        let mut peripheral = SimPeripheral::new(config);
        let _ = peripheral.connect();
        peripheral
    }

    #[test]
    fn connect_reports_full_sequence() {
        let mut peripheral = SimPeripheral::new(PeripheralConfig::default());
        let events = peripheral.connect();

        assert_eq!(events, [
            TransportEvent::ConnectionStatus { code: 1 },
            TransportEvent::ConnectionStatus { code: 2 },
            TransportEvent::ConnectionStatus { code: 3 },
        ]);
    }

    #[test]
    fn stream_mode_loops_back() {
        let mut peripheral = connected(PeripheralConfig::default());
        let events =
            peripheral.handle_request(TransportRequest::WriteSerialData { value: "hi\r\n".into() });

        assert_eq!(events, [TransportEvent::DataReceived { data: "hi\r\n".into() }]);
    }

    #[test]
    fn command_mode_answers() {
        let mut peripheral = connected(PeripheralConfig {
            initial_mode: BusMode::RemoteCommand,
            ..Default::default()
        });

        let events =
            peripheral.handle_request(TransportRequest::WriteSerialData { value: "ver\r\n".into() });
        assert_eq!(events, [TransportEvent::DataReceived {
            data: format!("{FIRMWARE_VERSION}\r\n")
        }]);

        let events =
            peripheral.handle_request(TransportRequest::WriteSerialData { value: "\r\n".into() });
        assert!(events.is_empty());
    }

    #[test]
    fn rejected_mode_change_confirms_current() {
        let mut peripheral = connected(PeripheralConfig {
            accept_mode_changes: false,
            ..Default::default()
        });

        let events = peripheral
            .handle_request(TransportRequest::WriteBusMode { mode: BusMode::RemoteCommand });

        assert_eq!(events, [TransportEvent::ModeState { code: BusMode::Stream.code() }]);
        assert_eq!(peripheral.mode(), BusMode::Stream);
    }

    #[test]
    fn disconnect_silences_peripheral() {
        let mut peripheral = connected(PeripheralConfig::default());
        let events = peripheral.handle_request(TransportRequest::Disconnect);

        assert_eq!(events, [
            TransportEvent::ConnectionStatus { code: 4 },
            TransportEvent::ConnectionStatus { code: 0 },
        ]);
        assert!(peripheral.handle_request(TransportRequest::ReadBusMode).is_empty());
    }
}
