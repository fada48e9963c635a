//! App-to-transport translation layer.
//!
//! The [`Dispatcher`] turns transport-bound [`crate::AppAction`]s into
//! [`TransportRequest`]s and accumulates them for the runtime to hand to the
//! driver in the next cycle.
//!
//! Requests are fire-and-forget. The dispatcher never waits for or correlates
//! a reply; the transport reports outcomes only through the event channel.

use bgx_core::{BusMode, TransportRequest};

use crate::AppAction;

/// Line terminator appended to every user message.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Command dispatcher.
#[derive(Debug, Default)]
pub struct Dispatcher {
    outgoing: Vec<TransportRequest>,
}

impl Dispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the request for a transport action.
    ///
    /// Returns `false` for actions that are not transport-bound.
    pub fn process_app_action(&mut self, action: AppAction) -> bool {
        match action {
            AppAction::WriteSerialData { text } => self.send_message(&text),
            AppAction::WriteBusMode { mode } => self.request_mode_change(mode),
            AppAction::ReadBusMode => self.request_bus_mode_read(),
            AppAction::Disconnect => self.request_disconnect(),
            AppAction::GetDeviceInfo => self.request_device_info(),
            AppAction::Render
            | AppAction::Close
            | AppAction::ShowModeIndicator(_)
            | AppAction::Notify { .. }
            | AppAction::OpenFirmwareUpdate { .. } => return false,
        }
        true
    }

    /// Queue a CRLF-terminated serial write.
    pub fn send_message(&mut self, text: &str) {
        let mut value = String::with_capacity(text.len() + LINE_TERMINATOR.len());
        value.push_str(text);
        value.push_str(LINE_TERMINATOR);
        self.outgoing.push(TransportRequest::WriteSerialData { value });
    }

    /// Queue a bus mode write.
    pub fn request_mode_change(&mut self, mode: BusMode) {
        self.outgoing.push(TransportRequest::WriteBusMode { mode });
    }

    /// Queue a disconnect.
    pub fn request_disconnect(&mut self) {
        self.outgoing.push(TransportRequest::Disconnect);
    }

    /// Queue a bus mode read.
    pub fn request_bus_mode_read(&mut self) {
        self.outgoing.push(TransportRequest::ReadBusMode);
    }

    /// Queue a device-info request.
    pub fn request_device_info(&mut self) {
        self.outgoing.push(TransportRequest::GetDeviceInfo);
    }

    /// Take pending outgoing requests.
    pub fn take_outgoing(&mut self) -> Vec<TransportRequest> {
        std::mem::take(&mut self.outgoing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_gets_crlf() {
        let mut dispatcher = Dispatcher::new();
        assert!(dispatcher.process_app_action(AppAction::WriteSerialData { text: "AT".into() }));

        assert_eq!(dispatcher.take_outgoing(), [TransportRequest::WriteSerialData {
            value: "AT\r\n".into()
        }]);
    }

    #[test]
    fn empty_message_is_still_sent() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.send_message("");

        assert_eq!(dispatcher.take_outgoing(), [TransportRequest::WriteSerialData {
            value: "\r\n".into()
        }]);
    }

    #[test]
    fn ui_actions_are_not_dispatched() {
        let mut dispatcher = Dispatcher::new();

        assert!(!dispatcher.process_app_action(AppAction::Render));
        assert!(!dispatcher.process_app_action(AppAction::Close));
        assert!(dispatcher.take_outgoing().is_empty());
    }

    #[test]
    fn requests_keep_order() {
        let mut dispatcher = Dispatcher::new();
        for action in [
            AppAction::ReadBusMode,
            AppAction::GetDeviceInfo,
            AppAction::WriteBusMode { mode: BusMode::Stream },
            AppAction::Disconnect,
        ] {
            assert!(action.is_transport());
            assert!(dispatcher.process_app_action(action));
        }

        assert_eq!(dispatcher.take_outgoing(), [
            TransportRequest::ReadBusMode,
            TransportRequest::GetDeviceInfo,
            TransportRequest::WriteBusMode { mode: BusMode::Stream },
            TransportRequest::Disconnect,
        ]);
        assert!(dispatcher.take_outgoing().is_empty());
    }
}
