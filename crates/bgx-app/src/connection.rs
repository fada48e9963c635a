//! Connection state tracker.
//!
//! Consumes connection-status events and decides the screen's lifetime. A
//! disconnect is authoritative and immediate: there are no retries, and no
//! transition leads out of [`ConnectionState::Disconnected`].

use bgx_core::ConnectionState;

/// Outcome of a connection-status event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Screen stays up.
    Active,
    /// The link is gone; the screen must tear down.
    Terminated,
}

/// Tracks the last reported connection state.
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    state: ConnectionState,
}

impl ConnectionTracker {
    /// Create a tracker in [`ConnectionState::Unknown`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a raw status code and apply it.
    ///
    /// Unrecognized codes are logged and recorded as
    /// [`ConnectionState::Unknown`] without terminating.
    pub fn on_status_code(&mut self, code: u8) -> Lifecycle {
        let state = ConnectionState::try_from(code).unwrap_or_else(|err| {
            tracing::warn!(%err, "connection state changed to unknown state");
            ConnectionState::Unknown
        });
        self.on_connection_event(state)
    }

    /// Apply a connection state.
    pub fn on_connection_event(&mut self, new_state: ConnectionState) -> Lifecycle {
        if self.is_terminated() {
            tracing::debug!(?new_state, "ignoring connection event after disconnect");
            return Lifecycle::Terminated;
        }

        tracing::debug!(from = ?self.state, to = ?new_state, "connection state changed");
        self.state = new_state;

        match new_state {
            ConnectionState::Disconnected => Lifecycle::Terminated,
            ConnectionState::Connected
            | ConnectionState::Connecting
            | ConnectionState::Disconnecting
            | ConnectionState::Interrogating
            | ConnectionState::Unknown => Lifecycle::Active,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether the terminal state has been reached.
    pub fn is_terminated(&self) -> bool {
        self.state == ConnectionState::Disconnected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_terminal_states_keep_screen() {
        let mut tracker = ConnectionTracker::new();
        for state in [
            ConnectionState::Connecting,
            ConnectionState::Interrogating,
            ConnectionState::Connected,
            ConnectionState::Disconnecting,
        ] {
            assert_eq!(tracker.on_connection_event(state), Lifecycle::Active);
            assert_eq!(tracker.state(), state);
        }
    }

    #[test]
    fn disconnected_terminates() {
        let mut tracker = ConnectionTracker::new();
        assert_eq!(tracker.on_connection_event(ConnectionState::Disconnected), Lifecycle::Terminated);
        assert!(tracker.is_terminated());
    }

    #[test]
    fn nothing_leads_out_of_disconnected() {
        let mut tracker = ConnectionTracker::new();
        let _ = tracker.on_connection_event(ConnectionState::Disconnected);

        assert_eq!(tracker.on_connection_event(ConnectionState::Connected), Lifecycle::Terminated);
        assert_eq!(tracker.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn unknown_code_maps_to_unknown_without_terminating() {
        let mut tracker = ConnectionTracker::new();
        let _ = tracker.on_connection_event(ConnectionState::Connected);

        assert_eq!(tracker.on_status_code(200), Lifecycle::Active);
        assert_eq!(tracker.state(), ConnectionState::Unknown);
    }
}
