//! Observable screen state for invariant checking.

use bgx_app::{App, LogRun};
use bgx_core::{BusMode, ConnectionState, ModeIndicator};

/// Snapshot of everything a user could observe on one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSnapshot {
    /// Connection state.
    pub connection: ConnectionState,
    /// Bus mode held by the screen.
    pub bus_mode: BusMode,
    /// Radios as last set through the driver.
    pub shown_indicator: ModeIndicator,
    /// Display log runs.
    pub runs: Vec<LogRun>,
    /// Whether the screen has torn down.
    pub closed: bool,
}

impl ScreenSnapshot {
    /// Capture the screen state together with the radios the frontend shows.
    pub fn capture(app: &App, shown_indicator: ModeIndicator) -> Self {
        Self {
            connection: app.connection_state(),
            bus_mode: app.bus_mode(),
            shown_indicator,
            runs: app.log().runs().to_vec(),
            closed: app.is_closed(),
        }
    }

    /// Snapshot of a freshly created screen.
    pub fn empty() -> Self {
        Self {
            connection: ConnectionState::Unknown,
            bus_mode: BusMode::Unknown,
            shown_indicator: ModeIndicator::Neither,
            runs: Vec::new(),
            closed: false,
        }
    }

    /// Builder: set connection state.
    #[must_use]
    pub fn with_connection(mut self, connection: ConnectionState) -> Self {
        self.connection = connection;
        self
    }

    /// Builder: set the held mode and the shown radios.
    #[must_use]
    pub fn with_mode(mut self, bus_mode: BusMode, shown_indicator: ModeIndicator) -> Self {
        self.bus_mode = bus_mode;
        self.shown_indicator = shown_indicator;
        self
    }

    /// Builder: set log runs.
    #[must_use]
    pub fn with_runs(mut self, runs: impl IntoIterator<Item = LogRun>) -> Self {
        self.runs = runs.into_iter().collect();
        self
    }

    /// Builder: mark closed.
    #[must_use]
    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }
}
