//! UI rendering
//!
//! Rendering functions that convert screen state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees.

mod input;
mod mode;
mod status;
mod stream;

use bgx_app::{App, LogRun};
use bgx_core::{ConnectionState, DeviceIdentity, ModeIndicator};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

pub use stream::log_lines;

use crate::InputState;

/// Owned copy of the screen state last handed to the driver.
///
/// Lets the driver redraw the message line without going through the
/// runtime.
#[derive(Debug, Clone, Default)]
pub struct ScreenView {
    /// Screen title.
    pub device_name: String,
    /// Connection state.
    pub connection: ConnectionState,
    /// Device identity, once reported.
    pub identity: Option<DeviceIdentity>,
    /// Display log.
    pub runs: Vec<LogRun>,
}

impl ScreenView {
    /// Capture the parts of the App the UI draws.
    pub fn capture(app: &App) -> Self {
        Self {
            device_name: app.device_name().to_string(),
            connection: app.connection_state(),
            identity: app.identity().cloned(),
            runs: app.log().runs().to_vec(),
        }
    }

    /// Whether this view carries a device identity `previous` did not have.
    pub fn has_new_identity(&self, previous: &Self) -> bool {
        self.identity.is_some() && self.identity != previous.identity
    }
}

/// Driver-owned widget state drawn alongside the screen.
#[derive(Debug, Clone, Copy)]
pub struct Chrome<'a> {
    /// Message line.
    pub input: &'a InputState,
    /// Mode radios.
    pub indicator: ModeIndicator,
    /// Latest notice, if any.
    pub notice: Option<&'a str>,
}

/// Render the entire UI.
pub fn render(frame: &mut Frame, view: &ScreenView, chrome: Chrome<'_>) {
    const MODE_HEIGHT: u16 = 3;
    const LOG_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(MODE_HEIGHT),
            Constraint::Min(LOG_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [mode_area, log_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    mode::render(frame, view, chrome.indicator, *mode_area);
    stream::render(frame, &view.runs, *log_area);
    input::render(frame, chrome.input, *input_area);
    status::render(frame, view, chrome.notice, *status_area);
}
