//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. Transport requests go to the
//! in-process peripheral.

use std::{
    io::{self, Stdout, stdout},
    time::{Duration, Instant},
};

use bgx_app::{App, AppEvent, Driver};
use bgx_core::{ModeIndicator, PartId, TransportRequest};
use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;

use crate::{
    InputState, KeyInput, KeyOutcome,
    peripheral::PeripheralHandle,
    ui::{self, Chrome, ScreenView},
};

/// Redraw interval when nothing happens.
const TICK: Duration = Duration::from_millis(100);

/// How long a notice stays in the status bar.
const NOTICE_TIMEOUT: Duration = Duration::from_millis(3500);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The peripheral task is gone.
    #[error("peripheral stopped")]
    PeripheralStopped,
}

/// Status bar notice that expires.
#[derive(Debug, Default)]
struct Notice {
    current: Option<(String, Instant)>,
}

impl Notice {
    fn show(&mut self, text: String, now: Instant) {
        self.current = Some((text, now + NOTICE_TIMEOUT));
    }

    fn text(&self) -> Option<&str> {
        self.current.as_ref().map(|(text, _)| text.as_str())
    }

    /// Drop the notice once its time is up. Returns `true` if it was dropped.
    fn expire(&mut self, now: Instant) -> bool {
        match &self.current {
            Some((_, deadline)) if now >= *deadline => {
                self.current = None;
                true
            },
            _ => false,
        }
    }

    fn clear(&mut self) {
        self.current = None;
    }
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm) and rendering (ratatui). Owns the message
/// line and the radios, and keeps a copy of the last rendered screen so edits
/// can be redrawn without a round trip through the runtime.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    peripheral: PeripheralHandle,
    input_state: InputState,
    indicator: ModeIndicator,
    notice: Notice,
    view: ScreenView,
}

impl TerminalDriver {
    /// Take over the terminal.
    pub fn new(peripheral: PeripheralHandle) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            event_stream: EventStream::new(),
            peripheral,
            input_state: InputState::new(),
            indicator: ModeIndicator::Neither,
            notice: Notice::default(),
            view: ScreenView::default(),
        })
    }

    /// Convert a crossterm key press to `KeyInput`.
    fn convert_key(key: KeyEvent) -> Option<KeyInput> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('l') => Some(KeyInput::ClearLog),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::F(2) => Some(KeyInput::SelectStream),
            KeyCode::F(3) => Some(KeyInput::SelectCommand),
            KeyCode::F(5) => Some(KeyInput::FirmwareUpdate),
            _ => None,
        }
    }

    fn draw(&mut self) -> Result<(), TerminalError> {
        let chrome = Chrome {
            input: &self.input_state,
            indicator: self.indicator,
            notice: self.notice.text(),
        };
        let view = &self.view;
        self.terminal.draw(|frame| ui::render(frame, view, chrome))?;
        Ok(())
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_input(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        let polled = tokio::select! {
            biased;

            maybe_event = self.event_stream.next() => Some(maybe_event),
            () = tokio::time::sleep(TICK) => None,
        };

        let Some(maybe_event) = polled else {
            if self.notice.expire(Instant::now()) {
                self.draw()?;
            }
            return Ok(None);
        };

        match maybe_event {
            Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                let Some(input) = Self::convert_key(key) else {
                    return Ok(None);
                };
                match self.input_state.handle_key(input) {
                    KeyOutcome::Event(event) => Ok(Some(event)),
                    KeyOutcome::Edited => {
                        self.draw()?;
                        Ok(None)
                    },
                }
            },
            Some(Ok(Event::Resize(..))) => {
                self.draw()?;
                Ok(None)
            },
            Some(Err(e)) => Err(TerminalError::Io(e)),
            _ => Ok(None),
        }
    }

    fn send_request(&mut self, request: TransportRequest) -> Result<(), Self::Error> {
        self.peripheral.requests.send(request).map_err(|_| TerminalError::PeripheralStopped)
    }

    fn show_mode_indicator(&mut self, indicator: ModeIndicator) {
        self.indicator = indicator;
    }

    fn notify(&mut self, message: &str) {
        self.notice.show(message.to_string(), Instant::now());
    }

    fn open_firmware_update(
        &mut self,
        device_uuid: &str,
        part_id: PartId,
    ) -> Result<(), Self::Error> {
        tracing::info!(%device_uuid, ?part_id, "firmware update requested");
        let text = format!("Firmware update: {part_id:?} {device_uuid}");
        self.notice.show(text, Instant::now());
        self.draw()
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        let view = ScreenView::capture(app);
        if view.has_new_identity(&self.view) {
            self.notice.clear();
        }
        self.view = view;
        self.draw()
    }

    fn stop(&mut self) {
        self.peripheral.stop();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn control_l_clears() {
        let key = press(KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert_eq!(TerminalDriver::convert_key(key), Some(KeyInput::ClearLog));

        let key = press(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(TerminalDriver::convert_key(key), None);
    }

    #[test]
    fn function_keys() {
        let none = KeyModifiers::NONE;
        assert_eq!(
            TerminalDriver::convert_key(press(KeyCode::F(2), none)),
            Some(KeyInput::SelectStream)
        );
        assert_eq!(
            TerminalDriver::convert_key(press(KeyCode::F(3), none)),
            Some(KeyInput::SelectCommand)
        );
        assert_eq!(
            TerminalDriver::convert_key(press(KeyCode::F(5), none)),
            Some(KeyInput::FirmwareUpdate)
        );
        assert_eq!(TerminalDriver::convert_key(press(KeyCode::F(9), none)), None);
    }

    #[test]
    fn notice_expires() {
        let start = Instant::now();
        let mut notice = Notice::default();
        notice.show("Invalid BGX Part ID".into(), start);

        assert!(!notice.expire(start + Duration::from_secs(1)));
        assert_eq!(notice.text(), Some("Invalid BGX Part ID"));

        assert!(notice.expire(start + NOTICE_TIMEOUT));
        assert_eq!(notice.text(), None);
        assert!(!notice.expire(start + NOTICE_TIMEOUT * 2));
    }

    #[test]
    fn newer_notice_restarts_timeout() {
        let start = Instant::now();
        let mut notice = Notice::default();
        notice.show("first".into(), start);
        notice.show("second".into(), start + Duration::from_secs(3));

        assert!(!notice.expire(start + NOTICE_TIMEOUT));
        assert_eq!(notice.text(), Some("second"));
    }

    #[test]
    fn shifted_characters_are_typed() {
        let key = press(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(TerminalDriver::convert_key(key), Some(KeyInput::Char('A')));
    }
}
