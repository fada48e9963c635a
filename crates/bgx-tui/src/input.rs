//! Input state and key handling for the TUI.
//!
//! This module owns the message line (buffer, cursor) and maps keys to screen
//! events. Editing keys only touch the buffer; Enter submits the buffer as a
//! message, and the function keys drive the mode radios and screen actions.

use bgx_app::AppEvent;
use bgx_core::SelectableMode;

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Escape key.
    Esc,
    /// Stream radio (F2).
    SelectStream,
    /// Command radio (F3).
    SelectCommand,
    /// Clear the log (Ctrl-L).
    ClearLog,
    /// Firmware update (F5).
    FirmwareUpdate,
}

/// Result of a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The message line changed and must be redrawn.
    Edited,
    /// The key produced a screen event.
    Event(AppEvent),
}

/// Message line state.
#[derive(Debug, Default)]
pub struct InputState {
    /// Text buffer for user input.
    buffer: String,
    /// Cursor position within the buffer, in characters.
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Handle a key input event.
    pub fn handle_key(&mut self, key: KeyInput) -> KeyOutcome {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_index();
                self.buffer.insert(at, c);
                self.cursor = self.cursor.saturating_add(1);
                KeyOutcome::Edited
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    let at = self.byte_index();
                    self.buffer.remove(at);
                }
                KeyOutcome::Edited
            },
            KeyInput::Delete => {
                if self.cursor < self.len() {
                    let at = self.byte_index();
                    self.buffer.remove(at);
                }
                KeyOutcome::Edited
            },
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                KeyOutcome::Edited
            },
            KeyInput::Right => {
                if self.cursor < self.len() {
                    self.cursor = self.cursor.saturating_add(1);
                }
                KeyOutcome::Edited
            },
            KeyInput::Home => {
                self.cursor = 0;
                KeyOutcome::Edited
            },
            KeyInput::End => {
                self.cursor = self.len();
                KeyOutcome::Edited
            },
            KeyInput::Enter => {
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                KeyOutcome::Event(AppEvent::SendMessage { text })
            },
            KeyInput::Esc => KeyOutcome::Event(AppEvent::Back),
            KeyInput::SelectStream => {
                KeyOutcome::Event(AppEvent::SelectMode(SelectableMode::Stream))
            },
            KeyInput::SelectCommand => {
                KeyOutcome::Event(AppEvent::SelectMode(SelectableMode::Command))
            },
            KeyInput::ClearLog => KeyOutcome::Event(AppEvent::ClearLog),
            KeyInput::FirmwareUpdate => KeyOutcome::Event(AppEvent::FirmwareUpdate),
        }
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_index(&self) -> usize {
        self.buffer.char_indices().nth(self.cursor).map_or(self.buffer.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(input: &mut InputState, text: &str) {
        for c in text.chars() {
            assert_eq!(input.handle_key(KeyInput::Char(c)), KeyOutcome::Edited);
        }
    }

    #[test]
    fn enter_submits_and_clears() {
        let mut input = InputState::new();
        type_text(&mut input, "AT+VER");

        let outcome = input.handle_key(KeyInput::Enter);

        assert_eq!(outcome, KeyOutcome::Event(AppEvent::SendMessage { text: "AT+VER".into() }));
        assert_eq!(input.buffer(), "");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn enter_on_empty_line_still_sends() {
        let mut input = InputState::new();
        let outcome = input.handle_key(KeyInput::Enter);
        assert_eq!(outcome, KeyOutcome::Event(AppEvent::SendMessage { text: String::new() }));
    }

    #[test]
    fn editing_in_the_middle() {
        let mut input = InputState::new();
        type_text(&mut input, "hllo");
        input.handle_key(KeyInput::Home);
        input.handle_key(KeyInput::Right);
        input.handle_key(KeyInput::Char('e'));
        assert_eq!(input.buffer(), "hello");

        input.handle_key(KeyInput::End);
        input.handle_key(KeyInput::Backspace);
        assert_eq!(input.buffer(), "hell");

        input.handle_key(KeyInput::Home);
        input.handle_key(KeyInput::Delete);
        assert_eq!(input.buffer(), "ell");
    }

    #[test]
    fn multibyte_characters() {
        let mut input = InputState::new();
        type_text(&mut input, "héé");
        input.handle_key(KeyInput::Left);
        input.handle_key(KeyInput::Backspace);
        assert_eq!(input.buffer(), "hé");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn function_keys_map_to_screen_events() {
        let mut input = InputState::new();
        assert_eq!(
            input.handle_key(KeyInput::SelectCommand),
            KeyOutcome::Event(AppEvent::SelectMode(SelectableMode::Command))
        );
        assert_eq!(
            input.handle_key(KeyInput::SelectStream),
            KeyOutcome::Event(AppEvent::SelectMode(SelectableMode::Stream))
        );
        assert_eq!(input.handle_key(KeyInput::ClearLog), KeyOutcome::Event(AppEvent::ClearLog));
        assert_eq!(input.handle_key(KeyInput::Esc), KeyOutcome::Event(AppEvent::Back));
    }
}
