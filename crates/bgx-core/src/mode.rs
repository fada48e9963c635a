//! Bus mode and its two-radio display.

use crate::DecodeError;

/// Data-framing discipline of the peripheral.
///
/// `LocalCommand` and `RemoteCommand` are distinct on the wire but collapse to
/// the same [`ModeIndicator::Command`] for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BusMode {
    /// Mode not yet known.
    #[default]
    Unknown,
    /// Raw byte stream.
    Stream,
    /// Command mode entered from the peripheral side.
    LocalCommand,
    /// Command mode entered from the host side.
    RemoteCommand,
}

impl BusMode {
    /// Wire code of this mode.
    pub fn code(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Stream => 1,
            Self::LocalCommand => 2,
            Self::RemoteCommand => 3,
        }
    }

    /// Radio display for this mode.
    pub fn indicator(self) -> ModeIndicator {
        match self {
            Self::Unknown => ModeIndicator::Neither,
            Self::Stream => ModeIndicator::Stream,
            Self::LocalCommand | Self::RemoteCommand => ModeIndicator::Command,
        }
    }
}

impl TryFrom<u8> for BusMode {
    type Error = DecodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Unknown),
            1 => Ok(Self::Stream),
            2 => Ok(Self::LocalCommand),
            3 => Ok(Self::RemoteCommand),
            other => Err(DecodeError::UnknownBusMode(other)),
        }
    }
}

/// Modes a user can request from the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectableMode {
    /// The Stream radio.
    Stream,
    /// The Command radio. Always requests [`BusMode::RemoteCommand`].
    Command,
}

impl From<SelectableMode> for BusMode {
    fn from(mode: SelectableMode) -> Self {
        match mode {
            SelectableMode::Stream => Self::Stream,
            SelectableMode::Command => Self::RemoteCommand,
        }
    }
}

/// Which of the Stream/Command radios is on. At most one is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeIndicator {
    /// Neither radio selected.
    #[default]
    Neither,
    /// Stream radio selected.
    Stream,
    /// Command radio selected.
    Command,
}

impl ModeIndicator {
    /// Stream radio checked.
    pub fn stream_selected(self) -> bool {
        matches!(self, Self::Stream)
    }

    /// Command radio checked.
    pub fn command_selected(self) -> bool {
        matches!(self, Self::Command)
    }
}
