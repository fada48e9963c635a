//! Connection lifecycle and text attribution states.

use crate::DecodeError;

/// Connection lifecycle as reported by the transport.
///
/// Only inbound events set this. [`ConnectionState::Disconnected`] is terminal
/// for a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// GATT connection established and interrogated.
    Connected,
    /// Connection in progress.
    Connecting,
    /// Disconnect in progress.
    Disconnecting,
    /// Link is gone.
    Disconnected,
    /// Connected, firmware interrogation in progress.
    Interrogating,
    /// Unrecognized or not yet reported.
    #[default]
    Unknown,
}

impl ConnectionState {
    /// Wire code of this state. `Unknown` has none.
    pub fn code(self) -> Option<u8> {
        match self {
            Self::Disconnected => Some(0),
            Self::Connecting => Some(1),
            Self::Interrogating => Some(2),
            Self::Connected => Some(3),
            Self::Disconnecting => Some(4),
            Self::Unknown => None,
        }
    }
}

impl TryFrom<u8> for ConnectionState {
    type Error = DecodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Disconnected),
            1 => Ok(Self::Connecting),
            2 => Ok(Self::Interrogating),
            3 => Ok(Self::Connected),
            4 => Ok(Self::Disconnecting),
            other => Err(DecodeError::UnknownConnectionStatus(other)),
        }
    }
}

/// Producer of the most recently appended text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSource {
    /// Nothing appended yet.
    #[default]
    Unknown,
    /// Typed on this host.
    Local,
    /// Received from the peripheral.
    Remote,
}

/// Producer of a single append. Unlike [`TextSource`] this is never unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Typed on this host.
    Local,
    /// Received from the peripheral.
    Remote,
}

impl From<Origin> for TextSource {
    fn from(origin: Origin) -> Self {
        match origin {
            Origin::Local => Self::Local,
            Origin::Remote => Self::Remote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_codes_round_trip() {
        for state in [
            ConnectionState::Disconnected,
            ConnectionState::Connecting,
            ConnectionState::Interrogating,
            ConnectionState::Connected,
            ConnectionState::Disconnecting,
        ] {
            let code = state.code();
            assert!(code.is_some());
            assert_eq!(code.map(ConnectionState::try_from), Some(Ok(state)));
        }
        assert_eq!(ConnectionState::Unknown.code(), None);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_eq!(ConnectionState::try_from(77), Err(DecodeError::UnknownConnectionStatus(77)));
    }
}
