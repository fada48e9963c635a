//! Error types for BGX session data.
//!
//! Neither error is fatal. Decode failures are mapped to an `Unknown` state by
//! the caller, and hand-off failures become a user-visible notice.

use thiserror::Error;

/// A transport delivered a code this build does not recognize.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Connection status code outside the known range.
    #[error("unknown connection status code: {0}")]
    UnknownConnectionStatus(u8),

    /// Bus mode code outside the known range.
    #[error("unknown bus mode code: {0}")]
    UnknownBusMode(u8),

    /// Part ID code outside the known range.
    #[error("unknown part id code: {0}")]
    UnknownPartId(u8),
}

/// Firmware-update hand-off was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffError {
    /// No device-info event has arrived since the last (re)connection.
    #[error("Invalid BGX Part ID")]
    MissingIdentity,

    /// The device reported the invalid part.
    #[error("Invalid BGX Part ID")]
    InvalidPartId,

    /// The device reported an empty UUID.
    #[error("Invalid BGX device UUID")]
    MissingDeviceUuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handoff_errors_render_user_notice() {
        assert_eq!(HandoffError::MissingIdentity.to_string(), "Invalid BGX Part ID");
        assert_eq!(HandoffError::InvalidPartId.to_string(), "Invalid BGX Part ID");
        assert_eq!(HandoffError::MissingDeviceUuid.to_string(), "Invalid BGX device UUID");
    }

    #[test]
    fn decode_errors_carry_code() {
        assert_eq!(DecodeError::UnknownBusMode(9).to_string(), "unknown bus mode code: 9");
    }
}
