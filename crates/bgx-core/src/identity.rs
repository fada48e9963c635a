//! Device identity and the firmware-update hand-off.

use crate::{DecodeError, HandoffError};

/// BGX module part number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartId {
    /// BGX13S.
    Bgx13S,
    /// BGX13P.
    Bgx13P,
    /// BGX220S (V3 silicon).
    BgxV3S,
    /// BGX220P (V3 silicon).
    BgxV3P,
    /// Interrogation failed or part unsupported.
    Invalid,
}

impl PartId {
    /// Whether a firmware update can be offered for this part.
    pub fn is_valid(self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Wire code of this part.
    pub fn code(self) -> u8 {
        match self {
            Self::Invalid => 0,
            Self::Bgx13S => 1,
            Self::Bgx13P => 2,
            Self::BgxV3S => 3,
            Self::BgxV3P => 4,
        }
    }
}

impl TryFrom<u8> for PartId {
    type Error = DecodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Invalid),
            1 => Ok(Self::Bgx13S),
            2 => Ok(Self::Bgx13P),
            3 => Ok(Self::BgxV3S),
            4 => Ok(Self::BgxV3P),
            other => Err(DecodeError::UnknownPartId(other)),
        }
    }
}

/// Identity reported by a device-info event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Device UUID string as reported by the transport.
    pub device_uuid: String,
    /// Module part.
    pub part_id: PartId,
}

impl DeviceIdentity {
    /// Create an identity.
    pub fn new(device_uuid: impl Into<String>, part_id: PartId) -> Self {
        Self { device_uuid: device_uuid.into(), part_id }
    }
}

/// The two identifiers handed to the firmware-update flow, unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareHandoff {
    /// Device UUID.
    pub device_uuid: String,
    /// Module part. Never [`PartId::Invalid`].
    pub part_id: PartId,
}

impl FirmwareHandoff {
    /// Validate an optional identity for hand-off.
    ///
    /// # Errors
    ///
    /// Refuses a missing identity, the invalid part, or an empty UUID.
    pub fn prepare(identity: Option<&DeviceIdentity>) -> Result<Self, HandoffError> {
        let identity = identity.ok_or(HandoffError::MissingIdentity)?;
        if !identity.part_id.is_valid() {
            return Err(HandoffError::InvalidPartId);
        }
        if identity.device_uuid.is_empty() {
            return Err(HandoffError::MissingDeviceUuid);
        }
        Ok(Self { device_uuid: identity.device_uuid.clone(), part_id: identity.part_id })
    }
}
