//! Core domain types for BGX serial-bridge sessions.
//!
//! Everything here is plain data shared by the session state machines, the
//! simulation harness and the frontends:
//!
//! - [`ConnectionState`], [`BusMode`] and [`PartId`] with their wire codes
//! - [`ModeIndicator`], the two-radio view of a bus mode
//! - [`TextSource`] and [`Origin`] for text attribution
//! - [`DeviceIdentity`] and the firmware-update hand-off check
//! - [`TransportEvent`] and [`TransportRequest`], the transport interface

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod identity;
mod mode;
mod state;
mod transport;

pub use error::{DecodeError, HandoffError};
pub use identity::{DeviceIdentity, FirmwareHandoff, PartId};
pub use mode::{BusMode, ModeIndicator, SelectableMode};
pub use state::{ConnectionState, Origin, TextSource};
pub use transport::{TransportEvent, TransportRequest};
