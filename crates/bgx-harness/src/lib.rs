//! Deterministic simulation harness for BGX device-detail screens.
//!
//! An emulated BGX peripheral answers the screen's transport requests, a
//! seeded scheduler reorders and duplicates the resulting events the way
//! concurrent transport callbacks would, and [`SimDriver`] implements the
//! frontend side of [`bgx_app::Driver`] so the production
//! [`bgx_app::Runtime`] runs unchanged.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all interleavings, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the common
//! screen invariants; [`SimDriver`] checks them on every render.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod scheduler;
pub mod sim_driver;
pub mod sim_peripheral;
pub mod simulation;

pub use invariants::{
    DisconnectedIsClosed, IndicatorMatchesMode, Invariant, InvariantKind, InvariantRegistry,
    InvariantResult, LocalRunMarker, RemoteRunContinuity, ScreenSnapshot, Violation,
};
pub use scheduler::{ChaosConfig, ChaosScheduler};
pub use sim_driver::{Handoff, SimDriver, SimDriverError, SimHandle};
pub use sim_peripheral::{FIRMWARE_VERSION, PeripheralConfig, SimPeripheral};
pub use simulation::{ChaosInput, Simulation};
