//! Terminal UI for BGX device details
//!
//! A thin shell over [`bgx_app::Driver`] that provides terminal-specific I/O
//! and an in-process emulated peripheral. All orchestration logic lives in
//! the generic [`bgx_app::Runtime`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod input;
pub mod peripheral;
pub mod terminal;
pub mod ui;

pub use bgx_app::{App, AppAction, AppEvent, Driver, Runtime};
pub use input::{InputState, KeyInput, KeyOutcome};
pub use peripheral::{PeripheralHandle, spawn_peripheral};
pub use terminal::{TerminalDriver, TerminalError};
