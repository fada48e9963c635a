//! Application layer for the BGX device-detail screen
//!
//! Pure state machines and a generic runtime that keep the screen in sync
//! with a BGX peripheral reached through an external transport. The same
//! runtime drives the terminal frontend and deterministic simulation.
//!
//! # Components
//!
//! - [`App`]: screen state machine (connection, bus mode, text log, identity)
//! - [`ConnectionTracker`], [`BusModeCoordinator`], [`TextLog`]: the three
//!   state components the App is built from
//! - [`Dispatcher`]: turns App actions into transport requests
//! - [`EventChannel`]: typed transport-to-screen notifications
//! - [`Driver`]: trait for frontend I/O abstraction
//! - [`Runtime`]: single-owner orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bus_mode;
mod channel;
mod config;
mod connection;
mod dispatcher;
mod driver;
mod event;
mod runtime;
mod text_log;

pub use action::AppAction;
pub use app::{App, UNNAMED_DEVICE};
pub use bus_mode::{BusModeCoordinator, ModeRequest};
pub use channel::{DEFAULT_EVENT_CAPACITY, EventChannel, EventPublisher, Subscription};
pub use config::ScreenConfig;
pub use connection::{ConnectionTracker, Lifecycle};
pub use dispatcher::{Dispatcher, LINE_TERMINATOR};
pub use driver::Driver;
pub use event::AppEvent;
pub use runtime::{MAX_TRANSPORT_BURST, Runtime};
pub use text_log::{LOCAL_MARKER, LogRun, REMOTE_MARKER, TextLog};
