//! Driver trait for abstracting frontend I/O.
//!
//! The [`Driver`] trait decouples the screen runtime from specific frontends.
//! Each frontend implements the trait to provide user input, widget updates
//! and a path to the transport, while the generic [`crate::Runtime`] handles
//! all orchestration.

use std::future::Future;

use bgx_core::{ModeIndicator, PartId, TransportRequest};

use crate::{App, AppEvent};

/// Abstracts frontend I/O for the screen runtime.
///
/// Every method except [`Driver::poll_input`] is called from the runtime's
/// owner loop and must return without waiting on the transport or the user.
///
/// # Implementations
///
/// - **TUI**: crossterm input, ratatui rendering, in-process peripheral
/// - **Simulation**: scripted input and captured side effects
pub trait Driver: Send {
    /// Frontend-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next user input.
    ///
    /// Returns `None` when a wake-up produced no input (for example a tick).
    fn poll_input(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Hand a request to the transport without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport is gone. Callers treat this as a
    /// dropped request.
    fn send_request(&mut self, request: TransportRequest) -> Result<(), Self::Error>;

    /// Set the Stream/Command radios.
    fn show_mode_indicator(&mut self, indicator: ModeIndicator);

    /// Show a user-visible notice.
    fn notify(&mut self, message: &str);

    /// Hand off to the firmware-update flow.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow cannot be started.
    fn open_firmware_update(&mut self, device_uuid: &str, part_id: PartId)
    -> Result<(), Self::Error>;

    /// Render the screen state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Release frontend resources.
    fn stop(&mut self);
}
