//! Bus mode coordinator.
//!
//! Reconciles the Stream/Command radios with the mode the device confirms.
//! The device is the source of truth, but a user selection is reflected
//! immediately and corrected by whatever the device confirms next
//! (last-write-wins, no rollback).
//!
//! The coordinator never touches the display itself. A changed mode yields a
//! [`ModeIndicator`] that the caller schedules onto the owner loop.

use bgx_core::{BusMode, ModeIndicator, SelectableMode};

/// Result of a user mode selection that changed the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRequest {
    /// Mode to write to the transport.
    pub mode: BusMode,
    /// Indicator update to schedule.
    pub indicator: ModeIndicator,
}

/// Tracks the current bus mode.
#[derive(Debug, Clone, Default)]
pub struct BusModeCoordinator {
    current: BusMode,
}

impl BusModeCoordinator {
    /// Create a coordinator in [`BusMode::Unknown`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a raw mode code and confirm it.
    ///
    /// Unrecognized codes are logged and confirmed as [`BusMode::Unknown`].
    pub fn on_mode_code(&mut self, code: u8) -> Option<ModeIndicator> {
        let mode = BusMode::try_from(code).unwrap_or_else(|err| {
            tracing::warn!(%err, "bus mode changed to unknown mode");
            BusMode::Unknown
        });
        self.on_mode_confirmed(mode)
    }

    /// Record a mode reported by the device.
    ///
    /// Returns the indicator to show when the mode changed, `None` on a
    /// repeat.
    pub fn on_mode_confirmed(&mut self, new_mode: BusMode) -> Option<ModeIndicator> {
        if new_mode == self.current {
            return None;
        }

        tracing::debug!(from = ?self.current, to = ?new_mode, "bus mode changed");
        self.current = new_mode;
        Some(new_mode.indicator())
    }

    /// Handle a radio selection.
    ///
    /// Returns `None` when the requested mode is already current. Otherwise
    /// the mode is asserted optimistically and the write to issue is returned.
    pub fn on_user_select(&mut self, requested: SelectableMode) -> Option<ModeRequest> {
        let mode = BusMode::from(requested);
        if mode == self.current {
            return None;
        }

        let indicator = self.on_mode_confirmed(mode)?;
        Some(ModeRequest { mode, indicator })
    }

    /// Current bus mode.
    pub fn current(&self) -> BusMode {
        self.current
    }
}
