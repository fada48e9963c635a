//! Invariant checking for deterministic simulation testing.
//!
//! Invariants are properties that must always hold while a screen runs.
//! Unlike example-based tests that check specific scenarios, invariants
//! verify behavioral properties across all possible event interleavings.
//!
//! # Architecture
//!
//! The observable state of an [`bgx_app::App`] plus the radios the frontend
//! shows are extracted into a [`ScreenSnapshot`], then every registered
//! [`Invariant`] is run against it.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = ScreenSnapshot::capture(&app, shown);
//! registry.check_all(&snapshot)?;
//! ```

mod checks;
mod snapshot;

use std::fmt;

pub use checks::{DisconnectedIsClosed, IndicatorMatchesMode, LocalRunMarker, RemoteRunContinuity};
pub use snapshot::ScreenSnapshot;

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Identifies an invariant in violation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvariantKind {
    /// Shown radios agree with the held mode.
    IndicatorMatchesMode,
    /// Local runs are marked.
    LocalRunMarker,
    /// Remote chunks coalesce.
    RemoteRunContinuity,
    /// Disconnection closes the screen.
    DisconnectedIsClosed,
}

impl fmt::Display for InvariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::IndicatorMatchesMode => "indicator_matches_mode",
            Self::LocalRunMarker => "local_run_marker",
            Self::RemoteRunContinuity => "remote_run_continuity",
            Self::DisconnectedIsClosed => "disconnected_is_closed",
        };
        f.write_str(name)
    }
}

/// Invariant violation with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The violated invariant.
    pub invariant: InvariantKind,
    /// Description of what went wrong.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// An invariant that can be checked against screen state.
pub trait Invariant: Send + Sync {
    /// Invariant identity for error reporting.
    fn kind(&self) -> InvariantKind;

    /// Check the invariant against the current state.
    ///
    /// Returns `Ok(())` if the invariant holds, or a [`Violation`]
    /// describing what went wrong.
    fn check(&self, state: &ScreenSnapshot) -> InvariantResult;
}

/// Registry of invariants to check.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InvariantRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.invariants.iter().map(|inv| inv.kind())).finish()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with the standard screen invariants.
    ///
    /// Includes:
    /// - [`IndicatorMatchesMode`]
    /// - [`LocalRunMarker`]
    /// - [`RemoteRunContinuity`]
    /// - [`DisconnectedIsClosed`]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(IndicatorMatchesMode);
        registry.add(LocalRunMarker);
        registry.add(RemoteRunContinuity);
        registry.add(DisconnectedIsClosed);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants against the given state.
    ///
    /// Returns `Ok(())` if all invariants hold, or all violations found.
    pub fn check_all(&self, state: &ScreenSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use bgx_core::{BusMode, ModeIndicator};

    use super::*;

    #[test]
    fn standard_registry_has_invariants() {
        let registry = InvariantRegistry::standard();
        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn empty_snapshot_passes_invariants() {
        let registry = InvariantRegistry::standard();
        assert!(registry.check_all(&ScreenSnapshot::empty()).is_ok());
    }

    #[test]
    fn all_violations_reported() {
        let registry = InvariantRegistry::standard();
        let snapshot = ScreenSnapshot::empty()
            .with_mode(BusMode::Stream, ModeIndicator::Command)
            .with_connection(bgx_core::ConnectionState::Disconnected);

        let violations = registry.check_all(&snapshot).unwrap_err();
        let kinds: Vec<_> = violations.iter().map(|v| v.invariant).collect();
        assert_eq!(kinds, [InvariantKind::IndicatorMatchesMode, InvariantKind::DisconnectedIsClosed]);
    }

    #[test]
    fn violation_display_names_invariant() {
        let violation =
            Violation { invariant: InvariantKind::LocalRunMarker, message: "run 0".to_string() };
        assert_eq!(violation.to_string(), "local_run_marker: run 0");
    }
}
