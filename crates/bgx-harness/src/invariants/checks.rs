//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use bgx_app::LogRun;
use bgx_core::{ConnectionState, Origin};

use super::{Invariant, InvariantKind, InvariantResult, ScreenSnapshot, Violation};

/// Radios shown by the frontend must match the held bus mode.
///
/// Stream mode selects the Stream radio, both command modes select the
/// Command radio, and an unknown mode selects neither.
pub struct IndicatorMatchesMode;

impl Invariant for IndicatorMatchesMode {
    fn kind(&self) -> InvariantKind {
        InvariantKind::IndicatorMatchesMode
    }

    fn check(&self, state: &ScreenSnapshot) -> InvariantResult {
        let expected = state.bus_mode.indicator();
        if state.shown_indicator != expected {
            return Err(Violation {
                invariant: self.kind(),
                message: format!(
                    "mode {:?} shows {:?}, expected {:?}",
                    state.bus_mode, state.shown_indicator, expected
                ),
            });
        }
        Ok(())
    }
}

/// Every local run starts with the local marker.
pub struct LocalRunMarker;

impl Invariant for LocalRunMarker {
    fn kind(&self) -> InvariantKind {
        InvariantKind::LocalRunMarker
    }

    fn check(&self, state: &ScreenSnapshot) -> InvariantResult {
        let unmarked = state
            .runs
            .iter()
            .position(|run| run.origin == Origin::Local && !run.has_marker());

        match unmarked {
            Some(index) => Err(Violation {
                invariant: self.kind(),
                message: format!("local run {index} has no marker: {:?}", state.runs[index].text),
            }),
            None => Ok(()),
        }
    }
}

/// Consecutive remote chunks share one run.
///
/// Two adjacent remote runs mean a remote chunk broke a run it should have
/// continued. An unmarked remote run may only appear first, right after a
/// clear interrupted a remote stream.
pub struct RemoteRunContinuity;

impl Invariant for RemoteRunContinuity {
    fn kind(&self) -> InvariantKind {
        InvariantKind::RemoteRunContinuity
    }

    fn check(&self, state: &ScreenSnapshot) -> InvariantResult {
        let is_remote = |run: &LogRun| run.origin == Origin::Remote;

        if let Some(index) = state.runs.windows(2).position(|w| is_remote(&w[0]) && is_remote(&w[1]))
        {
            return Err(Violation {
                invariant: self.kind(),
                message: format!("remote runs {} and {} are adjacent", index, index + 1),
            });
        }

        let stray = state
            .runs
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, run)| is_remote(run) && !run.has_marker());

        match stray {
            Some((index, run)) => Err(Violation {
                invariant: self.kind(),
                message: format!("unmarked remote run at {index}: {:?}", run.text),
            }),
            None => Ok(()),
        }
    }
}

/// A disconnected device leaves no live screen behind.
pub struct DisconnectedIsClosed;

impl Invariant for DisconnectedIsClosed {
    fn kind(&self) -> InvariantKind {
        InvariantKind::DisconnectedIsClosed
    }

    fn check(&self, state: &ScreenSnapshot) -> InvariantResult {
        if state.connection == ConnectionState::Disconnected && !state.closed {
            return Err(Violation {
                invariant: self.kind(),
                message: "connection is Disconnected but the screen is still open".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bgx_core::{BusMode, ModeIndicator};

    use super::*;

    fn run(origin: Origin, text: &str) -> LogRun {
        LogRun { origin, text: text.to_string() }
    }

    #[test]
    fn indicator_mismatch_detected() {
        let state = ScreenSnapshot::empty().with_mode(BusMode::RemoteCommand, ModeIndicator::Stream);
        assert!(IndicatorMatchesMode.check(&state).is_err());

        let state =
            ScreenSnapshot::empty().with_mode(BusMode::LocalCommand, ModeIndicator::Command);
        assert!(IndicatorMatchesMode.check(&state).is_ok());
    }

    #[test]
    fn unmarked_local_run_detected() {
        let state = ScreenSnapshot::empty().with_runs([run(Origin::Local, "hello")]);
        assert!(LocalRunMarker.check(&state).is_err());
    }

    #[test]
    fn adjacent_remote_runs_detected() {
        let state = ScreenSnapshot::empty()
            .with_runs([run(Origin::Remote, "\n<a"), run(Origin::Remote, "\n<b")]);
        assert!(RemoteRunContinuity.check(&state).is_err());
    }

    #[test]
    fn leading_unmarked_remote_run_allowed() {
        let state = ScreenSnapshot::empty()
            .with_runs([run(Origin::Remote, "tail"), run(Origin::Local, "\n>x")]);
        assert!(RemoteRunContinuity.check(&state).is_ok());

        let state = ScreenSnapshot::empty()
            .with_runs([run(Origin::Local, "\n>x"), run(Origin::Remote, "tail")]);
        assert!(RemoteRunContinuity.check(&state).is_err());
    }

    #[test]
    fn open_disconnected_screen_detected() {
        let state = ScreenSnapshot::empty().with_connection(ConnectionState::Disconnected);
        assert!(DisconnectedIsClosed.check(&state).is_err());
        assert!(DisconnectedIsClosed.check(&state.closed()).is_ok());
    }
}
