//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`bgx_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! Side effects are captured in shared state reachable through a
//! [`SimHandle`], which stays usable after the runtime has taken ownership of
//! the driver.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bgx_app::{App, AppEvent, Driver};
use bgx_core::{ModeIndicator, PartId, TransportRequest};
use tokio::sync::mpsc;

use crate::invariants::{InvariantRegistry, ScreenSnapshot, Violation};

/// Error type for simulation driver.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SimDriverError {
    /// The simulated transport was taken down.
    #[error("simulated transport is down")]
    TransportDown,
    /// The simulated firmware-update flow refused the hand-off.
    #[error("firmware update flow unavailable")]
    FirmwareFlowUnavailable,
}

/// A captured firmware-update hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    /// Device UUID passed along.
    pub device_uuid: String,
    /// Part passed along.
    pub part_id: PartId,
}

/// Shared state for input injection and effect capture.
#[derive(Debug, Default)]
struct SharedState {
    requests: Vec<TransportRequest>,
    shown_indicator: ModeIndicator,
    notices: Vec<String>,
    handoffs: Vec<Handoff>,
    last_snapshot: Option<ScreenSnapshot>,
    violations: Vec<Violation>,
    renders: usize,
    transport_down: bool,
    firmware_flow_down: bool,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
#[derive(Debug)]
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    inputs: mpsc::UnboundedReceiver<AppEvent>,
    invariants: Option<InvariantRegistry>,
}

/// Test-side handle to a [`SimDriver`].
#[derive(Debug, Clone)]
pub struct SimHandle {
    state: Arc<Mutex<SharedState>>,
    inputs: mpsc::UnboundedSender<AppEvent>,
}

impl SimDriver {
    /// Create a driver and the handle used to feed and inspect it.
    pub fn new() -> (Self, SimHandle) {
        let state = Arc::new(Mutex::new(SharedState::default()));
        let (sender, receiver) = mpsc::unbounded_channel();
        let driver = Self { state: Arc::clone(&state), inputs: receiver, invariants: None };
        (driver, SimHandle { state, inputs: sender })
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    fn state(&self) -> MutexGuard<'_, SharedState> {
        lock(&self.state)
    }
}

impl SimHandle {
    /// Queue a user input.
    ///
    /// Inputs queued after the driver is dropped are discarded.
    pub fn inject_input(&self, event: AppEvent) {
        if self.inputs.send(event).is_err() {
            tracing::debug!("driver gone, input discarded");
        }
    }

    /// Take every request sent so far.
    pub fn take_requests(&self) -> Vec<TransportRequest> {
        std::mem::take(&mut lock(&self.state).requests)
    }

    /// Radios as last set by the runtime.
    pub fn shown_indicator(&self) -> ModeIndicator {
        lock(&self.state).shown_indicator
    }

    /// Notices shown so far.
    pub fn notices(&self) -> Vec<String> {
        lock(&self.state).notices.clone()
    }

    /// Firmware-update hand-offs so far.
    pub fn handoffs(&self) -> Vec<Handoff> {
        lock(&self.state).handoffs.clone()
    }

    /// Screen state at the most recent render.
    pub fn last_snapshot(&self) -> Option<ScreenSnapshot> {
        lock(&self.state).last_snapshot.clone()
    }

    /// Invariant violations found during renders.
    pub fn violations(&self) -> Vec<Violation> {
        lock(&self.state).violations.clone()
    }

    /// Number of renders.
    pub fn render_count(&self) -> usize {
        lock(&self.state).renders
    }

    /// Make every further request fail.
    pub fn take_transport_down(&self) {
        lock(&self.state).transport_down = true;
    }

    /// Make the firmware-update flow refuse hand-offs.
    pub fn take_firmware_flow_down(&self) {
        lock(&self.state).firmware_flow_down = true;
    }

    /// Whether the runtime stopped the driver.
    pub fn is_stopped(&self) -> bool {
        lock(&self.state).stopped
    }
}

fn lock(state: &Mutex<SharedState>) -> MutexGuard<'_, SharedState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_input(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        match self.inputs.recv().await {
            Some(event) => Ok(Some(event)),
            // No more user input will ever arrive
            None => std::future::pending().await,
        }
    }

    fn send_request(&mut self, request: TransportRequest) -> Result<(), Self::Error> {
        let mut state = self.state();
        if state.transport_down {
            return Err(SimDriverError::TransportDown);
        }
        state.requests.push(request);
        Ok(())
    }

    fn show_mode_indicator(&mut self, indicator: ModeIndicator) {
        self.state().shown_indicator = indicator;
    }

    fn notify(&mut self, message: &str) {
        self.state().notices.push(message.to_string());
    }

    fn open_firmware_update(
        &mut self,
        device_uuid: &str,
        part_id: PartId,
    ) -> Result<(), Self::Error> {
        let mut state = self.state();
        if state.firmware_flow_down {
            return Err(SimDriverError::FirmwareFlowUnavailable);
        }
        state.handoffs.push(Handoff { device_uuid: device_uuid.to_string(), part_id });
        Ok(())
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        let mut state = self.state();
        let snapshot = ScreenSnapshot::capture(app, state.shown_indicator);

        if let Some(registry) = &self.invariants {
            if let Err(violations) = registry.check_all(&snapshot) {
                for violation in &violations {
                    tracing::error!(%violation, "invariant violated");
                }
                state.violations.extend(violations);
            }
        }

        state.renders += 1;
        state.last_snapshot = Some(snapshot);
        Ok(())
    }

    fn stop(&mut self) {
        self.state().stopped = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn injected_input_is_polled() {
        let (mut driver, handle) = SimDriver::new();
        handle.inject_input(AppEvent::ClearLog);

        let input = driver.poll_input().await.unwrap();
        assert_eq!(input, Some(AppEvent::ClearLog));
    }

    #[test]
    fn requests_are_captured_until_transport_down() {
        let (mut driver, handle) = SimDriver::new();
        driver.send_request(TransportRequest::ReadBusMode).unwrap();
        assert_eq!(handle.take_requests(), [TransportRequest::ReadBusMode]);

        handle.take_transport_down();
        assert!(matches!(
            driver.send_request(TransportRequest::GetDeviceInfo),
            Err(SimDriverError::TransportDown)
        ));
        assert!(handle.take_requests().is_empty());
    }

    #[test]
    fn render_records_snapshot_and_violations() {
        let (driver, handle) = SimDriver::new();
        let mut driver = driver.with_invariants(InvariantRegistry::standard());
        let app = App::new(None);

        driver.render(&app).unwrap();
        assert!(handle.violations().is_empty());

        // Radios out of step with an Unknown mode
        driver.show_mode_indicator(ModeIndicator::Stream);
        driver.render(&app).unwrap();

        assert_eq!(handle.violations().len(), 1);
        assert_eq!(handle.render_count(), 2);
        assert_eq!(
            handle.last_snapshot().map(|s| s.shown_indicator),
            Some(ModeIndicator::Stream)
        );
    }
}
