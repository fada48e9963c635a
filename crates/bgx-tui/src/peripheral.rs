//! In-process emulated peripheral.
//!
//! Runs a [`SimPeripheral`] as a tokio task. Requests arrive over an mpsc
//! channel and the answers are published on the screen's event channel, the
//! same path a real transport's callbacks would take.

use bgx_app::EventPublisher;
use bgx_core::TransportRequest;
use bgx_harness::{PeripheralConfig, SimPeripheral};
use tokio::sync::mpsc;

/// Handle to a running in-process peripheral.
#[derive(Debug)]
pub struct PeripheralHandle {
    /// Send requests to the peripheral. Never blocks.
    pub requests: mpsc::UnboundedSender<TransportRequest>,
    /// Abort handle to stop the peripheral task.
    abort_handle: tokio::task::AbortHandle,
}

impl PeripheralHandle {
    /// Stop the peripheral.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Spawn an in-process peripheral publishing to `publisher`.
///
/// The link comes up as soon as the task starts. The task ends once the
/// device reports `Disconnected` or every request sender is gone.
pub fn spawn_peripheral(config: PeripheralConfig, publisher: EventPublisher) -> PeripheralHandle {
    let (requests, mut request_rx) = mpsc::unbounded_channel::<TransportRequest>();

    let handle = tokio::spawn(async move {
        let mut peripheral = SimPeripheral::new(config);
        for event in peripheral.connect() {
            publisher.publish(event);
        }

        while let Some(request) = request_rx.recv().await {
            tracing::debug!(?request, "peripheral request");
            for event in peripheral.handle_request(request) {
                publisher.publish(event);
            }

            if peripheral.connection() == bgx_core::ConnectionState::Disconnected {
                tracing::info!("peripheral disconnected");
                break;
            }
        }
    });

    PeripheralHandle { requests, abort_handle: handle.abort_handle() }
}

#[cfg(test)]
mod tests {
    use bgx_app::EventChannel;
    use bgx_core::{BusMode, TransportEvent};

    use super::*;

    #[tokio::test]
    async fn peripheral_connects_and_answers() {
        let channel = EventChannel::default();
        let mut subscription = channel.subscribe();
        let handle = spawn_peripheral(PeripheralConfig::default(), channel.publisher());

        for code in [1, 2, 3] {
            assert_eq!(subscription.recv().await, Some(TransportEvent::ConnectionStatus { code }));
        }

        handle.requests.send(TransportRequest::ReadBusMode).unwrap();
        assert_eq!(
            subscription.recv().await,
            Some(TransportEvent::ModeState { code: BusMode::Stream.code() })
        );

        handle.stop();
    }

    #[tokio::test]
    async fn disconnect_ends_task() {
        let channel = EventChannel::default();
        let mut subscription = channel.subscribe();
        let handle = spawn_peripheral(PeripheralConfig::default(), channel.publisher());

        handle.requests.send(TransportRequest::Disconnect).unwrap();

        let mut statuses = Vec::new();
        while let Some(TransportEvent::ConnectionStatus { code }) = subscription.recv().await {
            statuses.push(code);
            if code == 0 {
                break;
            }
        }
        assert_eq!(statuses, [1, 2, 3, 4, 0]);

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(handle.requests.send(TransportRequest::ReadBusMode).is_err());
    }
}
