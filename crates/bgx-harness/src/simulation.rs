//! End-to-end screen simulation.
//!
//! Wires a [`Runtime`] over a [`SimDriver`] to an emulated peripheral through
//! a real [`EventChannel`]. Requests the screen sends are answered by the
//! peripheral and the answers go through the [`ChaosScheduler`] before they
//! are published. Every call advances the runtime by exactly one step, so the
//! whole run is reproducible from its seed.

use bgx_app::{App, AppEvent, EventChannel, EventPublisher, Runtime, ScreenConfig};
use bgx_core::TransportEvent;

use crate::{
    invariants::InvariantRegistry,
    scheduler::{ChaosConfig, ChaosScheduler},
    sim_driver::{SimDriver, SimDriverError, SimHandle},
    sim_peripheral::{PeripheralConfig, SimPeripheral},
};

/// One scripted step of a chaotic session.
#[derive(Debug, Clone, PartialEq)]
pub enum ChaosInput {
    /// Something the user does.
    User(AppEvent),
    /// The device drops the link.
    DropLink,
}

impl From<AppEvent> for ChaosInput {
    fn from(event: AppEvent) -> Self {
        Self::User(event)
    }
}

/// A screen, its transport and the device behind it.
pub struct Simulation {
    runtime: Runtime<SimDriver>,
    handle: SimHandle,
    channel: EventChannel,
    publisher: EventPublisher,
    peripheral: SimPeripheral,
    scheduler: ChaosScheduler,
}

impl Simulation {
    /// Build a connected simulation. The screen has not been entered yet.
    pub fn new(
        seed: u64,
        screen: ScreenConfig,
        peripheral: PeripheralConfig,
        chaos: ChaosConfig,
    ) -> Self {
        let channel = EventChannel::new(screen.event_capacity);
        let publisher = channel.publisher();
        let (driver, handle) = SimDriver::new();
        let driver = driver.with_invariants(InvariantRegistry::standard());
        let runtime = Runtime::new(driver, App::new(screen.device_name), channel.subscribe());

        let mut peripheral = SimPeripheral::new(peripheral);
        // Link already up when the screen opens
        let _ = peripheral.connect();

        Self {
            runtime,
            handle,
            channel,
            publisher,
            peripheral,
            scheduler: ChaosScheduler::new(seed, chaos),
        }
    }

    /// Enter the screen and route its initial requests.
    pub fn start(&mut self) -> Result<bool, SimDriverError> {
        let closed = self.runtime.start()?;
        self.route_requests();
        Ok(closed)
    }

    /// Feed one user input through the runtime.
    ///
    /// Must only be called while no published event is waiting, otherwise the
    /// runtime takes the event first.
    pub async fn input(&mut self, event: AppEvent) -> Result<bool, SimDriverError> {
        self.handle.inject_input(event);
        let closed = self.runtime.step().await?;
        self.route_requests();
        Ok(closed)
    }

    /// Publish the next burst of scheduled events, then process them.
    ///
    /// Returns `None` when nothing was scheduled.
    pub async fn deliver_next(&mut self) -> Option<Result<bool, SimDriverError>> {
        let burst = self.scheduler.burst_len();
        let mut published = 0;
        while published < burst {
            let Some(event) = self.scheduler.next_event() else {
                break;
            };
            if self.publisher.publish(event) == 0 {
                return Some(Ok(true));
            }
            published += 1;
        }

        if published == 0 {
            return None;
        }

        for _ in 0..published {
            let result = self.runtime.step().await;
            self.route_requests();
            if !matches!(result, Ok(false)) {
                return Some(result);
            }
        }
        Some(Ok(false))
    }

    /// Deliver scheduled events until none are left or the screen closes.
    pub async fn settle(&mut self) -> Result<bool, SimDriverError> {
        while let Some(result) = self.deliver_next().await {
            if result? {
                return Ok(true);
            }
        }
        Ok(self.runtime.app().is_closed())
    }

    /// Interleave scripted inputs with scheduled events at random, then
    /// settle.
    pub async fn run_chaos<I>(&mut self, inputs: I) -> Result<bool, SimDriverError>
    where
        I: IntoIterator,
        I::Item: Into<ChaosInput>,
    {
        let mut inputs = inputs.into_iter().map(Into::into).peekable();

        while inputs.peek().is_some() || !self.scheduler.is_idle() {
            let deliver = !self.scheduler.is_idle()
                && (inputs.peek().is_none() || self.scheduler.gen_bool(0.5));

            let closed = if deliver {
                match self.deliver_next().await {
                    Some(result) => result?,
                    None => false,
                }
            } else if let Some(input) = inputs.next() {
                match input {
                    ChaosInput::User(event) => self.input(event).await?,
                    ChaosInput::DropLink => {
                        self.drop_link();
                        false
                    },
                }
            } else {
                false
            };

            if closed {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Drop the link from the device side.
    pub fn drop_link(&mut self) {
        let events = self.peripheral.drop_link();
        self.scheduler.extend(events);
    }

    /// Publish an event immediately, bypassing the scheduler.
    ///
    /// Returns the number of subscriptions that will see it.
    pub fn publish_now(&self, event: TransportEvent) -> usize {
        self.publisher.publish(event)
    }

    /// Tear the screen down.
    pub fn teardown(&mut self) {
        self.runtime.teardown();
    }

    /// Hand every request the screen sent to the peripheral and schedule the
    /// answers.
    fn route_requests(&mut self) {
        for request in self.handle.take_requests() {
            let events = self.peripheral.handle_request(request);
            self.scheduler.extend(events);
        }
    }

    /// The screen state machine.
    pub fn app(&self) -> &App {
        self.runtime.app()
    }

    /// The emulated device.
    pub fn peripheral(&self) -> &SimPeripheral {
        &self.peripheral
    }

    /// Driver handle for inspection.
    pub fn handle(&self) -> &SimHandle {
        &self.handle
    }

    /// Whether the screen still receives transport events.
    pub fn is_subscribed(&self) -> bool {
        self.runtime.is_subscribed()
    }

    /// Live subscriptions on the channel.
    pub fn subscriber_count(&self) -> usize {
        self.channel.subscriber_count()
    }
}
