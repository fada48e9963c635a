//! Seeded chaotic delivery of transport events.
//!
//! A real transport publishes from several callbacks, so events of different
//! kinds can overtake each other while each kind stays in order. The
//! scheduler keeps one FIFO queue per event kind and releases events from a
//! randomly chosen queue, optionally delivering an event twice. The same seed
//! always produces the same delivery order.

use std::collections::{BTreeMap, VecDeque};

use bgx_core::TransportEvent;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Scheduler tuning.
#[derive(Debug, Clone, Copy)]
pub struct ChaosConfig {
    /// Probability that a released event is delivered again right after.
    pub duplicate_rate: f64,
    /// Most events published back to back before the screen runs.
    pub max_burst: usize,
}

impl Default for ChaosConfig {
    fn default() -> Self {
        Self { duplicate_rate: 0.1, max_burst: 1 }
    }
}

/// Per-kind FIFO queues released in seeded random order.
#[derive(Debug)]
pub struct ChaosScheduler {
    rng: ChaCha8Rng,
    config: ChaosConfig,
    queues: BTreeMap<&'static str, VecDeque<TransportEvent>>,
    duplicate: Option<TransportEvent>,
}

impl ChaosScheduler {
    /// Create a scheduler from a seed.
    pub fn new(seed: u64, config: ChaosConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            config,
            queues: BTreeMap::new(),
            duplicate: None,
        }
    }

    /// Queue an event behind earlier events of the same kind.
    pub fn push(&mut self, event: TransportEvent) {
        self.queues.entry(event.kind()).or_default().push_back(event);
    }

    /// Queue several events.
    pub fn extend(&mut self, events: impl IntoIterator<Item = TransportEvent>) {
        for event in events {
            self.push(event);
        }
    }

    /// Release the next event, if any.
    pub fn next_event(&mut self) -> Option<TransportEvent> {
        if let Some(event) = self.duplicate.take() {
            return Some(event);
        }

        let ready: Vec<&'static str> =
            self.queues.iter().filter(|(_, q)| !q.is_empty()).map(|(kind, _)| *kind).collect();
        if ready.is_empty() {
            return None;
        }

        let kind = ready[self.rng.gen_range(0..ready.len())];
        let event = self.queues.get_mut(kind)?.pop_front()?;

        if self.rng.gen_bool(self.config.duplicate_rate) {
            tracing::trace!(kind, "duplicating event");
            self.duplicate = Some(event.clone());
        }

        Some(event)
    }

    /// Number of events waiting, not counting a pending duplicate.
    pub fn pending(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    /// Whether nothing is left to release.
    pub fn is_idle(&self) -> bool {
        self.duplicate.is_none() && self.pending() == 0
    }

    /// Number of events to publish before the screen gets to run, between 1
    /// and `max_burst`.
    pub fn burst_len(&mut self) -> usize {
        match self.config.max_burst {
            0 | 1 => 1,
            max => self.rng.gen_range(1..=max),
        }
    }

    /// Coin flip from the scheduler's stream, for interleaving decisions.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut ChaosScheduler) -> Vec<TransportEvent> {
        std::iter::from_fn(|| scheduler.next_event()).collect()
    }

    fn mixed_events() -> Vec<TransportEvent> {
        let mut events = Vec::new();
        for i in 0..10u8 {
            events.push(TransportEvent::ModeState { code: i % 4 });
            events.push(TransportEvent::DataReceived { data: format!("chunk-{i}") });
        }
        events
    }

    #[test]
    fn same_seed_same_order() {
        let config = ChaosConfig { duplicate_rate: 0.3, max_burst: 4 };
        let mut a = ChaosScheduler::new(7, config);
        let mut b = ChaosScheduler::new(7, config);
        a.extend(mixed_events());
        b.extend(mixed_events());

        assert_eq!(drain(&mut a), drain(&mut b));
    }

    #[test]
    fn per_kind_order_is_kept() {
        let config = ChaosConfig { duplicate_rate: 0.0, ..Default::default() };
        let mut scheduler = ChaosScheduler::new(42, config);
        scheduler.extend(mixed_events());

        let delivered = drain(&mut scheduler);
        assert_eq!(delivered.len(), 20);

        let data: Vec<_> = delivered
            .iter()
            .filter_map(|e| match e {
                TransportEvent::DataReceived { data } => Some(data.clone()),
                _ => None,
            })
            .collect();
        let expected: Vec<_> = (0..10).map(|i| format!("chunk-{i}")).collect();
        assert_eq!(data, expected);
    }

    #[test]
    fn duplicates_follow_original() {
        let config = ChaosConfig { duplicate_rate: 1.0, ..Default::default() };
        let mut scheduler = ChaosScheduler::new(1, config);
        scheduler.push(TransportEvent::ModeState { code: 1 });

        assert_eq!(drain(&mut scheduler), [
            TransportEvent::ModeState { code: 1 },
            TransportEvent::ModeState { code: 1 },
        ]);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn bursts_stay_in_bounds() {
        let mut single = ChaosScheduler::new(3, ChaosConfig::default());
        assert_eq!(single.burst_len(), 1);

        let config = ChaosConfig { max_burst: 8, ..Default::default() };
        let mut bursty = ChaosScheduler::new(3, config);
        for _ in 0..100 {
            assert!((1..=8).contains(&bursty.burst_len()));
        }
    }
}
