//! Screen configuration.

use crate::channel::DEFAULT_EVENT_CAPACITY;

/// Configuration for one device-detail screen.
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    /// Advertised device name. `None` shows a placeholder title.
    pub device_name: Option<String>,
    /// Backlog at which the screen's subscription is reported as lagging.
    pub event_capacity: usize,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self { device_name: None, event_capacity: DEFAULT_EVENT_CAPACITY }
    }
}
