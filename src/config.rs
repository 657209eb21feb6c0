use std::time::Duration;

use serde::Deserialize;

use crate::platform::Platform;
use crate::throttle::EVENT_THROTTLE;

/// Plugin configuration, read from `plugins.camera-view` in `tauri.conf.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Window in which identical detection events are suppressed.
    pub event_throttle_ms: Option<u64>,
    /// Overrides the detected platform.
    pub platform: Option<Platform>,
}

impl Config {
    pub fn throttle_window(&self) -> Duration {
        self.event_throttle_ms
            .map(Duration::from_millis)
            .unwrap_or(EVENT_THROTTLE)
    }

    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }
}
