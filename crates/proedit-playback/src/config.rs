use std::time::Duration;

use proedit_core::defaults::PUBLISH_INTERVAL_MS;
use proedit_core::FrameRate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Rate of the frame task (render notifications).
    pub frame_rate: FrameRate,
    /// Minimum spacing between user-visible time publishes.
    pub publish_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            frame_rate: FrameRate::FPS_60,
            publish_interval: Duration::from_millis(PUBLISH_INTERVAL_MS),
        }
    }
}
