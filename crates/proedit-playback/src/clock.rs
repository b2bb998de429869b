//! Playhead state machine.
//!
//! The clock owns no timer: the caller feeds it monotonic instants through
//! [`PlaybackClock::advance`] and forwards the returned [`ClockUpdate`]s.
//! Time is in seconds.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Stopped,
    Running,
}

/// Notification produced by a clock step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockUpdate {
    pub time: f64,
    pub playing: bool,
    /// Whether the user-visible time should be published too.
    pub publish: bool,
}

#[derive(Debug, Clone)]
pub struct PlaybackClock {
    state: ClockState,
    time: f64,
    duration: f64,
    rate: f64,
    /// Instant the last advance (or play/seek) was measured from.
    baseline: Option<Instant>,
    last_publish: Option<Instant>,
    publish_interval: Duration,
}

impl PlaybackClock {
    pub fn new(duration: f64, publish_interval: Duration) -> Self {
        Self {
            state: ClockState::Stopped,
            time: 0.0,
            duration: sanitize(duration),
            rate: 1.0,
            baseline: None,
            last_publish: None,
            publish_interval,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Enter Running. At the end of the timeline the playhead rewinds to 0
    /// first. Returns `false` if already running or there is nothing to play.
    pub fn play(&mut self, now: Instant) -> bool {
        if self.is_running() || self.duration <= 0.0 {
            return false;
        }
        if self.time >= self.duration {
            self.time = 0.0;
        }
        self.state = ClockState::Running;
        self.baseline = Some(now);
        info!(time = self.time, rate = self.rate, "Playback started");
        true
    }

    /// Enter Stopped, keeping the current time.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = ClockState::Stopped;
        self.baseline = None;
        info!(time = self.time, "Playback stopped");
        true
    }

    /// Accumulate the time elapsed since the previous step.
    ///
    /// Returns `None` while stopped. Reaching the duration stops the clock
    /// and yields a final update with `playing == false` that always
    /// publishes.
    pub fn advance(&mut self, now: Instant) -> Option<ClockUpdate> {
        if !self.is_running() {
            return None;
        }
        let baseline = self.baseline.unwrap_or(now);
        let elapsed = now.saturating_duration_since(baseline).as_secs_f64();
        self.baseline = Some(now);
        self.time += elapsed * self.rate;

        if self.time >= self.duration {
            self.time = self.duration;
            self.state = ClockState::Stopped;
            self.baseline = None;
            self.last_publish = Some(now);
            info!(time = self.time, "Playback reached end");
            return Some(ClockUpdate {
                time: self.time,
                playing: false,
                publish: true,
            });
        }

        let publish = self
            .last_publish
            .map_or(true, |last| now.saturating_duration_since(last) >= self.publish_interval);
        if publish {
            self.last_publish = Some(now);
        }
        Some(ClockUpdate {
            time: self.time,
            playing: true,
            publish,
        })
    }

    /// Move the playhead, clamped to `[0, duration]`.
    ///
    /// Resets the elapsed-time baseline. While stopped the caller gets one
    /// update to deliver immediately; while running the next frame reports
    /// the new time.
    pub fn seek(&mut self, time: f64, now: Instant) -> Option<ClockUpdate> {
        self.time = sanitize(time).min(self.duration);
        debug!(time = self.time, "Seek");
        if self.is_running() {
            self.baseline = Some(now);
            return None;
        }
        self.last_publish = Some(now);
        Some(ClockUpdate {
            time: self.time,
            playing: false,
            publish: true,
        })
    }

    /// Scale future accumulation. Non-finite or non-positive rates are rejected.
    pub fn set_playback_rate(&mut self, rate: f64) -> bool {
        if !rate.is_finite() || rate <= 0.0 {
            return false;
        }
        self.rate = rate;
        debug!(rate, "Playback rate changed");
        true
    }

    /// Update the timeline length, pulling the playhead back inside it.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = sanitize(duration);
        self.time = self.time.min(self.duration);
    }
}

fn sanitize(seconds: f64) -> f64 {
    if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    }
}
