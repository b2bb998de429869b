//! Cancellable repeating frame task.
//!
//! Runs on the current `LocalSet`, so the callback need not be `Send`.
//! Stopping or dropping the task aborts it; no scheduled iteration
//! survives.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

const MIN_PERIOD: Duration = Duration::from_millis(1);

pub struct FrameTask {
    handle: Option<JoinHandle<()>>,
}

impl FrameTask {
    /// Spawn a task invoking `on_frame` every `period` until it returns
    /// `ControlFlow::Break` or the task is stopped.
    ///
    /// The first frame fires immediately. Late frames are skipped rather than
    /// bunched. Must be called from within a `LocalSet`.
    pub fn start<F>(period: Duration, mut on_frame: F) -> Self
    where
        F: FnMut(Instant) -> ControlFlow<()> + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let handle = tokio::task::spawn_local(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if on_frame(Instant::now()).is_break() {
                    debug!("Frame task finished");
                    break;
                }
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    /// Cancel the task. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Frame task stopped");
        }
    }

    /// Whether the task is still scheduled.
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for FrameTask {
    fn drop(&mut self) {
        self.stop();
    }
}
