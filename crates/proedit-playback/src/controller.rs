//! Playback controller: clock + frame task + notification sinks.
//!
//! The frame task holds only a weak reference to the shared state, so
//! dropping the controller tears everything down even if a frame is
//! pending.

use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::{Rc, Weak};

use tokio::time::Instant;
use tracing::debug;

use crate::clock::{ClockUpdate, PlaybackClock};
use crate::config::PlaybackConfig;
use crate::frame_task::FrameTask;

type FrameSink = Box<dyn FnMut(f64, bool)>;
type PublishSink = Box<dyn FnMut(f64)>;

#[derive(Default)]
struct Sinks {
    on_frame: Option<FrameSink>,
    on_publish: Option<PublishSink>,
}

struct Shared {
    clock: RefCell<PlaybackClock>,
    sinks: RefCell<Sinks>,
}

impl Shared {
    /// Deliver an update. The clock is not borrowed here, so sinks may
    /// query it.
    fn emit(&self, update: ClockUpdate) {
        let mut sinks = self.sinks.borrow_mut();
        if let Some(on_frame) = sinks.on_frame.as_mut() {
            on_frame(update.time, update.playing);
        }
        if update.publish {
            if let Some(on_publish) = sinks.on_publish.as_mut() {
                on_publish(update.time);
            }
        }
    }

    fn frame(weak: &Weak<Shared>, now: Instant) -> ControlFlow<()> {
        let Some(shared) = weak.upgrade() else {
            return ControlFlow::Break(());
        };
        let update = shared.clock.borrow_mut().advance(now);
        match update {
            Some(update) => {
                shared.emit(update);
                if update.playing {
                    ControlFlow::Continue(())
                } else {
                    ControlFlow::Break(())
                }
            }
            None => ControlFlow::Break(()),
        }
    }
}

/// Single-threaded playback driver.
///
/// `on_frame(time, playing)` is the render consumer's fast path and fires
/// every frame; `on_publish(time)` is the throttled user-visible time.
/// Sinks must not call back into the controller.
pub struct Playback {
    shared: Rc<Shared>,
    task: Option<FrameTask>,
    config: PlaybackConfig,
}

impl Playback {
    pub fn new(config: PlaybackConfig, duration: f64) -> Self {
        Self {
            shared: Rc::new(Shared {
                clock: RefCell::new(PlaybackClock::new(duration, config.publish_interval)),
                sinks: RefCell::new(Sinks::default()),
            }),
            task: None,
            config,
        }
    }

    pub fn on_frame(&mut self, sink: impl FnMut(f64, bool) + 'static) {
        self.shared.sinks.borrow_mut().on_frame = Some(Box::new(sink));
    }

    pub fn on_publish(&mut self, sink: impl FnMut(f64) + 'static) {
        self.shared.sinks.borrow_mut().on_publish = Some(Box::new(sink));
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn time(&self) -> f64 {
        self.shared.clock.borrow().time()
    }

    pub fn duration(&self) -> f64 {
        self.shared.clock.borrow().duration()
    }

    pub fn is_playing(&self) -> bool {
        self.shared.clock.borrow().is_running()
    }

    /// Start playing from the current time. Must be called inside a `LocalSet`.
    pub fn play(&mut self) -> bool {
        if !self.shared.clock.borrow_mut().play(Instant::now()) {
            return false;
        }
        self.stop_task();
        let weak = Rc::downgrade(&self.shared);
        self.task = Some(FrameTask::start(
            self.config.frame_rate.frame_period(),
            move |now| Shared::frame(&weak, now),
        ));
        true
    }

    /// Stop playing, keeping the current time. Cancels the frame task.
    pub fn stop(&mut self) -> bool {
        self.stop_task();
        self.shared.clock.borrow_mut().stop()
    }

    pub fn seek(&mut self, time: f64) {
        let update = self.shared.clock.borrow_mut().seek(time, Instant::now());
        if let Some(update) = update {
            self.shared.emit(update);
        }
    }

    pub fn set_playback_rate(&mut self, rate: f64) -> bool {
        self.shared.clock.borrow_mut().set_playback_rate(rate)
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.shared.clock.borrow_mut().set_duration(duration);
    }

    /// Cancel playback and drop the sinks.
    pub fn dispose(&mut self) {
        self.stop();
        *self.shared.sinks.borrow_mut() = Sinks::default();
        debug!("Playback disposed");
    }

    fn stop_task(&mut self) {
        if let Some(mut task) = self.task.take() {
            task.stop();
        }
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.stop_task();
    }
}
