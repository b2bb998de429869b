//! ProEdit Playback - the playhead clock
//!
//! Architecture:
//! - `PlaybackClock`: pure state machine advanced with explicit instants
//! - `FrameTask`: cancellable repeating task on the local executor
//! - `Playback`: wires the two and fans updates out to the render consumer
//!   (every frame) and the UI (throttled)
//!
//! Everything here runs on one thread inside a `tokio::task::LocalSet`.

pub mod clock;
pub mod config;
pub mod controller;
pub mod frame_task;

pub use clock::{ClockState, ClockUpdate, PlaybackClock};
pub use config::PlaybackConfig;
pub use controller::Playback;
pub use frame_task::FrameTask;
