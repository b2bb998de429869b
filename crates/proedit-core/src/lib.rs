//! ProEdit Core - Foundation types for the timeline engine
//!
//! This crate provides the fundamental types shared by every ProEdit crate:
//! - Time representation (RationalTime, FrameRate, TimeRange)
//! - RGBA bitmaps produced by texture generators
//! - The common error type

pub mod bitmap;
pub mod error;
pub mod time;

pub use bitmap::{Bitmap, SharedBitmap};
pub use error::{ProEditError, Result};
pub use time::{FrameRate, RationalTime, TimeRange};

/// Engine-wide constants.
pub mod defaults {
    /// Sample rate used for offline audio rendering.
    pub const MIX_SAMPLE_RATE: u32 = 48_000;

    /// Channel count of the offline mix (stereo).
    pub const MIX_CHANNELS: u16 = 2;

    /// Number of generated textures kept per editing session.
    pub const TEXTURE_CACHE_CAPACITY: usize = 20;

    /// Minimum interval between user-visible playhead publications (~30 Hz).
    pub const PUBLISH_INTERVAL_MS: u64 = 32;

    /// Depth of the undo history.
    pub const HISTORY_DEPTH: usize = 200;
}
