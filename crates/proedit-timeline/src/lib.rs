//! ProEdit Timeline - Timeline data model and time-indexed resolution
//!
//! Implements the editable timeline:
//! - Tracks of contiguous clips (video, image, text, sticker, audio)
//! - Clip operations that keep start times packed
//! - Transitions and the visible-layer resolver
//! - Snapshot-based undo/redo history

pub mod clip;
pub mod history;
pub mod resolve;
pub mod timeline;
pub mod track;
pub mod transition;

pub use clip::{AudioParams, Clip, ClipContent, ClipId, ClipPatch};
pub use history::{History, HistoryMode};
pub use resolve::{resolve_visible_layers, Layer, LayerRole};
pub use timeline::Timeline;
pub use track::{Track, TrackId, TrackKind};
pub use transition::{Direction, Layering, Transition, TransitionKind};
