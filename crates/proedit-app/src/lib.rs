//! ProEdit App - the editing session
//!
//! `EditorSession` is the single owner of mutable editing state: the
//! timeline, its undo history, the texture cache, the layer memo and the
//! playback controller. Everything runs on one thread.

pub mod export;
pub mod memo;
pub mod session;

pub use export::export_audio;
pub use memo::LayerMemo;
pub use session::{EditorSession, SessionConfig, TimelineSnapshot};
