//! ProEdit Audio - offline audio rendering
//!
//! Renders every audio-bearing clip of a timeline into one stereo buffer for
//! export.
//!
//! Architecture:
//! - `source`: fetch/decode service traits consumed by the renderer
//! - `envelope`: per-clip gain with linear fades
//! - `mixer`: the deterministic mix-down pass
//! - `offline`: collects clips, loads sources concurrently, renders

pub mod buffer;
pub mod envelope;
pub mod mixer;
pub mod offline;
pub mod source;

pub use buffer::AudioBuffer;
pub use envelope::GainEnvelope;
pub use mixer::ScheduledSource;
pub use offline::{render_offline_audio, OfflineMixConfig};
pub use source::{AudioDecode, ByteFetcher, DecodedAudio};
