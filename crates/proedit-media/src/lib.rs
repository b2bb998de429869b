//! ProEdit Media - concrete media services
//!
//! This crate handles:
//! - Resolving source ids to file bytes
//! - Decoding compressed audio to PCM via Symphonia

pub mod decode;
pub mod fetch;

pub use decode::{decode_audio, SymphoniaDecoder};
pub use fetch::FileFetcher;
