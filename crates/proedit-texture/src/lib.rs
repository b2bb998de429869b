//! ProEdit Texture - cache of generated bitmaps
//!
//! Text, sticker and effect textures are expensive to generate and are pure
//! functions of their parameters, so the editor session keeps the most
//! recently used ones in a bounded LRU cache.

pub mod cache;

pub use cache::{CacheStats, TextureCache, TextureKey};
