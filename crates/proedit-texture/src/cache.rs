//! Bounded LRU cache for generated textures.
//!
//! Entries are keyed by a semantic key (e.g. `"text:Hello:48:#fff"`) plus the
//! requested dimensions. Only capacity pressure evicts: an entry is a pure
//! function of its key and never goes stale.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use proedit_core::defaults::TEXTURE_CACHE_CAPACITY;
use proedit_core::{Bitmap, SharedBitmap};
use tracing::debug;

/// Key for cached textures.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureKey {
    pub key: String,
    pub width: u32,
    pub height: u32,
}

impl TextureKey {
    pub fn new(key: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            key: key.into(),
            width,
            height,
        }
    }
}

/// Hit/miss/eviction counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Fixed-capacity cache of generated bitmaps, owned by one editing session.
pub struct TextureCache {
    entries: LruCache<TextureKey, SharedBitmap>,
    stats: CacheStats,
}

impl TextureCache {
    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(TEXTURE_CACHE_CAPACITY)
    }

    /// Create a cache holding at most `capacity` bitmaps (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Return the cached bitmap for `key` at `width`×`height`, generating and
    /// storing it on a miss.
    ///
    /// A hit promotes the entry to most-recently-used. A miss at capacity
    /// evicts the least-recently-used entry first.
    pub fn get<F>(&mut self, key: &str, generator: F, width: u32, height: u32) -> SharedBitmap
    where
        F: FnOnce(u32, u32) -> Bitmap,
    {
        let cache_key = TextureKey::new(key, width, height);
        if let Some(bitmap) = self.entries.get(&cache_key) {
            self.stats.hits += 1;
            return Arc::clone(bitmap);
        }

        self.stats.misses += 1;
        let bitmap = Arc::new(generator(width, height));

        if self.entries.len() >= self.entries.cap().get() {
            if let Some((evicted, _)) = self.entries.pop_lru() {
                self.stats.evictions += 1;
                debug!(key = %evicted.key, width = evicted.width, height = evicted.height, "Texture evicted");
            }
        }
        self.entries.put(cache_key, Arc::clone(&bitmap));
        bitmap
    }

    /// Whether `key` is cached at the given size. Does not affect recency.
    pub fn contains(&self, key: &str, width: u32, height: u32) -> bool {
        self.entries.contains(&TextureKey::new(key, width, height))
    }

    /// Remove every size cached under `key`. Returns the number removed.
    pub fn remove(&mut self, key: &str) -> usize {
        let doomed: Vec<TextureKey> = self
            .entries
            .iter()
            .filter(|(k, _)| k.key == key)
            .map(|(k, _)| k.clone())
            .collect();
        for k in &doomed {
            self.entries.pop(k);
        }
        doomed.len()
    }

    /// Drop all cached bitmaps.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Memory held by cached bitmaps, in bytes.
    pub fn memory_usage(&self) -> usize {
        self.entries.iter().map(|(_, b)| b.memory_size()).sum()
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}
