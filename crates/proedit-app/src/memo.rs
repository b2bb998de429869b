//! Last-result memo for the visible-layer resolver.

use proedit_core::RationalTime;
use proedit_timeline::{resolve_visible_layers, Layer, Track};

/// Caches the layers of the most recent `(revision, time)` query.
///
/// The revision is bumped by the session on every timeline change, so a
/// matching key means the tracks are unchanged.
#[derive(Debug, Default)]
pub struct LayerMemo {
    key: Option<(u64, RationalTime)>,
    layers: Vec<Layer>,
    hits: u64,
    misses: u64,
}

impl LayerMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, revision: u64, tracks: &[Track], time: RationalTime) -> &[Layer] {
        if self.key == Some((revision, time)) {
            self.hits += 1;
        } else {
            self.misses += 1;
            self.layers = resolve_visible_layers(tracks, time);
            self.key = Some((revision, time));
        }
        &self.layers
    }

    pub fn invalidate(&mut self) {
        self.key = None;
        self.layers.clear();
    }

    /// (hits, misses)
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
