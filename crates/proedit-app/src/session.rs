//! Editor session: the one place timeline edits happen.
//!
//! Every mutation goes through the session, which records a history snapshot
//! only when the timeline actually changed. Undo and redo write a snapshot
//! back while the history is in restore mode, so the write-back is never
//! recorded as a new edit.

use proedit_audio::OfflineMixConfig;
use proedit_core::defaults::{HISTORY_DEPTH, TEXTURE_CACHE_CAPACITY};
use proedit_core::{Bitmap, RationalTime, SharedBitmap};
use proedit_playback::{Playback, PlaybackConfig};
use proedit_texture::TextureCache;
use proedit_timeline::{Clip, ClipId, ClipPatch, History, Layer, Timeline, TrackId, TrackKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::memo::LayerMemo;

/// Full timeline state (tracks and selection) as stored in history.
pub type TimelineSnapshot = Timeline;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub history_depth: usize,
    pub texture_capacity: usize,
    pub playback: PlaybackConfig,
    pub mix: OfflineMixConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_depth: HISTORY_DEPTH,
            texture_capacity: TEXTURE_CACHE_CAPACITY,
            playback: PlaybackConfig::default(),
            mix: OfflineMixConfig::default(),
        }
    }
}

pub struct EditorSession {
    timeline: Timeline,
    history: History<TimelineSnapshot>,
    textures: TextureCache,
    memo: LayerMemo,
    playback: Playback,
    config: SessionConfig,
    /// Bumped on every timeline change, including undo/redo.
    revision: u64,
}

impl EditorSession {
    pub fn new(config: SessionConfig) -> Self {
        let timeline = Timeline::new();
        let mut history = History::new(config.history_depth);
        history.commit(timeline.clone());
        info!(
            history_depth = config.history_depth,
            texture_capacity = config.texture_capacity,
            "Editor session created"
        );
        Self {
            timeline,
            history,
            textures: TextureCache::with_capacity(config.texture_capacity),
            memo: LayerMemo::new(),
            playback: Playback::new(config.playback, 0.0),
            config,
            revision: 0,
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn history(&self) -> &History<TimelineSnapshot> {
        &self.history
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut Playback {
        &mut self.playback
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    pub fn memo(&self) -> &LayerMemo {
        &self.memo
    }

    /// Timeline length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.timeline.duration().to_seconds_f64()
    }

    /// Bump the revision, sync playback, and snapshot into history (a no-op
    /// while restoring).
    fn changed(&mut self) {
        self.revision += 1;
        self.playback.set_duration(self.duration_secs());
        if !self.history.commit(self.timeline.clone()) {
            debug!(revision = self.revision, "Restored state not recorded");
        }
    }

    fn record_if(&mut self, changed: bool) -> bool {
        if changed {
            self.changed();
        }
        changed
    }

    pub fn add_track(&mut self, kind: TrackKind, name: impl Into<String>) -> TrackId {
        let id = self.timeline.add_track(kind, name);
        self.changed();
        id
    }

    pub fn remove_track(&mut self, id: TrackId) -> bool {
        let removed = self.timeline.remove_track(id).is_some();
        self.record_if(removed)
    }

    pub fn set_track_muted(&mut self, id: TrackId, muted: bool) -> bool {
        let changed = self.timeline.set_track_muted(id, muted);
        self.record_if(changed)
    }

    pub fn set_track_volume(&mut self, id: TrackId, volume: f32) -> bool {
        let changed = self.timeline.set_track_volume(id, volume);
        self.record_if(changed)
    }

    pub fn add_clip(&mut self, track: TrackId, clip: Clip) -> bool {
        let changed = self.timeline.add_clip(track, clip);
        self.record_if(changed)
    }

    pub fn split_clip(&mut self, clip: ClipId, time: RationalTime) -> Option<ClipId> {
        let right = self.timeline.split_clip(clip, time);
        self.record_if(right.is_some());
        right
    }

    pub fn remove_clip(&mut self, clip: ClipId) -> bool {
        let removed = self.timeline.remove_clip(clip).is_some();
        self.record_if(removed)
    }

    pub fn move_clip(&mut self, track: TrackId, from: usize, to: usize) -> bool {
        let changed = self.timeline.move_clip(track, from, to);
        self.record_if(changed)
    }

    pub fn update_clip(&mut self, clip: ClipId, patch: ClipPatch) -> bool {
        let changed = self.timeline.update_clip(clip, patch);
        self.record_if(changed)
    }

    /// Change the selection. Selection alone is not an undoable edit.
    pub fn select(&mut self, clip: Option<ClipId>) -> bool {
        self.timeline.select(clip)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    fn restore(&mut self, snapshot: TimelineSnapshot) {
        self.timeline = snapshot;
        self.changed();
        self.history.end_restore();
    }

    /// Visible layers at `time`, memoized on (revision, time).
    pub fn layers_at(&mut self, time: RationalTime) -> &[Layer] {
        self.memo.resolve(self.revision, self.timeline.tracks(), time)
    }

    /// Cached texture for `key` at `width`×`height`.
    pub fn texture<F>(&mut self, key: &str, generator: F, width: u32, height: u32) -> SharedBitmap
    where
        F: FnOnce(u32, u32) -> Bitmap,
    {
        self.textures.get(key, generator, width, height)
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: i64) -> RationalTime {
        RationalTime::from_secs(s)
    }

    fn session_with_clip() -> (EditorSession, TrackId, ClipId) {
        let mut session = EditorSession::default();
        let track = session.add_track(TrackKind::Video, "V1");
        let clip = Clip::video("a.mp4", secs(4));
        let id = clip.id;
        assert!(session.add_clip(track, clip));
        (session, track, id)
    }

    #[test]
    fn test_edits_are_recorded() {
        let (session, _, _) = session_with_clip();
        // empty + add_track + add_clip
        assert_eq!(session.history().len(), 3);
        assert_eq!(session.revision(), 2);
        assert_eq!(session.duration_secs(), 4.0);
        assert_eq!(session.playback().duration(), 4.0);
    }

    #[test]
    fn test_rejected_edit_not_recorded() {
        let (mut session, track, id) = session_with_clip();
        let before = session.history().len();
        assert!(session.split_clip(id, secs(4)).is_none());
        assert!(!session.move_clip(track, 0, 7));
        assert!(!session.add_clip(track, Clip::text("wrong kind", secs(1))));
        assert_eq!(session.history().len(), before);
    }

    #[test]
    fn test_undo_redo_restores_state() {
        let (mut session, _, id) = session_with_clip();
        let before = session.timeline().clone();
        session.split_clip(id, secs(1)).unwrap();
        let after = session.timeline().clone();

        assert!(session.undo());
        assert_eq!(session.timeline(), &before);
        assert!(session.redo());
        assert_eq!(session.timeline(), &after);
        assert!(!session.redo());
    }

    #[test]
    fn test_undo_is_not_recorded() {
        let (mut session, _, id) = session_with_clip();
        session.remove_clip(id);
        let len = session.history().len();
        session.undo();
        assert_eq!(session.history().len(), len);
        assert!(session.can_redo());
    }

    #[test]
    fn test_edit_after_undo_drops_redo() {
        let (mut session, track, _) = session_with_clip();
        session.undo();
        assert!(session.can_redo());
        session.add_clip(track, Clip::video("b.mp4", secs(2)));
        assert!(!session.can_redo());
    }

    #[test]
    fn test_layers_memoized_per_revision() {
        let (mut session, _, id) = session_with_clip();
        assert_eq!(session.layers_at(secs(1)).len(), 1);
        assert_eq!(session.layers_at(secs(1)).len(), 1);
        assert_eq!(session.memo().stats(), (1, 1));

        session.remove_clip(id);
        assert!(session.layers_at(secs(1)).is_empty());
        assert_eq!(session.memo().stats(), (1, 2));
    }

    #[test]
    fn test_selection_not_undoable() {
        let (mut session, _, id) = session_with_clip();
        let len = session.history().len();
        assert!(session.select(Some(id)));
        assert_eq!(session.history().len(), len);
    }

    #[test]
    fn test_texture_cache_capacity_from_config() {
        let mut session = EditorSession::new(SessionConfig {
            texture_capacity: 2,
            ..SessionConfig::default()
        });
        for key in ["a", "b", "c"] {
            session.texture(key, |w, h| Bitmap::filled(w, h, [0, 0, 0, 255]), 2, 2);
        }
        assert_eq!(session.textures().len(), 2);
        assert_eq!(session.textures().stats().evictions, 1);
    }
}
