//! The editable timeline: tracks plus selection.
//!
//! Clip-level operations locate the owning track by clip id and delegate to
//! [`Track`]. Every operation reports whether it changed anything, so the
//! session only records history for real edits.

use proedit_core::RationalTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clip::{Clip, ClipId, ClipPatch};
use crate::track::{Track, TrackId, TrackKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    tracks: Vec<Track>,
    selection: Option<ClipId>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks in stacking order (first = bottom).
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    fn track_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    fn track_of_clip_mut(&mut self, clip: ClipId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.contains_clip(clip))
    }

    /// Total duration: the longest track.
    pub fn duration(&self) -> RationalTime {
        self.tracks
            .iter()
            .map(|t| t.duration())
            .max()
            .unwrap_or(RationalTime::ZERO)
    }

    pub fn selection(&self) -> Option<ClipId> {
        self.selection
    }

    /// Select a clip. Unknown ids are rejected.
    pub fn select(&mut self, clip: Option<ClipId>) -> bool {
        if let Some(id) = clip {
            if self.find_clip(id).is_none() {
                return false;
            }
        }
        let changed = self.selection != clip;
        self.selection = clip;
        changed
    }

    /// Find a clip and its track.
    pub fn find_clip(&self, id: ClipId) -> Option<(&Track, &Clip)> {
        self.tracks
            .iter()
            .find_map(|t| t.find_clip(id).map(|(_, c)| (t, c)))
    }

    /// Add an empty track on top of the stack.
    pub fn add_track(&mut self, kind: TrackKind, name: impl Into<String>) -> TrackId {
        let track = Track::new(kind, name);
        let id = track.id;
        self.tracks.push(track);
        id
    }

    /// Remove a track, clearing the selection if it pointed into it.
    pub fn remove_track(&mut self, id: TrackId) -> Option<Track> {
        let index = self.tracks.iter().position(|t| t.id == id)?;
        let removed = self.tracks.remove(index);
        if self.selection.is_some_and(|sel| removed.contains_clip(sel)) {
            self.selection = None;
        }
        Some(removed)
    }

    pub fn set_track_muted(&mut self, id: TrackId, muted: bool) -> bool {
        match self.track_mut(id) {
            Some(track) if track.muted != muted => {
                track.muted = muted;
                true
            }
            _ => false,
        }
    }

    pub fn set_track_volume(&mut self, id: TrackId, volume: f32) -> bool {
        if !volume.is_finite() || volume < 0.0 {
            return false;
        }
        match self.track_mut(id) {
            Some(track) if track.volume != volume => {
                track.volume = volume;
                true
            }
            _ => false,
        }
    }

    /// Append a clip to a track.
    pub fn add_clip(&mut self, track: TrackId, clip: Clip) -> bool {
        self.track_mut(track).is_some_and(|t| t.add_clip(clip))
    }

    /// Split a clip at absolute time. Returns the new right-hand clip id.
    pub fn split_clip(&mut self, clip: ClipId, time: RationalTime) -> Option<ClipId> {
        self.track_of_clip_mut(clip)?.split_clip(clip, time)
    }

    /// Remove a clip, clearing the selection if it pointed at it.
    pub fn remove_clip(&mut self, clip: ClipId) -> Option<Clip> {
        let removed = self.track_of_clip_mut(clip)?.remove_clip(clip)?;
        if self.selection == Some(clip) {
            debug!(clip = %clip, "Selection cleared by removal");
            self.selection = None;
        }
        Some(removed)
    }

    /// Reorder clips within a track.
    pub fn move_clip(&mut self, track: TrackId, from: usize, to: usize) -> bool {
        self.track_mut(track).is_some_and(|t| t.move_clip(from, to))
    }

    pub fn update_clip(&mut self, clip: ClipId, patch: ClipPatch) -> bool {
        self.track_of_clip_mut(clip)
            .is_some_and(|t| t.update_clip(clip, patch))
    }

    /// First clip on `track` active at `time`.
    pub fn clip_at_time(&self, track: TrackId, time: RationalTime) -> Option<&Clip> {
        self.track(track)?.clip_at_time(time)
    }
}
