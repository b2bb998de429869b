//! Track types and the contiguous clip operations.

use proedit_core::RationalTime;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::clip::{Clip, ClipId, ClipPatch};

/// Unique track identifier.
pub type TrackId = Uuid;

/// Kind of track. Tracks are kind-homogeneous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Image,
    Text,
    Sticker,
    Audio,
}

impl TrackKind {
    /// Whether clips of this kind produce visual layers.
    pub fn is_visual(self) -> bool {
        !matches!(self, Self::Audio)
    }

    /// Whether clips of this kind carry an audio component.
    pub fn carries_audio(self) -> bool {
        matches!(self, Self::Video | Self::Audio)
    }

    /// Base stacking order: text above stickers above video and images.
    pub fn base_z_index(self) -> i32 {
        match self {
            Self::Video | Self::Image => 10,
            Self::Sticker => 20,
            Self::Text => 30,
            Self::Audio => 0,
        }
    }
}

/// An ordered lane of contiguous clips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    pub kind: TrackKind,
    pub muted: bool,
    /// Linear track gain, 1.0 = 100 %.
    pub volume: f32,
    clips: Vec<Clip>,
}

impl Track {
    /// Create an empty track.
    pub fn new(kind: TrackKind, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            muted: false,
            volume: 1.0,
            clips: Vec::new(),
        }
    }

    /// Clips in timeline order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Total duration: the sum of clip durations.
    pub fn duration(&self) -> RationalTime {
        self.clips.iter().map(|c| c.duration).sum()
    }

    pub fn find_clip(&self, id: ClipId) -> Option<(usize, &Clip)> {
        self.clips.iter().enumerate().find(|(_, c)| c.id == id)
    }

    pub fn contains_clip(&self, id: ClipId) -> bool {
        self.clips.iter().any(|c| c.id == id)
    }

    /// Append a clip. Rejected if its kind does not match the track or its
    /// duration is not positive.
    pub fn add_clip(&mut self, clip: Clip) -> bool {
        if clip.kind() != self.kind || !clip.duration.is_positive() {
            debug!(track = %self.id, clip = %clip.id, "add_clip rejected");
            return false;
        }
        self.clips.push(clip);
        self.recalculate();
        true
    }

    /// Split the clip at absolute timeline time `time`.
    ///
    /// No-op unless `time` lies strictly inside the clip. Returns the id of
    /// the new right-hand clip.
    pub fn split_clip(&mut self, id: ClipId, time: RationalTime) -> Option<ClipId> {
        let index = self.clips.iter().position(|c| c.id == id)?;
        let original = &self.clips[index];
        if !original.range().contains_strictly(time) {
            return None;
        }

        let delta = time - original.start_time;
        let mut right = original.clone();
        right.id = Uuid::new_v4();
        right.start_time = time;
        right.duration = original.duration - delta;
        right.source_offset = original.source_offset + delta;
        right.transition = None;
        if let Some(audio) = right.content.audio_mut() {
            audio.fade_in = 0.0;
        }

        let left = &mut self.clips[index];
        left.duration = delta;
        if let Some(audio) = left.content.audio_mut() {
            audio.fade_out = 0.0;
        }

        let right_id = right.id;
        self.clips.insert(index + 1, right);
        self.recalculate();
        Some(right_id)
    }

    /// Remove a clip by id.
    pub fn remove_clip(&mut self, id: ClipId) -> Option<Clip> {
        let index = self.clips.iter().position(|c| c.id == id)?;
        let removed = self.clips.remove(index);
        self.recalculate();
        Some(removed)
    }

    /// Move the clip at `from` to position `to`.
    pub fn move_clip(&mut self, from: usize, to: usize) -> bool {
        if from >= self.clips.len() || to >= self.clips.len() || from == to {
            return false;
        }
        let clip = self.clips.remove(from);
        self.clips.insert(to, clip);
        self.recalculate();
        true
    }

    /// Merge a patch into a clip.
    pub fn update_clip(&mut self, id: ClipId, patch: ClipPatch) -> bool {
        if !patch.is_valid() {
            return false;
        }
        let Some(clip) = self.clips.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        patch.apply(clip);
        self.recalculate();
        true
    }

    /// First clip with `start <= time < end`.
    pub fn clip_at_time(&self, time: RationalTime) -> Option<&Clip> {
        self.clips.iter().find(|c| c.is_active_at(time))
    }

    /// Whether every clip starts exactly where its predecessor ends.
    pub fn is_contiguous(&self) -> bool {
        let mut pos = RationalTime::ZERO;
        for clip in &self.clips {
            if clip.start_time != pos {
                return false;
            }
            pos = clip.end_time();
        }
        true
    }

    /// Reassign start times so clips are packed from zero.
    fn recalculate(&mut self) {
        let mut pos = RationalTime::ZERO;
        for clip in &mut self.clips {
            clip.start_time = pos;
            pos += clip.duration;
        }
    }
}
