//! Clip types for the timeline.

use proedit_core::{RationalTime, TimeRange};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::track::TrackKind;
use crate::transition::Transition;

/// Unique clip identifier.
pub type ClipId = Uuid;

/// Gain and fade envelope of an audio-bearing clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioParams {
    /// Linear gain, 1.0 = 100 %.
    pub volume: f32,
    /// Fade-in length in seconds (0 = none).
    pub fade_in: f64,
    /// Fade-out length in seconds (0 = none).
    pub fade_out: f64,
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            volume: 1.0,
            fade_in: 0.0,
            fade_out: 0.0,
        }
    }
}

/// Kind-specific payload of a clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClipContent {
    Video {
        source_id: String,
        #[serde(default)]
        audio: AudioParams,
    },
    Image {
        source_id: String,
    },
    Text {
        text: String,
        font_size: f32,
        color: [u8; 4],
    },
    Sticker {
        source_id: String,
    },
    Audio {
        source_id: String,
        #[serde(default)]
        audio: AudioParams,
    },
}

impl ClipContent {
    /// The track kind this content belongs on.
    pub fn kind(&self) -> TrackKind {
        match self {
            Self::Video { .. } => TrackKind::Video,
            Self::Image { .. } => TrackKind::Image,
            Self::Text { .. } => TrackKind::Text,
            Self::Sticker { .. } => TrackKind::Sticker,
            Self::Audio { .. } => TrackKind::Audio,
        }
    }

    /// Media source, if this kind references one.
    pub fn source_id(&self) -> Option<&str> {
        match self {
            Self::Video { source_id, .. }
            | Self::Image { source_id }
            | Self::Sticker { source_id }
            | Self::Audio { source_id, .. } => Some(source_id),
            Self::Text { .. } => None,
        }
    }

    /// Audio envelope for audio-bearing kinds.
    pub fn audio(&self) -> Option<&AudioParams> {
        match self {
            Self::Video { audio, .. } | Self::Audio { audio, .. } => Some(audio),
            _ => None,
        }
    }

    pub fn audio_mut(&mut self) -> Option<&mut AudioParams> {
        match self {
            Self::Video { audio, .. } | Self::Audio { audio, .. } => Some(audio),
            _ => None,
        }
    }
}

/// A clip on the timeline.
///
/// `start_time` is owned by the track: it is recalculated after every
/// track operation so clips stay contiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: ClipId,
    pub start_time: RationalTime,
    pub duration: RationalTime,
    /// Read position inside the source media.
    pub source_offset: RationalTime,
    /// Entry transition from the previous clip on the same track.
    pub transition: Option<Transition>,
    pub muted: bool,
    pub content: ClipContent,
}

impl Clip {
    /// Create a new clip with a fresh id. Start time is assigned by the track.
    pub fn new(content: ClipContent, duration: RationalTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_time: RationalTime::ZERO,
            duration,
            source_offset: RationalTime::ZERO,
            transition: None,
            muted: false,
            content,
        }
    }

    pub fn video(source_id: impl Into<String>, duration: RationalTime) -> Self {
        Self::new(
            ClipContent::Video {
                source_id: source_id.into(),
                audio: AudioParams::default(),
            },
            duration,
        )
    }

    pub fn image(source_id: impl Into<String>, duration: RationalTime) -> Self {
        Self::new(
            ClipContent::Image {
                source_id: source_id.into(),
            },
            duration,
        )
    }

    pub fn text(text: impl Into<String>, duration: RationalTime) -> Self {
        Self::new(
            ClipContent::Text {
                text: text.into(),
                font_size: 48.0,
                color: [255, 255, 255, 255],
            },
            duration,
        )
    }

    pub fn sticker(source_id: impl Into<String>, duration: RationalTime) -> Self {
        Self::new(
            ClipContent::Sticker {
                source_id: source_id.into(),
            },
            duration,
        )
    }

    pub fn audio(source_id: impl Into<String>, duration: RationalTime) -> Self {
        Self::new(
            ClipContent::Audio {
                source_id: source_id.into(),
                audio: AudioParams::default(),
            },
            duration,
        )
    }

    /// Builder: set the entry transition.
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = Some(transition);
        self
    }

    /// Builder: set the source read offset.
    pub fn with_source_offset(mut self, offset: RationalTime) -> Self {
        self.source_offset = offset;
        self
    }

    /// Builder: set the audio envelope (ignored for kinds without audio).
    pub fn with_audio(mut self, params: AudioParams) -> Self {
        if let Some(audio) = self.content.audio_mut() {
            *audio = params;
        }
        self
    }

    pub fn kind(&self) -> TrackKind {
        self.content.kind()
    }

    /// End time on the timeline (exclusive).
    #[inline]
    pub fn end_time(&self) -> RationalTime {
        self.start_time + self.duration
    }

    /// Timeline range occupied by this clip.
    #[inline]
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.duration)
    }

    /// Range read from the source media.
    pub fn source_range(&self) -> TimeRange {
        TimeRange::new(self.source_offset, self.duration)
    }

    /// Whether the clip is visible/audible at `time` (`start <= t < end`).
    #[inline]
    pub fn is_active_at(&self, time: RationalTime) -> bool {
        self.range().contains(time)
    }

    /// Entry transition and its progress at `time`.
    ///
    /// The window `[start, start + transition.duration)` is cut off at the
    /// clip's end: a transition longer than its clip ends with the clip.
    pub fn entry_progress_at(&self, time: RationalTime) -> Option<(&Transition, f64)> {
        let transition = self.transition.as_ref()?;
        if time >= self.end_time() {
            return None;
        }
        transition
            .progress_at(self.start_time, time)
            .map(|progress| (transition, progress))
    }
}

/// Partial update merged by `Track::update_clip`.
///
/// Fields that do not apply to the clip's kind are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipPatch {
    pub duration: Option<RationalTime>,
    pub source_offset: Option<RationalTime>,
    /// `Some(None)` clears the transition.
    pub transition: Option<Option<Transition>>,
    pub muted: Option<bool>,
    pub volume: Option<f32>,
    pub fade_in: Option<f64>,
    pub fade_out: Option<f64>,
    pub text: Option<String>,
    pub source_id: Option<String>,
}

impl ClipPatch {
    /// A patch is rejected as a whole if any field is out of range.
    pub fn is_valid(&self) -> bool {
        self.duration.map_or(true, |d| d.is_positive())
            && self.source_offset.map_or(true, |o| !o.is_negative())
            && self.volume.map_or(true, |v| v.is_finite() && v >= 0.0)
            && self.fade_in.map_or(true, |f| f.is_finite() && f >= 0.0)
            && self.fade_out.map_or(true, |f| f.is_finite() && f >= 0.0)
    }

    /// Merge into a clip. Caller checks `is_valid` first.
    pub(crate) fn apply(self, clip: &mut Clip) {
        if let Some(duration) = self.duration {
            clip.duration = duration;
        }
        if let Some(offset) = self.source_offset {
            clip.source_offset = offset;
        }
        if let Some(transition) = self.transition {
            clip.transition = transition;
        }
        if let Some(muted) = self.muted {
            clip.muted = muted;
        }
        if let Some(audio) = clip.content.audio_mut() {
            if let Some(volume) = self.volume {
                audio.volume = volume;
            }
            if let Some(fade_in) = self.fade_in {
                audio.fade_in = fade_in;
            }
            if let Some(fade_out) = self.fade_out {
                audio.fade_out = fade_out;
            }
        }
        match &mut clip.content {
            ClipContent::Text { text, .. } => {
                if let Some(new_text) = self.text {
                    *text = new_text;
                }
            }
            ClipContent::Video { source_id, .. }
            | ClipContent::Image { source_id }
            | ClipContent::Sticker { source_id }
            | ClipContent::Audio { source_id, .. } => {
                if let Some(new_source) = self.source_id {
                    *source_id = new_source;
                }
            }
        }
    }
}
