//! Transition kinds between adjacent clips on a track.

use proedit_core::RationalTime;
use serde::{Deserialize, Serialize};

/// How the outgoing clip is stacked against the incoming one while a
/// transition runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layering {
    /// Incoming clip draws over the outgoing one (dissolves, fades, slides in).
    Standard,
    /// Outgoing clip draws over the incoming one and is revealed away
    /// (wipes, zoom-outs, iris closes).
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Left,
    Right,
    Up,
    Down,
}

/// Built-in transition kinds, plus custom ones identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TransitionKind {
    Fade,
    CrossDissolve,
    DipToBlack,
    DipToWhite,
    Wipe { direction: Direction },
    Slide { direction: Direction },
    ZoomIn,
    ZoomOut,
    Iris,
    Custom { name: String },
}

/// Name suffixes that mark a custom transition as reverse-layering.
const REVERSE_SUFFIXES: &[&str] = &["-reverse", "_reverse", "Reverse"];

impl TransitionKind {
    /// Stacking order declared by this kind.
    ///
    /// Custom kinds carry no declaration, so their name decides.
    pub fn layering(&self) -> Layering {
        match self {
            Self::Wipe { .. } | Self::ZoomOut | Self::Iris => Layering::Reverse,
            Self::Fade
            | Self::CrossDissolve
            | Self::DipToBlack
            | Self::DipToWhite
            | Self::Slide { .. }
            | Self::ZoomIn => Layering::Standard,
            Self::Custom { name } => {
                if REVERSE_SUFFIXES.iter().any(|s| name.ends_with(s)) {
                    Layering::Reverse
                } else {
                    Layering::Standard
                }
            }
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Self::Fade => "Fade",
            Self::CrossDissolve => "Cross Dissolve",
            Self::DipToBlack => "Dip to Black",
            Self::DipToWhite => "Dip to White",
            Self::Wipe { .. } => "Wipe",
            Self::Slide { .. } => "Slide",
            Self::ZoomIn => "Zoom In",
            Self::ZoomOut => "Zoom Out",
            Self::Iris => "Iris",
            Self::Custom { name } => name,
        }
    }
}

/// A timed blend into a clip from its predecessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub kind: TransitionKind,
    pub duration: RationalTime,
}

impl Transition {
    pub fn new(kind: TransitionKind, duration: RationalTime) -> Self {
        Self { kind, duration }
    }

    pub fn fade(duration: RationalTime) -> Self {
        Self::new(TransitionKind::Fade, duration)
    }

    /// Progress through the window `[start, start + duration)`, or `None`
    /// when `time` is outside it or the duration is not positive.
    pub fn progress_at(&self, start: RationalTime, time: RationalTime) -> Option<f64> {
        if !self.duration.is_positive() || time < start || time >= start + self.duration {
            return None;
        }
        Some((time - start).ratio(self.duration))
    }
}
