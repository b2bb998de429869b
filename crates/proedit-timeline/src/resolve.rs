//! Visible-layer resolution: (tracks, time) → ordered layers.
//!
//! The resolver is a pure function. For each unmuted visual track it emits
//! the clip active at `time` (possibly mid entry-transition) and, while the
//! following clip transitions in, an outgoing copy of its predecessor.
//! Callers memoize on (tracks, time).

use proedit_core::RationalTime;
use serde::Serialize;
use smallvec::SmallVec;

use crate::clip::Clip;
use crate::track::{Track, TrackId};
use crate::transition::{Layering, Transition};

/// Whether a layer is the clip at the playhead or a predecessor kept on
/// screen for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerRole {
    Current,
    Outgoing,
}

/// A time-resolved rendering instruction for one clip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub track_id: TrackId,
    pub clip: Clip,
    pub role: LayerRole,
    /// Transition governing this layer and its progress in `[0, 1)`.
    pub transition: Option<Transition>,
    pub transition_progress: Option<f64>,
    pub z_index: i32,
}

impl Layer {
    pub fn is_current(&self) -> bool {
        self.role == LayerRole::Current
    }

    pub fn is_outgoing(&self) -> bool {
        self.role == LayerRole::Outgoing
    }
}

/// Resolve the layers visible at `time`, sorted ascending by z-index
/// (stable: track order, then clip order, within equal z).
pub fn resolve_visible_layers(tracks: &[Track], time: RationalTime) -> Vec<Layer> {
    let mut layers: Vec<Layer> = tracks
        .iter()
        .filter(|t| !t.muted && t.kind.is_visual())
        .flat_map(|t| resolve_track(t, time))
        .collect();
    layers.sort_by_key(|l| l.z_index);
    layers
}

fn resolve_track(track: &Track, time: RationalTime) -> SmallVec<[Layer; 2]> {
    let mut out = SmallVec::new();
    let base_z = track.kind.base_z_index();
    let clips = track.clips();

    for (i, clip) in clips.iter().enumerate() {
        if clip.is_active_at(time) {
            let entry = if i > 0 { clip.entry_progress_at(time) } else { None };
            out.push(Layer {
                track_id: track.id,
                clip: clip.clone(),
                role: LayerRole::Current,
                transition: entry.map(|(t, _)| t.clone()),
                transition_progress: entry.map(|(_, p)| p),
                z_index: base_z,
            });
        }

        let incoming = clips.get(i + 1).and_then(|next| next.entry_progress_at(time));
        if let Some((transition, progress)) = incoming {
            let z_index = match transition.kind.layering() {
                Layering::Reverse => base_z + 1,
                Layering::Standard => base_z - 1,
            };
            out.push(Layer {
                track_id: track.id,
                clip: clip.clone(),
                role: LayerRole::Outgoing,
                transition: Some(transition.clone()),
                transition_progress: Some(progress),
                z_index,
            });
        }
    }
    out
}
