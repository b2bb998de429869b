//! Integration tests for the timeline subsystem.
//!
//! Exercises the editor session end to end: edits, layer resolution and
//! undo/redo across proedit-timeline and proedit-app.

use proedit_app::EditorSession;
use proedit_core::RationalTime;
use proedit_timeline::{
    resolve_visible_layers, Clip, ClipPatch, Direction, Track, TrackKind, Transition,
    TransitionKind,
};
use proptest::prelude::*;

// ── Helpers ────────────────────────────────────────────────────

fn secs(s: i64) -> RationalTime {
    RationalTime::from_secs(s)
}

fn ms(m: i64) -> RationalTime {
    RationalTime::from_millis(m)
}

fn ab_fade_track() -> Track {
    let mut track = Track::new(TrackKind::Video, "V1");
    track.add_clip(Clip::video("a.mp4", secs(5)));
    track.add_clip(Clip::video("b.mp4", secs(3)).with_transition(Transition::fade(secs(1))));
    track
}

fn assert_contiguous(track: &Track) {
    let mut expected = RationalTime::ZERO;
    for clip in track.clips() {
        assert_eq!(clip.start_time, expected);
        expected += clip.duration;
    }
    assert_eq!(track.duration(), expected);
}

// ── Layer resolution ───────────────────────────────────────────

#[test]
fn fade_midpoint_outgoing_and_current() {
    let track = ab_fade_track();
    let layers = resolve_visible_layers(std::slice::from_ref(&track), ms(5500));

    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0].clip.id, track.clips()[0].id);
    assert!(layers[0].is_outgoing());
    assert_eq!(layers[0].transition_progress, Some(0.5));
    assert_eq!(layers[1].clip.id, track.clips()[1].id);
    assert!(layers[1].is_current());
    assert_eq!(layers[1].transition_progress, Some(0.5));
}

#[test]
fn full_stack_orders_text_over_sticker_over_video() {
    let mut session = EditorSession::default();
    let text = session.add_track(TrackKind::Text, "T1");
    let video = session.add_track(TrackKind::Video, "V1");
    let sticker = session.add_track(TrackKind::Sticker, "S1");
    session.add_clip(text, Clip::text("title", secs(4)));
    session.add_clip(video, Clip::video("a.mp4", secs(4)));
    session.add_clip(sticker, Clip::sticker("star", secs(4)));

    let kinds: Vec<_> = session
        .layers_at(secs(2))
        .iter()
        .map(|l| l.clip.kind())
        .collect();
    assert_eq!(kinds, [TrackKind::Video, TrackKind::Sticker, TrackKind::Text]);
}

#[test]
fn reverse_custom_transition_lifts_outgoing_clip() {
    let mut track = Track::new(TrackKind::Image, "I1");
    track.add_clip(Clip::image("a.png", secs(2)));
    track.add_clip(Clip::image("b.png", secs(2)).with_transition(Transition::new(
        TransitionKind::Custom {
            name: "page-curl-reverse".into(),
        },
        secs(1),
    )));
    let layers = resolve_visible_layers(&[track], ms(2500));
    assert!(layers[1].is_outgoing());
    assert!(layers[1].z_index > layers[0].z_index);
}

#[test]
fn muting_track_hides_layers() {
    let mut session = EditorSession::default();
    let video = session.add_track(TrackKind::Video, "V1");
    session.add_clip(video, Clip::video("a.mp4", secs(4)));
    assert_eq!(session.layers_at(secs(1)).len(), 1);
    assert!(session.set_track_muted(video, true));
    assert!(session.layers_at(secs(1)).is_empty());
}

// ── Editing and history ────────────────────────────────────────

#[test]
fn split_partitions_source_range() {
    let mut session = EditorSession::default();
    let track = session.add_track(TrackKind::Video, "V1");
    let clip = Clip::video("a.mp4", secs(6)).with_source_offset(secs(10));
    let id = clip.id;
    session.add_clip(track, clip);

    let right = session.split_clip(id, secs(2)).unwrap();
    let (_, left) = session.timeline().find_clip(id).unwrap();
    let (_, right) = session.timeline().find_clip(right).unwrap();
    assert_eq!(left.duration + right.duration, secs(6));
    assert_eq!(left.source_range().end(), right.source_offset);
    assert_eq!(right.source_offset, secs(12));
}

#[test]
fn undo_n_then_redo_n_restores() {
    let mut session = EditorSession::default();
    let track = session.add_track(TrackKind::Video, "V1");
    let clip = Clip::video("a.mp4", secs(6));
    let id = clip.id;
    session.add_clip(track, clip);
    session.split_clip(id, secs(3)).unwrap();
    session.update_clip(
        id,
        ClipPatch {
            transition: Some(Some(Transition::new(
                TransitionKind::Slide {
                    direction: Direction::Up,
                },
                ms(500),
            ))),
            ..ClipPatch::default()
        },
    );
    session.move_clip(track, 0, 1);
    let edited = session.timeline().clone();

    for _ in 0..3 {
        assert!(session.undo());
    }
    for _ in 0..3 {
        assert!(session.redo());
    }
    assert_eq!(session.timeline(), &edited);
}

#[test]
fn edit_after_undo_discards_redo() {
    let mut session = EditorSession::default();
    let track = session.add_track(TrackKind::Audio, "A1");
    session.add_clip(track, Clip::audio("a.mp3", secs(2)));
    session.add_clip(track, Clip::audio("b.mp3", secs(2)));
    session.undo();
    session.undo();
    assert!(session.can_redo());
    session.add_clip(track, Clip::audio("c.mp3", secs(1)));
    assert!(!session.can_redo());
    assert_eq!(session.timeline().duration(), secs(1));
}

// ── Contiguity under arbitrary edits ───────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Add(i64),
    Split(usize, i64),
    Remove(usize),
    Move(usize, usize),
    Resize(usize, i64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1i64..5000).prop_map(Op::Add),
        (0usize..8, 0i64..5000).prop_map(|(i, t)| Op::Split(i, t)),
        (0usize..8).prop_map(Op::Remove),
        (0usize..8, 0usize..8).prop_map(|(a, b)| Op::Move(a, b)),
        (0usize..8, -100i64..5000).prop_map(|(i, d)| Op::Resize(i, d)),
    ]
}

proptest! {
    #[test]
    fn clips_stay_contiguous(ops in prop::collection::vec(op(), 1..40)) {
        let mut session = EditorSession::default();
        let track = session.add_track(TrackKind::Audio, "A1");

        for op in ops {
            let clips = session.timeline().track(track).unwrap().clips().to_vec();
            match op {
                Op::Add(d) => {
                    session.add_clip(track, Clip::audio("x.mp3", ms(d)));
                }
                Op::Split(i, offset) => {
                    if let Some(c) = clips.get(i) {
                        session.split_clip(c.id, c.start_time + ms(offset));
                    }
                }
                Op::Remove(i) => {
                    if let Some(c) = clips.get(i) {
                        session.remove_clip(c.id);
                    }
                }
                Op::Move(a, b) => {
                    session.move_clip(track, a, b);
                }
                Op::Resize(i, d) => {
                    if let Some(c) = clips.get(i) {
                        session.update_clip(c.id, ClipPatch { duration: Some(ms(d)), ..ClipPatch::default() });
                    }
                }
            }
            assert_contiguous(session.timeline().track(track).unwrap());
        }
    }
}
