//! Integration tests for playback driving layer resolution.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use proedit_app::EditorSession;
use proedit_core::RationalTime;
use proedit_playback::{Playback, PlaybackConfig};
use proedit_timeline::{resolve_visible_layers, Clip, Track, TrackKind, Transition};
use tokio::task::LocalSet;

// ── Helpers ────────────────────────────────────────────────────

fn fade_tracks() -> Rc<Vec<Track>> {
    let mut track = Track::new(TrackKind::Video, "V1");
    track.add_clip(Clip::video("a.mp4", RationalTime::from_secs(1)));
    track.add_clip(
        Clip::video("b.mp4", RationalTime::from_secs(1))
            .with_transition(Transition::fade(RationalTime::from_millis(500))),
    );
    Rc::new(vec![track])
}

// ── Render consumer ────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn every_frame_resolves_layers_until_end() {
    LocalSet::new()
        .run_until(async {
            let tracks = fade_tracks();
            let layer_counts = Rc::new(RefCell::new(Vec::new()));

            let mut playback = Playback::new(PlaybackConfig::default(), 2.0);
            let (t, counts) = (Rc::clone(&tracks), Rc::clone(&layer_counts));
            playback.on_frame(move |time, playing| {
                let layers = resolve_visible_layers(&t, RationalTime::from_seconds_f64(time));
                counts.borrow_mut().push((time, playing, layers.len()));
            });

            assert!(playback.play());
            tokio::time::sleep(Duration::from_secs(3)).await;

            let counts = layer_counts.borrow();
            assert!(!playback.is_playing());
            // Two layers while b fades in over [1.0, 1.5).
            assert!(counts
                .iter()
                .filter(|(t, _, _)| (1.05..1.45).contains(t))
                .all(|(_, _, n)| *n == 2));
            assert!(counts
                .iter()
                .filter(|(t, _, _)| *t < 0.95 || (1.55..2.0).contains(t))
                .all(|(_, _, n)| *n == 1));
            assert_eq!(counts.last().map(|c| (c.0, c.1, c.2)), Some((2.0, false, 0)));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn session_playback_tracks_timeline_duration() {
    LocalSet::new()
        .run_until(async {
            let mut session = EditorSession::default();
            let video = session.add_track(TrackKind::Video, "V1");
            session.add_clip(video, Clip::video("a.mp4", RationalTime::from_millis(300)));

            let published = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&published);
            let playback = session.playback_mut();
            playback.on_publish(move |t| sink.borrow_mut().push(t));
            assert!(playback.play());
            tokio::time::sleep(Duration::from_secs(1)).await;

            assert!(!session.playback().is_playing());
            assert_eq!(session.playback().time(), 0.3);
            let published = published.borrow();
            assert_eq!(published.last(), Some(&0.3));
            // ~30 Hz over 300 ms, plus the first frame and the end.
            assert!((9..=13).contains(&published.len()), "{}", published.len());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn seek_then_resume_continues_from_seek_point() {
    LocalSet::new()
        .run_until(async {
            let mut playback = Playback::new(PlaybackConfig::default(), 10.0);
            playback.seek(4.0);
            playback.play();
            tokio::time::sleep(Duration::from_millis(500)).await;
            playback.stop();
            assert!((playback.time() - 4.5).abs() < 0.02);
        })
        .await;
}
