//! Integration tests for the audio export path.
//!
//! Real WAV files on disk go through `FileFetcher`, `SymphoniaDecoder` and
//! the offline mixer.

use std::path::PathBuf;
use std::sync::Arc;

use proedit_app::{export_audio, EditorSession};
use proedit_audio::{render_offline_audio, OfflineMixConfig};
use proedit_core::RationalTime;
use proedit_media::{FileFetcher, SymphoniaDecoder};
use proedit_timeline::{AudioParams, Clip, Track, TrackKind};

// ── Helpers ────────────────────────────────────────────────────

fn wav(sample_rate: u32, channels: u16, samples: &[i16]) -> Vec<u8> {
    let data_len = (samples.len() * 2) as u32;
    let block_align = channels * 2;
    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVEfmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

/// Temp directory with a quarter-amplitude mono tone at 24 kHz and a
/// half-amplitude stereo tone at 48 kHz, one second each.
struct MediaDir(PathBuf);

impl MediaDir {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("proedit-it-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let mono = vec![8192i16; 24_000];
        let stereo = vec![16384i16; 96_000];
        std::fs::write(dir.join("mono24k.wav"), wav(24_000, 1, &mono)).unwrap();
        std::fs::write(dir.join("stereo48k.wav"), wav(48_000, 2, &stereo)).unwrap();
        Self(dir)
    }

    fn fetcher(&self) -> Arc<FileFetcher> {
        Arc::new(FileFetcher::new(&self.0))
    }
}

impl Drop for MediaDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn secs(s: i64) -> RationalTime {
    RationalTime::from_secs(s)
}

fn near(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

// ── Export ─────────────────────────────────────────────────────

#[tokio::test]
async fn wav_sources_mix_at_48k() {
    let media = MediaDir::new();
    let mut session = EditorSession::default();
    let music = session.add_track(TrackKind::Audio, "Music");
    session.add_clip(music, Clip::audio("mono24k.wav", secs(1)));
    session.add_clip(music, Clip::audio("stereo48k.wav", secs(1)));

    let mix = export_audio(&session, media.fetcher(), Arc::new(SymphoniaDecoder))
        .await
        .unwrap();

    assert_eq!(mix.sample_rate(), 48_000);
    assert_eq!(mix.frames(), 96_000);
    let (left, right) = (mix.channel(0).unwrap(), mix.channel(1).unwrap());
    assert!(near(left[12_000], 0.25));
    assert!(near(right[12_000], 0.25));
    assert!(near(left[60_000], 0.5));
    assert!(near(right[60_000], 0.5));
}

#[tokio::test]
async fn missing_file_leaves_gap() {
    let media = MediaDir::new();
    let mut session = EditorSession::default();
    let music = session.add_track(TrackKind::Audio, "Music");
    session.add_clip(music, Clip::audio("nope.wav", secs(1)));
    session.add_clip(music, Clip::audio("stereo48k.wav", secs(1)));

    let mix = export_audio(&session, media.fetcher(), Arc::new(SymphoniaDecoder))
        .await
        .unwrap();
    let left = mix.channel(0).unwrap();
    assert_eq!(left[24_000], 0.0);
    assert!(near(left[72_000], 0.5));
}

#[tokio::test]
async fn overlapping_tracks_with_gain_and_fade() {
    let media = MediaDir::new();
    let mut session = EditorSession::default();
    let a = session.add_track(TrackKind::Audio, "A");
    let b = session.add_track(TrackKind::Video, "B");
    session.add_clip(
        a,
        Clip::audio("stereo48k.wav", secs(1)).with_audio(AudioParams {
            volume: 0.5,
            fade_in: 0.5,
            fade_out: 0.0,
        }),
    );
    session.add_clip(b, Clip::video("mono24k.wav", secs(1)));
    session.set_track_volume(b, 2.0);

    let mix = export_audio(&session, media.fetcher(), Arc::new(SymphoniaDecoder))
        .await
        .unwrap();
    let left = mix.channel(0).unwrap();
    // a: 0.5 * 0.5 * 0.5 (half-way through fade) ; b: 0.25 * 2
    assert!(near(left[12_000], 0.125 + 0.5));
    assert!(near(left[36_000], 0.25 + 0.5));
}

#[tokio::test]
async fn muted_timeline_renders_exact_silence() {
    let media = MediaDir::new();
    let mut track = Track::new(TrackKind::Audio, "A");
    track.add_clip(Clip::audio("stereo48k.wav", secs(1)));
    track.muted = true;

    let mix = render_offline_audio(
        &[track],
        2.5,
        media.fetcher(),
        Arc::new(SymphoniaDecoder),
        &OfflineMixConfig::default(),
    )
    .await
    .unwrap();
    assert_eq!(mix.frames(), 120_000);
    assert_eq!(mix.channel_count(), 2);
    assert!(mix.is_silent());
}
