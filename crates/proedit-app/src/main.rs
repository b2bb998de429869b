//! ProEdit - headless timeline driver
//!
//! Builds a timeline from the audio files given on the command line, prints
//! the layers visible at a few sample times, optionally previews playback,
//! and renders the audio mix.
//!
//! Usage: proedit [--preview] <audio files...>

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use proedit_app::{export_audio, EditorSession, SessionConfig};
use proedit_audio::{AudioDecode, ByteFetcher};
use proedit_core::RationalTime;
use proedit_media::{FileFetcher, SymphoniaDecoder};
use proedit_timeline::{Clip, TrackKind, Transition};
use tokio::task::LocalSet;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const PREVIEW: Duration = Duration::from_millis(500);

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut preview = false;
    let mut files = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--preview" => preview = true,
            _ => files.push(PathBuf::from(arg)),
        }
    }
    if files.is_empty() {
        bail!("usage: proedit [--preview] <audio files...>");
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;
    LocalSet::new().block_on(&runtime, run(files, preview))
}

async fn run(files: Vec<PathBuf>, preview: bool) -> Result<()> {
    info!("ProEdit starting...");
    let fetcher = Arc::new(FileFetcher::new("."));
    let decoder = Arc::new(SymphoniaDecoder);
    let mut session = EditorSession::new(SessionConfig::default());

    let audio = session.add_track(TrackKind::Audio, "Music");
    for path in &files {
        let source_id = path.to_string_lossy().into_owned();
        let secs = match probe_duration(&*fetcher, &*decoder, &source_id).await {
            Ok(secs) if secs > 0.0 => secs,
            Ok(_) => {
                warn!(source = %source_id, "Empty audio, skipping");
                continue;
            }
            Err(e) => {
                warn!(source = %source_id, error = %e, "Unreadable audio, skipping");
                continue;
            }
        };
        session.add_clip(audio, Clip::audio(source_id, RationalTime::from_seconds_f64(secs)));
    }
    if session.timeline().duration().is_zero() {
        bail!("none of the inputs could be decoded");
    }

    add_captions(&mut session, &files);
    print_layers(&mut session)?;

    if preview {
        preview_playback(&mut session).await;
    }

    let mix = export_audio(&session, fetcher, decoder).await?;
    info!(
        frames = mix.frames(),
        sample_rate = mix.sample_rate(),
        seconds = mix.duration_secs(),
        peak = mix.peak(),
        "Mix rendered"
    );
    println!(
        "mix: {} frames @ {} Hz, peak {:.3}",
        mix.frames(),
        mix.sample_rate(),
        mix.peak()
    );
    Ok(())
}

async fn probe_duration<F, D>(fetcher: &F, decoder: &D, source_id: &str) -> proedit_core::Result<f64>
where
    F: ByteFetcher,
    D: AudioDecode,
{
    let bytes = fetcher.fetch(source_id).await?;
    Ok(decoder.decode(bytes).await?.duration_secs())
}

/// One caption per input, cross-faded, spanning the music track.
fn add_captions(session: &mut EditorSession, files: &[PathBuf]) {
    let total = session.timeline().duration();
    let count = files.len() as i64;
    let text = session.add_track(TrackKind::Text, "Captions");
    for (i, path) in files.iter().enumerate() {
        let name = path
            .file_name()
            .map_or_else(|| path.to_string_lossy(), |n| n.to_string_lossy())
            .into_owned();
        let mut clip = Clip::text(name, total / count);
        if i > 0 {
            clip = clip.with_transition(Transition::fade(RationalTime::from_millis(500)));
        }
        session.add_clip(text, clip);
    }
}

fn print_layers(session: &mut EditorSession) -> Result<()> {
    let total = session.timeline().duration();
    for quarter in 0..4 {
        let time = total * quarter / 4;
        let layers = session.layers_at(time);
        println!("t={:.3}s {}", time.to_seconds_f64(), serde_json::to_string(layers)?);
    }
    Ok(())
}

async fn preview_playback(session: &mut EditorSession) {
    let playback = session.playback_mut();
    playback.on_publish(|time| info!(time, "Playhead"));
    playback.play();
    tokio::time::sleep(PREVIEW).await;
    playback.stop();
    info!(time = playback.time(), "Preview finished");
    playback.dispose();
}
