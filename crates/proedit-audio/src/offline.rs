//! Offline export mix.
//!
//! Every unmuted, source-backed clip on an unmuted audio-capable track is
//! fetched and decoded concurrently, then mixed in timeline order into one
//! stereo buffer. A clip whose source fails to load is logged and left out;
//! only an unrepresentable output length fails the render.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use proedit_core::defaults::{MIX_CHANNELS, MIX_SAMPLE_RATE};
use proedit_core::{ProEditError, Result};
use proedit_timeline::Track;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::buffer::AudioBuffer;
use crate::envelope::GainEnvelope;
use crate::mixer::{mix_into, ScheduledSource};
use crate::source::{AudioDecode, ByteFetcher, DecodedAudio};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineMixConfig {
    pub sample_rate: u32,
    /// Upper bound on a single source fetch. `None` waits indefinitely.
    pub fetch_timeout: Option<Duration>,
}

impl Default for OfflineMixConfig {
    fn default() -> Self {
        Self {
            sample_rate: MIX_SAMPLE_RATE,
            fetch_timeout: None,
        }
    }
}

/// One clip's contribution, in timeline seconds.
#[derive(Debug, Clone)]
struct MixJob {
    source_id: String,
    start: f64,
    duration: f64,
    source_offset: f64,
    gain: f32,
    fade_in: f64,
    fade_out: f64,
}

fn collect_jobs(tracks: &[Track]) -> Vec<MixJob> {
    tracks
        .iter()
        .filter(|t| !t.muted && t.kind.carries_audio())
        .flat_map(|track| {
            track.clips().iter().filter(|c| !c.muted).filter_map(move |clip| {
                let source_id = clip.content.source_id()?;
                let params = clip.content.audio()?;
                Some(MixJob {
                    source_id: source_id.to_owned(),
                    start: clip.start_time.to_seconds_f64(),
                    duration: clip.duration.to_seconds_f64(),
                    source_offset: clip.source_offset.to_seconds_f64(),
                    gain: params.volume * track.volume,
                    fade_in: params.fade_in,
                    fade_out: params.fade_out,
                })
            })
        })
        .collect()
}

async fn load_source<F, D>(
    fetcher: &F,
    decoder: &D,
    source_id: &str,
    timeout: Option<Duration>,
) -> Result<DecodedAudio>
where
    F: ByteFetcher,
    D: AudioDecode,
{
    let fetch = fetcher.fetch(source_id);
    let bytes = match timeout {
        Some(limit) => tokio::time::timeout(limit, fetch)
            .await
            .map_err(|_| ProEditError::Timeout(source_id.to_owned()))??,
        None => fetch.await?,
    };
    decoder.decode(bytes).await
}

/// Load each distinct source once. Sources that fail are absent from the map.
async fn load_sources<F, D>(
    jobs: &[MixJob],
    fetcher: Arc<F>,
    decoder: Arc<D>,
    timeout: Option<Duration>,
) -> HashMap<String, DecodedAudio>
where
    F: ByteFetcher + Send + Sync + 'static,
    D: AudioDecode + Send + Sync + 'static,
{
    let mut tasks = JoinSet::new();
    let mut requested = HashSet::new();
    for job in jobs {
        if !requested.insert(job.source_id.as_str()) {
            continue;
        }
        let fetcher = Arc::clone(&fetcher);
        let decoder = Arc::clone(&decoder);
        let source_id = job.source_id.clone();
        tasks.spawn(async move {
            let loaded = load_source(&*fetcher, &*decoder, &source_id, timeout).await;
            (source_id, loaded)
        });
    }

    let mut loaded = HashMap::with_capacity(requested.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((source_id, Ok(audio))) => {
                debug!(
                    source = %source_id,
                    sample_rate = audio.sample_rate,
                    channels = audio.channels,
                    secs = audio.duration_secs(),
                    "Source decoded"
                );
                loaded.insert(source_id, audio);
            }
            Ok((source_id, Err(e))) => {
                warn!(source = %source_id, error = %e, "Skipping clip audio");
            }
            Err(e) => {
                warn!(error = %e, "Audio load task failed");
            }
        }
    }
    loaded
}

/// Render the audible mix of `tracks` over `[0, duration)` seconds.
///
/// The result has `config.sample_rate` Hz, two channels and exactly
/// `ceil(duration * sample_rate)` frames per channel. Overlapping sources sum
/// without clipping.
pub async fn render_offline_audio<F, D>(
    tracks: &[Track],
    duration: f64,
    fetcher: Arc<F>,
    decoder: Arc<D>,
    config: &OfflineMixConfig,
) -> Result<AudioBuffer>
where
    F: ByteFetcher + Send + Sync + 'static,
    D: AudioDecode + Send + Sync + 'static,
{
    if !duration.is_finite() || duration < 0.0 {
        return Err(ProEditError::Audio(format!("Invalid mix duration: {duration}")));
    }
    let rate = config.sample_rate as f64;
    let frames = (duration * rate).ceil();
    if frames > usize::MAX as f64 {
        return Err(ProEditError::Audio(format!("Mix of {duration}s is too long")));
    }
    let mut buffer = AudioBuffer::silent(MIX_CHANNELS as usize, frames as usize, config.sample_rate)?;

    let jobs = collect_jobs(tracks);
    if jobs.is_empty() {
        debug!(frames = buffer.frames(), "No audible clips, rendering silence");
        return Ok(buffer);
    }
    info!(clips = jobs.len(), duration, "Rendering offline mix");

    let sources = load_sources(&jobs, fetcher, decoder, config.fetch_timeout).await;

    let mut mixed = 0usize;
    for job in &jobs {
        let Some(audio) = sources.get(&job.source_id) else {
            continue;
        };
        let available = job.duration.min(audio.duration_secs() - job.source_offset);
        if available <= 0.0 {
            debug!(source = %job.source_id, "Clip reads past end of source");
            continue;
        }
        let envelope = GainEnvelope::new(job.start, job.start + job.duration, job.gain)
            .with_fades(job.fade_in, job.fade_out);
        mix_into(
            &mut buffer,
            &ScheduledSource {
                audio,
                start_frame: (job.start * rate).round() as usize,
                frame_count: (available * rate).round() as usize,
                source_offset: job.source_offset,
                envelope,
            },
        );
        mixed += 1;
    }

    info!(mixed, skipped = jobs.len() - mixed, frames = buffer.frames(), "Offline mix rendered");
    Ok(buffer)
}
