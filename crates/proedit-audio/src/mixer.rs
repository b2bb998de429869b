//! Mix-down pass: sums scheduled sources into an output buffer.

use crate::buffer::AudioBuffer;
use crate::envelope::GainEnvelope;
use crate::source::DecodedAudio;

/// A decoded source placed on the output timeline.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledSource<'a> {
    pub audio: &'a DecodedAudio,
    /// First output frame written.
    pub start_frame: usize,
    /// Number of output frames to write.
    pub frame_count: usize,
    /// Read position inside the source, in seconds.
    pub source_offset: f64,
    pub envelope: GainEnvelope,
}

impl ScheduledSource<'_> {
    /// Linearly interpolated sample at output-relative frame `n`.
    fn sample_at(&self, n: usize, channel: usize, out_rate: f64) -> f32 {
        let frames = self.audio.frames();
        if frames == 0 {
            return 0.0;
        }
        let pos = (self.source_offset + n as f64 / out_rate) * self.audio.sample_rate as f64;
        let i0 = pos.floor() as usize;
        if i0 >= frames {
            return 0.0;
        }
        let i1 = (i0 + 1).min(frames - 1);
        let frac = (pos - i0 as f64) as f32;
        let a = self.audio.sample(i0, channel);
        let b = self.audio.sample(i1, channel);
        a + (b - a) * frac
    }
}

/// Add `source` into `buffer`. Writes past the end of the buffer are dropped.
/// No clipping is applied.
pub fn mix_into(buffer: &mut AudioBuffer, source: &ScheduledSource<'_>) {
    let out_rate = buffer.sample_rate() as f64;
    let end = buffer
        .frames()
        .min(source.start_frame.saturating_add(source.frame_count));
    if source.start_frame >= end {
        return;
    }

    for channel in 0..buffer.channel_count() {
        let Some(out) = buffer.channel_mut(channel) else {
            continue;
        };
        for (n, slot) in out[source.start_frame..end].iter_mut().enumerate() {
            let t = source.envelope.start + n as f64 / out_rate;
            *slot += source.sample_at(n, channel, out_rate) * source.envelope.gain_at(t);
        }
    }
}
