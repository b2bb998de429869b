//! Services the offline renderer loads media through.
//!
//! Both traits return `Send` futures so loads can run on a `JoinSet`.

use std::future::Future;

use proedit_core::Result;

/// Decoded PCM, interleaved `f32` at the source's native rate.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl DecodedAudio {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    pub fn frames(&self) -> usize {
        match self.channels {
            0 => 0,
            n => self.samples.len() / n as usize,
        }
    }

    /// Length in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Sample of `channel` at `frame`. Mono sources answer for every channel;
    /// out-of-range frames are silent.
    pub fn sample(&self, frame: usize, channel: usize) -> f32 {
        let channels = self.channels as usize;
        if channels == 0 || frame >= self.frames() {
            return 0.0;
        }
        let ch = channel.min(channels - 1);
        self.samples[frame * channels + ch]
    }
}

/// Resolves a media source id to its raw bytes.
pub trait ByteFetcher {
    fn fetch(&self, source_id: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Decodes a complete encoded file into PCM.
pub trait AudioDecode {
    fn decode(&self, bytes: Vec<u8>) -> impl Future<Output = Result<DecodedAudio>> + Send;
}
