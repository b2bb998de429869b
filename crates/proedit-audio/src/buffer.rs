//! Planar floating-point sample buffer.

use proedit_core::{ProEditError, Result};

/// A planar `f32` buffer: one `Vec` per channel, all the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Allocate a silent buffer.
    ///
    /// Fails when the size overflows or a zero channel count / sample rate is
    /// requested.
    pub fn silent(channels: usize, frames: usize, sample_rate: u32) -> Result<Self> {
        if channels == 0 || sample_rate == 0 {
            return Err(ProEditError::Audio(format!(
                "Cannot allocate {channels}-channel buffer at {sample_rate} Hz"
            )));
        }
        let bytes = frames
            .checked_mul(channels)
            .and_then(|n| n.checked_mul(std::mem::size_of::<f32>()));
        if !bytes.is_some_and(|b| b <= isize::MAX as usize) {
            return Err(ProEditError::Audio(format!(
                "Buffer of {frames} frames overflows"
            )));
        }
        Ok(Self {
            channels: vec![vec![0.0; frames]; channels],
            sample_rate,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Frames per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channel_mut(&mut self, index: usize) -> Option<&mut [f32]> {
        self.channels.get_mut(index).map(Vec::as_mut_slice)
    }

    /// Absolute peak across all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flatten()
            .fold(0.0f32, |peak, s| peak.max(s.abs()))
    }

    pub fn is_silent(&self) -> bool {
        self.channels.iter().flatten().all(|s| *s == 0.0)
    }

    /// Interleave into a single `Vec` (L R L R ... for stereo).
    pub fn interleaved(&self) -> Vec<f32> {
        let frames = self.frames();
        let mut out = Vec::with_capacity(frames * self.channels.len());
        for i in 0..frames {
            out.extend(self.channels.iter().map(|c| c[i]));
        }
        out
    }
}
