//! Clip gain envelope.

/// Constant gain with optional linear fade-in/out, in timeline seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainEnvelope {
    pub start: f64,
    pub end: f64,
    pub gain: f32,
    pub fade_in: f64,
    pub fade_out: f64,
}

impl GainEnvelope {
    pub fn new(start: f64, end: f64, gain: f32) -> Self {
        Self {
            start,
            end,
            gain,
            fade_in: 0.0,
            fade_out: 0.0,
        }
    }

    pub fn with_fades(mut self, fade_in: f64, fade_out: f64) -> Self {
        self.fade_in = fade_in.max(0.0);
        self.fade_out = fade_out.max(0.0);
        self
    }

    /// Gain at timeline time `t`. Fade-in ramps 0 → gain over
    /// `[start, start + fade_in]`; fade-out ramps gain → 0 over
    /// `[end - fade_out, end]`. Overlapping ramps multiply.
    pub fn gain_at(&self, t: f64) -> f32 {
        let mut factor = 1.0f64;
        if self.fade_in > 0.0 && t < self.start + self.fade_in {
            factor *= ((t - self.start) / self.fade_in).clamp(0.0, 1.0);
        }
        if self.fade_out > 0.0 && t > self.end - self.fade_out {
            factor *= ((self.end - t) / self.fade_out).clamp(0.0, 1.0);
        }
        self.gain * factor as f32
    }
}
