//! Sine low-frequency oscillator for modulation effects.
//!
//! The oscillator is a phase accumulator in `[0, 1)`. Rate and depth are
//! passed per call rather than stored, so a smoothed rate knob can drive it
//! directly.

use core::f32::consts::TAU;
use libm::{floorf, sinf};

/// Phase-accumulating sine LFO.
///
/// Each sample emits `sin(2 pi phase) * depth`, then advances
/// `phase += rate / sample_rate`. The phase wraps by subtracting 1, never by
/// truncation, so no bias builds up over long runs.
///
/// # Example
///
/// ```rust
/// use resona_core::Lfo;
///
/// let mut lfo = Lfo::new(48000.0);
/// let mut block = [0.0; 64];
/// lfo.process(2.0, 0.5, &mut block);
/// assert!(block.iter().all(|v| v.abs() <= 0.5));
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    /// Current phase position [0.0, 1.0)
    phase: f32,
    sample_rate: f32,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Lfo {
    /// Creates an LFO at phase zero.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            sample_rate,
        }
    }

    /// Updates the sample rate used to convert Hz into phase increments.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Current phase in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Jumps to `phase`, folded into `[0, 1)`.
    pub fn set_phase(&mut self, phase: f32) {
        let folded = phase - floorf(phase);
        self.phase = if folded < 1.0 { folded } else { 0.0 };
    }

    /// Returns the phase to zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Phase of the offset channel: `(phase * offset) mod 1`.
    ///
    /// An offset of 1 tracks the main phase exactly; 0 freezes the offset
    /// channel at phase zero.
    #[inline]
    pub fn offset_phase(&self, offset: f32) -> f32 {
        let mut p = self.phase * offset.clamp(0.0, 1.0);
        if p >= 1.0 {
            p -= 1.0;
        }
        p
    }

    /// Advances the phase by one sample at `rate_hz`.
    #[inline]
    pub fn advance(&mut self, rate_hz: f32) {
        let inc = (rate_hz / self.sample_rate).clamp(0.0, 0.5);
        self.phase += inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
    }

    /// Emits one sample and advances.
    #[inline]
    pub fn next(&mut self, rate_hz: f32, depth: f32) -> f32 {
        let out = sinf(TAU * self.phase) * depth;
        self.advance(rate_hz);
        out
    }

    /// Emits one sample for the main channel and one for the offset channel
    /// (see [`offset_phase`](Self::offset_phase)), then advances.
    #[inline]
    pub fn next_stereo(&mut self, rate_hz: f32, depth: f32, offset: f32) -> (f32, f32) {
        let left = sinf(TAU * self.phase) * depth;
        let right = sinf(TAU * self.offset_phase(offset)) * depth;
        self.advance(rate_hz);
        (left, right)
    }

    /// Fills `output` with consecutive samples.
    pub fn process(&mut self, rate_hz: f32, depth: f32, output: &mut [f32]) {
        for sample in output.iter_mut() {
            *sample = self.next(rate_hz, depth);
        }
    }
}
