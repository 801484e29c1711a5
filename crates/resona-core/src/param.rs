//! One-pole smoothing of control values.
//!
//! Knob movements arrive as steps. Fed straight into a gain multiply or a
//! filter design they produce zipper noise, so every continuous control
//! passes through a [`SmoothedParam`] first and the audio path reads the
//! smoothed value once per sample.
//!
//! ```rust
//! use resona_core::SmoothedParam;
//!
//! // 10 ms time constant at 48 kHz
//! let mut gain = SmoothedParam::with_config(1.0, 48000.0, 10.0);
//! gain.set_target(0.5);
//!
//! for _ in 0..480 {
//!     let g = gain.advance();
//!     assert!(g <= 1.0 && g >= 0.5);
//! }
//! ```

use libm::expf;

/// Exponentially smoothed control value.
///
/// `current += coeff * (target - current)` each sample, with
/// `coeff = 1 - exp(-1 / (tau * fs))`. A time of zero makes changes instant.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    /// 1.0 = instant
    coeff: f32,
    sample_rate: f32,
    smoothing_time_ms: f32,
}

impl SmoothedParam {
    /// Creates an unsmoothed parameter at `initial`.
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate: 48000.0,
            smoothing_time_ms: 0.0,
        }
    }

    /// Creates a parameter at `initial` with a time constant of
    /// `smoothing_time_ms` at `sample_rate`.
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self::new(initial);
        param.sample_rate = sample_rate;
        param.smoothing_time_ms = smoothing_time_ms;
        param.recalculate_coeff();
        param
    }

    /// Sets the value to glide towards.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Sets the target and jumps straight to it.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Updates the sample rate, keeping the time constant in milliseconds.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Changes the time constant.
    pub fn set_smoothing_time_ms(&mut self, time_ms: f32) {
        self.smoothing_time_ms = time_ms;
        self.recalculate_coeff();
    }

    /// Advances one sample and returns the new smoothed value.
    ///
    /// Once a step no longer changes the `f32` value the parameter lands
    /// exactly on its target.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let next = self.current + self.coeff * (self.target - self.current);
        self.current = if next == self.current { self.target } else { next };
        self.current
    }

    /// Smoothed value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Value being approached.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// `true` once the smoothed value is within `1e-6` of the target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    /// Jumps to the target.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    fn recalculate_coeff(&mut self) {
        let samples = self.smoothing_time_ms / 1000.0 * self.sample_rate;
        self.coeff = if samples <= 0.0 {
            1.0
        } else {
            1.0 - expf(-1.0 / samples)
        };
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}
