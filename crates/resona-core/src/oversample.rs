//! Integer-factor oversampling around a per-sample nonlinearity.
//!
//! Clipping creates harmonics far above the audio band. Running the
//! nonlinearity at `FACTOR` times the base rate keeps them below the
//! oversampled Nyquist, where a low-pass removes them before decimation.
//!
//! ```text
//! x -> zero-stuff (gain FACTOR) -> anti-imaging LP -> f(.) -> anti-aliasing LP -> keep 1 of FACTOR -> y
//! ```
//!
//! Both low-passes are 12th-order Butterworth cascades (six biquads) from
//! [`design::butterworth_lowpass`](crate::design::butterworth_lowpass),
//! designed at the oversampled rate with the cutoff at
//! [`NYQUIST_GUARD`](crate::design::NYQUIST_GUARD) of the base rate.

use crate::biquad::BiquadCascade;
use crate::design::{NYQUIST_GUARD, butterworth_lowpass};

/// Biquad sections in each anti-imaging and anti-aliasing filter.
pub const OVERSAMPLE_SECTIONS: usize = 6;

/// Runs a closure at `FACTOR` times the base sample rate.
///
/// # Example
///
/// ```rust
/// use resona_core::Oversampler;
///
/// let mut os = Oversampler::<8>::new(48000.0);
/// let mut peak = 0.0f32;
/// for i in 0..4800 {
///     let x = libm::sinf(i as f32 * 0.05);
///     let y = os.process(x, |s| s.clamp(-0.5, 0.5));
///     peak = peak.max(y.abs());
/// }
/// assert!(peak > 0.3 && peak < 0.8);
/// ```
#[derive(Debug, Clone)]
pub struct Oversampler<const FACTOR: usize> {
    anti_imaging: BiquadCascade<OVERSAMPLE_SECTIONS>,
    anti_aliasing: BiquadCascade<OVERSAMPLE_SECTIONS>,
    sample_rate: f32,
}

impl<const FACTOR: usize> Oversampler<FACTOR> {
    /// Designs both filters for a base rate of `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        let mut os = Self {
            anti_imaging: BiquadCascade::new(),
            anti_aliasing: BiquadCascade::new(),
            sample_rate,
        };
        os.set_sample_rate(sample_rate);
        os
    }

    /// Redesigns both filters for a new base rate and clears their state.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        let coefs = butterworth_lowpass::<OVERSAMPLE_SECTIONS>(
            NYQUIST_GUARD * sample_rate,
            self.oversampled_rate(),
        );
        self.anti_imaging.set_coefficients(&coefs);
        self.anti_aliasing.set_coefficients(&coefs);
        self.reset();
    }

    /// Base sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Rate at which the closure runs.
    pub fn oversampled_rate(&self) -> f32 {
        self.sample_rate * FACTOR as f32
    }

    /// Oversampling factor.
    pub const fn factor(&self) -> usize {
        FACTOR
    }

    /// Processes one base-rate sample through `shaper` at the oversampled rate.
    #[inline]
    pub fn process<F: FnMut(f32) -> f32>(&mut self, input: f32, mut shaper: F) -> f32 {
        let mut output = 0.0;
        for k in 0..FACTOR {
            let stuffed = if k == 0 { input * FACTOR as f32 } else { 0.0 };
            let upsampled = self.anti_imaging.process(stuffed);
            let shaped = self.anti_aliasing.process(shaper(upsampled));
            if k == 0 {
                output = shaped;
            }
        }
        output
    }

    /// Clears both filters.
    pub fn reset(&mut self) {
        self.anti_imaging.reset();
        self.anti_aliasing.reset();
    }
}
