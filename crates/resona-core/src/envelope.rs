//! Level detector for dynamics and level-driven modulation.
//!
//! An asymmetric one-pole smoother: the estimate rises at the attack rate
//! and falls at the release rate. Three detection laws share the same
//! smoother:
//!
//! | Mode | Smoothed quantity | Reported level |
//! |------|-------------------|----------------|
//! | [`DetectionMode::Peak`] | `\|x\|` | estimate |
//! | [`DetectionMode::Rms`] | `x^2` | `sqrt(estimate)` |
//! | [`DetectionMode::PNorm`] | `\|x\|^p` | `estimate^(1/p)` |
//!
//! The root is taken on the way out, never inside the smoothing state.

use libm::{expf, powf, sqrtf};

use crate::math::flush_denormal;

/// Detection law applied before smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DetectionMode {
    /// Absolute value.
    #[default]
    Peak,
    /// Power (squared), reported as RMS.
    Rms,
    /// `|x|^p`, reported as the p-th root. `p = 1` equals peak, `p = 2` RMS.
    /// Larger `p` makes the detector react more to peaks.
    PNorm(f32),
}

/// One-pole coefficient for time constant `tau` seconds: `exp(-1 / (tau fs))`.
///
/// A non-positive time constant gives 0, i.e. instant tracking.
#[inline]
pub fn time_constant_coeff(tau_seconds: f32, sample_rate: f32) -> f32 {
    if tau_seconds <= 0.0 || sample_rate <= 0.0 {
        0.0
    } else {
        expf(-1.0 / (tau_seconds * sample_rate))
    }
}

/// Asymmetric attack/release level detector.
///
/// With `a = exp(-1/(tau fs))` and `b = 1 - a`, each sample does
/// `estimate += b * (detected - estimate)`, picking the attack pair while
/// the detected value exceeds the estimate and the release pair otherwise.
///
/// # Example
///
/// ```rust
/// use resona_core::{DetectionMode, EnvelopeDetector};
///
/// let mut env = EnvelopeDetector::new(48000.0);
/// env.set_attack(0.001);
/// env.set_release(0.1);
/// env.set_mode(DetectionMode::Rms);
///
/// let level = env.process(0.5);
/// assert!(level > 0.0 && level < 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeDetector {
    /// Smoothed detected quantity (not yet rooted)
    estimate: f32,
    attack_coeff: f32,
    release_coeff: f32,
    attack: f32,
    release: f32,
    sample_rate: f32,
    mode: DetectionMode,
}

impl EnvelopeDetector {
    /// Creates a peak detector with 10 ms attack and 100 ms release.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_times(sample_rate, 0.01, 0.1)
    }

    /// Creates a peak detector with the given attack and release times in seconds.
    pub fn with_times(sample_rate: f32, attack: f32, release: f32) -> Self {
        let mut detector = Self {
            estimate: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            attack,
            release,
            sample_rate,
            mode: DetectionMode::Peak,
        };
        detector.recalculate_coefficients();
        detector
    }

    /// Sets the attack time constant in seconds.
    pub fn set_attack(&mut self, seconds: f32) {
        self.attack = seconds.max(0.0);
        self.attack_coeff = time_constant_coeff(self.attack, self.sample_rate);
    }

    /// Sets the release time constant in seconds.
    pub fn set_release(&mut self, seconds: f32) {
        self.release = seconds.max(0.0);
        self.release_coeff = time_constant_coeff(self.release, self.sample_rate);
    }

    /// Attack time constant in seconds.
    pub fn attack(&self) -> f32 {
        self.attack
    }

    /// Release time constant in seconds.
    pub fn release(&self) -> f32 {
        self.release
    }

    /// Selects the detection law. `PNorm` exponents are clamped to at least 1.
    ///
    /// The running estimate is re-expressed under the new law, so
    /// [`level`](Self::level) is continuous across the change.
    pub fn set_mode(&mut self, mode: DetectionMode) {
        let level = self.level();
        self.mode = match mode {
            DetectionMode::PNorm(p) => DetectionMode::PNorm(p.max(1.0)),
            other => other,
        };
        self.estimate = self.detect(level);
    }

    /// Current detection law.
    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    /// Updates the sample rate and recomputes both coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coefficients();
    }

    /// Feeds one sample and returns the level estimate in linear units.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let detected = self.detect(input);
        let coeff = if detected > self.estimate {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.estimate = flush_denormal(self.estimate + (1.0 - coeff) * (detected - self.estimate));
        self.level()
    }

    /// Current level estimate in linear units, without advancing.
    #[inline]
    pub fn level(&self) -> f32 {
        match self.mode {
            DetectionMode::Peak => self.estimate,
            DetectionMode::Rms => sqrtf(self.estimate),
            DetectionMode::PNorm(p) => powf(self.estimate, 1.0 / p),
        }
    }

    /// Clears the estimate to silence.
    pub fn reset(&mut self) {
        self.estimate = 0.0;
    }

    #[inline]
    fn detect(&self, input: f32) -> f32 {
        let magnitude = input.abs();
        match self.mode {
            DetectionMode::Peak => magnitude,
            DetectionMode::Rms => magnitude * magnitude,
            DetectionMode::PNorm(p) => powf(magnitude, p),
        }
    }

    fn recalculate_coefficients(&mut self) {
        self.attack_coeff = time_constant_coeff(self.attack, self.sample_rate);
        self.release_coeff = time_constant_coeff(self.release, self.sample_rate);
    }
}
