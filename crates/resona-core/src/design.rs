//! Analog prototype design and bilinear transform.
//!
//! Every digital filter in the crate is designed the same way:
//!
//! 1. Describe the filter as a continuous-time transfer function
//!    ([`AnalogBiquad`] or a first-order shelf).
//! 2. Pre-warp the design frequency with [`prewarp`] so the digital
//!    response lands exactly on it.
//! 3. Map `s -> c (1 - z^-1) / (1 + z^-1)` with `c = 2 fs` ([`bilinear`]) and
//!    normalize so `a0 = 1`.
//!
//! Design math runs in `f64` and is rounded to `f32` coefficients at the end.
//! Frequencies are clamped to [`NYQUIST_GUARD`]` * fs` before pre-warping,
//! because `tan` diverges at Nyquist.
//!
//! # Example
//!
//! ```rust
//! use resona_core::design;
//!
//! let lp = design::resonant_lowpass(1200.0, 4.0, 48000.0);
//! assert!(lp.is_stable());
//!
//! let boost = design::parametric(3000.0, 6.0, 1.0, 48000.0);
//! assert!(boost.is_stable());
//! ```

use core::f64::consts::PI;
use libm::{exp, log, sin, tan};

use crate::biquad::BiquadCoefs;
use crate::one_pole::ShelfCoefs;

/// Highest design frequency, as a fraction of the sample rate.
pub const NYQUIST_GUARD: f32 = 0.45;

/// Smallest accepted Q.
const MIN_Q: f64 = 1e-3;

/// Continuous-time second-order transfer function.
///
/// ```text
///         b2 s^2 + b1 s + b0
/// H(s) = --------------------
///         a2 s^2 + a1 s + a0
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalogBiquad {
    /// Numerator, `s^0` term.
    pub b0: f64,
    /// Numerator, `s^1` term.
    pub b1: f64,
    /// Numerator, `s^2` term.
    pub b2: f64,
    /// Denominator, `s^0` term.
    pub a0: f64,
    /// Denominator, `s^1` term.
    pub a1: f64,
    /// Denominator, `s^2` term.
    pub a2: f64,
}

/// Clamp a design frequency into `(0, NYQUIST_GUARD * fs]`.
#[inline]
pub fn clamp_frequency(hz: f32, sample_rate: f32) -> f32 {
    hz.clamp(1e-3, NYQUIST_GUARD * sample_rate)
}

/// Pre-warped analog frequency in rad/s: `2 fs tan(pi f / fs)`.
///
/// A bilinear-transformed filter designed at this frequency has its digital
/// response at exactly `hz`.
#[inline]
pub fn prewarp(hz: f32, sample_rate: f32) -> f64 {
    let fs = f64::from(sample_rate);
    let f = f64::from(clamp_frequency(hz, sample_rate));
    2.0 * fs * tan(PI * f / fs)
}

/// Bilinear transform of a second-order analog prototype.
pub fn bilinear(analog: &AnalogBiquad, sample_rate: f32) -> BiquadCoefs {
    let c = 2.0 * f64::from(sample_rate);
    let c2 = c * c;
    let AnalogBiquad {
        b0,
        b1,
        b2,
        a0,
        a1,
        a2,
    } = *analog;

    let bz0 = b2 * c2 + b1 * c + b0;
    let bz1 = 2.0 * (b0 - b2 * c2);
    let bz2 = b2 * c2 - b1 * c + b0;
    let az0 = a2 * c2 + a1 * c + a0;
    let az1 = 2.0 * (a0 - a2 * c2);
    let az2 = a2 * c2 - a1 * c + a0;

    let norm = 1.0 / az0;
    BiquadCoefs {
        b0: (bz0 * norm) as f32,
        b1: (bz1 * norm) as f32,
        b2: (bz2 * norm) as f32,
        a1: (az1 * norm) as f32,
        a2: (az2 * norm) as f32,
    }
}

/// Resonant low-pass at `center_hz` with quality factor `q`.
///
/// Analog prototype: `1 / (s^2/w^2 + s/(w Q) + 1)`.
pub fn resonant_lowpass(center_hz: f32, q: f32, sample_rate: f32) -> BiquadCoefs {
    let w = prewarp(center_hz, sample_rate);
    let q = f64::from(q).max(MIN_Q);
    let analog = AnalogBiquad {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a0: 1.0,
        a1: 1.0 / (w * q),
        a2: 1.0 / (w * w),
    };
    bilinear(&analog, sample_rate)
}

/// Parametric (peak/notch) section: `gain_db` at `center_hz`, unity
/// elsewhere.
///
/// For a boost the gain scales the numerator damping term; for a cut the
/// inverse gain scales the denominator term. Boost and cut at the same
/// `|gain_db|` are therefore exact inverses and share a bandwidth.
pub fn parametric(center_hz: f32, gain_db: f32, q: f32, sample_rate: f32) -> BiquadCoefs {
    let w = prewarp(center_hz, sample_rate);
    let q = f64::from(q).max(MIN_Q);
    let g = exp(f64::from(gain_db) * core::f64::consts::LN_10 / 20.0);

    let (b1, a1) = if g > 1.0 {
        (g / (w * q), 1.0 / (w * q))
    } else {
        (1.0 / (w * q), 1.0 / (w * g * q))
    };

    let analog = AnalogBiquad {
        b0: 1.0,
        b1,
        b2: 1.0 / (w * w),
        a0: 1.0,
        a1,
        a2: 1.0 / (w * w),
    };
    bilinear(&analog, sample_rate)
}

/// Gain per pass through a delay of `len` samples that yields a decay of
/// 60 dB in `t60` seconds.
#[inline]
pub fn t60_gain(len: f32, t60: f32, sample_rate: f32) -> f64 {
    let period = f64::from(len) / f64::from(sample_rate);
    exp(period * log(0.001) / f64::from(t60.max(1e-4)))
}

/// First-order shelf for a feedback delay line of `len` samples.
///
/// The shelf gain at DC gives a 60 dB decay in `t60_low` seconds and the
/// gain at Nyquist a 60 dB decay in `t60_high` seconds. The crossover sits
/// at `transition_hz`.
pub fn shelf(
    len: f32,
    transition_hz: f32,
    t60_low: f32,
    t60_high: f32,
    sample_rate: f32,
) -> ShelfCoefs {
    let g0 = t60_gain(len, t60_low, sample_rate);
    let g1 = t60_gain(len, t60_high, sample_rate);
    let rho = prewarp(transition_hz, sample_rate);
    let c = 2.0 * f64::from(sample_rate);

    // H(s) = (g0 + (g1/rho) s) / (1 + s/rho)
    let b0 = g0;
    let a1 = 1.0 / rho;
    let b1 = a1 * g1;

    let norm = 1.0 / (1.0 + a1 * c);
    ShelfCoefs {
        b0: ((b0 + b1 * c) * norm) as f32,
        b1: ((b0 - b1 * c) * norm) as f32,
        a1: ((1.0 - a1 * c) * norm) as f32,
    }
}

/// Butterworth low-pass of order `2 * N`, as `N` second-order sections.
///
/// Each section is a [`resonant_lowpass`] at `cutoff_hz` with the pole-pair
/// Q of the Butterworth prototype.
pub fn butterworth_lowpass<const N: usize>(cutoff_hz: f32, sample_rate: f32) -> [BiquadCoefs; N] {
    let order = 2 * N;
    core::array::from_fn(|k| {
        let angle = (2 * k + 1) as f64 * PI / (2 * order) as f64;
        let q = 1.0 / (2.0 * sin(angle));
        resonant_lowpass(cutoff_hz, q as f32, sample_rate)
    })
}
