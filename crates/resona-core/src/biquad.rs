//! Second-order IIR section in transposed direct form II.
//!
//! Coefficients are plain values ([`BiquadCoefs`]) produced by the
//! [`design`](crate::design) functions and handed to
//! [`Biquad::set_coefficients`]. Replacing them never touches the state
//! registers, so a redesign mid-stream keeps the filter running.

use crate::math::flush_denormal;

/// Normalized biquad coefficients (`a0` is always 1).
///
/// ```text
/// H(z) = (b0 + b1 z^-1 + b2 z^-2) / (1 + a1 z^-1 + a2 z^-2)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefs {
    /// Feedforward coefficient for `z^0`.
    pub b0: f32,
    /// Feedforward coefficient for `z^-1`.
    pub b1: f32,
    /// Feedforward coefficient for `z^-2`.
    pub b2: f32,
    /// Feedback coefficient for `z^-1`.
    pub a1: f32,
    /// Feedback coefficient for `z^-2`.
    pub a2: f32,
}

impl BiquadCoefs {
    /// Passthrough coefficients: `y[n] = x[n]`.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Build from un-normalized coefficients, dividing everything by `a0`.
    pub fn from_raw(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Self {
        let a0_inv = 1.0 / a0;
        Self {
            b0: b0 * a0_inv,
            b1: b1 * a0_inv,
            b2: b2 * a0_inv,
            a1: a1 * a0_inv,
            a2: a2 * a0_inv,
        }
    }

    /// Returns `true` if both poles lie strictly inside the unit circle.
    ///
    /// Uses the stability triangle for `1 + a1 z^-1 + a2 z^-2`.
    pub fn is_stable(&self) -> bool {
        self.a2.abs() < 1.0 && self.a1.abs() < 1.0 + self.a2
    }
}

impl Default for BiquadCoefs {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Biquad filter state plus its current coefficients.
///
/// Per sample:
/// ```text
/// y  = z1 + b0*x
/// z1 = z2 + b1*x - a1*y
/// z2 =      b2*x - a2*y
/// ```
///
/// NaN or infinite input propagates; callers keep coefficients stable.
///
/// # Example
///
/// ```rust
/// use resona_core::{Biquad, design};
///
/// let mut lp = Biquad::new();
/// lp.set_coefficients(design::resonant_lowpass(1000.0, 0.707, 48000.0));
/// let y = lp.process(1.0);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Biquad {
    coefs: BiquadCoefs,
    z1: f32,
    z2: f32,
}

impl Biquad {
    /// Creates a passthrough biquad with zeroed state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a biquad already loaded with `coefs`.
    pub fn with_coefficients(coefs: BiquadCoefs) -> Self {
        Self {
            coefs,
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// Replaces the coefficients wholesale. Takes effect on the next
    /// [`process`](Self::process) call.
    #[inline]
    pub fn set_coefficients(&mut self, coefs: BiquadCoefs) {
        self.coefs = coefs;
    }

    /// Current coefficients.
    pub fn coefficients(&self) -> BiquadCoefs {
        self.coefs
    }

    /// Filters one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coefs;
        let output = self.z1 + input * c.b0;
        self.z1 = flush_denormal(self.z2 + input * c.b1 - output * c.a1);
        self.z2 = flush_denormal(input * c.b2 - output * c.a2);
        output
    }

    /// Zeroes both state registers, keeping the coefficients.
    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

/// Fixed-length series of biquads sharing one input.
///
/// Used for higher-order low-pass filters built from second-order sections.
#[derive(Debug, Clone)]
pub struct BiquadCascade<const N: usize> {
    sections: [Biquad; N],
}

impl<const N: usize> BiquadCascade<N> {
    /// Creates a cascade of passthrough sections.
    pub fn new() -> Self {
        Self {
            sections: core::array::from_fn(|_| Biquad::new()),
        }
    }

    /// Loads one coefficient set per section.
    pub fn set_coefficients(&mut self, coefs: &[BiquadCoefs; N]) {
        for (section, c) in self.sections.iter_mut().zip(coefs) {
            section.set_coefficients(*c);
        }
    }

    /// Runs `input` through every section in order.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.sections
            .iter_mut()
            .fold(input, |acc, section| section.process(acc))
    }

    /// Zeroes the state of every section.
    pub fn reset(&mut self) {
        for section in &mut self.sections {
            section.reset();
        }
    }
}

impl<const N: usize> Default for BiquadCascade<N> {
    fn default() -> Self {
        Self::new()
    }
}
