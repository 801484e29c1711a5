//! First-order shelving section.
//!
//! Used in the reverb feedback path, where each delay line needs a
//! different decay rate at low and high frequencies.

use crate::math::flush_denormal;

/// Coefficients of a first-order section, `a0` normalized to 1.
///
/// ```text
/// H(z) = (b0 + b1 z^-1) / (1 + a1 z^-1)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShelfCoefs {
    /// Feedforward coefficient for `z^0`.
    pub b0: f32,
    /// Feedforward coefficient for `z^-1`.
    pub b1: f32,
    /// Feedback coefficient for `z^-1`.
    pub a1: f32,
}

impl ShelfCoefs {
    /// Passthrough coefficients.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        a1: 0.0,
    };

    /// Magnitude at DC (`z = 1`).
    pub fn dc_gain(&self) -> f32 {
        (self.b0 + self.b1) / (1.0 + self.a1)
    }

    /// Magnitude at Nyquist (`z = -1`).
    pub fn nyquist_gain(&self) -> f32 {
        ((self.b0 - self.b1) / (1.0 - self.a1)).abs()
    }
}

impl Default for ShelfCoefs {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// First-order shelf filter, transposed direct form.
///
/// ```text
/// y  = z1 + b0*x
/// z1 = b1*x - a1*y
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShelfFilter {
    coefs: ShelfCoefs,
    z1: f32,
}

impl ShelfFilter {
    /// Creates a passthrough shelf.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the coefficients; state is kept.
    #[inline]
    pub fn set_coefficients(&mut self, coefs: ShelfCoefs) {
        self.coefs = coefs;
    }

    /// Current coefficients.
    pub fn coefficients(&self) -> ShelfCoefs {
        self.coefs
    }

    /// Filters one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.z1 + input * self.coefs.b0;
        self.z1 = flush_denormal(input * self.coefs.b1 - output * self.coefs.a1);
        output
    }

    /// Zeroes the state register.
    pub fn reset(&mut self) {
        self.z1 = 0.0;
    }
}
