//! Knob taper mapping.
//!
//! A knob is a normalized position in `[0, 1]`. A taper turns it into an
//! engineering value in `[min, max]` and back:
//!
//! - **Algebraic** (`taper > 0`): `value = min + (max - min) * knob^taper`.
//!   A taper of 1 is linear.
//! - **Exponential** (`taper <= 0`): `value = min * (max / min)^knob`, which
//!   gives equal knob travel per octave or decade. Requires `min > 0`.
//!
//! Both directions clamp their input, so out-of-range knobs and values
//! quietly land on the nearest limit.
//!
//! ```rust
//! use resona_core::KnobRange;
//!
//! let fc = KnobRange::exponential(50.0, 5000.0);
//! assert!((fc.to_value(0.5) - 500.0).abs() < 0.01);
//! assert!((fc.to_knob(500.0) - 0.5).abs() < 1e-6);
//! ```

use libm::{expf, logf, powf};

/// Taper curve selector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Taper {
    /// `knob^exponent`; exponent 1 is linear.
    Algebraic(f32),
    /// Geometric sweep between the limits.
    Exponential,
}

impl Taper {
    /// Linear taper.
    pub const LINEAR: Self = Self::Algebraic(1.0);

    /// Selects a taper from a signed exponent: algebraic when positive,
    /// exponential otherwise.
    pub fn from_exponent(exponent: f32) -> Self {
        if exponent > 0.0 {
            Self::Algebraic(exponent)
        } else {
            Self::Exponential
        }
    }
}

/// Maps a knob in `[0, 1]` to a value in `[min, max]`.
#[inline]
pub fn knob_to_value(knob: f32, min: f32, max: f32, taper: Taper) -> f32 {
    let knob = knob.clamp(0.0, 1.0);
    match taper {
        Taper::Algebraic(exponent) => min + (max - min) * powf(knob, exponent),
        Taper::Exponential => min * expf(logf(max / min) * knob),
    }
}

/// Maps a value in `[min, max]` back to a knob in `[0, 1]`.
#[inline]
pub fn value_to_knob(value: f32, min: f32, max: f32, taper: Taper) -> f32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    let value = value.clamp(lo, hi);
    let knob = match taper {
        Taper::Algebraic(exponent) => {
            let span = max - min;
            if span == 0.0 {
                return 0.0;
            }
            powf((value - min) / span, 1.0 / exponent)
        }
        Taper::Exponential => {
            let span = logf(max / min);
            if span == 0.0 {
                return 0.0;
            }
            logf(value / min) / span
        }
    };
    knob.clamp(0.0, 1.0)
}

/// Limits plus taper for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnobRange {
    /// Value at knob 0.
    pub min: f32,
    /// Value at knob 1.
    pub max: f32,
    /// Curve between the limits.
    pub taper: Taper,
}

impl KnobRange {
    /// Range with an explicit taper.
    pub const fn new(min: f32, max: f32, taper: Taper) -> Self {
        Self { min, max, taper }
    }

    /// Linear range.
    pub const fn linear(min: f32, max: f32) -> Self {
        Self::new(min, max, Taper::LINEAR)
    }

    /// Exponential range; `min` must be positive.
    pub const fn exponential(min: f32, max: f32) -> Self {
        Self::new(min, max, Taper::Exponential)
    }

    /// Knob to value.
    #[inline]
    pub fn to_value(&self, knob: f32) -> f32 {
        knob_to_value(knob, self.min, self.max, self.taper)
    }

    /// Value to knob.
    #[inline]
    pub fn to_knob(&self, value: f32) -> f32 {
        value_to_knob(value, self.min, self.max, self.taper)
    }

    /// Clamps a value into the range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min.min(self.max), self.max.max(self.min))
    }
}
