//! Resona Core - real-time DSP primitives
//!
//! The building blocks behind every resona effect. Nothing on the
//! per-sample path allocates, locks, or logs.
//!
//! # Filters
//!
//! - [`Biquad`] / [`BiquadCascade`] - transposed direct form II sections
//! - [`ShelfFilter`] - first-order shelf used in reverb feedback loops
//! - [`design`] - analog prototypes, pre-warping and the bilinear transform
//!
//! # Time and modulation
//!
//! - [`DelayLine`] - circular buffer with fractional reads
//! - [`Lfo`] - phase-accumulating sine with a stereo phase offset
//! - [`EnvelopeDetector`] - attack/release level follower (peak, RMS, p-norm)
//!
//! # Parameters
//!
//! - [`SmoothedParam`] - one-pole smoothing of control values
//! - [`KnobRange`] / [`Taper`] - knob position to engineering value
//! - [`ParamDescriptor`], [`ParameterInfo`], [`KnobSet`] - parameter tables
//! - [`KnobBank`] - lock-free handoff from a control thread
//!
//! # Effects
//!
//! - [`Effect`] - prepare / process / reset lifecycle
//! - [`EffectWithParams`] - object-safe effect plus parameters
//! - [`Oversampler`] - runs a nonlinearity at a multiple of the base rate
//!
//! # no_std
//!
//! Disable the default `std` feature to build against `core` + `alloc`:
//!
//! ```toml
//! [dependencies]
//! resona-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use resona_core::{Biquad, DelayLine, design};
//!
//! let mut lp = Biquad::with_coefficients(design::resonant_lowpass(800.0, 2.0, 48000.0));
//! let mut line = DelayLine::from_time(48000.0, 0.01);
//!
//! let mut out = 0.0;
//! for _ in 0..1000 {
//!     line.write(lp.process(1.0));
//!     out = line.read(100);
//!     line.advance();
//! }
//! assert!(out > 0.9);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod delay;
pub mod design;
pub mod effect;
pub mod envelope;
pub mod lfo;
pub mod math;
pub mod one_pole;
pub mod oversample;
pub mod param;
pub mod param_bridge;
pub mod param_info;
pub mod taper;

pub use biquad::{Biquad, BiquadCascade, BiquadCoefs};
pub use delay::DelayLine;
pub use effect::{Effect, EffectWithParams};
pub use envelope::{DetectionMode, EnvelopeDetector, time_constant_coeff};
pub use lfo::Lfo;
pub use math::{DB_FLOOR, db_to_linear, flush_denormal, linear_to_db, mono_sum, wet_dry_mix};
pub use one_pole::{ShelfCoefs, ShelfFilter};
pub use oversample::{OVERSAMPLE_SECTIONS, Oversampler};
pub use param::SmoothedParam;
pub use param_bridge::KnobBank;
pub use param_info::{KnobSet, ParamDescriptor, ParamId, ParamUnit, ParameterInfo};
pub use taper::{KnobRange, Taper, knob_to_value, value_to_knob};
