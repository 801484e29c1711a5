//! Resona Effects - stereo effect graphs built on resona-core
//!
//! - [`Delay`] - feedback echo with a gliding delay time
//! - [`ChorusFlanger`] - LFO-modulated delay in chorus or flanger range
//! - [`WahWah`] / [`AutoWah`] - resonant low-pass swept by an LFO or by the input level
//! - [`ResonantLowPass`] - static resonant low-pass with a gain stage
//! - [`Compressor`] - stereo-linked compressor that becomes a limiter at full ratio
//! - [`Distortion`] - 8x oversampled hard or soft clipper with tone EQ
//! - [`Reverb`] - 12-line feedback delay network with decay shelves
//!
//! Every effect implements [`Effect`](resona_core::Effect) and
//! [`ParameterInfo`](resona_core::ParameterInfo). The [`registry`] builds
//! them by string id as `Box<dyn EffectWithParams + Send>`.
//!
//! ## Example
//!
//! ```rust
//! use resona_core::{Effect, ParameterInfo};
//! use resona_effects::{Compressor, Reverb};
//!
//! let mut comp = Compressor::new(48000.0);
//! let mut reverb = Reverb::new(48000.0);
//! comp.set_param_value(2, -12.0);
//! reverb.set_param_value(3, 0.3);
//! comp.prepare(48000.0, 128);
//! reverb.prepare(48000.0, 128);
//!
//! let mut left = [0.5f32; 128];
//! let mut right = [0.5f32; 128];
//! comp.process_block_inplace(&mut left, &mut right);
//! reverb.process_block_inplace(&mut left, &mut right);
//! assert!(left.iter().all(|s| s.is_finite()));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod chorus;
pub mod compressor;
pub mod delay;
pub mod distortion;
pub(crate) mod eq;
pub mod filter;
pub mod registry;
pub mod reverb;
pub mod wah;

pub use chorus::{CHORUS_FLANGER_PARAMS, ChorusFlanger, ChorusMode};
pub use compressor::{COMPRESSOR_PARAMS, Compressor};
pub use delay::{DELAY_PARAMS, Delay, MAX_DELAY_SECONDS};
pub use distortion::{ClipShape, DISTORTION_PARAMS, Distortion};
pub use filter::{RESONANT_LOWPASS_PARAMS, ResonantLowPass};
pub use registry::{EffectCategory, EffectKind, create, create_by_id};
pub use reverb::{LINE_COUNT, MixingMatrix, REVERB_PARAMS, Reverb};
pub use wah::{AUTO_WAH_PARAMS, AutoWah, WAH_WAH_PARAMS, WahWah};
