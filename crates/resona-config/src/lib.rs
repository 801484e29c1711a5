//! Preset persistence for resona effects.
//!
//! A [`Preset`] is a named snapshot of every knob of one effect, stored as
//! TOML. Knobs round-trip through the file bit for bit.
//!
//! # Example
//!
//! ```rust,no_run
//! use resona_config::Preset;
//! use resona_core::Effect;
//!
//! let preset = Preset::load("presets/big_hall.toml")?;
//! let mut reverb = preset.instantiate(48000.0)?;
//! reverb.prepare(48000.0, 256);
//! # Ok::<(), resona_config::ConfigError>(())
//! ```

mod error;
mod preset;

pub use error::ConfigError;
pub use preset::{Preset, PresetParam};
