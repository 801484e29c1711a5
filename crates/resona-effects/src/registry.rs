//! Effect discovery and construction by string id.
//!
//! ```rust
//! use resona_core::{Effect, EffectWithParams};
//! use resona_effects::{EffectKind, create};
//!
//! let kind = EffectKind::from_id("reverb").unwrap();
//! let mut reverb = create(kind, 48000.0);
//! reverb.prepare(48000.0, 256);
//! assert_eq!(reverb.effect_param_count(), 7);
//! ```

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::boxed::Box;

use resona_core::EffectWithParams;

use crate::{
    AutoWah, ChorusFlanger, Compressor, Delay, Distortion, ResonantLowPass, Reverb, WahWah,
};

/// Broad grouping for menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectCategory {
    /// Compressor and limiter
    Dynamics,
    /// Clipping
    Distortion,
    /// LFO-driven effects
    Modulation,
    /// Delay and reverb
    TimeBased,
    /// Static and swept filters
    Filter,
}

impl EffectCategory {
    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dynamics => "Dynamics",
            Self::Distortion => "Distortion",
            Self::Modulation => "Modulation",
            Self::TimeBased => "Time-Based",
            Self::Filter => "Filter",
        }
    }
}

/// Every effect this crate can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// [`Delay`]
    Delay,
    /// [`ChorusFlanger`]
    ChorusFlanger,
    /// [`WahWah`]
    WahWah,
    /// [`AutoWah`]
    AutoWah,
    /// [`ResonantLowPass`]
    ResonantLowPass,
    /// [`Compressor`]
    Compressor,
    /// [`Distortion`]
    Distortion,
    /// [`Reverb`]
    Reverb,
}

impl EffectKind {
    /// All kinds in registry order.
    pub const ALL: [Self; 8] = [
        Self::Delay,
        Self::ChorusFlanger,
        Self::WahWah,
        Self::AutoWah,
        Self::ResonantLowPass,
        Self::Compressor,
        Self::Distortion,
        Self::Reverb,
    ];

    /// Stable snake_case id, as stored in presets.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Delay => "delay",
            Self::ChorusFlanger => "chorus_flanger",
            Self::WahWah => "wah_wah",
            Self::AutoWah => "auto_wah",
            Self::ResonantLowPass => "resonant_lowpass",
            Self::Compressor => "compressor",
            Self::Distortion => "distortion",
            Self::Reverb => "reverb",
        }
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Delay => "Delay",
            Self::ChorusFlanger => "Chorus/Flanger",
            Self::WahWah => "Wah-Wah",
            Self::AutoWah => "Auto-Wah",
            Self::ResonantLowPass => "Resonant Low-Pass",
            Self::Compressor => "Compressor",
            Self::Distortion => "Distortion",
            Self::Reverb => "Reverb",
        }
    }

    /// Menu grouping.
    pub const fn category(self) -> EffectCategory {
        match self {
            Self::Delay | Self::Reverb => EffectCategory::TimeBased,
            Self::ChorusFlanger | Self::WahWah => EffectCategory::Modulation,
            Self::AutoWah | Self::ResonantLowPass => EffectCategory::Filter,
            Self::Compressor => EffectCategory::Dynamics,
            Self::Distortion => EffectCategory::Distortion,
        }
    }

    /// Looks up a kind by its [`id`](Self::id).
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }
}

impl core::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.id())
    }
}

/// Builds an effect of `kind` at its default settings.
///
/// Construction allocates the effect's delay buffers; call from a control
/// thread, then hand the box to the audio thread.
pub fn create(kind: EffectKind, sample_rate: f32) -> Box<dyn EffectWithParams + Send> {
    #[cfg(feature = "tracing")]
    tracing::debug!(effect = kind.id(), sample_rate, "creating effect");

    match kind {
        EffectKind::Delay => Box::new(Delay::new(sample_rate)),
        EffectKind::ChorusFlanger => Box::new(ChorusFlanger::new(sample_rate)),
        EffectKind::WahWah => Box::new(WahWah::new(sample_rate)),
        EffectKind::AutoWah => Box::new(AutoWah::new(sample_rate)),
        EffectKind::ResonantLowPass => Box::new(ResonantLowPass::new(sample_rate)),
        EffectKind::Compressor => Box::new(Compressor::new(sample_rate)),
        EffectKind::Distortion => Box::new(Distortion::new(sample_rate)),
        EffectKind::Reverb => Box::new(Reverb::new(sample_rate)),
    }
}

/// Builds an effect by string id, or `None` for an unknown id.
pub fn create_by_id(id: &str, sample_rate: f32) -> Option<Box<dyn EffectWithParams + Send>> {
    EffectKind::from_id(id).map(|kind| create(kind, sample_rate))
}
