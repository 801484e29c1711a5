//! Parameter metadata and knob-level access.
//!
//! Every effect publishes a fixed table of [`ParamDescriptor`]s and
//! implements [`ParameterInfo`]. The host only ever talks in normalized
//! knob positions (`0.0..=1.0`); the descriptor's [`KnobRange`] converts them
//! to engineering units inside the effect.
//!
//! # Stable ids
//!
//! Each parameter carries a [`ParamId`] that never changes once published.
//! Presets store `(id, knob)` pairs, so reordering a table does not break
//! saved state. Each effect owns a block of 100 ids:
//!
//! | Effect | Ids |
//! |--------|-----|
//! | Delay | 100.. |
//! | ChorusFlanger | 200.. |
//! | WahWah | 300.. |
//! | AutoWah | 400.. |
//! | ResonantLowPass | 500.. |
//! | Compressor | 600.. |
//! | Distortion | 700.. |
//! | Reverb | 800.. |
//!
//! # Example
//!
//! ```rust
//! use resona_core::{KnobRange, KnobSet, ParamDescriptor, ParamId, ParamUnit, ParameterInfo};
//!
//! const PARAMS: [ParamDescriptor; 1] = [ParamDescriptor::new(
//!     ParamId(1),
//!     "Gain",
//!     "Gain",
//!     ParamUnit::Decibels,
//!     KnobRange::linear(-24.0, 24.0),
//!     0.0,
//! )];
//!
//! struct Gain {
//!     knobs: KnobSet<1>,
//!     gain_db: f32,
//! }
//!
//! resona_core::impl_params! {
//!     Gain, this {
//!         [0] |db| this.gain_db = db;
//!     }
//! }
//!
//! let mut g = Gain { knobs: KnobSet::new(&PARAMS), gain_db: 0.0 };
//! assert!(g.set_parameter(ParamId(1), 0.75));
//! assert_eq!(g.gain_db, 12.0);
//! assert_eq!(g.get_parameter(ParamId(1)), Some(0.75));
//! ```

use libm::roundf;

use crate::taper::KnobRange;

/// Stable parameter identifier used for host automation and presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub u32);

/// Display unit of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels.
    Decibels,
    /// Hertz.
    Hertz,
    /// Seconds.
    Seconds,
    /// Ratio (n:1).
    Ratio,
    /// Dimensionless.
    None,
}

impl ParamUnit {
    /// Suffix for display, including a leading space where needed.
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Seconds => " s",
            ParamUnit::Ratio => ":1",
            ParamUnit::None => "",
        }
    }
}

/// Static description of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Stable id for automation and presets.
    pub id: ParamId,
    /// Full display name.
    pub name: &'static str,
    /// Short name for small displays (at most 8 characters).
    pub short_name: &'static str,
    /// Display unit.
    pub unit: ParamUnit,
    /// Limits and taper.
    pub range: KnobRange,
    /// Default value in engineering units.
    pub default: f32,
    /// Number of discrete positions, or 0 for a continuous parameter.
    pub steps: u8,
}

impl ParamDescriptor {
    /// Continuous parameter.
    pub const fn new(
        id: ParamId,
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        range: KnobRange,
        default: f32,
    ) -> Self {
        Self {
            id,
            name,
            short_name,
            unit,
            range,
            default,
            steps: 0,
        }
    }

    /// Makes the parameter discrete with `steps` positions over the range.
    pub const fn stepped(mut self, steps: u8) -> Self {
        self.steps = steps;
        self
    }

    /// Knob position of the default value.
    pub fn default_knob(&self) -> f32 {
        self.range.to_knob(self.default)
    }

    /// Engineering value for a knob position, snapped for stepped params.
    pub fn to_value(&self, knob: f32) -> f32 {
        self.range.to_value(self.quantize(knob))
    }

    /// Knob position for an engineering value.
    pub fn to_knob(&self, value: f32) -> f32 {
        self.range.to_knob(value)
    }

    /// Index of the selected position for stepped params (0 for continuous).
    pub fn step_index(&self, knob: f32) -> usize {
        if self.steps < 2 {
            return 0;
        }
        let last = f32::from(self.steps - 1);
        roundf(knob.clamp(0.0, 1.0) * last) as usize
    }

    fn quantize(&self, knob: f32) -> f32 {
        if self.steps < 2 {
            knob
        } else {
            self.step_index(knob) as f32 / f32::from(self.steps - 1)
        }
    }
}

/// Knob-level parameter access.
///
/// `get_param` / `set_param` use table indices and normalized knobs.
/// The id-based methods are what hosts and presets use.
pub trait ParameterInfo {
    /// Number of parameters.
    fn param_count(&self) -> usize;

    /// Descriptor at `index`, or `None` past the end.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current knob position at `index` (0.0 for an unknown index).
    fn get_param(&self, index: usize) -> f32;

    /// Sets the knob at `index`. Knobs are clamped to `[0, 1]`;
    /// unknown indices are ignored.
    fn set_param(&mut self, index: usize, knob: f32);

    /// Table index of `id`.
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }

    /// Sets a knob by id. Returns `false` if the id is unknown.
    fn set_parameter(&mut self, id: ParamId, knob: f32) -> bool {
        match self.param_index_by_id(id) {
            Some(index) => {
                self.set_param(index, knob);
                true
            }
            None => false,
        }
    }

    /// Knob position by id.
    fn get_parameter(&self, id: ParamId) -> Option<f32> {
        self.param_index_by_id(id).map(|i| self.get_param(i))
    }

    /// Current engineering value at `index`.
    fn param_value(&self, index: usize) -> Option<f32> {
        self.param_info(index).map(|d| d.to_value(self.get_param(index)))
    }

    /// Sets the parameter at `index` from an engineering value, going
    /// through the inverse taper.
    fn set_param_value(&mut self, index: usize, value: f32) {
        if let Some(desc) = self.param_info(index) {
            self.set_param(index, desc.to_knob(value));
        }
    }
}

/// Stored knob positions for a fixed parameter table.
///
/// Keeps the exact knob a host last wrote, so reading it back is
/// bit-identical, and converts it to an engineering value on the way in.
#[derive(Debug, Clone)]
pub struct KnobSet<const N: usize> {
    descriptors: &'static [ParamDescriptor; N],
    knobs: [f32; N],
}

impl<const N: usize> KnobSet<N> {
    /// All knobs at their descriptor defaults.
    pub fn new(descriptors: &'static [ParamDescriptor; N]) -> Self {
        Self {
            descriptors,
            knobs: core::array::from_fn(|i| descriptors[i].default_knob()),
        }
    }

    /// The parameter table.
    pub fn descriptors(&self) -> &'static [ParamDescriptor; N] {
        self.descriptors
    }

    /// Descriptor at `index`.
    pub fn descriptor(&self, index: usize) -> Option<ParamDescriptor> {
        self.descriptors.get(index).copied()
    }

    /// Stores a clamped knob and returns its engineering value.
    ///
    /// Non-finite knobs and unknown indices are ignored and return `None`.
    pub fn set(&mut self, index: usize, knob: f32) -> Option<f32> {
        if !knob.is_finite() || index >= N {
            return None;
        }
        let knob = knob.clamp(0.0, 1.0);
        self.knobs[index] = knob;
        Some(self.descriptors[index].to_value(knob))
    }

    /// Stored knob (0.0 for an unknown index).
    pub fn get(&self, index: usize) -> f32 {
        self.knobs.get(index).copied().unwrap_or(0.0)
    }

    /// Engineering value of the stored knob.
    pub fn value(&self, index: usize) -> f32 {
        self.descriptors
            .get(index)
            .map_or(0.0, |d| d.to_value(self.knobs[index]))
    }
}

/// Implements [`ParameterInfo`] for a type holding its knobs in a
/// `knobs: KnobSet<N>` field.
///
/// Counts, descriptors and readback come from the `KnobSet`. Each arm
/// receives the engineering value of a freshly stored knob and applies it,
/// with `$this` bound to `&mut Self`. Indices without an arm only store
/// the knob.
///
/// ```rust,ignore
/// resona_core::impl_params! {
///     Delay, this {
///         [0] |mix| this.mix.set_target(mix);
///         [2] |seconds| this.time.set_target(seconds);
///     }
/// }
/// ```
#[macro_export]
macro_rules! impl_params {
    ($ty:ty, $this:ident {
        $( [$index:literal] |$value:pat_param| $apply:expr; )*
    }) => {
        impl $crate::ParameterInfo for $ty {
            fn param_count(&self) -> usize {
                self.knobs.descriptors().len()
            }

            fn param_info(&self, index: usize) -> Option<$crate::ParamDescriptor> {
                self.knobs.descriptor(index)
            }

            fn get_param(&self, index: usize) -> f32 {
                self.knobs.get(index)
            }

            fn set_param(&mut self, index: usize, knob: f32) {
                let Some(value) = self.knobs.set(index, knob) else {
                    return;
                };
                let $this = self;
                match index {
                    $( $index => {
                        let $value = value;
                        $apply;
                    } )*
                    _ => {}
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taper::Taper;

    const TABLE: [ParamDescriptor; 3] = [
        ParamDescriptor::new(
            ParamId(10),
            "Cutoff",
            "Fc",
            ParamUnit::Hertz,
            KnobRange::exponential(50.0, 5000.0),
            500.0,
        ),
        ParamDescriptor::new(
            ParamId(11),
            "Mix",
            "Mix",
            ParamUnit::None,
            KnobRange::linear(0.0, 1.0),
            0.25,
        ),
        ParamDescriptor::new(
            ParamId(12),
            "Mode",
            "Mode",
            ParamUnit::None,
            KnobRange::new(0.0, 2.0, Taper::LINEAR),
            0.0,
        )
        .stepped(3),
    ];

    struct Panel {
        knobs: KnobSet<3>,
        cutoff: f32,
        mode: usize,
    }

    impl Panel {
        fn new() -> Self {
            Self {
                knobs: KnobSet::new(&TABLE),
                cutoff: 0.0,
                mode: 0,
            }
        }
    }

    crate::impl_params! {
        Panel, this {
            [0] |hz| this.cutoff = hz;
            [2] |_| this.mode = TABLE[2].step_index(this.knobs.get(2));
        }
    }

    #[test]
    fn test_defaults_map_to_knobs() {
        let set = KnobSet::new(&TABLE);
        assert!((set.get(0) - 0.5).abs() < 1e-6);
        assert_eq!(set.get(1), 0.25);
        assert!((set.value(0) - 500.0).abs() < 0.01);
    }

    #[test]
    fn test_set_clamps_and_ignores_garbage() {
        let mut set = KnobSet::new(&TABLE);
        assert_eq!(set.set(1, 1.5), Some(1.0));
        assert_eq!(set.get(1), 1.0);
        assert_eq!(set.set(1, f32::NAN), None);
        assert_eq!(set.get(1), 1.0);
        assert_eq!(set.set(7, 0.5), None);
        assert_eq!(set.get(7), 0.0);
    }

    #[test]
    fn test_stepped_quantization() {
        let d = TABLE[2];
        assert_eq!(d.step_index(0.0), 0);
        assert_eq!(d.step_index(0.4), 1);
        assert_eq!(d.step_index(0.9), 2);
        assert_eq!(d.to_value(0.6), 1.0);
        assert_eq!(TABLE[0].step_index(0.7), 0);
    }

    #[test]
    fn test_id_lookup() {
        let mut panel = Panel::new();
        assert_eq!(panel.param_index_by_id(ParamId(11)), Some(1));
        assert!(panel.set_parameter(ParamId(11), 0.125));
        assert_eq!(panel.get_parameter(ParamId(11)), Some(0.125));
        assert!(!panel.set_parameter(ParamId(99), 0.5));
        assert_eq!(panel.get_parameter(ParamId(99)), None);
    }

    #[test]
    fn test_knob_readback_is_bit_exact() {
        let mut panel = Panel::new();
        let knob = 0.123_456_79_f32;
        panel.set_param(0, knob);
        assert_eq!(panel.get_param(0).to_bits(), knob.to_bits());
    }

    #[test]
    fn test_param_value() {
        let mut panel = Panel::new();
        panel.set_param(0, 1.0);
        assert!((panel.param_value(0).unwrap() - 5000.0).abs() < 0.01);
        assert_eq!(panel.param_value(5), None);

        panel.set_param_value(1, 0.75);
        assert_eq!(panel.get_param(1), 0.75);
    }

    #[test]
    fn test_generated_impl_applies_values() {
        let mut panel = Panel::new();
        assert_eq!(panel.param_count(), 3);
        assert_eq!(panel.param_info(1).map(|d| d.id), Some(ParamId(11)));

        panel.set_param(0, 1.0);
        assert!((panel.cutoff - 5000.0).abs() < 0.01);
        panel.set_param(2, 0.9);
        assert_eq!(panel.mode, 2);

        // no arm: the knob is still stored
        panel.set_param(1, 0.5);
        assert_eq!(panel.get_param(1), 0.5);

        panel.set_param(0, f32::NAN);
        assert!((panel.cutoff - 5000.0).abs() < 0.01);
    }

    #[test]
    fn test_unit_suffix() {
        assert_eq!(ParamUnit::Decibels.suffix(), " dB");
        assert_eq!(ParamUnit::Seconds.suffix(), " s");
        assert_eq!(ParamUnit::None.suffix(), "");
    }
}
