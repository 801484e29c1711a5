//! The processing interface every effect implements.
//!
//! An effect goes through three states: configured by
//! [`prepare`](Effect::prepare), processing, and cleared by
//! [`reset`](Effect::reset). Only `prepare` may allocate. Everything else
//! runs on the audio thread and must not block or allocate.
//!
//! Parameter access lives in [`ParameterInfo`](crate::ParameterInfo);
//! [`EffectWithParams`] combines both for boxed, dynamically chosen effects.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::string::String;

use crate::param_info::{ParamDescriptor, ParameterInfo};

/// Stereo real-time processor.
///
/// # Example
///
/// ```rust
/// use resona_core::Effect;
///
/// struct Swap;
///
/// impl Effect for Swap {
///     fn prepare(&mut self, _sample_rate: f32, _max_block_size: usize) {}
///
///     fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
///         (right, left)
///     }
///
///     fn reset(&mut self) {}
/// }
///
/// let mut swap = Swap;
/// assert_eq!(swap.process_stereo(1.0, 0.0), (0.0, 1.0));
/// ```
pub trait Effect {
    /// Configures the effect for a sample rate and the largest block it
    /// will be asked to process. Sizes buffers and zeroes all state.
    ///
    /// Called between streams, never from the audio callback.
    fn prepare(&mut self, sample_rate: f32, max_block_size: usize);

    /// Processes one stereo frame.
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32);

    /// Processes a block of stereo frames.
    ///
    /// The four slices must have the same length; extra samples in longer
    /// slices are left untouched.
    fn process_block(
        &mut self,
        left_in: &[f32],
        right_in: &[f32],
        left_out: &mut [f32],
        right_out: &mut [f32],
    ) {
        debug_assert_eq!(left_in.len(), right_in.len());
        debug_assert_eq!(left_in.len(), left_out.len());
        debug_assert_eq!(left_in.len(), right_out.len());
        let frames = left_in
            .iter()
            .zip(right_in)
            .zip(left_out.iter_mut().zip(right_out.iter_mut()));
        for ((&l, &r), (out_l, out_r)) in frames {
            let (y_l, y_r) = self.process_stereo(l, r);
            *out_l = y_l;
            *out_r = y_r;
        }
    }

    /// Processes a block in place.
    fn process_block_inplace(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len());
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (y_l, y_r) = self.process_stereo(*l, *r);
            *l = y_l;
            *r = y_r;
        }
    }

    /// Zeroes filter and delay state without deallocating. Parameters keep
    /// their values; smoothers jump to their targets.
    fn reset(&mut self);

    /// Processing latency in samples.
    fn latency_samples(&self) -> usize {
        0
    }
}

/// [`Effect`] plus [`ParameterInfo`] behind one vtable.
///
/// Implemented for every type that has both, so registries can hand out
/// `Box<dyn EffectWithParams + Send>` and still reach the parameters.
pub trait EffectWithParams: Effect {
    /// Number of parameters.
    fn effect_param_count(&self) -> usize;

    /// Descriptor at `index`.
    fn effect_param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Knob at `index`.
    fn effect_get_param(&self, index: usize) -> f32;

    /// Sets the knob at `index`.
    fn effect_set_param(&mut self, index: usize, knob: f32);

    /// Display text for the current value at `index`, e.g. `"-6.0 dB"`.
    fn effect_format_param(&self, index: usize) -> Option<String>;
}

impl<T: Effect + ParameterInfo> EffectWithParams for T {
    fn effect_param_count(&self) -> usize {
        self.param_count()
    }

    fn effect_param_info(&self, index: usize) -> Option<ParamDescriptor> {
        self.param_info(index)
    }

    fn effect_get_param(&self, index: usize) -> f32 {
        self.get_param(index)
    }

    fn effect_set_param(&mut self, index: usize, knob: f32) {
        self.set_param(index, knob);
    }

    fn effect_format_param(&self, index: usize) -> Option<String> {
        let desc = self.param_info(index)?;
        let value = desc.to_value(self.get_param(index));
        Some(alloc::format!("{:.2}{}", value, desc.unit.suffix()))
    }
}

impl ParameterInfo for dyn EffectWithParams + Send {
    fn param_count(&self) -> usize {
        self.effect_param_count()
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        self.effect_param_info(index)
    }

    fn get_param(&self, index: usize) -> f32 {
        self.effect_get_param(index)
    }

    fn set_param(&mut self, index: usize, knob: f32) {
        self.effect_set_param(index, knob);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param_info::{KnobSet, ParamId, ParamUnit};
    use crate::taper::KnobRange;

    #[cfg(not(feature = "std"))]
    use alloc::boxed::Box;

    const GAIN_PARAMS: [ParamDescriptor; 1] = [ParamDescriptor::new(
        ParamId(1),
        "Gain",
        "Gain",
        ParamUnit::Decibels,
        KnobRange::linear(-6.0, 6.0),
        0.0,
    )];

    struct Gain {
        knobs: KnobSet<1>,
        gain: f32,
        prepared_at: f32,
    }

    impl Gain {
        fn new() -> Self {
            Self {
                knobs: KnobSet::new(&GAIN_PARAMS),
                gain: 1.0,
                prepared_at: 0.0,
            }
        }
    }

    impl Effect for Gain {
        fn prepare(&mut self, sample_rate: f32, _max_block_size: usize) {
            self.prepared_at = sample_rate;
        }
        fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
            (left * self.gain, right * self.gain)
        }
        fn reset(&mut self) {}
    }

    impl ParameterInfo for Gain {
        fn param_count(&self) -> usize {
            1
        }
        fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
            self.knobs.descriptor(index)
        }
        fn get_param(&self, index: usize) -> f32 {
            self.knobs.get(index)
        }
        fn set_param(&mut self, index: usize, knob: f32) {
            if let Some(db) = self.knobs.set(index, knob) {
                self.gain = crate::math::db_to_linear(db);
            }
        }
    }

    #[test]
    fn test_block_matches_per_frame() {
        let mut fx = Gain::new();
        fx.gain = 2.0;
        let left = [1.0, 2.0, 3.0];
        let right = [-1.0, -2.0, -3.0];
        let mut out_l = [0.0; 3];
        let mut out_r = [0.0; 3];
        fx.process_block(&left, &right, &mut out_l, &mut out_r);
        assert_eq!(out_l, [2.0, 4.0, 6.0]);
        assert_eq!(out_r, [-2.0, -4.0, -6.0]);
    }

    #[test]
    fn test_block_inplace() {
        let mut fx = Gain::new();
        fx.gain = 0.5;
        let mut left = [2.0, 4.0];
        let mut right = [1.0, 0.0];
        fx.process_block_inplace(&mut left, &mut right);
        assert_eq!(left, [1.0, 2.0]);
        assert_eq!(right, [0.5, 0.0]);
    }

    #[test]
    fn test_boxed_dispatch() {
        let mut boxed: Box<dyn EffectWithParams + Send> = Box::new(Gain::new());
        boxed.prepare(96000.0, 256);
        assert_eq!(boxed.effect_param_count(), 1);
        assert!(boxed.set_parameter(ParamId(1), 0.0));
        assert_eq!(boxed.get_parameter(ParamId(1)), Some(0.0));
        let (l, _) = boxed.process_stereo(1.0, 1.0);
        assert!((l - 0.501).abs() < 1e-3);
        assert_eq!(boxed.effect_format_param(0).as_deref(), Some("-6.00 dB"));
        assert_eq!(boxed.latency_samples(), 0);
    }
}
