//! Property-based tests across every effect in the registry.

use proptest::prelude::*;
use resona_core::{Effect, EffectWithParams, ParameterInfo};
use resona_effects::{
    ChorusFlanger, Compressor, Delay, EffectKind, LINE_COUNT, MixingMatrix, create,
};

fn any_kind() -> impl Strategy<Value = EffectKind> {
    (0..EffectKind::ALL.len()).prop_map(|i| EffectKind::ALL[i])
}

fn apply_knobs(effect: &mut Box<dyn EffectWithParams + Send>, knobs: &[f32; 16]) {
    for i in 0..effect.effect_param_count() {
        effect.effect_set_param(i, knobs[i % 16]);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any knob settings and any input in [-1, 1] give finite output.
    #[test]
    fn every_effect_stays_finite(
        kind in any_kind(),
        knobs in prop::array::uniform16(0.0f32..=1.0),
        input in prop::array::uniform32(-1.0f32..=1.0),
    ) {
        let mut effect = create(kind, 48000.0);
        apply_knobs(&mut effect, &knobs);
        effect.prepare(48000.0, 32);
        for _ in 0..8 {
            for &x in &input {
                let (l, r) = effect.process_stereo(x, -x);
                prop_assert!(l.is_finite() && r.is_finite(), "{} gave ({}, {})", kind, l, r);
            }
        }
    }

    /// The knob read back is bit-identical to the (clamped) knob written.
    #[test]
    fn knobs_read_back_exactly(
        kind in any_kind(),
        knob in -0.5f32..1.5,
        index in 0usize..9,
    ) {
        let mut effect = create(kind, 48000.0);
        let index = index % effect.effect_param_count();
        effect.effect_set_param(index, knob);
        prop_assert_eq!(effect.effect_get_param(index).to_bits(), knob.clamp(0.0, 1.0).to_bits());
    }

    /// Id-based access agrees with index-based access.
    #[test]
    fn parameter_ids_address_the_same_knob(kind in any_kind(), knob in 0.0f32..=1.0) {
        let mut effect = create(kind, 44100.0);
        let last = effect.param_count() - 1;
        let id = effect.param_info(last).unwrap().id;
        prop_assert!(effect.set_parameter(id, knob));
        prop_assert_eq!(effect.get_parameter(id), Some(effect.get_param(last)));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// An orthonormal matrix preserves vector energy.
    #[test]
    fn hadamard_preserves_energy(x in prop::array::uniform12(-1.0f32..=1.0)) {
        let m = MixingMatrix::hadamard();
        let input_energy: f32 = x.iter().map(|v| v * v).sum();
        let output_energy: f32 = (0..LINE_COUNT)
            .map(|i| {
                let y: f32 = (0..LINE_COUNT).map(|j| m.get(i, j) * x[j]).sum();
                y * y
            })
            .sum();
        prop_assert!((output_energy - input_energy).abs() <= 1e-4 * (1.0 + input_energy));
    }

    /// With the mix at zero the delay is an exact passthrough.
    #[test]
    fn dry_delay_is_transparent(
        input in prop::collection::vec(-1.0f32..=1.0, 1..256),
        feedback in 0.0f32..=1.0,
    ) {
        let mut delay = Delay::new(8000.0);
        delay.set_param(0, 0.0);
        delay.set_param(1, feedback);
        delay.set_param(2, 0.001);
        delay.reset();
        for &x in &input {
            prop_assert_eq!(delay.process_stereo(x, x), (x, x));
        }
    }

    /// Feedback below one keeps a chorus bounded by the geometric sum.
    #[test]
    fn chorus_output_is_bounded(
        input in prop::collection::vec(-1.0f32..=1.0, 64..512),
        knobs in prop::array::uniform6(0.0f32..=1.0),
    ) {
        let mut fx = ChorusFlanger::new(8000.0);
        for (i, &k) in knobs.iter().enumerate() {
            fx.set_param(i, k);
        }
        fx.reset();
        for &x in &input {
            let (l, r) = fx.process_stereo(x, x);
            prop_assert!(l.abs() <= 50.0 && r.abs() <= 50.0);
        }
    }

    /// A limiter with unity gains never pushes the output above the input.
    #[test]
    fn compressor_never_boosts(
        input in prop::collection::vec(-1.0f32..=1.0, 1..512),
        threshold in 0.0f32..=1.0,
        ratio in 0.0f32..=1.0,
    ) {
        let mut comp = Compressor::new(48000.0);
        comp.set_param(2, threshold);
        comp.set_param(6, ratio);
        comp.reset();
        for &x in &input {
            let (l, _) = comp.process_stereo(x, x);
            prop_assert!(l.abs() <= x.abs() * (1.0 + 1e-6));
        }
    }
}
