//! Every effect at the ends of every knob, at low and high sample rates.
//!
//! Designer inputs above Nyquist, maximal feedback and maximal resonance
//! must all leave the output finite.

use resona_core::{Effect, EffectWithParams};
use resona_effects::{EffectKind, create};

const SAMPLE_RATES: [f32; 3] = [8000.0, 48000.0, 192_000.0];
const NUM_SAMPLES: usize = 2000;

fn assert_finite_output(effect: &mut Box<dyn EffectWithParams + Send>, label: &str) {
    for i in 0..NUM_SAMPLES {
        let input = match i % 3 {
            0 => 0.5,
            1 => -0.5,
            _ => 0.0,
        };
        let (l, r) = effect.process_stereo(input, -input);
        assert!(
            l.is_finite() && r.is_finite(),
            "{label}: non-finite output at sample {i}: ({l}, {r})"
        );
    }
}

fn run_with_knobs(kind: EffectKind, sample_rate: f32, knob: f32) {
    let mut effect = create(kind, sample_rate);
    for i in 0..effect.effect_param_count() {
        effect.effect_set_param(i, knob);
    }
    effect.prepare(sample_rate, 256);
    assert_finite_output(&mut effect, &format!("{kind} @ {sample_rate} Hz, knobs {knob}"));
}

#[test]
fn all_knobs_at_minimum() {
    for kind in EffectKind::ALL {
        for fs in SAMPLE_RATES {
            run_with_knobs(kind, fs, 0.0);
        }
    }
}

#[test]
fn all_knobs_at_maximum() {
    for kind in EffectKind::ALL {
        for fs in SAMPLE_RATES {
            run_with_knobs(kind, fs, 1.0);
        }
    }
}

#[test]
fn knobs_changed_while_running() {
    for kind in EffectKind::ALL {
        let mut effect = create(kind, 48000.0);
        effect.prepare(48000.0, 256);
        for step in 0..10 {
            let knob = if step % 2 == 0 { 1.0 } else { 0.0 };
            for i in 0..effect.effect_param_count() {
                effect.effect_set_param(i, knob);
            }
            assert_finite_output(&mut effect, &format!("{kind} step {step}"));
        }
    }
}

#[test]
fn out_of_range_knobs_are_clamped() {
    for kind in EffectKind::ALL {
        let mut effect = create(kind, 48000.0);
        for i in 0..effect.effect_param_count() {
            effect.effect_set_param(i, 7.0);
            assert_eq!(effect.effect_get_param(i), 1.0);
            effect.effect_set_param(i, f32::NAN);
            assert_eq!(effect.effect_get_param(i), 1.0);
            effect.effect_set_param(i, -3.0);
            assert_eq!(effect.effect_get_param(i), 0.0);
        }
    }
}
