//! End-to-end scenarios with exactly predictable results.

use resona_core::{Effect, Lfo, ParameterInfo};
use resona_effects::{Compressor, Delay, LINE_COUNT, MixingMatrix, Reverb};

#[test]
fn pure_delay_moves_impulse_by_half_a_second() {
    let fs = 44100.0;
    let mut delay = Delay::new(fs);
    delay.set_param_value(0, 1.0);
    delay.set_param_value(1, 0.0);
    delay.set_param_value(2, 0.5);
    delay.prepare(fs, 512);

    let mut left = vec![0.0f32; 30_000];
    let mut right = vec![0.0f32; 30_000];
    left[0] = 1.0;
    right[0] = 1.0;
    delay.process_block_inplace(&mut left, &mut right);

    for (n, (&l, &r)) in left.iter().zip(&right).enumerate() {
        let expected = if n == 22050 { 1.0 } else { 0.0 };
        assert_eq!(l, expected, "left sample {n}");
        assert_eq!(r, expected, "right sample {n}");
    }
}

#[test]
fn limiter_settles_six_db_down() {
    let fs = 48000.0;
    let mut comp = Compressor::new(fs);
    comp.set_param(2, 0.8); // threshold -6 dB, ratio at limiter
    comp.prepare(fs, 256);

    let mut left = vec![1.0f32; 4800];
    let mut right = vec![1.0f32; 4800];
    comp.process_block_inplace(&mut left, &mut right);

    let settled = left[4799];
    assert!((settled - 0.501).abs() < 1e-3, "settled at {settled}");
    assert!((right[4799] - settled).abs() < 1e-7);
}

#[test]
fn feedback_matrix_is_orthonormal() {
    let m = MixingMatrix::hadamard();
    for i in 0..LINE_COUNT {
        for j in 0..LINE_COUNT {
            let dot: f32 = (0..LINE_COUNT).map(|k| m.get(i, k) * m.get(j, k)).sum();
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!((dot - expected).abs() < 1e-3, "(M M^T)[{i}][{j}] = {dot}");
        }
    }
}

#[test]
fn identity_network_only_decays_through_shelves() {
    let fs = 44100.0;
    let mut reverb = Reverb::with_matrix(fs, MixingMatrix::identity());
    reverb.set_param_value(3, 1.0);
    reverb.prepare(fs, 64);

    // even lines carry the left impulse; line 0 (2023 samples) is the shortest
    let mut out = Vec::new();
    for n in 0..4200 {
        let (l, r) = reverb.process_stereo(if n == 0 { 1.0 } else { 0.0 }, 0.0);
        assert_eq!(r, 0.0);
        out.push(l);
    }
    let first = out.iter().position(|l| l.abs() > 1e-3);
    assert_eq!(first, Some(2023));
    assert!(out[4046].abs() > 0.0);
    assert!(out[4046].abs() < out[2023].abs());
}

#[test]
fn lfo_wraps_after_one_period() {
    let mut lfo = Lfo::new(100.0);
    let samples: Vec<f32> = (0..100).map(|_| lfo.next(1.0, 1.0)).collect();

    assert_eq!(samples[0], 0.0);
    assert!((samples[25] - 1.0).abs() < 1e-4);
    assert!((samples[75] + 1.0).abs() < 1e-4);

    let phase = lfo.phase();
    let distance = phase.min(1.0 - phase);
    assert!(distance < 1e-4, "phase after one period: {phase}");
    assert!(lfo.next(1.0, 1.0).abs() < 1e-3);
}
