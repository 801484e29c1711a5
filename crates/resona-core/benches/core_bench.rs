//! Criterion benchmarks for resona-core primitives
//!
//! Run with: cargo bench -p resona-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use resona_core::{
    Biquad, DelayLine, EnvelopeDetector, Lfo, Oversampler, ShelfFilter, SmoothedParam, design,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("Biquad");
    let coefs = design::resonant_lowpass(1000.0, 5.0, SAMPLE_RATE);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut biquad = Biquad::with_coefficients(coefs);
                b.iter(|| {
                    for &sample in &input {
                        black_box(biquad.process(black_box(sample)));
                    }
                });
            },
        );
    }

    // Per-sample redesign cost in the wah effects
    group.bench_function("design_resonant_lowpass", |b| {
        b.iter(|| {
            black_box(design::resonant_lowpass(
                black_box(1000.0),
                black_box(5.0),
                black_box(SAMPLE_RATE),
            ))
        });
    });
    group.bench_function("design_parametric", |b| {
        b.iter(|| {
            black_box(design::parametric(
                black_box(3000.0),
                black_box(-6.0),
                black_box(1.0),
                black_box(SAMPLE_RATE),
            ))
        });
    });

    group.finish();
}

fn bench_shelf(c: &mut Criterion) {
    let input = generate_test_signal(1024);
    c.bench_function("ShelfFilter/process_1024", |b| {
        let mut shelf = ShelfFilter::new();
        shelf.set_coefficients(design::shelf(3000.0, 6700.0, 3.5, 0.5, SAMPLE_RATE));
        b.iter(|| {
            for &sample in &input {
                black_box(shelf.process(black_box(sample)));
            }
        });
    });
}

fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("DelayLine");
    let input = generate_test_signal(1024);

    group.bench_function("read_interpolated_1024", |b| {
        let mut line = DelayLine::from_time(SAMPLE_RATE, 2.0);
        b.iter(|| {
            for &sample in &input {
                line.write(sample);
                black_box(line.read_interpolated(black_box(24000.5)));
                line.advance();
            }
        });
    });

    group.finish();
}

fn bench_modulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Modulation");
    let input = generate_test_signal(1024);

    group.bench_function("lfo_stereo_1024", |b| {
        let mut lfo = Lfo::new(SAMPLE_RATE);
        b.iter(|| {
            for _ in 0..1024 {
                black_box(lfo.next_stereo(black_box(1.0), 1.0, 0.25));
            }
        });
    });

    group.bench_function("envelope_1024", |b| {
        let mut env = EnvelopeDetector::with_times(SAMPLE_RATE, 0.001, 0.1);
        b.iter(|| {
            for &sample in &input {
                black_box(env.process(sample));
            }
        });
    });

    group.bench_function("smoothed_param_1024", |b| {
        let mut p = SmoothedParam::with_config(0.0, SAMPLE_RATE, 10.0);
        b.iter(|| {
            p.set_target(black_box(1.0));
            for _ in 0..1024 {
                black_box(p.advance());
            }
            p.set_immediate(0.0);
        });
    });

    group.finish();
}

fn bench_oversampler(c: &mut Criterion) {
    let input = generate_test_signal(256);
    c.bench_function("Oversampler8/hard_clip_256", |b| {
        let mut os = Oversampler::<8>::new(SAMPLE_RATE);
        b.iter(|| {
            for &sample in &input {
                black_box(os.process(black_box(sample) * 4.0, |s| s.clamp(-1.0, 1.0)));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_biquad,
    bench_shelf,
    bench_delay,
    bench_modulation,
    bench_oversampler
);
criterion_main!(benches);
