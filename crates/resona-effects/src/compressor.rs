//! Feed-forward compressor / limiter with a p-norm level detector.
//!
//! # Signal Flow
//!
//! ```text
//! in -> input gain -> (|l| + |r|) / 2 -> p-norm detector -> dB -> gain computer
//!                  \                                                    |
//!                   `-------------------- * gain * output gain <--------'
//! ```
//!
//! With the Ratio knob at its top (100) the gain computer is a brick-wall
//! limiter: `gain_db = min(0, threshold - level)`.

use resona_core::{
    DetectionMode, Effect, EnvelopeDetector, KnobRange, KnobSet, ParamDescriptor, ParamId,
    ParamUnit, SmoothedParam, db_to_linear, linear_to_db,
};

/// Ratios at or above this are treated as infinite.
pub const LIMITER_RATIO: f32 = 100.0;

/// Parameter table for [`Compressor`].
pub const COMPRESSOR_PARAMS: [ParamDescriptor; 7] = [
    ParamDescriptor::new(
        ParamId(600),
        "Input Gain",
        "In",
        ParamUnit::Decibels,
        KnobRange::linear(-30.0, 30.0),
        0.0,
    ),
    ParamDescriptor::new(
        ParamId(601),
        "Output Gain",
        "Out",
        ParamUnit::Decibels,
        KnobRange::linear(-30.0, 30.0),
        0.0,
    ),
    ParamDescriptor::new(
        ParamId(602),
        "Threshold",
        "Thresh",
        ParamUnit::Decibels,
        KnobRange::linear(-30.0, 0.0),
        -7.5,
    ),
    ParamDescriptor::new(
        ParamId(603),
        "Attack",
        "Attack",
        ParamUnit::Seconds,
        KnobRange::exponential(0.0001, 0.1),
        0.0001,
    ),
    ParamDescriptor::new(
        ParamId(604),
        "Release",
        "Release",
        ParamUnit::Seconds,
        KnobRange::exponential(0.05, 5.0),
        0.088_913_97,
    ),
    ParamDescriptor::new(
        ParamId(605),
        "Exponent",
        "Exp",
        ParamUnit::None,
        KnobRange::exponential(1.0, 10.0),
        1.0,
    ),
    ParamDescriptor::new(
        ParamId(606),
        "Ratio",
        "Ratio",
        ParamUnit::Ratio,
        KnobRange::exponential(1.0, LIMITER_RATIO),
        LIMITER_RATIO,
    ),
];

/// Static curve: dB in, gain change in dB out.
#[derive(Debug, Clone, Copy)]
struct GainComputer {
    threshold_db: f32,
    ratio: f32,
}

impl GainComputer {
    /// Reduction slope above threshold; exactly 1 for a limiter.
    #[inline]
    fn slope(&self) -> f32 {
        if self.ratio >= LIMITER_RATIO {
            1.0
        } else {
            1.0 - 1.0 / self.ratio.max(1.0)
        }
    }

    #[inline]
    fn compute_gain_db(&self, level_db: f32) -> f32 {
        let overshoot = level_db - self.threshold_db;
        if overshoot > 0.0 {
            -self.slope() * overshoot
        } else {
            0.0
        }
    }
}

/// Stereo-linked dynamics processor.
///
/// Attack, release and exponent go straight to the detector; gains,
/// threshold and ratio are smoothed over 10 ms.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Id | Name | Range | Default |
/// |-------|----|------|-------|---------|
/// | 0 | 600 | Input Gain | -30..30 dB | 0 |
/// | 1 | 601 | Output Gain | -30..30 dB | 0 |
/// | 2 | 602 | Threshold | -30..0 dB | -7.5 |
/// | 3 | 603 | Attack | 0.1..100 ms (exp) | 0.1 ms |
/// | 4 | 604 | Release | 0.05..5 s (exp) | 89 ms |
/// | 5 | 605 | Exponent | 1..10 (exp) | 1 |
/// | 6 | 606 | Ratio | 1..100 (exp) | 100 (limiter) |
///
/// # Example
///
/// ```rust
/// use resona_core::{Effect, ParameterInfo};
/// use resona_effects::Compressor;
///
/// let mut comp = Compressor::new(48000.0);
/// comp.set_param_value(2, -6.0);
/// comp.reset();
///
/// let mut out = 0.0;
/// for _ in 0..4800 {
///     out = comp.process_stereo(1.0, 1.0).0;
/// }
/// assert!((out - 0.501).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct Compressor {
    knobs: KnobSet<7>,
    detector: EnvelopeDetector,
    input_gain: SmoothedParam,
    output_gain: SmoothedParam,
    threshold_db: SmoothedParam,
    ratio: SmoothedParam,
    /// Last computed gain change in dB (never positive).
    last_gain_db: f32,
}

impl Compressor {
    /// Creates a limiter at -7.5 dB.
    pub fn new(sample_rate: f32) -> Self {
        let knobs = KnobSet::new(&COMPRESSOR_PARAMS);
        let mut detector = EnvelopeDetector::with_times(sample_rate, knobs.value(3), knobs.value(4));
        detector.set_mode(DetectionMode::PNorm(knobs.value(5)));
        Self {
            detector,
            input_gain: SmoothedParam::with_config(db_to_linear(knobs.value(0)), sample_rate, 10.0),
            output_gain: SmoothedParam::with_config(db_to_linear(knobs.value(1)), sample_rate, 10.0),
            threshold_db: SmoothedParam::with_config(knobs.value(2), sample_rate, 10.0),
            ratio: SmoothedParam::with_config(knobs.value(6), sample_rate, 10.0),
            last_gain_db: 0.0,
            knobs,
        }
    }

    /// Gain change applied to the last frame in dB (0 or negative).
    pub fn gain_reduction_db(&self) -> f32 {
        self.last_gain_db
    }

    /// Detector level after input gain, in linear units.
    pub fn level(&self) -> f32 {
        self.detector.level()
    }
}

impl Effect for Compressor {
    fn prepare(&mut self, sample_rate: f32, _max_block_size: usize) {
        self.detector.set_sample_rate(sample_rate);
        self.input_gain.set_sample_rate(sample_rate);
        self.output_gain.set_sample_rate(sample_rate);
        self.threshold_db.set_sample_rate(sample_rate);
        self.ratio.set_sample_rate(sample_rate);
        self.reset();
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let input_gain = self.input_gain.advance();
        let output_gain = self.output_gain.advance();
        let curve = GainComputer {
            threshold_db: self.threshold_db.advance(),
            ratio: self.ratio.advance(),
        };

        let (l, r) = (left * input_gain, right * input_gain);
        let level = self.detector.process((l.abs() + r.abs()) * 0.5);
        self.last_gain_db = curve.compute_gain_db(linear_to_db(level));

        let gain = db_to_linear(self.last_gain_db) * output_gain;
        (l * gain, r * gain)
    }

    fn reset(&mut self) {
        self.detector.reset();
        self.input_gain.snap_to_target();
        self.output_gain.snap_to_target();
        self.threshold_db.snap_to_target();
        self.ratio.snap_to_target();
        self.last_gain_db = 0.0;
    }
}

resona_core::impl_params! {
    Compressor, this {
        [0] |v| this.input_gain.set_target(db_to_linear(v));
        [1] |v| this.output_gain.set_target(db_to_linear(v));
        [2] |v| this.threshold_db.set_target(v);
        [3] |v| this.detector.set_attack(v);
        [4] |v| this.detector.set_release(v);
        [5] |v| this.detector.set_mode(DetectionMode::PNorm(v));
        [6] |v| this.ratio.set_target(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resona_core::ParameterInfo;

    fn settle(comp: &mut Compressor, level: f32) -> f32 {
        let mut out = 0.0;
        for _ in 0..48000 {
            out = comp.process_stereo(level, level).0;
        }
        out
    }

    #[test]
    fn test_defaults() {
        let comp = Compressor::new(48000.0);
        assert!((comp.get_param(4) - 0.125).abs() < 1e-4);
        assert!((comp.param_value(2).unwrap() + 7.5).abs() < 1e-5);
        assert!((comp.param_value(6).unwrap() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_gain_computer_slopes() {
        let limiter = GainComputer {
            threshold_db: -10.0,
            ratio: 100.0,
        };
        assert_eq!(limiter.compute_gain_db(-20.0), 0.0);
        assert_eq!(limiter.compute_gain_db(-4.0), -6.0);

        let four = GainComputer {
            threshold_db: -10.0,
            ratio: 4.0,
        };
        assert!((four.compute_gain_db(2.0) + 9.0).abs() < 1e-5);

        let unity = GainComputer {
            threshold_db: -10.0,
            ratio: 1.0,
        };
        assert_eq!(unity.compute_gain_db(0.0), 0.0);
    }

    #[test]
    fn test_limiter_holds_threshold() {
        let mut comp = Compressor::new(48000.0);
        comp.set_param(2, 0.8);
        comp.reset();
        let out = settle(&mut comp, 1.0);
        assert!((out - 0.501_187).abs() < 1e-3, "out {out}");
        assert!((comp.gain_reduction_db() + 6.0).abs() < 1e-3);
    }

    #[test]
    fn test_below_threshold_is_untouched() {
        let mut comp = Compressor::new(48000.0);
        let out = settle(&mut comp, 0.1);
        assert!((out - 0.1).abs() < 1e-6);
        assert_eq!(comp.gain_reduction_db(), 0.0);
    }

    #[test]
    fn test_ratio_two_halves_overshoot() {
        let mut comp = Compressor::new(48000.0);
        comp.set_param_value(2, -12.0);
        comp.set_param_value(6, 2.0);
        comp.reset();
        settle(&mut comp, 1.0);
        assert!((comp.gain_reduction_db() + 6.0).abs() < 0.01);
    }

    #[test]
    fn test_stereo_link_uses_mean_magnitude() {
        let mut comp = Compressor::new(48000.0);
        let (l, r) = {
            let mut frame = (0.0, 0.0);
            for _ in 0..48000 {
                frame = comp.process_stereo(0.8, -0.2);
            }
            frame
        };
        assert!((comp.level() - 0.5).abs() < 1e-4);
        assert!((l / r + 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_exponent_change_does_not_step_gain() {
        for (from, to) in [(1.0, 10.0), (10.0, 1.0), (1.0, 3.0)] {
            let mut comp = Compressor::new(48000.0);
            comp.set_param_value(5, from);
            comp.reset();
            settle(&mut comp, 0.5);

            comp.process_stereo(0.05, 0.05);
            let before = comp.gain_reduction_db();
            comp.set_param_value(5, to);
            comp.process_stereo(0.05, 0.05);
            let after = comp.gain_reduction_db();
            assert!(
                (after - before).abs() < 0.1,
                "exponent {from} -> {to}: {before} dB -> {after} dB"
            );
        }
    }

    #[test]
    fn test_gain_stages() {
        let mut comp = Compressor::new(48000.0);
        comp.set_param_value(0, -6.0);
        comp.set_param_value(1, 6.0);
        comp.reset();
        let out = settle(&mut comp, 0.2);
        assert!((out - 0.2).abs() < 1e-3);
    }
}
