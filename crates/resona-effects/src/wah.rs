//! Wah effects: a resonant low-pass swept in octaves.
//!
//! Both effects scale the center frequency by a power of the Depth knob:
//!
//! - [`WahWah`]: `fc * depth^(0.5 * lfo)` with a sine LFO in `[-1, 1]`,
//!   so the sweep spans `fc / sqrt(depth) ..= fc * sqrt(depth)`.
//! - [`AutoWah`]: `fc * depth^level`, where `level` is the input level
//!   times the Sensitivity knob. Louder playing opens the filter further.
//!
//! Sweeping in the log domain makes equal modulation steps equal musical
//! intervals.

use libm::powf;
use resona_core::{
    Effect, EnvelopeDetector, KnobRange, KnobSet, Lfo, ParamDescriptor, ParamId, ParamUnit,
    SmoothedParam,
};

use crate::filter::SweptLowPass;

/// Detector attack for [`AutoWah`] in seconds.
const AUTO_WAH_ATTACK: f32 = 0.01;
/// Detector release for [`AutoWah`] in seconds.
const AUTO_WAH_RELEASE: f32 = 0.2;

/// Parameter table for [`WahWah`].
pub const WAH_WAH_PARAMS: [ParamDescriptor; 5] = [
    ParamDescriptor::new(
        ParamId(300),
        "Gain",
        "Gain",
        ParamUnit::Decibels,
        KnobRange::linear(-24.0, 24.0),
        0.0,
    ),
    ParamDescriptor::new(
        ParamId(301),
        "Center",
        "Fc",
        ParamUnit::Hertz,
        KnobRange::exponential(50.0, 5000.0),
        1000.0,
    ),
    ParamDescriptor::new(
        ParamId(302),
        "Resonance",
        "Q",
        ParamUnit::None,
        KnobRange::exponential(0.25, 32.0),
        5.0,
    ),
    ParamDescriptor::new(
        ParamId(303),
        "Rate",
        "Rate",
        ParamUnit::Hertz,
        KnobRange::exponential(0.01, 10.0),
        1.0,
    ),
    ParamDescriptor::new(
        ParamId(304),
        "Depth",
        "Depth",
        ParamUnit::Ratio,
        KnobRange::exponential(0.01, 100.0),
        1.0,
    ),
];

/// Parameter table for [`AutoWah`].
pub const AUTO_WAH_PARAMS: [ParamDescriptor; 5] = [
    ParamDescriptor::new(
        ParamId(400),
        "Gain",
        "Gain",
        ParamUnit::Decibels,
        KnobRange::linear(-24.0, 24.0),
        0.0,
    ),
    ParamDescriptor::new(
        ParamId(401),
        "Center",
        "Fc",
        ParamUnit::Hertz,
        KnobRange::exponential(50.0, 5000.0),
        1000.0,
    ),
    ParamDescriptor::new(
        ParamId(402),
        "Resonance",
        "Q",
        ParamUnit::None,
        KnobRange::exponential(0.25, 32.0),
        5.0,
    ),
    ParamDescriptor::new(
        ParamId(403),
        "Sensitivity",
        "Sens",
        ParamUnit::Ratio,
        KnobRange::exponential(0.01, 100.0),
        1.0,
    ),
    ParamDescriptor::new(
        ParamId(404),
        "Depth",
        "Depth",
        ParamUnit::Ratio,
        KnobRange::exponential(0.01, 100.0),
        1.0,
    ),
];

/// LFO-swept wah.
///
/// Each instance owns its oscillator, so two wahs never share a phase.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Id | Name | Range | Default |
/// |-------|----|------|-------|---------|
/// | 0 | 300 | Gain | -24..24 dB | 0 |
/// | 1 | 301 | Center | 50..5000 Hz (exp) | 1000 |
/// | 2 | 302 | Resonance | 0.25..32 (exp) | 5 |
/// | 3 | 303 | Rate | 0.01..10 Hz (exp) | 1 |
/// | 4 | 304 | Depth | 0.01..100 (exp) | 1 |
#[derive(Debug, Clone)]
pub struct WahWah {
    knobs: KnobSet<5>,
    section: SweptLowPass,
    lfo: Lfo,
    rate: SmoothedParam,
    depth: SmoothedParam,
}

impl WahWah {
    /// Creates a wah at its default settings.
    pub fn new(sample_rate: f32) -> Self {
        let knobs = KnobSet::new(&WAH_WAH_PARAMS);
        Self {
            section: SweptLowPass::new(sample_rate, knobs.value(0), knobs.value(1), knobs.value(2)),
            lfo: Lfo::new(sample_rate),
            rate: SmoothedParam::with_config(knobs.value(3), sample_rate, 10.0),
            depth: SmoothedParam::with_config(knobs.value(4), sample_rate, 10.0),
            knobs,
        }
    }

    /// Center frequency of the current filter design in Hz.
    pub fn current_center(&self) -> f32 {
        self.section.designed_center()
    }

    /// LFO phase in `[0, 1)`.
    pub fn lfo_phase(&self) -> f32 {
        self.lfo.phase()
    }
}

impl Effect for WahWah {
    fn prepare(&mut self, sample_rate: f32, _max_block_size: usize) {
        self.section.set_sample_rate(sample_rate);
        self.lfo.set_sample_rate(sample_rate);
        self.rate.set_sample_rate(sample_rate);
        self.depth.set_sample_rate(sample_rate);
        self.reset();
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let rate = self.rate.advance();
        let depth = self.depth.advance();
        let lfo = self.lfo.next(rate, 1.0);
        self.section.process(left, right, powf(depth, 0.5 * lfo))
    }

    fn reset(&mut self) {
        self.section.reset();
        self.lfo.reset();
        self.rate.snap_to_target();
        self.depth.snap_to_target();
    }
}

resona_core::impl_params! {
    WahWah, this {
        [0] |v| this.section.set_gain_db(v);
        [1] |v| this.section.set_center(v);
        [2] |v| this.section.set_q(v);
        [3] |v| this.rate.set_target(v);
        [4] |v| this.depth.set_target(v);
    }
}

/// Level-swept wah.
///
/// The detector follows `(|l| + |r|) / 2` with 10 ms attack and 200 ms
/// release.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Id | Name | Range | Default |
/// |-------|----|------|-------|---------|
/// | 0 | 400 | Gain | -24..24 dB | 0 |
/// | 1 | 401 | Center | 50..5000 Hz (exp) | 1000 |
/// | 2 | 402 | Resonance | 0.25..32 (exp) | 5 |
/// | 3 | 403 | Sensitivity | 0.01..100 (exp) | 1 |
/// | 4 | 404 | Depth | 0.01..100 (exp) | 1 |
///
/// # Example
///
/// ```rust
/// use resona_core::{Effect, ParameterInfo};
/// use resona_effects::AutoWah;
///
/// let mut wah = AutoWah::new(48000.0);
/// wah.set_param_value(4, 16.0);
/// wah.reset();
///
/// let quiet = wah.current_center();
/// for _ in 0..4800 {
///     wah.process_stereo(0.8, 0.8);
/// }
/// assert!(wah.current_center() > 2.0 * quiet);
/// ```
#[derive(Debug, Clone)]
pub struct AutoWah {
    knobs: KnobSet<5>,
    section: SweptLowPass,
    detector: EnvelopeDetector,
    sensitivity: SmoothedParam,
    depth: SmoothedParam,
}

impl AutoWah {
    /// Creates an auto-wah at its default settings.
    pub fn new(sample_rate: f32) -> Self {
        let knobs = KnobSet::new(&AUTO_WAH_PARAMS);
        Self {
            section: SweptLowPass::new(sample_rate, knobs.value(0), knobs.value(1), knobs.value(2)),
            detector: EnvelopeDetector::with_times(sample_rate, AUTO_WAH_ATTACK, AUTO_WAH_RELEASE),
            sensitivity: SmoothedParam::with_config(knobs.value(3), sample_rate, 10.0),
            depth: SmoothedParam::with_config(knobs.value(4), sample_rate, 10.0),
            knobs,
        }
    }

    /// Center frequency of the current filter design in Hz.
    pub fn current_center(&self) -> f32 {
        self.section.designed_center()
    }

    /// Detector level in linear units.
    pub fn level(&self) -> f32 {
        self.detector.level()
    }
}

impl Effect for AutoWah {
    fn prepare(&mut self, sample_rate: f32, _max_block_size: usize) {
        self.section.set_sample_rate(sample_rate);
        self.detector.set_sample_rate(sample_rate);
        self.sensitivity.set_sample_rate(sample_rate);
        self.depth.set_sample_rate(sample_rate);
        self.reset();
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let sensitivity = self.sensitivity.advance();
        let depth = self.depth.advance();
        let level = self.detector.process(0.5 * (left.abs() + right.abs())) * sensitivity;
        self.section.process(left, right, powf(depth, level))
    }

    fn reset(&mut self) {
        self.section.reset();
        self.detector.reset();
        self.sensitivity.snap_to_target();
        self.depth.snap_to_target();
    }
}

resona_core::impl_params! {
    AutoWah, this {
        [0] |v| this.section.set_gain_db(v);
        [1] |v| this.section.set_center(v);
        [2] |v| this.section.set_q(v);
        [3] |v| this.sensitivity.set_target(v);
        [4] |v| this.depth.set_target(v);
    }
}
