//! Resonant low-pass filter effect, and the swept section the wah effects
//! are built on.

use resona_core::{
    Biquad, Effect, KnobRange, KnobSet, ParamDescriptor, ParamId, ParamUnit, SmoothedParam,
    db_to_linear, design,
};

/// Largest factor a sweep may scale the center by.
const SWEEP_LIMIT: f32 = 1.0e4;

/// Stereo resonant low-pass with a gain stage and a modulated center.
///
/// The center is `fc * sweep`, where `fc` is the smoothed knob and `sweep`
/// is a per-sample modulation factor slewed over 20 ms. The filter is
/// redesigned only when the resulting center or Q changed.
#[derive(Debug, Clone)]
pub(crate) struct SweptLowPass {
    gain: SmoothedParam,
    center: SmoothedParam,
    q: SmoothedParam,
    sweep: SmoothedParam,
    filters: [Biquad; 2],
    designed_center: f32,
    designed_q: f32,
    sample_rate: f32,
}

impl SweptLowPass {
    pub(crate) fn new(sample_rate: f32, gain_db: f32, center: f32, q: f32) -> Self {
        let mut section = Self {
            gain: SmoothedParam::with_config(db_to_linear(gain_db), sample_rate, 10.0),
            center: SmoothedParam::with_config(center, sample_rate, 20.0),
            q: SmoothedParam::with_config(q, sample_rate, 20.0),
            sweep: SmoothedParam::with_config(1.0, sample_rate, 20.0),
            filters: [Biquad::new(), Biquad::new()],
            designed_center: f32::NAN,
            designed_q: f32::NAN,
            sample_rate,
        };
        section.redesign(center, q);
        section
    }

    pub(crate) fn set_gain_db(&mut self, gain_db: f32) {
        self.gain.set_target(db_to_linear(gain_db));
    }

    pub(crate) fn set_center(&mut self, hz: f32) {
        self.center.set_target(hz);
    }

    pub(crate) fn set_q(&mut self, q: f32) {
        self.q.set_target(q);
    }

    pub(crate) fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.gain.set_sample_rate(sample_rate);
        self.center.set_sample_rate(sample_rate);
        self.q.set_sample_rate(sample_rate);
        self.sweep.set_sample_rate(sample_rate);
        self.redesign(self.center.get() * self.sweep.get(), self.q.get());
    }

    /// Center frequency of the current design in Hz.
    pub(crate) fn designed_center(&self) -> f32 {
        self.designed_center
    }

    /// Filters one frame with the center scaled by `sweep`.
    ///
    /// The factor is limited to `[1/SWEEP_LIMIT, SWEEP_LIMIT]`, which already
    /// covers every center the designer can reach.
    #[inline]
    pub(crate) fn process(&mut self, left: f32, right: f32, sweep: f32) -> (f32, f32) {
        self.sweep
            .set_target(sweep.clamp(1.0 / SWEEP_LIMIT, SWEEP_LIMIT));
        let center = self.center.advance() * self.sweep.advance();
        let q = self.q.advance();
        if center != self.designed_center || q != self.designed_q {
            self.redesign(center, q);
        }
        let gain = self.gain.advance();
        (
            self.filters[0].process(left * gain),
            self.filters[1].process(right * gain),
        )
    }

    pub(crate) fn reset(&mut self) {
        self.gain.snap_to_target();
        self.center.snap_to_target();
        self.q.snap_to_target();
        self.sweep.set_immediate(1.0);
        for filter in &mut self.filters {
            filter.reset();
        }
        self.redesign(self.center.get(), self.q.get());
    }

    fn redesign(&mut self, center: f32, q: f32) {
        let coefs = design::resonant_lowpass(center, q, self.sample_rate);
        for filter in &mut self.filters {
            filter.set_coefficients(coefs);
        }
        self.designed_center = center;
        self.designed_q = q;
    }
}

/// Parameter table for [`ResonantLowPass`].
pub const RESONANT_LOWPASS_PARAMS: [ParamDescriptor; 3] = [
    ParamDescriptor::new(
        ParamId(500),
        "Gain",
        "Gain",
        ParamUnit::Decibels,
        KnobRange::linear(-24.0, 24.0),
        0.0,
    ),
    ParamDescriptor::new(
        ParamId(501),
        "Cutoff",
        "Fc",
        ParamUnit::Hertz,
        KnobRange::exponential(50.0, 5000.0),
        1000.0,
    ),
    ParamDescriptor::new(
        ParamId(502),
        "Resonance",
        "Q",
        ParamUnit::None,
        KnobRange::exponential(0.25, 32.0),
        0.707,
    ),
];

/// Static resonant low-pass with an input gain stage.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Id | Name | Range | Default |
/// |-------|----|------|-------|---------|
/// | 0 | 500 | Gain | -24..24 dB | 0 |
/// | 1 | 501 | Cutoff | 50..5000 Hz (exp) | 1000 |
/// | 2 | 502 | Resonance | 0.25..32 (exp) | 0.707 |
///
/// # Example
///
/// ```rust
/// use resona_core::{Effect, ParameterInfo};
/// use resona_effects::ResonantLowPass;
///
/// let mut lp = ResonantLowPass::new(48000.0);
/// lp.set_param_value(1, 400.0);
/// lp.reset();
/// let (l, r) = lp.process_stereo(0.5, 0.5);
/// assert!(l.is_finite() && r.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct ResonantLowPass {
    knobs: KnobSet<3>,
    section: SweptLowPass,
}

impl ResonantLowPass {
    /// Creates the filter at its default settings.
    pub fn new(sample_rate: f32) -> Self {
        let knobs = KnobSet::new(&RESONANT_LOWPASS_PARAMS);
        let section = SweptLowPass::new(sample_rate, knobs.value(0), knobs.value(1), knobs.value(2));
        Self { knobs, section }
    }

    /// Center frequency the filter is currently designed at.
    pub fn cutoff(&self) -> f32 {
        self.section.designed_center()
    }
}

impl Effect for ResonantLowPass {
    fn prepare(&mut self, sample_rate: f32, _max_block_size: usize) {
        self.section.set_sample_rate(sample_rate);
        self.reset();
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        self.section.process(left, right, 1.0)
    }

    fn reset(&mut self) {
        self.section.reset();
    }
}

resona_core::impl_params! {
    ResonantLowPass, this {
        [0] |v| this.section.set_gain_db(v);
        [1] |v| this.section.set_center(v);
        [2] |v| this.section.set_q(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resona_core::ParameterInfo;
    use core::f32::consts::PI;

    fn sine_peak(lp: &mut ResonantLowPass, hz: f32, fs: f32) -> f32 {
        let mut peak = 0.0f32;
        for i in 0..(fs as usize) {
            let x = libm::sinf(2.0 * PI * hz * i as f32 / fs);
            let (l, _) = lp.process_stereo(x, x);
            if i > fs as usize / 2 {
                peak = peak.max(l.abs());
            }
        }
        peak
    }

    #[test]
    fn test_defaults() {
        let lp = ResonantLowPass::new(48000.0);
        assert!((lp.param_value(1).unwrap() - 1000.0).abs() < 0.1);
        assert!((lp.param_value(2).unwrap() - 0.707).abs() < 1e-3);
        assert!((lp.cutoff() - 1000.0).abs() < 0.1);
    }

    #[test]
    fn test_passes_low_and_cuts_high() {
        let fs = 48000.0;
        let mut lp = ResonantLowPass::new(fs);
        assert!((sine_peak(&mut lp, 100.0, fs) - 1.0).abs() < 0.02);
        lp.reset();
        assert!(sine_peak(&mut lp, 8000.0, fs) < 0.03);
    }

    #[test]
    fn test_resonance_peak_matches_q() {
        let fs = 48000.0;
        let mut lp = ResonantLowPass::new(fs);
        lp.set_param_value(2, 8.0);
        lp.reset();
        let peak = sine_peak(&mut lp, 1000.0, fs);
        assert!((peak - 8.0).abs() < 0.2, "peak {peak}");
    }

    #[test]
    fn test_gain_stage() {
        let mut lp = ResonantLowPass::new(48000.0);
        lp.set_param_value(0, -6.0);
        lp.reset();
        let mut y = 0.0;
        for _ in 0..4800 {
            y = lp.process_stereo(1.0, 1.0).0;
        }
        assert!((y - 0.501).abs() < 0.01);
    }

    #[test]
    fn test_ringing_decays_to_zero_not_subnormal() {
        let mut lp = ResonantLowPass::new(48000.0);
        lp.set_param_value(2, 8.0);
        lp.reset();
        lp.process_stereo(1.0, 1.0);
        let mut last = 1.0;
        for n in 0..400_000 {
            let (l, r) = lp.process_stereo(0.0, 0.0);
            assert!(!l.is_subnormal() && !r.is_subnormal(), "subnormal at sample {n}");
            last = l;
        }
        assert_eq!(last, 0.0);
    }

    #[test]
    fn test_cutoff_change_is_smoothed() {
        let mut lp = ResonantLowPass::new(48000.0);
        lp.set_param_value(1, 4000.0);
        lp.process_stereo(0.0, 0.0);
        let first = lp.cutoff();
        assert!(first > 1000.0 && first < 1100.0, "jumped to {first}");
        for _ in 0..48000 {
            lp.process_stereo(0.0, 0.0);
        }
        assert!((lp.cutoff() - 4000.0).abs() < 0.5);
    }
}
