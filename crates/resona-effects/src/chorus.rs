//! Chorus and flanger sharing one modulated-delay engine.

use resona_core::{
    DelayLine, Effect, KnobRange, KnobSet, Lfo, ParamDescriptor, ParamId, ParamUnit, SmoothedParam,
    flush_denormal, wet_dry_mix,
};

/// Delay range selected by the Mode knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChorusMode {
    /// 5 to 30 ms.
    #[default]
    Chorus,
    /// 1 to 5 ms.
    Flanger,
}

impl ChorusMode {
    /// Shortest and longest modulated delay in seconds.
    pub const fn delay_range(self) -> (f32, f32) {
        match self {
            Self::Chorus => (0.005, 0.03),
            Self::Flanger => (0.001, 0.005),
        }
    }

    fn from_step(step: usize) -> Self {
        if step == 0 { Self::Chorus } else { Self::Flanger }
    }
}

/// Buffer length in seconds, covering the chorus range plus interpolation.
const LINE_SECONDS: f32 = 0.031;

/// Parameter table for [`ChorusFlanger`].
pub const CHORUS_FLANGER_PARAMS: [ParamDescriptor; 6] = [
    ParamDescriptor::new(
        ParamId(200),
        "Dry/Wet",
        "Mix",
        ParamUnit::None,
        KnobRange::linear(0.0, 1.0),
        0.5,
    ),
    ParamDescriptor::new(
        ParamId(201),
        "Feedback",
        "Fdbk",
        ParamUnit::None,
        KnobRange::linear(0.0, 0.98),
        0.5,
    ),
    ParamDescriptor::new(
        ParamId(202),
        "Depth",
        "Depth",
        ParamUnit::None,
        KnobRange::linear(0.0, 1.0),
        0.5,
    ),
    ParamDescriptor::new(
        ParamId(203),
        "Phase Offset",
        "Phase",
        ParamUnit::None,
        KnobRange::linear(0.0, 1.0),
        0.0,
    ),
    ParamDescriptor::new(
        ParamId(204),
        "Rate",
        "Rate",
        ParamUnit::Hertz,
        KnobRange::exponential(0.01, 20.0),
        1.0,
    ),
    ParamDescriptor::new(
        ParamId(205),
        "Mode",
        "Mode",
        ParamUnit::None,
        KnobRange::linear(0.0, 1.0),
        0.0,
    )
    .stepped(2),
];

/// Stereo chorus/flanger.
///
/// One LFO drives both channels. The left channel reads the LFO at its
/// phase, the right one at `phase * offset` (wrapped into `[0, 1)`). Each
/// LFO value in `[-depth, depth]` is mapped linearly onto the delay range of
/// the current [`ChorusMode`]:
///
/// ```text
/// d  = (lo + (lfo + 1) / 2 * (hi - lo)) * fs
/// line.write(x + fb)
/// wet = line.read(d)
/// fb  = wet * feedback
/// y   = x + (wet - x) * mix
/// ```
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Id | Name | Range | Default |
/// |-------|----|------|-------|---------|
/// | 0 | 200 | Dry/Wet | 0..1 | 0.5 |
/// | 1 | 201 | Feedback | 0..0.98 | 0.5 |
/// | 2 | 202 | Depth | 0..1 | 0.5 |
/// | 3 | 203 | Phase Offset | 0..1 | 0 |
/// | 4 | 204 | Rate | 0.01..20 Hz (exp) | 1 |
/// | 5 | 205 | Mode | Chorus, Flanger | Chorus |
///
/// # Example
///
/// ```rust
/// use resona_core::{Effect, ParameterInfo};
/// use resona_effects::{ChorusFlanger, ChorusMode};
///
/// let mut fx = ChorusFlanger::new(48000.0);
/// fx.set_param(5, 1.0);
/// assert_eq!(fx.mode(), ChorusMode::Flanger);
///
/// let (l, r) = fx.process_stereo(0.3, 0.3);
/// assert!(l.is_finite() && r.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct ChorusFlanger {
    knobs: KnobSet<6>,
    line_l: DelayLine,
    line_r: DelayLine,
    lfo: Lfo,
    mix: SmoothedParam,
    feedback: SmoothedParam,
    depth: SmoothedParam,
    offset: SmoothedParam,
    rate: SmoothedParam,
    mode: ChorusMode,
    feedback_l: f32,
    feedback_r: f32,
    sample_rate: f32,
}

impl ChorusFlanger {
    /// Creates the effect in chorus mode at its default settings.
    pub fn new(sample_rate: f32) -> Self {
        let knobs = KnobSet::new(&CHORUS_FLANGER_PARAMS);
        Self {
            line_l: DelayLine::from_time(sample_rate, LINE_SECONDS),
            line_r: DelayLine::from_time(sample_rate, LINE_SECONDS),
            lfo: Lfo::new(sample_rate),
            mix: SmoothedParam::with_config(knobs.value(0), sample_rate, 10.0),
            feedback: SmoothedParam::with_config(knobs.value(1), sample_rate, 10.0),
            depth: SmoothedParam::with_config(knobs.value(2), sample_rate, 10.0),
            offset: SmoothedParam::with_config(knobs.value(3), sample_rate, 10.0),
            rate: SmoothedParam::with_config(knobs.value(4), sample_rate, 10.0),
            mode: ChorusMode::Chorus,
            feedback_l: 0.0,
            feedback_r: 0.0,
            sample_rate,
            knobs,
        }
    }

    /// Selected delay range.
    pub fn mode(&self) -> ChorusMode {
        self.mode
    }

    /// LFO phase in `[0, 1)`.
    pub fn lfo_phase(&self) -> f32 {
        self.lfo.phase()
    }

    #[inline]
    fn delay_samples(&self, lfo: f32) -> f32 {
        let (lo, hi) = self.mode.delay_range();
        (lo + (lfo + 1.0) * 0.5 * (hi - lo)) * self.sample_rate
    }
}

impl Effect for ChorusFlanger {
    fn prepare(&mut self, sample_rate: f32, _max_block_size: usize) {
        self.sample_rate = sample_rate;
        let capacity = DelayLine::capacity_for(sample_rate, LINE_SECONDS);
        self.line_l.resize(capacity);
        self.line_r.resize(capacity);
        self.lfo.set_sample_rate(sample_rate);
        for param in [
            &mut self.mix,
            &mut self.feedback,
            &mut self.depth,
            &mut self.offset,
            &mut self.rate,
        ] {
            param.set_sample_rate(sample_rate);
        }
        self.reset();
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let mix = self.mix.advance();
        let feedback = self.feedback.advance();
        let depth = self.depth.advance();
        let offset = self.offset.advance();
        let rate = self.rate.advance();

        let (lfo_l, lfo_r) = self.lfo.next_stereo(rate, depth, offset);
        let delay_l = self.delay_samples(lfo_l);
        let delay_r = self.delay_samples(lfo_r);

        self.line_l.write(flush_denormal(left + self.feedback_l));
        self.line_r.write(flush_denormal(right + self.feedback_r));
        let wet_l = self.line_l.read_interpolated(delay_l);
        let wet_r = self.line_r.read_interpolated(delay_r);
        self.feedback_l = wet_l * feedback;
        self.feedback_r = wet_r * feedback;
        self.line_l.advance();
        self.line_r.advance();

        (wet_dry_mix(left, wet_l, mix), wet_dry_mix(right, wet_r, mix))
    }

    fn reset(&mut self) {
        self.line_l.clear();
        self.line_r.clear();
        self.lfo.reset();
        self.feedback_l = 0.0;
        self.feedback_r = 0.0;
        self.mix.snap_to_target();
        self.feedback.snap_to_target();
        self.depth.snap_to_target();
        self.offset.snap_to_target();
        self.rate.snap_to_target();
    }
}

resona_core::impl_params! {
    ChorusFlanger, this {
        [0] |v| this.mix.set_target(v);
        [1] |v| this.feedback.set_target(v);
        [2] |v| this.depth.set_target(v);
        [3] |v| this.offset.set_target(v);
        [4] |v| this.rate.set_target(v);
        [5] |_| this.mode = ChorusMode::from_step(CHORUS_FLANGER_PARAMS[5].step_index(this.knobs.get(5)));
    }
}
