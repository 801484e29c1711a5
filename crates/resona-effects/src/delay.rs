//! Feedback echo with a smoothed delay time.

use resona_core::{
    DelayLine, Effect, KnobRange, KnobSet, ParamDescriptor, ParamId, ParamUnit, SmoothedParam,
    flush_denormal, wet_dry_mix,
};

/// Longest delay time in seconds.
pub const MAX_DELAY_SECONDS: f32 = 2.0;

/// Parameter table for [`Delay`].
pub const DELAY_PARAMS: [ParamDescriptor; 3] = [
    ParamDescriptor::new(
        ParamId(100),
        "Dry/Wet",
        "Mix",
        ParamUnit::None,
        KnobRange::linear(0.0, 1.0),
        0.5,
    ),
    ParamDescriptor::new(
        ParamId(101),
        "Feedback",
        "Fdbk",
        ParamUnit::None,
        KnobRange::linear(0.0, 0.98),
        0.5,
    ),
    ParamDescriptor::new(
        ParamId(102),
        "Delay Time",
        "Time",
        ParamUnit::Seconds,
        KnobRange::linear(0.0, MAX_DELAY_SECONDS),
        0.5,
    ),
];

/// Stereo feedback delay.
///
/// Per channel and sample:
///
/// ```text
/// line.write(x + fb)          // fb from the previous sample
/// wet = line.read(time * fs)  // linear interpolation
/// fb  = wet * feedback
/// y   = x + (wet - x) * mix
/// ```
///
/// Feedback re-enters on the following sample, so repeats are spaced
/// `time * fs + 1` samples apart.
///
/// The delay time glides over 50 ms, so sweeping the knob produces a
/// pitch bend rather than clicks.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Id | Name | Range | Default |
/// |-------|----|------|-------|---------|
/// | 0 | 100 | Dry/Wet | 0..1 | 0.5 |
/// | 1 | 101 | Feedback | 0..0.98 | 0.5 |
/// | 2 | 102 | Delay Time | 0..2 s | 0.5 |
///
/// # Example
///
/// ```rust
/// use resona_core::{Effect, ParameterInfo};
/// use resona_effects::Delay;
///
/// let mut delay = Delay::new(44100.0);
/// delay.set_param_value(2, 0.25);
/// delay.set_param_value(0, 1.0);
/// delay.reset();
///
/// let (l, _) = delay.process_stereo(1.0, 1.0);
/// assert_eq!(l, 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Delay {
    knobs: KnobSet<3>,
    line_l: DelayLine,
    line_r: DelayLine,
    mix: SmoothedParam,
    feedback: SmoothedParam,
    /// Seconds
    time: SmoothedParam,
    feedback_l: f32,
    feedback_r: f32,
    sample_rate: f32,
}

impl Delay {
    /// Creates a delay at its default settings with buffers for
    /// [`MAX_DELAY_SECONDS`].
    pub fn new(sample_rate: f32) -> Self {
        let knobs = KnobSet::new(&DELAY_PARAMS);
        Self {
            line_l: DelayLine::from_time(sample_rate, MAX_DELAY_SECONDS),
            line_r: DelayLine::from_time(sample_rate, MAX_DELAY_SECONDS),
            mix: SmoothedParam::with_config(knobs.value(0), sample_rate, 10.0),
            feedback: SmoothedParam::with_config(knobs.value(1), sample_rate, 10.0),
            time: SmoothedParam::with_config(knobs.value(2), sample_rate, 50.0),
            feedback_l: 0.0,
            feedback_r: 0.0,
            sample_rate,
            knobs,
        }
    }

    /// Current (smoothed) delay in samples.
    pub fn delay_samples(&self) -> f32 {
        self.time.get() * self.sample_rate
    }
}

impl Effect for Delay {
    fn prepare(&mut self, sample_rate: f32, _max_block_size: usize) {
        self.sample_rate = sample_rate;
        let capacity = DelayLine::capacity_for(sample_rate, MAX_DELAY_SECONDS);
        self.line_l.resize(capacity);
        self.line_r.resize(capacity);
        self.mix.set_sample_rate(sample_rate);
        self.feedback.set_sample_rate(sample_rate);
        self.time.set_sample_rate(sample_rate);
        self.reset();
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let mix = self.mix.advance();
        let feedback = self.feedback.advance();
        let delay = self.time.advance() * self.sample_rate;

        self.line_l.write(flush_denormal(left + self.feedback_l));
        self.line_r.write(flush_denormal(right + self.feedback_r));
        let wet_l = self.line_l.read_interpolated(delay);
        let wet_r = self.line_r.read_interpolated(delay);
        self.feedback_l = wet_l * feedback;
        self.feedback_r = wet_r * feedback;
        self.line_l.advance();
        self.line_r.advance();

        (wet_dry_mix(left, wet_l, mix), wet_dry_mix(right, wet_r, mix))
    }

    fn reset(&mut self) {
        self.line_l.clear();
        self.line_r.clear();
        self.feedback_l = 0.0;
        self.feedback_r = 0.0;
        self.mix.snap_to_target();
        self.feedback.snap_to_target();
        self.time.snap_to_target();
    }
}

resona_core::impl_params! {
    Delay, this {
        [0] |v| this.mix.set_target(v);
        [1] |v| this.feedback.set_target(v);
        [2] |v| this.time.set_target(v);
    }
}
