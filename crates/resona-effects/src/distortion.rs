//! Oversampled clipping distortion with tone shaping on both sides.
//!
//! ```text
//! (l + r) / 2 -> drive -> input EQ -> [8x: anti-imaging LP -> clip -> anti-aliasing LP] -> output EQ -> level
//! ```
//!
//! The result is mono and sent to both outputs.

use resona_core::{
    Effect, KnobRange, KnobSet, Oversampler, ParamDescriptor, ParamId, ParamUnit, SmoothedParam,
    db_to_linear, mono_sum,
};

use crate::eq::ParametricSection;

/// Oversampling factor around the clipper.
pub const DISTORTION_OVERSAMPLING: usize = 8;

/// Transfer curve of the clipper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipShape {
    /// `clamp(x, -1, 1)`.
    #[default]
    Hard,
    /// `x / (1 + |x|)`.
    Soft,
}

impl ClipShape {
    /// Applies the curve to one sample.
    #[inline]
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Self::Hard => x.clamp(-1.0, 1.0),
            Self::Soft => x / (1.0 + x.abs()),
        }
    }
}

/// Parameter table for [`Distortion`].
pub const DISTORTION_PARAMS: [ParamDescriptor; 9] = [
    ParamDescriptor::new(
        ParamId(700),
        "Drive",
        "Drive",
        ParamUnit::Decibels,
        KnobRange::linear(-24.0, 24.0),
        0.0,
    ),
    ParamDescriptor::new(
        ParamId(701),
        "Level",
        "Level",
        ParamUnit::Decibels,
        KnobRange::linear(-48.0, 24.0),
        0.0,
    ),
    ParamDescriptor::new(
        ParamId(702),
        "In Gain",
        "InGain",
        ParamUnit::Decibels,
        KnobRange::linear(-24.0, 24.0),
        0.0,
    ),
    ParamDescriptor::new(
        ParamId(703),
        "In Fc",
        "InFc",
        ParamUnit::Hertz,
        KnobRange::exponential(50.0, 5000.0),
        1000.0,
    ),
    ParamDescriptor::new(
        ParamId(704),
        "In Q",
        "InQ",
        ParamUnit::None,
        KnobRange::exponential(0.25, 32.0),
        0.707,
    ),
    ParamDescriptor::new(
        ParamId(705),
        "Out Gain",
        "OutGain",
        ParamUnit::Decibels,
        KnobRange::linear(-24.0, 24.0),
        0.0,
    ),
    ParamDescriptor::new(
        ParamId(706),
        "Out Fc",
        "OutFc",
        ParamUnit::Hertz,
        KnobRange::exponential(50.0, 5000.0),
        1000.0,
    ),
    ParamDescriptor::new(
        ParamId(707),
        "Out Q",
        "OutQ",
        ParamUnit::None,
        KnobRange::exponential(0.25, 32.0),
        0.707,
    ),
    ParamDescriptor::new(
        ParamId(708),
        "Shape",
        "Shape",
        ParamUnit::None,
        KnobRange::linear(0.0, 1.0),
        0.0,
    )
    .stepped(2),
];

/// Mono distortion with input and output parametric sections.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Id | Name | Range | Default |
/// |-------|----|------|-------|---------|
/// | 0 | 700 | Drive | -24..24 dB | 0 |
/// | 1 | 701 | Level | -48..24 dB | 0 |
/// | 2 | 702 | In Gain | -24..24 dB | 0 |
/// | 3 | 703 | In Fc | 50..5000 Hz (exp) | 1000 |
/// | 4 | 704 | In Q | 0.25..32 (exp) | 0.707 |
/// | 5 | 705 | Out Gain | -24..24 dB | 0 |
/// | 6 | 706 | Out Fc | 50..5000 Hz (exp) | 1000 |
/// | 7 | 707 | Out Q | 0.25..32 (exp) | 0.707 |
/// | 8 | 708 | Shape | Hard, Soft | Hard |
///
/// # Example
///
/// ```rust
/// use resona_core::{Effect, ParameterInfo};
/// use resona_effects::{ClipShape, Distortion};
///
/// let mut dist = Distortion::new(48000.0);
/// dist.set_param_value(0, 18.0);
/// dist.set_param(8, 1.0);
/// assert_eq!(dist.shape(), ClipShape::Soft);
///
/// let (l, r) = dist.process_stereo(0.4, 0.2);
/// assert_eq!(l, r);
/// ```
#[derive(Debug, Clone)]
pub struct Distortion {
    knobs: KnobSet<9>,
    drive: SmoothedParam,
    level: SmoothedParam,
    input_eq: ParametricSection,
    output_eq: ParametricSection,
    oversampler: Oversampler<DISTORTION_OVERSAMPLING>,
    shape: ClipShape,
}

impl Distortion {
    /// Creates a hard clipper with flat EQ at unity drive and level.
    pub fn new(sample_rate: f32) -> Self {
        let knobs = KnobSet::new(&DISTORTION_PARAMS);
        Self {
            drive: SmoothedParam::with_config(db_to_linear(knobs.value(0)), sample_rate, 10.0),
            level: SmoothedParam::with_config(db_to_linear(knobs.value(1)), sample_rate, 10.0),
            input_eq: ParametricSection::new(
                sample_rate,
                knobs.value(2),
                knobs.value(3),
                knobs.value(4),
            ),
            output_eq: ParametricSection::new(
                sample_rate,
                knobs.value(5),
                knobs.value(6),
                knobs.value(7),
            ),
            oversampler: Oversampler::new(sample_rate),
            shape: ClipShape::Hard,
            knobs,
        }
    }

    /// Selected clipper curve.
    pub fn shape(&self) -> ClipShape {
        self.shape
    }
}

impl Effect for Distortion {
    fn prepare(&mut self, sample_rate: f32, _max_block_size: usize) {
        self.drive.set_sample_rate(sample_rate);
        self.level.set_sample_rate(sample_rate);
        self.input_eq.set_sample_rate(sample_rate);
        self.output_eq.set_sample_rate(sample_rate);
        self.oversampler.set_sample_rate(sample_rate);
        self.reset();
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let drive = self.drive.advance();
        let level = self.level.advance();
        let shape = self.shape;

        let x = self.input_eq.process(mono_sum(left, right) * drive);
        let clipped = self.oversampler.process(x, |s| shape.apply(s));
        let y = self.output_eq.process(clipped) * level;
        (y, y)
    }

    fn reset(&mut self) {
        self.drive.snap_to_target();
        self.level.snap_to_target();
        self.input_eq.reset();
        self.output_eq.reset();
        self.oversampler.reset();
    }
}

resona_core::impl_params! {
    Distortion, this {
        [0] |v| this.drive.set_target(db_to_linear(v));
        [1] |v| this.level.set_target(db_to_linear(v));
        [2] |v| this.input_eq.set_gain_db(v);
        [3] |v| this.input_eq.set_center(v);
        [4] |v| this.input_eq.set_q(v);
        [5] |v| this.output_eq.set_gain_db(v);
        [6] |v| this.output_eq.set_center(v);
        [7] |v| this.output_eq.set_q(v);
        [8] |_| {
            this.shape = match DISTORTION_PARAMS[8].step_index(this.knobs.get(8)) {
                0 => ClipShape::Hard,
                _ => ClipShape::Soft,
            }
        };
    }
}
