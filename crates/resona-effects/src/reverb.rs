//! Twelve-line feedback delay network reverb.
//!
//! # Signal Flow
//!
//! ```text
//!            +---------------------------------------------+
//!            |                                             |
//!  in L/R -> + -> shelf_i -> line_i (len_i) -> read_i -> [ M ] -> out L/R -> EQ -> dry/wet
//! ```
//!
//! Each sample, every line is read at its full length, the reads are mixed
//! through the orthonormal matrix `M`, and row `i` of the result is tapped
//! to the output (even rows left, odd rows right). The input is then added
//! (left to even lines, right to odd), the sum passes the line's decay
//! shelf, and the shelf output is written back.
//!
//! Because `M` is orthonormal the matrix neither adds nor removes energy.
//! All decay comes from the shelves, which are designed so that a signal
//! circulating through line `i` loses 60 dB in `T60 Low` seconds at DC
//! and in `T60 High` seconds at Nyquist.

use libm::{roundf, sqrtf};
use resona_core::{
    DelayLine, Effect, KnobRange, KnobSet, ParamDescriptor, ParamId, ParamUnit, ShelfFilter,
    SmoothedParam, design, flush_denormal, wet_dry_mix,
};

use crate::eq::ParametricSection;

/// Number of delay lines in the network.
pub const LINE_COUNT: usize = 12;

/// Rate the base line lengths are specified at.
const BASE_SAMPLE_RATE: f32 = 44100.0;

/// Line lengths in samples at 44.1 kHz. Roughly 6% apart, so no two lines
/// share a low-order common period.
const BASE_LINE_LENGTHS: [usize; LINE_COUNT] = [
    2023, 2153, 2291, 2438, 2595, 2761, 2939, 3127, 3328, 3542, 3769, 4011,
];

/// Line lengths scaled to `sample_rate`, each at least one sample.
pub fn line_lengths(sample_rate: f32) -> [usize; LINE_COUNT] {
    let scale = sample_rate / BASE_SAMPLE_RATE;
    BASE_LINE_LENGTHS.map(|len| (roundf(len as f32 * scale) as usize).max(1))
}

/// Square feedback matrix of the network.
#[derive(Debug, Clone, PartialEq)]
pub struct MixingMatrix {
    rows: [[f32; LINE_COUNT]; LINE_COUNT],
}

impl MixingMatrix {
    /// 12x12 Hadamard matrix scaled by `1/sqrt(12)`.
    ///
    /// Paley construction over GF(11): the first row and column are all
    /// `+1`; for `i, j >= 1` the entry is `+1` when `j - i` is a nonzero
    /// quadratic residue mod 11 and `-1` otherwise.
    pub fn hadamard() -> Self {
        const P: usize = LINE_COUNT - 1;
        let is_residue = |x: usize| (1..P).any(|k| (k * k) % P == x);
        let scale = 1.0 / sqrtf(LINE_COUNT as f32);

        let mut rows = [[scale; LINE_COUNT]; LINE_COUNT];
        for (i, row) in rows.iter_mut().enumerate().skip(1) {
            for (j, entry) in row.iter_mut().enumerate().skip(1) {
                let diff = (j + P - i) % P;
                if diff == 0 || !is_residue(diff) {
                    *entry = -scale;
                }
            }
        }
        Self { rows }
    }

    /// Identity: every line feeds only itself.
    pub fn identity() -> Self {
        let mut rows = [[0.0; LINE_COUNT]; LINE_COUNT];
        for (i, row) in rows.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        Self { rows }
    }

    /// Entry at `row`, `col`.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.rows[row][col]
    }

    /// One row of the matrix.
    pub fn row(&self, row: usize) -> &[f32; LINE_COUNT] {
        &self.rows[row]
    }

    /// Largest absolute entry of `M * M^T - I`.
    pub fn orthogonality_error(&self) -> f32 {
        let mut worst = 0.0f32;
        for i in 0..LINE_COUNT {
            for j in 0..LINE_COUNT {
                let dot: f32 = (0..LINE_COUNT)
                    .map(|k| self.rows[i][k] * self.rows[j][k])
                    .sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                worst = worst.max((dot - expected).abs());
            }
        }
        worst
    }

    #[inline]
    fn mix_row(&self, row: usize, input: &[f32; LINE_COUNT]) -> f32 {
        self.rows[row]
            .iter()
            .zip(input)
            .map(|(m, x)| m * x)
            .sum()
    }
}

impl Default for MixingMatrix {
    fn default() -> Self {
        Self::hadamard()
    }
}

/// Parameter table for [`Reverb`].
pub const REVERB_PARAMS: [ParamDescriptor; 7] = [
    ParamDescriptor::new(
        ParamId(800),
        "T60 Low",
        "T60Lo",
        ParamUnit::Seconds,
        KnobRange::exponential(0.01, 10.0),
        3.5,
    ),
    ParamDescriptor::new(
        ParamId(801),
        "T60 High",
        "T60Hi",
        ParamUnit::Seconds,
        KnobRange::exponential(0.01, 10.0),
        0.5,
    ),
    ParamDescriptor::new(
        ParamId(802),
        "Transition",
        "Trans",
        ParamUnit::Hertz,
        KnobRange::exponential(50.0, 16000.0),
        6700.0,
    ),
    ParamDescriptor::new(
        ParamId(803),
        "Dry/Wet",
        "Mix",
        ParamUnit::None,
        KnobRange::linear(0.0, 1.0),
        0.2,
    ),
    ParamDescriptor::new(
        ParamId(804),
        "EQ Gain",
        "EqGain",
        ParamUnit::Decibels,
        KnobRange::linear(-24.0, 24.0),
        0.0,
    ),
    ParamDescriptor::new(
        ParamId(805),
        "EQ Fc",
        "EqFc",
        ParamUnit::Hertz,
        KnobRange::exponential(50.0, 16000.0),
        5000.0,
    ),
    ParamDescriptor::new(
        ParamId(806),
        "EQ Q",
        "EqQ",
        ParamUnit::None,
        KnobRange::exponential(0.25, 32.0),
        1.0,
    ),
];

/// Stereo FDN reverb.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Id | Name | Range | Default |
/// |-------|----|------|-------|---------|
/// | 0 | 800 | T60 Low | 0.01..10 s (exp) | 3.5 |
/// | 1 | 801 | T60 High | 0.01..10 s (exp) | 0.5 |
/// | 2 | 802 | Transition | 50..16000 Hz (exp) | 6700 |
/// | 3 | 803 | Dry/Wet | 0..1 | 0.2 |
/// | 4 | 804 | EQ Gain | -24..24 dB | 0 |
/// | 5 | 805 | EQ Fc | 50..16000 Hz (exp) | 5000 |
/// | 6 | 806 | EQ Q | 0.25..32 (exp) | 1 |
///
/// # Example
///
/// ```rust
/// use resona_core::{Effect, ParameterInfo};
/// use resona_effects::Reverb;
///
/// let mut reverb = Reverb::new(48000.0);
/// reverb.set_param_value(0, 1.2);
/// reverb.set_param_value(3, 0.35);
/// reverb.prepare(48000.0, 256);
///
/// let (l, r) = reverb.process_stereo(1.0, 0.0);
/// assert!(l.is_finite() && r.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct Reverb {
    knobs: KnobSet<7>,
    matrix: MixingMatrix,
    lines: [DelayLine; LINE_COUNT],
    shelves: [ShelfFilter; LINE_COUNT],
    lengths: [usize; LINE_COUNT],
    t60_low: SmoothedParam,
    t60_high: SmoothedParam,
    transition: SmoothedParam,
    /// `(t60_low, t60_high, transition)` the shelves were designed for
    designed: (f32, f32, f32),
    mix: SmoothedParam,
    eq: ParametricSection,
    sample_rate: f32,
}

impl Reverb {
    /// Creates the reverb with the Hadamard feedback matrix.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_matrix(sample_rate, MixingMatrix::hadamard())
    }

    /// Creates the reverb with a custom feedback matrix.
    pub fn with_matrix(sample_rate: f32, matrix: MixingMatrix) -> Self {
        let knobs = KnobSet::new(&REVERB_PARAMS);
        let lengths = line_lengths(sample_rate);
        let mut reverb = Self {
            matrix,
            lines: lengths.map(|len| DelayLine::new(len + 1)),
            shelves: core::array::from_fn(|_| ShelfFilter::new()),
            lengths,
            t60_low: SmoothedParam::with_config(knobs.value(0), sample_rate, 20.0),
            t60_high: SmoothedParam::with_config(knobs.value(1), sample_rate, 20.0),
            transition: SmoothedParam::with_config(knobs.value(2), sample_rate, 20.0),
            designed: (f32::NAN, f32::NAN, f32::NAN),
            mix: SmoothedParam::with_config(knobs.value(3), sample_rate, 10.0),
            eq: ParametricSection::new(sample_rate, knobs.value(4), knobs.value(5), knobs.value(6)),
            sample_rate,
            knobs,
        };
        reverb.design_shelves();
        reverb
    }

    /// Delay line lengths in samples at the current rate.
    pub fn line_lengths(&self) -> &[usize; LINE_COUNT] {
        &self.lengths
    }

    /// The feedback matrix.
    pub fn matrix(&self) -> &MixingMatrix {
        &self.matrix
    }

    /// Decay shelf of line `index`.
    pub fn shelf(&self, index: usize) -> Option<&ShelfFilter> {
        self.shelves.get(index)
    }

    fn design_shelves(&mut self) {
        let (t60_low, t60_high, transition) =
            (self.t60_low.get(), self.t60_high.get(), self.transition.get());
        for (shelf, &len) in self.shelves.iter_mut().zip(&self.lengths) {
            shelf.set_coefficients(design::shelf(
                len as f32,
                transition,
                t60_low,
                t60_high,
                self.sample_rate,
            ));
        }
        self.designed = (t60_low, t60_high, transition);
    }
}

impl Effect for Reverb {
    fn prepare(&mut self, sample_rate: f32, _max_block_size: usize) {
        self.sample_rate = sample_rate;
        self.lengths = line_lengths(sample_rate);
        for (line, &len) in self.lines.iter_mut().zip(&self.lengths) {
            line.resize(len + 1);
        }
        self.t60_low.set_sample_rate(sample_rate);
        self.t60_high.set_sample_rate(sample_rate);
        self.transition.set_sample_rate(sample_rate);
        self.mix.set_sample_rate(sample_rate);
        self.eq.set_sample_rate(sample_rate);
        self.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            shortest = self.lengths[0],
            longest = self.lengths[LINE_COUNT - 1],
            "reverb prepared"
        );
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let current = (
            self.t60_low.advance(),
            self.t60_high.advance(),
            self.transition.advance(),
        );
        if current != self.designed {
            self.design_shelves();
        }
        let mix = self.mix.advance();

        let reads: [f32; LINE_COUNT] =
            core::array::from_fn(|i| self.lines[i].read(self.lengths[i]));

        let (mut wet_l, mut wet_r) = (0.0, 0.0);
        for i in 0..LINE_COUNT {
            let mut acc = self.matrix.mix_row(i, &reads);
            if i % 2 == 0 {
                wet_l += acc;
                acc += left;
            } else {
                wet_r += acc;
                acc += right;
            }
            let decayed = self.shelves[i].process(acc);
            self.lines[i].write(flush_denormal(decayed));
        }
        for line in &mut self.lines {
            line.advance();
        }

        let (wet_l, wet_r) = self.eq.process_stereo(wet_l, wet_r);
        (wet_dry_mix(left, wet_l, mix), wet_dry_mix(right, wet_r, mix))
    }

    fn reset(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        for shelf in &mut self.shelves {
            shelf.reset();
        }
        self.t60_low.snap_to_target();
        self.t60_high.snap_to_target();
        self.transition.snap_to_target();
        self.mix.snap_to_target();
        self.eq.reset();
        self.design_shelves();
    }
}

resona_core::impl_params! {
    Reverb, this {
        [0] |v| this.t60_low.set_target(v);
        [1] |v| this.t60_high.set_target(v);
        [2] |v| this.transition.set_target(v);
        [3] |v| this.mix.set_target(v);
        [4] |v| this.eq.set_gain_db(v);
        [5] |v| this.eq.set_center(v);
        [6] |v| this.eq.set_q(v);
    }
}
