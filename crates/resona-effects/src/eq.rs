//! Smoothed parametric section shared by the distortion and reverb.

use resona_core::{Biquad, SmoothedParam, design};

/// Peak/notch section with smoothed gain, center and Q.
///
/// Two biquads run the same design for left and right. The design is redone
/// only when a smoothed control moved since the last one.
#[derive(Debug, Clone)]
pub(crate) struct ParametricSection {
    gain_db: SmoothedParam,
    center: SmoothedParam,
    q: SmoothedParam,
    filters: [Biquad; 2],
    designed: (f32, f32, f32),
    sample_rate: f32,
}

impl ParametricSection {
    pub(crate) fn new(sample_rate: f32, gain_db: f32, center: f32, q: f32) -> Self {
        let mut section = Self {
            gain_db: SmoothedParam::with_config(gain_db, sample_rate, 10.0),
            center: SmoothedParam::with_config(center, sample_rate, 20.0),
            q: SmoothedParam::with_config(q, sample_rate, 20.0),
            filters: [Biquad::new(), Biquad::new()],
            designed: (f32::NAN, f32::NAN, f32::NAN),
            sample_rate,
        };
        section.redesign();
        section
    }

    pub(crate) fn set_gain_db(&mut self, gain_db: f32) {
        self.gain_db.set_target(gain_db);
    }

    pub(crate) fn set_center(&mut self, hz: f32) {
        self.center.set_target(hz);
    }

    pub(crate) fn set_q(&mut self, q: f32) {
        self.q.set_target(q);
    }

    pub(crate) fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.gain_db.set_sample_rate(sample_rate);
        self.center.set_sample_rate(sample_rate);
        self.q.set_sample_rate(sample_rate);
        self.redesign();
    }

    #[inline]
    pub(crate) fn process(&mut self, input: f32) -> f32 {
        self.update();
        self.filters[0].process(input)
    }

    #[inline]
    pub(crate) fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        self.update();
        (self.filters[0].process(left), self.filters[1].process(right))
    }

    pub(crate) fn reset(&mut self) {
        self.gain_db.snap_to_target();
        self.center.snap_to_target();
        self.q.snap_to_target();
        for filter in &mut self.filters {
            filter.reset();
        }
        self.redesign();
    }

    #[inline]
    fn update(&mut self) {
        let current = (self.gain_db.advance(), self.center.advance(), self.q.advance());
        if current != self.designed {
            self.redesign();
        }
    }

    fn redesign(&mut self) {
        let (gain_db, center, q) = (self.gain_db.get(), self.center.get(), self.q.get());
        let coefs = design::parametric(center, gain_db, q, self.sample_rate);
        for filter in &mut self.filters {
            filter.set_coefficients(coefs);
        }
        self.designed = (gain_db, center, q);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_section_is_transparent() {
        let mut eq = ParametricSection::new(48000.0, 0.0, 1000.0, 1.0);
        for i in 0..256 {
            let x = libm::sinf(i as f32 * 0.1);
            let (l, r) = eq.process_stereo(x, -x);
            assert!((l - x).abs() < 1e-5);
            assert!((r + x).abs() < 1e-5);
        }
    }

    #[test]
    fn test_boost_at_center() {
        let fs = 48000.0;
        let mut eq = ParametricSection::new(fs, 12.0, 1000.0, 2.0);
        let mut peak = 0.0f32;
        for i in 0..48000 {
            let x = libm::sinf(2.0 * core::f32::consts::PI * 1000.0 * i as f32 / fs);
            let y = eq.process(x);
            if i > 24000 {
                peak = peak.max(y.abs());
            }
        }
        assert!((peak - 3.981).abs() < 0.05, "peak {peak}");
    }

    #[test]
    fn test_redesign_follows_smoothed_target() {
        let mut eq = ParametricSection::new(48000.0, 0.0, 1000.0, 1.0);
        eq.set_gain_db(-12.0);
        eq.set_center(2000.0);
        eq.set_q(4.0);
        for _ in 0..48000 {
            eq.process(0.0);
        }
        assert_eq!(eq.designed, (-12.0, 2000.0, 4.0));
    }
}
