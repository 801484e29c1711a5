//! Circular delay line with a fractional read head.
//!
//! The line is a heap buffer sized once (at construction or in
//! [`DelayLine::resize`], called from `prepare`) and never reallocated while
//! audio runs. Each processed sample follows the same three steps:
//!
//! ```text
//! line.write(input + feedback);      // store at the write head
//! let y = line.read_interpolated(d); // d samples behind the write head
//! line.advance();                    // move the write head by one
//! ```
//!
//! A delay of 0 returns the sample just written, a delay of 1 the one
//! before it, and so on. The largest readable delay is `capacity - 1`;
//! longer requests are clamped.
//!
//! | Effect | Delay Range | Modulation |
//! |--------|-------------|------------|
//! | Flanger | 1-5 ms | LFO |
//! | Chorus | 5-30 ms | LFO |
//! | Echo | 0-2000 ms | smoothed knob |
//! | Reverb line | 45-90 ms | none |

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use libm::ceilf;

/// Ring buffer with integer and linearly interpolated reads.
///
/// # Example
///
/// ```rust
/// use resona_core::DelayLine;
///
/// let mut line = DelayLine::new(16);
/// line.write(1.0);
/// line.advance();
/// line.write(0.0);
/// assert_eq!(line.read(1), 1.0);
/// assert_eq!(line.read_interpolated(0.5), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    head: usize,
}

impl DelayLine {
    /// Creates a zeroed line holding `capacity` samples (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(1)],
            head: 0,
        }
    }

    /// Creates a line long enough for `max_seconds` of delay at `sample_rate`.
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Self {
        Self::new(Self::capacity_for(sample_rate, max_seconds))
    }

    /// Number of samples needed to read back `max_seconds` of delay.
    pub fn capacity_for(sample_rate: f32, max_seconds: f32) -> usize {
        ceilf(sample_rate * max_seconds.max(0.0)) as usize + 1
    }

    /// Resizes to `capacity` samples and clears the contents.
    ///
    /// Allocates only when the capacity actually changes. Call from
    /// `prepare`, never from the audio callback.
    pub fn resize(&mut self, capacity: usize) {
        let capacity = capacity.max(1);
        if capacity == self.buffer.len() {
            self.clear();
        } else {
            #[cfg(feature = "tracing")]
            tracing::trace!(from = self.buffer.len(), to = capacity, "delay line reallocated");
            self.buffer = vec![0.0; capacity];
            self.head = 0;
        }
    }

    /// Stores `sample` at the write head.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.head] = sample;
    }

    /// Reads the sample `delay` positions behind the write head.
    #[inline]
    pub fn read(&self, delay: usize) -> f32 {
        let len = self.buffer.len();
        let delay = delay.min(len - 1);
        self.buffer[(self.head + len - delay) % len]
    }

    /// Reads at a fractional delay with linear interpolation.
    ///
    /// With `read_pos = head - delay`, `i0 = floor(read_pos)`,
    /// `i1 = i0 + 1` and `t = read_pos - i0`, the result is
    /// `(1 - t) * buf[i0] + t * buf[i1]`. Written in terms of the delay's
    /// whole part `n` and fraction `f`, that is
    /// `f * x[n + 1] + (1 - f) * x[n]`. The delay is clamped to
    /// `[0, capacity - 1]`.
    #[inline]
    pub fn read_interpolated(&self, delay: f32) -> f32 {
        let len = self.buffer.len();
        let delay = delay.clamp(0.0, (len - 1) as f32);
        let whole = delay as usize;
        let frac = delay - whole as f32;

        let newer = (self.head + len - whole) % len;
        let older = (newer + len - 1) % len;
        frac * self.buffer[older] + (1.0 - frac) * self.buffer[newer]
    }

    /// Moves the write head forward by one sample, wrapping at capacity.
    #[inline]
    pub fn advance(&mut self) {
        self.head += 1;
        if self.head == self.buffer.len() {
            self.head = 0;
        }
    }

    /// Zeroes the contents without deallocating.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.head = 0;
    }

    /// Total number of stored samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Longest delay that can be read, in samples.
    pub fn max_delay(&self) -> usize {
        self.buffer.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(line: &mut DelayLine, sample: f32) {
        line.write(sample);
        line.advance();
    }

    #[test]
    fn test_zero_delay_reads_current_sample() {
        let mut line = DelayLine::new(8);
        line.write(0.75);
        assert_eq!(line.read(0), 0.75);
        assert_eq!(line.read_interpolated(0.0), 0.75);
    }

    #[test]
    fn test_integer_delay() {
        let mut line = DelayLine::new(32);
        push(&mut line, 1.0);
        for _ in 0..9 {
            push(&mut line, 0.0);
        }
        line.write(0.0);
        assert_eq!(line.read(10), 1.0);
        assert_eq!(line.read(9), 0.0);
        assert_eq!(line.read_interpolated(10.0), 1.0);
    }

    #[test]
    fn test_fractional_read_is_linear() {
        let mut line = DelayLine::new(16);
        push(&mut line, 2.0);
        line.write(4.0);
        assert_eq!(line.read_interpolated(0.5), 3.0);
        assert!((line.read_interpolated(0.25) - 3.5).abs() < 1e-6);
        assert!((line.read_interpolated(0.75) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_wraps_around_capacity() {
        let mut line = DelayLine::new(4);
        for i in 0..10 {
            push(&mut line, i as f32);
        }
        line.write(10.0);
        assert_eq!(line.read(0), 10.0);
        assert_eq!(line.read(3), 7.0);
    }

    #[test]
    fn test_overlong_delay_is_clamped() {
        let mut line = DelayLine::new(4);
        for i in 0..4 {
            push(&mut line, i as f32 + 1.0);
        }
        line.write(5.0);
        assert_eq!(line.read(100), line.read(3));
        assert_eq!(line.read_interpolated(100.0), line.read(3));
    }

    #[test]
    fn test_from_time_capacity() {
        let line = DelayLine::from_time(44100.0, 2.0);
        assert_eq!(line.capacity(), 88201);
        assert_eq!(line.max_delay(), 88200);
    }

    #[test]
    fn test_resize_clears() {
        let mut line = DelayLine::new(8);
        push(&mut line, 1.0);
        line.resize(8);
        assert!((0..8).all(|d| line.read(d) == 0.0));
        line.resize(16);
        assert_eq!(line.capacity(), 16);
    }

    #[test]
    fn test_zero_capacity_is_promoted() {
        let mut line = DelayLine::new(0);
        line.write(0.5);
        assert_eq!(line.capacity(), 1);
        assert_eq!(line.read(3), 0.5);
    }
}
