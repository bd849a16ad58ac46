//! Circular audio buffer used by every time-based stage.
//!
//! A [`DelayLine`] is an owned, fixed-length run of samples plus a write
//! cursor that wraps modulo the length. The same primitive backs the echo
//! delay, the reverse-playback capture rings, reverb pre-delay, and shimmer
//! pitch-shifter histories.
//!
//! # Reads
//!
//! | Method | Addressing | Interpolation |
//! |--------|------------|---------------|
//! | [`DelayLine::read`] | samples before the newest write | per-line [`Interpolation`] |
//! | [`DelayLine::read_at`] | absolute fractional index | linear |
//! | [`DelayLine::read_cubic_at`] | absolute fractional index | Catmull-Rom |
//! | [`DelayLine::copy_reversed_tail`] | newest N samples, newest first | none |
//!
//! The length is fixed once allocated. [`DelayLine::resize`] reallocates and
//! is only called from prepare paths.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Interpolation method for fractional [`DelayLine::read`] calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    /// Truncate to the integer delay.
    None,
    /// Linear interpolation between two samples.
    #[default]
    Linear,
    /// 4-point Catmull-Rom interpolation.
    Cubic,
}

/// Circular buffer with a wrapping write cursor.
///
/// # Invariants
///
/// - `buffer.len() >= 1`
/// - `write_pos < buffer.len()`
///
/// # Example
///
/// ```rust
/// use stompchain_core::DelayLine;
///
/// let mut line = DelayLine::new(8);
/// line.write(1.0);
/// line.write(0.0);
/// // The impulse was written one sample before the newest one.
/// assert_eq!(line.read(1.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
    interpolation: Interpolation,
}

impl DelayLine {
    /// Allocate a zeroed line of `len` samples. A zero length is promoted to 1.
    pub fn new(len: usize) -> Self {
        Self {
            buffer: vec![0.0; len.max(1)],
            write_pos: 0,
            interpolation: Interpolation::Linear,
        }
    }

    /// Allocate a line holding `seconds` of audio at `sample_rate`, plus one sample.
    pub fn from_time(sample_rate: f32, seconds: f32) -> Self {
        Self::new(seconds_to_len(sample_rate, seconds))
    }

    /// Reallocate to `len` samples and clear. Not real-time safe.
    pub fn resize(&mut self, len: usize) {
        let len = len.max(1);
        if self.buffer.len() == len {
            self.clear();
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(from = self.buffer.len(), to = len, "delay line resized");
        self.buffer = vec![0.0; len];
        self.write_pos = 0;
    }

    /// Set the interpolation used by [`DelayLine::read`].
    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
    }

    /// Number of samples the line holds.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false; a line holds at least one sample.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Index the next [`DelayLine::write`] will store to.
    #[inline]
    pub fn write_position(&self) -> usize {
        self.write_pos
    }

    /// Read `delay` samples before the newest write.
    ///
    /// `read(0.0)` returns the most recently written sample. The delay is
    /// clamped to `[0, len - 1]`, so the read never leaves the buffer.
    #[inline]
    pub fn read(&self, delay: f32) -> f32 {
        let len = self.buffer.len();
        let max = (len - 1) as f32;
        let delay = if delay > 0.0 { delay.min(max) } else { 0.0 };

        let delay_int = delay as usize;
        let frac = delay - delay_int as f32;
        let read_pos = (self.write_pos + len - delay_int - 1) % len;

        match self.interpolation {
            Interpolation::None => self.buffer[read_pos],
            Interpolation::Linear => {
                let older = self.buffer[(read_pos + len - 1) % len];
                let newer = self.buffer[read_pos];
                newer + (older - newer) * frac
            }
            Interpolation::Cubic => {
                // Walking toward older samples: a is one step newer, d two steps older.
                let a = self.buffer[(read_pos + 1) % len];
                let b = self.buffer[read_pos];
                let c = self.buffer[(read_pos + len - 1) % len];
                let d = self.buffer[(read_pos + 2 * len - 2) % len];
                catmull_rom(a, b, c, d, frac)
            }
        }
    }

    /// Read at an absolute fractional index with linear interpolation.
    ///
    /// The index wraps modulo the length, negative values included.
    #[inline]
    pub fn read_at(&self, position: f32) -> f32 {
        let len = self.buffer.len();
        let position = wrap_position(position, len);
        let index = (position as usize).min(len - 1);
        let frac = position - index as f32;
        let next = (index + 1) % len;
        self.buffer[index] * (1.0 - frac) + self.buffer[next] * frac
    }

    /// Read at an absolute fractional index with 4-point Catmull-Rom interpolation.
    #[inline]
    pub fn read_cubic_at(&self, position: f32) -> f32 {
        let len = self.buffer.len();
        let position = wrap_position(position, len);
        let index = (position as usize).min(len - 1);
        let frac = position - index as f32;

        let a = self.buffer[(index + len - 1) % len];
        let b = self.buffer[index];
        let c = self.buffer[(index + 1) % len];
        let d = self.buffer[(index + 2) % len];
        catmull_rom(a, b, c, d, frac)
    }

    /// Store a sample at the write cursor and advance it.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos == self.buffer.len() {
            self.write_pos = 0;
        }
    }

    /// Read `delay` samples back, then write `sample`.
    #[inline]
    pub fn read_write(&mut self, sample: f32, delay: f32) -> f32 {
        let output = self.read(delay);
        self.write(sample);
        output
    }

    /// Copy the newest `out.len()` samples into `out`, newest first.
    ///
    /// Only the newest `len` samples exist, so at most that many are copied;
    /// the remainder of `out` is zero-filled. Returns the number copied.
    pub fn copy_reversed_tail(&self, out: &mut [f32]) -> usize {
        let len = self.buffer.len();
        let count = out.len().min(len);
        for (i, slot) in out.iter_mut().take(count).enumerate() {
            *slot = self.buffer[(self.write_pos + len - 1 - i) % len];
        }
        out[count..].fill(0.0);
        count
    }

    /// Set every sample to 0.0 and move the cursor to the start.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

impl Default for DelayLine {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Buffer length for `seconds` of audio at `sample_rate`, plus one sample.
#[inline]
pub fn seconds_to_len(sample_rate: f32, seconds: f32) -> usize {
    (sample_rate * seconds).max(0.0) as usize + 1
}

#[inline]
fn wrap_position(position: f32, len: usize) -> f32 {
    let len_f = len as f32;
    let wrapped = position % len_f;
    if wrapped < 0.0 { wrapped + len_f } else { wrapped }
}

/// Catmull-Rom spline through `b` (t = 0) and `c` (t = 1).
#[inline]
fn catmull_rom(a: f32, b: f32, c: f32, d: f32, t: f32) -> f32 {
    b + 0.5 * t * (c - a + t * (2.0 * a - 5.0 * b + 4.0 * c - d + t * (3.0 * (b - c) + d - a)))
}
