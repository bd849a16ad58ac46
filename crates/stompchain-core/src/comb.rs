//! Damped feedback comb filter for reverb algorithms.
//!
//! The comb bank is the reverb's density generator. Each comb has a fixed
//! capacity allocated up front and an effective length that follows the
//! room-size control, so resizing the room never allocates.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::flush_denormal;

/// Feedback comb with one-pole damping in the loop.
///
/// Per sample:
///
/// ```text
/// delayed   = buf[pos]
/// ds        = ds * (1 - d) + delayed * d
/// damped    = delayed * (1 - d) + ds * d
/// buf[pos]  = in + damped * fb
/// out       = delayed
/// ```
///
/// # Example
///
/// ```rust
/// use stompchain_core::CombFilter;
///
/// let mut comb = CombFilter::new(2000);
/// comb.set_length(1116);
/// comb.set_feedback(0.8);
/// comb.set_damping(0.35);
/// assert_eq!(comb.process(1.0), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct CombFilter {
    buffer: Vec<f32>,
    pos: usize,
    length: usize,
    feedback: f32,
    damping: f32,
    damp_state: f32,
}

impl CombFilter {
    /// Allocate a comb with room for `capacity` samples; the effective
    /// length starts at the full capacity.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: vec![0.0; capacity],
            pos: 0,
            length: capacity,
            feedback: 0.5,
            damping: 0.2,
            damp_state: 0.0,
        }
    }

    /// Set the effective loop length, clamped to `[1, capacity]`.
    #[inline]
    pub fn set_length(&mut self, length: usize) {
        self.length = length.clamp(1, self.buffer.len());
        if self.pos >= self.length {
            self.pos = 0;
        }
    }

    /// Effective loop length in samples.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Allocated capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Set the loop feedback, clamped to `[0, 0.98]` so the loop stays stable.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.98);
    }

    /// Current feedback.
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Set the damping amount in `[0, 1]`.
    #[inline]
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(0.0, 1.0);
    }

    /// Process one sample, returning the delayed loop output.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.pos];
        let d = self.damping;
        self.damp_state = flush_denormal(self.damp_state * (1.0 - d) + delayed * d);
        let damped = delayed * (1.0 - d) + self.damp_state * d;
        self.buffer[self.pos] = flush_denormal(input + damped * self.feedback);
        self.pos += 1;
        if self.pos >= self.length {
            self.pos = 0;
        }
        delayed
    }

    /// Zero the loop and damping memory.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.pos = 0;
        self.damp_state = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_after_length() {
        let mut comb = CombFilter::new(100);
        comb.set_length(10);
        comb.set_feedback(0.5);
        comb.set_damping(0.0);
        assert_eq!(comb.process(1.0), 0.0);
        for _ in 0..9 {
            assert_eq!(comb.process(0.0), 0.0);
        }
        assert_eq!(comb.process(0.0), 1.0);
        for _ in 0..9 {
            comb.process(0.0);
        }
        assert!((comb.process(0.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn feedback_decays() {
        let mut comb = CombFilter::new(50);
        comb.set_feedback(0.9);
        comb.set_damping(0.3);
        comb.process(1.0);
        let mut last_lap_peak = f32::MAX;
        for _ in 0..20 {
            let mut peak: f32 = 0.0;
            for _ in 0..50 {
                peak = peak.max(comb.process(0.0).abs());
            }
            assert!(peak <= last_lap_peak + 1e-6);
            last_lap_peak = peak;
        }
        assert!(last_lap_peak < 0.5);
    }

    #[test]
    fn feedback_and_length_clamped() {
        let mut comb = CombFilter::new(8);
        comb.set_feedback(2.0);
        assert_eq!(comb.feedback(), 0.98);
        comb.set_length(100);
        assert_eq!(comb.length(), 8);
        comb.set_length(0);
        assert_eq!(comb.length(), 1);
        assert_eq!(comb.capacity(), 8);
    }

    #[test]
    fn shrinking_length_keeps_cursor_in_range() {
        let mut comb = CombFilter::new(64);
        for _ in 0..40 {
            comb.process(0.1);
        }
        comb.set_length(16);
        for _ in 0..100 {
            assert!(comb.process(0.1).is_finite());
        }
    }
}
