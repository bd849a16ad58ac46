//! Allpass filter for reverb diffusion.
//!
//! A Schroeder allpass smears an impulse in time without coloring its
//! spectrum. The reverb runs four of them before its comb bank and two after.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::flush_denormal;

/// Fixed-length Schroeder allpass.
///
/// ```text
/// delayed = buf[pos]
/// out     = -in + delayed
/// buf[pos] = in + delayed * g
/// ```
///
/// # Example
///
/// ```rust
/// use stompchain_core::AllpassDiffuser;
///
/// let mut ap = AllpassDiffuser::new(347, 0.5);
/// assert_eq!(ap.process(1.0), -1.0);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassDiffuser {
    buffer: Vec<f32>,
    pos: usize,
    gain: f32,
}

impl AllpassDiffuser {
    /// Create an allpass of `len` samples (at least 1) with feedback `gain`.
    ///
    /// `gain` is clamped to `[-0.99, 0.99]` for stability.
    pub fn new(len: usize, gain: f32) -> Self {
        Self {
            buffer: vec![0.0; len.max(1)],
            pos: 0,
            gain: gain.clamp(-0.99, 0.99),
        }
    }

    /// Create an allpass whose `base_len` is specified at 44.1 kHz,
    /// scaled to `sample_rate`.
    pub fn scaled(base_len: usize, sample_rate: f32, gain: f32) -> Self {
        Self::new(scale_length(base_len, sample_rate), gain)
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.pos];
        let output = -input + delayed;
        self.buffer[self.pos] = flush_denormal(input + delayed * self.gain);
        self.pos += 1;
        if self.pos == self.buffer.len() {
            self.pos = 0;
        }
        output
    }

    /// Zero the buffer and rewind.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.pos = 0;
    }

    /// Buffer length in samples.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false; the buffer holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Scale a length specified at 44.1 kHz to `sample_rate`, at least 1 sample.
#[inline]
pub fn scale_length(base_len: usize, sample_rate: f32) -> usize {
    ((base_len as f32 * (sample_rate / 44100.0)) as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_response_shape() {
        let mut ap = AllpassDiffuser::new(4, 0.5);
        let mut out = [0.0f32; 9];
        out[0] = ap.process(1.0);
        for slot in out.iter_mut().skip(1) {
            *slot = ap.process(0.0);
        }
        assert_eq!(out[0], -1.0);
        // The stored impulse comes back after one full lap.
        assert_eq!(out[4], 1.0);
        assert_eq!(out[8], 0.5);
        assert_eq!(out[1], 0.0);
    }

    #[test]
    fn tail_energy_converges() {
        // Taps -1, 1, g, g², ... so energy is 1 + 1 / (1 - g²).
        let mut ap = AllpassDiffuser::new(37, 0.5);
        let mut energy = 0.0;
        energy += ap.process(1.0).powi(2);
        for _ in 0..20000 {
            energy += ap.process(0.0).powi(2);
        }
        let expected = 1.0 + 1.0 / (1.0 - 0.25);
        assert!((energy - expected).abs() < 0.01, "allpass energy {}", energy);
    }

    #[test]
    fn scaled_lengths() {
        assert_eq!(scale_length(347, 44100.0), 347);
        assert_eq!(scale_length(347, 88200.0), 694);
        assert_eq!(scale_length(1, 8000.0), 1);
        assert_eq!(AllpassDiffuser::scaled(113, 48000.0, 0.5).len(), 122);
    }

    #[test]
    fn clear_silences() {
        let mut ap = AllpassDiffuser::new(10, 0.5);
        ap.process(1.0);
        ap.clear();
        for _ in 0..30 {
            assert_eq!(ap.process(0.0), 0.0);
        }
    }
}
