//! Low Frequency Oscillator for modulation effects.
//!
//! A sine phase accumulator: the phase lives in `[0, 1)`, advances by
//! `freq / sample_rate` per sample and wraps at 1.0. Chorus, flanger and
//! phaser sweeps, shimmer detune and shimmer voice crossfades all run on it.

use core::f32::consts::TAU;
use libm::sinf;

/// Sine low-frequency oscillator.
///
/// Each call returns the value at the current phase and then advances it.
///
/// # Example
///
/// ```rust
/// use stompchain_core::Lfo;
///
/// let mut lfo = Lfo::new(44100.0, 2.0);
/// let first = lfo.next();
/// assert_eq!(first, 0.0); // sin(0)
///
/// // A quarter-cycle offset gives a cosine voice.
/// let mut cos = Lfo::new(44100.0, 2.0).with_phase(0.25);
/// assert!((cos.next() - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    /// Current phase position [0.0, 1.0)
    phase: f32,
    /// Phase the oscillator returns to on reset
    start_phase: f32,
    /// Phase increment per sample
    phase_inc: f32,
    /// Frequency in Hz
    freq: f32,
    /// Sample rate in Hz
    sample_rate: f32,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(48000.0, 1.0)
    }
}

impl Lfo {
    /// Create an oscillator at `freq_hz`, starting at phase 0.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        let mut lfo = Self {
            phase: 0.0,
            start_phase: 0.0,
            phase_inc: 0.0,
            freq: freq_hz,
            sample_rate,
        };
        lfo.recalculate_increment();
        lfo
    }

    /// Start (and reset) at `phase` in cycles, wrapped into `[0, 1)`.
    #[must_use]
    pub fn with_phase(mut self, phase: f32) -> Self {
        self.start_phase = wrap_unit(phase);
        self.phase = self.start_phase;
        self
    }

    /// Set the frequency in Hz, keeping the phase.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.freq = freq_hz;
        self.recalculate_increment();
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.freq
    }

    /// Set the sample rate, keeping the frequency.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_increment();
    }

    /// Current phase in cycles.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Return to the start phase.
    pub fn reset(&mut self) {
        self.phase = self.start_phase;
    }

    /// Sine value at the current phase in `[-1, 1]`, then advance.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let output = sinf(self.phase * TAU);
        self.advance();
        output
    }

    /// `0.5 + 0.5 * sin`, in `[0, 1]`, then advance.
    #[inline]
    pub fn next_unipolar(&mut self) -> f32 {
        0.5 + 0.5 * self.next()
    }

    #[inline]
    fn advance(&mut self) {
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
    }

    fn recalculate_increment(&mut self) {
        self.phase_inc = if self.sample_rate > 0.0 {
            // An increment of a full cycle or more would never wrap back into range.
            (self.freq / self.sample_rate).clamp(0.0, 0.999_999)
        } else {
            0.0
        };
    }
}

#[inline]
fn wrap_unit(phase: f32) -> f32 {
    let wrapped = phase % 1.0;
    if wrapped < 0.0 { wrapped + 1.0 } else { wrapped }
}
