//! One-pole smoothing filters.
//!
//! Every filter memory in the pipeline is a one-pole lowpass of the form
//!
//! ```text
//! s[n] = s[n-1] * (1 - c) + x[n] * c
//! ```
//!
//! where `c` in (0, 1] is the smoothing coefficient: `c = 1` passes the input
//! straight through, small `c` filters heavily. Stages chain several of these
//! with decreasing coefficients as anti-alias cascades.
//!
//! # Usage
//!
//! ```rust
//! use stompchain_core::{OnePole, OnePoleCascade};
//!
//! let mut smoother = OnePole::new(0.2);
//! let y = smoother.process(1.0);
//! assert!((y - 0.2).abs() < 1e-6);
//!
//! let mut cascade = OnePoleCascade::new([0.8, 0.5]);
//! assert!(cascade.process(1.0) < 0.5);
//! ```

use crate::flush_denormal;

/// Single one-pole smoother with a fixed coefficient.
///
/// # Invariants
///
/// - `coeff` is in `[0, 1]`
/// - `state` is flushed to zero below 1e-20
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnePole {
    state: f32,
    coeff: f32,
}

impl OnePole {
    /// Create a smoother with coefficient `coeff` (clamped to `[0, 1]`).
    pub fn new(coeff: f32) -> Self {
        Self {
            state: 0.0,
            coeff: coeff.clamp(0.0, 1.0),
        }
    }

    /// Create a smoother whose state starts at `initial`.
    pub fn with_state(coeff: f32, initial: f32) -> Self {
        Self {
            state: initial,
            coeff: coeff.clamp(0.0, 1.0),
        }
    }

    /// Smoother for a tone band at `freq_hz`.
    ///
    /// Uses `c = f / (f + 0.5)` with `f = freq_hz / sample_rate`, the band
    /// coefficient of the amp EQ.
    pub fn from_frequency(sample_rate: f32, freq_hz: f32) -> Self {
        Self::new(band_coefficient(sample_rate, freq_hz))
    }

    /// Replace the coefficient, keeping the state.
    #[inline]
    pub fn set_coeff(&mut self, coeff: f32) {
        self.coeff = coeff.clamp(0.0, 1.0);
    }

    /// Current coefficient.
    #[inline]
    pub fn coeff(&self) -> f32 {
        self.coeff
    }

    /// Current filter memory.
    #[inline]
    pub fn state(&self) -> f32 {
        self.state
    }

    /// Advance one sample and return the new state.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(self.state * (1.0 - self.coeff) + input * self.coeff);
        self.state
    }

    /// Clear the memory to zero.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    /// Force the memory to `value`.
    pub fn reset_to(&mut self, value: f32) {
        self.state = value;
    }
}

/// Coefficient `f / (f + 0.5)` for a band at `freq_hz`, `f = freq_hz / sample_rate`.
#[inline]
pub fn band_coefficient(sample_rate: f32, freq_hz: f32) -> f32 {
    let f = freq_hz / sample_rate;
    f / (f + 0.5)
}

/// `N` one-pole smoothers applied in series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnePoleCascade<const N: usize> {
    poles: [OnePole; N],
}

impl<const N: usize> OnePoleCascade<N> {
    /// Build a cascade from its coefficient table, first stage first.
    pub fn new(coeffs: [f32; N]) -> Self {
        Self {
            poles: coeffs.map(OnePole::new),
        }
    }

    /// Run `input` through every stage.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.poles.iter_mut().fold(input, |x, pole| pole.process(x))
    }

    /// Clear every stage.
    pub fn reset(&mut self) {
        for pole in &mut self.poles {
            pole.reset();
        }
    }

    /// Number of stages.
    pub const fn len(&self) -> usize {
        N
    }

    /// True for an empty cascade.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_dc() {
        let mut pole = OnePole::new(0.3);
        let mut y = 0.0;
        for _ in 0..200 {
            y = pole.process(1.0);
        }
        assert!((y - 1.0).abs() < 1e-4, "DC should pass, got {}", y);
    }

    #[test]
    fn unit_coefficient_is_transparent() {
        let mut pole = OnePole::new(1.0);
        assert_eq!(pole.process(0.37), 0.37);
        assert_eq!(pole.process(-0.2), -0.2);
    }

    #[test]
    fn coefficient_clamped() {
        assert_eq!(OnePole::new(3.0).coeff(), 1.0);
        assert_eq!(OnePole::new(-1.0).coeff(), 0.0);
    }

    #[test]
    fn attenuates_alternating_signal() {
        let mut pole = OnePole::new(0.2);
        let mut peak: f32 = 0.0;
        for i in 0..400 {
            let x = if i % 2 == 0 { 1.0 } else { -1.0 };
            let y = pole.process(x);
            if i > 200 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak < 0.2, "Nyquist should be attenuated, peak {}", peak);
    }

    #[test]
    fn band_coefficient_tracks_frequency() {
        let low = band_coefficient(44100.0, 80.0);
        let high = band_coefficient(44100.0, 5000.0);
        assert!(low < high);
        assert!((low - (80.0 / 44100.0) / (80.0 / 44100.0 + 0.5)).abs() < 1e-7);
    }

    #[test]
    fn cascade_runs_in_order() {
        let mut cascade = OnePoleCascade::new([0.5, 0.5]);
        // First stage 0.5, second 0.25.
        assert!((cascade.process(1.0) - 0.25).abs() < 1e-6);
        assert_eq!(cascade.len(), 2);
        cascade.reset();
        assert!((cascade.process(1.0) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn reset_and_initial_state() {
        let mut pole = OnePole::with_state(0.05, 0.5);
        assert_eq!(pole.state(), 0.5);
        pole.reset();
        assert_eq!(pole.state(), 0.0);
        pole.reset_to(0.5);
        assert_eq!(pole.state(), 0.5);
    }
}
