//! Amp stage: gated gain staging, anti-alias cascade and tone stack.
//!
//! Signal flow per sample:
//!
//! ```text
//! x ──► gate(0.005) ──► ×(1 + 6·gain) ──► clamp ±0.8 ──► 7-pole cascade ──► ToneStack ──► y
//! ```

use stompchain_core::{Effect, OnePoleCascade, gate};

use crate::eq::ToneStack;

const GATE_THRESHOLD: f32 = 0.005;
const MAX_EXTRA_GAIN: f32 = 6.0;
const DRIVE_CLAMP: f32 = 0.8;
const ANTI_ALIAS: [f32; 7] = [0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2];

/// Preamp gain plus four-band EQ.
///
/// # Parameters
///
/// | Control | Range | Effect |
/// |---------|-------|--------|
/// | gain | 0–1 | linear gain `1 + 6·gain` before the hard clamp |
/// | bass / mid / treble / presence | 0–1 | see [`ToneStack`] |
///
/// # Example
///
/// ```rust
/// use stompchain_core::Effect;
/// use stompchain_effects::AmpStage;
///
/// let mut amp = AmpStage::new(48000.0);
/// amp.set_gain(0.8);
/// amp.tone_mut().set_treble(0.7);
/// let y = amp.process(0.1);
/// assert!(y.abs() <= 0.8);
/// ```
#[derive(Debug, Clone)]
pub struct AmpStage {
    gain: f32,
    anti_alias: OnePoleCascade<7>,
    tone: ToneStack,
}

impl AmpStage {
    /// Create an amp stage with gain 0.5 and a flat tone stack.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            gain: gain_factor(0.5),
            anti_alias: OnePoleCascade::new(ANTI_ALIAS),
            tone: ToneStack::new(sample_rate),
        }
    }

    /// Set the gain control (0–1).
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain_factor(gain);
    }

    /// Linear gain factor currently applied.
    pub fn gain_factor(&self) -> f32 {
        self.gain
    }

    /// Tone stack, for band adjustments.
    pub fn tone_mut(&mut self) -> &mut ToneStack {
        &mut self.tone
    }
}

#[inline]
fn gain_factor(control: f32) -> f32 {
    1.0 + control.clamp(0.0, 1.0) * MAX_EXTRA_GAIN
}

impl Effect for AmpStage {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let driven = (gate(input, GATE_THRESHOLD) * self.gain).clamp(-DRIVE_CLAMP, DRIVE_CLAMP);
        let smoothed = self.anti_alias.process(driven);
        self.tone.process(smoothed)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.anti_alias.reset();
        self.tone.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.anti_alias.reset();
        self.tone.reset();
    }
}
