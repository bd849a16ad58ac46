//! Three-voice distortion: Clean, Crunch and Fuzz.
//!
//! Shared front end: gate near-silent input, multiply by `1 + 3·drive`, clamp
//! the driven signal to ±0.5. Shared back end: an 8-pole smoothing cascade,
//! a fixed 0.8 make-down and a hard clamp at ±0.6.

use core::f32::consts::TAU;

use libm::{fabsf, sinf, tanhf};
use stompchain_core::{Effect, OnePole, OnePoleCascade, gate};

const GATE_THRESHOLD: f32 = 0.003;
const PRE_CLAMP: f32 = 0.5;
const POST_GAIN: f32 = 0.8;
/// Hard ceiling of the stage output.
pub const OUTPUT_CLAMP: f32 = 0.6;
const SMOOTHING: [f32; 8] = [0.95, 0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3];

const FUZZ_KNEE: f32 = 0.4;
const OCTAVE_HZ: f32 = 2.0;
const OCTAVE_LEVEL: f32 = 0.15;

/// Waveshaping voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistortionType {
    /// Gentle tanh saturation.
    Clean,
    /// Harder tanh with a small even-order term.
    #[default]
    Crunch,
    /// Piecewise clipper with a synthesized octave-up component.
    Fuzz,
}

impl DistortionType {
    /// All voices in selector order.
    pub const ALL: [DistortionType; 3] = [Self::Clean, Self::Crunch, Self::Fuzz];

    /// Voice for a selector index; out-of-range indices saturate to Fuzz.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Clean,
            1 => Self::Crunch,
            _ => Self::Fuzz,
        }
    }

    /// Selector index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Clean => "Clean",
            Self::Crunch => "Crunch",
            Self::Fuzz => "Fuzz",
        }
    }
}

/// Drive + waveshaper stage.
///
/// # Example
///
/// ```rust
/// use stompchain_core::Effect;
/// use stompchain_effects::{DistortionStage, DistortionType};
///
/// let mut dist = DistortionStage::new(44100.0);
/// dist.set_type(DistortionType::Fuzz);
/// dist.set_drive(1.0);
/// for i in 0..1000 {
///     let y = dist.process((i as f32 * 0.1).sin() * 10.0);
///     assert!(y.abs() <= 0.6);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DistortionStage {
    kind: DistortionType,
    drive: f32,
    sample_rate: f32,
    /// Running mean removed from the Crunch voice.
    crunch_dc: OnePole,
    octave_phase: f32,
    fuzz_s1: f32,
    fuzz_s2: f32,
    smoothing: OnePoleCascade<8>,
}

impl DistortionStage {
    /// Create a Crunch stage at drive 0.5.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            kind: DistortionType::Crunch,
            drive: drive_factor(0.5),
            sample_rate,
            crunch_dc: OnePole::new(0.001),
            octave_phase: 0.0,
            fuzz_s1: 0.0,
            fuzz_s2: 0.0,
            smoothing: OnePoleCascade::new(SMOOTHING),
        }
    }

    /// Select the voice.
    pub fn set_type(&mut self, kind: DistortionType) {
        self.kind = kind;
    }

    /// Current voice.
    pub fn distortion_type(&self) -> DistortionType {
        self.kind
    }

    /// Set the drive control (0–1).
    pub fn set_drive(&mut self, drive: f32) {
        self.drive = drive_factor(drive);
    }

    /// Linear pre-gain currently applied.
    pub fn drive_factor(&self) -> f32 {
        self.drive
    }

    #[inline]
    fn crunch(&mut self, pre: f32) -> f32 {
        let shaped = tanhf(0.2 * pre + 0.05 * pre * pre);
        shaped - self.crunch_dc.process(shaped)
    }

    #[inline]
    fn fuzz(&mut self, pre: f32) -> f32 {
        let magnitude = fabsf(pre);
        let mut y = if magnitude > FUZZ_KNEE {
            let clipped = FUZZ_KNEE + tanhf((magnitude - FUZZ_KNEE) * 8.0) * 0.3;
            if pre > 0.0 { clipped } else { -clipped }
        } else {
            pre + 2.0 * pre * pre * pre
        };

        self.octave_phase += TAU * OCTAVE_HZ / self.sample_rate;
        if self.octave_phase >= TAU {
            self.octave_phase -= TAU;
        }
        y += sinf(self.octave_phase) * OCTAVE_LEVEL * fabsf(y);

        self.fuzz_s1 = self.fuzz_s1 * 0.7 + y * 0.3;
        self.fuzz_s2 = self.fuzz_s2 * 0.6 + self.fuzz_s1 * 0.4;
        self.fuzz_s2
    }
}

#[inline]
fn drive_factor(control: f32) -> f32 {
    1.0 + control.clamp(0.0, 1.0) * 3.0
}

impl Effect for DistortionStage {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let pre = (gate(input, GATE_THRESHOLD) * self.drive).clamp(-PRE_CLAMP, PRE_CLAMP);
        let shaped = match self.kind {
            DistortionType::Clean => tanhf(0.1 * pre),
            DistortionType::Crunch => self.crunch(pre),
            DistortionType::Fuzz => self.fuzz(pre),
        };
        (self.smoothing.process(shaped) * POST_GAIN).clamp(-OUTPUT_CLAMP, OUTPUT_CLAMP)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.reset();
    }

    fn reset(&mut self) {
        self.crunch_dc.reset();
        self.octave_phase = 0.0;
        self.fuzz_s1 = 0.0;
        self.fuzz_s2 = 0.0;
        self.smoothing.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_round_trip() {
        for kind in DistortionType::ALL {
            assert_eq!(DistortionType::from_index(kind.index()), kind);
        }
        assert_eq!(DistortionType::from_index(7), DistortionType::Fuzz);
        assert_eq!(DistortionType::default().label(), "Crunch");
    }

    #[test]
    fn every_voice_respects_the_clamp() {
        for kind in DistortionType::ALL {
            let mut dist = DistortionStage::new(44100.0);
            dist.set_type(kind);
            dist.set_drive(1.0);
            for i in 0..44100 {
                let x = libm::sinf(i as f32 * 0.013) * 10.0;
                let y = dist.process(x);
                assert!(y.abs() <= OUTPUT_CLAMP, "{:?} produced {}", kind, y);
            }
        }
    }

    #[test]
    fn clean_is_quieter_than_fuzz() {
        let peak = |kind| {
            let mut dist = DistortionStage::new(44100.0);
            dist.set_type(kind);
            let mut peak: f32 = 0.0;
            for i in 0..4410 {
                let y = dist.process(libm::sinf(i as f32 * 0.06) * 0.5);
                peak = peak.max(y.abs());
            }
            peak
        };
        assert!(peak(DistortionType::Clean) < peak(DistortionType::Fuzz));
    }

    #[test]
    fn crunch_removes_dc_offset() {
        let mut dist = DistortionStage::new(44100.0);
        dist.set_drive(1.0);
        let mut sum = 0.0;
        let n = 44100;
        for i in 0..n * 4 {
            let y = dist.process(libm::sinf(i as f32 * 0.05) * 0.4);
            if i >= n * 3 {
                sum += y;
            }
        }
        let mean = sum / n as f32;
        assert!(mean.abs() < 2e-3, "residual DC {}", mean);
    }

    #[test]
    fn gate_silences_noise_floor() {
        let mut dist = DistortionStage::new(48000.0);
        dist.set_type(DistortionType::Fuzz);
        for _ in 0..1000 {
            assert_eq!(dist.process(0.002), 0.0);
        }
    }
}
