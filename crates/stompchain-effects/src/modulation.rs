//! LFO-driven chorus, flanger and phaser.
//!
//! Chorus and flanger do not own a buffer: they tap the delay stage's line
//! at a short modulated offset, so [`ModulationStage::process`] takes that
//! line as a read-only argument instead of implementing [`stompchain_core::Effect`].
//!
//! The LFO output (`0.5 + 0.5·sin`) is smoothed by a 0.05 one-pole before it
//! reaches any delay time or allpass coefficient.

use libm::tanhf;
use stompchain_core::{DelayLine, Lfo, NoiseGate, OnePole, ms_to_samples};

const MIN_DEPTH: f32 = 0.01;
const GATE_OPEN: f32 = 0.004;
const GATE_CLOSE: f32 = 0.002;
const OUTPUT_CEILING: f32 = 0.8;
/// Pole of the one-pole recursion on the flanger's tap output
/// (`w = tap + w·r`). The delay line itself is never written back into.
const FLANGER_TAP_RESONANCE: f32 = 0.25;

/// Modulation voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModulationType {
    /// 3–8 ms modulated tap mixed with the dry signal.
    #[default]
    Chorus,
    /// 0.5–3 ms resonant tap, subtracted from the dry signal.
    Flanger,
    /// Two smoothed one-pole allpass stages.
    Phaser,
}

impl ModulationType {
    /// All voices in selector order.
    pub const ALL: [ModulationType; 3] = [Self::Chorus, Self::Flanger, Self::Phaser];

    /// Voice for a selector index; out-of-range indices saturate to Phaser.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Chorus,
            1 => Self::Flanger,
            _ => Self::Phaser,
        }
    }

    /// Selector index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Chorus => "Chorus",
            Self::Flanger => "Flanger",
            Self::Phaser => "Phaser",
        }
    }
}

/// One smoothed allpass section of the phaser.
#[derive(Debug, Clone, Copy, Default)]
struct PhaserSection {
    state: f32,
}

impl PhaserSection {
    #[inline]
    fn process(&mut self, input: f32, alpha: f32) -> f32 {
        let y = alpha * (input + self.state) - self.state;
        self.state = self.state * 0.9 + y * 0.1;
        y
    }
}

/// Chorus / flanger / phaser stage.
///
/// # Example
///
/// ```rust
/// use stompchain_core::DelayLine;
/// use stompchain_effects::{ModulationStage, ModulationType};
///
/// let mut tap = DelayLine::new(48000);
/// let mut modulation = ModulationStage::new(48000.0);
/// modulation.set_type(ModulationType::Flanger);
/// modulation.set_depth(0.8);
///
/// for i in 0..480 {
///     let x = (i as f32 * 0.05).sin() * 0.5;
///     let y = modulation.process(x, &tap);
///     tap.write(x);
///     assert!(y.abs() <= 0.8);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ModulationStage {
    kind: ModulationType,
    depth: f32,
    sample_rate: f32,
    lfo: Lfo,
    lfo_smoothed: OnePole,
    gate: NoiseGate,
    tap_filter: OnePole,
    flanger_wet: f32,
    phaser: [PhaserSection; 2],
    output_filter: [OnePole; 2],
}

impl ModulationStage {
    /// Create a chorus at rate 0.5 and depth 0.5.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            kind: ModulationType::Chorus,
            depth: 0.5,
            sample_rate,
            lfo: Lfo::new(sample_rate, rate_hz(0.5)),
            lfo_smoothed: OnePole::with_state(0.05, 0.5),
            gate: NoiseGate::new(GATE_OPEN, GATE_CLOSE),
            tap_filter: OnePole::new(0.2),
            flanger_wet: 0.0,
            phaser: [PhaserSection::default(); 2],
            output_filter: [OnePole::new(0.15), OnePole::new(0.5)],
        }
    }

    /// Select the voice.
    pub fn set_type(&mut self, kind: ModulationType) {
        self.kind = kind;
    }

    /// Current voice.
    pub fn modulation_type(&self) -> ModulationType {
        self.kind
    }

    /// Set the rate control (0–1 → 0.1–5 Hz).
    pub fn set_rate(&mut self, rate: f32) {
        self.lfo.set_frequency(rate_hz(rate));
    }

    /// LFO frequency in Hz.
    pub fn rate_hz(&self) -> f32 {
        self.lfo.frequency()
    }

    /// Set the depth control (0–1). Depth ≤ 0.01 bypasses the stage.
    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth.clamp(0.0, 1.0);
    }

    /// Process one sample, tapping `line` for the chorus and flanger voices.
    ///
    /// `line` is read but never written; the caller advances it after this call.
    #[inline]
    pub fn process(&mut self, input: f32, line: &DelayLine) -> f32 {
        if self.depth <= MIN_DEPTH {
            return input;
        }

        let x = self.gate.process(input);
        let m = self.lfo_smoothed.process(self.lfo.next_unipolar());

        let modulated = match self.kind {
            ModulationType::Chorus => {
                let delay = ms_to_samples(3.0 + 5.0 * m, self.sample_rate);
                let tap = self.tap_filter.process(read_tap(line, delay));
                let mix = self.depth * 0.3;
                x * (1.0 - mix) + tap * mix
            }
            ModulationType::Flanger => {
                let delay = ms_to_samples(0.5 + 2.5 * m, self.sample_rate).max(1.0);
                self.flanger_wet = read_tap(line, delay) + self.flanger_wet * FLANGER_TAP_RESONANCE;
                let tap = self.tap_filter.process(self.flanger_wet);
                x - tap * self.depth * 0.2
            }
            ModulationType::Phaser => {
                let freq = 100.0 + 1000.0 * m;
                let alpha = (freq / (freq + self.sample_rate)).clamp(0.1, 0.9);
                let phased = self
                    .phaser
                    .iter_mut()
                    .fold(x, |acc, section| section.process(acc, alpha));
                let wet = self.tap_filter.process(phased);
                let mix = self.depth * 0.25;
                x * (1.0 - mix) + wet * mix
            }
        };

        let smoothed = self
            .output_filter
            .iter_mut()
            .fold(modulated, |acc, pole| pole.process(acc));
        OUTPUT_CEILING * tanhf(smoothed / OUTPUT_CEILING)
    }

    /// Rebuild rate-dependent state for a new sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.lfo.set_sample_rate(sample_rate);
        self.reset();
    }

    /// Clear all filter memory and restart the LFO.
    pub fn reset(&mut self) {
        self.lfo.reset();
        self.lfo_smoothed.reset_to(0.5);
        self.gate.reset();
        self.tap_filter.reset();
        self.flanger_wet = 0.0;
        self.phaser = [PhaserSection::default(); 2];
        for pole in &mut self.output_filter {
            pole.reset();
        }
    }
}

/// Sample written `delay` samples ago.
#[inline]
fn read_tap(line: &DelayLine, delay: f32) -> f32 {
    line.read((delay - 1.0).max(0.0))
}

#[inline]
fn rate_hz(control: f32) -> f32 {
    0.1 + control.clamp(0.0, 1.0) * 4.9
}
