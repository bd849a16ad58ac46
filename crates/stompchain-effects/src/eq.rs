//! Four-band tone stack at the end of the amp stage.
//!
//! Each band is a one-pole split at a fixed frequency with its own gain
//! curve, gain clamp and anti-alias smoothing. The bands are summed with
//! fixed weights, smoothed once more and clamped.
//!
//! | Band | Split | Response | Gain (control `v` in [0,1]) | Clamp |
//! |------|-------|----------|-----------------------------|-------|
//! | Bass | 80 Hz | lowpass | `0.7 + (2v − 1)·2` | [0.3, 1.5] |
//! | Mid | 1.5 kHz | highpass | `1.2 + (2v − 1)·4` | [0.5, 3.0] |
//! | Treble | 3 kHz | highpass | `1.3 + (2v − 1)·4` | [0.6, 3.5] |
//! | Presence | 5 kHz | highpass | `1.4 + (2v − 1)·3` | [0.7, 3.0] |
//!
//! Band weights are 0.6, 1.2, 1.3 and 1.1, scaled by 0.7; the output is
//! clamped to ±0.8.

use stompchain_core::{Effect, OnePole, OnePoleCascade, gate};

const GATE_THRESHOLD: f32 = 0.001;
const OUTPUT_CLAMP: f32 = 0.8;
const SUM_SCALE: f32 = 0.7;

/// Static description of one band.
#[derive(Debug, Clone, Copy)]
struct BandSpec {
    freq_hz: f32,
    center: f32,
    span: f32,
    min_gain: f32,
    max_gain: f32,
    weight: f32,
    lowpass: bool,
}

const BASS: BandSpec = BandSpec {
    freq_hz: 80.0,
    center: 0.7,
    span: 2.0,
    min_gain: 0.3,
    max_gain: 1.5,
    weight: 0.6,
    lowpass: true,
};

const MID: BandSpec = BandSpec {
    freq_hz: 1500.0,
    center: 1.2,
    span: 4.0,
    min_gain: 0.5,
    max_gain: 3.0,
    weight: 1.2,
    lowpass: false,
};

const TREBLE: BandSpec = BandSpec {
    freq_hz: 3000.0,
    center: 1.3,
    span: 4.0,
    min_gain: 0.6,
    max_gain: 3.5,
    weight: 1.3,
    lowpass: false,
};

const PRESENCE: BandSpec = BandSpec {
    freq_hz: 5000.0,
    center: 1.4,
    span: 3.0,
    min_gain: 0.7,
    max_gain: 3.0,
    weight: 1.1,
    lowpass: false,
};

impl BandSpec {
    fn gain(&self, control: f32) -> f32 {
        (self.center + (control.clamp(0.0, 1.0) * 2.0 - 1.0) * self.span)
            .clamp(self.min_gain, self.max_gain)
    }
}

/// One band: splitter, gain and its anti-alias smoothing.
#[derive(Debug, Clone)]
struct Band<const N: usize> {
    spec: BandSpec,
    split: OnePole,
    smoothing: OnePoleCascade<N>,
    gain: f32,
}

impl<const N: usize> Band<N> {
    fn new(spec: BandSpec, sample_rate: f32, smoothing: [f32; N]) -> Self {
        Self {
            spec,
            split: OnePole::from_frequency(sample_rate, spec.freq_hz),
            smoothing: OnePoleCascade::new(smoothing),
            gain: spec.gain(0.5),
        }
    }

    fn set_control(&mut self, control: f32) {
        self.gain = self.spec.gain(control);
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let low = self.split.process(input);
        let shaped = if self.spec.lowpass {
            low * self.gain
        } else {
            (input - low) * self.gain
        };
        self.smoothing.process(shaped) * self.spec.weight
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.split = OnePole::from_frequency(sample_rate, self.spec.freq_hz);
        self.smoothing.reset();
    }

    fn reset(&mut self) {
        self.split.reset();
        self.smoothing.reset();
    }
}

/// Bass / mid / treble / presence tone stack.
///
/// # Example
///
/// ```rust
/// use stompchain_core::Effect;
/// use stompchain_effects::ToneStack;
///
/// let mut eq = ToneStack::new(44100.0);
/// eq.set_bass(0.8);
/// eq.set_presence(0.3);
/// let y = eq.process(0.25);
/// assert!(y.abs() <= 0.8);
/// ```
#[derive(Debug, Clone)]
pub struct ToneStack {
    bass: Band<1>,
    mid: Band<1>,
    treble: Band<2>,
    presence: Band<2>,
    output: OnePole,
}

impl ToneStack {
    /// Create a flat (all controls at 0.5) tone stack.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            bass: Band::new(BASS, sample_rate, [0.3]),
            mid: Band::new(MID, sample_rate, [0.3]),
            treble: Band::new(TREBLE, sample_rate, [0.2, 0.3]),
            presence: Band::new(PRESENCE, sample_rate, [0.2, 0.3]),
            output: OnePole::new(0.2),
        }
    }

    /// Bass control, normalized.
    pub fn set_bass(&mut self, value: f32) {
        self.bass.set_control(value);
    }

    /// Mid control, normalized.
    pub fn set_mid(&mut self, value: f32) {
        self.mid.set_control(value);
    }

    /// Treble control, normalized.
    pub fn set_treble(&mut self, value: f32) {
        self.treble.set_control(value);
    }

    /// Presence control, normalized.
    pub fn set_presence(&mut self, value: f32) {
        self.presence.set_control(value);
    }

    /// Current linear band gains `[bass, mid, treble, presence]`.
    pub fn band_gains(&self) -> [f32; 4] {
        [self.bass.gain, self.mid.gain, self.treble.gain, self.presence.gain]
    }
}

impl Effect for ToneStack {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let x = gate(input, GATE_THRESHOLD);
        let sum = self.bass.process(x)
            + self.mid.process(x)
            + self.treble.process(x)
            + self.presence.process(x);
        self.output
            .process(sum * SUM_SCALE)
            .clamp(-OUTPUT_CLAMP, OUTPUT_CLAMP)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.bass.set_sample_rate(sample_rate);
        self.mid.set_sample_rate(sample_rate);
        self.treble.set_sample_rate(sample_rate);
        self.presence.set_sample_rate(sample_rate);
        self.output.reset();
    }

    fn reset(&mut self) {
        self.bass.reset();
        self.mid.reset();
        self.treble.reset();
        self.presence.reset();
        self.output.reset();
    }
}
