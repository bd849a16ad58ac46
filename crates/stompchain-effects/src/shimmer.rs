//! Dual-voice pitch shifter blended into the reverb tail.
//!
//! Each voice writes the diffused signal into a half-second history and
//! reads it back through a cursor that advances faster than real time
//! (`2^(semitones/12)` samples per sample). The cursor laps the write head
//! periodically, which is what raises the pitch. A 1024 Hz sine crossfade
//! alternates between the octave (+12) and fourth (+5) voices.

use stompchain_core::delay::seconds_to_len;
use stompchain_core::{DelayLine, Lfo, OnePoleCascade, semitones_to_ratio};

const HISTORY_SECONDS: f32 = 0.5;
const WOBBLE_HZ: f32 = 3.1;
const WOBBLE_SEMITONES: f32 = 0.1;
const CROSSFADE_HZ: f32 = 1024.0;
const VOICE_LEVEL: f32 = 0.6;
const MIN_AMOUNT: f32 = 0.01;

/// One transposing read head over its own history.
#[derive(Debug, Clone)]
struct PitchVoice {
    history: DelayLine,
    cursor: f32,
    semitones: f32,
    wobble: Lfo,
}

impl PitchVoice {
    fn new(sample_rate: f32, semitones: f32, wobble_phase: f32) -> Self {
        Self {
            history: DelayLine::from_time(sample_rate, HISTORY_SECONDS),
            cursor: 0.0,
            semitones,
            wobble: Lfo::new(sample_rate, WOBBLE_HZ).with_phase(wobble_phase),
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.history.write(input);
        let ratio = semitones_to_ratio(self.semitones + self.wobble.next() * WOBBLE_SEMITONES);
        let len = self.history.len() as f32;
        self.cursor += ratio;
        if self.cursor >= len {
            self.cursor -= len;
        }
        self.history.read_cubic_at(self.cursor)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.history.resize(seconds_to_len(sample_rate, HISTORY_SECONDS));
        self.wobble.set_sample_rate(sample_rate);
        self.reset();
    }

    fn reset(&mut self) {
        self.history.clear();
        self.cursor = 0.0;
        self.wobble.reset();
    }
}

/// Octave + fourth shimmer.
///
/// # Example
///
/// ```rust
/// use stompchain_effects::Shimmer;
///
/// let mut shimmer = Shimmer::new(44100.0);
/// // Inactive below 1 %: the input passes untouched.
/// assert_eq!(shimmer.process(0.25), 0.25);
///
/// shimmer.set_amount(0.6);
/// let y = shimmer.process(0.25);
/// assert!(y.abs() < 0.25);
/// ```
#[derive(Debug, Clone)]
pub struct Shimmer {
    octave: PitchVoice,
    fourth: PitchVoice,
    crossfade: Lfo,
    smoothing: OnePoleCascade<2>,
    amount: f32,
}

impl Shimmer {
    /// Create an inactive shimmer (amount 0).
    pub fn new(sample_rate: f32) -> Self {
        Self {
            octave: PitchVoice::new(sample_rate, 12.0, 0.0),
            // Quarter-cycle offset: the fourth wobbles on a cosine.
            fourth: PitchVoice::new(sample_rate, 5.0, 0.25),
            crossfade: Lfo::new(sample_rate, CROSSFADE_HZ),
            smoothing: OnePoleCascade::new([0.2, 0.3]),
            amount: 0.0,
        }
    }

    /// Set the blend amount (0–1). Amounts ≤ 0.01 disable the shimmer.
    pub fn set_amount(&mut self, amount: f32) {
        self.amount = amount.clamp(0.0, 1.0);
    }

    /// Current blend amount.
    pub fn amount(&self) -> f32 {
        self.amount
    }

    /// True when the voices are running.
    pub fn is_active(&self) -> bool {
        self.amount > MIN_AMOUNT
    }

    /// Blend pitched copies of `input` back into it.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if !self.is_active() {
            return input;
        }
        let level = VOICE_LEVEL * self.amount;
        let octave = self.octave.process(input);
        let fourth = self.fourth.process(input);
        let fade = self.crossfade.next_unipolar();
        let mixed = octave * level * (1.0 - fade) + fourth * level * fade;
        let clean = self.smoothing.process(mixed);
        input * (1.0 - self.amount) + clean * self.amount
    }

    /// Reallocate histories for `sample_rate`.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.octave.set_sample_rate(sample_rate);
        self.fourth.set_sample_rate(sample_rate);
        self.crossfade.set_sample_rate(sample_rate);
        self.reset();
    }

    /// Clear histories and restart the oscillators.
    pub fn reset(&mut self) {
        self.octave.reset();
        self.fourth.reset();
        self.crossfade.reset();
        self.smoothing.reset();
    }
}
