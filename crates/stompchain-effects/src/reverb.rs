//! Schroeder-style reverb with shimmer and a reverse mode.
//!
//! ## Network
//!
//! ```text
//! in ─► pre-delay ─► AP 347 ─► AP 113 ─► AP 37 ─► AP 59 ─┬─► comb ×6 ─► Σ ─► AP 225 ─► AP 341
//!                                                         │   (damped)
//!                                       ┌─────────────────┘
//!       ─► shimmer ─► 3-pole smoothing ─► soft saturation ─► ×0.2 ─► wet
//! ```
//!
//! Buffer lengths are specified at 44.1 kHz and scaled to the running rate.
//! The room-size control moves the pre-delay (0–10 ms), the comb lengths
//! (×1 to ×16), the comb feedback (0.6–0.95) and the damping.
//!
//! ## Reverse
//!
//! A four-second ring records the input while a second cursor walks it
//! backwards, starting two seconds behind the write head. The backwards
//! signal is fed through the same network, faded in by a slow attack
//! envelope, smoothed by a 5-pole cascade and added to the dry signal.

use libm::{fabsf, tanhf};
use stompchain_core::allpass::scale_length;
use stompchain_core::{
    AllpassDiffuser, CombFilter, DelayLine, Effect, OnePoleCascade, equal_power_levels,
    ms_to_samples,
};

use crate::shimmer::Shimmer;

const MIN_MIX: f32 = 0.01;
const ALLPASS_GAIN: f32 = 0.5;
const INPUT_ALLPASSES: [usize; 4] = [347, 113, 37, 59];
const OUTPUT_ALLPASSES: [usize; 2] = [225, 341];
const COMB_LENGTHS: [usize; 6] = [1116, 1188, 1277, 1356, 1422, 1491];
const MAX_SIZE_SCALE: f32 = 16.0;
const PRE_DELAY_CAPACITY_SECONDS: f32 = 0.2;
const PRE_DELAY_MS_AT_FULL_SIZE: f32 = 10.0;
const SATURATION_KNEE: f32 = 0.2;
const OUTPUT_SCALE: f32 = 0.2;

const REVERSE_SECONDS: f32 = 4.0;
const REVERSE_START_SECONDS: f32 = 2.0;
const REVERSE_ATTACK: f32 = 0.001;
const REVERSE_WET: f32 = 0.6;

/// Pre-delay, diffusers, comb bank and output shaping.
#[derive(Debug, Clone)]
struct ReverbNetwork {
    sample_rate: f32,
    pre_delay: DelayLine,
    pre_delay_samples: usize,
    input_diffusers: [AllpassDiffuser; 4],
    combs: [CombFilter; 6],
    output_diffusers: [AllpassDiffuser; 2],
    shimmer: Shimmer,
    smoothing: OnePoleCascade<3>,
}

impl ReverbNetwork {
    fn new(sample_rate: f32) -> Self {
        let max_comb = |base: usize| scale_length((base as f32 * MAX_SIZE_SCALE) as usize, sample_rate);
        Self {
            sample_rate,
            pre_delay: DelayLine::from_time(sample_rate, PRE_DELAY_CAPACITY_SECONDS),
            pre_delay_samples: 0,
            input_diffusers: INPUT_ALLPASSES
                .map(|len| AllpassDiffuser::scaled(len, sample_rate, ALLPASS_GAIN)),
            combs: COMB_LENGTHS.map(|len| CombFilter::new(max_comb(len))),
            output_diffusers: OUTPUT_ALLPASSES
                .map(|len| AllpassDiffuser::scaled(len, sample_rate, ALLPASS_GAIN)),
            shimmer: Shimmer::new(sample_rate),
            smoothing: OnePoleCascade::new([0.6, 0.4, 0.2]),
        }
    }

    fn set_size(&mut self, size: f32) {
        let size = size.clamp(0.0, 1.0);
        let rate_scale = self.sample_rate / 44100.0;
        self.pre_delay_samples = ms_to_samples(PRE_DELAY_MS_AT_FULL_SIZE * size, self.sample_rate) as usize;

        let length_scale = (1.0 + (MAX_SIZE_SCALE - 1.0) * size) * rate_scale;
        let feedback = 0.6 + 0.35 * size;
        let damping = 0.2 + 0.3 * (1.0 - size);
        for (comb, &base) in self.combs.iter_mut().zip(COMB_LENGTHS.iter()) {
            comb.set_length((base as f32 * length_scale) as usize);
            comb.set_feedback(feedback);
            comb.set_damping(damping);
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.pre_delay.write(input);
        let delayed = self.pre_delay.read(self.pre_delay_samples as f32);

        let diffused = self
            .input_diffusers
            .iter_mut()
            .fold(delayed, |x, ap| ap.process(x));

        let mut comb_sum = 0.0;
        for (i, comb) in self.combs.iter_mut().enumerate() {
            comb_sum += comb.process(diffused) / (6.0 + 0.1 * i as f32);
        }

        let tail = self
            .output_diffusers
            .iter_mut()
            .fold(comb_sum, |x, ap| ap.process(x));

        let mut wet = self.smoothing.process(self.shimmer.process(tail));
        if fabsf(wet) > SATURATION_KNEE {
            wet = tanhf(wet * SATURATION_KNEE) / SATURATION_KNEE;
        }
        wet * OUTPUT_SCALE
    }

    fn clear(&mut self) {
        self.pre_delay.clear();
        for ap in &mut self.input_diffusers {
            ap.clear();
        }
        for comb in &mut self.combs {
            comb.clear();
        }
        for ap in &mut self.output_diffusers {
            ap.clear();
        }
        self.shimmer.reset();
        self.smoothing.reset();
    }
}

/// Backwards reader over a continuous input recording.
#[derive(Debug, Clone)]
struct ReverseReader {
    ring: DelayLine,
    /// `None` until the first sample after (re)activation.
    cursor: Option<f32>,
    start_offset: f32,
    envelope: f32,
    smoothing: OnePoleCascade<5>,
}

impl ReverseReader {
    fn new(sample_rate: f32) -> Self {
        Self {
            ring: DelayLine::new((REVERSE_SECONDS * sample_rate) as usize),
            cursor: None,
            start_offset: REVERSE_START_SECONDS * sample_rate,
            envelope: 0.0,
            smoothing: OnePoleCascade::new([0.9, 0.8, 0.6, 0.4, 0.2]),
        }
    }

    #[inline]
    fn next(&mut self, input: f32) -> f32 {
        self.ring.write(input);
        let len = self.ring.len() as f32;
        let start = self.ring.write_position() as f32 - self.start_offset;
        let mut cursor = self.cursor.unwrap_or(start) - 1.0;
        while cursor < 0.0 {
            cursor += len;
        }
        self.cursor = Some(cursor);
        self.ring.read_at(cursor)
    }

    #[inline]
    fn shape(&mut self, wet: f32) -> f32 {
        self.envelope += (1.0 - self.envelope) * REVERSE_ATTACK;
        self.smoothing.process(wet * self.envelope)
    }

    fn clear(&mut self) {
        self.ring.clear();
        self.restart();
    }

    fn restart(&mut self) {
        self.cursor = None;
        self.envelope = 0.0;
        self.smoothing.reset();
    }
}

/// Reverb stage.
///
/// # Parameters
///
/// | Control | Range | Notes |
/// |---------|-------|-------|
/// | mix | 0–1 | ≤ 0.01 bypasses; equal-power dry/wet in normal mode |
/// | size | 0–1 | pre-delay, comb lengths, feedback and damping |
/// | shimmer | 0–1 | active above 0.01 |
/// | reverse | bool | backwards reader feeding the network |
///
/// # Example
///
/// ```rust
/// use stompchain_core::Effect;
/// use stompchain_effects::ReverbStage;
///
/// let mut reverb = ReverbStage::new(48000.0);
/// reverb.set_size(0.8);
/// reverb.set_mix(0.4);
/// let y = reverb.process(0.5);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct ReverbStage {
    network: ReverbNetwork,
    reverse_reader: ReverseReader,
    mix: f32,
    size: f32,
    reverse: bool,
}

impl ReverbStage {
    /// Allocate the network for `sample_rate` with mix 0.3 and size 0.5.
    pub fn new(sample_rate: f32) -> Self {
        let mut stage = Self {
            network: ReverbNetwork::new(sample_rate),
            reverse_reader: ReverseReader::new(sample_rate),
            mix: 0.3,
            size: 0.5,
            reverse: false,
        };
        stage.network.set_size(stage.size);
        stage
    }

    /// Set the dry/wet mix (0–1).
    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }

    /// Set the room size (0–1).
    pub fn set_size(&mut self, size: f32) {
        self.size = size.clamp(0.0, 1.0);
        self.network.set_size(self.size);
    }

    /// Set the shimmer amount (0–1).
    pub fn set_shimmer(&mut self, amount: f32) {
        self.network.shimmer.set_amount(amount);
    }

    /// Enable or disable reverse mode.
    pub fn set_reverse(&mut self, reverse: bool) {
        if reverse && !self.reverse {
            self.reverse_reader.restart();
        }
        self.reverse = reverse;
    }

    /// Whether reverse mode is enabled.
    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    /// Current comb loop lengths in samples.
    pub fn comb_lengths(&self) -> [usize; 6] {
        let mut lengths = [0; 6];
        for (slot, comb) in lengths.iter_mut().zip(self.network.combs.iter()) {
            *slot = comb.length();
        }
        lengths
    }

    /// Pre-delay in samples.
    pub fn pre_delay_samples(&self) -> usize {
        self.network.pre_delay_samples
    }
}

impl Effect for ReverbStage {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        if self.mix <= MIN_MIX {
            return input;
        }

        if self.reverse {
            let backwards = self.reverse_reader.next(input);
            let wet = self.network.process(backwards);
            let shaped = self.reverse_reader.shape(wet);
            return input + shaped * self.mix * REVERSE_WET;
        }

        let wet = self.network.process(input);
        let (dry_level, wet_level) = equal_power_levels(self.mix);
        input * dry_level + wet * wet_level
    }

    /// Reallocate the network for a new rate. Not real-time safe.
    fn set_sample_rate(&mut self, sample_rate: f32) {
        let shimmer = self.network.shimmer.amount();
        self.network = ReverbNetwork::new(sample_rate);
        self.network.set_size(self.size);
        self.network.shimmer.set_amount(shimmer);
        self.reverse_reader = ReverseReader::new(sample_rate);
    }

    fn reset(&mut self) {
        self.network.clear();
        self.reverse_reader.clear();
    }
}
