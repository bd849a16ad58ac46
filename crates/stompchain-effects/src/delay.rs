//! Feedback delay with a reverse-playback sub-mode.
//!
//! The main line holds four seconds of audio. In normal mode the stage reads
//! the sample written `D` samples ago, writes `input + delayed·feedback` and
//! mixes `delayed` against the dry signal.
//!
//! # Reverse mode
//!
//! A second ring captures the stage input continuously. Every `chunk`
//! samples (chunk = delay time in samples) the newest chunk is copied out
//! newest-first and played back:
//!
//! ```text
//!            counter ≥ chunk
//! Collecting ───────────────► Replaying { cursor }
//!     ▲                              │
//!     └──────── cursor == chunk ─────┘  (emits dry for that sample)
//! ```
//!
//! While replaying, the reversed sample is also written (scaled by the
//! feedback) into the main line, so later echoes and the modulation tap
//! pick up reversed material.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use stompchain_core::{DelayLine, Effect};

/// Longest delay time in seconds; also the capacity of every buffer.
pub const MAX_DELAY_SECONDS: f32 = 4.0;
const MIN_DELAY_SECONDS: f32 = 0.1;
const DELAY_SPAN_SECONDS: f32 = 3.9;
const MIN_MIX: f32 = 0.01;
const MAX_FEEDBACK: f32 = 0.98;
const REVERSE_WET_BOOST: f32 = 1.5;

/// Reverse playback phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReverseState {
    /// Filling the capture ring; output follows normal mode.
    #[default]
    Collecting,
    /// Emitting the reversed chunk; `cursor` is the next index to play.
    Replaying {
        /// Next sample of the reversed chunk.
        cursor: usize,
    },
}

/// Four-second feedback delay with reverse mode.
///
/// # Example
///
/// ```rust
/// use stompchain_core::Effect;
/// use stompchain_effects::DelayStage;
///
/// let mut delay = DelayStage::new(1000.0);
/// delay.set_time(0.0); // 0.1 s
/// delay.set_mix(1.0);
/// delay.set_feedback(0.0);
///
/// assert_eq!(delay.process(1.0), 0.0);
/// for _ in 1..100 {
///     delay.process(0.0);
/// }
/// assert_eq!(delay.process(0.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DelayStage {
    sample_rate: f32,
    line: DelayLine,
    capture: DelayLine,
    reversed: Vec<f32>,
    reversed_len: usize,
    state: ReverseState,
    counter: usize,
    /// Normalized time control. Seconds and samples are derived in f32
    /// (`⌊(0.1 + 3.9·t)·sr⌋`), which lands 0.5 at 44.1 kHz on 90405.
    time: f32,
    feedback: f32,
    mix: f32,
    reverse: bool,
}

impl DelayStage {
    /// Allocate all buffers for `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        let len = buffer_len(sample_rate);
        Self {
            sample_rate,
            line: DelayLine::new(len),
            capture: DelayLine::new(len),
            reversed: vec![0.0; len],
            reversed_len: 0,
            state: ReverseState::Collecting,
            counter: 0,
            time: 0.5,
            feedback: 0.3,
            mix: 0.3,
            reverse: false,
        }
    }

    /// Set the time control (0–1 → 0.1–4.0 s).
    pub fn set_time(&mut self, time: f32) {
        self.time = time.clamp(0.0, 1.0);
    }

    /// Delay time in seconds.
    pub fn time_seconds(&self) -> f32 {
        time_seconds(self.time)
    }

    /// Set the feedback (0–1, capped just below unity).
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, MAX_FEEDBACK);
    }

    /// Set the dry/wet mix (0–1). Mix ≤ 0.01 passes the input through.
    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }

    /// Enable or disable reverse playback.
    pub fn set_reverse(&mut self, reverse: bool) {
        if self.reverse != reverse {
            self.state = ReverseState::Collecting;
            self.counter = 0;
        }
        self.reverse = reverse;
    }

    /// Whether reverse playback is enabled.
    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    /// Current reverse playback phase.
    pub fn reverse_state(&self) -> ReverseState {
        self.state
    }

    /// Echo distance in samples: `⌊time·sr⌋`, clamped to `[1, len − 1]`.
    pub fn delay_samples(&self) -> usize {
        self.raw_delay_samples()
            .min(self.line.len().saturating_sub(1))
            .max(1)
    }

    /// Main delay line, tapped by the modulation stage.
    pub fn line(&self) -> &DelayLine {
        &self.line
    }

    /// Keep the main line moving while the stage itself is silent.
    ///
    /// Writes the input with no feedback term so the modulation tap always
    /// sees recent audio.
    #[inline]
    pub fn feed_idle(&mut self, input: f32) {
        self.line.write(input);
    }

    fn raw_delay_samples(&self) -> usize {
        (time_seconds(self.time) * self.sample_rate) as usize
    }

    fn chunk_len(&self) -> usize {
        self.raw_delay_samples().min(self.capture.len()).max(1)
    }

    #[inline]
    fn process_normal(&mut self, input: f32) -> f32 {
        let delay = self.delay_samples();
        let delayed = self.line.read((delay - 1) as f32);
        self.line.write(input + delayed * self.feedback);
        input * (1.0 - self.mix) + delayed * self.mix
    }

    #[inline]
    fn process_reverse(&mut self, input: f32) -> f32 {
        self.capture.write(input);
        self.counter += 1;

        if self.state == ReverseState::Collecting {
            let chunk = self.chunk_len();
            if self.counter < chunk {
                return self.process_normal(input);
            }
            self.reversed_len = self.capture.copy_reversed_tail(&mut self.reversed[..chunk]);
            self.state = ReverseState::Replaying { cursor: 0 };
        }

        let ReverseState::Replaying { cursor } = self.state else {
            return self.process_normal(input);
        };

        if cursor < self.reversed_len {
            let sample = self.reversed[cursor];
            self.line.write(sample * self.feedback);
            self.state = ReverseState::Replaying { cursor: cursor + 1 };
            let wet = (self.mix * REVERSE_WET_BOOST).min(1.0);
            input * (1.0 - wet) + sample * wet
        } else {
            self.state = ReverseState::Collecting;
            self.counter = 0;
            input
        }
    }
}

#[inline]
fn time_seconds(control: f32) -> f32 {
    MIN_DELAY_SECONDS + control.clamp(0.0, 1.0) * DELAY_SPAN_SECONDS
}

#[inline]
fn buffer_len(sample_rate: f32) -> usize {
    ((MAX_DELAY_SECONDS * sample_rate) as usize).max(2)
}

impl Effect for DelayStage {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        if self.mix <= MIN_MIX {
            self.feed_idle(input);
            return input;
        }
        if self.reverse {
            self.process_reverse(input)
        } else {
            self.process_normal(input)
        }
    }

    /// Reallocate every buffer. Not real-time safe.
    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        let len = buffer_len(sample_rate);
        self.line.resize(len);
        self.capture.resize(len);
        self.reversed = vec![0.0; len];
        self.reset();
    }

    fn reset(&mut self) {
        self.line.clear();
        self.capture.clear();
        self.reversed.fill(0.0);
        self.reversed_len = 0;
        self.state = ReverseState::Collecting;
        self.counter = 0;
    }
}
