//! The six-stage pipeline and its control surface.
//!
//! # Architecture
//!
//! ```text
//! control thread                 audio thread
//! ──────────────                 ────────────
//! SharedParams::set ──atomics──► begin block: snapshot shared store
//! MultiFx::queue_parameter ────►              drain ParamChanges
//!                                             push values into stages (if changed)
//!                                per frame:   amp → dist → mod → delay → reverb → level
//!                                end block:   observer.block_processed(peak)
//! ```
//!
//! Each channel owns a full [`ChannelStrip`]: every filter memory and every
//! buffer is per channel, so left and right never share state.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

pub mod observer;
pub mod params;
pub mod queue;
pub mod shared;

pub use observer::ChainObserver;
#[cfg(feature = "tracing")]
pub use observer::TracingObserver;
pub use params::{PARAM_COUNT, ParamId, ParamValues, SWITCH_THRESHOLD};
pub use queue::{ParamChanges, QUEUE_CAPACITY};
pub use shared::SharedParams;

use alloc::boxed::Box;

use stompchain_core::Effect;

use crate::amp::AmpStage;
use crate::delay::DelayStage;
use crate::distortion::DistortionStage;
use crate::modulation::ModulationStage;
use crate::reverb::ReverbStage;

/// Lowest accepted sample rate in Hz.
pub const MIN_SAMPLE_RATE: f32 = 8_000.0;
/// Highest accepted sample rate in Hz.
pub const MAX_SAMPLE_RATE: f32 = 384_000.0;

/// Errors raised at the control surface. The audio path never fails.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ChainError {
    /// Sample rate not finite or outside `[8 kHz, 384 kHz]`.
    #[error("invalid sample rate {0} Hz (expected 8000 to 384000)")]
    InvalidSampleRate(f32),
    /// Host id with no parameter behind it.
    #[error("unknown parameter id {0}")]
    UnknownParameter(u32),
}

/// Stage enables and output gain, decoded once per block.
#[derive(Debug, Clone, Copy)]
struct Routing {
    amp: bool,
    distortion: bool,
    modulation: bool,
    delay: bool,
    reverb: bool,
    output_level: f32,
}

impl Routing {
    fn from_values(values: &ParamValues) -> Self {
        Self {
            amp: !values.amp_bypassed(),
            distortion: !values.dist_bypassed(),
            modulation: !values.mod_bypassed(),
            delay: !values.delay_bypassed(),
            reverb: !values.reverb_bypassed(),
            output_level: values.output_level(),
        }
    }
}

/// All stage state for one channel.
#[derive(Debug, Clone)]
pub struct ChannelStrip {
    amp: AmpStage,
    distortion: DistortionStage,
    modulation: ModulationStage,
    delay: DelayStage,
    reverb: ReverbStage,
}

impl ChannelStrip {
    /// Allocate every stage for `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            amp: AmpStage::new(sample_rate),
            distortion: DistortionStage::new(sample_rate),
            modulation: ModulationStage::new(sample_rate),
            delay: DelayStage::new(sample_rate),
            reverb: ReverbStage::new(sample_rate),
        }
    }

    /// Push every parameter value into the stages.
    pub fn apply(&mut self, values: &ParamValues) {
        self.amp.set_gain(values.get(ParamId::Gain));
        let tone = self.amp.tone_mut();
        tone.set_bass(values.get(ParamId::Bass));
        tone.set_mid(values.get(ParamId::Mid));
        tone.set_treble(values.get(ParamId::Treble));
        tone.set_presence(values.get(ParamId::Presence));

        self.distortion.set_type(values.distortion_type());
        self.distortion.set_drive(values.get(ParamId::DistDrive));

        self.modulation.set_type(values.modulation_type());
        self.modulation.set_rate(values.get(ParamId::ModRate));
        self.modulation.set_depth(values.get(ParamId::ModDepth));

        self.delay.set_mix(values.get(ParamId::DelayMix));
        self.delay.set_time(values.get(ParamId::DelayTime));
        self.delay.set_feedback(values.get(ParamId::DelayFeedback));
        self.delay.set_reverse(values.delay_reverse());

        self.reverb.set_mix(values.get(ParamId::ReverbMix));
        self.reverb.set_size(values.get(ParamId::ReverbSize));
        self.reverb.set_shimmer(values.get(ParamId::ReverbShimmer));
        self.reverb.set_reverse(values.reverb_reverse());
    }

    #[inline]
    fn process(&mut self, input: f32, routing: Routing) -> f32 {
        let mut x = input;
        if routing.amp {
            x = self.amp.process(x);
        }
        if routing.distortion {
            x = self.distortion.process(x);
        }
        if routing.modulation {
            x = self.modulation.process(x, self.delay.line());
        }
        if routing.delay {
            x = self.delay.process(x);
        } else {
            self.delay.feed_idle(x);
        }
        if routing.reverb {
            x = self.reverb.process(x);
        }
        x * routing.output_level
    }

    /// Zero all state without reallocating.
    pub fn reset(&mut self) {
        self.amp.reset();
        self.distortion.reset();
        self.modulation.reset();
        self.delay.reset();
        self.reverb.reset();
    }

    /// Delay stage of this channel.
    pub fn delay(&self) -> &DelayStage {
        &self.delay
    }
}

/// Amp → distortion → modulation → delay → reverb → output level.
///
/// Construct, [`prepare`](Self::prepare), then call
/// [`process_block`](Self::process_block) once per audio block. Parameter
/// changes made between blocks take effect at the start of the next block.
///
/// # Example
///
/// ```rust
/// use stompchain_effects::chain::{MultiFx, ParamId};
///
/// let mut fx = MultiFx::new();
/// fx.prepare(48000.0).unwrap();
/// for id in [ParamId::AmpBypass, ParamId::DistBypass, ParamId::ModBypass,
///            ParamId::DelayBypass, ParamId::ReverbBypass] {
///     fx.set_parameter(id, 1.0);
/// }
///
/// let input = [0.5f32; 64];
/// let (mut left, mut right) = ([0.0f32; 64], [0.0f32; 64]);
/// fx.process_block([&input, &input], [&mut left, &mut right]);
/// assert!(left.iter().all(|&s| (s - 0.35).abs() < 1e-6));
/// ```
pub struct MultiFx {
    sample_rate: Option<f32>,
    values: ParamValues,
    strips: Option<[ChannelStrip; 2]>,
    queue: ParamChanges,
    shared: Option<SharedParams>,
    observer: Option<Box<dyn ChainObserver + Send>>,
    dirty: bool,
}

impl Default for MultiFx {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for MultiFx {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MultiFx")
            .field("sample_rate", &self.sample_rate)
            .field("values", &self.values)
            .field("pending", &self.queue.len())
            .field("shared", &self.shared.is_some())
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl MultiFx {
    /// Unprepared pipeline with default parameters. Allocates no audio buffers.
    pub fn new() -> Self {
        Self {
            sample_rate: None,
            values: ParamValues::default(),
            strips: None,
            queue: ParamChanges::new(),
            shared: None,
            observer: None,
            dirty: false,
        }
    }

    /// Construct and prepare in one step.
    pub fn with_sample_rate(sample_rate: f32) -> Result<Self, ChainError> {
        let mut fx = Self::new();
        fx.prepare(sample_rate)?;
        Ok(fx)
    }

    /// Allocate and zero every buffer for `sample_rate`. Not real-time safe.
    pub fn prepare(&mut self, sample_rate: f32) -> Result<(), ChainError> {
        if !sample_rate.is_finite() || !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
            return Err(ChainError::InvalidSampleRate(sample_rate));
        }

        let mut strips = [ChannelStrip::new(sample_rate), ChannelStrip::new(sample_rate)];
        for strip in &mut strips {
            strip.apply(&self.values);
        }
        self.strips = Some(strips);
        self.sample_rate = Some(sample_rate);
        self.dirty = false;

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, "multi-fx prepared");

        if let Some(observer) = self.observer.as_mut() {
            observer.prepared(sample_rate);
        }
        Ok(())
    }

    /// Zero every filter memory and buffer, keeping allocations and parameters.
    pub fn reset(&mut self) {
        if let Some(strips) = self.strips.as_mut() {
            for strip in strips.iter_mut() {
                strip.reset();
            }
        }
        if let Some(observer) = self.observer.as_mut() {
            observer.reset();
        }
    }

    /// Sample rate from the last successful [`prepare`](Self::prepare).
    pub fn sample_rate(&self) -> Option<f32> {
        self.sample_rate
    }

    /// Whether buffers are allocated.
    pub fn is_prepared(&self) -> bool {
        self.strips.is_some()
    }

    /// Set a parameter immediately. Returns the stored (sanitized) value.
    ///
    /// With a shared store attached the value is also written there, so the
    /// next block snapshot does not undo it.
    pub fn set_parameter(&mut self, id: ParamId, value: f32) -> f32 {
        let old = self.values.get(id);
        let new = self.values.set(id, value);
        if let Some(shared) = &self.shared {
            shared.set(id, new);
        }
        if old != new {
            self.dirty = true;
            if let Some(observer) = self.observer.as_mut() {
                observer.parameter_changed(id, old, new);
            }
        }
        new
    }

    /// Set a parameter by host id.
    pub fn set_parameter_by_index(&mut self, index: u32, value: f32) -> Result<f32, ChainError> {
        let id = ParamId::from_index(index).ok_or(ChainError::UnknownParameter(index))?;
        Ok(self.set_parameter(id, value))
    }

    /// Current normalized value.
    pub fn get_parameter(&self, id: ParamId) -> f32 {
        self.values.get(id)
    }

    /// Current value by host id.
    pub fn get_parameter_by_index(&self, index: u32) -> Result<f32, ChainError> {
        ParamId::from_index(index)
            .map(|id| self.values.get(id))
            .ok_or(ChainError::UnknownParameter(index))
    }

    /// Every parameter value.
    pub fn values(&self) -> &ParamValues {
        &self.values
    }

    /// Queue a change for the start of the next block (last value wins).
    ///
    /// Returns `false` if the queue was full and the change was dropped.
    pub fn queue_parameter(&mut self, id: ParamId, value: f32) -> bool {
        if let Some(shared) = &self.shared {
            shared.set(id, value);
            return true;
        }
        self.queue.push(id, value)
    }

    /// Changes dropped by a full queue.
    pub fn dropped_changes(&self) -> usize {
        self.queue.dropped()
    }

    /// Read parameters from `shared` at the start of every block.
    ///
    /// The store is seeded with the current values first.
    pub fn attach_shared(&mut self, shared: SharedParams) {
        for (id, value) in self.values.iter() {
            shared.set(id, value);
        }
        self.shared = Some(shared);
    }

    /// Stop reading from the shared store.
    pub fn detach_shared(&mut self) -> Option<SharedParams> {
        self.shared.take()
    }

    /// Attach a diagnostics sink.
    pub fn set_observer(&mut self, observer: Box<dyn ChainObserver + Send>) {
        self.observer = Some(observer);
    }

    /// Remove the diagnostics sink.
    pub fn clear_observer(&mut self) -> Option<Box<dyn ChainObserver + Send>> {
        self.observer.take()
    }

    /// Channel state, for inspection.
    pub fn strip(&self, channel: usize) -> Option<&ChannelStrip> {
        self.strips.as_ref().and_then(|strips| strips.get(channel))
    }

    /// Apply pending changes and return the routing for this block.
    fn begin_block(&mut self) -> Routing {
        let before = self.values;
        if let Some(shared) = &self.shared {
            shared.snapshot_into(&mut self.values);
        }
        self.queue.drain_into(&mut self.values);

        if before != self.values {
            self.dirty = true;
            if let Some(observer) = self.observer.as_mut() {
                for id in ParamId::ALL {
                    let (old, new) = (before.get(id), self.values.get(id));
                    if old != new {
                        observer.parameter_changed(id, old, new);
                    }
                }
            }
        }

        if self.dirty {
            if let Some(strips) = self.strips.as_mut() {
                for strip in strips.iter_mut() {
                    strip.apply(&self.values);
                }
                self.dirty = false;
            }
        }
        Routing::from_values(&self.values)
    }

    fn end_block(&mut self, frames: usize, peak: f32) {
        if let Some(observer) = self.observer.as_mut() {
            observer.block_processed(frames, peak);
        }
    }

    /// Process a stereo block. Returns the number of frames processed: the
    /// shortest of the four slices.
    ///
    /// Before [`prepare`](Self::prepare) the outputs are zero-filled.
    pub fn process_block(&mut self, inputs: [&[f32]; 2], outputs: [&mut [f32]; 2]) -> usize {
        let [in_l, in_r] = inputs;
        let [out_l, out_r] = outputs;
        let frames = in_l.len().min(in_r.len()).min(out_l.len()).min(out_r.len());
        let routing = self.begin_block();

        let Some([left, right]) = self.strips.as_mut() else {
            out_l[..frames].fill(0.0);
            out_r[..frames].fill(0.0);
            return frames;
        };

        let mut peak: f32 = 0.0;
        for i in 0..frames {
            let l = left.process(in_l[i], routing);
            let r = right.process(in_r[i], routing);
            out_l[i] = l;
            out_r[i] = r;
            peak = peak.max(l.abs()).max(r.abs());
        }
        self.end_block(frames, peak);
        frames
    }

    /// Process a mono block through the left channel.
    pub fn process_mono_block(&mut self, input: &[f32], output: &mut [f32]) -> usize {
        let frames = input.len().min(output.len());
        let routing = self.begin_block();

        let Some([left, _]) = self.strips.as_mut() else {
            output[..frames].fill(0.0);
            return frames;
        };

        let mut peak: f32 = 0.0;
        for (out, &x) in output[..frames].iter_mut().zip(&input[..frames]) {
            *out = left.process(x, routing);
            peak = peak.max(out.abs());
        }
        self.end_block(frames, peak);
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl ChainObserver for Recorder {
        fn prepared(&mut self, sample_rate: f32) {
            self.events.lock().unwrap().push(format!("prepared {}", sample_rate));
        }
        fn parameter_changed(&mut self, id: ParamId, _old: f32, new: f32) {
            self.events
                .lock()
                .unwrap()
                .push(format!("{} = {}", id.string_id(), new));
        }
        fn block_processed(&mut self, frames: usize, _peak: f32) {
            self.events.lock().unwrap().push(format!("block {}", frames));
        }
    }

    #[test]
    fn rejects_bad_sample_rates() {
        let mut fx = MultiFx::new();
        assert_eq!(fx.prepare(0.0), Err(ChainError::InvalidSampleRate(0.0)));
        assert!(fx.prepare(f32::NAN).is_err());
        assert!(fx.prepare(1_000_000.0).is_err());
        assert!(!fx.is_prepared());
        assert!(fx.prepare(44100.0).is_ok());
        assert_eq!(fx.sample_rate(), Some(44100.0));
    }

    #[test]
    fn unprepared_outputs_silence() {
        let mut fx = MultiFx::new();
        let input = [0.5f32; 32];
        let mut l = [1.0f32; 32];
        let mut r = [1.0f32; 32];
        assert_eq!(fx.process_block([&input, &input], [&mut l, &mut r]), 32);
        assert!(l.iter().chain(r.iter()).all(|&s| s == 0.0));
    }

    #[test]
    fn mismatched_lengths_process_shortest() {
        let mut fx = MultiFx::with_sample_rate(44100.0).unwrap();
        let a = [0.1f32; 16];
        let b = [0.1f32; 8];
        let mut l = [9.0f32; 16];
        let mut r = [9.0f32; 16];
        assert_eq!(fx.process_block([&a, &b], [&mut l, &mut r]), 8);
        assert_eq!(l[8], 9.0);
    }

    #[test]
    fn unknown_index_is_an_error() {
        let mut fx = MultiFx::new();
        assert_eq!(
            fx.set_parameter_by_index(24, 0.5),
            Err(ChainError::UnknownParameter(24))
        );
        assert_eq!(fx.set_parameter_by_index(6, 2.0), Ok(1.0));
        assert_eq!(fx.get_parameter_by_index(6), Ok(1.0));
    }

    #[test]
    fn queued_changes_apply_at_block_start() {
        let mut fx = MultiFx::with_sample_rate(44100.0).unwrap();
        fx.queue_parameter(ParamId::OutputLevel, 0.2);
        fx.queue_parameter(ParamId::OutputLevel, 0.4);
        assert_eq!(fx.get_parameter(ParamId::OutputLevel), 0.7);
        let input = [0.0f32; 4];
        let mut out = [0.0f32; 4];
        fx.process_mono_block(&input, &mut out);
        assert_eq!(fx.get_parameter(ParamId::OutputLevel), 0.4);
    }

    #[test]
    fn shared_store_drives_parameters() {
        let mut fx = MultiFx::with_sample_rate(44100.0).unwrap();
        let shared = SharedParams::new();
        fx.attach_shared(shared.clone());
        shared.set(ParamId::DelayMix, 0.9);
        fx.set_parameter(ParamId::Gain, 0.1);
        let input = [0.0f32; 4];
        let mut out = [0.0f32; 4];
        fx.process_mono_block(&input, &mut out);
        assert_eq!(fx.get_parameter(ParamId::DelayMix), 0.9);
        // Direct sets survive the snapshot.
        assert_eq!(fx.get_parameter(ParamId::Gain), 0.1);
    }

    #[test]
    fn observer_sees_lifecycle() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut fx = MultiFx::new();
        fx.set_observer(Box::new(Recorder {
            events: Arc::clone(&events),
        }));
        fx.prepare(48000.0).unwrap();
        fx.queue_parameter(ParamId::ModDepth, 0.25);
        let input = vec![0.0f32; 10];
        let mut out = vec![0.0f32; 10];
        fx.process_mono_block(&input, &mut out);

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "prepared 48000".to_string(),
                "mod_depth = 0.25".to_string(),
                "block 10".to_string(),
            ]
        );
    }

    #[test]
    fn channels_are_independent() {
        let mut fx = MultiFx::with_sample_rate(44100.0).unwrap();
        fx.set_parameter(ParamId::DelayMix, 1.0);
        fx.set_parameter(ParamId::DelayTime, 0.0);
        let mut left = vec![0.0f32; 4800];
        left[0] = 0.5;
        let right = vec![0.0f32; 4800];
        let mut out_l = vec![0.0f32; 4800];
        let mut out_r = vec![0.0f32; 4800];
        fx.process_block([&left, &right], [&mut out_l, &mut out_r]);
        // Shortest echo is 0.1 s, i.e. frame 4410.
        assert!(out_l[4410] != 0.0);
        assert!(out_l.iter().any(|&s| s != 0.0));
        assert!(out_r.iter().all(|&s| s == 0.0));
    }
}
