//! Core Effect trait.
//!
//! The [`Effect`] trait is the common surface of every self-contained stage
//! in the pipeline: one sample in, one sample out, with all memory held in
//! the implementing struct.
//!
//! ## Design Decisions
//!
//! - **Mono processing**: stereo is built from two independent instances,
//!   one per channel, so no state leaks between channels.
//!
//! - **Object-safe**: `dyn Effect` works for tooling and tests that want to
//!   drive stages generically.
//!
//! - **No allocations**: `process*` is called on the audio thread. Anything
//!   that allocates belongs in a constructor or in `set_sample_rate`.

/// Core trait for mono sample processors.
///
/// # Example
///
/// ```rust
/// use stompchain_core::Effect;
///
/// struct Level {
///     level: f32,
/// }
///
/// impl Effect for Level {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.level
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
///
/// let mut level = Level { level: 0.5 };
/// assert_eq!(level.process(1.0), 0.5);
/// ```
pub trait Effect {
    /// Process a single sample, advancing internal state by one step.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples.
    ///
    /// Processes `min(input.len(), output.len())` samples.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.process(*inp);
        }
    }

    /// Process a block of samples in place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Update the sample rate.
    ///
    /// Implementations resize their buffers here and clear all state, so
    /// this must not be called from the audio thread.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear all internal state (buffers, filter memories, cursors) without
    /// changing parameters or reallocating.
    fn reset(&mut self);

    /// Processing latency in samples. Default is 0.
    fn latency_samples(&self) -> usize {
        0
    }
}
