//! Optional diagnostics sink for the pipeline.
//!
//! The orchestrator calls an attached [`ChainObserver`] outside the sample
//! loop: once per prepare/reset, once per applied parameter change and once
//! per block with the block's output peak. Implementations must not block;
//! they run on the audio thread.

use super::params::ParamId;

/// Receives pipeline events. Every method has an empty default.
pub trait ChainObserver {
    /// Buffers were (re)allocated for `sample_rate`.
    fn prepared(&mut self, sample_rate: f32) {
        let _ = sample_rate;
    }

    /// All stage state was cleared.
    fn reset(&mut self) {}

    /// A parameter changed from `old` to `new` at the start of a block.
    fn parameter_changed(&mut self, id: ParamId, old: f32, new: f32) {
        let _ = (id, old, new);
    }

    /// A block of `frames` frames finished with absolute peak `peak`.
    fn block_processed(&mut self, frames: usize, peak: f32) {
        let _ = (frames, peak);
    }
}

/// Observer that forwards events to `tracing`.
///
/// Block peaks are logged at `trace` level, everything else at `debug`.
#[cfg(feature = "tracing")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

#[cfg(feature = "tracing")]
impl ChainObserver for TracingObserver {
    fn prepared(&mut self, sample_rate: f32) {
        tracing::debug!(sample_rate, "chain prepared");
    }

    fn reset(&mut self) {
        tracing::debug!("chain reset");
    }

    fn parameter_changed(&mut self, id: ParamId, old: f32, new: f32) {
        tracing::debug!(param = id.string_id(), old, new, "parameter changed");
    }

    fn block_processed(&mut self, frames: usize, peak: f32) {
        tracing::trace!(frames, peak, "block processed");
    }
}
