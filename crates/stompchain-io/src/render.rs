//! Offline rendering of whole buffers through the pipeline.

use stompchain_effects::MultiFx;

use crate::StereoSamples;

/// Block size used when none is given.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Runs a [`MultiFx`] over a complete signal in fixed-size blocks, the way a
/// host would call it in real time.
#[derive(Debug)]
pub struct Renderer {
    fx: MultiFx,
    block_size: usize,
}

impl Renderer {
    /// Wrap a chain. A block size of 0 is treated as 1.
    pub fn new(fx: MultiFx, block_size: usize) -> Self {
        Self {
            fx,
            block_size: block_size.max(1),
        }
    }

    /// Frames per processing call.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// The wrapped chain.
    pub fn fx(&self) -> &MultiFx {
        &self.fx
    }

    /// The wrapped chain, mutably (parameter changes between renders).
    pub fn fx_mut(&mut self) -> &mut MultiFx {
        &mut self.fx
    }

    /// Unwrap the chain.
    pub fn into_inner(self) -> MultiFx {
        self.fx
    }

    /// Process `input` followed by `tail_seconds` of silence so delay and
    /// reverb tails ring out.
    ///
    /// `progress` is called after every block with `(frames_done, frames_total)`.
    pub fn render(
        &mut self,
        input: &StereoSamples,
        tail_seconds: f32,
        mut progress: impl FnMut(usize, usize),
    ) -> StereoSamples {
        let sample_rate = self.fx.sample_rate().unwrap_or(0.0);
        let tail = (tail_seconds.max(0.0) * sample_rate) as usize;

        let mut padded = input.clone();
        padded.extend_silence(tail);
        let total = padded.len();

        let mut out = StereoSamples::new(vec![0.0; total], vec![0.0; total]);
        let mut done = 0;
        while done < total {
            let end = (done + self.block_size).min(total);
            self.fx.process_block(
                [&padded.left[done..end], &padded.right[done..end]],
                [&mut out.left[done..end], &mut out.right[done..end]],
            );
            done = end;
            progress(done, total);
        }

        tracing::debug!(
            frames = total,
            tail,
            block_size = self.block_size,
            peak = out.peak(),
            "render complete"
        );
        out
    }
}
