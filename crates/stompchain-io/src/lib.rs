//! Audio file I/O and offline rendering for stompchain.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav_stereo`] and [`write_wav_stereo`] for loading/saving audio files
//! - **Offline rendering**: [`Renderer`] for running a [`MultiFx`] over whole files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stompchain_effects::MultiFx;
//! use stompchain_io::{Renderer, read_wav_stereo, write_wav_stereo};
//!
//! let (samples, spec) = read_wav_stereo("input.wav")?;
//!
//! let fx = MultiFx::with_sample_rate(spec.sample_rate as f32)?;
//! let mut renderer = Renderer::new(fx, 512);
//! let processed = renderer.render(&samples, 2.0, |_, _| {});
//!
//! write_wav_stereo("output.wav", &processed, spec)?;
//! ```
//!
//! [`MultiFx`]: stompchain_effects::MultiFx

mod render;
mod stereo;
mod wav;

pub use render::{DEFAULT_BLOCK_SIZE, Renderer};
pub use stereo::StereoSamples;
pub use wav::{SUPPORTED_BIT_DEPTHS, WavSpec, read_wav_stereo, write_wav_stereo};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
