//! Stompchain Effects - the guitar pipeline stages and their orchestrator
//!
//! Each stage is a mono processor built on stompchain-core:
//!
//! - [`AmpStage`] - Input gain, clip and anti-alias cascade feeding the [`ToneStack`]
//! - [`DistortionStage`] - Clean, crunch and octave-fuzz waveshapers
//! - [`ModulationStage`] - Chorus, flanger and phaser voices reading the delay line
//! - [`DelayStage`] - Feedback delay up to four seconds with a reverse mode
//! - [`ReverbStage`] - Comb/allpass reverb with [`Shimmer`] and a reverse mode
//!
//! [`MultiFx`] wires one set of stages per channel, owns the 24 normalized
//! parameters and applies changes at block boundaries.
//!
//! ## Example
//!
//! ```rust
//! use stompchain_effects::MultiFx;
//! use stompchain_effects::chain::ParamId;
//!
//! let mut fx = MultiFx::with_sample_rate(48000.0).unwrap();
//! fx.set_parameter(ParamId::DistType, 1.0);
//! fx.set_parameter(ParamId::DelayMix, 0.5);
//!
//! let input = vec![0.0f32; 256];
//! let mut left = vec![0.0f32; 256];
//! let mut right = vec![0.0f32; 256];
//! fx.process_block([&input, &input], [&mut left, &mut right]);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod amp;
pub mod chain;
pub mod delay;
pub mod distortion;
pub mod eq;
pub mod modulation;
pub mod reverb;
pub mod shimmer;

// Re-export main types at crate root
pub use amp::AmpStage;
pub use chain::{ChainError, ChainObserver, MultiFx};
pub use delay::{DelayStage, ReverseState};
pub use distortion::{DistortionStage, DistortionType};
pub use eq::ToneStack;
pub use modulation::{ModulationStage, ModulationType};
pub use reverb::ReverbStage;
pub use shimmer::Shimmer;
