//! Stompchain Core - DSP primitives for the stompchain effect pipeline
//!
//! This crate provides the building blocks the effect stages are made of,
//! designed for real-time processing with zero allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Effect System
//!
//! - [`Effect`] - Object-safe trait for mono sample processors
//!
//! ## Buffers
//!
//! - [`DelayLine`] - Circular buffer with a wrapping write cursor and
//!   fractional, absolute and reversed reads
//!
//! ## Filters
//!
//! - [`OnePole`] - Fixed-coefficient one-pole smoother
//! - [`OnePoleCascade`] - Series of one-pole smoothers (anti-alias cascades)
//! - [`AllpassDiffuser`] - Schroeder allpass for reverb diffusion
//! - [`CombFilter`] - Damped feedback comb with a variable effective length
//!
//! ## Modulation & Dynamics
//!
//! - [`Lfo`] - Sine low-frequency oscillator (phase accumulator)
//! - [`NoiseGate`] - Hysteresis gate for near-silent signals
//!
//! ## Parameters
//!
//! - [`ParamDescriptor`], [`ParamUnit`], [`ParamFlags`] - Parameter metadata
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build for embedded targets:
//!
//! ```toml
//! [dependencies]
//! stompchain-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: buffers are sized in constructors or `resize`, never per sample
//! - **No dependencies on std**: `libm` for math
//! - **Bounded state**: feedback paths flush denormals and callers clamp stage outputs

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod comb;
pub mod delay;
pub mod effect;
pub mod gate;
pub mod lfo;
pub mod math;
pub mod one_pole;
pub mod param_info;

pub use allpass::AllpassDiffuser;
pub use comb::CombFilter;
pub use delay::{DelayLine, Interpolation};
pub use effect::Effect;
pub use gate::{GateState, NoiseGate, gate};
pub use lfo::Lfo;
pub use math::{
    db_to_linear, equal_power_levels, flush_denormal, linear_to_db, ms_to_samples,
    semitones_to_ratio, soft_limit, wet_dry_mix,
};
pub use one_pole::{OnePole, OnePoleCascade};
pub use param_info::{ParamDescriptor, ParamFlags, ParamUnit};
