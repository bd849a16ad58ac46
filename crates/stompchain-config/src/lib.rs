//! Configuration and preset management for the stompchain pipeline.
//!
//! # Features
//!
//! - **Preset System**: Load and save the 24 chain parameters as TOML files
//! - **Validation**: Check preset keys and value ranges before applying them
//! - **Paths**: Platform-specific preset directories
//! - **Factory Presets**: Built-in presets for common sounds
//!
//! # Example
//!
//! ```rust,no_run
//! use stompchain_config::{Preset, user_presets_dir};
//! use stompchain_effects::MultiFx;
//! use stompchain_effects::chain::ParamId;
//!
//! let preset = Preset::new("Ambient Lead")
//!     .with_description("Clean amp into a long shimmer")
//!     .with_param(ParamId::Gain, 0.4)
//!     .with_param(ParamId::ReverbShimmer, 0.6);
//!
//! let mut fx = MultiFx::with_sample_rate(48000.0).unwrap();
//! preset.apply(&mut fx).unwrap();
//!
//! preset.save(user_presets_dir().join("ambient_lead.toml")).unwrap();
//! ```

mod error;
mod preset;

/// Platform-specific paths for presets.
pub mod paths;

/// Preset and parameter validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
pub use paths::{
    ensure_user_presets_dir, find_preset, list_system_presets, list_user_presets,
    preset_name_from_path, system_presets_dir, user_presets_dir,
};
pub use preset::{Preset, parse_param_assignment, parse_param_value};
pub use validation::{ValidationError, ValidationResult, validate_param, validate_preset};
