//! Preset and parameter validation.
//!
//! Every preset key must be a parameter `string_id` and every value a finite
//! number in `[0, 1]`. Selector values anywhere in range are accepted; the
//! chain quantizes them when applied.
//!
//! # Example
//!
//! ```rust
//! use stompchain_config::validation::{validate_param, ValidationError};
//! use stompchain_effects::chain::ParamId;
//!
//! assert_eq!(validate_param("gain", 0.4), Ok(ParamId::Gain));
//! assert!(matches!(validate_param("gain", 1.5), Err(ValidationError::OutOfRange { .. })));
//! ```

use stompchain_effects::chain::{MAX_SAMPLE_RATE, MIN_SAMPLE_RATE, ParamId};
use thiserror::Error;

use crate::Preset;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Key that names no parameter.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// Value outside `[0, 1]` or not finite.
    #[error("parameter '{param}' value {value} out of range [0, 1]")]
    OutOfRange {
        /// Key of the parameter.
        param: String,
        /// The rejected value.
        value: f64,
    },

    /// Sample-rate hint the chain would refuse.
    #[error("sample rate {0} Hz out of range [8000, 384000]")]
    SampleRate(u32),

    /// Preset without a name.
    #[error("preset name is empty")]
    EmptyName,

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Check one `key = value` pair and resolve the key.
pub fn validate_param(key: &str, value: f64) -> ValidationResult<ParamId> {
    let id = ParamId::from_string_id(key)
        .ok_or_else(|| ValidationError::UnknownParameter(key.to_string()))?;
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            param: key.to_string(),
            value,
        });
    }
    Ok(id)
}

/// Check a whole preset, reporting every problem at once.
pub fn validate_preset(preset: &Preset) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if preset.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }
    let rate = preset.sample_rate as f32;
    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&rate) {
        errors.push(ValidationError::SampleRate(preset.sample_rate));
    }
    for (key, &value) in &preset.params {
        if let Err(e) = validate_param(key, value) {
            errors.push(e);
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
