//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use stompchain_core::ParamUnit;
use stompchain_effects::MultiFx;
use stompchain_effects::chain::{ParamId, ParamValues};

use crate::error::ConfigError;
use crate::validation::validate_preset;

/// Decimal places kept when a preset is captured from live values.
const STORED_DECIMALS: f64 = 10_000.0;

/// A named snapshot of the 24 normalized parameters.
///
/// Keys are parameter `string_id`s, values are normalized `[0, 1]`. Keys
/// that are absent take their default when the preset is applied, so a
/// preset always describes the complete chain state.
///
/// # TOML Format
///
/// ```toml
/// name = "Ambient Lead"
/// description = "Clean amp into a long shimmer"
/// sample_rate = 48000
///
/// [params]
/// gain = 0.4
/// reverb_mix = 0.55
/// reverb_shimmer = 0.6
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate hint (defaults to 48000).
    /// The chain runs at whatever rate it is prepared with.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Normalized parameter values keyed by `string_id`.
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

fn default_sample_rate() -> u32 {
    48000
}

impl Preset {
    /// Create a new preset with every parameter at its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: 48000,
            params: BTreeMap::new(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set one parameter.
    pub fn with_param(mut self, id: ParamId, value: f32) -> Self {
        self.set(id, value);
        self
    }

    /// Capture every parameter from live values.
    ///
    /// Values are rounded to four decimals so saved files stay readable.
    pub fn from_values(name: impl Into<String>, values: &ParamValues) -> Self {
        let mut preset = Self::new(name);
        for (id, value) in values.iter() {
            preset.set(id, value);
        }
        preset
    }

    /// Set one parameter, rounded to four decimals.
    pub fn set(&mut self, id: ParamId, value: f32) {
        let rounded = (f64::from(value) * STORED_DECIMALS).round() / STORED_DECIMALS;
        self.params.insert(id.string_id().to_string(), rounded);
    }

    /// Stored value for `id`, if the preset names it.
    pub fn get(&self, id: ParamId) -> Option<f32> {
        self.params.get(id.string_id()).map(|&v| v as f32)
    }

    /// Number of parameters the preset names explicitly.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True when every parameter is left at its default.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Validate and resolve into a full value set.
    pub fn to_values(&self) -> Result<ParamValues, ConfigError> {
        validate_preset(self)?;
        let mut values = ParamValues::default();
        for (key, &value) in &self.params {
            let id = ParamId::from_string_id(key)
                .ok_or_else(|| ConfigError::UnknownParameter(key.clone()))?;
            values.set(id, value as f32);
        }
        Ok(values)
    }

    /// Push every parameter into `fx`. Nothing is changed if validation fails.
    pub fn apply(&self, fx: &mut MultiFx) -> Result<(), ConfigError> {
        let values = self.to_values()?;
        for (id, value) in values.iter() {
            fx.set_parameter(id, value);
        }
        Ok(())
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset: Preset = toml::from_str(&content)?;
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Parse a command-line value for `id`.
///
/// Accepts a normalized number, `on`/`off`/`true`/`false` for switches, and a
/// choice label (any case) for the two selectors.
pub fn parse_param_value(id: ParamId, text: &str) -> Result<f32, ConfigError> {
    let desc = id.descriptor();
    let text = text.trim();

    if desc.unit == ParamUnit::Choice
        && let Some(index) = desc
            .choices
            .iter()
            .position(|label| label.eq_ignore_ascii_case(text))
    {
        return Ok(desc.choice_value(index));
    }

    if desc.unit == ParamUnit::Toggle {
        match text.to_ascii_lowercase().as_str() {
            "on" | "true" | "yes" => return Ok(1.0),
            "off" | "false" | "no" => return Ok(0.0),
            _ => {}
        }
    }

    let value: f32 = text.parse().map_err(|_| {
        ConfigError::invalid_parameter(id.string_id(), format!("cannot parse '{}'", text))
    })?;
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::invalid_parameter(
            id.string_id(),
            format!("{} is outside [0, 1]", value),
        ));
    }
    Ok(value)
}

/// Parse a `key=value` assignment.
///
/// ```rust
/// use stompchain_config::parse_param_assignment;
/// use stompchain_effects::chain::ParamId;
///
/// assert_eq!(parse_param_assignment("dist_type=fuzz").unwrap(), (ParamId::DistType, 1.0));
/// assert_eq!(parse_param_assignment("delay_reverse=on").unwrap(), (ParamId::DelayReverse, 1.0));
/// assert!(parse_param_assignment("volume=0.5").is_err());
/// ```
pub fn parse_param_assignment(text: &str) -> Result<(ParamId, f32), ConfigError> {
    let (key, value) = text.split_once('=').ok_or_else(|| {
        ConfigError::invalid_parameter(text, "expected key=value".to_string())
    })?;
    let key = key.trim();
    let id = ParamId::from_string_id(key)
        .ok_or_else(|| ConfigError::UnknownParameter(key.to_string()))?;
    Ok((id, parse_param_value(id, value)?))
}
