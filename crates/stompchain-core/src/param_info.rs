//! Parameter metadata for the normalized control surface.
//!
//! Every control in the pipeline travels as a normalized `f32` in `[0, 1]`.
//! A [`ParamDescriptor`] says how to present that value (display range,
//! unit, choices for list parameters) and how to sanitize incoming values.
//!
//! # Key Types
//!
//! - [`ParamDescriptor`] - metadata for one parameter
//! - [`ParamUnit`] - display unit with its suffix
//! - [`ParamFlags`] - capability flags (automatable, stepped, bypass, list)
//!
//! # Example
//!
//! ```rust
//! use stompchain_core::{ParamDescriptor, ParamUnit};
//!
//! let time = ParamDescriptor::ranged("Delay Time", "Time", "delay_time", ParamUnit::Seconds, 0.1, 4.0, 0.5);
//! assert!((time.to_display(0.5) - 2.05).abs() < 1e-6);
//! assert_eq!(time.sanitize(1.7), 1.0);
//! assert_eq!(time.sanitize(f32::NAN), 0.5);
//! ```

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::format;
use alloc::string::String;

use crate::math::linear_to_db;

/// Display unit for a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamUnit {
    /// Percentage (display range usually 0–100).
    Percent,
    /// Decibels on a linear display range.
    Decibels,
    /// Linear gain factor, displayed in dB (`20·log10(value)`).
    Level,
    /// Frequency in Hz.
    Hertz,
    /// Time in seconds.
    Seconds,
    /// On/off switch.
    Toggle,
    /// One of a fixed list of choices.
    Choice,
    /// Unitless.
    #[default]
    None,
}

impl ParamUnit {
    /// Suffix appended to formatted values.
    pub fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Percent => "%",
            ParamUnit::Decibels | ParamUnit::Level => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Seconds => " s",
            ParamUnit::Toggle | ParamUnit::Choice | ParamUnit::None => "",
        }
    }
}

/// Parameter capability flags.
///
/// ```rust
/// use stompchain_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// assert!(!flags.contains(ParamFlags::BYPASS));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host can automate this parameter.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Discrete steps (toggles and lists).
    pub const STEPPED: Self = Self(1 << 1);
    /// Stage bypass switch.
    pub const BYPASS: Self = Self(1 << 2);
    /// Value selects from [`ParamDescriptor::choices`].
    pub const LIST: Self = Self(1 << 3);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Metadata for one normalized parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full name for display, e.g. "Delay Time".
    pub name: &'static str,
    /// Short name, 8 characters or fewer.
    pub short_name: &'static str,
    /// Stable snake_case key used by presets and the command line.
    pub string_id: &'static str,
    /// Section the parameter belongs to ("Preamp", "Reverb", ...).
    pub group: &'static str,
    /// Display unit.
    pub unit: ParamUnit,
    /// Display value at normalized 0.0.
    pub display_min: f32,
    /// Display value at normalized 1.0.
    pub display_max: f32,
    /// Normalized default.
    pub default: f32,
    /// Normalized step; 0.0 for continuous parameters.
    pub step: f32,
    /// Capability flags.
    pub flags: ParamFlags,
    /// Labels for list parameters, empty otherwise.
    pub choices: &'static [&'static str],
}

impl ParamDescriptor {
    /// Continuous parameter shown on a linear `[display_min, display_max]` scale.
    pub const fn ranged(
        name: &'static str,
        short_name: &'static str,
        string_id: &'static str,
        unit: ParamUnit,
        display_min: f32,
        display_max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            string_id,
            group: "",
            unit,
            display_min,
            display_max,
            default,
            step: 0.0,
            flags: ParamFlags::AUTOMATABLE,
            choices: &[],
        }
    }

    /// Continuous 0–100 % parameter.
    pub const fn percent(
        name: &'static str,
        short_name: &'static str,
        string_id: &'static str,
        default: f32,
    ) -> Self {
        Self::ranged(name, short_name, string_id, ParamUnit::Percent, 0.0, 100.0, default)
    }

    /// Stage bypass switch, engaged above 0.5.
    pub const fn bypass(name: &'static str, short_name: &'static str, string_id: &'static str) -> Self {
        Self {
            step: 1.0,
            flags: ParamFlags::AUTOMATABLE
                .union(ParamFlags::STEPPED)
                .union(ParamFlags::BYPASS),
            ..Self::toggle(name, short_name, string_id, 0.0)
        }
    }

    /// On/off switch, on above 0.5.
    pub const fn toggle(
        name: &'static str,
        short_name: &'static str,
        string_id: &'static str,
        default: f32,
    ) -> Self {
        Self {
            step: 1.0,
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
            ..Self::ranged(name, short_name, string_id, ParamUnit::Toggle, 0.0, 1.0, default)
        }
    }

    /// List parameter; normalized values are quantized to `choices`.
    pub const fn choice(
        name: &'static str,
        short_name: &'static str,
        string_id: &'static str,
        choices: &'static [&'static str],
        default: f32,
    ) -> Self {
        let last = if choices.is_empty() { 0 } else { choices.len() - 1 };
        Self {
            step: if last == 0 { 1.0 } else { 1.0 / last as f32 },
            flags: ParamFlags::AUTOMATABLE
                .union(ParamFlags::STEPPED)
                .union(ParamFlags::LIST),
            choices,
            ..Self::ranged(
                name,
                short_name,
                string_id,
                ParamUnit::Choice,
                0.0,
                last as f32,
                default,
            )
        }
    }

    /// Set the group.
    pub const fn with_group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// Clamp into `[0, 1]`; NaN becomes the default.
    #[inline]
    pub fn sanitize(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(0.0, 1.0)
        }
    }

    /// True for toggle, bypass and list parameters.
    pub fn is_stepped(&self) -> bool {
        self.flags.contains(ParamFlags::STEPPED)
    }

    /// Choice index for a normalized value: `⌊v·(n − 1) + 0.5⌋`.
    #[inline]
    pub fn choice_index(&self, normalized: f32) -> usize {
        let last = self.choices.len().saturating_sub(1);
        let index = (self.sanitize(normalized) * last as f32 + 0.5) as usize;
        index.min(last)
    }

    /// Normalized value that selects choice `index`.
    pub fn choice_value(&self, index: usize) -> f32 {
        let last = self.choices.len().saturating_sub(1);
        if last == 0 {
            0.0
        } else {
            index.min(last) as f32 / last as f32
        }
    }

    /// Map normalized to the display scale.
    #[inline]
    pub fn to_display(&self, normalized: f32) -> f32 {
        let v = self.sanitize(normalized);
        self.display_min + (self.display_max - self.display_min) * v
    }

    /// Map a display value back to normalized, clamped.
    #[inline]
    pub fn from_display(&self, display: f32) -> f32 {
        let span = self.display_max - self.display_min;
        if span.abs() < f32::EPSILON {
            return self.default;
        }
        self.sanitize((display - self.display_min) / span)
    }

    /// Human-readable value with unit suffix.
    pub fn format_value(&self, normalized: f32) -> String {
        let v = self.sanitize(normalized);
        match self.unit {
            ParamUnit::Toggle => String::from(if v > 0.5 { "On" } else { "Off" }),
            ParamUnit::Choice => self
                .choices
                .get(self.choice_index(v))
                .map(|label| String::from(*label))
                .unwrap_or_default(),
            ParamUnit::Level => {
                let gain = self.to_display(v);
                if gain <= 0.0 {
                    String::from("-inf dB")
                } else {
                    format!("{:.1}{}", linear_to_db(gain), self.unit.suffix())
                }
            }
            ParamUnit::Percent => format!("{:.0}{}", self.to_display(v), self.unit.suffix()),
            ParamUnit::Seconds => format!("{:.2}{}", self.to_display(v), self.unit.suffix()),
            _ => format!("{:.1}{}", self.to_display(v), self.unit.suffix()),
        }
    }
}
