//! Factory presets bundled with the library.
//!
//! Embedded as TOML at compile time so they are always available and go
//! through the same parser as user files.

use crate::Preset;

/// Internal names of the factory presets, in listing order.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "init",
    "clean",
    "crunch",
    "fuzz_lead",
    "ambient_shimmer",
    "reverse_dream",
    "slapback",
    "jet_flanger",
];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("init", INIT_PRESET),
    ("clean", CLEAN_PRESET),
    ("crunch", CRUNCH_PRESET),
    ("fuzz_lead", FUZZ_LEAD_PRESET),
    ("ambient_shimmer", AMBIENT_SHIMMER_PRESET),
    ("reverse_dream", REVERSE_DREAM_PRESET),
    ("slapback", SLAPBACK_PRESET),
    ("jet_flanger", JET_FLANGER_PRESET),
];

const INIT_PRESET: &str = r#"
name = "Init"
description = "Clean signal path - every stage bypassed, unity output"

[params]
amp_bypass = 1.0
dist_bypass = 1.0
mod_bypass = 1.0
delay_bypass = 1.0
reverb_bypass = 1.0
output_level = 1.0
"#;

const CLEAN_PRESET: &str = r#"
name = "Clean"
description = "Low gain, clean voicing, a touch of chorus and room"

[params]
gain = 0.15
bass = 0.55
treble = 0.6
presence = 0.55
dist_type = 0.0
dist_drive = 0.2
mod_type = 0.0
mod_rate = 0.15
mod_depth = 0.3
delay_bypass = 1.0
reverb_mix = 0.2
reverb_size = 0.35
"#;

const CRUNCH_PRESET: &str = r#"
name = "Crunch"
description = "Asymmetric crunch for rock rhythm, modulation off"

[params]
gain = 0.55
mid = 0.6
dist_type = 0.5
dist_drive = 0.6
mod_bypass = 1.0
delay_mix = 0.15
delay_time = 0.05
delay_feedback = 0.2
reverb_mix = 0.15
reverb_size = 0.3
"#;

const FUZZ_LEAD_PRESET: &str = r#"
name = "Fuzz Lead"
description = "Octave fuzz with a long delay for single-note leads"

[params]
gain = 0.7
bass = 0.45
mid = 0.7
presence = 0.65
dist_type = 1.0
dist_drive = 0.85
mod_bypass = 1.0
delay_mix = 0.3
delay_time = 0.1
delay_feedback = 0.35
reverb_mix = 0.25
output_level = 0.6
"#;

const AMBIENT_SHIMMER_PRESET: &str = r#"
name = "Ambient Shimmer"
description = "Clean swells into a large shimmering reverb"

[params]
gain = 0.2
treble = 0.6
dist_type = 0.0
dist_drive = 0.1
mod_type = 0.0
mod_rate = 0.1
mod_depth = 0.5
delay_mix = 0.35
delay_time = 0.15
delay_feedback = 0.5
reverb_mix = 0.6
reverb_size = 0.9
reverb_shimmer = 0.7
"#;

const REVERSE_DREAM_PRESET: &str = r#"
name = "Reverse Dream"
description = "Reversed delay chunks feeding a reversed reverb"

[params]
gain = 0.25
dist_bypass = 1.0
mod_type = 0.5
mod_rate = 0.05
mod_depth = 0.25
delay_mix = 0.6
delay_time = 0.2
delay_feedback = 0.4
delay_reverse = 1.0
reverb_mix = 0.45
reverb_size = 0.7
reverb_reverse = 1.0
"#;

const SLAPBACK_PRESET: &str = r#"
name = "Slapback"
description = "Single short repeat for rockabilly and country"

[params]
gain = 0.35
dist_type = 0.5
dist_drive = 0.3
mod_bypass = 1.0
delay_mix = 0.4
delay_time = 0.0
delay_feedback = 0.05
reverb_mix = 0.1
reverb_size = 0.2
"#;

const JET_FLANGER_PRESET: &str = r#"
name = "Jet Flanger"
description = "Slow, deep flanger over crunch"

[params]
gain = 0.5
dist_type = 0.5
dist_drive = 0.5
mod_type = 0.5
mod_rate = 0.05
mod_depth = 0.9
delay_bypass = 1.0
reverb_mix = 0.2
"#;

/// All factory presets, in listing order.
///
/// # Example
///
/// ```rust
/// use stompchain_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("  - {}: {}", preset.name, preset.description.as_deref().unwrap_or(""));
/// }
/// ```
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by internal or display name, case-insensitively.
///
/// ```rust
/// use stompchain_config::get_factory_preset;
///
/// let preset = get_factory_preset("Fuzz Lead").unwrap();
/// assert_eq!(preset.name, "Fuzz Lead");
/// assert!(get_factory_preset("fuzz_lead").is_some());
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    let name_lower = name.to_lowercase();

    if let Some((_, toml)) = FACTORY_PRESETS_TOML
        .iter()
        .find(|(key, _)| *key == name_lower)
    {
        return Preset::from_toml(toml).ok();
    }

    factory_presets()
        .into_iter()
        .find(|preset| preset.name.to_lowercase() == name_lower)
}

/// Internal names of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESET_NAMES.to_vec()
}

/// True if `name` matches a factory preset (case-insensitive).
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}
