//! Helpers shared by several commands.

use anyhow::Context;
use stompchain_config::{Preset, get_factory_preset, parse_param_assignment};
use stompchain_effects::chain::ParamId;
use std::path::Path;

/// clap value parser for `--param key=value`.
pub fn parse_param_arg(s: &str) -> Result<(ParamId, f32), String> {
    parse_param_assignment(s).map_err(|e| e.to_string())
}

/// Resolve a preset argument: a path to a TOML file, a factory preset, or a
/// user/system preset name, in that order.
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    let path = Path::new(name);
    if path.is_file() {
        return Preset::load(path).with_context(|| format!("loading preset {}", path.display()));
    }

    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset);
    }

    if let Some(path) = stompchain_config::find_preset(name) {
        return Preset::load(&path).with_context(|| format!("loading preset {}", path.display()));
    }

    anyhow::bail!("Preset '{}' not found.", name)
}

/// Linear peak or RMS as dBFS, floored at -120.
pub fn to_dbfs(linear: f32) -> f32 {
    stompchain_core::linear_to_db(linear)
}

/// Root-mean-square over both channels.
pub fn rms(left: &[f32], right: &[f32]) -> f32 {
    let count = left.len() + right.len();
    if count == 0 {
        return 0.0;
    }
    let sum: f32 = left.iter().chain(right).map(|s| s * s).sum();
    (sum / count as f32).sqrt()
}
