//! `stompchain presets`: browse, inspect and write chain presets.

use crate::commands::common::{load_preset, parse_param_arg};
use anyhow::Context;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use stompchain_config::{
    FACTORY_PRESET_NAMES, Preset, ensure_user_presets_dir, factory_presets, is_factory_preset,
    list_system_presets, list_user_presets, paths::preset_filename, preset_name_from_path,
    system_presets_dir, user_presets_dir,
};
use stompchain_effects::chain::{ParamId, ParamValues};

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List built-in, user and system presets
    List {
        /// Built-in presets only
        #[arg(long, conflicts_with = "user")]
        factory: bool,

        /// Presets on disk only (user and system directories)
        #[arg(long)]
        user: bool,
    },

    /// Print every parameter a preset resolves to
    Show {
        /// Factory name, user preset name or TOML path
        name: String,
    },

    /// Write a user preset: defaults (or `--from`) plus `--param` overrides
    Save {
        /// File name for the preset, without extension
        name: String,

        /// Base preset to start from
        #[arg(long)]
        from: Option<String>,

        /// Override applied on top of the base (e.g. "reverb_mix=0.6"); repeatable
        #[arg(long, value_parser = parse_param_arg)]
        param: Vec<(ParamId, f32)>,

        /// One-line description stored in the file
        #[arg(short, long)]
        description: Option<String>,

        /// Replace an existing user preset with the same name
        #[arg(long)]
        force: bool,
    },

    /// Remove a user preset file
    Delete {
        /// User preset name
        name: String,

        /// Required to actually delete
        #[arg(long)]
        force: bool,
    },

    /// Print the preset search directories
    Paths,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { factory, user } => {
            if !user {
                list_factory();
            }
            if !factory {
                list_on_disk("User", &list_user_presets());
                list_on_disk("System", &list_system_presets());
            }
            Ok(())
        }
        PresetsCommand::Show { name } => show(&name),
        PresetsCommand::Save {
            name,
            from,
            param,
            description,
            force,
        } => save(&name, from.as_deref(), &param, description.as_deref(), force),
        PresetsCommand::Delete { name, force } => delete(&name, force),
        PresetsCommand::Paths => {
            println!("user   {}", user_presets_dir().display());
            println!("system {}", system_presets_dir().display());
            Ok(())
        }
    }
}

fn print_entry(key: &str, preset: &Preset) {
    println!(
        "  {:<18} {:<18} {}",
        key,
        preset.name,
        preset.description.as_deref().unwrap_or("")
    );
}

fn list_factory() {
    println!("Factory:");
    for (key, preset) in FACTORY_PRESET_NAMES.iter().zip(factory_presets()) {
        print_entry(key, &preset);
    }
    println!();
}

fn list_on_disk(label: &str, paths: &[PathBuf]) {
    println!("{label}:");
    if paths.is_empty() {
        println!("  (none)");
    }
    for path in paths {
        let key = preset_name_from_path(path).unwrap_or_default();
        match Preset::load(path) {
            Ok(preset) => print_entry(&key, &preset),
            Err(e) => println!("  {:<18} unreadable: {}", key, e),
        }
    }
    println!();
}

fn show(name: &str) -> anyhow::Result<()> {
    let preset = load_preset(name)?;
    let values = preset.to_values()?;

    println!("{}", preset.name);
    if let Some(desc) = &preset.description {
        println!("  {}", desc);
    }
    println!(
        "  {} of {} parameters set, saved at {} Hz",
        preset.len(),
        values.iter().count(),
        preset.sample_rate
    );

    let mut group = "";
    for (id, value) in values.iter() {
        let d = id.descriptor();
        if d.group != group {
            group = d.group;
            println!("[{}]", group);
        }
        let marker = if preset.get(id).is_none() { "  (default)" } else { "" };
        println!(
            "  {:<16} {:>10}  ({:.4}){}",
            d.string_id,
            d.format_value(value),
            value,
            marker
        );
    }

    Ok(())
}

fn save(
    name: &str,
    from: Option<&str>,
    overrides: &[(ParamId, f32)],
    description: Option<&str>,
    force: bool,
) -> anyhow::Result<()> {
    let path = ensure_user_presets_dir()?.join(preset_filename(name));
    if path.exists() && !force {
        anyhow::bail!("{} exists; pass --force to replace it", path.display());
    }

    let mut values = match from {
        Some(base) => load_preset(base)?.to_values()?,
        None => ParamValues::default(),
    };
    for &(id, value) in overrides {
        values.set(id, value);
    }

    let mut preset = Preset::from_values(name, &values);
    if let Some(desc) = description {
        preset = preset.with_description(desc);
    }
    preset.save(&path)?;

    println!("wrote {}", path.display());
    Ok(())
}

fn delete(name: &str, force: bool) -> anyhow::Result<()> {
    if is_factory_preset(name) {
        anyhow::bail!("'{}' is a factory preset and cannot be deleted", name);
    }

    let path = user_presets_dir().join(preset_filename(name));
    if !path.is_file() {
        anyhow::bail!("no user preset named '{}' in {}", name, user_presets_dir().display());
    }
    if !force {
        anyhow::bail!("refusing to delete {} without --force", path.display());
    }

    std::fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
    println!("removed {}", path.display());
    Ok(())
}
