//! Parameter listing command.

use clap::Args;
use serde_json::json;
use stompchain_core::ParamUnit;
use stompchain_effects::chain::ParamId;

#[derive(Args)]
pub struct ParamsArgs {
    /// Only show parameters in this group (e.g. "Delay")
    #[arg(short, long)]
    group: Option<String>,

    /// Print as JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let ids: Vec<ParamId> = ParamId::ALL
        .iter()
        .copied()
        .filter(|id| {
            args.group
                .as_deref()
                .is_none_or(|g| id.descriptor().group.eq_ignore_ascii_case(g))
        })
        .collect();

    if args.json {
        let entries: Vec<_> = ids
            .iter()
            .map(|&id| {
                let d = id.descriptor();
                json!({
                    "id": id.as_index(),
                    "key": d.string_id,
                    "name": d.name,
                    "group": d.group,
                    "default": d.default,
                    "default_display": d.format_value(d.default),
                    "min": d.display_min,
                    "max": d.display_max,
                    "unit": d.unit.suffix().trim(),
                    "choices": d.choices,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!(
        "{:>3}  {:<16} {:<20} {:<11} {:<10} Range",
        "ID", "Key", "Name", "Group", "Default"
    );
    println!("{}", "-".repeat(80));
    for id in ids {
        let d = id.descriptor();
        let range = match d.unit {
            ParamUnit::Toggle => String::from("Off / On"),
            ParamUnit::Choice => d.choices.join(" / "),
            _ => format!(
                "{} .. {}{}",
                d.display_min,
                d.display_max,
                d.unit.suffix()
            ),
        };
        println!(
            "{:>3}  {:<16} {:<20} {:<11} {:<10} {}",
            id.as_index(),
            d.string_id,
            d.name,
            d.group,
            d.format_value(d.default),
            range
        );
    }

    Ok(())
}
