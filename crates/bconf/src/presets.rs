use std::io::{self, Write};

use anyhow::{Context, Result};
use bconf_build::summarize;
use clap::Args;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::Table;

use crate::session::Session;
use crate::summary::OutputFormat;

#[derive(Args, Debug, Clone)]
pub struct PresetsArgs {
    /// Output format
    #[arg(short, long, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct PresetArgs {
    /// Preset name as listed by `bconf presets`
    #[arg(value_name = "NAME")]
    pub name: String,
}

pub fn execute_list(args: PresetsArgs, session: &Session) -> Result<()> {
    let presets = session.presets()?;
    let mut writer = io::stdout().lock();

    if let OutputFormat::Json = args.format {
        writeln!(writer, "{}", serde_json::to_string_pretty(&presets)?)?;
        return Ok(());
    }

    let catalog = session.catalog()?;
    let naming = session.naming();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(comfy_table::ContentArrangement::DynamicFullWidth);
    table.set_header(vec!["Preset", "Build", "Total"]);

    for preset in &presets {
        let summary = summarize(&catalog, &preset.components, &naming);
        table.add_row(vec![
            preset.name.clone(),
            summary.build_name,
            summary.grand_total.to_string(),
        ]);
    }

    writeln!(writer, "{table}")?;
    Ok(())
}

pub fn execute_apply(args: PresetArgs, session: &Session) -> Result<()> {
    let presets = session.presets()?;
    let preset = presets
        .iter()
        .find(|p| p.name == args.name)
        .or_else(|| {
            presets
                .iter()
                .find(|p| p.name.to_lowercase() == args.name.to_lowercase())
        })
        .with_context(|| format!("No preset named '{}'", args.name))?;

    let catalog = session.catalog()?;
    for (category, name) in preset.stale_names(&catalog) {
        eprintln!(
            "{} {category} option '{name}' is no longer in the catalog",
            "warning:".yellow()
        );
    }

    session.save_selection(&preset.components)?;
    println!("{} Loaded preset {}", "✓".green(), preset.name.bold());
    Ok(())
}
