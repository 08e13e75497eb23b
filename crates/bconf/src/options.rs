use std::io::{self, Write};

use anyhow::Result;
use bconf_build::{Category, SortKey, filter_options, write_options_table};
use clap::Args;

use crate::session::Session;
use crate::summary::OutputFormat;

#[derive(Args, Debug, Clone)]
pub struct OptionsArgs {
    /// Category to list (CPU, Motherboard, RAM, SSD, HDD, GPU, PSU, Case)
    #[arg(value_name = "CATEGORY")]
    pub category: Category,

    /// Sort order: default, price, name or capacity
    #[arg(short, long, default_value_t = SortKey::Default)]
    pub sort: SortKey,

    /// Output format
    #[arg(short, long, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

pub fn execute(args: OptionsArgs, session: &Session) -> Result<()> {
    let catalog = session.catalog()?;
    let selection = session.load_selection()?;
    let options = filter_options(&catalog, args.category, &selection, args.sort)?;
    log::debug!(
        "{} of {} {} options fit",
        options.len(),
        catalog.options(args.category).len(),
        args.category
    );

    let mut writer = io::stdout().lock();
    match args.format {
        OutputFormat::Json => writeln!(writer, "{}", serde_json::to_string_pretty(&options)?)?,
        OutputFormat::Table => {
            write_options_table(args.category, &options, &selection, writer)?
        }
    }
    Ok(())
}
