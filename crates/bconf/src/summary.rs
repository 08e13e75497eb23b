use std::io::{self, Write};

use anyhow::Result;
use bconf_build::summarize;
use clap::{Args, ValueEnum};

use crate::session::Session;

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    /// Output format
    #[arg(short, long, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

pub fn execute(args: SummaryArgs, session: &Session) -> Result<()> {
    let catalog = session.catalog()?;
    let selection = session.load_selection()?;
    let summary = summarize(&catalog, &selection, &session.naming());

    let mut writer = io::stdout().lock();
    match args.format {
        OutputFormat::Json => writeln!(writer, "{}", summary.to_json()?)?,
        OutputFormat::Table => summary.write_table(writer)?,
    }
    Ok(())
}
