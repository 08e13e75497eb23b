use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use bconf_build::{summarize, write_export};
use clap::Args;

use crate::session::Session;

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: ExportArgs, session: &Session) -> Result<()> {
    let catalog = session.catalog()?;
    let selection = session.load_selection()?;
    let summary = summarize(&catalog, &selection, &session.naming());

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_export(&summary, BufWriter::new(file))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Exported {} to {}", summary.build_name, path.display());
        }
        None => write_export(&summary, io::stdout().lock()).context("Failed to write export")?,
    }
    Ok(())
}
