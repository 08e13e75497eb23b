use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;

mod edit;
mod export;
mod options;
mod presets;
mod session;
mod summary;

use session::Session;

#[derive(Parser)]
#[command(name = "bconf")]
#[command(about = "Assemble a compatible PC build and price it", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true, hide = true)]
    debug: bool,

    /// Read the catalog from a local JSON file instead of the catalog service
    #[arg(long, global = true, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    catalog: Option<PathBuf>,

    /// Preset file used with --catalog (default: presets.json next to it)
    #[arg(long, global = true, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    presets: Option<PathBuf>,

    /// Build file holding the current selection
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        default_value = "build.json"
    )]
    build: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List options of a category that fit the current build
    #[command(alias = "ls")]
    Options(options::OptionsArgs),

    /// Choose the part for a single-choice category
    Select(edit::SelectArgs),

    /// Add one kit of memory or one drive
    Add(edit::AddArgs),

    /// Set how many kits of a memory or drive option to buy
    Qty(edit::QtyArgs),

    /// Remove a category, or one option of a multi-kit category
    #[command(alias = "rm")]
    Remove(edit::RemoveArgs),

    /// Start over with an empty build
    Clear,

    /// List ready-made builds
    Presets(presets::PresetsArgs),

    /// Replace the current build with a ready-made one
    Preset(presets::PresetArgs),

    /// Show the priced build and its name
    Summary(summary::SummaryArgs),

    /// Write the build as tab-separated text
    Export(export::ExportArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // --debug sets the default level, RUST_LOG still wins
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    env_logger::Builder::from_env(env).init();

    let session = Session::new(cli.catalog, cli.presets, cli.build)?;

    match cli.command {
        Commands::Options(args) => options::execute(args, &session),
        Commands::Select(args) => edit::execute_select(args, &session),
        Commands::Add(args) => edit::execute_add(args, &session),
        Commands::Qty(args) => edit::execute_qty(args, &session),
        Commands::Remove(args) => edit::execute_remove(args, &session),
        Commands::Clear => edit::execute_clear(&session),
        Commands::Presets(args) => presets::execute_list(args, &session),
        Commands::Preset(args) => presets::execute_apply(args, &session),
        Commands::Summary(args) => summary::execute(args, &session),
        Commands::Export(args) => export::execute(args, &session),
    }
}
