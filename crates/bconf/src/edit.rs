//! Subcommands that change the saved build.

use anyhow::Result;
use bconf_build::{
    BuildError, Catalog, Category, Selection, add_kit, deselect, select, set_kit_count, total_units,
    unit_ceiling,
};
use clap::Args;
use colored::Colorize;

use crate::session::Session;

#[derive(Args, Debug, Clone)]
pub struct SelectArgs {
    #[arg(value_name = "CATEGORY")]
    pub category: Category,

    /// Exact option name as listed by `bconf options`
    #[arg(value_name = "NAME")]
    pub name: String,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    #[arg(value_name = "CATEGORY")]
    pub category: Category,

    #[arg(value_name = "NAME")]
    pub name: String,
}

#[derive(Args, Debug, Clone)]
pub struct QtyArgs {
    #[arg(value_name = "CATEGORY")]
    pub category: Category,

    #[arg(value_name = "NAME")]
    pub name: String,

    /// Kits to buy; 0 removes the option
    #[arg(value_name = "KITS", allow_negative_numbers = true)]
    pub kits: i64,
}

#[derive(Args, Debug, Clone)]
pub struct RemoveArgs {
    #[arg(value_name = "CATEGORY")]
    pub category: Category,

    /// Only this option of a multi-kit category
    #[arg(value_name = "NAME")]
    pub name: Option<String>,
}

fn hint(err: &BuildError) -> Option<&'static str> {
    match err {
        BuildError::NotSingleSelect(_) => Some("use `bconf add` for memory and drives"),
        BuildError::NotMultiSelect(_) => Some("use `bconf select` for this category"),
        BuildError::CapacityExceeded { .. } => Some("remove something first or pick a larger kit"),
        _ => None,
    }
}

/// Save the edit or explain why it was refused
fn commit(session: &Session, result: Result<Selection, BuildError>) -> Result<Selection> {
    match result {
        Ok(next) => {
            session.save_selection(&next)?;
            Ok(next)
        }
        Err(err) => {
            if let Some(hint) = hint(&err) {
                eprintln!("{} {hint}", "hint:".yellow());
            }
            Err(err.into())
        }
    }
}

fn print_usage(catalog: &Catalog, selection: &Selection, category: Category) {
    println!(
        "{category}: {}/{} slots used",
        total_units(catalog, selection, category),
        unit_ceiling(catalog, selection, category)
    );
}

pub fn execute_select(args: SelectArgs, session: &Session) -> Result<()> {
    let catalog = session.catalog()?;
    let selection = session.load_selection()?;
    let next = commit(
        session,
        select(&catalog, &selection, args.category, &args.name),
    )?;

    println!("{} {}: {}", "✓".green(), args.category, args.name);
    if selection.get(Category::Cpu).is_some() && next.get(Category::Cpu).is_none() {
        println!(
            "{} processor removed, the motherboard has one built in",
            "!".yellow()
        );
    }
    Ok(())
}

pub fn execute_add(args: AddArgs, session: &Session) -> Result<()> {
    let catalog = session.catalog()?;
    let selection = session.load_selection()?;
    let next = commit(
        session,
        add_kit(&catalog, &selection, args.category, &args.name),
    )?;

    println!(
        "{} {}: {} ×{}",
        "✓".green(),
        args.category,
        args.name,
        next.kit_count(args.category, &args.name)
    );
    print_usage(&catalog, &next, args.category);
    Ok(())
}

pub fn execute_qty(args: QtyArgs, session: &Session) -> Result<()> {
    let catalog = session.catalog()?;
    let selection = session.load_selection()?;
    let next = commit(
        session,
        set_kit_count(&catalog, &selection, args.category, &args.name, args.kits),
    )?;

    println!("{} {}: {} ×{}", "✓".green(), args.category, args.name, args.kits);
    print_usage(&catalog, &next, args.category);
    Ok(())
}

pub fn execute_remove(args: RemoveArgs, session: &Session) -> Result<()> {
    let selection = session.load_selection()?;

    let next = match (&args.name, args.category.is_multi_select()) {
        (Some(name), true) => {
            if selection.kit_count(args.category, name) == 0 {
                anyhow::bail!("{name} is not in the build");
            }
            // lowering a count never needs the catalog
            let catalog = Catalog::new();
            commit(
                session,
                set_kit_count(&catalog, &selection, args.category, name, 0),
            )?
        }
        (Some(name), false) if selection.get(args.category) != Some(name.as_str()) => {
            anyhow::bail!("{name} is not the selected {}", args.category);
        }
        _ => {
            let next = deselect(&selection, args.category);
            session.save_selection(&next)?;
            next
        }
    };

    if next == selection {
        println!("{} was already empty", args.category);
    } else {
        println!("{} removed from {}", args.name.as_deref().unwrap_or("everything"), args.category);
    }
    Ok(())
}

pub fn execute_clear(session: &Session) -> Result<()> {
    session.save_selection(&Selection::new())?;
    println!("Build cleared ({})", session.build_path().display());
    Ok(())
}
