use std::io::{self, Write};

use colored::Colorize;
use comfy_table::{Cell, Color, Table};

use crate::kit::units_per_kit;
use crate::parse::format_number;
use crate::{BuildSummary, Category, ComponentOption, Selection};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(comfy_table::ContentArrangement::DynamicFullWidth);
    table
}

impl BuildSummary {
    /// Write the priced build as a formatted table
    pub fn write_table<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{}", self.build_name.bold())?;

        let mut table = new_table();
        table.set_header(vec!["Category", "Name", "Code", "Article", "Capacity", "Price"]);

        for item in &self.line_items {
            // stale names are greyed out, they cost nothing
            let color = if item.known { Color::Reset } else { Color::DarkGrey };
            table.add_row(vec![
                Cell::new(item.category.as_str()).fg(color),
                Cell::new(&item.name).fg(color),
                Cell::new(item.code.as_deref().unwrap_or_default()).fg(color),
                Cell::new(item.article.as_deref().unwrap_or_default()).fg(color),
                Cell::new(item.capacity.as_deref().unwrap_or_default()).fg(color),
                Cell::new(item.price.to_string()).fg(color),
            ]);
        }

        table.add_row(vec![
            Cell::new(""),
            Cell::new("Итого").fg(Color::Green),
            Cell::new(""),
            Cell::new(""),
            Cell::new(""),
            Cell::new(self.grand_total.to_string()).fg(Color::Green),
        ]);

        writeln!(writer, "{table}")?;

        let unknown = self.unknown_items().count();
        if unknown > 0 {
            writeln!(
                writer,
                "{}",
                format!("{unknown} item(s) not found in the catalog").yellow()
            )?;
        }
        Ok(())
    }
}

/// Category-specific attribute shown next to each option
fn detail(category: Category, option: &ComponentOption) -> String {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    match category {
        Category::Cpu => opt(&option.socket),
        Category::Motherboard => {
            let mut parts = vec![opt(&option.socket), opt(&option.ram_type)];
            if let Some(slots) = option.ram_slots {
                parts.push(format!("{slots} slots"));
            }
            if option.has_integrated_cpu() {
                parts.push("integrated CPU".to_string());
            }
            parts.retain(|p| !p.is_empty());
            parts.join(", ")
        }
        Category::Ram => {
            let units = units_per_kit(option);
            let kit = if units > 1 {
                format!("{units} modules")
            } else {
                "1 module".to_string()
            };
            [opt(&option.ram_type), kit]
                .into_iter()
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
                .join(", ")
        }
        Category::Psu | Category::Case => option
            .power
            .map(|p| format!("{}W", format_number(p)))
            .unwrap_or_default(),
        _ => option
            .capacity_raw
            .clone()
            .or_else(|| option.capacity_gb.map(|c| format!("{} Gb", format_number(c))))
            .unwrap_or_default(),
    }
}

/// Write a filtered option listing, marking what the selection already holds
pub fn write_options_table<W: Write>(
    category: Category,
    options: &[&ComponentOption],
    selection: &Selection,
    mut writer: W,
) -> io::Result<()> {
    let mut table = new_table();
    table.set_header(vec!["", "Name", "Details", "Price"]);

    for option in options {
        let marker = if category.is_multi_select() {
            match selection.kit_count(category, &option.name) {
                0 => String::new(),
                n => format!("×{n}"),
            }
        } else if selection.get(category) == Some(option.name.as_str()) {
            "●".to_string()
        } else {
            String::new()
        };

        table.add_row(vec![
            Cell::new(marker).fg(Color::Green),
            Cell::new(&option.name),
            Cell::new(detail(category, option)),
            Cell::new(option.price.to_string()),
        ]);
    }

    writeln!(writer, "{table}")
}
