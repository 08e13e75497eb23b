//! Canonical build names.
//!
//! The name is assembled from one token per populated category in a fixed
//! order: processor, chipset, memory, graphics, drives, power. Absent
//! categories contribute nothing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::kit::{analyze_kit, kit_info};
use crate::parse::{
    chipset_token, cpu_label, format_number, gpu_model_token, memory_generation,
    motherboard_fallback_label, truncated_label, watts_in_name,
};
use crate::{Catalog, Category, ComponentOption, Selection};

pub const DEFAULT_BRAND: &str = "BConf";

/// Memory generation assumed when nothing in the selection names one
const DEFAULT_MEMORY_GENERATION: &str = "DDR4";

/// Words of a raw graphics card name kept when no model token is found
const GPU_FALLBACK_WORDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingOptions {
    pub brand: String,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            brand: DEFAULT_BRAND.to_string(),
        }
    }
}

impl NamingOptions {
    pub fn with_brand(brand: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
        }
    }
}

fn positive(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| *v > Decimal::ZERO)
}

fn gb(value: Decimal) -> String {
    format!("{}Gb", format_number(value))
}

fn cpu_token(option: Option<&ComponentOption>, name: &str) -> String {
    match option {
        Some(opt) => match opt.clean_name.as_deref() {
            Some(clean) if !clean.trim().is_empty() => clean.trim().to_string(),
            _ => cpu_label(&opt.name),
        },
        None => cpu_label(name),
    }
}

fn motherboard_token(name: &str) -> String {
    match chipset_token(name) {
        Some(chipset) => chipset.to_string(),
        None => motherboard_fallback_label(name),
    }
}

/// Aggregate token for every selected memory kit, e.g. `DDR4 2x8Gb`
pub fn memory_token(catalog: &Catalog, selection: &Selection) -> Option<String> {
    let lines = selection.kits(Category::Ram);
    if lines.is_empty() {
        return None;
    }

    let mut units = 0u32;
    let mut total = Decimal::ZERO;
    let mut unit_capacities = Vec::new();
    let mut generation = None;

    for line in lines {
        let option = catalog.find(Category::Ram, &line.name);
        let info = option.map(kit_info).unwrap_or_else(|| analyze_kit(&line.name));

        units = units.saturating_add(line.kits.saturating_mul(info.units_per_kit));
        total += info.total_capacity() * Decimal::from(line.kits);
        unit_capacities.push(info.unit_capacity);

        if generation.is_none() {
            generation = memory_generation(&line.name).or_else(|| {
                option
                    .and_then(|opt| opt.ram_type.as_deref())
                    .and_then(memory_generation)
            });
        }
    }

    let generation = generation.unwrap_or_else(|| DEFAULT_MEMORY_GENERATION.to_string());
    let shared = unit_capacities[0];
    let token = if !shared.is_zero() && unit_capacities.iter().all(|c| *c == shared) {
        format!("{generation} {units}x{}", gb(shared))
    } else if !total.is_zero() {
        format!("{generation} {}", gb(total))
    } else {
        generation
    };
    Some(token)
}

fn gpu_token(option: Option<&ComponentOption>, name: &str) -> String {
    let suffix = option
        .and_then(|opt| positive(opt.capacity_gb))
        .map(|c| format!(" {}", gb(c)))
        .unwrap_or_default();

    if let Some(clean) = option
        .and_then(|opt| opt.clean_name.as_deref())
        .filter(|c| !c.trim().is_empty())
    {
        return format!("{}{suffix}", clean.trim());
    }

    match gpu_model_token(name) {
        Some(model) => format!("{model}{suffix}"),
        None => truncated_label(name, GPU_FALLBACK_WORDS),
    }
}

/// One token per purchased drive, `SSD 512Gb` or bare `SSD`
fn drive_tokens(catalog: &Catalog, selection: &Selection, category: Category) -> Vec<String> {
    let label = category.as_str();
    let mut tokens = Vec::new();
    for line in selection.kits(category) {
        let capacity = catalog
            .find(category, &line.name)
            .and_then(|opt| positive(opt.capacity_gb))
            .or_else(|| positive(Some(analyze_kit(&line.name).total_capacity())));
        let token = match capacity {
            Some(c) => format!("{label} {}", gb(c)),
            None => label.to_string(),
        };
        tokens.extend(std::iter::repeat_n(token, line.kits as usize));
    }
    tokens
}

fn watts(value: Decimal) -> String {
    format!("{}W", format_number(value))
}

fn psu_token(option: Option<&ComponentOption>, name: &str) -> Option<String> {
    option
        .and_then(|opt| positive(opt.power))
        .or_else(|| watts_in_name(name))
        .map(watts)
}

/// Derive the canonical build name.
///
/// A selection holding only memory is named as a memory order rather than a
/// computer. Calling this has no effect on its inputs.
pub fn build_name(catalog: &Catalog, selection: &Selection, options: &NamingOptions) -> String {
    let single = |category: Category| {
        selection
            .get(category)
            .map(|name| (catalog.find(category, name), name))
    };

    if selection.categories() == [Category::Ram] {
        let memory = memory_token(catalog, selection)
            .unwrap_or_else(|| DEFAULT_MEMORY_GENERATION.to_string());
        return format!("Оперативная память {memory}");
    }

    let mut parts: Vec<String> = Vec::new();

    if let Some((option, name)) = single(Category::Cpu) {
        parts.push(cpu_token(option, name));
    }
    if let Some((_, name)) = single(Category::Motherboard) {
        parts.push(motherboard_token(name));
    }
    parts.extend(memory_token(catalog, selection));
    if let Some((option, name)) = single(Category::Gpu) {
        parts.push(gpu_token(option, name));
    }
    parts.extend(drive_tokens(catalog, selection, Category::Ssd));
    parts.extend(drive_tokens(catalog, selection, Category::Hdd));

    let psu = single(Category::Psu);
    if let Some((option, name)) = psu {
        parts.extend(psu_token(option, name));
    } else if let Some((Some(case), _)) = single(Category::Case) {
        parts.extend(case.integrated_power().map(watts));
    }

    parts.retain(|p| !p.is_empty());
    if parts.is_empty() {
        options.brand.clone()
    } else {
        format!("Компьютер {} ({})", options.brand, parts.join(", "))
    }
}
