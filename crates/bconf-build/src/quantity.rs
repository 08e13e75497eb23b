//! Kit and unit bookkeeping for multi-select categories.
//!
//! A kit is what gets bought; a unit is what occupies a slot. A `2x8Gb`
//! memory kit is one kit and two units. Ceilings are expressed in units,
//! prices in kits.

use rust_decimal::Decimal;

use crate::filter::memory_conflict;
use crate::kit::{analyze_kit, units_per_kit};
use crate::{BuildError, Catalog, Category, ComponentOption, Selection};

/// Memory slots assumed when no motherboard is chosen
pub const DEFAULT_RAM_SLOTS: u32 = 2;

/// Simultaneous drives allowed per storage category
pub const MAX_DRIVES: u32 = 4;

fn ensure_multi_select(category: Category) -> Result<(), BuildError> {
    if category.is_multi_select() {
        Ok(())
    } else {
        Err(BuildError::NotMultiSelect(category))
    }
}

/// Units per kit for a name, whether or not it still resolves in the catalog
fn units_for_name(catalog: &Catalog, category: Category, name: &str) -> u32 {
    match catalog.find(category, name) {
        Some(option) => units_per_kit(option),
        None => analyze_kit(name).units_per_kit,
    }
}

/// Units held by the lines of `category` other than `skip`; `None` on overflow
fn checked_units(
    catalog: &Catalog,
    selection: &Selection,
    category: Category,
    skip: Option<&str>,
) -> Option<u32> {
    selection
        .kits(category)
        .iter()
        .filter(|line| Some(line.name.as_str()) != skip)
        .try_fold(0u32, |acc, line| {
            line.kits
                .checked_mul(units_for_name(catalog, category, &line.name))
                .and_then(|units| acc.checked_add(units))
        })
}

/// Physical units occupied by everything selected in `category`, saturating
/// at `u32::MAX`
pub fn total_units(catalog: &Catalog, selection: &Selection, category: Category) -> u32 {
    checked_units(catalog, selection, category, None).unwrap_or(u32::MAX)
}

/// Most physical units `category` can hold under the current selection
pub fn unit_ceiling(catalog: &Catalog, selection: &Selection, category: Category) -> u32 {
    match category {
        Category::Ram => selection
            .get(Category::Motherboard)
            .and_then(|name| catalog.find(Category::Motherboard, name))
            .and_then(|board| board.ram_slots)
            .unwrap_or(DEFAULT_RAM_SLOTS),
        Category::Ssd | Category::Hdd => MAX_DRIVES,
        // single-select categories hold exactly one part
        _ => 1,
    }
}

/// Whether one more kit of `name` fits under the ceiling
pub fn can_add(catalog: &Catalog, selection: &Selection, category: Category, name: &str) -> bool {
    checked_units(catalog, selection, category, None)
        .and_then(|used| used.checked_add(units_for_name(catalog, category, name)))
        .is_some_and(|requested| requested <= unit_ceiling(catalog, selection, category))
}

/// Memory veto applied whenever a new kit is introduced, independent of the
/// listing filter
fn check_ram_against_board(
    catalog: &Catalog,
    selection: &Selection,
    ram: &ComponentOption,
) -> Result<(), BuildError> {
    let board = selection
        .get(Category::Motherboard)
        .and_then(|name| catalog.find(Category::Motherboard, name));

    match board.and_then(|board| memory_conflict(board, ram, true)) {
        Some(reason) => Err(BuildError::conflict(Category::Ram, reason)),
        None => Ok(()),
    }
}

/// Reject `requested` units past the ceiling; `None` means the count overflowed
fn ensure_fits(
    catalog: &Catalog,
    selection: &Selection,
    category: Category,
    requested: Option<u32>,
) -> Result<(), BuildError> {
    let ceiling = unit_ceiling(catalog, selection, category);
    match requested {
        Some(requested) if requested <= ceiling => Ok(()),
        requested => {
            let requested = requested.unwrap_or(u32::MAX);
            log::debug!("{category}: {requested} units requested, ceiling {ceiling}");
            Err(BuildError::CapacityExceeded {
                category,
                ceiling,
                requested,
            })
        }
    }
}

fn resolve<'a>(
    catalog: &'a Catalog,
    category: Category,
    name: &str,
) -> Result<&'a ComponentOption, BuildError> {
    catalog
        .find(category, name)
        .ok_or_else(|| BuildError::UnknownOption {
            category,
            name: name.to_string(),
        })
}

/// Buy one more kit of `name`.
///
/// The selection passed in is never modified; on success the updated copy
/// is returned.
pub fn add_kit(
    catalog: &Catalog,
    selection: &Selection,
    category: Category,
    name: &str,
) -> Result<Selection, BuildError> {
    ensure_multi_select(category)?;
    let option = resolve(catalog, category, name)?;

    let requested = checked_units(catalog, selection, category, None)
        .and_then(|used| used.checked_add(units_per_kit(option)));
    ensure_fits(catalog, selection, category, requested)?;

    if category == Category::Ram {
        check_ram_against_board(catalog, selection, option)?;
    }

    let mut next = selection.clone();
    next.set_kits(category, name, selection.kit_count(category, name).saturating_add(1));
    Ok(next)
}

/// Set exactly `kits` kits of `name`, holding every other line constant.
///
/// Zero removes the line; negative counts are rejected. Lowering or
/// removing a stale line is always allowed, raising it requires the name to
/// resolve.
pub fn set_kit_count(
    catalog: &Catalog,
    selection: &Selection,
    category: Category,
    name: &str,
    kits: i64,
) -> Result<Selection, BuildError> {
    ensure_multi_select(category)?;
    if kits < 0 {
        return Err(BuildError::InvalidQuantity { requested: kits });
    }
    // counts past u32 can never fit
    let Ok(kits) = u32::try_from(kits) else {
        return Err(BuildError::CapacityExceeded {
            category,
            ceiling: unit_ceiling(catalog, selection, category),
            requested: u32::MAX,
        });
    };

    let current = selection.kit_count(category, name);
    if kits > current {
        let option = resolve(catalog, category, name)?;

        let requested = checked_units(catalog, selection, category, Some(name)).and_then(
            |others| {
                kits.checked_mul(units_per_kit(option))
                    .and_then(|units| others.checked_add(units))
            },
        );
        ensure_fits(catalog, selection, category, requested)?;

        if category == Category::Ram && current == 0 {
            check_ram_against_board(catalog, selection, option)?;
        }
    }

    let mut next = selection.clone();
    next.set_kits(category, name, kits);
    Ok(next)
}

/// Price of everything selected in `category`: kit price times kits bought.
///
/// Single-select categories contribute their one price. Stale names cost
/// nothing.
pub fn category_subtotal(catalog: &Catalog, selection: &Selection, category: Category) -> Decimal {
    if category.is_multi_select() {
        selection
            .kits(category)
            .iter()
            .filter_map(|line| {
                catalog
                    .find(category, &line.name)
                    .map(|opt| opt.price * Decimal::from(line.kits))
            })
            .sum()
    } else {
        selection
            .get(category)
            .and_then(|name| catalog.find(category, name))
            .map(|opt| opt.price)
            .unwrap_or_default()
    }
}
