//! Compatibility filtering of catalog listings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::parse::{self, form_factor_label};
use crate::{BuildError, Catalog, Category, ComponentOption, Selection};

/// Ordering applied to a listing after filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Catalog order
    #[default]
    Default,
    Price,
    Name,
    Capacity,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Default => write!(f, "default"),
            SortKey::Price => write!(f, "price"),
            SortKey::Name => write!(f, "name"),
            SortKey::Capacity => write!(f, "capacity"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(SortKey::Default),
            "price" => Ok(SortKey::Price),
            "name" => Ok(SortKey::Name),
            "capacity" => Ok(SortKey::Capacity),
            _ => Err(format!("Unknown sort key: {s}")),
        }
    }
}

impl SortKey {
    /// Stable sort, so equal keys keep catalog order
    pub fn apply(self, options: &mut [&ComponentOption]) {
        match self {
            SortKey::Default => {}
            SortKey::Price => options.sort_by(|a, b| a.price.cmp(&b.price)),
            SortKey::Name => options.sort_by(|a, b| natord::compare(&a.name, &b.name)),
            SortKey::Capacity => options.sort_by(|a, b| {
                a.capacity_gb
                    .unwrap_or_default()
                    .cmp(&b.capacity_gb.unwrap_or_default())
            }),
        }
    }
}

/// An attribute set on the already-chosen side must be matched exactly by
/// the candidate. Nothing on the chosen side means nothing to match.
fn attribute_conflicts(governing: Option<&str>, candidate: Option<&str>) -> bool {
    governing.is_some() && candidate != governing
}

/// Socket mismatch between a chosen part and a candidate, if any
pub fn socket_conflict(chosen: &ComponentOption, candidate: &ComponentOption) -> Option<String> {
    if attribute_conflicts(chosen.socket.as_deref(), candidate.socket.as_deref()) {
        Some(format!(
            "{} uses socket {}, {} uses {}",
            chosen.name,
            chosen.socket.as_deref().unwrap_or("?"),
            candidate.name,
            candidate.socket.as_deref().unwrap_or("unknown socket"),
        ))
    } else {
        None
    }
}

/// Memory mismatch between a board and a memory kit, if any.
///
/// `board_governs` tells which side was chosen first: its memory type must
/// be matched by the other side. Form factors must always agree.
pub fn memory_conflict(
    board: &ComponentOption,
    ram: &ComponentOption,
    board_governs: bool,
) -> Option<String> {
    let (governing, candidate) = if board_governs {
        (board.ram_type.as_deref(), ram.ram_type.as_deref())
    } else {
        (ram.ram_type.as_deref(), board.ram_type.as_deref())
    };

    if attribute_conflicts(governing, candidate) {
        return Some(format!(
            "motherboard supports {}, module is {}",
            board.ram_type.as_deref().unwrap_or("unknown memory"),
            ram.ram_type.as_deref().unwrap_or("unknown memory"),
        ));
    }

    let (board_sodimm, ram_sodimm) = (board.is_sodimm(), ram.is_sodimm());
    if board_sodimm != ram_sodimm {
        return Some(format!(
            "motherboard supports {}, module is {}",
            form_factor_label(board_sodimm),
            form_factor_label(ram_sodimm),
        ));
    }

    None
}

fn passes_naming_guard(category: Category, option: &ComponentOption) -> bool {
    match category {
        Category::Motherboard => parse::looks_like_motherboard(&option.name),
        Category::Psu => parse::looks_like_psu(&option.name),
        _ => true,
    }
}

/// The selected single option of `category`, if it still resolves
fn selected_option<'a>(
    catalog: &'a Catalog,
    selection: &Selection,
    category: Category,
) -> Option<&'a ComponentOption> {
    selection
        .get(category)
        .and_then(|name| catalog.find(category, name))
}

/// Options of `category` that remain valid for the current selection.
///
/// Rules are first-match per category. A rule whose governing part is stale
/// or lacks the governing attribute lets the full listing through. Listing
/// CPUs under a board with an integrated processor is reported as
/// [`BuildError::CategoryUnavailable`].
pub fn filter_options<'a>(
    catalog: &'a Catalog,
    category: Category,
    selection: &Selection,
    sort: SortKey,
) -> Result<Vec<&'a ComponentOption>, BuildError> {
    let guarded = catalog
        .options(category)
        .iter()
        .filter(|opt| passes_naming_guard(category, opt));

    let mut options: Vec<&ComponentOption> = match category {
        Category::Cpu => match selected_option(catalog, selection, Category::Motherboard) {
            Some(board) if board.has_integrated_cpu() => {
                return Err(BuildError::CategoryUnavailable {
                    category,
                    reason: format!("{} has an integrated processor", board.name),
                });
            }
            Some(board) if board.socket.is_some() => {
                log::debug!("Filtering CPUs by socket of {}", board.name);
                guarded
                    .filter(|cpu| socket_conflict(board, cpu).is_none())
                    .collect()
            }
            _ => guarded.collect(),
        },
        Category::Motherboard => {
            let cpu = selected_option(catalog, selection, Category::Cpu)
                .filter(|cpu| cpu.socket.is_some());
            let rams: Vec<&ComponentOption> = selection
                .kits(Category::Ram)
                .iter()
                .filter_map(|line| catalog.find(Category::Ram, &line.name))
                .collect();

            if let Some(cpu) = cpu {
                log::debug!("Filtering motherboards by socket of {}", cpu.name);
                guarded
                    .filter(|board| socket_conflict(cpu, board).is_none())
                    .collect()
            } else if !rams.is_empty() {
                log::debug!("Filtering motherboards by selected memory");
                guarded
                    .filter(|board| {
                        rams.iter()
                            .all(|ram| memory_conflict(board, ram, false).is_none())
                    })
                    .collect()
            } else {
                guarded.collect()
            }
        }
        Category::Ram => match selected_option(catalog, selection, Category::Motherboard) {
            Some(board) => {
                log::debug!("Filtering memory by {}", board.name);
                guarded
                    .filter(|ram| memory_conflict(board, ram, true).is_none())
                    .collect()
            }
            None => guarded.collect(),
        },
        _ => guarded.collect(),
    };

    sort.apply(&mut options);
    Ok(options)
}
