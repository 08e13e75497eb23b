use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::filter::{memory_conflict, socket_conflict};
use crate::quantity;
use crate::{BuildError, Catalog, Category};

/// One multi-select entry: an option name and how many kits of it were bought
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitLine {
    pub name: String,
    pub kits: u32,
}

/// The user's in-progress build.
///
/// Single-select categories hold one option name. Multi-select categories
/// hold kit counts per option name, in the order the names were first added.
/// Names are not checked against any catalog here; stale names are resolved
/// (or not) by whoever reads the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RawSelection", from = "RawSelection")]
pub struct Selection {
    single: BTreeMap<Category, String>,
    kits: BTreeMap<Category, Vec<KitLine>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unchecked builder for a single-select entry
    pub fn with_single(mut self, category: Category, name: impl Into<String>) -> Self {
        self.single.insert(category, name.into());
        self
    }

    /// Unchecked builder for a multi-select entry. A single-select category
    /// takes the name as its one selection.
    pub fn with_kits(mut self, category: Category, name: impl Into<String>, kits: u32) -> Self {
        let name = name.into();
        if category.is_multi_select() {
            self.set_kits(category, &name, kits);
        } else if kits > 0 {
            self.set_single(category, &name);
        }
        self
    }

    /// Selected option name of a single-select category
    pub fn get(&self, category: Category) -> Option<&str> {
        self.single.get(&category).map(String::as_str)
    }

    /// Kit lines of a multi-select category
    pub fn kits(&self, category: Category) -> &[KitLine] {
        self.kits
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn kit_count(&self, category: Category, name: &str) -> u32 {
        self.kits(category)
            .iter()
            .find(|line| line.name == name)
            .map(|line| line.kits)
            .unwrap_or(0)
    }

    pub fn contains(&self, category: Category) -> bool {
        if category.is_multi_select() {
            !self.kits(category).is_empty()
        } else {
            self.single.contains_key(&category)
        }
    }

    /// Populated categories in display order
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.contains(*c))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.categories().is_empty()
    }

    pub(crate) fn set_single(&mut self, category: Category, name: &str) {
        self.single.insert(category, name.to_string());
    }

    /// Replace the kit count for `name`; zero removes it
    pub(crate) fn set_kits(&mut self, category: Category, name: &str, kits: u32) {
        let lines = self.kits.entry(category).or_default();
        match lines.iter().position(|line| line.name == name) {
            Some(idx) if kits == 0 => {
                lines.remove(idx);
            }
            Some(idx) => lines[idx].kits = kits,
            None if kits == 0 => {}
            None => lines.push(KitLine {
                name: name.to_string(),
                kits,
            }),
        }
        if lines.is_empty() {
            self.kits.remove(&category);
        }
    }

    pub(crate) fn clear(&mut self, category: Category) {
        self.single.remove(&category);
        self.kits.remove(&category);
    }
}

/// Assign a single-select category.
///
/// Returns the updated selection; the input is left untouched, including on
/// error. Choosing a motherboard with an integrated processor drops any CPU
/// choice.
pub fn select(
    catalog: &Catalog,
    selection: &Selection,
    category: Category,
    name: &str,
) -> Result<Selection, BuildError> {
    if category.is_multi_select() {
        return Err(BuildError::NotSingleSelect(category));
    }

    let candidate = catalog
        .find(category, name)
        .ok_or_else(|| BuildError::UnknownOption {
            category,
            name: name.to_string(),
        })?;

    let mut next = selection.clone();

    match category {
        Category::Cpu => {
            if let Some(board) = selection
                .get(Category::Motherboard)
                .and_then(|n| catalog.find(Category::Motherboard, n))
            {
                if board.has_integrated_cpu() {
                    return Err(BuildError::conflict(
                        category,
                        format!("{} already has an integrated processor", board.name),
                    ));
                }
                if let Some(reason) = socket_conflict(board, candidate) {
                    return Err(BuildError::conflict(category, reason));
                }
            }
        }
        Category::Motherboard => {
            if candidate.has_integrated_cpu() {
                if let Some(cpu) = next.get(Category::Cpu) {
                    log::debug!("{} has an integrated processor, dropping {cpu}", candidate.name);
                }
                next.clear(Category::Cpu);
            } else if let Some(cpu) = selection
                .get(Category::Cpu)
                .and_then(|n| catalog.find(Category::Cpu, n))
            {
                if let Some(reason) = socket_conflict(cpu, candidate) {
                    return Err(BuildError::conflict(category, reason));
                }
            }

            for line in selection.kits(Category::Ram) {
                if let Some(ram) = catalog.find(Category::Ram, &line.name) {
                    if let Some(reason) = memory_conflict(candidate, ram, false) {
                        return Err(BuildError::conflict(category, reason));
                    }
                }
            }
        }
        _ => {}
    }

    next.set_single(category, name);

    if category == Category::Motherboard {
        let used = quantity::total_units(catalog, &next, Category::Ram);
        let ceiling = quantity::unit_ceiling(catalog, &next, Category::Ram);
        if used > ceiling {
            return Err(BuildError::CapacityExceeded {
                category: Category::Ram,
                ceiling,
                requested: used,
            });
        }
    }

    Ok(next)
}

/// Remove everything chosen for `category`
pub fn deselect(selection: &Selection, category: Category) -> Selection {
    let mut next = selection.clone();
    next.clear(category);
    next
}

/// On-disk and wire shape: `{"CPU": "name", "RAM": [{"name": .., "kits": ..}]}`
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Single(String),
    Kits(Vec<KitLine>),
}

#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct RawSelection(BTreeMap<String, RawEntry>);

impl From<Selection> for RawSelection {
    fn from(selection: Selection) -> Self {
        let mut raw: BTreeMap<String, RawEntry> = selection
            .single
            .into_iter()
            .map(|(category, name)| (category.to_string(), RawEntry::Single(name)))
            .collect();
        raw.extend(
            selection
                .kits
                .into_iter()
                .map(|(category, lines)| (category.to_string(), RawEntry::Kits(lines))),
        );
        RawSelection(raw)
    }
}

impl From<RawSelection> for Selection {
    fn from(raw: RawSelection) -> Self {
        let mut selection = Selection::new();
        for (key, entry) in raw.0 {
            let Ok(category) = key.parse::<Category>() else {
                log::warn!("Ignoring unknown category '{key}' in selection");
                continue;
            };
            match (category.is_multi_select(), entry) {
                (false, RawEntry::Single(name)) => selection.set_single(category, &name),
                (true, RawEntry::Kits(lines)) => {
                    for line in lines {
                        let kits = selection
                            .kit_count(category, &line.name)
                            .saturating_add(line.kits);
                        selection.set_kits(category, &line.name, kits);
                    }
                }
                (true, RawEntry::Single(name)) => selection.set_kits(category, &name, 1),
                (false, RawEntry::Kits(lines)) => {
                    if let Some(line) = lines.into_iter().next() {
                        selection.set_single(category, &line.name);
                    }
                }
            }
        }
        selection
    }
}
