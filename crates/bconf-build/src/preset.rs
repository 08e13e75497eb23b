//! Ready-made builds.
//!
//! Preset feeds are looser than saved selections: every category maps to a
//! name or a list of names, and repeated names stand for repeated kits.
//! Kit records as written by [`Selection`] are accepted too.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::selection::KitLine;
use crate::{Catalog, Category, Selection};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPreset")]
pub struct Preset {
    pub name: String,
    pub components: Selection,
}

impl Preset {
    /// Selected names the catalog no longer carries
    pub fn stale_names<'a>(&'a self, catalog: &Catalog) -> Vec<(Category, &'a str)> {
        let mut stale = Vec::new();
        for category in self.components.categories() {
            if category.is_multi_select() {
                for line in self.components.kits(category) {
                    if !catalog.contains(category, &line.name) {
                        stale.push((category, line.name.as_str()));
                    }
                }
            } else if let Some(name) = self.components.get(category) {
                if !catalog.contains(category, name) {
                    stale.push((category, name));
                }
            }
        }
        stale
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    One(String),
    Many(Vec<String>),
    Kits(Vec<KitLine>),
}

#[derive(Deserialize)]
struct RawPreset {
    name: String,
    #[serde(default)]
    components: BTreeMap<String, RawValue>,
}

impl From<RawPreset> for Preset {
    fn from(raw: RawPreset) -> Self {
        Preset {
            components: normalize_components(&raw.name, raw.components),
            name: raw.name,
        }
    }
}

fn normalize_components(preset: &str, raw: BTreeMap<String, RawValue>) -> Selection {
    let mut selection = Selection::new();

    for (key, value) in raw {
        let Ok(category) = key.parse::<Category>() else {
            log::warn!("Preset '{preset}': skipping unknown category '{key}'");
            continue;
        };

        let lines: Vec<(String, u32)> = match value {
            RawValue::One(name) => vec![(name, 1)],
            RawValue::Many(names) => names.into_iter().map(|name| (name, 1)).collect(),
            RawValue::Kits(lines) => lines.into_iter().map(|l| (l.name, l.kits)).collect(),
        }
        .into_iter()
        .map(|(name, kits)| (name.trim().to_string(), kits))
        .filter(|(name, kits)| !name.is_empty() && *kits > 0)
        .collect();

        if category.is_multi_select() {
            for (name, kits) in lines {
                let total = selection.kit_count(category, &name).saturating_add(kits);
                selection.set_kits(category, &name, total);
            }
        } else {
            if lines.len() > 1 {
                log::warn!(
                    "Preset '{preset}': {category} takes one option, keeping '{}'",
                    lines[0].0
                );
            }
            if let Some((name, _)) = lines.first() {
                selection.set_single(category, name);
            }
        }
    }

    selection
}

/// Parse a preset feed: a JSON array of `{name, components}` records
pub fn parse_presets(json: &str) -> serde_json::Result<Vec<Preset>> {
    serde_json::from_str(json)
}
