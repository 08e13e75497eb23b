use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::parse;

/// A slot type in a build.
///
/// Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "CPU")]
    Cpu,
    Motherboard,
    #[serde(rename = "RAM")]
    Ram,
    #[serde(rename = "SSD")]
    Ssd,
    #[serde(rename = "HDD")]
    Hdd,
    #[serde(rename = "GPU")]
    Gpu,
    #[serde(rename = "PSU")]
    Psu,
    Case,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Cpu,
        Category::Motherboard,
        Category::Ram,
        Category::Ssd,
        Category::Hdd,
        Category::Gpu,
        Category::Psu,
        Category::Case,
    ];

    /// Categories where repeated kits are allowed
    pub fn is_multi_select(self) -> bool {
        matches!(self, Category::Ram | Category::Ssd | Category::Hdd)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::Motherboard => "Motherboard",
            Category::Ram => "RAM",
            Category::Ssd => "SSD",
            Category::Hdd => "HDD",
            Category::Gpu => "GPU",
            Category::Psu => "PSU",
            Category::Case => "Case",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown category: {s}"))
    }
}

/// One purchasable catalog entry.
///
/// Different categories populate different subsets of the optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentOption {
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub ram_slots: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub modules_in_kit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_gb: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub integrated_cpu: Option<bool>,
    /// Enrichment label supplied by the catalog for display names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    /// Any other columns the catalog carries
    #[serde(flatten)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl ComponentOption {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        ComponentOption {
            name: name.into(),
            price,
            socket: None,
            ram_type: None,
            ram_slots: None,
            modules_in_kit: None,
            capacity_gb: None,
            capacity_raw: None,
            power: None,
            integrated_cpu: None,
            clean_name: None,
            code: None,
            article: None,
            properties: BTreeMap::new(),
        }
    }

    /// Small-outline memory form factor, detected from the name
    pub fn is_sodimm(&self) -> bool {
        parse::is_sodimm(&self.name)
    }

    pub fn has_integrated_cpu(&self) -> bool {
        self.integrated_cpu.unwrap_or(false)
    }

    /// Wattage of a built-in power supply, if any
    pub fn integrated_power(&self) -> Option<Decimal> {
        self.power.filter(|p| p.is_sign_positive() && !p.is_zero())
    }
}

/// Category → ordered option list, as delivered by the catalog source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: BTreeMap<Category, Vec<ComponentOption>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Builder used by loaders and tests
    pub fn with_options(mut self, category: Category, options: Vec<ComponentOption>) -> Self {
        self.categories.insert(category, options);
        self
    }

    /// Options for a category; missing categories yield an empty slice
    pub fn options(&self, category: Category) -> &[ComponentOption] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn find(&self, category: Category, name: &str) -> Option<&ComponentOption> {
        self.options(category).iter().find(|opt| opt.name == name)
    }

    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.find(category, name).is_some()
    }

    /// Populated categories in display order
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.values().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Vec<serde_json::Value>>::deserialize(deserializer)?;
        let mut categories = BTreeMap::new();

        for (key, rows) in raw {
            let Ok(category) = key.parse::<Category>() else {
                log::warn!("Skipping unknown catalog category '{key}'");
                continue;
            };

            let options: Vec<ComponentOption> = rows
                .into_iter()
                .filter_map(|row| match serde_json::from_value::<ComponentOption>(row) {
                    Ok(option) => Some(option),
                    Err(e) => {
                        log::warn!("Skipping malformed {category} row: {e}");
                        None
                    }
                })
                .collect();

            categories.insert(category, options);
        }

        Ok(Catalog { categories })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(u64),
    Float(f64),
    Text(String),
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(match value {
        None => None,
        Some(LooseNumber::Int(n)) => u32::try_from(n).ok(),
        Some(LooseNumber::Float(f)) if f.is_finite() && f >= 0.0 => Some(f.round() as u32),
        Some(LooseNumber::Float(_)) => None,
        Some(LooseNumber::Text(s)) => s.trim().parse().ok(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseBool {
    Bool(bool),
    Int(i64),
    Text(String),
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    let value = Option::<LooseBool>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(LooseBool::Bool(b)) => Ok(Some(b)),
        Some(LooseBool::Int(n)) => Ok(Some(n != 0)),
        Some(LooseBool::Text(s)) => match s.trim().to_lowercase().as_str() {
            "" => Ok(None),
            "true" | "yes" | "1" | "да" => Ok(Some(true)),
            "false" | "no" | "0" | "нет" => Ok(Some(false)),
            other => Err(de::Error::custom(format!(
                "invalid integrated_cpu flag: {other}"
            ))),
        },
    }
}
