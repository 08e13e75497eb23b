use rust_decimal::Decimal;
use serde::Serialize;

use crate::naming::{NamingOptions, build_name};
use crate::parse::format_number;
use crate::quantity::category_subtotal;
use crate::{Catalog, Category, ComponentOption, Selection};

/// One purchased thing: a single-select part or one kit of a multi-select
/// part
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub category: Category,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    pub price: Decimal,
    /// Display capacity, raw catalog text preferred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    /// False for names that no longer resolve in the catalog
    pub known: bool,
}

impl LineItem {
    fn resolved(category: Category, option: &ComponentOption) -> Self {
        let capacity = option.capacity_raw.clone().or_else(|| {
            option
                .capacity_gb
                .filter(|c| *c > Decimal::ZERO)
                .map(|c| format!("{} Gb", format_number(c)))
        });

        Self {
            category,
            name: option.name.clone(),
            code: option.code.clone(),
            article: option.article.clone(),
            price: option.price,
            capacity,
            known: true,
        }
    }

    fn placeholder(category: Category, name: &str) -> Self {
        Self {
            category,
            name: name.to_string(),
            code: None,
            article: None,
            price: Decimal::ZERO,
            capacity: None,
            known: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    pub line_items: Vec<LineItem>,
    pub grand_total: Decimal,
    pub build_name: String,
}

impl BuildSummary {
    /// Per-category totals in display order, skipping empty categories
    pub fn category_totals(&self) -> Vec<(Category, Decimal)> {
        Category::ALL
            .into_iter()
            .filter_map(|category| {
                let mut items = self
                    .line_items
                    .iter()
                    .filter(|item| item.category == category)
                    .peekable();
                items.peek()?;
                Some((category, items.map(|item| item.price).sum::<Decimal>()))
            })
            .collect()
    }

    /// Names that did not resolve against the catalog
    pub fn unknown_items(&self) -> impl Iterator<Item = &LineItem> {
        self.line_items.iter().filter(|item| !item.known)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Price out a selection and derive its name.
///
/// Multi-select categories produce one line item per kit bought. Stale names
/// stay in the listing as zero-price placeholders so item counts match what
/// was selected.
pub fn summarize(catalog: &Catalog, selection: &Selection, options: &NamingOptions) -> BuildSummary {
    let mut line_items = Vec::new();
    let mut grand_total = Decimal::ZERO;

    for category in selection.categories() {
        let item = |name: &str| match catalog.find(category, name) {
            Some(option) => LineItem::resolved(category, option),
            None => {
                log::debug!("{category} option '{name}' not in catalog");
                LineItem::placeholder(category, name)
            }
        };

        if category.is_multi_select() {
            for line in selection.kits(category) {
                let resolved = item(&line.name);
                line_items.extend(std::iter::repeat_n(resolved, line.kits as usize));
            }
        } else if let Some(name) = selection.get(category) {
            line_items.push(item(name));
        }

        grand_total += category_subtotal(catalog, selection, category);
    }

    BuildSummary {
        line_items,
        grand_total,
        build_name: build_name(catalog, selection, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn catalog() -> Catalog {
        let mut cpu = ComponentOption::new("Intel® Core™ i5 Processor", dec!(15000));
        cpu.code = Some("00012".into());
        cpu.article = Some("BX8071512400F".into());

        let mut ram = ComponentOption::new("2x8Gb DDR4", dec!(4000));
        ram.capacity_raw = Some("16 ГБ".into());

        let mut ssd = ComponentOption::new("NVMe 512GB", dec!(5500.50));
        ssd.capacity_gb = Some(dec!(512));

        Catalog::new()
            .with_options(Category::Cpu, vec![cpu])
            .with_options(
                Category::Motherboard,
                vec![ComponentOption::new("Материнская плата B660M", dec!(11000))],
            )
            .with_options(Category::Ram, vec![ram])
            .with_options(Category::Ssd, vec![ssd])
    }

    fn reference_selection() -> Selection {
        Selection::new()
            .with_single(Category::Cpu, "Intel® Core™ i5 Processor")
            .with_single(Category::Motherboard, "Материнская плата B660M")
            .with_kits(Category::Ram, "2x8Gb DDR4", 2)
            .with_kits(Category::Ssd, "NVMe 512GB", 1)
    }

    #[test]
    fn test_one_line_item_per_kit() {
        let summary = summarize(&catalog(), &reference_selection(), &NamingOptions::default());

        let names: Vec<_> = summary.line_items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Intel® Core™ i5 Processor",
                "Материнская плата B660M",
                "2x8Gb DDR4",
                "2x8Gb DDR4",
                "NVMe 512GB",
            ]
        );
        // two kits of two sticks cost two kit prices
        assert_eq!(summary.grand_total, dec!(39500.50));
        assert_eq!(
            summary.grand_total,
            summary.line_items.iter().map(|i| i.price).sum::<Decimal>()
        );
        assert_eq!(
            summary.build_name,
            "Компьютер BConf (Intel Core i5, B660, DDR4 4x8Gb, SSD 512Gb)"
        );
    }

    #[test]
    fn test_capacity_display() {
        let summary = summarize(&catalog(), &reference_selection(), &NamingOptions::default());
        let capacity = |name: &str| {
            summary
                .line_items
                .iter()
                .find(|i| i.name == name)
                .and_then(|i| i.capacity.clone())
        };
        assert_eq!(capacity("2x8Gb DDR4").as_deref(), Some("16 ГБ"));
        assert_eq!(capacity("NVMe 512GB").as_deref(), Some("512 Gb"));
        assert_eq!(capacity("Материнская плата B660M"), None);
    }

    #[test]
    fn test_stale_names_become_placeholders() {
        let selection = reference_selection()
            .with_single(Category::Gpu, "Снятая с продажи видеокарта")
            .with_kits(Category::Hdd, "Old HDD 1TB", 2);
        let summary = summarize(&catalog(), &selection, &NamingOptions::default());

        let unknown: Vec<_> = summary.unknown_items().map(|i| i.name.as_str()).collect();
        assert_eq!(
            unknown,
            vec!["Old HDD 1TB", "Old HDD 1TB", "Снятая с продажи видеокарта"]
        );
        assert!(summary.unknown_items().all(|i| i.price.is_zero()));
        assert_eq!(summary.line_items.len(), 8);
        assert_eq!(summary.grand_total, dec!(39500.50));
    }

    #[test]
    fn test_category_totals() {
        let summary = summarize(&catalog(), &reference_selection(), &NamingOptions::default());
        assert_eq!(
            summary.category_totals(),
            vec![
                (Category::Cpu, dec!(15000)),
                (Category::Motherboard, dec!(11000)),
                (Category::Ram, dec!(8000)),
                (Category::Ssd, dec!(5500.50)),
            ]
        );
    }

    #[test]
    fn test_empty_catalog_does_not_panic() {
        let summary = summarize(&Catalog::new(), &reference_selection(), &NamingOptions::default());
        assert_eq!(summary.grand_total, Decimal::ZERO);
        assert_eq!(summary.line_items.len(), 5);
        assert!(summary.line_items.iter().all(|i| !i.known));
    }
}
