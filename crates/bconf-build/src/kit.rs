//! Kit analysis: how many physical units one purchasable kit holds.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ComponentOption;

/// `2x8Gb`, `4 x 16 GB`, `2х8Гб` (Cyrillic х), `2×32G`
static PAIRED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*[xх×]\s*(\d+(?:[.,]\d+)?)\s*(?:gb|g|гб|г)\b").unwrap()
});

/// `16Gb`, `512 GB`, `8Гб`; the unit must end the word, so `4 Gaming` is not a size
static SINGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:gb|g|гб|г)\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KitInfo {
    pub units_per_kit: u32,
    /// Capacity of one physical unit in gigabytes; zero when unknown
    pub unit_capacity: Decimal,
}

impl KitInfo {
    pub const UNKNOWN: KitInfo = KitInfo {
        units_per_kit: 1,
        unit_capacity: Decimal::ZERO,
    };

    pub fn total_capacity(&self) -> Decimal {
        self.unit_capacity * Decimal::from(self.units_per_kit)
    }
}

fn parse_size(text: &str) -> Decimal {
    text.replace(',', ".").parse().unwrap_or_default()
}

/// Derive kit composition from a display name.
///
/// The paired `<count>x<size>` form wins over a lone `<size>`; a name with
/// neither reports one unit of unknown capacity.
pub fn analyze_kit(name: &str) -> KitInfo {
    if let Some(caps) = PAIRED.captures(name) {
        let units = caps[1].parse::<u32>().unwrap_or(1).max(1);
        return KitInfo {
            units_per_kit: units,
            unit_capacity: parse_size(&caps[2]),
        };
    }

    if let Some(caps) = SINGLE.captures(name) {
        return KitInfo {
            units_per_kit: 1,
            unit_capacity: parse_size(&caps[1]),
        };
    }

    KitInfo::UNKNOWN
}

/// Physical units in one kit of `option`: the explicit catalog field when it
/// is set, otherwise whatever the name says.
pub fn units_per_kit(option: &ComponentOption) -> u32 {
    match option.modules_in_kit {
        Some(n) if n > 0 => n,
        _ => analyze_kit(&option.name).units_per_kit,
    }
}

/// Kit composition for `option`, reconciling the explicit catalog fields
/// with the name.
///
/// When the name carries no per-unit size but the catalog gives a total
/// capacity, the per-unit size is the total split across the units.
pub fn kit_info(option: &ComponentOption) -> KitInfo {
    let parsed = analyze_kit(&option.name);
    let units = units_per_kit(option);

    let unit_capacity = if !parsed.unit_capacity.is_zero() {
        parsed.unit_capacity
    } else {
        option
            .capacity_gb
            .filter(|c| c.is_sign_positive())
            .map(|c| c / Decimal::from(units))
            .unwrap_or_default()
    };

    KitInfo {
        units_per_kit: units,
        unit_capacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_analyze_kit_reference_names() {
        assert_eq!(
            analyze_kit("2x8Gb DDR4"),
            KitInfo {
                units_per_kit: 2,
                unit_capacity: dec!(8)
            }
        );
        assert_eq!(
            analyze_kit("16Gb DDR4"),
            KitInfo {
                units_per_kit: 1,
                unit_capacity: dec!(16)
            }
        );
        assert_eq!(analyze_kit("Generic RAM"), KitInfo::UNKNOWN);
    }

    #[test]
    fn test_analyze_kit_variants() {
        let cases = [
            ("Kingston FURY Beast 4x16GB DDR5", 4, dec!(16)),
            ("Corsair Vengeance 2 x 32 GB", 2, dec!(32)),
            ("Память 2х8Гб DDR4", 2, dec!(8)),
            ("G.Skill 2×16G", 2, dec!(16)),
            ("Crucial 8 Gb SO-DIMM", 1, dec!(8)),
            ("Samsung NVMe 512GB", 1, dec!(512)),
            ("Optane 1,5Gb cache", 1, dec!(1.5)),
            ("Patriot Viper DDR4 Gaming 8Gb", 1, dec!(8)),
            ("Kingston 2x16Gb DDR5 Gaming", 2, dec!(16)),
        ];
        for (name, units, capacity) in cases {
            let info = analyze_kit(name);
            assert_eq!(info.units_per_kit, units, "{name}");
            assert_eq!(info.unit_capacity, capacity, "{name}");
        }
    }

    #[test]
    fn test_words_starting_with_g_are_not_units() {
        assert_eq!(analyze_kit("Samsung 980 Gen4 NVMe"), KitInfo::UNKNOWN);
        assert_eq!(analyze_kit("ADATA DDR4 Gamer"), KitInfo::UNKNOWN);
    }

    #[test]
    fn test_frequency_is_not_capacity() {
        let info = analyze_kit("DDR5 6000MHz 32Gb");
        assert_eq!(info.units_per_kit, 1);
        assert_eq!(info.unit_capacity, dec!(32));
    }

    #[test]
    fn test_explicit_modules_in_kit_wins() {
        let mut option = ComponentOption::new("Kit 2x8Gb", dec!(4000));
        assert_eq!(units_per_kit(&option), 2);

        option.modules_in_kit = Some(4);
        assert_eq!(units_per_kit(&option), 4);

        // zero is treated as "not filled in"
        option.modules_in_kit = Some(0);
        assert_eq!(units_per_kit(&option), 2);
    }

    #[test]
    fn test_kit_info_uses_catalog_capacity() {
        let mut option = ComponentOption::new("Kingston ValueRAM kit", dec!(5000));
        option.modules_in_kit = Some(2);
        option.capacity_gb = Some(dec!(32));

        let info = kit_info(&option);
        assert_eq!(info.units_per_kit, 2);
        assert_eq!(info.unit_capacity, dec!(16));
        assert_eq!(info.total_capacity(), dec!(32));
    }
}
