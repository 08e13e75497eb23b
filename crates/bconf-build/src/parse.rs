//! Name parsing helpers.
//!
//! Catalog rows carry most of their meaning in free-form display names, so
//! the filter and the build-name pipeline both lean on these. Each helper is
//! a pure function over a single name; when a helper tries several patterns
//! the first one that matches wins.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

static SODIMM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)so[-\s]?dimm").unwrap());

static CHIPSET: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]\d{3,4}").unwrap());

static MEMORY_GENERATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:LP)?DDR(\d)").unwrap());

static PROCESSOR_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:processor|процессор)\b").unwrap());

static AMD_GRAPHICS_TAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s(?:with\b|с\s+видео)").unwrap());

static TRADEMARKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[®™]|\((?:r|tm)\)").unwrap());

static GPU_MODEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:GeForce|Radeon|Quadro)(?:\s+(?:RTX|GTX|GT|RX|Pro|VII))?\s+[A-Z]?\d{2,4}[A-Z]?\b(?:\s+(?:Ti|Super|XTX|XT|GRE)\b)*",
    )
    .unwrap()
});

static WATTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d{3,4})\s*(?:W|Вт)\b").unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

const MOTHERBOARD_MARKERS: [&str; 3] = ["материнская плата", "motherboard", "mainboard"];
const PSU_PREFIXES: [&str; 3] = ["блок питания", "psu", "power supply"];
const MOTHERBOARD_PREFIX: &str = "материнская плата";

/// Small-outline (laptop/mini-PC) memory marker
pub fn is_sodimm(name: &str) -> bool {
    SODIMM.is_match(name)
}

pub fn form_factor_label(sodimm: bool) -> &'static str {
    if sodimm { "SO-DIMM" } else { "DIMM" }
}

/// Guard against rows miscategorized into the motherboard list
pub fn looks_like_motherboard(name: &str) -> bool {
    let lower = name.to_lowercase();
    MOTHERBOARD_MARKERS.iter().any(|m| lower.contains(m))
}

/// Guard against rows miscategorized into the PSU list
pub fn looks_like_psu(name: &str) -> bool {
    let lower = name.trim_start().to_lowercase();
    PSU_PREFIXES.iter().any(|p| lower.starts_with(p))
}

pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Processor label without marketing noise.
///
/// AMD names lose their integrated-graphics tail, Intel names lose their
/// trademark symbols; both lose the word "Processor". Anything else is
/// returned as-is.
pub fn cpu_label(name: &str) -> String {
    let lower = name.to_lowercase();
    if lower.contains("amd") {
        let head = match AMD_GRAPHICS_TAIL.find(name) {
            Some(m) => &name[..m.start()],
            None => name,
        };
        collapse_whitespace(&PROCESSOR_WORD.replace_all(head, " "))
    } else if lower.contains("intel") {
        let stripped = TRADEMARKS.replace_all(name, " ");
        collapse_whitespace(&PROCESSOR_WORD.replace_all(&stripped, " "))
    } else {
        name.to_string()
    }
}

/// Chipset token such as `B660` or `X570`
pub fn chipset_token(name: &str) -> Option<&str> {
    CHIPSET.find(name).map(|m| m.as_str())
}

/// First two words of a board name once the category prefix is gone
pub fn motherboard_fallback_label(name: &str) -> String {
    let trimmed = name.trim();
    let rest = match trimmed.get(..MOTHERBOARD_PREFIX.len()) {
        Some(head) if head.to_lowercase() == MOTHERBOARD_PREFIX => &trimmed[head.len()..],
        _ => trimmed,
    };
    rest.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}

/// Memory generation token (`DDR4`, `DDR5`, ...) found in a name or type field
pub fn memory_generation(text: &str) -> Option<String> {
    MEMORY_GENERATION
        .captures(text)
        .map(|caps| format!("DDR{}", &caps[1]))
}

/// Brand/model token such as `GeForce RTX 4060 Ti`
pub fn gpu_model_token(name: &str) -> Option<String> {
    GPU_MODEL.find(name).map(|m| collapse_whitespace(m.as_str()))
}

/// First few words of a raw name, used when nothing better is recognizable
pub fn truncated_label(name: &str, words: usize) -> String {
    name.split_whitespace()
        .take(words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Wattage written into a name, e.g. `650W` or `500 Вт`
pub fn watts_in_name(name: &str) -> Option<Decimal> {
    WATTS
        .captures(name)
        .and_then(|caps| caps[1].parse::<Decimal>().ok())
}

/// Render a decimal without trailing zeros (`8.0` → `8`)
pub fn format_number(value: Decimal) -> String {
    value.normalize().to_string()
}
