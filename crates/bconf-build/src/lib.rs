//! Component selection and compatibility engine for PC builds.
//!
//! The catalog is a read-only value handed in by the caller. Every operation
//! here is a pure function over `(&Catalog, &Selection)`: listings come back
//! filtered and sorted, edits come back as a new [`Selection`] or a
//! [`BuildError`] explaining why the edit was refused.
//!
//! * [`filter_options`] – which options of a category still fit the build.
//! * [`select`], [`add_kit`], [`set_kit_count`] – edits with their
//!   compatibility and capacity checks.
//! * [`summarize`] – line items, grand total and the canonical build name.

pub mod catalog;
pub mod error;
pub mod export;
pub mod filter;
pub mod kit;
pub mod naming;
pub mod parse;
pub mod preset;
pub mod quantity;
pub mod selection;
pub mod summary;
#[cfg(feature = "table")]
mod summary_table;

pub use catalog::{Catalog, Category, ComponentOption};
pub use error::BuildError;
pub use export::{export_string, write_export};
pub use filter::{SortKey, filter_options};
pub use kit::{KitInfo, analyze_kit};
pub use naming::{NamingOptions, build_name};
pub use preset::{Preset, parse_presets};
pub use quantity::{add_kit, can_add, category_subtotal, set_kit_count, total_units, unit_ceiling};
pub use selection::{KitLine, Selection, deselect, select};
pub use summary::{BuildSummary, LineItem, summarize};
#[cfg(feature = "table")]
pub use summary_table::write_options_table;
