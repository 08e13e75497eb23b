use thiserror::Error;

use crate::Category;

/// Conditions reported by selection-changing operations.
///
/// None of these abort the whole build: the operation that produced one is
/// rejected and the caller keeps its previous selection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("{category}: {requested} units requested, ceiling is {ceiling}")]
    CapacityExceeded {
        category: Category,
        ceiling: u32,
        requested: u32,
    },

    #[error("{category} incompatible: {reason}")]
    CompatibilityConflict { category: Category, reason: String },

    #[error("Invalid kit count: {requested}")]
    InvalidQuantity { requested: i64 },

    #[error("Unknown {category} option: {name}")]
    UnknownOption { category: Category, name: String },

    #[error("{category} unavailable: {reason}")]
    CategoryUnavailable { category: Category, reason: String },

    #[error("{0} does not take multiple kits")]
    NotMultiSelect(Category),

    #[error("{0} takes kits, not a single choice")]
    NotSingleSelect(Category),
}

impl BuildError {
    pub(crate) fn conflict(category: Category, reason: impl Into<String>) -> Self {
        BuildError::CompatibilityConflict {
            category,
            reason: reason.into(),
        }
    }
}
