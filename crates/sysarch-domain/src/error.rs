//! Domain error types

use crate::ids::{FunctionId, LevelId, ScaleId};
use thiserror::Error;

/// Errors raised by model validation, lookups and scoring
///
/// `Clone + PartialEq` so per-function scoring outcomes can be compared
/// across runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Bad or missing required field
    #[error("Validation error: {0}")]
    Validation(String),

    /// A vote selected a level from a scale other than the relationship's
    #[error("Scale mismatch: level {level} does not belong to scale {scale}")]
    ScaleMismatch {
        /// Scale the relationship is judged on
        scale: ScaleId,
        /// Level the vote tried to select
        level: LevelId,
    },

    /// Dangling reference
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind
        entity: &'static str,
        /// Identifier or name that failed to resolve
        id: String,
    },

    /// A requirement chain loops back on itself
    #[error("Cyclic requirement detected at function {function}")]
    CyclicRequirement {
        /// Function that was revisited
        function: FunctionId,
        /// Functions on the evaluation path when the revisit happened
        path: Vec<FunctionId>,
    },

    /// min/max requested on a scale with no levels
    #[error("Scale {0} has no levels")]
    EmptyScale(ScaleId),

    /// Bulk import could not resolve a parent by name
    #[error("Row {row} ('{name}'): could not find parent '{parent}'")]
    UnresolvedParent {
        /// Zero-based row index within the batch
        row: usize,
        /// Name of the row being imported
        name: String,
        /// Parent name that did not resolve
        parent: String,
    },
}

impl ModelError {
    /// Shorthand for a [`ModelError::NotFound`]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Whether this error rejects a single create/update for bad input
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::ScaleMismatch { .. })
    }
}

/// Result alias for domain operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Reject empty or whitespace-only names
pub fn require_name(entity: &str, name: &str) -> ModelResult<()> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation(format!("{} name is required", entity)));
    }
    Ok(())
}
