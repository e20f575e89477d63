//! Flat input records, one per row of a tabular source

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use sysarch_domain::CategoryKind;

use crate::ImportError;

/// A function row; categories are referenced by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Function name
    pub name: String,
    /// Explanation
    #[serde(default)]
    pub description: String,
    /// Category names
    #[serde(default)]
    pub categories: Vec<String>,
}

/// A system row; categories are referenced by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemRecord {
    /// System name
    pub name: String,
    /// Explanation
    #[serde(default)]
    pub description: String,
    /// Category names
    #[serde(default)]
    pub categories: Vec<String>,
}

/// A scenario row; the parent is referenced by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    /// Scenario name
    pub name: String,
    /// Explanation
    #[serde(default)]
    pub description: String,
    /// Parent scenario name; empty means none
    #[serde(default)]
    pub parent: Option<String>,
}

/// A category row; the parent is referenced by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    /// Category name
    pub name: String,
    /// Explanation
    #[serde(default)]
    pub description: String,
    /// Entities the category may classify
    #[serde(default = "default_kind")]
    pub kind: CategoryKind,
    /// Parent category name; empty means none
    #[serde(default)]
    pub parent: Option<String>,
}

fn default_kind() -> CategoryKind {
    CategoryKind::Both
}

/// One level of a [`ScaleRecord`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    /// Level name
    pub name: String,
    /// Numeric value
    pub value: f64,
}

/// A weighting scale with its levels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleRecord {
    /// Scale name
    pub name: String,
    /// Explanation
    #[serde(default)]
    pub description: String,
    /// Grading criteria
    #[serde(default)]
    pub criteria: String,
    /// Levels, in any order
    #[serde(default)]
    pub levels: Vec<LevelRecord>,
}

/// Every record kind for one project, as read from a single JSON document
///
/// Rows are imported in dependency order: categories, scales, scenarios,
/// functions, then systems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportBatch {
    /// Category rows
    #[serde(default)]
    pub categories: Vec<CategoryRecord>,
    /// Scale rows
    #[serde(default)]
    pub scales: Vec<ScaleRecord>,
    /// Scenario rows
    #[serde(default)]
    pub scenarios: Vec<ScenarioRecord>,
    /// Function rows
    #[serde(default)]
    pub functions: Vec<FunctionRecord>,
    /// System rows
    #[serde(default)]
    pub systems: Vec<SystemRecord>,
}

impl ImportBatch {
    /// Parse a batch from JSON
    pub fn from_json(json: &str) -> Result<Self, ImportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a batch from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ImportError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Total number of rows across all kinds
    pub fn len(&self) -> usize {
        self.categories.len()
            + self.scales.len()
            + self.scenarios.len()
            + self.functions.len()
            + self.systems.len()
    }

    /// Whether the batch has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Treat blank parent names as absent
pub(crate) fn parent_name(parent: &Option<String>) -> Option<&str> {
    parent
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
}
