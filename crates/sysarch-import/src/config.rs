//! Import configuration

use serde::{Deserialize, Serialize};

/// Configuration for bulk imports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Resolve parent and category names against entities already in the
    /// project when the batch itself has no match
    #[serde(default = "default_resolve_existing")]
    pub resolve_existing: bool,

    /// Stop at the first row error instead of reporting and continuing
    #[serde(default)]
    pub fail_fast: bool,
}

fn default_resolve_existing() -> bool {
    true
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            resolve_existing: default_resolve_existing(),
            fail_fast: false,
        }
    }
}

impl ImportConfig {
    /// Resolve names only against rows of the same batch
    pub fn batch_only() -> Self {
        Self {
            resolve_existing: false,
            ..Self::default()
        }
    }

    /// Abort on the first bad row
    pub fn strict() -> Self {
        Self {
            fail_fast: true,
            ..Self::default()
        }
    }
}
