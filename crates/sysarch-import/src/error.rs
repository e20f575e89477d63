//! Error types for bulk import

use sysarch_domain::ModelError;
use thiserror::Error;

/// Errors that abort a whole import batch
///
/// Row-level problems do not appear here; they are collected in the
/// [`ImportReport`](crate::ImportReport) unless fail-fast is configured.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The store failed for a reason unrelated to the row being imported
    #[error("Store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Fail-fast import stopped at the first bad row
    #[error("Import aborted at row {row} ('{name}'): {source}")]
    Aborted {
        /// Zero-based row index
        row: usize,
        /// Name of the offending row
        name: String,
        /// What went wrong
        source: ModelError,
    },

    /// Batch file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Batch file is not valid JSON for the expected records
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}
