//! System Architect Bulk Import
//!
//! Loads flat records (functions, systems, scenarios, categories, scales)
//! into a project, resolving hierarchical parents by name.
//!
//! # Error policy
//!
//! A bad row never aborts the batch. Each row error (an unresolved parent
//! name, an unknown category, a validation failure) is logged, collected in
//! the [`ImportReport`], and the remaining rows proceed. Only store failures
//! unrelated to the row, or [`ImportConfig::fail_fast`], stop an import.
//!
//! # Example Usage
//!
//! ```
//! use sysarch_domain::{ModelRead, ModelStore, NamedAttrs};
//! use sysarch_import::{ImportBatch, ImportConfig, Importer};
//! use sysarch_store::MemoryStore;
//!
//! let mut store = MemoryStore::new();
//! let project = store.create_project(NamedAttrs::named("Naval Example")).unwrap();
//!
//! let batch = ImportBatch::from_json(
//!     r#"{"scenarios": [{"name": "Open Ocean"}, {"name": "Storm", "parent": "Open Ocean"}]}"#,
//! )
//! .unwrap();
//!
//! let report = Importer::new(&mut store, project.id, ImportConfig::default())
//!     .import_batch(&batch)
//!     .unwrap();
//! assert!(report.is_clean());
//! assert_eq!(store.scenarios(project.id).len(), 2);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod importer;
pub mod records;
pub mod report;

pub use config::ImportConfig;
pub use error::ImportError;
pub use importer::Importer;
pub use records::{
    CategoryRecord, FunctionRecord, ImportBatch, LevelRecord, ScaleRecord, ScenarioRecord,
    SystemRecord,
};
pub use report::{CreatedRow, ImportReport, RecordKind, RowError};
