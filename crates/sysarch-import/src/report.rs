//! Outcome of an import run

use serde::Serialize;
use sysarch_domain::ModelError;

/// Kind of record a report row refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Category rows
    Category,
    /// Scale rows
    Scale,
    /// Scenario rows
    Scenario,
    /// Function rows
    Function,
    /// System rows
    System,
}

impl RecordKind {
    /// Every kind, in import order
    pub const ALL: [RecordKind; 5] = [
        Self::Category,
        Self::Scale,
        Self::Scenario,
        Self::Function,
        Self::System,
    ];

    /// Singular display name
    pub fn singular(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Scale => "scale",
            Self::Scenario => "scenario",
            Self::Function => "function",
            Self::System => "system",
        }
    }

    /// Plural display name
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::Scale => "scales",
            Self::Scenario => "scenarios",
            Self::Function => "functions",
            Self::System => "systems",
        }
    }
}

/// A row that produced an entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedRow {
    /// Record kind
    pub kind: RecordKind,
    /// Zero-based row index within its kind
    pub row: usize,
    /// Name of the created entity
    pub name: String,
    /// Identifier of the created entity
    pub id: String,
}

/// A row that was rejected or only partly applied
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// Record kind
    pub kind: RecordKind,
    /// Zero-based row index within its kind
    pub row: usize,
    /// Name given by the row
    pub name: String,
    /// What went wrong
    pub error: ModelError,
}

/// Created ids and per-row errors of an import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Rows that produced entities, in import order
    pub created: Vec<CreatedRow>,
    /// Row errors, in import order
    pub errors: Vec<RowError>,
}

impl ImportReport {
    /// Whether every row was applied without error
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of entities created of a kind
    pub fn created_count(&self, kind: RecordKind) -> usize {
        self.created.iter().filter(|c| c.kind == kind).count()
    }

    /// Append another report's rows
    pub fn merge(&mut self, other: ImportReport) {
        self.created.extend(other.created);
        self.errors.extend(other.errors);
    }

    pub(crate) fn push_created(
        &mut self,
        kind: RecordKind,
        row: usize,
        name: &str,
        id: impl ToString,
    ) {
        self.created.push(CreatedRow {
            kind,
            row,
            name: name.to_string(),
            id: id.to_string(),
        });
    }

    /// One-line summary, e.g. "Created 2 scenarios, 1 function; 1 row error"
    pub fn summary(&self) -> String {
        let parts: Vec<String> = RecordKind::ALL
            .iter()
            .filter_map(|kind| {
                let count = self.created_count(*kind);
                (count > 0).then(|| {
                    let noun = if count == 1 { kind.singular() } else { kind.plural() };
                    format!("{} {}", count, noun)
                })
            })
            .collect();

        let created = if parts.is_empty() {
            "Nothing created".to_string()
        } else {
            format!("Created {}", parts.join(", "))
        };

        match self.errors.len() {
            0 => created,
            1 => format!("{}; 1 row error", created),
            n => format!("{}; {} row errors", created, n),
        }
    }
}
