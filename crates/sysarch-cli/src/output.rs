//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use serde::Serialize;
use sysarch_domain::{
    Category, ExpertProfile, Function, Goal, Project, Scenario, System, SystemArchitecture, Term,
    WeightLevel, WeightingScale,
};
use sysarch_import::ImportReport;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Characters of an id shown in tables.
const SHORT_ID_LEN: usize = 8;

/// Shorten an id for table display.
///
/// Keeps the tail: UUIDv7 ids lead with a timestamp, so ids created in the
/// same session share their first characters.
pub fn short_id(id: &str) -> String {
    let skip = id.chars().count().saturating_sub(SHORT_ID_LEN);
    id.chars().skip(skip).collect()
}

/// A row type that can be listed in every output format.
pub trait Listing: Serialize {
    /// Table column headers
    fn headers() -> &'static [&'static str];

    /// Table cells, in header order
    fn cells(&self) -> Vec<String>;

    /// Identifier printed in quiet mode
    fn key(&self) -> String;
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a list of rows; `what` names them in the empty-table message.
    pub fn list<T: Listing>(&self, items: &[T], what: &str) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
            OutputFormat::Quiet => Ok(items
                .iter()
                .map(Listing::key)
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if items.is_empty() {
                    return Ok(self.colorize(&format!("No {} found.", what), "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(T::headers().iter().copied());
                for item in items {
                    builder.push_record(item.cells());
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format a single created or updated entity.
    pub fn created<T: Listing>(&self, item: &T, what: &str) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(item)?),
            OutputFormat::Quiet => Ok(item.key()),
            OutputFormat::Table => Ok(self.success(&format!("Created {} {}", what, item.key()))),
        }
    }

    /// Format an import report.
    pub fn import_report(&self, report: &ImportReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let errors: Vec<serde_json::Value> = report
                    .errors
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "kind": e.kind,
                            "row": e.row,
                            "name": e.name,
                            "error": e.error.to_string(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "created": report.created,
                    "errors": errors,
                    "summary": report.summary(),
                }))?)
            }
            OutputFormat::Quiet => Ok(report
                .created
                .iter()
                .map(|c| c.id.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut lines = Vec::new();
                for error in &report.errors {
                    lines.push(self.warning(&format!(
                        "{} row {}: {}",
                        error.kind.singular(),
                        error.row,
                        error.error
                    )));
                }
                if report.is_clean() {
                    lines.push(self.success(&report.summary()));
                } else {
                    lines.push(self.info(&report.summary()));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn join_names(names: impl IntoIterator<Item = String>) -> String {
    names.into_iter().collect::<Vec<_>>().join(", ")
}

impl Listing for Project {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Description"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            short_id(&self.id.to_string()),
            self.name.clone(),
            self.description.clone(),
        ]
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Listing for Goal {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Description", "Terms"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            short_id(&self.id.to_string()),
            self.name.clone(),
            self.description.clone(),
            self.terms.len().to_string(),
        ]
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Listing for Term {
    fn headers() -> &'static [&'static str] {
        &["Term", "Definition"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), self.description.clone()]
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Listing for Scenario {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Parent", "Description"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            short_id(&self.id.to_string()),
            self.name.clone(),
            self.parent
                .map(|p| short_id(&p.to_string()))
                .unwrap_or_default(),
            self.description.clone(),
        ]
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Listing for Category {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Kind", "Parent"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            short_id(&self.id.to_string()),
            self.name.clone(),
            self.kind.as_str().to_string(),
            self.parent
                .map(|p| short_id(&p.to_string()))
                .unwrap_or_default(),
        ]
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Listing for Function {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Description", "Categories"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            short_id(&self.id.to_string()),
            self.name.clone(),
            self.description.clone(),
            self.categories.len().to_string(),
        ]
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Listing for System {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Description", "Categories"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            short_id(&self.id.to_string()),
            self.name.clone(),
            self.description.clone(),
            self.categories.len().to_string(),
        ]
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Listing for WeightingScale {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Levels"]
    }

    fn cells(&self) -> Vec<String> {
        let levels = join_names(
            self.levels_desc()
                .into_iter()
                .map(|l| format!("{} ({})", l.name, l.value)),
        );
        vec![short_id(&self.id.to_string()), self.name.clone(), levels]
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Listing for WeightLevel {
    fn headers() -> &'static [&'static str] {
        &["ID", "Level", "Value"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            short_id(&self.id.to_string()),
            self.name.clone(),
            self.value.to_string(),
        ]
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Listing for SystemArchitecture {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Systems"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            short_id(&self.id.to_string()),
            self.name.clone(),
            self.systems.len().to_string(),
        ]
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Listing for ExpertProfile {
    fn headers() -> &'static [&'static str] {
        &["ID", "Account", "Title", "Phone"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            short_id(&self.id.to_string()),
            self.account.clone(),
            self.title.clone(),
            self.phone.clone(),
        ]
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

/// A relationship with its endpoints resolved to names.
#[derive(Debug, Clone, Serialize)]
pub struct RelationshipRow {
    /// Relationship id
    pub id: String,
    /// Relationship kind
    pub kind: &'static str,
    /// Source name
    pub source: String,
    /// Target function name
    pub target: String,
    /// Scale name
    pub scale: String,
}

impl RelationshipRow {
    /// One-line reading of the edge, e.g. "Radar satisfies Detect Target".
    pub fn summary(&self) -> String {
        let verb = if self.kind.ends_with("satisfies") {
            "satisfies"
        } else {
            "requires"
        };
        format!("{} {} {}", self.source, verb, self.target)
    }
}

impl Listing for RelationshipRow {
    fn headers() -> &'static [&'static str] {
        &["ID", "Kind", "Source", "Target", "Scale"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            short_id(&self.id),
            self.kind.to_string(),
            self.source.clone(),
            self.target.clone(),
            self.scale.clone(),
        ]
    }

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// The latest vote of one expert.
#[derive(Debug, Clone, Serialize)]
pub struct VoteRow {
    /// Vote id
    pub id: String,
    /// Expert account, `None` for anonymous votes
    pub expert: Option<String>,
    /// Selected level name
    pub level: String,
    /// Level value
    pub value: f64,
    /// Confidence
    pub confidence: &'static str,
    /// Timestamp (ms since epoch)
    pub cast_on: u64,
    /// Comments
    pub comments: String,
}

impl Listing for VoteRow {
    fn headers() -> &'static [&'static str] {
        &["Expert", "Level", "Value", "Confidence", "Cast On", "Comments"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.expert.clone().unwrap_or_else(|| "(anonymous)".to_string()),
            self.level.clone(),
            self.value.to_string(),
            self.confidence.to_string(),
            self.cast_on.to_string(),
            self.comments.clone(),
        ]
    }

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// One function's score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRow {
    /// Function id
    pub function: String,
    /// Function name
    pub name: String,
    /// Score, when it could be computed
    pub score: Option<f64>,
    /// Why it could not be computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Listing for ScoreRow {
    fn headers() -> &'static [&'static str] {
        &["ID", "Function", "Score"]
    }

    fn cells(&self) -> Vec<String> {
        let score = match (&self.score, &self.error) {
            (Some(score), _) => format!("{:.3}", score),
            (None, Some(error)) => error.clone(),
            (None, None) => "-".to_string(),
        };
        vec![short_id(&self.function), self.name.clone(), score]
    }

    fn key(&self) -> String {
        self.function.clone()
    }
}

/// Two incompatible satisfiers present in one architecture.
#[derive(Debug, Clone, Serialize)]
pub struct ConflictRow {
    /// First relationship id
    pub first: String,
    /// First satisfier description
    pub first_label: String,
    /// Second relationship id
    pub second: String,
    /// Second satisfier description
    pub second_label: String,
}

impl Listing for ConflictRow {
    fn headers() -> &'static [&'static str] {
        &["First", "Satisfies", "Second", "Satisfies"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            short_id(&self.first),
            self.first_label.clone(),
            short_id(&self.second),
            self.second_label.clone(),
        ]
    }

    fn key(&self) -> String {
        format!("{} {}", self.first, self.second)
    }
}

/// A named entry: presets and workspaces.
#[derive(Debug, Clone, Serialize)]
pub struct NamedRow {
    /// Name
    pub name: String,
    /// Detail column
    pub detail: String,
    /// Whether this entry is the active one
    pub active: bool,
}

impl Listing for NamedRow {
    fn headers() -> &'static [&'static str] {
        &["", "Name", "Detail"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            if self.active { "*" } else { "" }.to_string(),
            self.name.clone(),
            self.detail.clone(),
        ]
    }

    fn key(&self) -> String {
        self.name.clone()
    }
}
