//! Project aggregate and the nodes of the requirement/satisfaction graph

use crate::error::{require_name, ModelError, ModelResult};
use crate::ids::{
    ArchitectureId, CategoryId, FunctionId, GoalId, ProjectId, ScenarioId, SystemId, TermId,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest name shown in full by `Display` impls
const DISPLAY_NAME_LEN: usize = 32;

fn display_name(name: &str) -> String {
    if name.chars().count() > DISPLAY_NAME_LEN {
        let short: String = name.chars().take(DISPLAY_NAME_LEN).collect();
        format!("{}...", short)
    } else {
        name.to_string()
    }
}

/// Root aggregate: owns functions, systems, scenarios, categories and scales
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: ProjectId,
    /// Project name
    pub name: String,
    /// Explanation of the project
    pub description: String,
}

impl Project {
    /// Create a project
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> ModelResult<Self> {
        let name = name.into();
        require_name("Project", &name)?;
        Ok(Self {
            id: ProjectId::new(),
            name,
            description: description.into(),
        })
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Project: '{}'>", display_name(&self.name))
    }
}

/// An objective of the project, stated as a narrative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Unique identifier
    pub id: GoalId,
    /// Owning project
    pub project: ProjectId,
    /// Goal name
    pub name: String,
    /// Short explanation
    pub description: String,
    /// Narrative describing the goal in tangible terms
    pub body: String,
    /// Glossary terms that clarify the narrative
    pub terms: Vec<TermId>,
}

/// A glossary entry for domain-specific vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Unique identifier
    pub id: TermId,
    /// Owning project
    pub project: ProjectId,
    /// The term
    pub name: String,
    /// Its definition
    pub description: String,
}

/// A named operating context used to scope relationships
///
/// Scenarios form a tree through `parent`. Nothing prevents a parent chain
/// from looping; walkers must guard against revisits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique identifier
    pub id: ScenarioId,
    /// Owning project
    pub project: ProjectId,
    /// Scenario name
    pub name: String,
    /// Explanation
    pub description: String,
    /// Broader, more encompassing scenario
    pub parent: Option<ScenarioId>,
}

/// Which entities a category may classify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    /// Functions only
    Functions,
    /// Systems only
    Systems,
    /// Functions and systems
    Both,
}

impl CategoryKind {
    /// Whether functions may carry this category
    pub fn admits_functions(&self) -> bool {
        matches!(self, Self::Functions | Self::Both)
    }

    /// Whether systems may carry this category
    pub fn admits_systems(&self) -> bool {
        matches!(self, Self::Systems | Self::Both)
    }

    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Functions => "functions",
            Self::Systems => "systems",
            Self::Both => "both",
        }
    }
}

impl std::str::FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "functions" | "function" | "0" => Ok(Self::Functions),
            "systems" | "system" | "1" => Ok(Self::Systems),
            "both" | "2" => Ok(Self::Both),
            _ => Err(format!("Invalid category kind: {}", s)),
        }
    }
}

/// A classification tag for functions and/or systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,
    /// Owning project
    pub project: ProjectId,
    /// Category name
    pub name: String,
    /// Explanation
    pub description: String,
    /// Super-category
    pub parent: Option<CategoryId>,
    /// Entities this category may classify
    pub kind: CategoryKind,
}

/// A thing that can or must be done
///
/// Requirement and satisfaction edges are not stored here; they are derived
/// views over the relationship store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    /// Unique identifier
    pub id: FunctionId,
    /// Owning project
    pub project: ProjectId,
    /// Function name (not unique within a project)
    pub name: String,
    /// Explanation
    pub description: String,
    /// Categories classifying this function
    pub categories: Vec<CategoryId>,
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Function: '{}'>", display_name(&self.name))
    }
}

/// An entity that can perform functions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    /// Unique identifier
    pub id: SystemId,
    /// Owning project
    pub project: ProjectId,
    /// System name (not unique within a project)
    pub name: String,
    /// Explanation
    pub description: String,
    /// Categories classifying this system
    pub categories: Vec<CategoryId>,
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<System: '{}'>", display_name(&self.name))
    }
}

/// A named subset of a project's systems that can be functionally assessed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemArchitecture {
    /// Unique identifier
    pub id: ArchitectureId,
    /// Owning project
    pub project: ProjectId,
    /// Architecture name
    pub name: String,
    /// Explanation
    pub description: String,
    /// Systems included in this architecture
    pub systems: Vec<SystemId>,
}

impl SystemArchitecture {
    /// Whether the architecture includes a system
    pub fn contains(&self, system: SystemId) -> bool {
        self.systems.contains(&system)
    }
}

/// Common attributes for named entities created through a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedAttrs {
    /// Entity name
    pub name: String,
    /// Explanation
    #[serde(default)]
    pub description: String,
}

impl NamedAttrs {
    /// Attributes with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Attributes for a function or system
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeAttrs {
    /// Entity name
    pub name: String,
    /// Explanation
    #[serde(default)]
    pub description: String,
    /// Categories to assign
    #[serde(default)]
    pub categories: Vec<CategoryId>,
}

impl NodeAttrs {
    /// Attributes with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Attributes for a goal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalAttrs {
    /// Goal name
    pub name: String,
    /// Short explanation
    #[serde(default)]
    pub description: String,
    /// Narrative
    #[serde(default)]
    pub body: String,
    /// Glossary terms
    #[serde(default)]
    pub terms: Vec<TermId>,
}

/// Attributes for a scenario
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioAttrs {
    /// Scenario name
    pub name: String,
    /// Explanation
    #[serde(default)]
    pub description: String,
    /// Broader scenario
    #[serde(default)]
    pub parent: Option<ScenarioId>,
}

/// Attributes for a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryAttrs {
    /// Category name
    pub name: String,
    /// Explanation
    #[serde(default)]
    pub description: String,
    /// Super-category
    #[serde(default)]
    pub parent: Option<CategoryId>,
    /// Entities this category may classify
    pub kind: CategoryKind,
}

/// Check that every category may classify the given entity kind
///
/// `lookup` resolves a category id to the category, or `None` if dangling.
pub fn check_categories<'a, F>(
    entity: &str,
    project: ProjectId,
    categories: &[CategoryId],
    lookup: F,
) -> ModelResult<()>
where
    F: Fn(CategoryId) -> Option<&'a Category>,
{
    for id in categories {
        let category = lookup(*id).ok_or_else(|| ModelError::not_found("category", id))?;
        if category.project != project {
            return Err(ModelError::Validation(format!(
                "Category '{}' belongs to another project",
                category.name
            )));
        }
        let admitted = match entity {
            "Function" => category.kind.admits_functions(),
            _ => category.kind.admits_systems(),
        };
        if !admitted {
            return Err(ModelError::Validation(format!(
                "Category '{}' ({}) cannot classify a {}",
                category.name,
                category.kind.as_str(),
                entity.to_lowercase()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_requires_name() {
        assert!(Project::new("", "").is_err());
        assert!(Project::new("Naval Example", "").is_ok());
    }

    #[test]
    fn test_display_truncates_long_names() {
        let project = Project::new("A".repeat(40), "").unwrap();
        assert_eq!(project.to_string(), format!("<Project: '{}...'>", "A".repeat(32)));

        let short = Project::new("Toast", "").unwrap();
        assert_eq!(short.to_string(), "<Project: 'Toast'>");
    }

    #[test]
    fn test_category_kind_admission() {
        assert!(CategoryKind::Functions.admits_functions());
        assert!(!CategoryKind::Functions.admits_systems());
        assert!(CategoryKind::Both.admits_systems());
        assert_eq!("Systems".parse::<CategoryKind>(), Ok(CategoryKind::Systems));
        assert!("widgets".parse::<CategoryKind>().is_err());
    }

    #[test]
    fn test_check_categories_rejects_wrong_kind() {
        let project = ProjectId::new();
        let sensors = Category {
            id: CategoryId::new(),
            project,
            name: "Sensors".into(),
            description: String::new(),
            parent: None,
            kind: CategoryKind::Systems,
        };
        let lookup = |id: CategoryId| (id == sensors.id).then_some(&sensors);

        assert!(check_categories("System", project, &[sensors.id], lookup).is_ok());
        assert!(matches!(
            check_categories("Function", project, &[sensors.id], lookup),
            Err(ModelError::Validation(_))
        ));
        assert!(matches!(
            check_categories("Function", project, &[CategoryId::new()], lookup),
            Err(ModelError::NotFound { .. })
        ));
    }
}
