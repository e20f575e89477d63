//! Relationship module - typed, scenario-scoped edges between functions and systems
//!
//! The five edge meanings share scale, scenario and notes and differ only in
//! their endpoints, so they are one struct carrying an [`Edge`] sum type.

use crate::ids::{FunctionId, ProjectId, RelationshipId, ScaleId, ScenarioId, SystemId};
use crate::vote::{latest_votes, LatestVotes, Vote};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant of an [`Edge`], used to index the relationship store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Function requires function (AND)
    FunctionRequires,
    /// Function satisfies function (OR)
    FunctionSatisfies,
    /// System requires function (AND)
    SystemRequires,
    /// System satisfies function (OR)
    SystemSatisfies,
    /// A system, while satisfying a function, requires another function (AND)
    SystemSatisfactionRequires,
}

impl RelationshipKind {
    /// Every kind, in declaration order
    pub const ALL: [RelationshipKind; 5] = [
        Self::FunctionRequires,
        Self::FunctionSatisfies,
        Self::SystemRequires,
        Self::SystemSatisfies,
        Self::SystemSatisfactionRequires,
    ];

    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FunctionRequires => "function_requires",
            Self::FunctionSatisfies => "function_satisfies",
            Self::SystemRequires => "system_requires",
            Self::SystemSatisfies => "system_satisfies",
            Self::SystemSatisfactionRequires => "system_satisfaction_requires",
        }
    }

    /// Whether the edge aggregates with AND semantics
    pub fn is_requirement(&self) -> bool {
        matches!(
            self,
            Self::FunctionRequires | Self::SystemRequires | Self::SystemSatisfactionRequires
        )
    }
}

/// A node an edge can start or end at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum NodeRef {
    /// A function
    Function(FunctionId),
    /// A system
    System(SystemId),
    /// A system-satisfies relationship (source of second-order edges)
    Relationship(RelationshipId),
}

/// Endpoints of a relationship, one variant per meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Edge {
    /// `requiring` needs all of its required functions
    FunctionRequires {
        /// Function that requires the other
        requiring: FunctionId,
        /// Function that is required
        required: FunctionId,
    },
    /// `satisfier` is one way of achieving `satisfied`
    FunctionSatisfies {
        /// Function that satisfies the other
        satisfier: FunctionId,
        /// Function that is satisfied
        satisfied: FunctionId,
    },
    /// A system needs a function to be operational
    SystemRequires {
        /// System that requires the function
        requiring: SystemId,
        /// Function that is required
        required: FunctionId,
    },
    /// A system performs a function
    SystemSatisfies {
        /// System that satisfies the function
        satisfier: SystemId,
        /// Function satisfied by the system
        satisfied: FunctionId,
    },
    /// While satisfying through `relationship`, the system also needs `required`
    SystemSatisfactionRequires {
        /// The system-satisfies relationship this hangs off
        relationship: RelationshipId,
        /// Function that is required
        required: FunctionId,
    },
}

impl Edge {
    /// Discriminant of this edge
    pub fn kind(&self) -> RelationshipKind {
        match self {
            Self::FunctionRequires { .. } => RelationshipKind::FunctionRequires,
            Self::FunctionSatisfies { .. } => RelationshipKind::FunctionSatisfies,
            Self::SystemRequires { .. } => RelationshipKind::SystemRequires,
            Self::SystemSatisfies { .. } => RelationshipKind::SystemSatisfies,
            Self::SystemSatisfactionRequires { .. } => {
                RelationshipKind::SystemSatisfactionRequires
            }
        }
    }

    /// Node the edge starts at
    pub fn source(&self) -> NodeRef {
        match *self {
            Self::FunctionRequires { requiring, .. } => NodeRef::Function(requiring),
            Self::FunctionSatisfies { satisfier, .. } => NodeRef::Function(satisfier),
            Self::SystemRequires { requiring, .. } => NodeRef::System(requiring),
            Self::SystemSatisfies { satisfier, .. } => NodeRef::System(satisfier),
            Self::SystemSatisfactionRequires { relationship, .. } => {
                NodeRef::Relationship(relationship)
            }
        }
    }

    /// Function the edge ends at (every edge targets a function)
    pub fn target(&self) -> FunctionId {
        match *self {
            Self::FunctionRequires { required, .. }
            | Self::SystemRequires { required, .. }
            | Self::SystemSatisfactionRequires { required, .. } => required,
            Self::FunctionSatisfies { satisfied, .. } | Self::SystemSatisfies { satisfied, .. } => {
                satisfied
            }
        }
    }

    /// Whether the edge touches a node at either end
    pub fn touches(&self, node: NodeRef) -> bool {
        self.source() == node || NodeRef::Function(self.target()) == node
    }
}

/// Shared shape of every relationship variant
pub trait Assessed {
    /// Scale used to judge the relationship
    fn scale(&self) -> ScaleId;

    /// Context in which the relationship applies, if any
    fn scenario(&self) -> Option<ScenarioId>;

    /// Free-text notes
    fn notes(&self) -> &str;

    /// Identifier used to select this relationship's votes
    fn relationship_id(&self) -> RelationshipId;

    /// Most recent vote per expert among `votes`
    ///
    /// Votes for other relationships are ignored.
    fn latest_votes<'v>(&self, votes: impl IntoIterator<Item = &'v Vote>) -> LatestVotes {
        let id = self.relationship_id();
        latest_votes(votes.into_iter().filter(|v| v.relationship == id))
    }
}

/// A typed edge judged on a weighting scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Unique identifier
    pub id: RelationshipId,
    /// Owning project (the project of its endpoints)
    pub project: ProjectId,
    /// Scale used to assess this relationship
    pub scale: ScaleId,
    /// Context in which it applies
    pub scenario: Option<ScenarioId>,
    /// Comments on the relationship
    pub notes: String,
    /// Endpoints
    pub edge: Edge,
}

impl Relationship {
    /// Discriminant of the edge
    pub fn kind(&self) -> RelationshipKind {
        self.edge.kind()
    }

    /// `(requiring, required)` if this is a function-requires edge
    pub fn as_function_requires(&self) -> Option<(FunctionId, FunctionId)> {
        match self.edge {
            Edge::FunctionRequires { requiring, required } => Some((requiring, required)),
            _ => None,
        }
    }

    /// `(satisfier, satisfied)` if this is a function-satisfies edge
    pub fn as_function_satisfies(&self) -> Option<(FunctionId, FunctionId)> {
        match self.edge {
            Edge::FunctionSatisfies { satisfier, satisfied } => Some((satisfier, satisfied)),
            _ => None,
        }
    }

    /// `(requiring, required)` if this is a system-requires edge
    pub fn as_system_requires(&self) -> Option<(SystemId, FunctionId)> {
        match self.edge {
            Edge::SystemRequires { requiring, required } => Some((requiring, required)),
            _ => None,
        }
    }

    /// `(satisfier, satisfied)` if this is a system-satisfies edge
    pub fn as_system_satisfies(&self) -> Option<(SystemId, FunctionId)> {
        match self.edge {
            Edge::SystemSatisfies { satisfier, satisfied } => Some((satisfier, satisfied)),
            _ => None,
        }
    }

    /// `(relationship, required)` if this is a satisfaction-requires edge
    pub fn as_satisfaction_requires(&self) -> Option<(RelationshipId, FunctionId)> {
        match self.edge {
            Edge::SystemSatisfactionRequires { relationship, required } => {
                Some((relationship, required))
            }
            _ => None,
        }
    }
}

impl Assessed for Relationship {
    fn scale(&self) -> ScaleId {
        self.scale
    }

    fn scenario(&self) -> Option<ScenarioId> {
        self.scenario
    }

    fn notes(&self) -> &str {
        &self.notes
    }

    fn relationship_id(&self) -> RelationshipId {
        self.id
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match self.edge.source() {
            NodeRef::Function(id) => format!("function {}", id),
            NodeRef::System(id) => format!("system {}", id),
            NodeRef::Relationship(id) => format!("satisfaction {}", id),
        };
        let verb = match self.kind() {
            RelationshipKind::FunctionSatisfies | RelationshipKind::SystemSatisfies => "satisfies",
            _ => "requires",
        };
        write!(f, "{} {} function {}", source, verb, self.edge.target())
    }
}

/// Request to create a relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRelationship {
    /// Scale used to judge it
    pub scale: ScaleId,
    /// Optional scenario scope
    #[serde(default)]
    pub scenario: Option<ScenarioId>,
    /// Free-text notes
    #[serde(default)]
    pub notes: String,
    /// Endpoints
    pub edge: Edge,
}

impl NewRelationship {
    /// An unscoped relationship with no notes
    pub fn new(scale: ScaleId, edge: Edge) -> Self {
        Self {
            scale,
            scenario: None,
            notes: String::new(),
            edge,
        }
    }

    /// Scope the relationship to a scenario
    pub fn in_scenario(mut self, scenario: ScenarioId) -> Self {
        self.scenario = Some(scenario);
        self
    }

    /// Attach notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Canonical unordered pair of system-satisfies relationships
///
/// `(a, b)` and `(b, a)` produce the same pair, so incompatibility lookups
/// are symmetric regardless of insertion direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IncompatiblePair(RelationshipId, RelationshipId);

impl IncompatiblePair {
    /// Build the canonical pair; `None` when both sides are the same edge
    pub fn new(a: RelationshipId, b: RelationshipId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self(a, b)),
            std::cmp::Ordering::Greater => Some(Self(b, a)),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Smaller id
    pub fn first(&self) -> RelationshipId {
        self.0
    }

    /// Larger id
    pub fn second(&self) -> RelationshipId {
        self.1
    }

    /// The other side of the pair, if `id` is one of its sides
    pub fn other(&self, id: RelationshipId) -> Option<RelationshipId> {
        if self.0 == id {
            Some(self.1)
        } else if self.1 == id {
            Some(self.0)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_endpoints() {
        let radar = SystemId::from_value(1);
        let track = FunctionId::from_value(2);
        let edge = Edge::SystemSatisfies {
            satisfier: radar,
            satisfied: track,
        };

        assert_eq!(edge.kind(), RelationshipKind::SystemSatisfies);
        assert_eq!(edge.source(), NodeRef::System(radar));
        assert_eq!(edge.target(), track);
        assert!(edge.touches(NodeRef::Function(track)));
        assert!(!edge.touches(NodeRef::Function(FunctionId::from_value(3))));
    }

    #[test]
    fn test_second_order_edge_source() {
        let sat = RelationshipId::from_value(7);
        let illuminate = FunctionId::from_value(8);
        let edge = Edge::SystemSatisfactionRequires {
            relationship: sat,
            required: illuminate,
        };
        assert_eq!(edge.source(), NodeRef::Relationship(sat));
        assert!(edge.kind().is_requirement());
    }

    #[test]
    fn test_variant_accessors() {
        let rel = Relationship {
            id: RelationshipId::new(),
            project: ProjectId::new(),
            scale: ScaleId::new(),
            scenario: None,
            notes: "AND".into(),
            edge: Edge::FunctionRequires {
                requiring: FunctionId::from_value(1),
                required: FunctionId::from_value(2),
            },
        };
        assert!(rel.as_function_requires().is_some());
        assert!(rel.as_system_satisfies().is_none());
        assert_eq!(rel.notes(), "AND");
    }

    #[test]
    fn test_incompatible_pair_is_canonical() {
        let a = RelationshipId::from_value(10);
        let b = RelationshipId::from_value(20);

        assert_eq!(IncompatiblePair::new(a, b), IncompatiblePair::new(b, a));
        assert!(IncompatiblePair::new(a, a).is_none());

        let pair = IncompatiblePair::new(b, a).unwrap();
        assert_eq!(pair.first(), a);
        assert_eq!(pair.other(a), Some(b));
        assert_eq!(pair.other(RelationshipId::from_value(30)), None);
    }

    #[test]
    fn test_edge_serde_tagging() {
        let edge = Edge::FunctionSatisfies {
            satisfier: FunctionId::from_value(1),
            satisfied: FunctionId::from_value(2),
        };
        let json = serde_json::to_string(&edge).unwrap();
        assert!(json.contains("\"kind\":\"function_satisfies\""));
    }
}
