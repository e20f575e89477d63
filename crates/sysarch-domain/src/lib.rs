//! System Architect Domain Layer
//!
//! This crate contains the core model for collaborative requirements and
//! architecture assessment. It defines the fundamental concepts, value
//! objects, scoring rules and the trait interfaces storage layers implement.
//!
//! ## Key Concepts
//!
//! - **Function**: something a system must do
//! - **System**: an entity that performs functions
//! - **Relationship**: a typed, scenario-scoped edge judged on a weighting scale
//! - **Vote**: one expert's timestamped judgment of a relationship
//! - **Shortfall**: the worst unmet requirement of a function
//!
//! ## Architecture
//!
//! - Entities reference each other by typed ids, never by embedded objects
//! - Relationship adjacency is derived from an edge store, not stored on nodes
//! - Storage implementations live in other crates (sysarch-store)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ids;
pub mod project;
pub mod relationship;
pub mod scale;
pub mod scoring;
pub mod traits;
pub mod vote;

// Re-exports for convenience
pub use error::{ModelError, ModelResult};
pub use ids::{
    ArchitectureId, CategoryId, ExpertId, FunctionId, GoalId, LevelId, OrganizationId, ProjectId,
    RelationshipId, ScaleId, ScenarioId, SystemId, TermId, VoteId,
};
pub use project::{
    Category, CategoryAttrs, CategoryKind, Function, Goal, GoalAttrs, NamedAttrs, NodeAttrs,
    Project, Scenario, ScenarioAttrs, System, SystemArchitecture, Term,
};
pub use relationship::{
    Assessed, Edge, IncompatiblePair, NewRelationship, NodeRef, Relationship, RelationshipKind,
};
pub use scale::{ScaleAttrs, WeightLevel, WeightingScale};
pub use scoring::{FunctionalSatisfaction, Scorer, ScoringConfig, VoteWeighting, WeightingMode};
pub use traits::{ModelRead, ModelStore};
pub use vote::{Confidence, ExpertProfile, LatestVotes, NewVote, Organization, Vote};
