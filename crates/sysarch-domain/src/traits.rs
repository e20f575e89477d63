//! Trait definitions for storage collaborators
//!
//! These traits define the boundary between the domain and whatever keeps
//! the model. Implementations live in other crates (sysarch-store).

use crate::error::ModelError;
use crate::ids::{
    ArchitectureId, CategoryId, ExpertId, FunctionId, GoalId, LevelId, OrganizationId, ProjectId,
    RelationshipId, ScaleId, ScenarioId, SystemId, TermId, VoteId,
};
use crate::project::{
    Category, CategoryAttrs, Function, Goal, GoalAttrs, NamedAttrs, NodeAttrs, Project, Scenario,
    ScenarioAttrs, System, SystemArchitecture, Term,
};
use crate::relationship::{NewRelationship, NodeRef, Relationship, RelationshipKind};
use crate::scale::{ScaleAttrs, WeightLevel, WeightingScale};
use crate::vote::{latest_votes, ExpertProfile, LatestVotes, NewVote, Organization, Vote};

/// Read access to a project model
///
/// Reads return owned values so implementations are free to materialize
/// rows on demand. Scoring only needs this trait.
pub trait ModelRead {
    /// Get a project by ID
    fn project(&self, id: ProjectId) -> Option<Project>;

    /// All projects
    fn projects(&self) -> Vec<Project>;

    /// Get a goal by ID
    fn goal(&self, id: GoalId) -> Option<Goal>;

    /// Goals of a project
    fn goals(&self, project: ProjectId) -> Vec<Goal>;

    /// Glossary of a project
    fn glossary(&self, project: ProjectId) -> Vec<Term>;

    /// Get a scenario by ID
    fn scenario(&self, id: ScenarioId) -> Option<Scenario>;

    /// Scenarios of a project
    fn scenarios(&self, project: ProjectId) -> Vec<Scenario>;

    /// Get a category by ID
    fn category(&self, id: CategoryId) -> Option<Category>;

    /// Categories of a project
    fn categories(&self, project: ProjectId) -> Vec<Category>;

    /// Get a function by ID
    fn function(&self, id: FunctionId) -> Option<Function>;

    /// Functions of a project
    fn functions(&self, project: ProjectId) -> Vec<Function>;

    /// Get a system by ID
    fn system(&self, id: SystemId) -> Option<System>;

    /// Systems of a project
    fn systems(&self, project: ProjectId) -> Vec<System>;

    /// Get a weighting scale by ID
    fn scale(&self, id: ScaleId) -> Option<WeightingScale>;

    /// Scales of a project
    fn scales(&self, project: ProjectId) -> Vec<WeightingScale>;

    /// Get an architecture by ID
    fn architecture(&self, id: ArchitectureId) -> Option<SystemArchitecture>;

    /// Architectures of a project
    fn architectures(&self, project: ProjectId) -> Vec<SystemArchitecture>;

    /// Get a relationship by ID
    fn relationship(&self, id: RelationshipId) -> Option<Relationship>;

    /// Relationships of a kind starting at a node
    fn outgoing(&self, source: NodeRef, kind: RelationshipKind) -> Vec<Relationship>;

    /// Relationships of a kind ending at a function
    fn incoming(&self, target: FunctionId, kind: RelationshipKind) -> Vec<Relationship>;

    /// System-satisfies relationships incompatible with the given one
    fn incompatible_with(&self, id: RelationshipId) -> Vec<RelationshipId>;

    /// Every vote cast on a relationship, in insertion order
    fn votes(&self, relationship: RelationshipId) -> Vec<Vote>;

    /// Get an expert profile by ID
    fn expert(&self, id: ExpertId) -> Option<ExpertProfile>;

    /// All expert profiles
    fn experts(&self) -> Vec<ExpertProfile>;

    /// Get an organization by ID
    fn organization(&self, id: OrganizationId) -> Option<Organization>;

    /// All organizations
    fn organizations(&self) -> Vec<Organization>;

    /// Most recent vote per expert on a relationship
    ///
    /// Empty when the relationship has never been voted on.
    fn latest_votes(&self, relationship: RelationshipId) -> LatestVotes {
        latest_votes(&self.votes(relationship))
    }

    /// Functions a function requires, as relationship rows
    fn function_requires(&self, id: FunctionId) -> Vec<Relationship> {
        self.outgoing(NodeRef::Function(id), RelationshipKind::FunctionRequires)
    }

    /// Functions a function satisfies, as relationship rows
    fn function_satisfies(&self, id: FunctionId) -> Vec<Relationship> {
        self.outgoing(NodeRef::Function(id), RelationshipKind::FunctionSatisfies)
    }

    /// Functions a system requires, as relationship rows
    fn system_requires(&self, id: SystemId) -> Vec<Relationship> {
        self.outgoing(NodeRef::System(id), RelationshipKind::SystemRequires)
    }

    /// Functions a system satisfies, as relationship rows
    fn system_satisfies(&self, id: SystemId) -> Vec<Relationship> {
        self.outgoing(NodeRef::System(id), RelationshipKind::SystemSatisfies)
    }

    /// Functions required while a system satisfies through `id`
    fn satisfaction_requires(&self, id: RelationshipId) -> Vec<Relationship> {
        self.outgoing(
            NodeRef::Relationship(id),
            RelationshipKind::SystemSatisfactionRequires,
        )
    }
}

/// Write access to a project model
///
/// Every create validates ownership and references; a validation error
/// aborts only that one write.
pub trait ModelStore: ModelRead {
    /// Error type for store operations
    type Error: From<ModelError> + std::error::Error + Send + Sync + 'static;

    /// Split a store failure into the model error behind it, or hand back
    /// a failure of the store itself
    fn into_model_error(err: Self::Error) -> Result<ModelError, Self::Error>;

    /// Create a project
    fn create_project(&mut self, attrs: NamedAttrs) -> Result<Project, Self::Error>;

    /// Rename or redescribe a project
    fn update_project(&mut self, id: ProjectId, attrs: NamedAttrs) -> Result<Project, Self::Error>;

    /// Delete a project and everything it owns
    fn delete_project(&mut self, id: ProjectId) -> Result<(), Self::Error>;

    /// Add a goal to a project
    fn add_goal(&mut self, project: ProjectId, attrs: GoalAttrs) -> Result<Goal, Self::Error>;

    /// Update a goal's text and terms
    fn update_goal(&mut self, id: GoalId, attrs: GoalAttrs) -> Result<Goal, Self::Error>;

    /// Delete a goal
    fn delete_goal(&mut self, id: GoalId) -> Result<(), Self::Error>;

    /// Add a glossary term to a project
    fn add_term(&mut self, project: ProjectId, attrs: NamedAttrs) -> Result<Term, Self::Error>;

    /// Rename or redefine a term
    fn update_term(&mut self, id: TermId, attrs: NamedAttrs) -> Result<Term, Self::Error>;

    /// Delete a term (and remove it from goals)
    fn delete_term(&mut self, id: TermId) -> Result<(), Self::Error>;

    /// Add a scenario to a project
    fn add_scenario(
        &mut self,
        project: ProjectId,
        attrs: ScenarioAttrs,
    ) -> Result<Scenario, Self::Error>;

    /// Update a scenario
    fn update_scenario(
        &mut self,
        id: ScenarioId,
        attrs: ScenarioAttrs,
    ) -> Result<Scenario, Self::Error>;

    /// Delete a scenario and the relationships scoped to it
    fn delete_scenario(&mut self, id: ScenarioId) -> Result<(), Self::Error>;

    /// Add a category to a project
    fn add_category(
        &mut self,
        project: ProjectId,
        attrs: CategoryAttrs,
    ) -> Result<Category, Self::Error>;

    /// Update a category; its kind is fixed at creation
    fn update_category(
        &mut self,
        id: CategoryId,
        attrs: CategoryAttrs,
    ) -> Result<Category, Self::Error>;

    /// Delete a category
    fn delete_category(&mut self, id: CategoryId) -> Result<(), Self::Error>;

    /// Add a function to a project
    fn add_function(&mut self, project: ProjectId, attrs: NodeAttrs)
        -> Result<Function, Self::Error>;

    /// Update a function
    fn update_function(&mut self, id: FunctionId, attrs: NodeAttrs)
        -> Result<Function, Self::Error>;

    /// Delete a function and every relationship touching it
    fn delete_function(&mut self, id: FunctionId) -> Result<(), Self::Error>;

    /// Add a system to a project
    fn add_system(&mut self, project: ProjectId, attrs: NodeAttrs) -> Result<System, Self::Error>;

    /// Update a system
    fn update_system(&mut self, id: SystemId, attrs: NodeAttrs) -> Result<System, Self::Error>;

    /// Delete a system and every relationship touching it
    fn delete_system(&mut self, id: SystemId) -> Result<(), Self::Error>;

    /// Add a weighting scale to a project
    fn add_scale(
        &mut self,
        project: ProjectId,
        attrs: ScaleAttrs,
    ) -> Result<WeightingScale, Self::Error>;

    /// Update a scale's name, description and criteria
    fn update_scale(&mut self, id: ScaleId, attrs: ScaleAttrs)
        -> Result<WeightingScale, Self::Error>;

    /// Append a level to a scale
    fn add_level(
        &mut self,
        scale: ScaleId,
        name: &str,
        value: f64,
    ) -> Result<WeightLevel, Self::Error>;

    /// Rename or revalue a level; votes already cast follow the new value
    fn update_level(
        &mut self,
        scale: ScaleId,
        level: LevelId,
        name: &str,
        value: f64,
    ) -> Result<WeightLevel, Self::Error>;

    /// Remove a level no vote references
    fn remove_level(&mut self, scale: ScaleId, level: LevelId) -> Result<(), Self::Error>;

    /// Delete a scale and the relationships judged on it
    fn delete_scale(&mut self, id: ScaleId) -> Result<(), Self::Error>;

    /// Create an architecture from systems of one project
    fn add_architecture(
        &mut self,
        project: ProjectId,
        attrs: NamedAttrs,
        systems: Vec<SystemId>,
    ) -> Result<SystemArchitecture, Self::Error>;

    /// Rename or redescribe an architecture
    fn update_architecture(
        &mut self,
        id: ArchitectureId,
        attrs: NamedAttrs,
    ) -> Result<SystemArchitecture, Self::Error>;

    /// Include a system in an architecture
    fn add_architecture_system(
        &mut self,
        id: ArchitectureId,
        system: SystemId,
    ) -> Result<SystemArchitecture, Self::Error>;

    /// Exclude a system from an architecture
    fn remove_architecture_system(
        &mut self,
        id: ArchitectureId,
        system: SystemId,
    ) -> Result<SystemArchitecture, Self::Error>;

    /// Delete an architecture
    fn delete_architecture(&mut self, id: ArchitectureId) -> Result<(), Self::Error>;

    /// Create a relationship
    fn create_relationship(
        &mut self,
        request: NewRelationship,
    ) -> Result<Relationship, Self::Error>;

    /// Change a relationship's notes and scenario
    fn update_relationship(
        &mut self,
        id: RelationshipId,
        scenario: Option<ScenarioId>,
        notes: String,
    ) -> Result<Relationship, Self::Error>;

    /// Delete a relationship, its votes and dependent edges
    fn delete_relationship(&mut self, id: RelationshipId) -> Result<(), Self::Error>;

    /// Record that two system-satisfies relationships cannot coexist
    fn mark_incompatible(
        &mut self,
        a: RelationshipId,
        b: RelationshipId,
    ) -> Result<(), Self::Error>;

    /// Remove an incompatibility
    fn unmark_incompatible(
        &mut self,
        a: RelationshipId,
        b: RelationshipId,
    ) -> Result<(), Self::Error>;

    /// Append a vote
    fn cast_vote(&mut self, request: NewVote) -> Result<Vote, Self::Error>;

    /// Delete a single vote
    fn delete_vote(&mut self, id: VoteId) -> Result<(), Self::Error>;

    /// Create an organization
    fn add_organization(&mut self, attrs: NamedAttrs) -> Result<Organization, Self::Error>;

    /// Rename or redescribe an organization
    fn update_organization(
        &mut self,
        id: OrganizationId,
        attrs: NamedAttrs,
    ) -> Result<Organization, Self::Error>;

    /// Delete an organization; profiles that referenced it lose their affiliation
    fn delete_organization(&mut self, id: OrganizationId) -> Result<(), Self::Error>;

    /// Create the expert profile for a newly created account
    fn on_account_created(&mut self, account: &str) -> Result<ExpertProfile, Self::Error>;

    /// Update an expert profile's title, affiliation and phone
    fn update_expert(&mut self, profile: ExpertProfile) -> Result<ExpertProfile, Self::Error>;

    /// Delete a profile; that expert's votes become anonymous
    fn delete_expert(&mut self, id: ExpertId) -> Result<(), Self::Error>;
}
