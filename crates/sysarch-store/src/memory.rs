//! In-memory arena implementation of the model traits

use crate::index::EdgeIndex;
use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use sysarch_domain::error::require_name;
use sysarch_domain::project::check_categories;
use sysarch_domain::{
    ArchitectureId, Category, CategoryAttrs, CategoryId, Edge, ExpertId, ExpertProfile, Function,
    FunctionId, Goal, GoalAttrs, GoalId, IncompatiblePair, LevelId, ModelError, ModelRead,
    ModelStore, NamedAttrs, NewRelationship, NewVote, NodeAttrs, NodeRef, Organization,
    OrganizationId, Project, ProjectId, Relationship, RelationshipId, RelationshipKind, ScaleAttrs,
    ScaleId, Scenario, ScenarioAttrs, ScenarioId, System, SystemArchitecture, SystemId, Term,
    TermId, Vote, VoteId, WeightLevel, WeightingScale,
};
use tracing::{debug, info};

/// Every row the store keeps; this is also the snapshot format
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Tables {
    #[serde(default)]
    pub(crate) projects: BTreeMap<ProjectId, Project>,
    #[serde(default)]
    pub(crate) goals: BTreeMap<GoalId, Goal>,
    #[serde(default)]
    pub(crate) terms: BTreeMap<TermId, Term>,
    #[serde(default)]
    pub(crate) scenarios: BTreeMap<ScenarioId, Scenario>,
    #[serde(default)]
    pub(crate) categories: BTreeMap<CategoryId, Category>,
    #[serde(default)]
    pub(crate) functions: BTreeMap<FunctionId, Function>,
    #[serde(default)]
    pub(crate) systems: BTreeMap<SystemId, System>,
    #[serde(default)]
    pub(crate) scales: BTreeMap<ScaleId, WeightingScale>,
    #[serde(default)]
    pub(crate) architectures: BTreeMap<ArchitectureId, SystemArchitecture>,
    #[serde(default)]
    pub(crate) relationships: BTreeMap<RelationshipId, Relationship>,
    #[serde(default)]
    pub(crate) incompatible: BTreeSet<IncompatiblePair>,
    /// Votes per relationship in insertion order
    #[serde(default)]
    pub(crate) votes: BTreeMap<RelationshipId, Vec<Vote>>,
    #[serde(default)]
    pub(crate) experts: BTreeMap<ExpertId, ExpertProfile>,
    #[serde(default)]
    pub(crate) organizations: BTreeMap<OrganizationId, Organization>,
}

/// Arena store keeping every entity in id-ordered tables
///
/// Entities reference each other only by id. Relationship adjacency lives in
/// a separate edge index rebuilt whenever tables are loaded.
///
/// # Examples
///
/// ```
/// use sysarch_domain::{ModelRead, ModelStore, NamedAttrs, NodeAttrs};
/// use sysarch_store::MemoryStore;
///
/// let mut store = MemoryStore::new();
/// let project = store.create_project(NamedAttrs::named("Naval Example")).unwrap();
/// let detect = store.add_function(project.id, NodeAttrs::named("Detect Target")).unwrap();
/// assert_eq!(store.functions(project.id), vec![detect]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub(crate) tables: Tables,
    index: EdgeIndex,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_tables(mut tables: Tables) -> Self {
        // re-canonicalize pairs in case a snapshot was edited by hand
        tables.incompatible = tables
            .incompatible
            .iter()
            .filter_map(|p| IncompatiblePair::new(p.first(), p.second()))
            .collect();

        let mut index = EdgeIndex::default();
        for relationship in tables.relationships.values() {
            index.insert(relationship);
        }
        Self { tables, index }
    }

    /// Total number of votes, including superseded ones
    pub fn vote_count(&self) -> usize {
        self.tables.votes.values().map(Vec::len).sum()
    }

    /// Total number of relationships
    pub fn relationship_count(&self) -> usize {
        self.tables.relationships.len()
    }

    fn require_project(&self, id: ProjectId) -> Result<&Project, ModelError> {
        self.tables
            .projects
            .get(&id)
            .ok_or_else(|| ModelError::not_found("project", id))
    }

    fn function_project(&self, id: FunctionId) -> Result<ProjectId, ModelError> {
        self.tables
            .functions
            .get(&id)
            .map(|f| f.project)
            .ok_or_else(|| ModelError::not_found("function", id))
    }

    fn system_project(&self, id: SystemId) -> Result<ProjectId, ModelError> {
        self.tables
            .systems
            .get(&id)
            .map(|s| s.project)
            .ok_or_else(|| ModelError::not_found("system", id))
    }

    fn same_project(expected: ProjectId, actual: ProjectId, what: &str) -> Result<(), ModelError> {
        if expected != actual {
            return Err(ModelError::Validation(format!(
                "{} belongs to another project",
                what
            )));
        }
        Ok(())
    }

    fn check_scenario_parent(
        &self,
        project: ProjectId,
        parent: Option<ScenarioId>,
    ) -> Result<(), ModelError> {
        if let Some(parent) = parent {
            let scenario = self
                .tables
                .scenarios
                .get(&parent)
                .ok_or_else(|| ModelError::not_found("scenario", parent))?;
            Self::same_project(project, scenario.project, "Parent scenario")?;
        }
        Ok(())
    }

    fn check_category_parent(
        &self,
        project: ProjectId,
        parent: Option<CategoryId>,
    ) -> Result<(), ModelError> {
        if let Some(parent) = parent {
            let found = self
                .tables
                .categories
                .get(&parent)
                .ok_or_else(|| ModelError::not_found("category", parent))?;
            Self::same_project(project, found.project, "Parent category")?;
        }
        Ok(())
    }

    fn check_terms(&self, project: ProjectId, terms: &[TermId]) -> Result<(), ModelError> {
        for term in terms {
            let found = self
                .tables
                .terms
                .get(term)
                .ok_or_else(|| ModelError::not_found("term", term))?;
            Self::same_project(project, found.project, "Term")?;
        }
        Ok(())
    }

    /// Project owning the endpoints of an edge, checking they agree
    fn edge_project(&self, edge: &Edge) -> Result<ProjectId, ModelError> {
        let (source_project, target) = match *edge {
            Edge::FunctionRequires { requiring, required } => {
                (self.function_project(requiring)?, required)
            }
            Edge::FunctionSatisfies { satisfier, satisfied } => {
                (self.function_project(satisfier)?, satisfied)
            }
            Edge::SystemRequires { requiring, required } => {
                (self.system_project(requiring)?, required)
            }
            Edge::SystemSatisfies { satisfier, satisfied } => {
                (self.system_project(satisfier)?, satisfied)
            }
            Edge::SystemSatisfactionRequires { relationship, required } => {
                let parent = self
                    .tables
                    .relationships
                    .get(&relationship)
                    .ok_or_else(|| ModelError::not_found("relationship", relationship))?;
                if parent.kind() != RelationshipKind::SystemSatisfies {
                    return Err(ModelError::Validation(format!(
                        "Relationship {} is a {}, expected system_satisfies",
                        relationship,
                        parent.kind().as_str()
                    )));
                }
                (parent.project, required)
            }
        };
        let target_project = self.function_project(target)?;
        Self::same_project(source_project, target_project, "Relationship target")?;
        Ok(source_project)
    }

    fn satisfier_edge(&self, id: RelationshipId) -> Result<&Relationship, ModelError> {
        let relationship = self
            .tables
            .relationships
            .get(&id)
            .ok_or_else(|| ModelError::not_found("relationship", id))?;
        if relationship.kind() != RelationshipKind::SystemSatisfies {
            return Err(ModelError::Validation(format!(
                "Only system_satisfies relationships can be incompatible, {} is a {}",
                id,
                relationship.kind().as_str()
            )));
        }
        Ok(relationship)
    }

    /// Remove a relationship and everything hanging off it
    fn remove_relationship(&mut self, id: RelationshipId) -> usize {
        let Some(relationship) = self.tables.relationships.remove(&id) else {
            return 0;
        };
        self.index.remove(&relationship);
        self.tables.votes.remove(&id);
        self.tables
            .incompatible
            .retain(|pair| pair.other(id).is_none());

        let mut removed = 1;
        if relationship.kind() == RelationshipKind::SystemSatisfies {
            let dependents = self.index.outgoing(
                NodeRef::Relationship(id),
                RelationshipKind::SystemSatisfactionRequires,
            );
            for dependent in dependents {
                removed += self.remove_relationship(dependent);
            }
        }
        removed
    }

    fn remove_relationships_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&Relationship) -> bool,
    {
        let ids: Vec<RelationshipId> = self
            .tables
            .relationships
            .values()
            .filter(|r| predicate(r))
            .map(|r| r.id)
            .collect();
        ids.into_iter().map(|id| self.remove_relationship(id)).sum()
    }

    fn remove_touching(&mut self, node: NodeRef) -> usize {
        let ids = self.index.touching(node);
        ids.into_iter().map(|id| self.remove_relationship(id)).sum()
    }
}

impl ModelRead for MemoryStore {
    fn project(&self, id: ProjectId) -> Option<Project> {
        self.tables.projects.get(&id).cloned()
    }

    fn projects(&self) -> Vec<Project> {
        self.tables.projects.values().cloned().collect()
    }

    fn goal(&self, id: GoalId) -> Option<Goal> {
        self.tables.goals.get(&id).cloned()
    }

    fn goals(&self, project: ProjectId) -> Vec<Goal> {
        self.tables
            .goals
            .values()
            .filter(|g| g.project == project)
            .cloned()
            .collect()
    }

    fn glossary(&self, project: ProjectId) -> Vec<Term> {
        self.tables
            .terms
            .values()
            .filter(|t| t.project == project)
            .cloned()
            .collect()
    }

    fn scenario(&self, id: ScenarioId) -> Option<Scenario> {
        self.tables.scenarios.get(&id).cloned()
    }

    fn scenarios(&self, project: ProjectId) -> Vec<Scenario> {
        self.tables
            .scenarios
            .values()
            .filter(|s| s.project == project)
            .cloned()
            .collect()
    }

    fn category(&self, id: CategoryId) -> Option<Category> {
        self.tables.categories.get(&id).cloned()
    }

    fn categories(&self, project: ProjectId) -> Vec<Category> {
        self.tables
            .categories
            .values()
            .filter(|c| c.project == project)
            .cloned()
            .collect()
    }

    fn function(&self, id: FunctionId) -> Option<Function> {
        self.tables.functions.get(&id).cloned()
    }

    fn functions(&self, project: ProjectId) -> Vec<Function> {
        self.tables
            .functions
            .values()
            .filter(|f| f.project == project)
            .cloned()
            .collect()
    }

    fn system(&self, id: SystemId) -> Option<System> {
        self.tables.systems.get(&id).cloned()
    }

    fn systems(&self, project: ProjectId) -> Vec<System> {
        self.tables
            .systems
            .values()
            .filter(|s| s.project == project)
            .cloned()
            .collect()
    }

    fn scale(&self, id: ScaleId) -> Option<WeightingScale> {
        self.tables.scales.get(&id).cloned()
    }

    fn scales(&self, project: ProjectId) -> Vec<WeightingScale> {
        self.tables
            .scales
            .values()
            .filter(|s| s.project == project)
            .cloned()
            .collect()
    }

    fn architecture(&self, id: ArchitectureId) -> Option<SystemArchitecture> {
        self.tables.architectures.get(&id).cloned()
    }

    fn architectures(&self, project: ProjectId) -> Vec<SystemArchitecture> {
        self.tables
            .architectures
            .values()
            .filter(|a| a.project == project)
            .cloned()
            .collect()
    }

    fn relationship(&self, id: RelationshipId) -> Option<Relationship> {
        self.tables.relationships.get(&id).cloned()
    }

    fn outgoing(&self, source: NodeRef, kind: RelationshipKind) -> Vec<Relationship> {
        self.index
            .outgoing(source, kind)
            .into_iter()
            .filter_map(|id| self.tables.relationships.get(&id).cloned())
            .collect()
    }

    fn incoming(&self, target: FunctionId, kind: RelationshipKind) -> Vec<Relationship> {
        self.index
            .incoming(target, kind)
            .into_iter()
            .filter_map(|id| self.tables.relationships.get(&id).cloned())
            .collect()
    }

    fn incompatible_with(&self, id: RelationshipId) -> Vec<RelationshipId> {
        self.tables
            .incompatible
            .iter()
            .filter_map(|pair| pair.other(id))
            .collect()
    }

    fn votes(&self, relationship: RelationshipId) -> Vec<Vote> {
        self.tables
            .votes
            .get(&relationship)
            .cloned()
            .unwrap_or_default()
    }

    fn expert(&self, id: ExpertId) -> Option<ExpertProfile> {
        self.tables.experts.get(&id).cloned()
    }

    fn experts(&self) -> Vec<ExpertProfile> {
        self.tables.experts.values().cloned().collect()
    }

    fn organization(&self, id: OrganizationId) -> Option<Organization> {
        self.tables.organizations.get(&id).cloned()
    }

    fn organizations(&self) -> Vec<Organization> {
        self.tables.organizations.values().cloned().collect()
    }
}

impl ModelStore for MemoryStore {
    type Error = StoreError;

    fn into_model_error(err: StoreError) -> Result<ModelError, StoreError> {
        match err {
            StoreError::Model(err) => Ok(err),
            other => Err(other),
        }
    }

    fn create_project(&mut self, attrs: NamedAttrs) -> Result<Project, Self::Error> {
        let project = Project::new(attrs.name, attrs.description)?;
        debug!(project = %project.id, name = %project.name, "Created project");
        self.tables.projects.insert(project.id, project.clone());
        Ok(project)
    }

    fn update_project(&mut self, id: ProjectId, attrs: NamedAttrs) -> Result<Project, Self::Error> {
        require_name("Project", &attrs.name)?;
        let project = self
            .tables
            .projects
            .get_mut(&id)
            .ok_or_else(|| ModelError::not_found("project", id))?;
        project.name = attrs.name;
        project.description = attrs.description;
        Ok(project.clone())
    }

    fn delete_project(&mut self, id: ProjectId) -> Result<(), Self::Error> {
        self.require_project(id)?;

        let relationships = self.remove_relationships_where(|r| r.project == id);
        let t = &mut self.tables;
        t.goals.retain(|_, g| g.project != id);
        t.terms.retain(|_, x| x.project != id);
        t.scenarios.retain(|_, s| s.project != id);
        t.categories.retain(|_, c| c.project != id);
        t.functions.retain(|_, f| f.project != id);
        t.systems.retain(|_, s| s.project != id);
        t.scales.retain(|_, s| s.project != id);
        t.architectures.retain(|_, a| a.project != id);
        t.projects.remove(&id);

        info!(project = %id, relationships, "Deleted project and owned entities");
        Ok(())
    }

    fn add_goal(&mut self, project: ProjectId, attrs: GoalAttrs) -> Result<Goal, Self::Error> {
        self.require_project(project)?;
        require_name("Goal", &attrs.name)?;
        self.check_terms(project, &attrs.terms)?;

        let goal = Goal {
            id: GoalId::new(),
            project,
            name: attrs.name,
            description: attrs.description,
            body: attrs.body,
            terms: attrs.terms,
        };
        self.tables.goals.insert(goal.id, goal.clone());
        Ok(goal)
    }

    fn update_goal(&mut self, id: GoalId, attrs: GoalAttrs) -> Result<Goal, Self::Error> {
        require_name("Goal", &attrs.name)?;
        let project = self
            .tables
            .goals
            .get(&id)
            .map(|g| g.project)
            .ok_or_else(|| ModelError::not_found("goal", id))?;
        self.check_terms(project, &attrs.terms)?;

        let goal = self
            .tables
            .goals
            .get_mut(&id)
            .ok_or_else(|| ModelError::not_found("goal", id))?;
        goal.name = attrs.name;
        goal.description = attrs.description;
        goal.body = attrs.body;
        goal.terms = attrs.terms;
        Ok(goal.clone())
    }

    fn delete_goal(&mut self, id: GoalId) -> Result<(), Self::Error> {
        self.tables
            .goals
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ModelError::not_found("goal", id).into())
    }

    fn add_term(&mut self, project: ProjectId, attrs: NamedAttrs) -> Result<Term, Self::Error> {
        self.require_project(project)?;
        require_name("Term", &attrs.name)?;
        let term = Term {
            id: TermId::new(),
            project,
            name: attrs.name,
            description: attrs.description,
        };
        self.tables.terms.insert(term.id, term.clone());
        Ok(term)
    }

    fn update_term(&mut self, id: TermId, attrs: NamedAttrs) -> Result<Term, Self::Error> {
        require_name("Term", &attrs.name)?;
        let term = self
            .tables
            .terms
            .get_mut(&id)
            .ok_or_else(|| ModelError::not_found("term", id))?;
        term.name = attrs.name;
        term.description = attrs.description;
        Ok(term.clone())
    }

    fn delete_term(&mut self, id: TermId) -> Result<(), Self::Error> {
        self.tables
            .terms
            .remove(&id)
            .ok_or_else(|| ModelError::not_found("term", id))?;
        for goal in self.tables.goals.values_mut() {
            goal.terms.retain(|t| *t != id);
        }
        Ok(())
    }

    fn add_scenario(
        &mut self,
        project: ProjectId,
        attrs: ScenarioAttrs,
    ) -> Result<Scenario, Self::Error> {
        self.require_project(project)?;
        require_name("Scenario", &attrs.name)?;
        self.check_scenario_parent(project, attrs.parent)?;

        let scenario = Scenario {
            id: ScenarioId::new(),
            project,
            name: attrs.name,
            description: attrs.description,
            parent: attrs.parent,
        };
        debug!(scenario = %scenario.id, name = %scenario.name, "Created scenario");
        self.tables.scenarios.insert(scenario.id, scenario.clone());
        Ok(scenario)
    }

    fn update_scenario(
        &mut self,
        id: ScenarioId,
        attrs: ScenarioAttrs,
    ) -> Result<Scenario, Self::Error> {
        require_name("Scenario", &attrs.name)?;
        let project = self
            .tables
            .scenarios
            .get(&id)
            .map(|s| s.project)
            .ok_or_else(|| ModelError::not_found("scenario", id))?;
        self.check_scenario_parent(project, attrs.parent)?;

        let scenario = self
            .tables
            .scenarios
            .get_mut(&id)
            .ok_or_else(|| ModelError::not_found("scenario", id))?;
        scenario.name = attrs.name;
        scenario.description = attrs.description;
        scenario.parent = attrs.parent;
        Ok(scenario.clone())
    }

    fn delete_scenario(&mut self, id: ScenarioId) -> Result<(), Self::Error> {
        if !self.tables.scenarios.contains_key(&id) {
            return Err(ModelError::not_found("scenario", id).into());
        }
        let relationships = self.remove_relationships_where(|r| r.scenario == Some(id));
        for scenario in self.tables.scenarios.values_mut() {
            if scenario.parent == Some(id) {
                scenario.parent = None;
            }
        }
        self.tables.scenarios.remove(&id);
        info!(scenario = %id, relationships, "Deleted scenario");
        Ok(())
    }

    fn add_category(
        &mut self,
        project: ProjectId,
        attrs: CategoryAttrs,
    ) -> Result<Category, Self::Error> {
        self.require_project(project)?;
        require_name("Category", &attrs.name)?;
        self.check_category_parent(project, attrs.parent)?;

        let category = Category {
            id: CategoryId::new(),
            project,
            name: attrs.name,
            description: attrs.description,
            parent: attrs.parent,
            kind: attrs.kind,
        };
        self.tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    fn update_category(
        &mut self,
        id: CategoryId,
        attrs: CategoryAttrs,
    ) -> Result<Category, Self::Error> {
        require_name("Category", &attrs.name)?;
        let (project, kind) = self
            .tables
            .categories
            .get(&id)
            .map(|c| (c.project, c.kind))
            .ok_or_else(|| ModelError::not_found("category", id))?;
        if attrs.kind != kind {
            return Err(ModelError::Validation(format!(
                "Category kind cannot change from {} to {}",
                kind.as_str(),
                attrs.kind.as_str()
            ))
            .into());
        }
        if attrs.parent == Some(id) {
            return Err(
                ModelError::Validation("A category cannot be its own parent".into()).into(),
            );
        }
        self.check_category_parent(project, attrs.parent)?;

        let category = self
            .tables
            .categories
            .get_mut(&id)
            .ok_or_else(|| ModelError::not_found("category", id))?;
        category.name = attrs.name;
        category.description = attrs.description;
        category.parent = attrs.parent;
        Ok(category.clone())
    }

    fn delete_category(&mut self, id: CategoryId) -> Result<(), Self::Error> {
        self.tables
            .categories
            .remove(&id)
            .ok_or_else(|| ModelError::not_found("category", id))?;
        for category in self.tables.categories.values_mut() {
            if category.parent == Some(id) {
                category.parent = None;
            }
        }
        for function in self.tables.functions.values_mut() {
            function.categories.retain(|c| *c != id);
        }
        for system in self.tables.systems.values_mut() {
            system.categories.retain(|c| *c != id);
        }
        Ok(())
    }

    fn add_function(
        &mut self,
        project: ProjectId,
        attrs: NodeAttrs,
    ) -> Result<Function, Self::Error> {
        self.require_project(project)?;
        require_name("Function", &attrs.name)?;
        check_categories("Function", project, &attrs.categories, |id| {
            self.tables.categories.get(&id)
        })?;

        let function = Function {
            id: FunctionId::new(),
            project,
            name: attrs.name,
            description: attrs.description,
            categories: attrs.categories,
        };
        debug!(function = %function.id, name = %function.name, "Created function");
        self.tables.functions.insert(function.id, function.clone());
        Ok(function)
    }

    fn update_function(
        &mut self,
        id: FunctionId,
        attrs: NodeAttrs,
    ) -> Result<Function, Self::Error> {
        require_name("Function", &attrs.name)?;
        let project = self.function_project(id)?;
        check_categories("Function", project, &attrs.categories, |c| {
            self.tables.categories.get(&c)
        })?;

        let function = self
            .tables
            .functions
            .get_mut(&id)
            .ok_or_else(|| ModelError::not_found("function", id))?;
        function.name = attrs.name;
        function.description = attrs.description;
        function.categories = attrs.categories;
        Ok(function.clone())
    }

    fn delete_function(&mut self, id: FunctionId) -> Result<(), Self::Error> {
        if !self.tables.functions.contains_key(&id) {
            return Err(ModelError::not_found("function", id).into());
        }
        let relationships = self.remove_touching(NodeRef::Function(id));
        self.tables.functions.remove(&id);
        info!(function = %id, relationships, "Deleted function");
        Ok(())
    }

    fn add_system(&mut self, project: ProjectId, attrs: NodeAttrs) -> Result<System, Self::Error> {
        self.require_project(project)?;
        require_name("System", &attrs.name)?;
        check_categories("System", project, &attrs.categories, |id| {
            self.tables.categories.get(&id)
        })?;

        let system = System {
            id: SystemId::new(),
            project,
            name: attrs.name,
            description: attrs.description,
            categories: attrs.categories,
        };
        debug!(system = %system.id, name = %system.name, "Created system");
        self.tables.systems.insert(system.id, system.clone());
        Ok(system)
    }

    fn update_system(&mut self, id: SystemId, attrs: NodeAttrs) -> Result<System, Self::Error> {
        require_name("System", &attrs.name)?;
        let project = self.system_project(id)?;
        check_categories("System", project, &attrs.categories, |c| {
            self.tables.categories.get(&c)
        })?;

        let system = self
            .tables
            .systems
            .get_mut(&id)
            .ok_or_else(|| ModelError::not_found("system", id))?;
        system.name = attrs.name;
        system.description = attrs.description;
        system.categories = attrs.categories;
        Ok(system.clone())
    }

    fn delete_system(&mut self, id: SystemId) -> Result<(), Self::Error> {
        if !self.tables.systems.contains_key(&id) {
            return Err(ModelError::not_found("system", id).into());
        }
        let relationships = self.remove_touching(NodeRef::System(id));
        for architecture in self.tables.architectures.values_mut() {
            architecture.systems.retain(|s| *s != id);
        }
        self.tables.systems.remove(&id);
        info!(system = %id, relationships, "Deleted system");
        Ok(())
    }

    fn add_scale(
        &mut self,
        project: ProjectId,
        attrs: ScaleAttrs,
    ) -> Result<WeightingScale, Self::Error> {
        self.require_project(project)?;
        let scale = WeightingScale::new(project, attrs)?;
        debug!(scale = %scale.id, name = %scale.name, "Created scale");
        self.tables.scales.insert(scale.id, scale.clone());
        Ok(scale)
    }

    fn update_scale(
        &mut self,
        id: ScaleId,
        attrs: ScaleAttrs,
    ) -> Result<WeightingScale, Self::Error> {
        require_name("Scale", &attrs.name)?;
        let scale = self
            .tables
            .scales
            .get_mut(&id)
            .ok_or_else(|| ModelError::not_found("scale", id))?;
        scale.name = attrs.name;
        scale.description = attrs.description;
        scale.criteria = attrs.criteria;
        Ok(scale.clone())
    }

    fn add_level(
        &mut self,
        scale: ScaleId,
        name: &str,
        value: f64,
    ) -> Result<WeightLevel, Self::Error> {
        let found = self
            .tables
            .scales
            .get_mut(&scale)
            .ok_or_else(|| ModelError::not_found("scale", scale))?;
        Ok(found.add_level(name, value)?)
    }

    fn update_level(
        &mut self,
        scale: ScaleId,
        level: LevelId,
        name: &str,
        value: f64,
    ) -> Result<WeightLevel, Self::Error> {
        let found = self
            .tables
            .scales
            .get_mut(&scale)
            .ok_or_else(|| ModelError::not_found("scale", scale))?;
        let level = found.update_level(level, name, value)?;
        debug!(scale = %scale, level = %level.id, value, "Updated level");
        Ok(level)
    }

    fn remove_level(&mut self, scale: ScaleId, level: LevelId) -> Result<(), Self::Error> {
        let referenced = self
            .tables
            .votes
            .values()
            .flatten()
            .any(|v| v.value == level);
        if referenced {
            return Err(ModelError::Validation(format!(
                "Level {} is referenced by votes and cannot be removed",
                level
            ))
            .into());
        }

        let found = self
            .tables
            .scales
            .get_mut(&scale)
            .ok_or_else(|| ModelError::not_found("scale", scale))?;
        let before = found.levels.len();
        found.levels.retain(|l| l.id != level);
        if found.levels.len() == before {
            return Err(ModelError::not_found("level", level).into());
        }
        Ok(())
    }

    fn delete_scale(&mut self, id: ScaleId) -> Result<(), Self::Error> {
        if !self.tables.scales.contains_key(&id) {
            return Err(ModelError::not_found("scale", id).into());
        }
        let relationships = self.remove_relationships_where(|r| r.scale == id);
        self.tables.scales.remove(&id);
        info!(scale = %id, relationships, "Deleted scale");
        Ok(())
    }

    fn add_architecture(
        &mut self,
        project: ProjectId,
        attrs: NamedAttrs,
        systems: Vec<SystemId>,
    ) -> Result<SystemArchitecture, Self::Error> {
        self.require_project(project)?;
        require_name("Architecture", &attrs.name)?;

        let mut members = Vec::new();
        for system in systems {
            Self::same_project(project, self.system_project(system)?, "System")?;
            if !members.contains(&system) {
                members.push(system);
            }
        }

        let architecture = SystemArchitecture {
            id: ArchitectureId::new(),
            project,
            name: attrs.name,
            description: attrs.description,
            systems: members,
        };
        self.tables
            .architectures
            .insert(architecture.id, architecture.clone());
        Ok(architecture)
    }

    fn update_architecture(
        &mut self,
        id: ArchitectureId,
        attrs: NamedAttrs,
    ) -> Result<SystemArchitecture, Self::Error> {
        require_name("Architecture", &attrs.name)?;
        let architecture = self
            .tables
            .architectures
            .get_mut(&id)
            .ok_or_else(|| ModelError::not_found("architecture", id))?;
        architecture.name = attrs.name;
        architecture.description = attrs.description;
        Ok(architecture.clone())
    }

    fn add_architecture_system(
        &mut self,
        id: ArchitectureId,
        system: SystemId,
    ) -> Result<SystemArchitecture, Self::Error> {
        let system_project = self.system_project(system)?;
        let architecture = self
            .tables
            .architectures
            .get_mut(&id)
            .ok_or_else(|| ModelError::not_found("architecture", id))?;
        Self::same_project(architecture.project, system_project, "System")?;
        if !architecture.systems.contains(&system) {
            architecture.systems.push(system);
        }
        Ok(architecture.clone())
    }

    fn remove_architecture_system(
        &mut self,
        id: ArchitectureId,
        system: SystemId,
    ) -> Result<SystemArchitecture, Self::Error> {
        let architecture = self
            .tables
            .architectures
            .get_mut(&id)
            .ok_or_else(|| ModelError::not_found("architecture", id))?;
        architecture.systems.retain(|s| *s != system);
        Ok(architecture.clone())
    }

    fn delete_architecture(&mut self, id: ArchitectureId) -> Result<(), Self::Error> {
        self.tables
            .architectures
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ModelError::not_found("architecture", id).into())
    }

    fn create_relationship(
        &mut self,
        request: NewRelationship,
    ) -> Result<Relationship, Self::Error> {
        let project = self.edge_project(&request.edge)?;

        let scale = self
            .tables
            .scales
            .get(&request.scale)
            .ok_or_else(|| ModelError::not_found("scale", request.scale))?;
        Self::same_project(project, scale.project, "Scale")?;

        if let Some(scenario) = request.scenario {
            let found = self
                .tables
                .scenarios
                .get(&scenario)
                .ok_or_else(|| ModelError::not_found("scenario", scenario))?;
            Self::same_project(project, found.project, "Scenario")?;
        }

        let relationship = Relationship {
            id: RelationshipId::new(),
            project,
            scale: request.scale,
            scenario: request.scenario,
            notes: request.notes,
            edge: request.edge,
        };
        debug!(
            relationship = %relationship.id,
            kind = relationship.kind().as_str(),
            "Created relationship"
        );
        self.index.insert(&relationship);
        self.tables
            .relationships
            .insert(relationship.id, relationship.clone());
        Ok(relationship)
    }

    fn update_relationship(
        &mut self,
        id: RelationshipId,
        scenario: Option<ScenarioId>,
        notes: String,
    ) -> Result<Relationship, Self::Error> {
        let project = self
            .tables
            .relationships
            .get(&id)
            .map(|r| r.project)
            .ok_or_else(|| ModelError::not_found("relationship", id))?;
        self.check_scenario_parent(project, scenario)?;

        let relationship = self
            .tables
            .relationships
            .get_mut(&id)
            .ok_or_else(|| ModelError::not_found("relationship", id))?;
        relationship.scenario = scenario;
        relationship.notes = notes;
        Ok(relationship.clone())
    }

    fn delete_relationship(&mut self, id: RelationshipId) -> Result<(), Self::Error> {
        match self.remove_relationship(id) {
            0 => Err(ModelError::not_found("relationship", id).into()),
            removed => {
                info!(relationship = %id, removed, "Deleted relationship");
                Ok(())
            }
        }
    }

    fn mark_incompatible(
        &mut self,
        a: RelationshipId,
        b: RelationshipId,
    ) -> Result<(), Self::Error> {
        let project_a = self.satisfier_edge(a)?.project;
        let project_b = self.satisfier_edge(b)?.project;
        Self::same_project(project_a, project_b, "Incompatible relationship")?;
        let pair = IncompatiblePair::new(a, b).ok_or_else(|| {
            ModelError::Validation("A relationship cannot be incompatible with itself".into())
        })?;
        self.tables.incompatible.insert(pair);
        Ok(())
    }

    fn unmark_incompatible(
        &mut self,
        a: RelationshipId,
        b: RelationshipId,
    ) -> Result<(), Self::Error> {
        if let Some(pair) = IncompatiblePair::new(a, b) {
            self.tables.incompatible.remove(&pair);
        }
        Ok(())
    }

    fn cast_vote(&mut self, request: NewVote) -> Result<Vote, Self::Error> {
        let relationship = self
            .tables
            .relationships
            .get(&request.relationship)
            .ok_or_else(|| ModelError::not_found("relationship", request.relationship))?;
        let scale = self
            .tables
            .scales
            .get(&relationship.scale)
            .ok_or_else(|| ModelError::not_found("scale", relationship.scale))?;
        if scale.level(request.value).is_none() {
            return Err(ModelError::ScaleMismatch {
                scale: scale.id,
                level: request.value,
            }
            .into());
        }
        if let Some(expert) = request.expert {
            if !self.tables.experts.contains_key(&expert) {
                return Err(ModelError::not_found("expert", expert).into());
            }
        }

        let vote = request.into_vote();
        debug!(
            vote = %vote.id,
            relationship = %vote.relationship,
            cast_on = vote.cast_on,
            "Cast vote"
        );
        self.tables
            .votes
            .entry(vote.relationship)
            .or_default()
            .push(vote.clone());
        Ok(vote)
    }

    fn delete_vote(&mut self, id: VoteId) -> Result<(), Self::Error> {
        for votes in self.tables.votes.values_mut() {
            if let Some(position) = votes.iter().position(|v| v.id == id) {
                votes.remove(position);
                return Ok(());
            }
        }
        Err(ModelError::not_found("vote", id).into())
    }

    fn add_organization(&mut self, attrs: NamedAttrs) -> Result<Organization, Self::Error> {
        let organization = Organization::new(attrs.name, attrs.description)?;
        self.tables
            .organizations
            .insert(organization.id, organization.clone());
        Ok(organization)
    }

    fn update_organization(
        &mut self,
        id: OrganizationId,
        attrs: NamedAttrs,
    ) -> Result<Organization, Self::Error> {
        require_name("Organization", &attrs.name)?;
        let organization = self
            .tables
            .organizations
            .get_mut(&id)
            .ok_or_else(|| ModelError::not_found("organization", id))?;
        organization.name = attrs.name;
        organization.description = attrs.description;
        Ok(organization.clone())
    }

    fn delete_organization(&mut self, id: OrganizationId) -> Result<(), Self::Error> {
        self.tables
            .organizations
            .remove(&id)
            .ok_or_else(|| ModelError::not_found("organization", id))?;
        let mut affiliated = 0;
        for expert in self.tables.experts.values_mut() {
            if expert.organization == Some(id) {
                expert.organization = None;
                affiliated += 1;
            }
        }
        info!(organization = %id, affiliated, "Deleted organization");
        Ok(())
    }

    fn on_account_created(&mut self, account: &str) -> Result<ExpertProfile, Self::Error> {
        let taken = self
            .tables
            .experts
            .values()
            .any(|e| e.account == account);
        if taken {
            return Err(ModelError::Validation(format!(
                "Account '{}' already has an expert profile",
                account
            ))
            .into());
        }

        let profile = ExpertProfile::for_account(account)?;
        debug!(expert = %profile.id, account, "Created expert profile");
        self.tables.experts.insert(profile.id, profile.clone());
        Ok(profile)
    }

    fn update_expert(&mut self, profile: ExpertProfile) -> Result<ExpertProfile, Self::Error> {
        if let Some(organization) = profile.organization {
            if !self.tables.organizations.contains_key(&organization) {
                return Err(ModelError::not_found("organization", organization).into());
            }
        }
        let existing = self
            .tables
            .experts
            .get_mut(&profile.id)
            .ok_or_else(|| ModelError::not_found("expert", profile.id))?;
        // the account link is fixed at creation
        existing.title = profile.title;
        existing.organization = profile.organization;
        existing.phone = profile.phone;
        Ok(existing.clone())
    }

    fn delete_expert(&mut self, id: ExpertId) -> Result<(), Self::Error> {
        self.tables
            .experts
            .remove(&id)
            .ok_or_else(|| ModelError::not_found("expert", id))?;
        for vote in self.tables.votes.values_mut().flatten() {
            if vote.expert == Some(id) {
                vote.expert = None;
            }
        }
        Ok(())
    }
}
