//! Scoring module - functional satisfaction and shortfall
//!
//! Implements the deterministic scoring formula over the relationship graph:
//! 1. Edge weight: average of the latest vote per expert, mapped to level values
//! 2. Satisfier edges (OR): best available satisfier, as a fraction of scale max
//! 3. Requirement edges (AND): weakest link, `max(weight * (1 - satisfaction))`
//! 4. A function's satisfaction combines both with `min`
//!
//! Scoring is a pure read over a [`ModelRead`]; re-running it without
//! intervening writes yields identical results.

use crate::error::{ModelError, ModelResult};
use crate::ids::{ArchitectureId, FunctionId, ProjectId, ScenarioId, SystemId};
use crate::relationship::{IncompatiblePair, NodeRef, Relationship, RelationshipKind};
use crate::traits::ModelRead;
use crate::vote::{Confidence, Vote};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

/// Default factor for high-confidence votes in confidence-weighted mode
pub const HIGH_CONFIDENCE_FACTOR: f64 = 1.0;

/// Default factor for moderate-confidence votes in confidence-weighted mode
pub const MODERATE_CONFIDENCE_FACTOR: f64 = 0.6;

/// Default factor for low-confidence votes in confidence-weighted mode
pub const LOW_CONFIDENCE_FACTOR: f64 = 0.3;

/// Per-function scoring outcome; cycles surface as an error for that node only
pub type FunctionalSatisfaction = BTreeMap<FunctionId, ModelResult<f64>>;

/// How much each expert's latest vote counts toward an edge weight
pub trait VoteWeighting {
    /// Relative weight of one vote (non-negative)
    fn factor(&self, vote: &Vote) -> f64;
}

/// Every vote counts equally; confidence is carried but unused
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreConfidence;

impl VoteWeighting for IgnoreConfidence {
    fn factor(&self, _vote: &Vote) -> f64 {
        1.0
    }
}

/// Selectable vote weighting, serializable for configuration files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WeightingMode {
    /// See [`IgnoreConfidence`]
    IgnoreConfidence,
    /// Scale each vote by a factor for its confidence
    ConfidenceWeighted {
        /// Factor for high-confidence votes
        high: f64,
        /// Factor for moderate-confidence votes
        moderate: f64,
        /// Factor for low-confidence votes
        low: f64,
    },
}

impl WeightingMode {
    /// Confidence weighting with the default factors
    pub fn confidence_weighted() -> Self {
        Self::ConfidenceWeighted {
            high: HIGH_CONFIDENCE_FACTOR,
            moderate: MODERATE_CONFIDENCE_FACTOR,
            low: LOW_CONFIDENCE_FACTOR,
        }
    }
}

impl Default for WeightingMode {
    fn default() -> Self {
        Self::IgnoreConfidence
    }
}

impl VoteWeighting for WeightingMode {
    fn factor(&self, vote: &Vote) -> f64 {
        match *self {
            Self::IgnoreConfidence => IgnoreConfidence.factor(vote),
            Self::ConfidenceWeighted { high, moderate, low } => match vote.confidence {
                Confidence::High => high,
                Confidence::Moderate => moderate,
                Confidence::Low => low,
            }
            .max(0.0),
        }
    }
}

/// Configuration for scoring runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// How votes are combined into an edge weight
    #[serde(default)]
    pub weighting: WeightingMode,

    /// Weight assumed for edges nobody has voted on
    ///
    /// `None` skips unvoted requirement edges and gives unvoted satisfier
    /// edges no credit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unvoted_weight: Option<f64>,

    /// Divide requirement weights by their scale's max, so scales such as
    /// 9-3-1 stay within [0, 1]
    #[serde(default)]
    pub normalize_weights: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weighting: WeightingMode::IgnoreConfidence,
            unvoted_weight: None,
            normalize_weights: false,
        }
    }
}

impl ScoringConfig {
    /// Weight votes by the expert's confidence
    pub fn confidence_weighted() -> Self {
        Self {
            weighting: WeightingMode::confidence_weighted(),
            ..Self::default()
        }
    }
}

/// Weighted average of the latest vote values on a relationship
///
/// Returns `None` when nobody has voted or every vote weighs zero.
pub fn edge_weight<S: ModelRead + ?Sized>(
    store: &S,
    relationship: &Relationship,
    weighting: &dyn VoteWeighting,
) -> Option<f64> {
    let scale = store.scale(relationship.scale)?;
    let latest = store.latest_votes(relationship.id);

    let mut total = 0.0;
    let mut factors = 0.0;
    for vote in latest.values() {
        // votes are validated against the scale on write; skip stragglers
        let Some(level) = scale.level(vote.value) else {
            continue;
        };
        let factor = weighting.factor(vote);
        total += factor * level.value;
        factors += factor;
    }

    if factors > 0.0 {
        Some(total / factors)
    } else {
        None
    }
}

/// Which systems a scoring run may draw on
#[derive(Debug, Clone)]
enum Availability {
    AllSystems,
    Only(HashSet<SystemId>),
}

impl Availability {
    fn includes(&self, system: SystemId) -> bool {
        match self {
            Self::AllSystems => true,
            Self::Only(systems) => systems.contains(&system),
        }
    }
}

/// A single scoring run over one model snapshot
///
/// Results are memoised per function for the lifetime of the scorer, so a
/// scorer must not outlive writes to the store it reads.
pub struct Scorer<'s, S: ModelRead + ?Sized> {
    store: &'s S,
    config: ScoringConfig,
    weighting: Box<dyn VoteWeighting + 's>,
    availability: Availability,
    scenarios: Option<HashSet<ScenarioId>>,
    memo: HashMap<FunctionId, ModelResult<f64>>,
}

impl<'s, S: ModelRead + ?Sized> Scorer<'s, S> {
    /// Score with every system of the project available
    pub fn new(store: &'s S, config: ScoringConfig) -> Self {
        let weighting: Box<dyn VoteWeighting + 's> = Box::new(config.weighting);
        Self {
            store,
            config,
            weighting,
            availability: Availability::AllSystems,
            scenarios: None,
            memo: HashMap::new(),
        }
    }

    /// Restrict satisfiers to the given systems
    pub fn with_systems(mut self, systems: impl IntoIterator<Item = SystemId>) -> Self {
        self.availability = Availability::Only(systems.into_iter().collect());
        self.memo.clear();
        self
    }

    /// Replace the configured vote weighting
    pub fn with_weighting(mut self, weighting: impl VoteWeighting + 's) -> Self {
        let weighting: Box<dyn VoteWeighting + 's> = Box::new(weighting);
        self.weighting = weighting;
        self.memo.clear();
        self
    }

    /// Count only unscoped edges and edges scoped to `scenario` or a broader
    /// scenario above it
    pub fn in_scenario(mut self, scenario: ScenarioId) -> Self {
        self.scenarios = Some(self.scenario_chain(scenario));
        self.memo.clear();
        self
    }

    /// Satisfaction of a function in [0, 1]
    pub fn satisfaction(&mut self, function: FunctionId) -> ModelResult<f64> {
        self.function_exists(function)?;
        let mut path = Vec::new();
        self.satisfaction_on_path(function, &mut path)
    }

    /// Worst-case unmet requirement of a function
    ///
    /// `max` over its requires edges of `weight * (1 - satisfaction(required))`;
    /// 0.0 when it has no counted requirements.
    pub fn shortfall(&mut self, function: FunctionId) -> ModelResult<f64> {
        self.function_exists(function)?;
        let mut path = vec![function];
        let edges = self.counted(
            self.store
                .outgoing(NodeRef::Function(function), RelationshipKind::FunctionRequires),
        );
        Ok(self.weakest_link(&edges, &mut path)?.unwrap_or(0.0))
    }

    fn function_exists(&self, function: FunctionId) -> ModelResult<()> {
        self.store
            .function(function)
            .map(|_| ())
            .ok_or_else(|| ModelError::not_found("function", function))
    }

    /// Scenario and its ancestors; parent chains are not guaranteed acyclic
    fn scenario_chain(&self, scenario: ScenarioId) -> HashSet<ScenarioId> {
        let mut chain = HashSet::new();
        let mut current = Some(scenario);
        while let Some(id) = current {
            if !chain.insert(id) {
                warn!(scenario = %id, "Scenario parent chain loops; stopping walk");
                break;
            }
            current = self.store.scenario(id).and_then(|s| s.parent);
        }
        chain
    }

    fn counts(&self, relationship: &Relationship) -> bool {
        match (&self.scenarios, relationship.scenario) {
            (None, _) | (Some(_), None) => true,
            (Some(chain), Some(scenario)) => chain.contains(&scenario),
        }
    }

    fn counted(&self, relationships: Vec<Relationship>) -> Vec<Relationship> {
        relationships.into_iter().filter(|r| self.counts(r)).collect()
    }

    fn weight(&self, relationship: &Relationship) -> Option<f64> {
        edge_weight(self.store, relationship, self.weighting.as_ref())
            .or(self.config.unvoted_weight)
    }

    fn scale_max(&self, relationship: &Relationship) -> Option<f64> {
        self.store
            .scale(relationship.scale)
            .and_then(|s| s.max().ok())
    }

    /// Requirement weight, optionally normalised by scale max
    fn requirement_weight(&self, relationship: &Relationship) -> Option<f64> {
        let weight = self.weight(relationship)?;
        if !self.config.normalize_weights {
            return Some(weight);
        }
        match self.scale_max(relationship) {
            Some(max) if max > 0.0 => Some(weight / max),
            _ => Some(0.0),
        }
    }

    /// Satisfier edge weight as a fraction of its scale max
    fn satisfier_fraction(&self, relationship: &Relationship) -> f64 {
        let Some(weight) = self.weight(relationship) else {
            return 0.0;
        };
        match self.scale_max(relationship) {
            Some(max) if max > 0.0 => (weight / max).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    fn satisfaction_on_path(
        &mut self,
        function: FunctionId,
        path: &mut Vec<FunctionId>,
    ) -> ModelResult<f64> {
        if let Some(result) = self.memo.get(&function) {
            return result.clone();
        }
        if path.contains(&function) {
            warn!(function = %function, depth = path.len(), "Cyclic requirement detected");
            return Err(ModelError::CyclicRequirement {
                function,
                path: path.clone(),
            });
        }

        path.push(function);
        let result = self.compute(function, path);
        path.pop();

        // functions on or depending on a cycle fail whatever the visit order
        self.memo.insert(function, result.clone());
        result
    }

    fn compute(&mut self, function: FunctionId, path: &mut Vec<FunctionId>) -> ModelResult<f64> {
        let store = self.store;

        // OR: any one available satisfier suffices
        let system_edges: Vec<(Relationship, SystemId)> = self
            .counted(store.incoming(function, RelationshipKind::SystemSatisfies))
            .into_iter()
            .filter_map(|edge| {
                let (system, _) = edge.as_system_satisfies()?;
                self.availability.includes(system).then_some((edge, system))
            })
            .collect();
        let function_edges: Vec<(Relationship, FunctionId)> = self
            .counted(store.incoming(function, RelationshipKind::FunctionSatisfies))
            .into_iter()
            .filter_map(|edge| {
                let (satisfier, _) = edge.as_function_satisfies()?;
                Some((edge, satisfier))
            })
            .collect();

        let or_part = if system_edges.is_empty() && function_edges.is_empty() {
            None
        } else {
            let mut best: f64 = 0.0;
            for (edge, system) in &system_edges {
                best = best.max(self.satisfier_edge_score(edge, *system, path)?);
            }
            for (edge, satisfier) in &function_edges {
                let fraction = self.satisfier_fraction(edge);
                if fraction <= 0.0 {
                    continue;
                }
                best = best.max(fraction * self.satisfaction_on_path(*satisfier, path)?);
            }
            Some(best)
        };

        // AND: every requirement must hold
        let requires = self.counted(
            store.outgoing(NodeRef::Function(function), RelationshipKind::FunctionRequires),
        );
        let and_part = self
            .weakest_link(&requires, path)?
            .map(|shortfall| (1.0 - shortfall).clamp(0.0, 1.0));

        Ok(match (or_part, and_part) {
            (Some(or), Some(and)) => or.min(and),
            (Some(or), None) => or,
            (None, Some(and)) => and,
            (None, None) => 0.0,
        })
    }

    /// A system's satisfaction of a function, discounted by what the system
    /// and this particular satisfaction require
    fn satisfier_edge_score(
        &mut self,
        edge: &Relationship,
        system: SystemId,
        path: &mut Vec<FunctionId>,
    ) -> ModelResult<f64> {
        let fraction = self.satisfier_fraction(edge);
        if fraction <= 0.0 {
            return Ok(0.0);
        }

        let mut requirements = self.counted(
            self.store
                .outgoing(NodeRef::System(system), RelationshipKind::SystemRequires),
        );
        requirements.extend(self.counted(self.store.outgoing(
            NodeRef::Relationship(edge.id),
            RelationshipKind::SystemSatisfactionRequires,
        )));

        let discount = match self.weakest_link(&requirements, path)? {
            Some(shortfall) => (1.0 - shortfall).clamp(0.0, 1.0),
            None => 1.0,
        };
        Ok(fraction * discount)
    }

    /// `max(weight * (1 - satisfaction(required)))` over weighted edges;
    /// `None` when no edge carries a weight
    fn weakest_link(
        &mut self,
        requirements: &[Relationship],
        path: &mut Vec<FunctionId>,
    ) -> ModelResult<Option<f64>> {
        let mut worst: Option<f64> = None;
        for edge in requirements {
            let Some(weight) = self.requirement_weight(edge) else {
                continue;
            };
            let satisfied = self.satisfaction_on_path(edge.edge.target(), path)?;
            let unmet = weight * (1.0 - satisfied);
            worst = Some(worst.map_or(unmet, |w| w.max(unmet)));
        }
        Ok(worst)
    }
}

/// Score every function of an architecture's project
///
/// An architecture with no systems scores 0.0 everywhere. A cycle turns
/// only the functions on or depending on it into errors.
pub fn functional_satisfaction<S: ModelRead + ?Sized>(
    store: &S,
    architecture: ArchitectureId,
    config: &ScoringConfig,
) -> ModelResult<FunctionalSatisfaction> {
    functional_satisfaction_in(store, architecture, None, config)
}

/// [`functional_satisfaction`] restricted to edges that hold in a scenario
pub fn functional_satisfaction_in<S: ModelRead + ?Sized>(
    store: &S,
    architecture: ArchitectureId,
    scenario: Option<ScenarioId>,
    config: &ScoringConfig,
) -> ModelResult<FunctionalSatisfaction> {
    let architecture = store
        .architecture(architecture)
        .ok_or_else(|| ModelError::not_found("architecture", architecture))?;
    if let Some(scenario) = scenario {
        store
            .scenario(scenario)
            .ok_or_else(|| ModelError::not_found("scenario", scenario))?;
    }
    let functions = store.functions(architecture.project);

    debug!(
        architecture = %architecture.id,
        systems = architecture.systems.len(),
        functions = functions.len(),
        scenario = ?scenario,
        "Scoring functional satisfaction"
    );

    if architecture.systems.is_empty() {
        return Ok(functions.into_iter().map(|f| (f.id, Ok(0.0))).collect());
    }

    let mut scorer =
        Scorer::new(store, config.clone()).with_systems(architecture.systems.iter().copied());
    if let Some(scenario) = scenario {
        scorer = scorer.in_scenario(scenario);
    }
    Ok(functions
        .into_iter()
        .map(|f| (f.id, scorer.satisfaction(f.id)))
        .collect())
}

/// Shortfall of every function in a project, drawing on all of its systems
pub fn functional_shortfall<S: ModelRead + ?Sized>(
    store: &S,
    project: ProjectId,
    config: &ScoringConfig,
) -> ModelResult<FunctionalSatisfaction> {
    if store.project(project).is_none() {
        return Err(ModelError::not_found("project", project));
    }
    let mut scorer = Scorer::new(store, config.clone());
    Ok(store
        .functions(project)
        .into_iter()
        .map(|f| (f.id, scorer.shortfall(f.id)))
        .collect())
}

/// Incompatible satisfier pairs whose systems are both in the architecture
pub fn architecture_conflicts<S: ModelRead + ?Sized>(
    store: &S,
    architecture: ArchitectureId,
) -> ModelResult<Vec<IncompatiblePair>> {
    let architecture = store
        .architecture(architecture)
        .ok_or_else(|| ModelError::not_found("architecture", architecture))?;

    let mut pairs = BTreeSet::new();
    for system in &architecture.systems {
        for edge in store.outgoing(NodeRef::System(*system), RelationshipKind::SystemSatisfies) {
            for other in store.incompatible_with(edge.id) {
                let included = store
                    .relationship(other)
                    .and_then(|r| r.as_system_satisfies())
                    .is_some_and(|(s, _)| architecture.contains(s));
                if included {
                    if let Some(pair) = IncompatiblePair::new(edge.id, other) {
                        pairs.insert(pair);
                    }
                }
            }
        }
    }
    Ok(pairs.into_iter().collect())
}
