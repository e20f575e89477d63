//! Resolve user-supplied keys (id, id fragment, or name) to model entities.

use crate::error::{CliError, Result};
use sysarch_domain::{
    Category, ExpertProfile, Function, ModelError, ModelRead, Project, ProjectId, Relationship,
    Scenario, System, SystemArchitecture, Term, WeightLevel, WeightingScale,
};

/// Shortest id fragment accepted as a key.
const MIN_FRAGMENT: usize = 4;

/// Pick the single item whose id equals, starts with or ends with `key`,
/// or failing that, whose name equals `key`.
fn pick<T>(
    entity: &'static str,
    key: &str,
    items: Vec<T>,
    id: impl Fn(&T) -> String,
    name: impl Fn(&T) -> &str,
) -> Result<T> {
    let key = key.trim();

    let (by_id, rest): (Vec<T>, Vec<T>) = items.into_iter().partition(|item| {
        let id = id(item);
        id == key || (key.len() >= MIN_FRAGMENT && (id.starts_with(key) || id.ends_with(key)))
    });
    let mut matches = if by_id.is_empty() {
        rest.into_iter().filter(|item| name(item) == key).collect()
    } else {
        by_id
    };

    match matches.len() {
        0 => Err(ModelError::not_found(entity, key).into()),
        1 => Ok(matches.remove(0)),
        n => Err(CliError::InvalidInput(format!(
            "'{}' matches {} {}s; use an id instead",
            key, n, entity
        ))),
    }
}

/// Resolve a project.
pub fn project<S: ModelRead>(store: &S, key: &str) -> Result<Project> {
    pick("project", key, store.projects(), |p| p.id.to_string(), |p| p.name.as_str())
}

/// Resolve a function of a project.
pub fn function<S: ModelRead>(store: &S, project: ProjectId, key: &str) -> Result<Function> {
    pick(
        "function",
        key,
        store.functions(project),
        |f| f.id.to_string(),
        |f| f.name.as_str(),
    )
}

/// Resolve a system of a project.
pub fn system<S: ModelRead>(store: &S, project: ProjectId, key: &str) -> Result<System> {
    pick(
        "system",
        key,
        store.systems(project),
        |s| s.id.to_string(),
        |s| s.name.as_str(),
    )
}

/// Resolve a glossary term of a project.
pub fn term<S: ModelRead>(store: &S, project: ProjectId, key: &str) -> Result<Term> {
    pick(
        "term",
        key,
        store.glossary(project),
        |t| t.id.to_string(),
        |t| t.name.as_str(),
    )
}

/// Resolve a scenario of a project.
pub fn scenario<S: ModelRead>(store: &S, project: ProjectId, key: &str) -> Result<Scenario> {
    pick(
        "scenario",
        key,
        store.scenarios(project),
        |s| s.id.to_string(),
        |s| s.name.as_str(),
    )
}

/// Resolve a category of a project.
pub fn category<S: ModelRead>(store: &S, project: ProjectId, key: &str) -> Result<Category> {
    pick(
        "category",
        key,
        store.categories(project),
        |c| c.id.to_string(),
        |c| c.name.as_str(),
    )
}

/// Resolve a weighting scale of a project.
pub fn scale<S: ModelRead>(store: &S, project: ProjectId, key: &str) -> Result<WeightingScale> {
    pick(
        "scale",
        key,
        store.scales(project),
        |s| s.id.to_string(),
        |s| s.name.as_str(),
    )
}

/// Resolve a level of a scale.
pub fn level(scale: &WeightingScale, key: &str) -> Result<WeightLevel> {
    pick(
        "level",
        key,
        scale.levels.clone(),
        |l| l.id.to_string(),
        |l| l.name.as_str(),
    )
}

/// Resolve an architecture of a project.
pub fn architecture<S: ModelRead>(
    store: &S,
    project: ProjectId,
    key: &str,
) -> Result<SystemArchitecture> {
    pick(
        "architecture",
        key,
        store.architectures(project),
        |a| a.id.to_string(),
        |a| a.name.as_str(),
    )
}

/// Resolve an expert by id or account name.
pub fn expert<S: ModelRead>(store: &S, key: &str) -> Result<ExpertProfile> {
    pick(
        "expert",
        key,
        store.experts(),
        |e| e.id.to_string(),
        |e| e.account.as_str(),
    )
}

/// Resolve a relationship of a project by id or id fragment.
pub fn relationship<S: ModelRead>(store: &S, project: ProjectId, key: &str) -> Result<Relationship> {
    pick(
        "relationship",
        key,
        relationships(store, project),
        |r| r.id.to_string(),
        |_| "",
    )
}

/// Every relationship of a project, grouped by source node.
pub fn relationships<S: ModelRead>(store: &S, project: ProjectId) -> Vec<Relationship> {
    let mut all = Vec::new();
    for function in store.functions(project) {
        all.extend(store.function_requires(function.id));
        all.extend(store.function_satisfies(function.id));
    }
    for system in store.systems(project) {
        all.extend(store.system_requires(system.id));
        let satisfies = store.system_satisfies(system.id);
        for edge in &satisfies {
            all.extend(store.satisfaction_requires(edge.id));
        }
        all.extend(satisfies);
    }
    all
}
