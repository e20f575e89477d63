//! Seed command: the "Make Toasts Great Again" demo project.

use crate::cli::SeedArgs;
use crate::commands::scale::add_preset;
use crate::error::Result;
use crate::output::Formatter;
use crate::session::Session;
use sysarch_domain::scale::presets;
use sysarch_domain::{
    Edge, FunctionId, GoalAttrs, ModelRead, ModelStore, NamedAttrs, NewRelationship, NodeAttrs,
    ProjectId,
};
use tracing::info;

/// Name of the demo project.
pub const DEMO_PROJECT: &str = "Make Toasts Great Again";

/// Functions of the demo, in creation order.
const FUNCTIONS: [(&str, &str); 7] = [
    (
        "Better toasts",
        "Make better tasting and looking toasts out of any bread",
    ),
    (
        "Faster toasts",
        "Make toasts in less time and with less variability in duration",
    ),
    ("Easier toasts", "Make it easier to get toast golden brown"),
    ("Unburnt toasts", "Make toasts be golden brown"),
    (
        "Toast robustly",
        "Make toasting insensitive to type of bread, thickness, or temperature",
    ),
    (
        "More toast",
        "Allow for more than 2 toasts to be made at the same time",
    ),
    (
        "Less guessing",
        "Require less guessing from the user for toaster inputs",
    ),
];

/// (requiring, required) pairs judged on the Criticality scale.
const REQUIRES: [(&str, &str); 4] = [
    ("Better toasts", "Unburnt toasts"),
    ("Better toasts", "Toast robustly"),
    ("Easier toasts", "More toast"),
    ("Easier toasts", "Less guessing"),
];

/// Execute the seed command.
pub fn execute_seed(args: SeedArgs, session: &mut Session, formatter: &Formatter) -> Result<()> {
    let existing: Vec<ProjectId> = session
        .store()
        .projects()
        .into_iter()
        .filter(|p| p.name == DEMO_PROJECT)
        .map(|p| p.id)
        .collect();

    if !existing.is_empty() {
        if !args.remake {
            println!(
                "{}",
                formatter.warning(&format!(
                    "'{}' already exists; pass --remake to recreate it",
                    DEMO_PROJECT
                ))
            );
            return Ok(());
        }
        for id in existing {
            session.store_mut().delete_project(id)?;
        }
    }

    let project = seed_demo(session)?;
    println!(
        "{}",
        formatter.success(&format!("Created '{}' ({})", DEMO_PROJECT, project))
    );
    Ok(())
}

/// Build the demo project and return its id.
pub(crate) fn seed_demo(session: &mut Session) -> Result<ProjectId> {
    let store = session.store_mut();
    let project = store
        .create_project(
            NamedAttrs::named(DEMO_PROJECT)
                .with_description("An simple example to test the framework."),
        )?
        .id;
    store.add_goal(
        project,
        GoalAttrs {
            name: "Better Toasting".into(),
            description: "Make better toast, faster and more easily.".into(),
            ..Default::default()
        },
    )?;

    let mut functions: Vec<(&str, FunctionId)> = Vec::with_capacity(FUNCTIONS.len());
    for (name, description) in FUNCTIONS {
        let function = store.add_function(project, NodeAttrs::named(name).with_description(description))?;
        functions.push((name, function.id));
    }
    let id_of = |name: &str| {
        functions
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, id)| *id)
            .ok_or_else(|| sysarch_domain::ModelError::not_found("function", name))
    };

    let criticality = add_preset(session, project, presets::CRITICALITY)?;
    add_preset(session, project, presets::SATISFIABILITY)?;

    let store = session.store_mut();
    for (requiring, required) in REQUIRES {
        store.create_relationship(NewRelationship::new(
            criticality.id,
            Edge::FunctionRequires {
                requiring: id_of(requiring)?,
                required: id_of(required)?,
            },
        ))?;
    }

    info!(project = %project, functions = FUNCTIONS.len(), "Seeded demo project");
    Ok(project)
}
