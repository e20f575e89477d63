//! Architecture, scoring and shortfall commands.

use crate::cli::{ArchitectureAction, ArchitectureArgs, ShortfallArgs};
use crate::commands::relate::describe;
use crate::error::Result;
use crate::output::{ConflictRow, Formatter, ScoreRow};
use crate::resolve;
use crate::session::Session;
use sysarch_domain::scoring::{
    architecture_conflicts, functional_satisfaction_in, functional_shortfall,
};
use sysarch_domain::{
    FunctionalSatisfaction, ModelError, ModelRead, ModelStore, NamedAttrs, ProjectId, Scorer,
};
use tracing::info;

/// Execute the architecture command.
pub fn execute_architecture(
    args: ArchitectureArgs,
    session: &mut Session,
    formatter: &Formatter,
) -> Result<()> {
    let project = session.project(None)?.id;
    match args.action {
        ArchitectureAction::Create {
            name,
            description,
            systems,
        } => {
            let systems = systems
                .iter()
                .map(|key| resolve::system(session.store(), project, key).map(|s| s.id))
                .collect::<Result<Vec<_>>>()?;
            let architecture = session.store_mut().add_architecture(
                project,
                NamedAttrs::named(name).with_description(description),
                systems,
            )?;
            println!("{}", formatter.created(&architecture, "architecture")?);
        }
        ArchitectureAction::AddSystem {
            architecture,
            system,
        } => {
            let architecture = resolve::architecture(session.store(), project, &architecture)?;
            let system = resolve::system(session.store(), project, &system)?;
            session
                .store_mut()
                .add_architecture_system(architecture.id, system.id)?;
            println!(
                "{}",
                formatter.success(&format!(
                    "Added '{}' to '{}'",
                    system.name, architecture.name
                ))
            );
        }
        ArchitectureAction::RemoveSystem {
            architecture,
            system,
        } => {
            let architecture = resolve::architecture(session.store(), project, &architecture)?;
            let system = resolve::system(session.store(), project, &system)?;
            session
                .store_mut()
                .remove_architecture_system(architecture.id, system.id)?;
            println!(
                "{}",
                formatter.success(&format!(
                    "Removed '{}' from '{}'",
                    system.name, architecture.name
                ))
            );
        }
        ArchitectureAction::List => {
            println!(
                "{}",
                formatter.list(&session.store().architectures(project), "architectures")?
            );
        }
        ArchitectureAction::Score {
            architecture,
            scenario,
        } => {
            let rows = score(session, project, &architecture, scenario.as_deref())?;
            println!("{}", formatter.list(&rows, "functions")?);
        }
        ArchitectureAction::Conflicts { architecture } => {
            let rows = conflicts(session, project, &architecture)?;
            println!("{}", formatter.list(&rows, "conflicts")?);
        }
    }
    Ok(())
}

/// Execute the shortfall command.
pub fn execute_shortfall(args: ShortfallArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    let project = session.project(None)?.id;
    let rows = shortfall(session, project, args.scenario.as_deref())?;
    println!("{}", formatter.list(&rows, "functions")?);
    Ok(())
}

/// Functional satisfaction of an architecture, optionally within a scenario.
pub(crate) fn score(
    session: &Session,
    project: ProjectId,
    architecture: &str,
    scenario: Option<&str>,
) -> Result<Vec<ScoreRow>> {
    let store = session.store();
    let architecture = resolve::architecture(store, project, architecture)?;

    let scenario = scenario
        .map(|key| resolve::scenario(store, project, key).map(|s| s.id))
        .transpose()?;
    let results = functional_satisfaction_in(store, architecture.id, scenario, session.scoring())?;

    info!(architecture = %architecture.name, functions = results.len(), "Scored architecture");
    Ok(score_rows(store, results))
}

/// Shortfall of every function of a project, optionally within a scenario.
pub(crate) fn shortfall(
    session: &Session,
    project: ProjectId,
    scenario: Option<&str>,
) -> Result<Vec<ScoreRow>> {
    let store = session.store();
    let results: FunctionalSatisfaction = match scenario {
        None => functional_shortfall(store, project, session.scoring())?,
        Some(key) => {
            let scenario = resolve::scenario(store, project, key)?;
            let mut scorer = Scorer::new(store, session.scoring().clone()).in_scenario(scenario.id);
            store
                .functions(project)
                .into_iter()
                .map(|f| (f.id, scorer.shortfall(f.id)))
                .collect()
        }
    };
    Ok(score_rows(store, results))
}

fn score_rows<S: ModelRead>(store: &S, results: FunctionalSatisfaction) -> Vec<ScoreRow> {
    results
        .into_iter()
        .map(|(function, result)| {
            let (score, error) = match result {
                Ok(score) => (Some(score), None),
                Err(ModelError::CyclicRequirement { .. }) => (None, Some("cycle".to_string())),
                Err(e) => (None, Some(e.to_string())),
            };
            ScoreRow {
                function: function.to_string(),
                name: store.function(function).map(|f| f.name).unwrap_or_default(),
                score,
                error,
            }
        })
        .collect()
}

fn conflicts(session: &Session, project: ProjectId, architecture: &str) -> Result<Vec<ConflictRow>> {
    let store = session.store();
    let architecture = resolve::architecture(store, project, architecture)?;
    let label = |id| {
        store
            .relationship(id)
            .map(|r| describe(store, &r).summary())
            .unwrap_or_default()
    };

    Ok(architecture_conflicts(store, architecture.id)?
        .into_iter()
        .map(|pair| ConflictRow {
            first: pair.first().to_string(),
            first_label: label(pair.first()),
            second: pair.second().to_string(),
            second_label: label(pair.second()),
        })
        .collect())
}
