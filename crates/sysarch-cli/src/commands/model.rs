//! Goal, glossary, function, system, scenario and category commands.

use crate::cli::{
    CategoryAction, CategoryArgs, GoalAction, GoalArgs, NodeAction, NodeArgs, ScenarioAction,
    ScenarioArgs, TermAction, TermArgs,
};
use crate::error::Result;
use crate::output::Formatter;
use crate::resolve;
use crate::session::Session;
use sysarch_domain::{
    CategoryAttrs, CategoryId, GoalAttrs, ModelRead, ModelStore, NamedAttrs, NodeAttrs, ProjectId,
    ScenarioAttrs,
};

/// Execute the goal command.
pub fn execute_goal(args: GoalArgs, session: &mut Session, formatter: &Formatter) -> Result<()> {
    let project = session.project(None)?.id;
    match args.action {
        GoalAction::Add {
            name,
            description,
            body,
            terms,
        } => {
            let terms = terms
                .iter()
                .map(|key| resolve::term(session.store(), project, key).map(|t| t.id))
                .collect::<Result<Vec<_>>>()?;
            let goal = session.store_mut().add_goal(
                project,
                GoalAttrs {
                    name,
                    description,
                    body,
                    terms,
                },
            )?;
            println!("{}", formatter.created(&goal, "goal")?);
        }
        GoalAction::List => {
            println!("{}", formatter.list(&session.store().goals(project), "goals")?);
        }
    }
    Ok(())
}

/// Execute the term command.
pub fn execute_term(args: TermArgs, session: &mut Session, formatter: &Formatter) -> Result<()> {
    let project = session.project(None)?.id;
    match args.action {
        TermAction::Add { name, definition } => {
            let term = session
                .store_mut()
                .add_term(project, NamedAttrs::named(name).with_description(definition))?;
            println!("{}", formatter.created(&term, "term")?);
        }
        TermAction::List => {
            println!("{}", formatter.list(&session.store().glossary(project), "terms")?);
        }
    }
    Ok(())
}

fn node_attrs(
    session: &Session,
    project: ProjectId,
    name: String,
    description: String,
    categories: &[String],
) -> Result<NodeAttrs> {
    let categories = categories
        .iter()
        .map(|key| resolve::category(session.store(), project, key).map(|c| c.id))
        .collect::<Result<Vec<CategoryId>>>()?;
    Ok(NodeAttrs {
        name,
        description,
        categories,
    })
}

/// Execute the function command.
pub fn execute_function(args: NodeArgs, session: &mut Session, formatter: &Formatter) -> Result<()> {
    let project = session.project(None)?.id;
    match args.action {
        NodeAction::Add {
            name,
            description,
            categories,
        } => {
            let attrs = node_attrs(session, project, name, description, &categories)?;
            let function = session.store_mut().add_function(project, attrs)?;
            println!("{}", formatter.created(&function, "function")?);
        }
        NodeAction::List => {
            println!(
                "{}",
                formatter.list(&session.store().functions(project), "functions")?
            );
        }
        NodeAction::Delete { key } => {
            let function = resolve::function(session.store(), project, &key)?;
            session.store_mut().delete_function(function.id)?;
            println!(
                "{}",
                formatter.success(&format!("Deleted function '{}'", function.name))
            );
        }
    }
    Ok(())
}

/// Execute the system command.
pub fn execute_system(args: NodeArgs, session: &mut Session, formatter: &Formatter) -> Result<()> {
    let project = session.project(None)?.id;
    match args.action {
        NodeAction::Add {
            name,
            description,
            categories,
        } => {
            let attrs = node_attrs(session, project, name, description, &categories)?;
            let system = session.store_mut().add_system(project, attrs)?;
            println!("{}", formatter.created(&system, "system")?);
        }
        NodeAction::List => {
            println!(
                "{}",
                formatter.list(&session.store().systems(project), "systems")?
            );
        }
        NodeAction::Delete { key } => {
            let system = resolve::system(session.store(), project, &key)?;
            session.store_mut().delete_system(system.id)?;
            println!(
                "{}",
                formatter.success(&format!("Deleted system '{}'", system.name))
            );
        }
    }
    Ok(())
}

/// Execute the scenario command.
pub fn execute_scenario(
    args: ScenarioArgs,
    session: &mut Session,
    formatter: &Formatter,
) -> Result<()> {
    let project = session.project(None)?.id;
    match args.action {
        ScenarioAction::Add {
            name,
            description,
            parent,
        } => {
            let parent = parent
                .map(|key| resolve::scenario(session.store(), project, &key).map(|s| s.id))
                .transpose()?;
            let scenario = session.store_mut().add_scenario(
                project,
                ScenarioAttrs {
                    name,
                    description,
                    parent,
                },
            )?;
            println!("{}", formatter.created(&scenario, "scenario")?);
        }
        ScenarioAction::List => {
            println!(
                "{}",
                formatter.list(&session.store().scenarios(project), "scenarios")?
            );
        }
    }
    Ok(())
}

/// Execute the category command.
pub fn execute_category(
    args: CategoryArgs,
    session: &mut Session,
    formatter: &Formatter,
) -> Result<()> {
    let project = session.project(None)?.id;
    match args.action {
        CategoryAction::Add {
            name,
            kind,
            description,
            parent,
        } => {
            let parent = parent
                .map(|key| resolve::category(session.store(), project, &key).map(|c| c.id))
                .transpose()?;
            let category = session.store_mut().add_category(
                project,
                CategoryAttrs {
                    name,
                    description,
                    parent,
                    kind: kind.into(),
                },
            )?;
            println!("{}", formatter.created(&category, "category")?);
        }
        CategoryAction::List => {
            println!(
                "{}",
                formatter.list(&session.store().categories(project), "categories")?
            );
        }
    }
    Ok(())
}
