//! Project command implementation.

use crate::cli::{ProjectAction, ProjectArgs};
use crate::commands::relate::relationship_rows;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::resolve;
use crate::session::Session;
use sysarch_domain::{ModelRead, ModelStore, NamedAttrs};

/// Execute the project command.
pub fn execute_project(args: ProjectArgs, session: &mut Session, formatter: &Formatter) -> Result<()> {
    match args.action {
        ProjectAction::Create { name, description } => {
            create_project(session, name, description, formatter)
        }
        ProjectAction::List => {
            println!("{}", formatter.list(&session.store().projects(), "projects")?);
            Ok(())
        }
        ProjectAction::Show { project } => show_project(session, project.as_deref(), formatter),
        ProjectAction::Delete { project, yes } => delete_project(session, &project, yes, formatter),
    }
}

fn create_project(
    session: &mut Session,
    name: String,
    description: String,
    formatter: &Formatter,
) -> Result<()> {
    let project = session
        .store_mut()
        .create_project(NamedAttrs::named(name).with_description(description))?;
    println!("{}", formatter.created(&project, "project")?);
    Ok(())
}

/// Print every table of a project.
fn show_project(session: &Session, key: Option<&str>, formatter: &Formatter) -> Result<()> {
    let project = session.project(key)?;
    let store = session.store();

    println!("{}", formatter.list(std::slice::from_ref(&project), "projects")?);
    println!("{}", formatter.list(&store.goals(project.id), "goals")?);
    println!("{}", formatter.list(&store.scenarios(project.id), "scenarios")?);
    println!("{}", formatter.list(&store.categories(project.id), "categories")?);
    println!("{}", formatter.list(&store.functions(project.id), "functions")?);
    println!("{}", formatter.list(&store.systems(project.id), "systems")?);
    println!("{}", formatter.list(&store.scales(project.id), "scales")?);
    println!(
        "{}",
        formatter.list(&relationship_rows(store, project.id), "relationships")?
    );
    println!(
        "{}",
        formatter.list(&store.architectures(project.id), "architectures")?
    );
    Ok(())
}

fn delete_project(session: &mut Session, key: &str, yes: bool, formatter: &Formatter) -> Result<()> {
    let project = resolve::project(session.store(), key)?;
    if !yes {
        return Err(CliError::NotPermitted(format!(
            "Deleting '{}' removes everything it owns; pass --yes to confirm",
            project.name
        )));
    }

    session.store_mut().delete_project(project.id)?;
    println!(
        "{}",
        formatter.success(&format!("Deleted project '{}'", project.name))
    );
    Ok(())
}
