//! Workspace command implementation.

use crate::cli::{WorkspaceAction, WorkspaceArgs};
use crate::config::{Config, Workspace};
use crate::error::Result;
use crate::output::{Formatter, NamedRow};

/// Execute the workspace command.
pub fn execute_workspace(args: WorkspaceArgs, config: &mut Config, formatter: &Formatter) -> Result<()> {
    match args.action {
        WorkspaceAction::List => list_workspaces(config, formatter),
        WorkspaceAction::Use { name } => {
            use_workspace(config, name.clone())?;
            config.save()?;
            println!(
                "{}",
                formatter.success(&format!("Switched to workspace '{}'", name))
            );
            Ok(())
        }
        WorkspaceAction::Set {
            name,
            data_file,
            project,
        } => {
            let action = set_workspace(config, name.clone(), Workspace { data_file, project });
            config.save()?;
            println!(
                "{}",
                formatter.success(&format!("{} workspace '{}'", action, name))
            );
            Ok(())
        }
    }
}

fn list_workspaces(config: &Config, formatter: &Formatter) -> Result<()> {
    let rows: Vec<NamedRow> = config
        .workspaces
        .iter()
        .map(|(name, workspace)| NamedRow {
            name: name.clone(),
            detail: match &workspace.project {
                Some(project) => format!("{} [{}]", workspace.data_file.display(), project),
                None => workspace.data_file.display().to_string(),
            },
            active: name == &config.active_workspace,
        })
        .collect();
    println!("{}", formatter.list(&rows, "workspaces")?);
    Ok(())
}

fn use_workspace(config: &mut Config, name: String) -> Result<()> {
    config.switch_workspace(name)
}

/// Returns "Created" or "Updated".
fn set_workspace(config: &mut Config, name: String, workspace: Workspace) -> &'static str {
    let action = if config.workspaces.contains_key(&name) {
        "Updated"
    } else {
        "Created"
    };
    config.set_workspace(name, workspace);
    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_set_and_use_workspace() {
        let mut config = Config::default();
        let naval = Workspace {
            data_file: PathBuf::from("/tmp/naval.json"),
            project: Some("Naval Example".into()),
        };

        assert_eq!(set_workspace(&mut config, "naval".into(), naval.clone()), "Created");
        assert_eq!(set_workspace(&mut config, "naval".into(), naval), "Updated");

        use_workspace(&mut config, "naval".into()).unwrap();
        assert_eq!(config.active_workspace, "naval");
        assert_eq!(
            config.active().unwrap().project.as_deref(),
            Some("Naval Example")
        );
    }

    #[test]
    fn test_use_unknown_workspace() {
        let mut config = Config::default();
        assert!(use_workspace(&mut config, "missing".into()).is_err());
        assert_eq!(config.active_workspace, "default");
    }
}
