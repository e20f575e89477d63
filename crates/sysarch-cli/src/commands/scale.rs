//! Weighting scale command implementation.

use crate::cli::{ScaleAction, ScaleArgs};
use crate::error::{CliError, Result};
use crate::output::{Formatter, NamedRow};
use crate::resolve;
use crate::session::Session;
use sysarch_domain::scale::presets::{self, Preset};
use sysarch_domain::{ModelRead, ModelStore, ProjectId, ScaleAttrs, WeightingScale};

/// Execute the scale command.
pub fn execute_scale(args: ScaleArgs, session: &mut Session, formatter: &Formatter) -> Result<()> {
    match args.action {
        ScaleAction::Preset { name: None } => {
            let rows: Vec<NamedRow> = presets::ALL
                .iter()
                .map(|preset| NamedRow {
                    name: preset.name.to_string(),
                    detail: preset
                        .levels
                        .iter()
                        .map(|(level, value)| format!("{} ({})", level, value))
                        .collect::<Vec<_>>()
                        .join(", "),
                    active: false,
                })
                .collect();
            println!("{}", formatter.list(&rows, "presets")?);
            Ok(())
        }
        ScaleAction::Preset { name: Some(name) } => {
            let project = session.project(None)?.id;
            let preset = presets::find(&name).ok_or_else(|| {
                CliError::InvalidInput(format!(
                    "Unknown preset '{}'; run 'scale preset' to list them",
                    name
                ))
            })?;
            let scale = add_preset(session, project, preset)?;
            println!("{}", formatter.created(&scale, "scale")?);
            Ok(())
        }
        ScaleAction::Add {
            name,
            description,
            criteria,
        } => {
            let project = session.project(None)?.id;
            let scale = session.store_mut().add_scale(
                project,
                ScaleAttrs {
                    name,
                    description,
                    criteria,
                },
            )?;
            println!("{}", formatter.created(&scale, "scale")?);
            Ok(())
        }
        ScaleAction::Level { scale, name, value } => {
            let project = session.project(None)?.id;
            let scale = resolve::scale(session.store(), project, &scale)?;
            let level = session.store_mut().add_level(scale.id, &name, value)?;
            println!("{}", formatter.created(&level, "level")?);
            Ok(())
        }
        ScaleAction::List => {
            let project = session.project(None)?.id;
            println!("{}", formatter.list(&session.store().scales(project), "scales")?);
            Ok(())
        }
    }
}

/// Create a scale with the levels of a preset.
pub(crate) fn add_preset(
    session: &mut Session,
    project: ProjectId,
    preset: Preset,
) -> Result<WeightingScale> {
    let store = session.store_mut();
    let scale = store.add_scale(
        project,
        ScaleAttrs::named(preset.name).with_description(preset.description),
    )?;
    for (name, value) in preset.levels {
        store.add_level(scale.id, name, *value)?;
    }
    store
        .scale(scale.id)
        .ok_or_else(|| sysarch_domain::ModelError::not_found("scale", scale.id).into())
}
