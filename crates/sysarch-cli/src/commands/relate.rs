//! Relationship commands.

use crate::cli::{EdgeOpts, RelateAction, RelateArgs};
use crate::error::{CliError, Result};
use crate::output::{Formatter, RelationshipRow};
use crate::resolve;
use crate::session::Session;
use sysarch_domain::{
    Edge, ModelRead, ModelStore, NewRelationship, NodeRef, ProjectId, Relationship,
};

/// Execute the relate command.
pub fn execute_relate(args: RelateArgs, session: &mut Session, formatter: &Formatter) -> Result<()> {
    let project = session.project(None)?.id;
    let store = session.store();

    let (edge, opts) = match args.action {
        RelateAction::FunctionRequires {
            requiring,
            required,
            opts,
        } => (
            Edge::FunctionRequires {
                requiring: resolve::function(store, project, &requiring)?.id,
                required: resolve::function(store, project, &required)?.id,
            },
            opts,
        ),
        RelateAction::FunctionSatisfies {
            satisfier,
            satisfied,
            opts,
        } => (
            Edge::FunctionSatisfies {
                satisfier: resolve::function(store, project, &satisfier)?.id,
                satisfied: resolve::function(store, project, &satisfied)?.id,
            },
            opts,
        ),
        RelateAction::SystemRequires {
            system,
            function,
            opts,
        } => (
            Edge::SystemRequires {
                requiring: resolve::system(store, project, &system)?.id,
                required: resolve::function(store, project, &function)?.id,
            },
            opts,
        ),
        RelateAction::SystemSatisfies {
            system,
            function,
            opts,
        } => (
            Edge::SystemSatisfies {
                satisfier: resolve::system(store, project, &system)?.id,
                satisfied: resolve::function(store, project, &function)?.id,
            },
            opts,
        ),
        RelateAction::SatisfactionRequires {
            relationship,
            function,
            opts,
        } => (
            Edge::SystemSatisfactionRequires {
                relationship: resolve::relationship(store, project, &relationship)?.id,
                required: resolve::function(store, project, &function)?.id,
            },
            opts,
        ),
        RelateAction::Incompatible {
            first,
            second,
            remove,
        } => return mark_incompatible(session, project, &first, &second, remove, formatter),
    };

    let request = new_relationship(session, project, edge, opts)?;
    let relationship = session.store_mut().create_relationship(request)?;
    let row = describe(session.store(), &relationship);
    println!("{}", formatter.created(&row, "relationship")?);
    Ok(())
}

/// Execute the relationships listing.
pub fn execute_relationships(session: &Session, formatter: &Formatter) -> Result<()> {
    let project = session.project(None)?.id;
    println!(
        "{}",
        formatter.list(&relationship_rows(session.store(), project), "relationships")?
    );
    Ok(())
}

fn new_relationship(
    session: &Session,
    project: ProjectId,
    edge: Edge,
    opts: EdgeOpts,
) -> Result<NewRelationship> {
    let store = session.store();
    let scale = resolve::scale(store, project, &opts.scale)?;
    let mut request = NewRelationship::new(scale.id, edge).with_notes(opts.notes);
    if let Some(key) = opts.scenario {
        request = request.in_scenario(resolve::scenario(store, project, &key)?.id);
    }
    Ok(request)
}

fn mark_incompatible(
    session: &mut Session,
    project: ProjectId,
    first: &str,
    second: &str,
    remove: bool,
    formatter: &Formatter,
) -> Result<()> {
    let a = resolve::relationship(session.store(), project, first)?;
    let b = resolve::relationship(session.store(), project, second)?;
    if a.id == b.id {
        return Err(CliError::InvalidInput(
            "A relationship cannot be incompatible with itself".to_string(),
        ));
    }

    let store = session.store_mut();
    if remove {
        store.unmark_incompatible(a.id, b.id)?;
    } else {
        store.mark_incompatible(a.id, b.id)?;
    }

    let store = session.store();
    let message = format!(
        "{} '{}' and '{}'",
        if remove { "Compatible again:" } else { "Incompatible:" },
        describe(store, &a).summary(),
        describe(store, &b).summary()
    );
    println!("{}", formatter.success(&message));
    Ok(())
}

/// Display name of an edge's source node.
pub(crate) fn node_name<S: ModelRead>(store: &S, node: NodeRef) -> String {
    match node {
        NodeRef::Function(id) => store
            .function(id)
            .map(|f| f.name)
            .unwrap_or_else(|| id.to_string()),
        NodeRef::System(id) => store
            .system(id)
            .map(|s| s.name)
            .unwrap_or_else(|| id.to_string()),
        NodeRef::Relationship(id) => store
            .relationship(id)
            .map(|r| describe(store, &r).summary())
            .unwrap_or_else(|| id.to_string()),
    }
}

/// Resolve a relationship's endpoints to names.
pub(crate) fn describe<S: ModelRead>(store: &S, relationship: &Relationship) -> RelationshipRow {
    let target = relationship.edge.target();
    RelationshipRow {
        id: relationship.id.to_string(),
        kind: relationship.kind().as_str(),
        source: node_name(store, relationship.edge.source()),
        target: store
            .function(target)
            .map(|f| f.name)
            .unwrap_or_else(|| target.to_string()),
        scale: store
            .scale(relationship.scale)
            .map(|s| s.name)
            .unwrap_or_default(),
    }
}

/// Every relationship of a project, described.
pub(crate) fn relationship_rows<S: ModelRead>(store: &S, project: ProjectId) -> Vec<RelationshipRow> {
    resolve::relationships(store, project)
        .iter()
        .map(|r| describe(store, r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::scratch_session;
    use crate::config::OutputFormat;
    use sysarch_domain::{NamedAttrs, NodeAttrs, RelationshipKind, ScaleAttrs};

    fn naval() -> Session {
        let mut session = scratch_session();
        let store = session.store_mut();
        let project = store
            .create_project(NamedAttrs::named("Naval Example"))
            .unwrap();
        let scale = store.add_scale(project.id, ScaleAttrs::named("Satisfiability")).unwrap();
        store.add_level(scale.id, "Full", 1.0).unwrap();
        store.add_function(project.id, NodeAttrs::named("Detect Target")).unwrap();
        store.add_function(project.id, NodeAttrs::named("Track")).unwrap();
        store.add_system(project.id, NodeAttrs::named("Radar")).unwrap();
        store.add_system(project.id, NodeAttrs::named("Sonar")).unwrap();
        session
    }

    fn opts() -> EdgeOpts {
        EdgeOpts {
            scale: "Satisfiability".into(),
            scenario: None,
            notes: String::new(),
        }
    }

    fn satisfies(session: &mut Session, system: &str) -> String {
        let args = RelateArgs {
            action: RelateAction::SystemSatisfies {
                system: system.into(),
                function: "Detect Target".into(),
                opts: opts(),
            },
        };
        execute_relate(args, session, &Formatter::new(OutputFormat::Quiet, false)).unwrap();
        let project = session.project(None).unwrap().id;
        relationship_rows(session.store(), project)
            .into_iter()
            .find(|r| r.source == system)
            .map(|r| r.id)
            .unwrap()
    }

    #[test]
    fn test_relate_resolves_names() {
        let mut session = naval();
        let args = RelateArgs {
            action: RelateAction::FunctionRequires {
                requiring: "Detect Target".into(),
                required: "Track".into(),
                opts: opts(),
            },
        };
        execute_relate(args, &mut session, &Formatter::new(OutputFormat::Quiet, false)).unwrap();

        let project = session.project(None).unwrap().id;
        let rows = relationship_rows(session.store(), project);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, RelationshipKind::FunctionRequires.as_str());
        assert_eq!(rows[0].source, "Detect Target");
        assert_eq!(rows[0].target, "Track");
        assert_eq!(rows[0].scale, "Satisfiability");
    }

    #[test]
    fn test_satisfaction_requires_names_parent_edge() {
        let mut session = naval();
        let radar = satisfies(&mut session, "Radar");
        let args = RelateArgs {
            action: RelateAction::SatisfactionRequires {
                relationship: radar,
                function: "Track".into(),
                opts: opts(),
            },
        };
        execute_relate(args, &mut session, &Formatter::new(OutputFormat::Quiet, false)).unwrap();

        let project = session.project(None).unwrap().id;
        let row = relationship_rows(session.store(), project)
            .into_iter()
            .find(|r| r.kind == RelationshipKind::SystemSatisfactionRequires.as_str())
            .unwrap();
        assert_eq!(row.source, "Radar satisfies Detect Target");
        assert_eq!(row.target, "Track");
    }

    #[test]
    fn test_incompatible_round_trip() {
        let mut session = naval();
        let radar = satisfies(&mut session, "Radar");
        let sonar = satisfies(&mut session, "Sonar");
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let project = session.project(None).unwrap().id;

        mark_incompatible(&mut session, project, &radar, &sonar, false, &formatter).unwrap();
        let radar_id = resolve::relationship(session.store(), project, &radar).unwrap().id;
        assert_eq!(session.store().incompatible_with(radar_id).len(), 1);

        mark_incompatible(&mut session, project, &sonar, &radar, true, &formatter).unwrap();
        assert!(session.store().incompatible_with(radar_id).is_empty());

        let same = mark_incompatible(&mut session, project, &radar, &radar, false, &formatter);
        assert!(matches!(same, Err(CliError::InvalidInput(_))));
    }
}
