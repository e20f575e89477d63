//! Vote commands.

use crate::cli::{VoteArgs, VotesArgs};
use crate::error::{CliError, Result};
use crate::output::{Formatter, VoteRow};
use crate::resolve;
use crate::session::Session;
use sysarch_domain::{ModelRead, ModelStore, NewVote, Vote, WeightingScale};

/// Execute the vote command.
pub fn execute_vote(args: VoteArgs, session: &mut Session, formatter: &Formatter) -> Result<()> {
    let project = session.project(None)?.id;
    let store = session.store();

    let relationship = resolve::relationship(store, project, &args.relationship)?;
    let scale = store.scale(relationship.scale).ok_or_else(|| {
        CliError::InvalidInput(format!("Relationship {} has no scale", relationship.id))
    })?;
    let level = resolve::level(&scale, &args.level)?;

    let mut request = NewVote::new(relationship.id, level.id)
        .with_confidence(args.confidence.into());
    request.comments = args.comments;
    if let Some(key) = args.expert {
        request = request.by(resolve::expert(store, &key)?.id);
    }

    let vote = session.store_mut().cast_vote(request)?;
    let row = vote_row(session.store(), &scale, &vote);
    match formatter.format() {
        crate::config::OutputFormat::Table => println!(
            "{}",
            formatter.success(&format!(
                "Voted '{}' ({}) on {}",
                row.level,
                row.value,
                crate::output::short_id(&relationship.id.to_string())
            ))
        ),
        _ => println!("{}", formatter.created(&row, "vote")?),
    }
    Ok(())
}

/// Execute the votes command: the latest vote per expert, or every vote.
pub fn execute_votes(args: VotesArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    let project = session.project(None)?.id;
    let store = session.store();

    let relationship = resolve::relationship(store, project, &args.relationship)?;
    let scale = store.scale(relationship.scale).ok_or_else(|| {
        CliError::InvalidInput(format!("Relationship {} has no scale", relationship.id))
    })?;

    let votes: Vec<Vote> = if args.all {
        store.votes(relationship.id)
    } else {
        store.latest_votes(relationship.id).into_values().collect()
    };
    let rows: Vec<VoteRow> = votes.iter().map(|v| vote_row(store, &scale, v)).collect();
    println!("{}", formatter.list(&rows, "votes")?);
    Ok(())
}

fn vote_row<S: ModelRead>(store: &S, scale: &WeightingScale, vote: &Vote) -> VoteRow {
    let level = scale.level(vote.value);
    VoteRow {
        id: vote.id.to_string(),
        expert: vote
            .expert
            .map(|id| store.expert(id).map(|e| e.account).unwrap_or_else(|| id.to_string())),
        level: level.map(|l| l.name.clone()).unwrap_or_default(),
        value: level.map(|l| l.value).unwrap_or(f64::NAN),
        confidence: vote.confidence.as_str(),
        cast_on: vote.cast_on,
        comments: vote.comments.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConfidenceArg;
    use crate::commands::scratch_session;
    use crate::config::OutputFormat;
    use sysarch_domain::{Edge, NamedAttrs, NewRelationship, NodeAttrs, RelationshipId, ScaleAttrs};

    fn setup() -> (Session, RelationshipId) {
        let mut session = scratch_session();
        let store = session.store_mut();
        let project = store.create_project(NamedAttrs::named("Toast")).unwrap();
        let scale = store.add_scale(project.id, ScaleAttrs::named("MoSCoW")).unwrap();
        store.add_level(scale.id, "Must Have", 1.0).unwrap();
        store.add_level(scale.id, "Could Have", 0.4).unwrap();
        let better = store.add_function(project.id, NodeAttrs::named("Better toasts")).unwrap();
        let unburnt = store.add_function(project.id, NodeAttrs::named("Unburnt toasts")).unwrap();
        let relationship = store
            .create_relationship(NewRelationship::new(
                scale.id,
                Edge::FunctionRequires {
                    requiring: better.id,
                    required: unburnt.id,
                },
            ))
            .unwrap();
        store.on_account_created("alice").unwrap();
        (session, relationship.id)
    }

    fn vote(relationship: RelationshipId, level: &str, expert: Option<&str>) -> VoteArgs {
        VoteArgs {
            relationship: relationship.to_string(),
            level: level.into(),
            expert: expert.map(str::to_string),
            confidence: ConfidenceArg::High,
            comments: String::new(),
        }
    }

    #[test]
    fn test_vote_by_level_name() {
        let (mut session, relationship) = setup();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        execute_vote(vote(relationship, "Must Have", Some("alice")), &mut session, &formatter)
            .unwrap();
        execute_vote(vote(relationship, "Could Have", Some("alice")), &mut session, &formatter)
            .unwrap();
        execute_vote(vote(relationship, "Must Have", None), &mut session, &formatter).unwrap();

        let store = session.store();
        assert_eq!(store.votes(relationship).len(), 3);
        let latest = store.latest_votes(relationship);
        assert_eq!(latest.len(), 2);
    }

    #[test]
    fn test_unknown_level_rejected() {
        let (mut session, relationship) = setup();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let result = execute_vote(vote(relationship, "Won't Have", None), &mut session, &formatter);
        assert!(result.is_err());
        assert!(session.store().votes(relationship).is_empty());
    }

    #[test]
    fn test_unknown_expert_rejected() {
        let (mut session, relationship) = setup();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let result = execute_vote(vote(relationship, "Must Have", Some("bob")), &mut session, &formatter);
        assert!(result.is_err());
    }
}
