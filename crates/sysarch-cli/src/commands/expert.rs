//! Expert command implementation.

use crate::cli::{ExpertAction, ExpertArgs};
use crate::error::Result;
use crate::output::Formatter;
use crate::resolve;
use crate::session::Session;
use sysarch_domain::{ModelRead, ModelStore, NamedAttrs, OrganizationId};

/// Execute the expert command.
pub fn execute_expert(args: ExpertArgs, session: &mut Session, formatter: &Formatter) -> Result<()> {
    match args.action {
        ExpertAction::Create {
            account,
            title,
            phone,
            organization,
        } => {
            let organization = organization
                .map(|name| find_or_add_organization(session, &name))
                .transpose()?;

            let store = session.store_mut();
            let mut profile = store.on_account_created(&account)?;
            profile.title = title;
            profile.phone = phone;
            profile.organization = organization;
            let profile = store.update_expert(profile)?;
            println!("{}", formatter.created(&profile, "expert")?);
        }
        ExpertAction::List => {
            println!("{}", formatter.list(&session.store().experts(), "experts")?);
        }
        ExpertAction::Delete { expert } => {
            let profile = resolve::expert(session.store(), &expert)?;
            session.store_mut().delete_expert(profile.id)?;
            println!(
                "{}",
                formatter.success(&format!(
                    "Deleted expert '{}'; their votes are now anonymous",
                    profile.account
                ))
            );
        }
    }
    Ok(())
}

/// The organization with this name, created if needed.
fn find_or_add_organization(session: &mut Session, name: &str) -> Result<OrganizationId> {
    let existing = session
        .store()
        .organizations()
        .into_iter()
        .find(|o| o.name == name);
    if let Some(organization) = existing {
        return Ok(organization.id);
    }
    Ok(session
        .store_mut()
        .add_organization(NamedAttrs::named(name))?
        .id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::scratch_session;
    use crate::config::OutputFormat;

    fn create(account: &str, organization: Option<&str>) -> ExpertArgs {
        ExpertArgs {
            action: ExpertAction::Create {
                account: account.into(),
                title: "Naval Architect".into(),
                phone: String::new(),
                organization: organization.map(str::to_string),
            },
        }
    }

    #[test]
    fn test_experts_share_organization() {
        let mut session = scratch_session();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        execute_expert(create("alice", Some("Navy Lab")), &mut session, &formatter).unwrap();
        execute_expert(create("bob", Some("Navy Lab")), &mut session, &formatter).unwrap();

        let experts = session.store().experts();
        assert_eq!(experts.len(), 2);
        assert!(experts[0].organization.is_some());
        assert_eq!(experts[0].organization, experts[1].organization);
        assert!(experts.iter().all(|e| e.title == "Naval Architect"));
        assert_eq!(session.store().organizations().len(), 1);
    }

    #[test]
    fn test_one_profile_per_account() {
        let mut session = scratch_session();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        execute_expert(create("alice", None), &mut session, &formatter).unwrap();
        assert!(execute_expert(create("alice", None), &mut session, &formatter).is_err());
    }
}
