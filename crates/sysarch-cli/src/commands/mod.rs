//! Command implementations.

pub mod architecture;
pub mod expert;
pub mod import;
pub mod model;
pub mod project;
pub mod relate;
pub mod scale;
pub mod seed;
pub mod vote;
pub mod workspace;

pub use self::architecture::{execute_architecture, execute_shortfall};
pub use self::expert::execute_expert;
pub use self::import::execute_import;
pub use self::model::{
    execute_category, execute_function, execute_goal, execute_scenario, execute_system,
    execute_term,
};
pub use self::project::execute_project;
pub use self::relate::{execute_relate, execute_relationships};
pub use self::scale::execute_scale;
pub use self::seed::execute_seed;
pub use self::vote::{execute_vote, execute_votes};
pub use self::workspace::execute_workspace;

/// An empty in-memory session that is never written to disk.
#[cfg(test)]
pub(crate) fn scratch_session() -> crate::session::Session {
    crate::session::Session::with_store(
        sysarch_store::MemoryStore::new(),
        std::path::PathBuf::from("unused.json"),
        None,
        sysarch_domain::ScoringConfig::default(),
    )
}
