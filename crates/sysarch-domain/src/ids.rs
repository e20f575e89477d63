//! Typed identifiers for every entity in a project model
//!
//! Each identifier wraps a UUIDv7 so ids generated in sequence sort
//! chronologically and iteration over id-keyed maps is deterministic.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new UUIDv7-based identifier
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Create an identifier from a raw u128 value
            pub fn from_value(value: u128) -> Self {
                Self(Uuid::from_u128(value))
            }

            /// Parse an identifier from its hyphenated string form
            pub fn from_string(s: &str) -> Result<Self, String> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|e| format!("Invalid {} id '{}': {}", $label, s, e))
            }

            /// Get the raw u128 value
            pub fn value(&self) -> u128 {
                self.0.as_u128()
            }

            /// Name of the entity kind this id refers to
            pub fn kind() -> &'static str {
                $label
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_string(s)
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`Project`](crate::Project)
    ProjectId,
    "project"
);
entity_id!(
    /// Identifier of a [`Goal`](crate::Goal)
    GoalId,
    "goal"
);
entity_id!(
    /// Identifier of a glossary [`Term`](crate::Term)
    TermId,
    "term"
);
entity_id!(
    /// Identifier of a [`Scenario`](crate::Scenario)
    ScenarioId,
    "scenario"
);
entity_id!(
    /// Identifier of a [`Category`](crate::Category)
    CategoryId,
    "category"
);
entity_id!(
    /// Identifier of a [`Function`](crate::Function)
    FunctionId,
    "function"
);
entity_id!(
    /// Identifier of a [`System`](crate::System)
    SystemId,
    "system"
);
entity_id!(
    /// Identifier of a [`WeightingScale`](crate::WeightingScale)
    ScaleId,
    "scale"
);
entity_id!(
    /// Identifier of a [`WeightLevel`](crate::WeightLevel)
    LevelId,
    "level"
);
entity_id!(
    /// Identifier of a [`Relationship`](crate::Relationship)
    RelationshipId,
    "relationship"
);
entity_id!(
    /// Identifier of a [`Vote`](crate::Vote)
    VoteId,
    "vote"
);
entity_id!(
    /// Identifier of an [`ExpertProfile`](crate::ExpertProfile)
    ExpertId,
    "expert"
);
entity_id!(
    /// Identifier of an [`Organization`](crate::Organization)
    OrganizationId,
    "organization"
);
entity_id!(
    /// Identifier of a [`SystemArchitecture`](crate::SystemArchitecture)
    ArchitectureId,
    "architecture"
);


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: id ordering matches u128 ordering
        #[test]
        fn test_id_ordering_property(a: u128, b: u128) {
            let id_a = RelationshipId::from_value(a);
            let id_b = RelationshipId::from_value(b);

            prop_assert_eq!(id_a < id_b, a < b);
            prop_assert_eq!(id_a == id_b, a == b);
        }

        /// Property: round-trip through string preserves the id
        #[test]
        fn test_id_string_roundtrip(value: u128) {
            let id = FunctionId::from_value(value);
            match FunctionId::from_string(&id.to_string()) {
                Ok(parsed) => prop_assert_eq!(id, parsed),
                Err(e) => return Err(TestCaseError::fail(e)),
            }
        }
    }
}
