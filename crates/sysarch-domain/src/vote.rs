//! Votes - one expert's timestamped judgment of a relationship

use crate::error::{require_name, ModelResult};
use crate::ids::{ExpertId, LevelId, OrganizationId, RelationshipId, VoteId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current time in milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// How sure the expert is of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// High confidence
    #[default]
    High,
    /// Moderate confidence
    Moderate,
    /// Low confidence
    Low,
}

impl Confidence {
    /// Get the confidence name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
        }
    }
}

impl std::str::FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "0" => Ok(Self::High),
            "moderate" | "1" => Ok(Self::Moderate),
            "low" | "2" => Ok(Self::Low),
            _ => Err(format!("Invalid confidence: {}", s)),
        }
    }
}

/// An assessment of a relationship selecting one level of its scale
///
/// Votes are append-only; older votes stay for audit but only the most
/// recent per expert counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    /// Unique identifier
    pub id: VoteId,
    /// Relationship being judged
    pub relationship: RelationshipId,
    /// Expert who cast it; `None` for anonymous votes
    pub expert: Option<ExpertId>,
    /// Selected level of the relationship's scale
    pub value: LevelId,
    /// Expert's confidence in the vote
    pub confidence: Confidence,
    /// When the vote was cast (ms since epoch)
    pub cast_on: u64,
    /// Explanation of the vote
    pub comments: String,
}

/// Request to cast a vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVote {
    /// Relationship being judged
    pub relationship: RelationshipId,
    /// Voting expert
    #[serde(default)]
    pub expert: Option<ExpertId>,
    /// Selected level
    pub value: LevelId,
    /// Confidence
    #[serde(default)]
    pub confidence: Confidence,
    /// Timestamp; stamped with the current time when absent
    #[serde(default)]
    pub cast_on: Option<u64>,
    /// Comments
    #[serde(default)]
    pub comments: String,
}

impl NewVote {
    /// An anonymous, high-confidence vote cast now
    pub fn new(relationship: RelationshipId, value: LevelId) -> Self {
        Self {
            relationship,
            expert: None,
            value,
            confidence: Confidence::High,
            cast_on: None,
            comments: String::new(),
        }
    }

    /// Attribute the vote to an expert
    pub fn by(mut self, expert: ExpertId) -> Self {
        self.expert = Some(expert);
        self
    }

    /// Set the confidence
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set an explicit timestamp
    pub fn at(mut self, cast_on: u64) -> Self {
        self.cast_on = Some(cast_on);
        self
    }

    /// Materialize the vote
    pub fn into_vote(self) -> Vote {
        Vote {
            id: VoteId::new(),
            relationship: self.relationship,
            expert: self.expert,
            value: self.value,
            confidence: self.confidence,
            cast_on: self.cast_on.unwrap_or_else(now_millis),
            comments: self.comments,
        }
    }
}

/// Most recent vote per expert; anonymous votes share the `None` key
pub type LatestVotes = BTreeMap<Option<ExpertId>, Vote>;

/// Keep only the most recent vote per expert
///
/// Votes are taken in the order given. On equal `cast_on` the vote seen
/// later wins.
pub fn latest_votes<'v>(votes: impl IntoIterator<Item = &'v Vote>) -> LatestVotes {
    let mut latest: LatestVotes = BTreeMap::new();
    for vote in votes {
        match latest.get(&vote.expert) {
            Some(current) if current.cast_on > vote.cast_on => {}
            _ => {
                latest.insert(vote.expert, vote.clone());
            }
        }
    }
    latest
}

/// An organization experts are affiliated with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// Unique identifier
    pub id: OrganizationId,
    /// Organization name
    pub name: String,
    /// Explanation
    pub description: String,
}

impl Organization {
    /// Create an organization
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> ModelResult<Self> {
        let name = name.into();
        require_name("Organization", &name)?;
        Ok(Self {
            id: OrganizationId::new(),
            name,
            description: description.into(),
        })
    }
}

/// Identity and affiliation of a voter; one per user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertProfile {
    /// Unique identifier
    pub id: ExpertId,
    /// User account this profile belongs to
    pub account: String,
    /// Job title
    pub title: String,
    /// Affiliation
    pub organization: Option<OrganizationId>,
    /// Contact phone
    pub phone: String,
}

impl ExpertProfile {
    /// Blank profile for a newly created account
    pub fn for_account(account: impl Into<String>) -> ModelResult<Self> {
        let account = account.into();
        require_name("Account", &account)?;
        Ok(Self {
            id: ExpertId::new(),
            account,
            title: String::new(),
            organization: None,
            phone: String::new(),
        })
    }
}
