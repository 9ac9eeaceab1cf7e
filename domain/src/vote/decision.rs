//! Decision outcomes and the quorum threshold

use crate::core::error::DomainError;
use crate::vote::intent::VoteIntent;
use serde::{Deserialize, Serialize};

/// Number of same-intent votes required when nothing is configured
pub const DEFAULT_REQUIRED_VOTES: usize = 5;

/// Terminal outcome of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Accepted,
    Denied,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accepted => "Accepted",
            Decision::Denied => "Denied",
        }
    }

    /// The intent whose quorum produces this decision
    pub fn intent(&self) -> VoteIntent {
        match self {
            Decision::Accepted => VoteIntent::Approve,
            Decision::Denied => VoteIntent::Deny,
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status written back to the record store
///
/// `Posted` is the intermediate status that stops a record from being
/// ingested twice; the other two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordStatus {
    Posted,
    Accepted,
    Denied,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Posted => "Posted",
            RecordStatus::Accepted => "Accepted",
            RecordStatus::Denied => "Denied",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RecordStatus::Posted)
    }
}

impl From<Decision> for RecordStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Accepted => RecordStatus::Accepted,
            Decision::Denied => RecordStatus::Denied,
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of same-intent votes that finalizes a decision
///
/// # Example
///
/// ```
/// use votegate_domain::vote::Quorum;
///
/// let quorum = Quorum::new(3).unwrap();
/// assert!(!quorum.is_reached(2));
/// assert!(quorum.is_reached(3));
/// assert!(Quorum::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Quorum(usize);

impl Quorum {
    pub fn new(required_votes: usize) -> Result<Self, DomainError> {
        if required_votes == 0 {
            return Err(DomainError::InvalidQuorum);
        }
        Ok(Self(required_votes))
    }

    pub fn required_votes(&self) -> usize {
        self.0
    }

    pub fn is_reached(&self, votes: usize) -> bool {
        votes >= self.0
    }
}

impl Default for Quorum {
    fn default() -> Self {
        Self(DEFAULT_REQUIRED_VOTES)
    }
}

impl TryFrom<usize> for Quorum {
    type Error = DomainError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quorum> for usize {
    fn from(quorum: Quorum) -> Self {
        quorum.0
    }
}
