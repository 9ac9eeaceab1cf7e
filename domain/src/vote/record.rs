//! Per-message vote state

use crate::core::ids::{MessageId, RowId, VoterId};
use crate::vote::decision::{Decision, Quorum};
use crate::vote::intent::VoteIntent;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Vote counts of a single message at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    pub approve: usize,
    pub deny: usize,
}

impl std::fmt::Display for Tally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Approve: {} Deny: {}", self.approve, self.deny)
    }
}

/// Vote state of one votable message
///
/// A voter is in at most one of the two sets. The correlated row is fixed at
/// construction and has no setter.
///
/// # Example
///
/// ```
/// use votegate_domain::RowId;
/// use votegate_domain::vote::{VoteIntent, VoteRecord};
///
/// let mut record = VoteRecord::new("m1", RowId::new(42));
/// record.cast("alice", VoteIntent::Approve);
/// record.cast("alice", VoteIntent::Deny); // switches sides
/// assert_eq!(record.tally().approve, 0);
/// assert_eq!(record.tally().deny, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    message_id: MessageId,
    source_row_id: RowId,
    approvers: HashSet<VoterId>,
    deniers: HashSet<VoterId>,
}

impl VoteRecord {
    pub fn new(message_id: impl Into<MessageId>, source_row_id: RowId) -> Self {
        Self {
            message_id: message_id.into(),
            source_row_id,
            approvers: HashSet::new(),
            deniers: HashSet::new(),
        }
    }

    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }

    pub fn source_row_id(&self) -> RowId {
        self.source_row_id
    }

    pub fn approvers(&self) -> &HashSet<VoterId> {
        &self.approvers
    }

    pub fn deniers(&self) -> &HashSet<VoterId> {
        &self.deniers
    }

    /// Record a vote, moving the voter out of the opposite set
    ///
    /// Returns `true` if the state changed.
    pub fn cast(&mut self, voter: impl Into<VoterId>, intent: VoteIntent) -> bool {
        let voter = voter.into();
        let (target, opposite) = self.sets_mut(intent);
        let switched = opposite.remove(&voter);
        let inserted = target.insert(voter);
        switched || inserted
    }

    /// Withdraw a vote from the given side only
    ///
    /// Retracting never counts as a vote for the other side. Retracting a
    /// vote that was never cast is a no-op and returns `false`.
    pub fn retract(&mut self, voter: &VoterId, intent: VoteIntent) -> bool {
        let (target, _) = self.sets_mut(intent);
        target.remove(voter)
    }

    /// Apply a reaction change: `added` casts, otherwise retracts
    pub fn apply(&mut self, voter: &VoterId, intent: VoteIntent, added: bool) -> bool {
        if added {
            self.cast(voter.clone(), intent)
        } else {
            self.retract(voter, intent)
        }
    }

    pub fn tally(&self) -> Tally {
        Tally {
            approve: self.approvers.len(),
            deny: self.deniers.len(),
        }
    }

    /// The decision this record has reached, if any
    ///
    /// Approval is checked first, so it wins if both sides were somehow at
    /// quorum simultaneously.
    pub fn decision(&self, quorum: Quorum) -> Option<Decision> {
        if quorum.is_reached(self.approvers.len()) {
            Some(Decision::Accepted)
        } else if quorum.is_reached(self.deniers.len()) {
            Some(Decision::Denied)
        } else {
            None
        }
    }

    fn sets_mut(&mut self, intent: VoteIntent) -> (&mut HashSet<VoterId>, &mut HashSet<VoterId>) {
        match intent {
            VoteIntent::Approve => (&mut self.approvers, &mut self.deniers),
            VoteIntent::Deny => (&mut self.deniers, &mut self.approvers),
        }
    }
}
