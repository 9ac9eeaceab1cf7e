//! Vote ledger: message id → vote state
//!
//! The ledger only stores entries that are still votable. A decided message
//! is removed, so "not found" covers both unknown and already-decided
//! messages.

use crate::core::ids::{MessageId, RowId};
use crate::vote::record::VoteRecord;
use std::collections::HashMap;

/// In-memory ledger of open votes
#[derive(Debug, Default)]
pub struct VoteLedger {
    entries: HashMap<MessageId, VoteRecord>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a vote for a freshly posted message
    ///
    /// Returns `false` and leaves the existing entry untouched if the
    /// message is already registered.
    pub fn register(&mut self, message_id: MessageId, source_row_id: RowId) -> bool {
        if self.entries.contains_key(&message_id) {
            return false;
        }
        let record = VoteRecord::new(message_id.clone(), source_row_id);
        self.entries.insert(message_id, record);
        true
    }

    pub fn get(&self, message_id: &MessageId) -> Option<&VoteRecord> {
        self.entries.get(message_id)
    }

    pub fn get_mut(&mut self, message_id: &MessageId) -> Option<&mut VoteRecord> {
        self.entries.get_mut(message_id)
    }

    /// Remove an entry; removing a missing key is a no-op
    pub fn remove(&mut self, message_id: &MessageId) -> Option<VoteRecord> {
        self.entries.remove(message_id)
    }

    pub fn contains(&self, message_id: &MessageId) -> bool {
        self.entries.contains_key(message_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
