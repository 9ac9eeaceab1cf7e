//! Ledger handle shared between the decision engine and the ingestion loop
//!
//! The ledger sits behind a `std::sync::Mutex`. Guards are never held across
//! an `.await`, so every read-modify-evict sequence done under one guard is
//! atomic with respect to all other events, on any number of worker threads.

use std::sync::{Arc, Mutex, MutexGuard};
use votegate_domain::{MessageId, RowId, VoteLedger, VoteRecord};

/// Cloneable handle to the process-wide vote ledger
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<Mutex<VoteLedger>>,
}

impl SharedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a vote; no-op (returns `false`) if the message is known
    pub fn register(&self, message_id: MessageId, row: RowId) -> bool {
        self.lock().register(message_id, row)
    }

    /// Copy of an entry's current state
    pub fn snapshot(&self, message_id: &MessageId) -> Option<VoteRecord> {
        self.lock().get(message_id).cloned()
    }

    pub fn contains(&self, message_id: &MessageId) -> bool {
        self.lock().contains(message_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Exclusive access for a read-modify-evict sequence
    pub(crate) fn lock(&self) -> MutexGuard<'_, VoteLedger> {
        // Every mutation is a single set operation; a poisoned ledger is still consistent.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
