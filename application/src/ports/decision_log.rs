//! Decision log port
//!
//! Receives one entry per decision the engine reaches, whether or not the
//! report to the record source succeeded.

use serde::Serialize;
use votegate_domain::{Decision, MessageId, RowId, Tally};

/// A decision and what happened when it was reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionEntry {
    pub message_id: MessageId,
    pub row: RowId,
    pub decision: Decision,
    pub tally: Tally,
    pub reported: bool,
}

/// Sink for decision entries
pub trait DecisionLog: Send + Sync {
    fn record(&self, entry: &DecisionEntry);
}

/// Discards every entry
pub struct NoDecisionLog;

impl DecisionLog for NoDecisionLog {
    fn record(&self, _entry: &DecisionEntry) {}
}
