//! Application layer for votegate
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ledger;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{IngestionParams, VotingParams};
pub use ledger::SharedLedger;
pub use ports::{
    decision_log::{DecisionEntry, DecisionLog, NoDecisionLog},
    message_channel::{ChannelError, MessageChannel, ReactionStream},
    record_source::{RecordSource, RecordSourceError},
};
pub use use_cases::ingest_records::{IngestError, IngestRecordsUseCase, TickOutcome};
pub use use_cases::run_voting::{RunVotingUseCase, VotingStop, VotingSummary};
pub use use_cases::tally_reaction::{
    IgnoreReason, PendingDecision, TallyOutcome, TallyReactionUseCase,
};
