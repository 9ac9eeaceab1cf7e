//! Domain layer for votegate
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Votable unit
//!
//! Every pending application is posted once to the voting channel, captioned
//! with its row number and given two reaction affordances.
//!
//! ## Ledger
//!
//! Open votes live in a [`VoteLedger`]. A message leaves the ledger the
//! moment one side reaches the [`Quorum`]; absence is the terminal state.

pub mod core;
pub mod reaction;
pub mod submission;
pub mod vote;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    ids::{ChannelId, MessageId, RowId, VoterId},
};
pub use reaction::{ReactionEvent, ReactionOrigin};
pub use submission::{ApplicationRecord, RecordField, VotableUnit};
pub use vote::{
    Decision, Quorum, RecordStatus, Tally, VoteIntent, VoteLedger, VoteRecord, VoteSymbols,
};
