//! Voting domain
//!
//! Vote intents, per-message vote records, the quorum threshold and the
//! ledger that holds every open vote.
//!
//! ```text
//! reaction symbol ──► VoteIntent ──► VoteRecord (approvers | deniers)
//!                                         │
//!                                  Quorum reached?
//!                                         │
//!                              Decision (Accepted | Denied)
//! ```

pub mod decision;
pub mod intent;
pub mod ledger;
pub mod record;

pub use decision::{DEFAULT_REQUIRED_VOTES, Decision, Quorum, RecordStatus};
pub use intent::{APPROVE_SYMBOL, DENY_SYMBOL, VoteIntent, VoteSymbols};
pub use ledger::VoteLedger;
pub use record::{Tally, VoteRecord};
