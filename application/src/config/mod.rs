//! Application-level configuration.
//!
//! These types control how use cases behave:
//!
//! - [`VotingParams`] — voting channel, quorum size, reaction symbols
//! - [`IngestionParams`] — polling cadence and failure backoff

pub mod ingestion_params;
pub mod voting_params;

pub use ingestion_params::IngestionParams;
pub use voting_params::VotingParams;
