//! Voting configuration from TOML (`[voting]` section)
//!
//! ```toml
//! [voting]
//! required_votes = 5
//! approve_symbol = "✅"
//! deny_symbol = "❌"
//! confirm_decisions = true
//! ```

use serde::{Deserialize, Serialize};
use votegate_domain::vote::{APPROVE_SYMBOL, DEFAULT_REQUIRED_VOTES, DENY_SYMBOL};

/// Raw voting configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVotingConfig {
    /// Same-intent votes needed to decide
    pub required_votes: usize,
    pub approve_symbol: String,
    pub deny_symbol: String,
    /// Reply under decided messages
    pub confirm_decisions: bool,
}

impl Default for FileVotingConfig {
    fn default() -> Self {
        Self {
            required_votes: DEFAULT_REQUIRED_VOTES,
            approve_symbol: APPROVE_SYMBOL.to_string(),
            deny_symbol: DENY_SYMBOL.to_string(),
            confirm_decisions: true,
        }
    }
}
