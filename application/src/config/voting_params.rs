//! Voting parameters

use votegate_domain::{ChannelId, Quorum, VoteSymbols};

/// Parameters for the decision engine
#[derive(Debug, Clone)]
pub struct VotingParams {
    /// The only channel whose reactions count
    pub voting_channel: ChannelId,
    /// Same-intent votes needed to decide
    pub quorum: Quorum,
    /// Approve / deny reaction symbols
    pub symbols: VoteSymbols,
    /// Reply under the message once a decision has been recorded
    pub confirm_decisions: bool,
}

impl VotingParams {
    pub fn new(voting_channel: impl Into<ChannelId>) -> Self {
        Self {
            voting_channel: voting_channel.into(),
            quorum: Quorum::default(),
            symbols: VoteSymbols::default(),
            confirm_decisions: true,
        }
    }

    pub fn with_quorum(mut self, quorum: Quorum) -> Self {
        self.quorum = quorum;
        self
    }

    pub fn with_symbols(mut self, symbols: VoteSymbols) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn without_confirmation(mut self) -> Self {
        self.confirm_decisions = false;
        self
    }
}
