//! Message channel port
//!
//! Defines how the application posts votable units, learns about reactions
//! and replies in the voting channel.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use votegate_domain::{MessageId, ReactionEvent, ReactionOrigin, VotableUnit, VoterId};

/// Errors that can occur during channel operations
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed payload: {0}")]
    Malformed(String),
}

/// Chat channel where applications are voted on
#[async_trait]
pub trait MessageChannel: Send + Sync {
    /// Verify credentials and return the identity the adapter posts as
    async fn authenticate(&self) -> Result<VoterId, ChannelError>;

    /// Post a unit and return its message id
    ///
    /// Returns as soon as the message exists; reactions are added separately.
    async fn post_unit(&self, unit: &VotableUnit) -> Result<MessageId, ChannelError>;

    /// Add the unit's reaction affordances to a posted message
    async fn add_affordances(
        &self,
        message_id: &MessageId,
        unit: &VotableUnit,
    ) -> Result<(), ChannelError>;

    /// Look up whether a user is a human, for partial reaction payloads
    async fn resolve_origin(&self, voter: &VoterId) -> Result<ReactionOrigin, ChannelError>;

    /// Reply under a message
    async fn reply_to(&self, message_id: &MessageId, text: &str) -> Result<(), ChannelError>;
}

/// Handle for receiving reaction events from a channel transport.
///
/// Wraps an `mpsc::Receiver<ReactionEvent>`. The sequence ends only when the
/// transport gives up for good; it cannot be restarted.
pub struct ReactionStream {
    pub receiver: mpsc::Receiver<ReactionEvent>,
}

impl ReactionStream {
    pub fn new(receiver: mpsc::Receiver<ReactionEvent>) -> Self {
        Self { receiver }
    }

    /// Create a connected sender / stream pair
    pub fn channel(buffer: usize) -> (mpsc::Sender<ReactionEvent>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self::new(rx))
    }

    pub async fn next(&mut self) -> Option<ReactionEvent> {
        self.receiver.recv().await
    }
}
