//! Reaction events as delivered by the chat transport

use crate::core::ids::{ChannelId, MessageId, VoterId};
use serde::{Deserialize, Serialize};

/// Who produced a reaction, as far as the transport knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionOrigin {
    Human,
    Bot,
    /// Partial payload: the transport did not say whether the user is a bot.
    /// Must be resolved before the event can be counted.
    Unresolved,
}

impl ReactionOrigin {
    pub fn from_bot_flag(is_bot: bool) -> Self {
        if is_bot {
            ReactionOrigin::Bot
        } else {
            ReactionOrigin::Human
        }
    }
}

/// A reaction was added to or removed from a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    pub message_id: MessageId,
    pub channel_id: ChannelId,
    pub voter_id: VoterId,
    pub symbol: String,
    pub added: bool,
    pub origin: ReactionOrigin,
}

impl ReactionEvent {
    /// A reaction added by a human
    pub fn added(
        message_id: impl Into<MessageId>,
        channel_id: impl Into<ChannelId>,
        voter_id: impl Into<VoterId>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            channel_id: channel_id.into(),
            voter_id: voter_id.into(),
            symbol: symbol.into(),
            added: true,
            origin: ReactionOrigin::Human,
        }
    }

    /// A reaction removed by a human
    pub fn removed(
        message_id: impl Into<MessageId>,
        channel_id: impl Into<ChannelId>,
        voter_id: impl Into<VoterId>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            added: false,
            ..Self::added(message_id, channel_id, voter_id, symbol)
        }
    }

    pub fn with_origin(mut self, origin: ReactionOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn is_partial(&self) -> bool {
        self.origin == ReactionOrigin::Unresolved
    }
}
