//! Discord REST and gateway payloads
//!
//! Only the fields votegate reads or writes are modelled; everything else in
//! Discord's objects is ignored on deserialization.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use votegate_domain::{ReactionEvent, ReactionOrigin, VotableUnit};

// ==================== REST ====================

/// Embed accent color
pub const EMBED_COLOR: u32 = 0x5865F2;

const MAX_TITLE: usize = 256;
const MAX_FIELDS: usize = 25;
const MAX_FIELD_NAME: usize = 256;
const MAX_FIELD_VALUE: usize = 1024;
const MAX_FOOTER: usize = 2048;

/// Discord rejects empty field names and values
const BLANK: &str = "\u{200b}";

/// Body of `POST /channels/{id}/messages`
#[derive(Debug, Default, Serialize)]
pub struct CreateMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_reference: Option<MessageReference>,
}

impl CreateMessage {
    /// A single-embed message for a votable unit
    pub fn for_unit(unit: &VotableUnit) -> Self {
        Self {
            embeds: vec![Embed::for_unit(unit)],
            ..Default::default()
        }
    }

    /// A plain-text reply to another message
    pub fn reply(message_id: &str, text: &str) -> Self {
        Self {
            content: Some(text.to_string()),
            message_reference: Some(MessageReference {
                message_id: message_id.to_string(),
                fail_if_not_exists: false,
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
}

impl Embed {
    pub fn for_unit(unit: &VotableUnit) -> Self {
        Self {
            title: clip(&unit.title, MAX_TITLE),
            color: EMBED_COLOR,
            fields: unit
                .fields
                .iter()
                .take(MAX_FIELDS)
                .map(|f| EmbedField {
                    name: clip(&f.name, MAX_FIELD_NAME),
                    value: clip(&f.value, MAX_FIELD_VALUE),
                    inline: f.inline,
                })
                .collect(),
            footer: EmbedFooter {
                text: clip(&unit.caption, MAX_FOOTER),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct MessageReference {
    pub message_id: String,
    pub fail_if_not_exists: bool,
}

/// Message object (subset)
#[derive(Debug, Deserialize)]
pub struct MessageObject {
    pub id: String,
}

/// User object (subset)
#[derive(Debug, Clone, Deserialize)]
pub struct UserObject {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

/// Error body returned with non-2xx responses
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub retry_after: Option<f64>,
}

/// Truncate to `max` characters, substituting a blank for empty text
fn clip(text: &str, max: usize) -> String {
    if text.trim().is_empty() {
        return BLANK.to_string();
    }
    match text.char_indices().nth(max) {
        Some((end, _)) => {
            let mut clipped: String = text[..end].chars().take(max - 1).collect();
            clipped.push('…');
            clipped
        }
        None => text.to_string(),
    }
}

// ==================== Gateway ====================

pub mod opcode {
    pub const DISPATCH: u8 = 0;
    pub const HEARTBEAT: u8 = 1;
    pub const IDENTIFY: u8 = 2;
    pub const RECONNECT: u8 = 7;
    pub const INVALID_SESSION: u8 = 9;
    pub const HELLO: u8 = 10;
    pub const HEARTBEAT_ACK: u8 = 11;
}

/// GUILDS | GUILD_MESSAGE_REACTIONS
pub const INTENTS: u64 = (1 << 0) | (1 << 10);

/// Close codes after which reconnecting cannot help
const FATAL_CLOSE_CODES: [u16; 6] = [4004, 4010, 4011, 4012, 4013, 4014];

pub fn is_fatal_close(code: u16) -> bool {
    FATAL_CLOSE_CODES.contains(&code)
}

/// Gateway frame envelope
#[derive(Debug, Deserialize)]
pub struct GatewayPayload {
    pub op: u8,
    #[serde(default)]
    pub d: Value,
    #[serde(default)]
    pub s: Option<u64>,
    #[serde(default)]
    pub t: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Hello {
    pub heartbeat_interval: u64,
}

#[derive(Debug, Deserialize)]
pub struct Ready {
    pub user: UserObject,
}

#[derive(Debug, Deserialize)]
pub struct EmojiObject {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MemberObject {
    #[serde(default)]
    pub user: Option<UserObject>,
}

/// `MESSAGE_REACTION_ADD` / `MESSAGE_REACTION_REMOVE` data
#[derive(Debug, Deserialize)]
pub struct ReactionPayload {
    pub user_id: String,
    pub channel_id: String,
    pub message_id: String,
    pub emoji: EmojiObject,
    #[serde(default)]
    pub member: Option<MemberObject>,
}

impl ReactionPayload {
    /// Convert to a domain event; `None` if the emoji has no name
    ///
    /// Remove events carry no member object, so their origin is unresolved.
    pub fn into_event(self, added: bool) -> Option<ReactionEvent> {
        let symbol = self.emoji.name?;
        let origin = self
            .member
            .and_then(|m| m.user)
            .map(|u| ReactionOrigin::from_bot_flag(u.bot))
            .unwrap_or(ReactionOrigin::Unresolved);
        let event = if added {
            ReactionEvent::added(self.message_id, self.channel_id, self.user_id, symbol)
        } else {
            ReactionEvent::removed(self.message_id, self.channel_id, self.user_id, symbol)
        };
        Some(event.with_origin(origin))
    }
}

pub fn identify(token: &str) -> Value {
    json!({
        "op": opcode::IDENTIFY,
        "d": {
            "token": token,
            "intents": INTENTS,
            "properties": {
                "os": std::env::consts::OS,
                "browser": "votegate",
                "device": "votegate"
            }
        }
    })
}

pub fn heartbeat(sequence: Option<u64>) -> Value {
    json!({ "op": opcode::HEARTBEAT, "d": sequence })
}

#[cfg(test)]
mod tests {
    use super::*;
    use votegate_domain::{ApplicationRecord, RecordField, RowId, VoteSymbols};

    #[test]
    fn test_embed_for_unit() {
        let record = ApplicationRecord::new(RowId::new(42))
            .with_field(RecordField::new("Name", "Ada").inline())
            .with_field(RecordField::new("Notes", ""));
        let unit = VotableUnit::for_record(&record, &VoteSymbols::default());
        let body = serde_json::to_value(CreateMessage::for_unit(&unit)).unwrap();

        let embed = &body["embeds"][0];
        assert_eq!(embed["footer"]["text"], "Sheet Row #42");
        assert_eq!(embed["fields"][0]["inline"], true);
        assert_eq!(embed["fields"][1]["value"], BLANK);
        assert!(body.get("content").is_none());
        assert!(body.get("message_reference").is_none());
    }

    #[test]
    fn test_reply_body() {
        let body = serde_json::to_value(CreateMessage::reply("99", "done")).unwrap();
        assert_eq!(body["content"], "done");
        assert_eq!(body["message_reference"]["message_id"], "99");
        assert!(body.get("embeds").is_none());
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("abcdef", 4), "abc…");
        assert_eq!(clip("✅✅✅✅✅", 3).chars().count(), 3);
        assert_eq!(clip("  ", 3), BLANK);
    }

    #[test]
    fn test_reaction_add_with_member() {
        let data = json!({
            "user_id": "u1",
            "channel_id": "c1",
            "message_id": "m1",
            "guild_id": "g1",
            "emoji": {"id": null, "name": "✅"},
            "member": {"user": {"id": "u1", "bot": false}}
        });
        let payload: ReactionPayload = serde_json::from_value(data).unwrap();
        let event = payload.into_event(true).unwrap();

        assert!(event.added);
        assert_eq!(event.origin, ReactionOrigin::Human);
        assert_eq!(event.symbol, "✅");
        assert_eq!(event.channel_id.as_str(), "c1");
    }

    #[test]
    fn test_reaction_remove_is_partial() {
        let data = json!({
            "user_id": "u1",
            "channel_id": "c1",
            "message_id": "m1",
            "emoji": {"id": null, "name": "❌"}
        });
        let payload: ReactionPayload = serde_json::from_value(data).unwrap();
        let event = payload.into_event(false).unwrap();

        assert!(!event.added);
        assert!(event.is_partial());
    }

    #[test]
    fn test_reaction_without_emoji_name_is_dropped() {
        let data = json!({
            "user_id": "u1",
            "channel_id": "c1",
            "message_id": "m1",
            "emoji": {"id": "123", "name": null}
        });
        let payload: ReactionPayload = serde_json::from_value(data).unwrap();
        assert!(payload.into_event(true).is_none());
    }

    #[test]
    fn test_gateway_frames() {
        let hello: GatewayPayload =
            serde_json::from_str(r#"{"op":10,"d":{"heartbeat_interval":41250},"s":null,"t":null}"#)
                .unwrap();
        assert_eq!(hello.op, opcode::HELLO);
        let hello: Hello = serde_json::from_value(hello.d).unwrap();
        assert_eq!(hello.heartbeat_interval, 41250);

        assert_eq!(heartbeat(Some(7))["d"], 7);
        assert!(heartbeat(None)["d"].is_null());
        assert_eq!(identify("tok")["d"]["intents"], INTENTS);
        assert!(is_fatal_close(4004));
        assert!(!is_fatal_close(4000));
    }
}
