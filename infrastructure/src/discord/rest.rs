//! Discord REST adapter implementing the [`MessageChannel`] port

use super::error::{DiscordError, Result};
use super::protocol::{ApiErrorBody, CreateMessage, MessageObject, UserObject};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};
use votegate_application::{ChannelError, MessageChannel};
use votegate_domain::{ChannelId, MessageId, ReactionOrigin, VotableUnit, VoterId};

const USER_AGENT: &str = concat!("DiscordBot (votegate, ", env!("CARGO_PKG_VERSION"), ")");

/// Upper bound on a single rate-limit wait
const MAX_RETRY_AFTER: Duration = Duration::from_secs(10);

/// Posts votable units into one Discord channel
pub struct DiscordChannel {
    client: Client,
    api_base: String,
    token: String,
    voting_channel: ChannelId,
}

impl DiscordChannel {
    pub fn new(
        api_base: impl Into<String>,
        token: impl Into<String>,
        voting_channel: ChannelId,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.into(),
            token: token.into(),
            voting_channel,
        })
    }

    /// Build `{api_base}/seg/seg/...`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url =
            Url::parse(&self.api_base).map_err(|e| DiscordError::InvalidUrl(e.to_string()))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| DiscordError::InvalidUrl(self.api_base.clone()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Send a request, retrying once when rate limited
    async fn execute(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let request = request.header("Authorization", format!("Bot {}", self.token));
        let retry = request.try_clone();

        match self.send_checked(request, what).await {
            Err(DiscordError::RateLimited { retry_after }) => {
                let Some(retry) = retry else {
                    return Err(DiscordError::RateLimited { retry_after });
                };
                let wait = Duration::from_secs_f64(retry_after.max(0.0)).min(MAX_RETRY_AFTER);
                debug!("Rate limited on {}, retrying in {:?}", what, wait);
                tokio::time::sleep(wait).await;
                self.send_checked(retry, what).await
            }
            other => other,
        }
    }

    async fn send_checked(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: ApiErrorBody = response.json().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED => DiscordError::Unauthorized,
            StatusCode::NOT_FOUND => DiscordError::NotFound(what.to_string()),
            StatusCode::TOO_MANY_REQUESTS => DiscordError::RateLimited {
                retry_after: body.retry_after.unwrap_or(1.0),
            },
            _ => DiscordError::Api {
                status: status.as_u16(),
                message: body.message,
            },
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = self.execute(request, what).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// `GET /users/@me`
    pub async fn current_user(&self) -> Result<UserObject> {
        let url = self.endpoint(&["users", "@me"])?;
        self.fetch(self.client.get(url), "current user").await
    }

    /// `GET /users/{id}`
    pub async fn user(&self, id: &str) -> Result<UserObject> {
        let url = self.endpoint(&["users", id])?;
        self.fetch(self.client.get(url), &format!("user {}", id)).await
    }

    /// `POST /channels/{voting_channel}/messages`
    pub async fn create_message(&self, body: &CreateMessage) -> Result<MessageObject> {
        let url = self.endpoint(&["channels", self.voting_channel.as_str(), "messages"])?;
        self.fetch(self.client.post(url).json(body), "channel").await
    }

    /// `PUT /channels/{voting_channel}/messages/{id}/reactions/{emoji}/@me`
    pub async fn add_reaction(&self, message_id: &str, emoji: &str) -> Result<()> {
        let url = self.endpoint(&[
            "channels",
            self.voting_channel.as_str(),
            "messages",
            message_id,
            "reactions",
            emoji,
            "@me",
        ])?;
        self.execute(self.client.put(url), &format!("message {}", message_id))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl MessageChannel for DiscordChannel {
    async fn authenticate(&self) -> std::result::Result<VoterId, ChannelError> {
        let user = self.current_user().await?;
        info!(
            "Logged in as {} ({})",
            user.username.as_deref().unwrap_or("unknown"),
            user.id
        );
        Ok(VoterId::new(user.id))
    }

    async fn post_unit(&self, unit: &VotableUnit) -> std::result::Result<MessageId, ChannelError> {
        let message = self.create_message(&CreateMessage::for_unit(unit)).await?;
        Ok(MessageId::new(message.id))
    }

    async fn add_affordances(
        &self,
        message_id: &MessageId,
        unit: &VotableUnit,
    ) -> std::result::Result<(), ChannelError> {
        let mut failed = None;
        for symbol in &unit.reactions {
            if let Err(e) = self.add_reaction(message_id.as_str(), symbol).await {
                debug!("Could not add {} to message {}: {}", symbol, message_id, e);
                failed = Some(e);
            }
        }
        match failed {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    async fn resolve_origin(
        &self,
        voter: &VoterId,
    ) -> std::result::Result<ReactionOrigin, ChannelError> {
        let user = self.user(voter.as_str()).await?;
        Ok(ReactionOrigin::from_bot_flag(user.bot))
    }

    async fn reply_to(
        &self,
        message_id: &MessageId,
        text: &str,
    ) -> std::result::Result<(), ChannelError> {
        self.create_message(&CreateMessage::reply(message_id.as_str(), text))
            .await?;
        Ok(())
    }
}
