//! Error types for the Discord adapter

use thiserror::Error;
use votegate_application::ChannelError;

/// Result type alias for Discord operations
pub type Result<T> = std::result::Result<T, DiscordError>;

/// Errors that can occur talking to Discord
#[derive(Error, Debug)]
pub enum DiscordError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited, retry after {retry_after:.2}s")]
    RateLimited { retry_after: f64 },

    #[error("Token rejected")]
    Unauthorized,

    #[error("Unknown {0}")]
    NotFound(String),

    #[error("Gateway closed the connection with code {0}")]
    FatalClose(u16),

    #[error("Unexpected gateway payload: {0}")]
    UnexpectedPayload(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<DiscordError> for ChannelError {
    fn from(error: DiscordError) -> Self {
        match error {
            DiscordError::Unauthorized => ChannelError::Unauthorized(error.to_string()),
            DiscordError::FatalClose(_) => ChannelError::Unauthorized(error.to_string()),
            DiscordError::NotFound(what) => ChannelError::NotFound(what),
            DiscordError::Serialization(e) => ChannelError::Malformed(e.to_string()),
            DiscordError::UnexpectedPayload(p) => ChannelError::Malformed(p),
            other => ChannelError::Transport(other.to_string()),
        }
    }
}
