//! Chat platform configuration from TOML (`[discord]` section)
//!
//! ```toml
//! [discord]
//! token = "..."                       # or DISCORD_TOKEN
//! voting_channel = "1476702659653275718"
//! ```

use serde::{Deserialize, Serialize};

/// Default REST API base
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Default gateway endpoint
pub const DEFAULT_GATEWAY_URL: &str = "wss://gateway.discord.gg/?v=10&encoding=json";

/// Raw chat platform configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscordConfig {
    /// Bot token
    #[serde(deserialize_with = "super::lenient_string")]
    pub token: String,
    /// Channel where applications are posted and voted on
    #[serde(deserialize_with = "super::lenient_string")]
    pub voting_channel: String,
    /// REST API base URL
    pub api_base: String,
    /// Gateway websocket URL
    pub gateway_url: String,
}

impl Default for FileDiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            voting_channel: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
        }
    }
}
