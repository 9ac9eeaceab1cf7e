//! Discord adapter
//!
//! [`DiscordChannel`] speaks the REST API for posting and replying;
//! [`DiscordGateway`] delivers reaction events over the websocket gateway.

pub mod error;
pub mod gateway;
pub mod protocol;
pub mod rest;

pub use error::DiscordError;
pub use gateway::DiscordGateway;
pub use rest::DiscordChannel;
