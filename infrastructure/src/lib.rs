//! Infrastructure layer for votegate
//!
//! Adapters for the application ports: the Apps Script record source, the
//! Discord channel and gateway, the decision audit log, plus configuration
//! file loading.

pub mod config;
pub mod discord;
pub mod logging;
pub mod record_source;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileDiscordConfig, FileIngestionConfig,
    FileLoggingConfig, FileRecordSourceConfig, FileVotingConfig,
};
pub use discord::{DiscordChannel, DiscordError, DiscordGateway};
pub use logging::JsonlDecisionLog;
pub use record_source::{AppsScriptError, AppsScriptRecordSource};
