//! Configuration loading for votegate
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./votegate.toml` or `./.votegate.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/votegate/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_API_BASE, DEFAULT_GATEWAY_URL, FileConfig, FileDiscordConfig,
    FileIngestionConfig, FileLoggingConfig, FileRecordSourceConfig, FileVotingConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
