//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Environment variables are merged into the same structure by the loader.

mod discord;
mod ingestion;
mod logging;
mod record_source;
mod voting;

pub use discord::{DEFAULT_API_BASE, DEFAULT_GATEWAY_URL, FileDiscordConfig};
pub use ingestion::FileIngestionConfig;
pub use logging::FileLoggingConfig;
pub use record_source::FileRecordSourceConfig;
pub use voting::FileVotingConfig;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use votegate_application::VotingParams;
use votegate_domain::{DomainError, Quorum, VoteSymbols};

/// Accept scalars where a string is expected
///
/// Environment values are parsed before deserialization, so a numeric
/// channel id or secret arrives as a number.
pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Flag(bool),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Signed(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Flag(b) => b.to_string(),
    })
}

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("voting.required_votes must be at least 1")]
    InvalidQuorum,

    #[error("voting.approve_symbol and voting.deny_symbol must be distinct and non-empty")]
    InvalidSymbols,

    #[error("ingestion.poll_interval_seconds cannot be 0")]
    InvalidPollInterval,

    #[error("record_source.timeout_seconds cannot be 0")]
    InvalidTimeout,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Chat platform settings
    pub discord: FileDiscordConfig,
    /// Record store settings
    pub record_source: FileRecordSourceConfig,
    /// Quorum and reaction symbols
    pub voting: FileVotingConfig,
    /// Polling cadence
    pub ingestion: FileIngestionConfig,
    /// Log outputs
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.discord.token.trim().is_empty() {
            errors.push(ConfigValidationError::Missing("discord.token"));
        }
        if self.discord.voting_channel.trim().is_empty() {
            errors.push(ConfigValidationError::Missing("discord.voting_channel"));
        }
        if self.record_source.url.trim().is_empty() {
            errors.push(ConfigValidationError::Missing("record_source.url"));
        }
        if self.record_source.secret.is_empty() {
            errors.push(ConfigValidationError::Missing("record_source.secret"));
        }
        if self.record_source.timeout_seconds == 0 {
            errors.push(ConfigValidationError::InvalidTimeout);
        }
        if let Err(e) = self.quorum() {
            errors.push(e);
        }
        if let Err(e) = self.symbols() {
            errors.push(e);
        }
        if self.ingestion.poll_interval_seconds == 0 {
            errors.push(ConfigValidationError::InvalidPollInterval);
        }

        errors
    }

    pub fn quorum(&self) -> Result<Quorum, ConfigValidationError> {
        Quorum::new(self.voting.required_votes).map_err(|_| ConfigValidationError::InvalidQuorum)
    }

    pub fn symbols(&self) -> Result<VoteSymbols, ConfigValidationError> {
        VoteSymbols::new(&self.voting.approve_symbol, &self.voting.deny_symbol).map_err(
            |e: DomainError| {
                tracing::debug!("Rejected vote symbols: {}", e);
                ConfigValidationError::InvalidSymbols
            },
        )
    }

    /// Build the decision engine parameters
    pub fn to_voting_params(&self) -> Result<VotingParams, ConfigValidationError> {
        let mut params = VotingParams::new(self.discord.voting_channel.trim())
            .with_quorum(self.quorum()?)
            .with_symbols(self.symbols()?);
        if !self.voting.confirm_decisions {
            params = params.without_confirmation();
        }
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> FileConfig {
        let mut config = FileConfig::default();
        config.discord.token = "token".to_string();
        config.discord.voting_channel = "1476702659653275718".to_string();
        config.record_source.url = "https://example.com/exec".to_string();
        config.record_source.secret = "s3cret".to_string();
        config
    }

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.voting.required_votes, 5);
        assert_eq!(config.voting.approve_symbol, "✅");
        assert_eq!(config.ingestion.poll_interval_seconds, 30);
        assert_eq!(config.discord.api_base, DEFAULT_API_BASE);
        assert!(config.logging.audit_log.is_none());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[discord]
token = "abc"
voting_channel = "123"

[record_source]
url = "https://example.com/exec"
secret = "shh"
timeout_seconds = 10

[voting]
required_votes = 3
approve_symbol = "👍"
deny_symbol = "👎"
confirm_decisions = false

[ingestion]
poll_interval_seconds = 15

[logging]
audit_log = "/tmp/decisions.jsonl"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.discord.token, "abc");
        assert_eq!(config.discord.gateway_url, DEFAULT_GATEWAY_URL);
        assert_eq!(config.record_source.timeout_seconds, 10);
        assert_eq!(config.voting.required_votes, 3);
        assert_eq!(config.ingestion.poll_interval_seconds, 15);
        assert_eq!(config.ingestion.max_backoff_seconds, 300);
        assert!(config.validate().is_empty());

        let params = config.to_voting_params().unwrap();
        assert_eq!(params.quorum.required_votes(), 3);
        assert_eq!(params.voting_channel.as_str(), "123");
        assert!(!params.confirm_decisions);
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let errors = FileConfig::default().validate();
        assert!(errors.contains(&ConfigValidationError::Missing("discord.token")));
        assert!(errors.contains(&ConfigValidationError::Missing("discord.voting_channel")));
        assert!(errors.contains(&ConfigValidationError::Missing("record_source.url")));
        assert!(errors.contains(&ConfigValidationError::Missing("record_source.secret")));
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_numeric_ids_are_accepted() {
        let config: FileConfig =
            toml::from_str("[discord]\nvoting_channel = 1476702659653275718\n").unwrap();
        assert_eq!(config.discord.voting_channel, "1476702659653275718");
    }

    #[test]
    fn test_validate_rejects_bad_voting_values() {
        let mut config = valid();
        config.voting.required_votes = 0;
        config.voting.deny_symbol = config.voting.approve_symbol.clone();
        config.ingestion.poll_interval_seconds = 0;

        let errors = config.validate();
        assert_eq!(
            errors,
            vec![
                ConfigValidationError::InvalidQuorum,
                ConfigValidationError::InvalidSymbols,
                ConfigValidationError::InvalidPollInterval,
            ]
        );
        assert!(config.to_voting_params().is_err());
    }
}
