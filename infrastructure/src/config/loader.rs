//! Configuration loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// Project-level config file names, checked in order
const PROJECT_FILES: [&str; 2] = ["votegate.toml", ".votegate.toml"];

/// Prefix of structured environment overrides (`VOTEGATE_VOTING__REQUIRED_VOTES`)
pub const ENV_PREFIX: &str = "VOTEGATE_";

/// Bare environment variables and the config keys they set
const ENV_ALIASES: [(&str, &str); 4] = [
    ("DISCORD_TOKEN", "discord.token"),
    ("VOTE_CHANNEL_ID", "discord.voting_channel"),
    ("APPS_SCRIPT_URL", "record_source.url"),
    ("APPS_SCRIPT_SECRET", "record_source.secret"),
];

/// Keys whose environment values are kept verbatim
const STRING_KEYS: [&str; 4] = [
    "discord.token",
    "discord.voting_channel",
    "record_source.url",
    "record_source.secret",
];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment (`VOTEGATE_*`, then the bare aliases)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./votegate.toml` or `./.votegate.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/votegate/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        Self::with_env(figment).extract().map_err(Box::new)
    }

    /// Load defaults and environment only (for --no-config)
    pub fn load_env_only() -> Result<FileConfig, Box<figment::Error>> {
        let figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        Self::with_env(figment).extract().map_err(Box::new)
    }

    fn with_env(figment: Figment) -> Figment {
        let lookup = |var: &str| std::env::var(var).ok();
        let figment = Self::merge_verbatim(
            figment,
            ENV_ALIASES.iter().map(|(var, key)| (var.to_string(), *key)),
            lookup,
        )
        .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::merge_verbatim(figment, Self::prefixed_string_vars(), lookup)
    }

    /// Merge env values as plain strings, bypassing figment's value parsing
    ///
    /// `Env` would turn `007123` into the number 7123.
    fn merge_verbatim(
        mut figment: Figment,
        vars: impl IntoIterator<Item = (String, &'static str)>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Figment {
        for (var, key) in vars {
            if let Some(value) = lookup(&var) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }
        figment
    }

    /// `VOTEGATE_*` names of the string keys (`VOTEGATE_RECORD_SOURCE__SECRET`)
    fn prefixed_string_vars() -> impl Iterator<Item = (String, &'static str)> {
        STRING_KEYS.iter().map(|key| {
            let var = format!("{}{}", ENV_PREFIX, key.replace('.', "__").to_uppercase());
            (var, *key)
        })
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("votegate").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config sources being used (for --show-config)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] {}* and {}", ENV_PREFIX, {
            ENV_ALIASES
                .iter()
                .map(|(var, _)| *var)
                .collect::<Vec<_>>()
                .join(", ")
        });

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./votegate.toml or ./.votegate.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("votegate"));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[voting]\nrequired_votes = 2\n\n[ingestion]\npoll_interval_seconds = 5\n",
        )
        .unwrap();

        let figment = Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Toml::file(&path));
        let config: FileConfig = figment.extract().unwrap();

        assert_eq!(config.voting.required_votes, 2);
        assert_eq!(config.ingestion.poll_interval_seconds, 5);
        assert_eq!(config.voting.deny_symbol, "❌");
    }

    fn env_only(vars: &[(&str, &str)]) -> FileConfig {
        let lookup = |var: &str| {
            vars.iter()
                .find(|(name, _)| *name == var)
                .map(|(_, value)| value.to_string())
        };
        let figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        let figment = ConfigLoader::merge_verbatim(
            figment,
            ENV_ALIASES.iter().map(|(var, key)| (var.to_string(), *key)),
            lookup,
        );
        ConfigLoader::merge_verbatim(figment, ConfigLoader::prefixed_string_vars(), lookup)
            .extract()
            .unwrap()
    }

    #[test]
    fn test_env_aliases_keep_values_verbatim() {
        let config = env_only(&[
            ("APPS_SCRIPT_SECRET", "007123"),
            ("VOTE_CHANNEL_ID", "123456789012345678901234"),
            ("DISCORD_TOKEN", "true"),
            ("APPS_SCRIPT_URL", "https://script.example/exec"),
        ]);

        assert_eq!(config.record_source.secret, "007123");
        assert_eq!(config.discord.voting_channel, "123456789012345678901234");
        assert_eq!(config.discord.token, "true");
        assert_eq!(config.record_source.url, "https://script.example/exec");
    }

    #[test]
    fn test_prefixed_string_keys_override_aliases() {
        let config = env_only(&[
            ("APPS_SCRIPT_SECRET", "alias"),
            ("VOTEGATE_RECORD_SOURCE__SECRET", "0042"),
        ]);
        assert_eq!(config.record_source.secret, "0042");
    }

    #[test]
    fn test_prefixed_string_var_names() {
        let vars: Vec<String> = ConfigLoader::prefixed_string_vars()
            .map(|(var, _)| var)
            .collect();
        assert!(vars.contains(&"VOTEGATE_DISCORD__VOTING_CHANNEL".to_string()));
        assert!(vars.contains(&"VOTEGATE_RECORD_SOURCE__SECRET".to_string()));
    }
}
