//! Record store configuration from TOML (`[record_source]` section)
//!
//! ```toml
//! [record_source]
//! url = "https://script.google.com/macros/s/.../exec"   # or APPS_SCRIPT_URL
//! secret = "..."                                         # or APPS_SCRIPT_SECRET
//! timeout_seconds = 30
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw record store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRecordSourceConfig {
    /// Web app endpoint
    pub url: String,
    /// Shared secret sent with every call
    #[serde(deserialize_with = "super::lenient_string")]
    pub secret: String,
    /// Per-request timeout
    pub timeout_seconds: u64,
}

impl Default for FileRecordSourceConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            secret: String::new(),
            timeout_seconds: 30,
        }
    }
}

impl FileRecordSourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
