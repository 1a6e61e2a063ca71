//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::StakeError;
use vela_types::{AccountId, Timestamp};

/// Configuration for a staking service instance.
///
/// Can be loaded from a TOML file via [`StakingConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakingConfig {
    /// The principal authorized for rate changes and reward sweeps.
    pub admin: AccountId,

    /// Reward raw units accrued per second per position at genesis.
    #[serde(default)]
    pub initial_reward_rate: u128,

    /// Unix timestamp (seconds) the rate schedule starts at.
    #[serde(default)]
    pub genesis_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_format() -> String {
    "human".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

impl StakingConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, StakeError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| StakeError::Config(format!("read {}: {e}", path.as_ref().display())))?;
        toml::from_str(&contents).map_err(|e| StakeError::Config(e.to_string()))
    }

    /// A local development configuration.
    pub fn dev() -> Self {
        Self {
            admin: AccountId::new("admin"),
            initial_reward_rate: 1,
            genesis_secs: 0,
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }

    pub fn genesis(&self) -> Timestamp {
        Timestamp::new(self.genesis_secs)
    }

    /// Whether logs should be emitted as JSON.
    pub fn log_json(&self) -> bool {
        self.log_format == "json"
    }
}
