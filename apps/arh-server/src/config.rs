//! Layered server configuration.
//!
//! Precedence, lowest first: built-in defaults, YAML file (`--config`),
//! environment (`ARH__SECTION__KEY`), CLI overrides.

use std::path::Path;

use anyhow::{Context, Result};
use bastions::{DiscoveryConfig, LoginConfig};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Prefix of environment overrides; `__` separates nested keys.
pub const ENV_PREFIX: &str = "ARH__";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub discovery: DiscoveryConfig,
    pub login: LoginConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// TCP socket address or `uds:///path/to.sock`.
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "[::]:6666".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive used when neither `RUST_LOG` nor `-v` is given.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Pretty,
        }
    }
}

/// Overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub listen_addr: Option<String>,
}

impl AppConfig {
    /// Load defaults, then the optional YAML file, then `ARH__*` environment variables.
    ///
    /// # Errors
    /// Returns an error if the file does not exist, a layer fails to parse,
    /// or a required key (such as `discovery.query_timeout`) is missing.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new()
            .merge(Serialized::default("server", ServerConfig::default()))
            .merge(Serialized::default("logging", LoggingConfig::default()));

        if let Some(path) = config_path {
            if !path.is_file() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }

    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(listen_addr) = &overrides.listen_addr {
            self.server.listen_addr.clone_from(listen_addr);
        }
    }

    /// Effective configuration as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize configuration")
    }
}
