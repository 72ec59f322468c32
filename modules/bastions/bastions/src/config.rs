//! Configuration for the bastions module.
//!
//! Timeouts have no defaults: the deployment must choose them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Discovery engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Region every credential context is scoped to.
    #[serde(default = "default_region")]
    pub region: String,

    /// Upper bound for each credential resolution attempt and for the single
    /// "describe instances" call.
    #[serde(with = "humantime_serde")]
    pub query_timeout: Duration,
}

fn default_region() -> String {
    "eu-west-1".to_owned()
}

impl DiscoveryConfig {
    #[must_use]
    pub fn new(query_timeout: Duration) -> Self {
        Self {
            region: default_region(),
            query_timeout,
        }
    }
}

/// Placeholder replaced by the profile name in [`LoginConfig::args`].
pub const PROFILE_PLACEHOLDER: &str = "{profile}";

/// Interactive login command configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoginConfig {
    /// Program to run.
    #[serde(default = "default_login_command")]
    pub command: String,

    /// Arguments; `{profile}` is substituted with the profile name.
    #[serde(default = "default_login_args")]
    pub args: Vec<String>,

    /// How long the login flow may block before the child is killed.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_login_command() -> String {
    "aws".to_owned()
}

fn default_login_args() -> Vec<String> {
    ["sso", "login", "--profile", PROFILE_PLACEHOLDER]
        .iter()
        .map(|s| (*s).to_owned())
        .collect()
}

impl LoginConfig {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            command: default_login_command(),
            args: default_login_args(),
            timeout,
        }
    }

    /// Arguments with the profile substituted.
    ///
    /// The empty profile stands for the default credential chain, so a bare
    /// `{profile}` argument is dropped together with the `-`/`--` flag right
    /// before it (`aws sso login` then logs in the default profile).
    #[must_use]
    pub fn args_for(&self, profile: &str) -> Vec<String> {
        if !profile.is_empty() {
            return self
                .args
                .iter()
                .map(|arg| arg.replace(PROFILE_PLACEHOLDER, profile))
                .collect();
        }

        let mut args: Vec<String> = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            if arg == PROFILE_PLACEHOLDER {
                if args.last().is_some_and(|prev| prev.starts_with('-')) {
                    args.pop();
                }
                continue;
            }
            args.push(arg.replace(PROFILE_PLACEHOLDER, ""));
        }
        args
    }
}
