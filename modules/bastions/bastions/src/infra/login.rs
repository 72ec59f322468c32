//! Interactive login through an external command (`aws sso login` by default).

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::LoginConfig;
use crate::domain::ports::{InteractiveLogin, LoginError};

/// Runs the configured login command and waits for it, bounded by `timeout`.
pub struct CliLogin {
    config: LoginConfig,
}

impl CliLogin {
    #[must_use]
    pub fn new(config: LoginConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl InteractiveLogin for CliLogin {
    async fn login(&self, profile: &str) -> Result<(), LoginError> {
        let args = self.config.args_for(profile);
        info!(profile, command = %self.config.command, ?args, "starting interactive login");

        let mut child = Command::new(&self.config.command)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| LoginError::Spawn {
                command: self.config.command.clone(),
                reason: e.to_string(),
            })?;

        let outcome = tokio::time::timeout(self.config.timeout, child.wait()).await;
        match outcome {
            Ok(Ok(status)) if status.success() => Ok(()),
            Ok(Ok(status)) => Err(LoginError::Failed(status.to_string())),
            Ok(Err(e)) => Err(LoginError::Failed(e.to_string())),
            Err(_) => {
                if let Err(e) = child.kill().await {
                    warn!(profile, error = %e, "failed to kill timed out login command");
                }
                Err(LoginError::TimedOut(self.config.timeout))
            }
        }
    }
}

#[cfg(all(test, unix))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::time::Duration;

    use super::*;

    fn login(command: &str, args: &[&str], timeout: Duration) -> CliLogin {
        CliLogin::new(LoginConfig {
            command: command.to_owned(),
            args: args.iter().map(|s| (*s).to_owned()).collect(),
            timeout,
        })
    }

    #[tokio::test]
    async fn test_successful_command() {
        let login = login("sh", &["-c", "test \"$0\" = ops", "{profile}"], Duration::from_secs(5));
        assert!(login.login("ops").await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_profile_runs_without_profile_flag() {
        let login = login(
            "sh",
            &["-c", "test \"$#\" = 0", "arh", "--profile", "{profile}"],
            Duration::from_secs(5),
        );
        assert!(login.login("").await.is_ok());
    }

    #[tokio::test]
    async fn test_failing_command() {
        let login = login("sh", &["-c", "exit 3"], Duration::from_secs(5));
        let err = login.login("ops").await.unwrap_err();
        assert!(matches!(err, LoginError::Failed(_)), "got: {err}");
    }

    #[tokio::test]
    async fn test_missing_command() {
        let login = login("arh-no-such-login-binary", &[], Duration::from_secs(5));
        let err = login.login("ops").await.unwrap_err();
        assert!(matches!(err, LoginError::Spawn { .. }), "got: {err}");
    }

    #[tokio::test]
    async fn test_timeout_kills_command() {
        let login = login("sleep", &["30"], Duration::from_millis(100));
        let err = login.login("ops").await.unwrap_err();
        assert!(matches!(err, LoginError::TimedOut(_)), "got: {err}");
    }
}
