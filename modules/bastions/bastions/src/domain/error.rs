//! Domain errors of the discovery engine.

use bastions_sdk::BastionsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error(
        "credential resolution failed for profile '{profile}': {reason}{}",
        login_suffix(.login_error.as_deref())
    )]
    CredentialResolution {
        profile: String,
        reason: String,
        login_error: Option<String>,
    },

    #[error("provider query failed: {0}")]
    ProviderQuery(String),
}

fn login_suffix(login_error: Option<&str>) -> String {
    login_error.map_or_else(String::new, |e| format!(" (interactive login: {e})"))
}

impl From<DomainError> for BastionsError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::CredentialResolution { .. } => Self::CredentialResolution(e.to_string()),
            DomainError::ProviderQuery(_) => Self::ProviderQuery(e.to_string()),
        }
    }
}
