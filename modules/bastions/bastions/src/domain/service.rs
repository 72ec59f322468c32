//! Discovery engine.
//!
//! One invocation runs `ResolveCredentials -> Query -> Classify -> Assemble`.
//! A failed credential resolution triggers exactly one interactive login
//! followed by exactly one more resolution attempt.

use std::sync::Arc;

use bastions_sdk::BastionInstance;
use tracing::{debug, info, warn};

use super::classify::classify_reservations;
use super::error::DomainError;
use super::ports::{
    ComputeInventory, CredentialError, CredentialResolver, InteractiveLogin, Reservation, TagFilter,
};
use crate::config::DiscoveryConfig;

/// Tag holding the instance name.
pub const NAME_TAG: &str = "Name";

/// Naming convention of bastion instances.
pub const BASTION_NAME_PATTERN: &str = "*-bastion*";

/// Interactive logins allowed per invocation.
const MAX_REAUTH_ATTEMPTS: u32 = 1;

/// Domain service that discovers bastion instances.
///
/// Stateless across calls: every invocation resolves credentials anew.
pub struct Service {
    resolver: Arc<dyn CredentialResolver>,
    login: Arc<dyn InteractiveLogin>,
    config: DiscoveryConfig,
}

impl Service {
    #[must_use]
    pub fn new(
        resolver: Arc<dyn CredentialResolver>,
        login: Arc<dyn InteractiveLogin>,
        config: DiscoveryConfig,
    ) -> Self {
        Self {
            resolver,
            login,
            config,
        }
    }

    /// Filter selecting instances whose `Name` tag matches `*-bastion*`.
    #[must_use]
    pub fn bastion_filter() -> TagFilter {
        TagFilter {
            key: NAME_TAG.to_owned(),
            values: vec![BASTION_NAME_PATTERN.to_owned()],
        }
    }

    /// Discover the bastions visible to `profile`.
    ///
    /// # Errors
    /// - [`DomainError::CredentialResolution`] if credentials are unavailable after one re-login;
    ///   a resolution attempt that outlives `query_timeout` counts as failed
    /// - [`DomainError::ProviderQuery`] if the inventory call fails or times out
    pub async fn describe_bastions(&self, profile: &str) -> Result<Vec<BastionInstance>, DomainError> {
        let inventory = self.resolve_credentials(profile).await?;
        let reservations = self.query(profile, inventory.as_ref()).await?;

        let bastions = classify_reservations(&reservations);
        info!(
            profile,
            reservations = reservations.len(),
            bastions = bastions.len(),
            "bastion discovery finished"
        );
        Ok(bastions)
    }

    async fn resolve_credentials(&self, profile: &str) -> Result<Box<dyn ComputeInventory>, DomainError> {
        let region = self.config.region.as_str();
        let mut reauth_attempts = 0;
        let mut login_error = None;

        loop {
            debug!(profile, region, attempt = reauth_attempts + 1, "resolving credentials");

            let err = match self.resolve_once(profile, region).await {
                Ok(inventory) => return Ok(inventory),
                Err(err) => err,
            };

            if reauth_attempts >= MAX_REAUTH_ATTEMPTS {
                return Err(DomainError::CredentialResolution {
                    profile: profile.to_owned(),
                    reason: err.to_string(),
                    login_error,
                });
            }
            reauth_attempts += 1;

            warn!(profile, error = %err, "credential resolution failed, starting interactive login");
            match self.login.login(profile).await {
                Ok(()) => info!(profile, "interactive login finished"),
                Err(e) => {
                    warn!(profile, error = %e, "interactive login failed");
                    login_error = Some(e.to_string());
                }
            }
        }
    }

    /// One resolution attempt, bounded by `query_timeout` like the query itself.
    async fn resolve_once(&self, profile: &str, region: &str) -> Result<Box<dyn ComputeInventory>, CredentialError> {
        let timeout = self.config.query_timeout;
        tokio::time::timeout(timeout, self.resolver.resolve(profile, region))
            .await
            .unwrap_or_else(|_| {
                Err(CredentialError(format!(
                    "credential resolution timed out after {}ms",
                    timeout.as_millis()
                )))
            })
    }

    async fn query(
        &self,
        profile: &str,
        inventory: &dyn ComputeInventory,
    ) -> Result<Vec<Reservation>, DomainError> {
        let filter = Self::bastion_filter();
        debug!(profile, key = %filter.key, values = ?filter.values, "querying compute inventory");

        let timeout = self.config.query_timeout;
        match tokio::time::timeout(timeout, inventory.describe_instances(&filter)).await {
            Ok(Ok(reservations)) => Ok(reservations),
            Ok(Err(e)) => Err(DomainError::ProviderQuery(e.0)),
            Err(_) => Err(DomainError::ProviderQuery(format!(
                "describe instances timed out after {}ms",
                timeout.as_millis()
            ))),
        }
    }
}
