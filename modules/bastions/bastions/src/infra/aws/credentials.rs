use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_sts as sts;
use tracing::debug;

use super::Ec2Inventory;
use crate::domain::ports::{ComputeInventory, CredentialError, CredentialResolver};

/// Loads the shared AWS config for a profile and proves it with STS `GetCallerIdentity`.
///
/// An empty profile name falls back to the default credential chain.
/// SDK-level retries are disabled so provider failures surface on the first attempt.
#[derive(Debug, Default, Clone, Copy)]
pub struct AwsCredentialResolver;

impl AwsCredentialResolver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    async fn sdk_config(profile: &str, region: &str) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_owned()))
            .retry_config(RetryConfig::disabled());
        if !profile.is_empty() {
            loader = loader.profile_name(profile);
        }
        loader.load().await
    }
}

#[async_trait]
impl CredentialResolver for AwsCredentialResolver {
    async fn resolve(&self, profile: &str, region: &str) -> Result<Box<dyn ComputeInventory>, CredentialError> {
        let config = Self::sdk_config(profile, region).await;

        let identity = sts::Client::new(&config)
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| CredentialError(sts::error::DisplayErrorContext(&e).to_string()))?;

        debug!(
            profile,
            region,
            account = identity.account().unwrap_or_default(),
            arn = identity.arn().unwrap_or_default(),
            "AWS session established"
        );

        Ok(Box::new(Ec2Inventory::new(&config)))
    }
}
