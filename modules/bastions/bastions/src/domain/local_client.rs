//! Local (in-process) client for the bastions module.

use std::sync::Arc;

use async_trait::async_trait;
use bastions_sdk::{BastionInstance, BastionsClient, BastionsError};

use super::{DomainError, Service};

/// `BastionsClient` backed directly by the domain [`Service`].
pub struct BastionsLocalClient {
    svc: Arc<Service>,
}

impl BastionsLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, profile: &str, e: DomainError) -> BastionsError {
    tracing::error!(operation = op, profile, error = %e, "bastions call failed");
    e.into()
}

#[async_trait]
impl BastionsClient for BastionsLocalClient {
    async fn describe_bastions(&self, profile: &str) -> Result<Vec<BastionInstance>, BastionsError> {
        self.svc
            .describe_bastions(profile)
            .await
            .map_err(|e| log_and_convert("describe_bastions", profile, e))
    }
}
