//! gRPC client implementation of `BastionsClient`

use anyhow::Result;
use arh_transport_grpc::{GrpcClientConfig, connect_with_retry};
use async_trait::async_trait;
use tonic::transport::Channel;

use crate::SERVICE_NAME;
use crate::api::BastionsClient;
use crate::error::BastionsError;
use crate::models::BastionInstance;
use crate::proto::DescribeBastionsRequest;
use crate::proto::arh_client::ArhClient;

/// gRPC client for the `arh.Arh` service.
#[derive(Clone)]
pub struct BastionsGrpcClient {
    inner: ArhClient<Channel>,
}

impl BastionsGrpcClient {
    /// Connect with connection retries and no per-call timeout.
    ///
    /// `DescribeBastions` can block on an interactive login on the server side,
    /// so calls are left unbounded by default.
    ///
    /// # Errors
    /// Returns an error if the channel cannot be established.
    pub async fn connect(uri: impl Into<String>) -> Result<Self> {
        let cfg = GrpcClientConfig::new(SERVICE_NAME).without_rpc_timeout();
        Self::connect_with_config(uri, &cfg).await
    }

    /// Connect using an explicit transport configuration.
    ///
    /// # Errors
    /// Returns an error if the channel cannot be established.
    pub async fn connect_with_config(uri: impl Into<String>, cfg: &GrpcClientConfig) -> Result<Self> {
        let channel: Channel = connect_with_retry(uri, cfg).await?;
        Ok(Self::from_channel(channel))
    }

    /// Wrap an already established channel.
    #[must_use]
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            inner: ArhClient::new(channel),
        }
    }
}

fn error_from_status(status: &tonic::Status) -> BastionsError {
    let message = status.message().to_owned();
    match status.code() {
        tonic::Code::Unauthenticated => BastionsError::CredentialResolution(message),
        tonic::Code::Unavailable => BastionsError::ProviderQuery(message),
        tonic::Code::Internal => BastionsError::Internal(message),
        _ => BastionsError::Transport(message),
    }
}

#[async_trait]
impl BastionsClient for BastionsGrpcClient {
    async fn describe_bastions(&self, profile: &str) -> Result<Vec<BastionInstance>, BastionsError> {
        let mut client = self.inner.clone();

        let request = tonic::Request::new(DescribeBastionsRequest {
            profile: profile.to_owned(),
        });

        let response = client
            .describe_bastions(request)
            .await
            .map_err(|status| error_from_status(&status))?;

        let bastions: Vec<BastionInstance> = response
            .into_inner()
            .results
            .into_iter()
            .map(BastionInstance::from)
            .collect();

        tracing::debug!(profile, count = bastions.len(), "DescribeBastions completed");
        Ok(bastions)
    }
}
