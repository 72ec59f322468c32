//! Bastions module definition

use std::sync::Arc;

use bastions_sdk::{ArhServer, BastionsClient, SERVICE_NAME};
use tonic::service::{Routes, RoutesBuilder};

use crate::api::grpc::ArhServiceImpl;
use crate::config::{DiscoveryConfig, LoginConfig};
use crate::domain::ports::{CredentialResolver, InteractiveLogin};
use crate::domain::{BastionsLocalClient, Service};
use crate::infra::{AwsCredentialResolver, CliLogin};

/// Bastions module.
///
/// Owns the discovery [`Service`] and exposes it as `arh.Arh`.
pub struct BastionsModule {
    service: Arc<Service>,
}

impl BastionsModule {
    /// AWS-backed module: STS/EC2 for credentials and inventory, a CLI command for re-login.
    #[must_use]
    pub fn new(discovery: DiscoveryConfig, login: LoginConfig) -> Self {
        tracing::info!(
            region = %discovery.region,
            login_command = %login.command,
            "Initializing bastions module"
        );
        Self::with_capabilities(
            Arc::new(AwsCredentialResolver::new()),
            Arc::new(CliLogin::new(login)),
            discovery,
        )
    }

    /// Module built on caller-supplied capabilities.
    #[must_use]
    pub fn with_capabilities(
        resolver: Arc<dyn CredentialResolver>,
        login: Arc<dyn InteractiveLogin>,
        discovery: DiscoveryConfig,
    ) -> Self {
        Self {
            service: Arc::new(Service::new(resolver, login, discovery)),
        }
    }

    #[must_use]
    pub fn service(&self) -> Arc<Service> {
        Arc::clone(&self.service)
    }

    /// In-process client over the domain service.
    #[must_use]
    pub fn client(&self) -> Arc<dyn BastionsClient> {
        Arc::new(BastionsLocalClient::new(self.service()))
    }

    /// The tonic service wrapping the in-process client.
    #[must_use]
    pub fn grpc_service(&self) -> ArhServer<ArhServiceImpl> {
        ArhServer::new(ArhServiceImpl::new(self.client()))
    }

    /// Routes to mount on a `tonic` server.
    #[must_use]
    pub fn routes(&self) -> Routes {
        let mut builder = RoutesBuilder::default();
        builder.add_service(self.grpc_service());
        tracing::debug!(service = SERVICE_NAME, "gRPC service registered");
        builder.routes()
    }
}
