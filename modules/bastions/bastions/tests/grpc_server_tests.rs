#![allow(clippy::unwrap_used, clippy::expect_used, clippy::use_debug)]
//! End-to-end tests: SDK gRPC client -> tonic server -> discovery engine with fakes

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use arh_transport_grpc::{BoundListener, ListenConfig};
use async_trait::async_trait;
use bastions::domain::ports::{
    ComputeInventory, CredentialError, CredentialResolver, InstanceRecord, InteractiveLogin,
    InventoryError, LoginError, Reservation, Tag, TagFilter,
};
use bastions::{BastionsModule, DiscoveryConfig};
use bastions_sdk::proto::{DescribeBastionsRequest, DescribeBastionsResponse};
use bastions_sdk::{BastionInstance, BastionsClient, BastionsError, BastionsGrpcClient, Environment};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic_prost::ProstCodec;

struct StaticInventory(Result<Vec<Reservation>, &'static str>);

#[async_trait]
impl ComputeInventory for StaticInventory {
    async fn describe_instances(&self, _filter: &TagFilter) -> Result<Vec<Reservation>, InventoryError> {
        self.0.clone().map_err(|e| InventoryError(e.to_owned()))
    }
}

enum Credentials {
    Valid(Result<Vec<Reservation>, &'static str>),
    Expired,
}

struct FakeResolver(Credentials);

#[async_trait]
impl CredentialResolver for FakeResolver {
    async fn resolve(&self, _profile: &str, _region: &str) -> Result<Box<dyn ComputeInventory>, CredentialError> {
        match &self.0 {
            Credentials::Valid(result) => Ok(Box::new(StaticInventory(result.clone()))),
            Credentials::Expired => Err(CredentialError("Token has expired and refresh failed".to_owned())),
        }
    }
}

#[derive(Default)]
struct CountingLogin(AtomicUsize);

#[async_trait]
impl InteractiveLogin for CountingLogin {
    async fn login(&self, _profile: &str) -> Result<(), LoginError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct TestServer {
    endpoint: String,
    client: BastionsGrpcClient,
    cancel: CancellationToken,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    async fn start(credentials: Credentials, login: Arc<CountingLogin>) -> Self {
        let module = BastionsModule::with_capabilities(
            Arc::new(FakeResolver(credentials)),
            login,
            DiscoveryConfig::new(Duration::from_secs(5)),
        );

        let cfg: ListenConfig = "127.0.0.1:0".parse().unwrap();
        let listener = BoundListener::bind(&cfg).await.unwrap();
        let endpoint = listener.endpoint().to_owned();

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(listener.serve(module.routes(), cancel.clone()));
        let client = BastionsGrpcClient::connect(endpoint.clone()).await.unwrap();

        Self {
            endpoint,
            client,
            cancel,
            handle,
        }
    }

    async fn stop(self) {
        drop(self.client);
        self.cancel.cancel();
        let result = tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server should stop after cancellation")
            .unwrap();
        assert!(result.is_ok());
    }
}

fn bastion(id: &str, env: Option<&str>) -> InstanceRecord {
    let mut tags = vec![Tag::new("Name", format!("{id}-bastion"))];
    if let Some(env) = env {
        tags.push(Tag::new("Environment", env));
    }
    InstanceRecord {
        instance_id: id.to_owned(),
        tags,
    }
}

#[tokio::test]
async fn describe_bastions_over_grpc() {
    let reservations = vec![Reservation {
        instances: vec![
            bastion("i-dev", Some("dev")),
            bastion("i-prod", Some("prod")),
            bastion("i-none", None),
        ],
    }];
    let login = Arc::new(CountingLogin::default());
    let server = TestServer::start(Credentials::Valid(Ok(reservations)), login.clone()).await;

    let result = server.client.describe_bastions("team").await.unwrap();

    assert_eq!(
        result,
        vec![
            BastionInstance::new("i-dev", Environment::Dev),
            BastionInstance::new("i-prod", Environment::Prod),
            BastionInstance::new("i-none", Environment::Unspecified),
        ]
    );
    assert_eq!(login.0.load(Ordering::SeqCst), 0);
    server.stop().await;
}

#[tokio::test]
async fn no_bastions_is_an_empty_list() {
    let login = Arc::new(CountingLogin::default());
    let server = TestServer::start(Credentials::Valid(Ok(vec![])), login).await;

    let result = server.client.describe_bastions("").await.unwrap();
    assert!(result.is_empty());

    server.stop().await;
}

#[tokio::test]
async fn expired_credentials_surface_as_credential_error() {
    let login = Arc::new(CountingLogin::default());
    let server = TestServer::start(Credentials::Expired, login.clone()).await;

    let err = server.client.describe_bastions("team").await.unwrap_err();

    match err {
        BastionsError::CredentialResolution(message) => {
            assert!(message.contains("profile 'team'"), "got: {message}");
            assert!(message.contains("Token has expired"), "got: {message}");
        }
        other => panic!("expected CredentialResolution, got {other:?}"),
    }
    assert_eq!(login.0.load(Ordering::SeqCst), 1);
    server.stop().await;
}

#[tokio::test]
async fn provider_failure_surfaces_as_provider_error() {
    let login = Arc::new(CountingLogin::default());
    let server = TestServer::start(Credentials::Valid(Err("RequestLimitExceeded")), login).await;

    let err = server.client.describe_bastions("team").await.unwrap_err();

    assert_eq!(
        err,
        BastionsError::ProviderQuery("provider query failed: RequestLimitExceeded".to_owned())
    );
    server.stop().await;
}

#[tokio::test]
async fn unversioned_method_path_is_routed() {
    let reservations = vec![Reservation {
        instances: vec![bastion("i-demo", Some("demo"))],
    }];
    let login = Arc::new(CountingLogin::default());
    let server = TestServer::start(Credentials::Valid(Ok(reservations)), login).await;

    // Clients generated from the same contract call this exact path
    let channel = Channel::from_shared(server.endpoint.clone())
        .unwrap()
        .connect()
        .await
        .unwrap();
    let mut grpc = tonic::client::Grpc::new(channel);
    grpc.ready().await.unwrap();

    let codec: ProstCodec<DescribeBastionsRequest, DescribeBastionsResponse> = ProstCodec::default();
    let response = grpc
        .unary(
            tonic::Request::new(DescribeBastionsRequest {
                profile: "team".to_owned(),
            }),
            PathAndQuery::from_static("/arh.Arh/DescribeBastions"),
            codec,
        )
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].instance_id, "i-demo");
    assert_eq!(response.results[0].env(), bastions_sdk::proto::Environment::Demo);

    drop(grpc);
    server.stop().await;
}
