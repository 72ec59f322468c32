//! gRPC Server implementation for bastion discovery
//!
//! Translates wire requests to the `BastionsClient` contract and back; no
//! business logic and no retries here.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use bastions_sdk::proto::BastionInstance as ProtoBastionInstance;
use bastions_sdk::{Arh, BastionsClient, BastionsError, DescribeBastionsRequest, DescribeBastionsResponse};

/// gRPC service implementation that wraps a `BastionsClient`.
#[derive(Clone)]
pub struct ArhServiceImpl {
    client: Arc<dyn BastionsClient>,
}

impl ArhServiceImpl {
    #[must_use]
    pub fn new(client: Arc<dyn BastionsClient>) -> Self {
        Self { client }
    }
}

/// Map an API error to the gRPC status returned to the caller.
#[must_use]
pub fn status_from_error(e: &BastionsError) -> Status {
    match e {
        BastionsError::CredentialResolution(message) => Status::unauthenticated(message.clone()),
        BastionsError::ProviderQuery(message) => Status::unavailable(message.clone()),
        BastionsError::Internal(message) => Status::internal(message.clone()),
        BastionsError::Transport(_) => Status::internal(e.to_string()),
    }
}

#[tonic::async_trait]
impl Arh for ArhServiceImpl {
    async fn describe_bastions(
        &self,
        request: Request<DescribeBastionsRequest>,
    ) -> Result<Response<DescribeBastionsResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(profile = %req.profile, "DescribeBastions request received");

        let bastions = self
            .client
            .describe_bastions(&req.profile)
            .await
            .map_err(|e| status_from_error(&e))?;

        Ok(Response::new(DescribeBastionsResponse {
            results: bastions.into_iter().map(ProtoBastionInstance::from).collect(),
        }))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use bastions_sdk::{BastionInstance, Environment};
    use std::sync::Mutex;
    use tracing_test::traced_test;

    struct RecordingClient {
        profiles: Mutex<Vec<String>>,
        result: Result<Vec<BastionInstance>, BastionsError>,
    }

    #[async_trait::async_trait]
    impl BastionsClient for RecordingClient {
        async fn describe_bastions(&self, profile: &str) -> Result<Vec<BastionInstance>, BastionsError> {
            self.profiles.lock().unwrap().push(profile.to_owned());
            self.result.clone()
        }
    }

    fn service_with(result: Result<Vec<BastionInstance>, BastionsError>) -> (ArhServiceImpl, Arc<RecordingClient>) {
        let client = Arc::new(RecordingClient {
            profiles: Mutex::new(Vec::new()),
            result,
        });
        (ArhServiceImpl::new(client.clone()), client)
    }

    #[tokio::test]
    #[traced_test]
    async fn test_request_is_logged_and_delegated() {
        let (svc, client) = service_with(Ok(vec![BastionInstance::new("i-0abc", Environment::Demo)]));

        let response = svc
            .describe_bastions(Request::new(DescribeBastionsRequest {
                profile: "team-demo".to_owned(),
            }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].instance_id, "i-0abc");
        assert_eq!(response.results[0].env, bastions_sdk::proto::Environment::Demo as i32);
        assert_eq!(*client.profiles.lock().unwrap(), vec!["team-demo".to_owned()]);
        assert!(logs_contain("DescribeBastions request received"));
        assert!(logs_contain("team-demo"));
    }

    #[tokio::test]
    async fn test_empty_profile_passed_through() {
        let (svc, client) = service_with(Ok(vec![]));

        let response = svc
            .describe_bastions(Request::new(DescribeBastionsRequest { profile: String::new() }))
            .await
            .unwrap()
            .into_inner();

        assert!(response.results.is_empty());
        assert_eq!(*client.profiles.lock().unwrap(), vec![String::new()]);
    }

    #[tokio::test]
    async fn test_error_becomes_status() {
        let (svc, _client) = service_with(Err(BastionsError::ProviderQuery("RequestLimitExceeded".to_owned())));

        let status = svc
            .describe_bastions(Request::new(DescribeBastionsRequest {
                profile: "ops".to_owned(),
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::Unavailable);
        assert_eq!(status.message(), "RequestLimitExceeded");
    }

    #[test]
    fn test_status_codes() {
        let status = status_from_error(&BastionsError::CredentialResolution("expired".to_owned()));
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
        assert_eq!(status.message(), "expired");

        let status = status_from_error(&BastionsError::ProviderQuery("throttled".to_owned()));
        assert_eq!(status.code(), tonic::Code::Unavailable);
        assert_eq!(status.message(), "throttled");

        let status = status_from_error(&BastionsError::Internal("boom".to_owned()));
        assert_eq!(status.code(), tonic::Code::Internal);
    }
}
