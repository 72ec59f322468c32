//! gRPC client channel configuration and connection helpers.
//!
//! Only transport concerns live here: connect timeout, optional per-call
//! timeout, HTTP/2 keepalive and retrying the initial connection. Individual
//! RPCs are never retried by this module.

use std::time::Duration;

use anyhow::Context;
use tonic::transport::{Channel, Endpoint};
use tracing::Instrument;

fn duration_to_u64_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Configuration for a gRPC client channel.
#[derive(Debug, Clone)]
pub struct GrpcClientConfig {
    /// Timeout for establishing the initial connection.
    pub connect_timeout: Duration,

    /// Timeout applied to every call on the channel. `None` leaves calls unbounded.
    pub rpc_timeout: Option<Duration>,

    /// Number of additional connection attempts after the first one fails.
    pub max_retries: u32,

    /// Backoff unit; attempt `n` waits `base_backoff * n`.
    pub base_backoff: Duration,

    /// Upper bound for a single backoff.
    pub max_backoff: Duration,

    /// Service name used in tracing fields.
    pub service_name: &'static str,
}

impl Default for GrpcClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            rpc_timeout: Some(Duration::from_secs(30)),
            max_retries: 3,
            base_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
            service_name: "grpc_client",
        }
    }
}

impl GrpcClientConfig {
    /// Create a new configuration with the given service name.
    #[must_use]
    pub fn new(service_name: &'static str) -> Self {
        Self {
            service_name,
            ..Default::default()
        }
    }

    /// Set the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the per-call timeout.
    #[must_use]
    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = Some(timeout);
        self
    }

    /// Remove the per-call timeout.
    #[must_use]
    pub fn without_rpc_timeout(mut self) -> Self {
        self.rpc_timeout = None;
        self
    }

    /// Set the maximum number of connection retries.
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }
}

fn build_endpoint(uri: String, cfg: &GrpcClientConfig) -> Result<Endpoint, tonic::transport::Error> {
    let mut endpoint = Endpoint::from_shared(uri)?
        .connect_timeout(cfg.connect_timeout)
        .tcp_keepalive(Some(Duration::from_secs(30)))
        .http2_keep_alive_interval(Duration::from_secs(30))
        .keep_alive_timeout(Duration::from_secs(10))
        .keep_alive_while_idle(true);

    if let Some(timeout) = cfg.rpc_timeout {
        endpoint = endpoint.timeout(timeout);
    }

    Ok(endpoint)
}

/// Connect once to a gRPC service using the configured transport settings.
///
/// # Errors
/// Returns an error if the URI is invalid or the connection cannot be established.
pub async fn connect_with_stack<TClient>(
    uri: impl Into<String>,
    cfg: &GrpcClientConfig,
) -> anyhow::Result<TClient>
where
    TClient: From<Channel>,
{
    let uri_string = uri.into();
    let span = tracing::debug_span!(
        "grpc_connect",
        service = cfg.service_name,
        uri = %uri_string
    );

    async move {
        let endpoint = build_endpoint(uri_string, cfg)?;
        let channel = endpoint.connect().await?;
        tracing::debug!(service = cfg.service_name, "gRPC client connected");
        Ok(TClient::from(channel))
    }
    .instrument(span)
    .await
}

/// Delay before connection attempt `attempt + 1`, growing linearly and capped at `max_backoff`.
fn backoff_after(cfg: &GrpcClientConfig, attempt: u32) -> Duration {
    cfg.base_backoff.saturating_mul(attempt).min(cfg.max_backoff)
}

/// Connect to a gRPC service, retrying the connection with linear backoff.
///
/// Only establishing the channel is retried; calls made on it are not.
///
/// # Errors
/// Returns the last connection error once `max_retries` is exhausted.
pub async fn connect_with_retry<TClient>(
    uri: impl Into<String>,
    cfg: &GrpcClientConfig,
) -> anyhow::Result<TClient>
where
    TClient: From<Channel>,
{
    let uri = uri.into();
    let attempts = cfg.max_retries.saturating_add(1);

    for attempt in 1..attempts {
        match connect_with_stack::<TClient>(&uri, cfg).await {
            Ok(client) => return Ok(client),
            Err(e) => {
                let backoff = backoff_after(cfg, attempt);
                tracing::warn!(
                    service = cfg.service_name,
                    attempt,
                    attempts,
                    error = %e,
                    backoff_ms = duration_to_u64_ms(backoff),
                    "gRPC connect attempt failed"
                );
                tokio::time::sleep(backoff).await;
            }
        }
    }

    let client = connect_with_stack::<TClient>(&uri, cfg).await.with_context(|| {
        format!("failed to connect to {} after {attempts} attempts", cfg.service_name)
    })?;
    if attempts > 1 {
        tracing::info!(service = cfg.service_name, attempts, "gRPC connected on final attempt");
    }
    Ok(client)
}
