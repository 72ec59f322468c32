//! Listener configuration and the cancellable `tonic` serve loop.
//!
//! Supported listen addresses:
//! - TCP: `"127.0.0.1:6666"`, `"[::]:6666"` or `"127.0.0.1:0"` for an ephemeral port
//! - Unix Domain Socket (Unix only): `"uds:///path/to/socket.sock"`

use std::fmt;
use std::net::SocketAddr;
#[cfg(unix)]
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::service::Routes;
use tonic::transport::Server;

/// Where the gRPC server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenConfig {
    Tcp(SocketAddr),
    #[cfg(unix)]
    Uds(PathBuf),
}

impl FromStr for ListenConfig {
    type Err = anyhow::Error;

    fn from_str(listen_addr: &str) -> Result<Self, Self::Err> {
        if listen_addr.starts_with("pipe://") || listen_addr.starts_with("npipe://") {
            anyhow::bail!("named pipe listen_addr is not supported: '{listen_addr}'");
        }

        if let Some(uds_path) = listen_addr.strip_prefix("uds://") {
            #[cfg(unix)]
            {
                if uds_path.is_empty() {
                    anyhow::bail!("empty UDS path in listen_addr '{listen_addr}'");
                }
                return Ok(Self::Uds(PathBuf::from(uds_path)));
            }
            #[cfg(not(unix))]
            {
                let _ = uds_path;
                anyhow::bail!("UDS listen_addr is not supported on this platform: '{listen_addr}'");
            }
        }

        let addr = listen_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid listen_addr '{listen_addr}'"))?;
        Ok(Self::Tcp(addr))
    }
}

impl fmt::Display for ListenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp(addr) => write!(f, "{addr}"),
            #[cfg(unix)]
            Self::Uds(path) => write!(f, "uds://{}", path.display()),
        }
    }
}

enum Inner {
    Tcp(TcpListener),
    #[cfg(unix)]
    Uds(tokio::net::UnixListener, PathBuf),
}

/// A bound listener, ready to serve.
///
/// Binding is split from serving so callers learn the real endpoint
/// (for example the port picked for `127.0.0.1:0`) before the server runs.
pub struct BoundListener {
    inner: Inner,
    endpoint: String,
}

impl BoundListener {
    /// Bind the configured address.
    ///
    /// For UDS a stale socket file at the target path is removed first.
    ///
    /// # Errors
    /// Returns an error if the address cannot be bound.
    pub async fn bind(cfg: &ListenConfig) -> anyhow::Result<Self> {
        match cfg {
            ListenConfig::Tcp(addr) => {
                let listener = TcpListener::bind(addr)
                    .await
                    .with_context(|| format!("failed to bind TCP listener at '{addr}'"))?;
                let bound_addr = listener.local_addr()?;
                tracing::info!(%bound_addr, transport = "tcp", "gRPC server listening");
                Ok(Self {
                    inner: Inner::Tcp(listener),
                    endpoint: format!("http://{bound_addr}"),
                })
            }
            #[cfg(unix)]
            ListenConfig::Uds(path) => {
                prepare_uds_socket_path(path);
                let listener = tokio::net::UnixListener::bind(path).with_context(|| {
                    format!("failed to bind UDS listener at '{}'", path.display())
                })?;
                tracing::info!(path = %path.display(), transport = "uds", "gRPC server listening");
                Ok(Self {
                    inner: Inner::Uds(listener, path.clone()),
                    endpoint: format!("unix://{}", path.display()),
                })
            }
        }
    }

    /// Endpoint URI of the bound listener (`http://host:port` or `unix:///path`).
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Serve `routes` until `cancel` fires.
    ///
    /// # Errors
    /// Returns an error if the server fails while running.
    pub async fn serve(self, routes: Routes, cancel: CancellationToken) -> anyhow::Result<()> {
        let shutdown = async move {
            cancel.cancelled().await;
        };

        match self.inner {
            Inner::Tcp(listener) => {
                Server::builder()
                    .add_routes(routes)
                    .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
                    .await?;
            }
            #[cfg(unix)]
            Inner::Uds(listener, path) => {
                use tokio_stream::wrappers::UnixListenerStream;

                let result = Server::builder()
                    .add_routes(routes)
                    .serve_with_incoming_shutdown(UnixListenerStream::new(listener), shutdown)
                    .await;
                prepare_uds_socket_path(&path);
                result?;
            }
        }

        tracing::info!(endpoint = %self.endpoint, "gRPC server stopped");
        Ok(())
    }
}

/// Remove an existing socket file so the path can be bound again.
#[cfg(unix)]
fn prepare_uds_socket_path(path: &std::path::Path) {
    use std::io;

    if !path.exists() {
        return;
    }

    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed existing UDS socket file");
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to remove existing UDS socket file"
            );
        }
    }
}
