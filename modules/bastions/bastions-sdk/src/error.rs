//! Error types for the bastions API.

use thiserror::Error;

/// Errors returned by [`crate::BastionsClient`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BastionsError {
    /// Credentials could not be resolved, even after one interactive login.
    #[error("{0}")]
    CredentialResolution(String),

    /// The compute inventory provider call failed; the provider message is kept verbatim.
    #[error("{0}")]
    ProviderQuery(String),

    /// gRPC transport failure between the caller and the service.
    #[error("gRPC transport error: {0}")]
    Transport(String),

    /// Any other failure.
    #[error("internal error: {0}")]
    Internal(String),
}
