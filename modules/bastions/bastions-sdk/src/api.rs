//! Bastions API trait
//!
//! Contract shared by the in-process domain client and the gRPC client.

use async_trait::async_trait;

use crate::error::BastionsError;
use crate::models::BastionInstance;

/// Bastion discovery API.
#[async_trait]
pub trait BastionsClient: Send + Sync {
    /// List the bastion instances visible to `profile`.
    ///
    /// Results keep the provider's enumeration order (reservations outer,
    /// instances inner). An empty list means nothing matched. The profile is
    /// passed through unmodified, including the empty string.
    ///
    /// The call may block for the duration of an interactive re-authentication.
    ///
    /// # Errors
    ///
    /// - `CredentialResolution` if credentials could not be obtained after one re-login
    /// - `ProviderQuery` if the inventory provider call failed
    /// - `Transport` / `Internal` for everything between caller and engine
    async fn describe_bastions(&self, profile: &str) -> Result<Vec<BastionInstance>, BastionsError>;
}
