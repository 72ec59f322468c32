//! External capabilities the discovery engine depends on.
//!
//! The engine never talks to a cloud SDK or spawns a process itself; it is
//! handed implementations of these traits (AWS-backed in production, fakes in tests).

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// A single key/value tag attached to an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An instance as reported by the inventory provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstanceRecord {
    pub instance_id: String,
    pub tags: Vec<Tag>,
}

/// Provider-side group of instances launched together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reservation {
    pub instances: Vec<InstanceRecord>,
}

/// Tag-based filter passed to the inventory provider.
///
/// `values` may contain `*` wildcards; an instance matches if its `key` tag
/// matches any of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    pub key: String,
    pub values: Vec<String>,
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct CredentialError(pub String);

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("failed to start login command '{command}': {reason}")]
    Spawn { command: String, reason: String },

    #[error("login command exited with {0}")]
    Failed(String),

    #[error("login did not finish within {}s", .0.as_secs())]
    TimedOut(Duration),
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct InventoryError(pub String);

/// Compute inventory bound to an authenticated session.
#[async_trait]
pub trait ComputeInventory: Send + Sync {
    /// Issue one "describe instances" call restricted by `filter`.
    async fn describe_instances(&self, filter: &TagFilter) -> Result<Vec<Reservation>, InventoryError>;
}

/// Resolves a credential profile into an authenticated inventory handle.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    async fn resolve(&self, profile: &str, region: &str) -> Result<Box<dyn ComputeInventory>, CredentialError>;
}

/// Out-of-band, blocking login flow used to refresh credentials for a profile.
#[async_trait]
pub trait InteractiveLogin: Send + Sync {
    async fn login(&self, profile: &str) -> Result<(), LoginError>;
}
