//! Domain layer for the bastions module
//!
//! Credential resolution with interactive fallback, the inventory query and
//! environment classification.

pub mod classify;
pub mod error;
pub mod local_client;
pub mod ports;
pub mod service;

pub use error::DomainError;
pub use local_client::BastionsLocalClient;
pub use service::Service;
