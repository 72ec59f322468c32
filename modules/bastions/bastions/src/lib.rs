#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Bastions Module
//!
//! Discovers "bastion" jump-host instances in a cloud account and reports
//! them tagged with their deployment environment.
//!
//! ## Architecture
//!
//! - `domain/service.rs` - Discovery engine (credentials, re-login, query, classification)
//! - `infra/` - AWS credential resolver, EC2 inventory, CLI login
//! - `api/grpc/server.rs` - gRPC transport adapter
//! - `module.rs` - Wiring of the above
//!
//! External consumers should use the `bastions-sdk` crate.

// === MODULE DEFINITION ===
pub mod config;
mod module;
pub use config::{DiscoveryConfig, LoginConfig};
pub use module::BastionsModule;

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
