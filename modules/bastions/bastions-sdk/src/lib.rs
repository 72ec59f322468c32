#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Bastions SDK
//!
//! This crate provides everything needed to consume the bastion discovery service:
//! - API trait (`BastionsClient`)
//! - Models (`BastionInstance`, `Environment`)
//! - Error type (`BastionsError`)
//! - gRPC client (`BastionsGrpcClient`)
//! - Proto stubs for the server implementation
//!
//! ## Usage
//!
//! ```ignore
//! use bastions_sdk::{BastionsClient, BastionsGrpcClient};
//!
//! let client = BastionsGrpcClient::connect("http://[::1]:6666").await?;
//! for bastion in client.describe_bastions("my-profile").await? {
//!     println!("{} ({})", bastion.instance_id, bastion.env);
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// === API TRAIT AND TYPES ===
mod api;
mod error;
mod models;
pub use api::BastionsClient;
pub use error::BastionsError;
pub use models::{BastionInstance, Environment};

// === GRPC CLIENT ===
mod client;
pub use client::BastionsGrpcClient;

// === GRPC PROTO STUBS (for server implementation) ===
/// Generated protobuf types for the `arh.Arh` service
pub mod proto {
    tonic::include_proto!("arh");
}
mod convert;

pub use proto::arh_server::{Arh, ArhServer};
pub use proto::{DescribeBastionsRequest, DescribeBastionsResponse};

/// Fully qualified gRPC service name
pub const SERVICE_NAME: &str = "arh.Arh";
