#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
//! gRPC transport helpers shared by the ARH server and its SDK.
//!
//! - [`client`] builds `tonic` channels with timeouts, keepalive and connect retries.
//! - [`server`] parses listen addresses, binds them and runs a cancellable serve loop.

pub mod client;
pub mod server;

pub use client::{GrpcClientConfig, connect_with_retry, connect_with_stack};
pub use server::{BoundListener, ListenConfig};
