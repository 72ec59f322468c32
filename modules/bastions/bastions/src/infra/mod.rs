//! Production implementations of the engine's external capabilities.

pub mod aws;
pub mod login;

pub use aws::{AwsCredentialResolver, Ec2Inventory};
pub use login::CliLogin;
