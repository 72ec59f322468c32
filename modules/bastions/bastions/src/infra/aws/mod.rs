//! AWS-backed credential resolution and EC2 inventory.

mod credentials;
mod inventory;

pub use credentials::AwsCredentialResolver;
pub use inventory::Ec2Inventory;
