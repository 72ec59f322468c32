//! Bastion discovery models.

use std::fmt;

/// Logical deployment stage of a bastion.
///
/// `Unspecified` is the zero value used when an instance carries no
/// `Environment` tag or an unrecognised one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Environment {
    #[default]
    Unspecified,
    Dev,
    Demo,
    Prod,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unspecified => "unspecified",
            Self::Dev => "dev",
            Self::Demo => "demo",
            Self::Prod => "prod",
        };
        f.write_str(name)
    }
}

/// A compute instance acting as a jump host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BastionInstance {
    /// Opaque provider identifier (e.g. `i-0123456789abcdef0`).
    pub instance_id: String,
    pub env: Environment,
}

impl BastionInstance {
    #[must_use]
    pub fn new(instance_id: impl Into<String>, env: Environment) -> Self {
        Self {
            instance_id: instance_id.into(),
            env,
        }
    }
}
