//! Conversions between SDK models and their protobuf counterparts.

use crate::models::{BastionInstance, Environment};
use crate::proto;

impl From<Environment> for proto::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Unspecified => Self::Unspecified,
            Environment::Dev => Self::Dev,
            Environment::Demo => Self::Demo,
            Environment::Prod => Self::Prod,
        }
    }
}

impl From<proto::Environment> for Environment {
    fn from(env: proto::Environment) -> Self {
        match env {
            proto::Environment::Unspecified => Self::Unspecified,
            proto::Environment::Dev => Self::Dev,
            proto::Environment::Demo => Self::Demo,
            proto::Environment::Prod => Self::Prod,
        }
    }
}

impl From<BastionInstance> for proto::BastionInstance {
    fn from(b: BastionInstance) -> Self {
        Self {
            instance_id: b.instance_id,
            env: proto::Environment::from(b.env).into(),
        }
    }
}

impl From<proto::BastionInstance> for BastionInstance {
    fn from(b: proto::BastionInstance) -> Self {
        // Values added to the enum after this client was built decode as unspecified
        let env = proto::Environment::try_from(b.env).map_or(Environment::Unspecified, Environment::from);
        Self {
            instance_id: b.instance_id,
            env,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_environment_wire_values() {
        assert_eq!(i32::from(proto::Environment::from(Environment::Unspecified)), 0);
        assert_eq!(i32::from(proto::Environment::from(Environment::Dev)), 1);
        assert_eq!(i32::from(proto::Environment::from(Environment::Demo)), 2);
        assert_eq!(i32::from(proto::Environment::from(Environment::Prod)), 3);
    }

    #[test]
    fn test_unknown_wire_value_is_unspecified() {
        let wire = proto::BastionInstance {
            instance_id: "i-1".to_owned(),
            env: 42,
        };
        let model = BastionInstance::from(wire);
        assert_eq!(model, BastionInstance::new("i-1", Environment::Unspecified));
    }

    #[test]
    fn test_model_to_wire() {
        let wire = proto::BastionInstance::from(BastionInstance::new("i-2", Environment::Prod));
        assert_eq!(wire.instance_id, "i-2");
        assert_eq!(wire.env(), proto::Environment::Prod);
    }
}
