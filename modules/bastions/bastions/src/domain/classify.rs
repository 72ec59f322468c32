//! Environment classification of provider instances.

use bastions_sdk::{BastionInstance, Environment};
use tracing::debug;

use super::ports::{InstanceRecord, Reservation};

/// Tag key carrying the deployment stage. Matched case-sensitively.
pub const ENVIRONMENT_TAG: &str = "Environment";

/// Recognised `Environment` tag values. Anything else is unspecified.
const ENVIRONMENT_TABLE: &[(&str, Environment)] = &[
    ("dev", Environment::Dev),
    ("demo", Environment::Demo),
    ("prod", Environment::Prod),
];

/// Map an `Environment` tag value to its enum, exact match only.
#[must_use]
pub fn environment_from_tag_value(value: &str) -> Environment {
    ENVIRONMENT_TABLE
        .iter()
        .find(|(name, _)| *name == value)
        .map_or(Environment::Unspecified, |(_, env)| *env)
}

/// Classify a single instance using the first `Environment` tag it carries.
#[must_use]
pub fn classify_instance(instance: &InstanceRecord) -> BastionInstance {
    let env = match instance.tags.iter().find(|tag| tag.key == ENVIRONMENT_TAG) {
        Some(tag) => {
            let env = environment_from_tag_value(&tag.value);
            if env == Environment::Unspecified {
                debug!(
                    instance_id = %instance.instance_id,
                    value = %tag.value,
                    "unrecognised Environment tag value"
                );
            }
            env
        }
        None => Environment::Unspecified,
    };

    BastionInstance::new(instance.instance_id.clone(), env)
}

/// Classify every instance, reservations outer and instances inner.
#[must_use]
pub fn classify_reservations(reservations: &[Reservation]) -> Vec<BastionInstance> {
    reservations
        .iter()
        .flat_map(|reservation| reservation.instances.iter())
        .map(classify_instance)
        .collect()
}
