use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ec2 as ec2;
use tracing::warn;

use crate::domain::ports::{ComputeInventory, InstanceRecord, InventoryError, Reservation, Tag, TagFilter};

/// EC2 `DescribeInstances` bound to one AWS session.
pub struct Ec2Inventory {
    client: ec2::Client,
}

impl Ec2Inventory {
    #[must_use]
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: ec2::Client::new(config),
        }
    }
}

#[async_trait]
impl ComputeInventory for Ec2Inventory {
    async fn describe_instances(&self, filter: &TagFilter) -> Result<Vec<Reservation>, InventoryError> {
        let output = self
            .client
            .describe_instances()
            .filters(ec2_filter(filter))
            .send()
            .await
            .map_err(|e| InventoryError(ec2::error::DisplayErrorContext(&e).to_string()))?;

        Ok(output.reservations().iter().map(reservation_from_ec2).collect())
    }
}

fn ec2_filter(filter: &TagFilter) -> ec2::types::Filter {
    ec2::types::Filter::builder()
        .name(format!("tag:{}", filter.key))
        .set_values(Some(filter.values.clone()))
        .build()
}

fn reservation_from_ec2(reservation: &ec2::types::Reservation) -> Reservation {
    Reservation {
        instances: reservation.instances().iter().map(instance_from_ec2).collect(),
    }
}

fn instance_from_ec2(instance: &ec2::types::Instance) -> InstanceRecord {
    let instance_id = instance.instance_id().unwrap_or_else(|| {
        warn!("EC2 returned an instance without an id");
        ""
    });

    InstanceRecord {
        instance_id: instance_id.to_owned(),
        tags: instance
            .tags()
            .iter()
            .map(|tag| Tag::new(tag.key().unwrap_or_default(), tag.value().unwrap_or_default()))
            .collect(),
    }
}
