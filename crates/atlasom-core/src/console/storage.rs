// Storage: disks and partitions.

use atlasom_api::redfish::{CreatePartition, Partition, SimpleStorage};
use futures_util::future::try_join_all;
use serde_json::Value;

use super::Console;
use crate::error::CoreError;
use crate::validate::{self, Rule};

/// Most partitions one create request may ask for.
pub const MAX_PARTITIONS: u8 = 16;

impl Console {
    /// Every disk with its details.
    pub async fn disks(&self) -> Result<Vec<SimpleStorage>, CoreError> {
        let collection = self.run(self.client().simple_storages()).await?;
        let ids = collection.member_ids();
        self.run(try_join_all(
            ids.iter().map(|id| self.client().simple_storage(id)),
        ))
        .await
    }

    /// Every partition with its details.
    pub async fn partitions(&self) -> Result<Vec<Partition>, CoreError> {
        let collection = self.run(self.client().partitions()).await?;
        let ids = collection.member_ids();
        self.run(try_join_all(ids.iter().map(|id| self.client().partition(id))))
            .await
    }

    /// Split `device` (its `@odata.id`) into `number` ext4 partitions of
    /// `capacity_gb` each.
    pub async fn create_partitions(
        &self,
        number: u8,
        capacity_gb: f64,
        device: &str,
    ) -> Result<Value, CoreError> {
        let locale = self.locale();
        if !(1..=MAX_PARTITIONS).contains(&number) {
            return Err(CoreError::validation(
                "number",
                locale.pick("between 1 and 16 partitions", "分区数量须为 1-16"),
            ));
        }
        validate::partition_capacity(capacity_gb, locale)?;
        validate::required("device", device, locale)?;
        let request = CreatePartition::ext4(number, capacity_gb, device);
        self.run(self.client().create_partition(&request)).await
    }

    pub async fn mount_partition(&self, id: &str, mount_path: &str) -> Result<Value, CoreError> {
        let locale = self.locale();
        validate::required("partition", id, locale)?;
        validate::required("mount-path", mount_path, locale)?;
        Rule::ServerPath.validate("mount-path", mount_path, locale)?;
        self.run(self.client().mount_partition(id, mount_path)).await
    }

    pub async fn unmount_partition(&self, id: &str) -> Result<Value, CoreError> {
        validate::required("partition", id, self.locale())?;
        self.run(self.client().unmount_partition(id)).await
    }

    pub async fn delete_partition(&self, id: &str) -> Result<(), CoreError> {
        validate::required("partition", id, self.locale())?;
        self.run(self.client().delete_partition(id)).await
    }
}
