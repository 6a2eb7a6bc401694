// Storage endpoints: disks and partitions.

use serde_json::json;
use tracing::{debug, info};

use crate::error::Error;
use crate::redfish::client::RedfishClient;
use crate::redfish::paths;
use crate::redfish::types::{Collection, CreatePartition, Partition, SimpleStorage};
use crate::request::RequestOptions;

impl RedfishClient {
    /// `GET /redfish/v1/Systems/SimpleStorages`
    pub async fn simple_storages(&self) -> Result<Collection, Error> {
        self.get_json(paths::SIMPLE_STORAGES).await
    }

    /// `GET /redfish/v1/Systems/SimpleStorages/{id}`
    pub async fn simple_storage(&self, id: &str) -> Result<SimpleStorage, Error> {
        self.get_json(&paths::member(paths::SIMPLE_STORAGES, id))
            .await
    }

    /// `GET /redfish/v1/Systems/Partitions`
    pub async fn partitions(&self) -> Result<Collection, Error> {
        self.get_json(paths::PARTITIONS).await
    }

    /// `GET /redfish/v1/Systems/Partitions/{id}`
    pub async fn partition(&self, id: &str) -> Result<Partition, Error> {
        self.get_json(&paths::member(paths::PARTITIONS, id)).await
    }

    /// `POST /redfish/v1/Systems/Partitions` with `{Number, CapacityBytes, Links, FileSystem}`
    pub async fn create_partition(
        &self,
        request: &CreatePartition,
    ) -> Result<serde_json::Value, Error> {
        info!(
            number = request.number,
            capacity_gb = request.capacity_gb,
            "creating partitions"
        );
        self.post_json(paths::PARTITIONS, request).await
    }

    /// `DELETE /redfish/v1/Systems/Partitions/{id}`
    pub async fn delete_partition(&self, id: &str) -> Result<(), Error> {
        info!(id, "deleting partition");
        self.remove(
            &paths::member(paths::PARTITIONS, id),
            None,
            &RequestOptions::default(),
        )
        .await?;
        Ok(())
    }

    /// `PATCH /redfish/v1/Systems/Partitions/Mount` with `{PartitionID, MountPath}`
    pub async fn mount_partition(
        &self,
        id: &str,
        mount_path: &str,
    ) -> Result<serde_json::Value, Error> {
        debug!(id, mount_path, "mounting partition");
        self.patch_json(
            paths::PARTITION_MOUNT,
            &json!({ "PartitionID": id, "MountPath": mount_path }),
        )
        .await
    }

    /// `PATCH /redfish/v1/Systems/Partitions/Unmount` with `{PartitionID}`
    pub async fn unmount_partition(&self, id: &str) -> Result<serde_json::Value, Error> {
        debug!(id, "unmounting partition");
        self.patch_json(paths::PARTITION_UNMOUNT, &json!({ "PartitionID": id }))
            .await
    }
}
