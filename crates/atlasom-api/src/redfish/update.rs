// Firmware update endpoints
//
// Upload a package, start `SimpleUpdate` with it, poll the task, then
// activate the new firmware with a graceful restart.

use std::path::Path;

use serde_json::json;
use tracing::{debug, info};

use crate::error::Error;
use crate::redfish::client::{RedfishClient, RedfishResponse};
use crate::redfish::paths;
use crate::redfish::types::{Task, UpdateService};
use crate::request::RequestOptions;

impl RedfishClient {
    /// Multipart `POST /redfish/v1/UpdateService/FirmwareInventory`.
    ///
    /// Every file import (firmware, certificates, rule files) goes through
    /// this endpoint first. Firmware images run to hundreds of MB, so the
    /// whole transfer gets the bulk-transfer timeout.
    pub async fn upload_file(&self, file: &Path) -> Result<RedfishResponse, Error> {
        let opts = RequestOptions::default().with_timeout(self.transfer_timeout());
        self.upload(paths::FIRMWARE_INVENTORY, file, &opts).await
    }

    /// `GET /redfish/v1/UpdateService`
    pub async fn update_service(&self) -> Result<UpdateService, Error> {
        self.get_json(paths::UPDATE_SERVICE).await
    }

    /// Start an update from an already uploaded package.
    ///
    /// `POST /redfish/v1/UpdateService/Actions/UpdateService.SimpleUpdate`
    /// with `{ImageURI, TransferProtocol: "https"}`
    pub async fn simple_update(&self, image_name: &str) -> Result<serde_json::Value, Error> {
        info!(image = image_name, "starting firmware update");
        self.post_json(
            paths::SIMPLE_UPDATE,
            &json!({ "ImageURI": image_name, "TransferProtocol": "https" }),
        )
        .await
    }

    /// Activate the installed firmware.
    ///
    /// `POST /redfish/v1/UpdateService/Actions/UpdateService.Reset` with
    /// `{ResetType: "GracefulRestart"}`
    pub async fn activate_firmware(&self) -> Result<serde_json::Value, Error> {
        info!("activating firmware");
        self.post_json(paths::UPDATE_RESET, &json!({ "ResetType": "GracefulRestart" }))
            .await
    }

    /// `GET /redfish/v1/TaskService/Tasks/{id}`
    pub async fn task(&self, id: &str) -> Result<Task, Error> {
        self.get_json(&paths::member(paths::TASKS, id)).await
    }

    /// Poll a task as a background refresh (no loading indicator,
    /// `AutoRefresh` header set).
    pub async fn poll_task(&self, id: &str) -> Result<Task, Error> {
        debug!(id, "polling task");
        self.fetch_json(&paths::member(paths::TASKS, id), &RequestOptions::background())
            .await
    }
}
