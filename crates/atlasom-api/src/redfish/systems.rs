// System information and system-level actions
//
// Overview, hardware inventory (processors, memory, modules, extended
// devices), time, and the reboot / restore-defaults actions.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info};

use crate::error::Error;
use crate::redfish::client::RedfishClient;
use crate::redfish::paths;
use crate::redfish::types::{
    Collection, ComputerSystem, GenericResource, ResetType, SystemUpdate,
};

impl RedfishClient {
    /// `GET /redfish/v1/Systems`
    pub async fn system(&self) -> Result<ComputerSystem, Error> {
        debug!("fetching system overview");
        self.get_json(paths::SYSTEMS).await
    }

    /// Update host name, asset tag or clock.
    ///
    /// `PATCH /redfish/v1/Systems` with `{HostName?, AssetTag?, DateTime?, DateTimeLocalOffset?}`
    pub async fn update_system(&self, update: &SystemUpdate) -> Result<serde_json::Value, Error> {
        debug!(?update, "updating system");
        self.patch_json(paths::SYSTEMS, update).await
    }

    /// `GET /redfish/v1/Systems/Processors`
    pub async fn processors(&self) -> Result<Collection, Error> {
        self.get_json(paths::PROCESSORS).await
    }

    /// `GET /redfish/v1/Systems/Processors/CPU`
    pub async fn cpu(&self) -> Result<GenericResource, Error> {
        self.get_json(paths::CPU).await
    }

    /// `GET /redfish/v1/Systems/Processors/AiProcessor`
    pub async fn ai_processor(&self) -> Result<GenericResource, Error> {
        self.get_json(paths::AI_PROCESSOR).await
    }

    /// `GET /redfish/v1/Systems/Memory`
    pub async fn memory(&self) -> Result<GenericResource, Error> {
        self.get_json(paths::MEMORY).await
    }

    /// `GET /redfish/v1/Systems/Modules`
    pub async fn modules(&self) -> Result<Collection, Error> {
        self.get_json(paths::MODULES).await
    }

    /// `GET /redfish/v1/Systems/Modules/{id}`
    pub async fn module(&self, id: &str) -> Result<GenericResource, Error> {
        self.get_json(&paths::member(paths::MODULES, id)).await
    }

    /// `GET /redfish/v1/Systems/Modules/{module}/{device}`
    pub async fn module_device(&self, module: &str, device: &str) -> Result<GenericResource, Error> {
        let path = paths::member(&paths::member(paths::MODULES, module), device);
        self.get_json(&path).await
    }

    /// `GET /redfish/v1/Systems/ExtendedDevices`
    pub async fn extended_devices(&self) -> Result<Collection, Error> {
        self.get_json(paths::EXTENDED_DEVICES).await
    }

    /// `GET /redfish/v1/Systems/ExtendedDevices/{id}`
    pub async fn extended_device(&self, id: &str) -> Result<GenericResource, Error> {
        self.get_json(&paths::member(paths::EXTENDED_DEVICES, id))
            .await
    }

    /// `GET /redfish/v1/Systems/SystemTime`
    ///
    /// Returns loosely-typed JSON; the field set differs between releases.
    pub async fn system_time(&self) -> Result<serde_json::Value, Error> {
        self.get_json(paths::SYSTEM_TIME).await
    }

    /// Reboot the appliance.
    ///
    /// `POST /redfish/v1/Systems/Actions/ComputerSystem.Reset` with `{ResetType}`
    pub async fn reset_system(&self, reset_type: ResetType) -> Result<serde_json::Value, Error> {
        info!(%reset_type, "resetting system");
        self.post_json(paths::SYSTEM_RESET, &json!({ "ResetType": reset_type }))
            .await
    }

    /// Restore factory defaults, optionally keeping one interface's address.
    ///
    /// `POST /redfish/v1/Systems/Actions/RestoreDefaults.Reset` with
    /// `{ethernet, root_pwd}`; an empty `ethernet` keeps no interface.
    pub async fn restore_defaults(
        &self,
        keep_ethernet: Option<&str>,
        root_password: &SecretString,
    ) -> Result<serde_json::Value, Error> {
        info!(keep = keep_ethernet.unwrap_or("<none>"), "restoring defaults");
        self.post_json(
            paths::RESTORE_DEFAULTS,
            &json!({
                "ethernet": keep_ethernet.unwrap_or_default(),
                "root_pwd": root_password.expose_secret(),
            }),
        )
        .await
    }
}
