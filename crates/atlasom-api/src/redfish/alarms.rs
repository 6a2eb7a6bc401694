// Alarm endpoints: active alarms and shield (suppression) rules.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::redfish::client::RedfishClient;
use crate::redfish::paths;
use crate::redfish::types::{AlarmInfo, AlarmShield, AlarmShieldList, GenericResource};

impl RedfishClient {
    /// `GET /redfish/v1/Systems/Alarm`
    pub async fn alarm_service(&self) -> Result<GenericResource, Error> {
        self.get_json(paths::ALARM).await
    }

    /// `GET /redfish/v1/Systems/Alarm/AlarmInfo`
    pub async fn alarms(&self) -> Result<AlarmInfo, Error> {
        self.get_json(paths::ALARM_INFO).await
    }

    /// `GET /redfish/v1/Systems/Alarm/AlarmShield`
    pub async fn alarm_shields(&self) -> Result<AlarmShieldList, Error> {
        self.get_json(paths::ALARM_SHIELD).await
    }

    /// `PATCH /redfish/v1/Systems/Alarm/AlarmShield/Increase` with `{AlarmShieldMessages}`
    pub async fn add_alarm_shields(
        &self,
        shields: &[AlarmShield],
    ) -> Result<serde_json::Value, Error> {
        debug!(count = shields.len(), "adding alarm shields");
        self.patch_json(
            paths::ALARM_SHIELD_INCREASE,
            &json!({ "AlarmShieldMessages": shields }),
        )
        .await
    }

    /// `PATCH /redfish/v1/Systems/Alarm/AlarmShield/Decrease` with `{AlarmShieldMessages}`
    pub async fn remove_alarm_shields(
        &self,
        shields: &[AlarmShield],
    ) -> Result<serde_json::Value, Error> {
        debug!(count = shields.len(), "removing alarm shields");
        self.patch_json(
            paths::ALARM_SHIELD_DECREASE,
            &json!({ "AlarmShieldMessages": shields }),
        )
        .await
    }
}
