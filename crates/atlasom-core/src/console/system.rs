// System settings: host name, asset tag, clock, reboot and factory reset.

use atlasom_api::redfish::{GenericResource, ResetType, SystemUpdate};
use chrono::NaiveDateTime;
use secrecy::SecretString;
use serde_json::Value;
use tracing::info;

use super::Console;
use crate::device::Capability;
use crate::error::CoreError;
use crate::validate::{self, Rule};

/// Format the appliance expects for `DateTime`.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl Console {
    pub async fn update_system(&self, update: &SystemUpdate) -> Result<Value, CoreError> {
        let locale = self.locale();
        if update.is_empty() {
            return Err(CoreError::validation(
                "system",
                locale.pick("nothing to change", "没有需要修改的内容"),
            ));
        }
        if let Some(host_name) = &update.host_name {
            validate::required("host-name", host_name, locale)?;
            Rule::HostName.validate("host-name", host_name, locale)?;
        }
        if let Some(asset_tag) = &update.asset_tag {
            Rule::AssetTag.validate("asset-tag", asset_tag, locale)?;
        }
        if let Some(date_time) = &update.date_time {
            NaiveDateTime::parse_from_str(date_time, DATE_TIME_FORMAT).map_err(|_| {
                CoreError::validation(
                    "date-time",
                    locale.pick(
                        "expected YYYY-MM-DD HH:MM:SS",
                        "时间格式须为 YYYY-MM-DD HH:MM:SS",
                    ),
                )
            })?;
        }
        self.run(self.client().update_system(update)).await
    }

    pub async fn reboot(&self, reset_type: ResetType) -> Result<Value, CoreError> {
        info!(%reset_type, "rebooting appliance");
        self.run(self.client().reset_system(reset_type)).await
    }

    /// Factory reset. `keep_ethernet` names the interface whose address
    /// survives so the appliance stays reachable.
    pub async fn restore_defaults(
        &self,
        keep_ethernet: Option<&str>,
        root_password: &SecretString,
    ) -> Result<Value, CoreError> {
        self.check_password("root-password", root_password)?;
        self.run(self.client().restore_defaults(keep_ethernet, root_password))
            .await
    }

    /// AI processor view; only on Atlas 500 models.
    pub async fn ai_processor(&self) -> Result<GenericResource, CoreError> {
        self.require(Capability::AiProcessor)?;
        self.run(self.client().ai_processor()).await
    }
}
