// Maintenance: firmware update, log collection and alarm shields.

use std::path::Path;
use std::time::Duration;

use atlasom_api::redfish::{AlarmShield, Task};
use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, info};

use super::Console;
use crate::error::CoreError;
use crate::error_code::Locale;
use crate::validate::{self, Rule};

pub const FIRMWARE_SUFFIXES: &[&str] = &[".zip"];

fn check_shield(shield: &AlarmShield, locale: Locale) -> Result<(), CoreError> {
    validate::required("uniquely-identifies", &shield.uniquely_identifies, locale)?;
    Rule::AlarmId.validate("uniquely-identifies", &shield.uniquely_identifies, locale)?;
    validate::required("alarm-id", &shield.alarm_id, locale)?;
    Rule::AlarmId.validate("alarm-id", &shield.alarm_id, locale)?;
    Rule::AlarmSeverity.validate("severity", &shield.perceived_severity, locale)?;
    Rule::AlarmInstance.validate("instance", &shield.alarm_instance, locale)?;
    Ok(())
}

impl Console {
    // ── Firmware ─────────────────────────────────────────────────────

    /// Upload a firmware package. Returns the file name to start the
    /// update with.
    pub async fn upload_firmware(&self, file: &Path) -> Result<String, CoreError> {
        self.check_upload(file, FIRMWARE_SUFFIXES)?;
        self.run(self.client().upload_file(file)).await?;
        Ok(file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default())
    }

    /// Start `SimpleUpdate` with an uploaded package. The response carries
    /// the task to poll.
    pub async fn start_update(&self, image_name: &str) -> Result<Value, CoreError> {
        let locale = self.locale();
        validate::required("image", image_name, locale)?;
        Rule::FileName.validate("image", image_name, locale)?;
        self.run(self.client().simple_update(image_name)).await
    }

    pub async fn activate_firmware(&self) -> Result<Value, CoreError> {
        self.run(self.client().activate_firmware()).await
    }

    /// Poll a task every `interval` until it finishes, reporting each state.
    pub async fn wait_task(
        &self,
        id: &str,
        interval: Duration,
        mut on_progress: impl FnMut(&Task),
    ) -> Result<Task, CoreError> {
        validate::required("task", id, self.locale())?;
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let task = self.run(self.client().poll_task(id)).await?;
            debug!(
                id,
                state = task.task_state.as_deref().unwrap_or("?"),
                percent = task.percent_complete.unwrap_or(0),
                "task progress"
            );
            on_progress(&task);
            if task.is_finished() {
                info!(id, state = ?task.task_state, "task finished");
                return Ok(task);
            }
        }
    }

    // ── Logs ─────────────────────────────────────────────────────────

    /// Pack the named logs into one archive.
    pub async fn collect_logs(&self, names: &[String]) -> Result<Bytes, CoreError> {
        validate::log_names(names, self.locale())?;
        self.run(self.client().collect_logs(names)).await
    }

    // ── Alarm shields ────────────────────────────────────────────────

    pub async fn add_alarm_shields(&self, shields: &[AlarmShield]) -> Result<Value, CoreError> {
        self.check_shields(shields)?;
        self.run(self.client().add_alarm_shields(shields)).await
    }

    pub async fn remove_alarm_shields(&self, shields: &[AlarmShield]) -> Result<Value, CoreError> {
        self.check_shields(shields)?;
        self.run(self.client().remove_alarm_shields(shields)).await
    }

    fn check_shields(&self, shields: &[AlarmShield]) -> Result<(), CoreError> {
        let locale = self.locale();
        if shields.is_empty() {
            return Err(CoreError::validation(
                "shield",
                locale.pick("select at least one alarm", "请至少选择一条告警"),
            ));
        }
        shields.iter().try_for_each(|shield| check_shield(shield, locale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shield() -> AlarmShield {
        AlarmShield {
            uniquely_identifies: "0A000001".into(),
            alarm_id: "00000001".into(),
            perceived_severity: "1".into(),
            alarm_instance: "NPU 0".into(),
        }
    }

    #[test]
    fn shield_fields() {
        assert!(check_shield(&shield(), Locale::En).is_ok());

        let severity = AlarmShield {
            perceived_severity: "12".into(),
            ..shield()
        };
        assert!(check_shield(&severity, Locale::En).is_err());

        let missing_id = AlarmShield {
            alarm_id: String::new(),
            ..shield()
        };
        assert!(matches!(
            check_shield(&missing_id, Locale::En),
            Err(CoreError::ValidationFailed { field, .. }) if field == "alarm-id"
        ));
    }
}
