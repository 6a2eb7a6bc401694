//! Firmware command handlers: upload, update, activate and task tracking.

use std::time::Duration;

use atlasom_api::redfish::{Task, UpdateService};
use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use crate::cli::{FirmwareArgs, FirmwareCommand};
use crate::error::CliError;
use crate::output::{self, opt, opt_value};

use super::{App, util};

/// Seconds between task polls.
const TASK_POLL: Duration = Duration::from_secs(2);

#[derive(Clone, Serialize, Tabled)]
struct FirmwareRow {
    #[tabled(rename = "Module")]
    module: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Inactive")]
    inactive: String,
}

#[derive(Serialize)]
struct FirmwareStatus {
    firmware: Vec<FirmwareRow>,
    update_service: UpdateService,
}

fn status_detail(status: &FirmwareStatus, color: bool) -> String {
    let service = &status.update_service;
    let health = service
        .status
        .as_ref()
        .and_then(|s| s.state.as_deref().or(s.health.as_deref()))
        .map_or_else(|| "-".into(), |s| output::paint_state(s, color));
    let mut out = output::detail_table(&[
        ("Update service", opt(service.service_enabled)),
        ("State", health),
    ]);
    if !status.firmware.is_empty() {
        out.push('\n');
        out.push_str(
            &tabled::Table::new(&status.firmware)
                .with(tabled::settings::Style::rounded())
                .to_string(),
        );
    }
    out
}

fn task_detail(task: &Task, color: bool) -> String {
    output::detail_table(&[
        ("ID", opt(task.id.as_deref())),
        ("Name", opt(task.name.as_deref())),
        (
            "State",
            task.task_state
                .as_deref()
                .map_or_else(|| "-".into(), |s| output::paint_state(s, color)),
        ),
        (
            "Progress",
            task.percent_complete
                .map_or_else(|| "-".into(), |p| format!("{p}%")),
        ),
        ("Started", opt(task.start_time.as_deref())),
        ("Messages", opt_value(task.messages.as_ref())),
    ])
}

/// Task id from a `SimpleUpdate` response: `Id`, else the last segment of
/// `@odata.id`.
fn task_id(response: &Value) -> Option<String> {
    if let Some(id) = response.get("Id").and_then(Value::as_str) {
        return Some(id.to_owned());
    }
    response
        .get("@odata.id")
        .and_then(Value::as_str)
        .and_then(|path| path.trim_end_matches('/').rsplit('/').next())
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
}

async fn follow_task(app: &App<'_>, id: &str) -> Result<Task, CliError> {
    let bar = (!app.quiet()).then(|| util::create_task_bar("updating"));
    let result = app
        .console
        .wait_task(id, TASK_POLL, |task| {
            if let Some(ref bar) = bar {
                bar.set_position(u64::from(task.percent_complete.unwrap_or(0)));
                bar.set_message(task.task_state.clone().unwrap_or_default());
            }
        })
        .await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let task = result?;
    if task.task_state.as_deref() == Some("Completed") {
        Ok(task)
    } else {
        Err(CliError::InvalidResponse {
            message: format!(
                "task {id} ended as {}",
                task.task_state.as_deref().unwrap_or("unknown")
            ),
        })
    }
}

fn render_task(app: &App<'_>, task: &Task) {
    let color = app.color();
    let out = output::render_single(
        &app.global.output,
        task,
        |t| task_detail(t, color),
        |t| opt(t.task_state.as_deref()),
    );
    app.print(&out);
}

pub async fn handle(app: &App<'_>, args: FirmwareArgs) -> Result<(), CliError> {
    let console = &app.console;
    let client = console.client();

    match args.command {
        FirmwareCommand::Status => {
            let system = console.run(client.system()).await?;
            let update_service = console.run(client.update_service()).await?;
            let firmware = system
                .oem
                .map(|oem| oem.firmware)
                .unwrap_or_default()
                .iter()
                .map(|f| FirmwareRow {
                    module: opt(f.module.as_deref()),
                    version: opt(f.version.as_deref()),
                    inactive: opt(f.inactive_version.as_deref()),
                })
                .collect();
            let status = FirmwareStatus {
                firmware,
                update_service,
            };
            let color = app.color();
            let out = output::render_single(
                &app.global.output,
                &status,
                |s| status_detail(s, color),
                |s| {
                    s.firmware
                        .iter()
                        .map(|f| format!("{} {}", f.module, f.version))
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            );
            app.print(&out);
        }

        FirmwareCommand::Upload { file } => {
            let name = console.upload_firmware(&file).await?;
            app.done(&format!("Uploaded {name}"));
        }

        FirmwareCommand::Update { file, no_wait } => {
            if !util::confirm(
                "Upgrade the firmware? Services restart once it is activated.",
                app.global.yes,
            )? {
                return Err(CliError::Cancelled);
            }
            let name = console.upload_firmware(&file).await?;
            let response = console.start_update(&name).await?;
            let Some(id) = task_id(&response) else {
                app.done("Update started");
                return Ok(());
            };
            if no_wait {
                app.done(&format!("Update started as task {id}"));
                return Ok(());
            }
            follow_task(app, &id).await?;
            app.done("Firmware upgraded; run `atlasom firmware activate` to switch to it");
        }

        FirmwareCommand::Activate => {
            if !util::confirm(
                "Activate the new firmware? The appliance restarts.",
                app.global.yes,
            )? {
                return Err(CliError::Cancelled);
            }
            console.activate_firmware().await?;
            app.done("Activation started; the appliance will restart");
        }

        FirmwareCommand::Task { id, wait: false } => {
            let task = console.run(client.task(&id)).await?;
            render_task(app, &task);
        }

        FirmwareCommand::Task { id, wait: true } => {
            let task = follow_task(app, &id).await?;
            render_task(app, &task);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn task_id_from_update_response() {
        assert_eq!(task_id(&json!({ "Id": "1" })).as_deref(), Some("1"));
        assert_eq!(
            task_id(&json!({ "@odata.id": "/redfish/v1/TaskService/Tasks/7" })).as_deref(),
            Some("7")
        );
        assert_eq!(task_id(&json!({ "Name": "Upgrade" })), None);
    }

    #[test]
    fn task_detail_shows_progress() {
        let task = Task {
            id: Some("1".into()),
            task_state: Some("Running".into()),
            percent_complete: Some(40),
            ..Task::default()
        };
        let rendered = task_detail(&task, false);
        assert!(rendered.contains("Running"));
        assert!(rendered.contains("40%"));
    }
}
