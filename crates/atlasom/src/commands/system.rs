//! System command handlers.

use std::time::Duration;

use atlasom_api::redfish::ComputerSystem;
use atlasom_core::{ResetType, SessionEvent, SystemUpdate};
use serde_json::Value;
use tabled::Tabled;
use tokio_util::sync::CancellationToken;

use crate::cli::{ResetKind, SystemArgs, SystemCommand};
use crate::error::CliError;
use crate::output::{self, opt, opt_value};

use super::{App, util};

#[derive(Tabled)]
struct FirmwareRow {
    #[tabled(rename = "Module")]
    module: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Inactive")]
    inactive: String,
}

impl From<ResetKind> for ResetType {
    fn from(kind: ResetKind) -> Self {
        match kind {
            ResetKind::Graceful => ResetType::GracefulRestart,
            ResetKind::Force => ResetType::ForceRestart,
            ResetKind::Cold => ResetType::ColdReset,
        }
    }
}

fn system_detail(system: &ComputerSystem, color: bool) -> String {
    let health = system
        .status
        .as_ref()
        .and_then(|s| s.health.as_deref())
        .map_or_else(|| "-".into(), |h| output::paint_state(h, color));
    let mut pairs = vec![
        ("Model", opt(system.model.as_deref())),
        ("Host name", opt(system.host_name.as_deref())),
        ("Serial number", opt(system.serial_number.as_deref())),
        ("Asset tag", opt(system.asset_tag.as_deref())),
        ("UUID", opt(system.uuid.as_deref())),
        ("Health", health),
    ];

    let mut firmware = String::new();
    if let Some(ref oem) = system.oem {
        let uptime = oem
            .uptime
            .as_ref()
            .and_then(Value::as_u64)
            .map_or_else(|| opt_value(oem.uptime.as_ref()), util::uptime);
        pairs.extend([
            ("PCB version", opt(oem.pcb_version.as_deref())),
            ("Kernel", opt(oem.kernel_version.as_deref())),
            ("OS", opt(oem.os_version.as_deref())),
            ("Architecture", opt(oem.processor_architecture.as_deref())),
            ("Uptime", uptime),
            ("Clock", opt(oem.date_time.as_deref())),
            ("UTC offset", opt(oem.date_time_local_offset.as_deref())),
            ("Temperature", opt_value(oem.temperature.as_ref())),
            ("AI temperature", opt_value(oem.ai_temperature.as_ref())),
            ("Power", opt_value(oem.power.as_ref())),
            ("CPU usage", opt_value(oem.cpu_usage.as_ref())),
            ("Memory usage", opt_value(oem.memory_usage.as_ref())),
        ]);

        if !oem.firmware.is_empty() {
            let rows: Vec<FirmwareRow> = oem
                .firmware
                .iter()
                .map(|f| FirmwareRow {
                    module: opt(f.module.as_deref()),
                    version: opt(f.version.as_deref()),
                    inactive: opt(f.inactive_version.as_deref()),
                })
                .collect();
            firmware = format!(
                "\n{}",
                tabled::Table::new(rows).with(tabled::settings::Style::rounded())
            );
        }
    }

    format!("{}{firmware}", output::detail_table(&pairs))
}

/// One line per refresh in `system watch`.
fn watch_line(system: &ComputerSystem) -> String {
    let now = chrono::Local::now().format("%H:%M:%S");
    let oem = system.oem.as_ref();
    let health = system
        .status
        .as_ref()
        .and_then(|s| s.health.as_deref())
        .unwrap_or("-");
    format!(
        "{now}  health {health}  temp {}  cpu {}  mem {}",
        opt_value(oem.and_then(|o| o.temperature.as_ref())),
        opt_value(oem.and_then(|o| o.cpu_usage.as_ref())),
        opt_value(oem.and_then(|o| o.memory_usage.as_ref())),
    )
}

pub async fn handle(app: &App<'_>, args: SystemArgs) -> Result<(), CliError> {
    let console = &app.console;
    let format = &app.global.output;

    match args.command {
        SystemCommand::Info => {
            let system = console.run(console.client().system()).await?;
            let color = app.color();
            let out = output::render_single(
                format,
                &system,
                |s| system_detail(s, color),
                |s| opt(s.model.as_deref()),
            );
            app.print(&out);
            Ok(())
        }

        SystemCommand::Watch { interval, count } => watch(app, interval, count).await,

        SystemCommand::Set {
            host_name,
            asset_tag,
            date_time,
            time_zone,
        } => {
            let update = SystemUpdate {
                host_name,
                asset_tag,
                date_time,
                date_time_local_offset: time_zone,
            };
            console.update_system(&update).await?;
            app.done("System settings updated");
            Ok(())
        }

        SystemCommand::Time => {
            let time = console.run(console.client().system_time()).await?;
            let out = output::render_single(format, &time, output::json_detail, |t| {
                t.get("Datetime").map_or_else(String::new, output::scalar)
            });
            app.print(&out);
            Ok(())
        }

        SystemCommand::Reboot { reset_type } => {
            let reset_type = ResetType::from(reset_type);
            if !util::confirm(&format!("Restart the appliance ({reset_type})?"), app.global.yes)? {
                return Err(CliError::Cancelled);
            }
            console.reboot(reset_type).await?;
            app.done("Restart requested; the appliance will be unreachable for a few minutes");
            Ok(())
        }

        SystemCommand::RestoreDefaults { keep_ethernet } => {
            if !util::confirm(
                "Restore factory settings? All configuration will be lost.",
                app.global.yes,
            )? {
                return Err(CliError::Cancelled);
            }
            let root_password = util::prompt_secret("Root password")?;
            console
                .restore_defaults(keep_ethernet.as_deref(), &root_password)
                .await?;
            app.done("Factory reset started");
            Ok(())
        }
    }
}

/// Poll the overview as a background refresh until Ctrl-C, `count`
/// refreshes, or the session expires.
async fn watch(app: &App<'_>, interval: u64, count: Option<u64>) -> Result<(), CliError> {
    let console = &app.console;
    let stop = CancellationToken::new();
    let mut events = console.subscribe();
    let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));

    let ctrl_c = {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                stop.cancel();
            }
        })
    };

    let mut refreshes = 0_u64;
    let result = loop {
        tokio::select! {
            () = stop.cancelled() => break Ok(()),
            Ok(SessionEvent::Expired) = events.recv() => {
                break Err(CliError::SessionExpired {
                    message: "The session expired while watching".into(),
                });
            }
            _ = ticker.tick() => {
                match console.overview().await {
                    Ok(system) => app.print(&watch_line(&system)),
                    Err(e) if e.is_auth_expired() => break Err(e.into()),
                    // Background refreshes keep going after a failed poll.
                    Err(e) => tracing::debug!(error = %e, "overview refresh failed"),
                }
                refreshes += 1;
                if count.is_some_and(|n| refreshes >= n) {
                    break Ok(());
                }
            }
        }
    };

    ctrl_c.abort();
    result
}
