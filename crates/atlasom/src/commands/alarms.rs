//! Alarm command handlers: current alarms and shield rules.

use atlasom_api::redfish::Alarm;
use atlasom_core::AlarmShield;
use tabled::Tabled;

use crate::cli::{AlarmsArgs, AlarmsCommand, ShieldArgs};
use crate::error::CliError;
use crate::output::{self, opt};

use super::App;

#[derive(Tabled)]
struct AlarmRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Alarm")]
    name: String,
    #[tabled(rename = "Instance")]
    instance: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Raised")]
    timestamp: String,
}

#[derive(Tabled)]
struct ShieldRow {
    #[tabled(rename = "Alarm ID")]
    id: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Instance")]
    instance: String,
}

fn alarm_row(alarm: &Alarm, color: bool) -> AlarmRow {
    AlarmRow {
        severity: alarm
            .perceived_severity
            .as_deref()
            .map_or_else(|| "-".into(), |s| output::paint_severity(s, color)),
        id: opt(alarm.alarm_id.as_deref()),
        name: opt(alarm.alarm_name.as_deref()),
        instance: opt(alarm.alarm_instance.as_deref()),
        source: opt(alarm.uniquely_identifies.as_deref()),
        timestamp: opt(alarm.timestamp.as_deref()),
    }
}

fn shield_row(shield: &AlarmShield, color: bool) -> ShieldRow {
    ShieldRow {
        id: shield.alarm_id.clone(),
        source: shield.uniquely_identifies.clone(),
        severity: output::paint_severity(&shield.perceived_severity, color),
        instance: shield.alarm_instance.clone(),
    }
}

impl From<ShieldArgs> for AlarmShield {
    fn from(args: ShieldArgs) -> Self {
        AlarmShield {
            uniquely_identifies: args.source,
            alarm_id: args.alarm_id,
            perceived_severity: args.severity,
            alarm_instance: args.instance,
        }
    }
}

pub async fn handle(app: &App<'_>, args: AlarmsArgs) -> Result<(), CliError> {
    let console = &app.console;
    let client = console.client();
    let color = app.color();

    match args.command {
        AlarmsCommand::List => {
            let info = console.run(client.alarms()).await?;
            let out = output::render_list(
                &app.global.output,
                &info.alarms,
                |a| alarm_row(a, color),
                |a| opt(a.alarm_id.as_deref()),
            );
            app.print(&out);
        }

        AlarmsCommand::Shields => {
            let list = console.run(client.alarm_shields()).await?;
            let out = output::render_list(
                &app.global.output,
                &list.shields,
                |s| shield_row(s, color),
                |s| s.alarm_id.clone(),
            );
            app.print(&out);
        }

        AlarmsCommand::Shield(args) => {
            let shield = AlarmShield::from(args);
            console.add_alarm_shields(std::slice::from_ref(&shield)).await?;
            app.done(&format!("Alarm {} shielded", shield.alarm_id));
        }

        AlarmsCommand::Unshield(args) => {
            let shield = AlarmShield::from(args);
            console
                .remove_alarm_shields(std::slice::from_ref(&shield))
                .await?;
            app.done(&format!("Alarm {} reported again", shield.alarm_id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shield_args_map_source_to_unique_id() {
        let shield = AlarmShield::from(ShieldArgs {
            alarm_id: "00000001".into(),
            source: "0A000001".into(),
            severity: "2".into(),
            instance: "NPU 0".into(),
        });
        assert_eq!(shield.uniquely_identifies, "0A000001");
        assert_eq!(shield.alarm_id, "00000001");
        assert_eq!(shield_row(&shield, false).severity, "Minor");
    }

    #[test]
    fn alarm_rows_label_severity() {
        let alarm = Alarm {
            alarm_id: Some("00000002".into()),
            perceived_severity: Some("0".into()),
            ..Alarm::default()
        };
        let row = alarm_row(&alarm, false);
        assert_eq!(row.severity, "Critical");
        assert_eq!(row.name, "-");
    }
}
