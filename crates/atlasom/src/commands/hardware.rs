//! Hardware command handlers.
//!
//! Processor, memory and module resources differ between boards and
//! firmware releases, so they are shown as flattened key/value detail.

use atlasom_api::redfish::{Collection, GenericResource};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{HardwareArgs, HardwareCommand};
use crate::error::CliError;
use crate::output::{self, opt};

use super::App;

#[derive(Clone, Serialize, Tabled)]
struct Member {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Path")]
    path: String,
}

fn members(collection: &Collection) -> Vec<Member> {
    collection
        .members
        .iter()
        .map(|link| Member {
            id: link.id().to_owned(),
            path: link.odata_id.clone(),
        })
        .collect()
}

fn render_resource(app: &App<'_>, resource: &GenericResource) {
    let out = output::render_single(
        &app.global.output,
        resource,
        |r| {
            serde_json::to_value(r)
                .map(|value| output::json_detail(&value))
                .unwrap_or_default()
        },
        |r| opt(r.id.as_deref()),
    );
    app.print(&out);
}

fn render_members(app: &App<'_>, collection: &Collection) {
    let out = output::render_list(
        &app.global.output,
        &members(collection),
        Member::clone,
        |m| m.id.clone(),
    );
    app.print(&out);
}

pub async fn handle(app: &App<'_>, args: HardwareArgs) -> Result<(), CliError> {
    let console = &app.console;
    let client = console.client();

    match args.command {
        HardwareCommand::Cpu => render_resource(app, &console.run(client.cpu()).await?),
        HardwareCommand::Ai => render_resource(app, &console.ai_processor().await?),
        HardwareCommand::Memory => render_resource(app, &console.run(client.memory()).await?),
        HardwareCommand::Modules { id: None, .. } => {
            render_members(app, &console.run(client.modules()).await?);
        }
        HardwareCommand::Modules {
            id: Some(id),
            device: None,
        } => render_resource(app, &console.run(client.module(&id)).await?),
        HardwareCommand::Modules {
            id: Some(id),
            device: Some(device),
        } => render_resource(app, &console.run(client.module_device(&id, &device)).await?),
        HardwareCommand::Devices { id: None } => {
            render_members(app, &console.run(client.extended_devices()).await?);
        }
        HardwareCommand::Devices { id: Some(id) } => {
            render_resource(app, &console.run(client.extended_device(&id)).await?);
        }
    }
    Ok(())
}
