//! Storage command handlers: disks, partitions and NFS mounts.

use atlasom_api::redfish::{NfsMount, Partition, SimpleStorage, Status, paths};
use atlasom_core::NfsMountRequest;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{
    NfsArgs, NfsCommand, NfsTarget, PartitionArgs, PartitionCommand, StorageArgs, StorageCommand,
};
use crate::error::CliError;
use crate::output::{self, opt, opt_value};

use super::{App, util};

// ── Rows ────────────────────────────────────────────────────────────

/// One disk device; a storage controller may hold several.
#[derive(Clone, Serialize, Tabled)]
struct DiskRow {
    #[tabled(rename = "Storage")]
    storage: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Vendor")]
    manufacturer: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
    #[tabled(rename = "Health")]
    health: String,
}

#[derive(Tabled)]
struct PartitionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
    #[tabled(rename = "Free")]
    free: String,
    #[tabled(rename = "FS")]
    file_system: String,
    #[tabled(rename = "Mounted at")]
    mount_path: String,
    #[tabled(rename = "State")]
    state: String,
}

#[derive(Tabled)]
struct NfsRow {
    #[tabled(rename = "Server")]
    server: String,
    #[tabled(rename = "Directory")]
    dir: String,
    #[tabled(rename = "Mounted at")]
    mount_path: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
    #[tabled(rename = "Free")]
    free: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn health(status: Option<&Status>, color: bool) -> String {
    status
        .and_then(|s| s.health.as_deref().or(s.state.as_deref()))
        .map_or_else(|| "-".into(), |h| output::paint_state(h, color))
}

fn disk_rows(storages: &[SimpleStorage], color: bool) -> Vec<DiskRow> {
    storages
        .iter()
        .flat_map(|storage| {
            let id = opt(storage.id.as_deref());
            storage.devices.iter().map(move |device| DiskRow {
                storage: id.clone(),
                device: opt(device.name.as_deref()),
                model: opt(device.model.as_deref()),
                manufacturer: opt(device.manufacturer.as_deref()),
                capacity: device
                    .capacity_bytes
                    .map_or_else(|| "-".into(), |b| bytesize::ByteSize(b).to_string()),
                health: health(device.status.as_ref(), color),
            })
        })
        .collect()
}

fn partition_row(partition: &Partition, color: bool) -> PartitionRow {
    PartitionRow {
        id: opt(partition.id.as_deref()),
        device: partition
            .links
            .first()
            .map_or_else(|| "-".into(), |l| l.device.id().to_owned()),
        capacity: output::bytes(partition.capacity_bytes.as_ref()),
        free: output::bytes(partition.free_bytes.as_ref()),
        file_system: opt(partition.file_system.as_deref()),
        mount_path: opt(partition.mount_path.as_deref().filter(|p| !p.is_empty())),
        state: health(partition.status.as_ref(), color),
    }
}

fn nfs_row(mount: &NfsMount) -> NfsRow {
    NfsRow {
        server: opt(mount.server_ip.as_deref()),
        dir: opt(mount.server_dir.as_deref()),
        mount_path: opt(mount.mount_path.as_deref()),
        capacity: output::bytes(mount.capacity_bytes.as_ref()),
        free: output::bytes(mount.free_bytes.as_ref()),
        status: opt_value(mount.status.as_ref()),
    }
}

/// `--device` takes a disk id or its full resource path.
fn device_path(device: &str) -> String {
    if device.starts_with('/') {
        device.to_owned()
    } else {
        format!("{}/{device}", paths::SIMPLE_STORAGES)
    }
}

impl From<NfsTarget> for NfsMountRequest {
    fn from(target: NfsTarget) -> Self {
        NfsMountRequest::nfs4(target.server, target.dir, target.mount_path)
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(app: &App<'_>, args: StorageArgs) -> Result<(), CliError> {
    match args.command {
        StorageCommand::Disks => {
            let storages = app.console.disks().await?;
            let rows = disk_rows(&storages, app.color());
            let out = output::render_list(&app.global.output, &rows, DiskRow::clone, |r| {
                r.device.clone()
            });
            app.print(&out);
            Ok(())
        }
        StorageCommand::Partitions(args) => partitions(app, args).await,
        StorageCommand::Nfs(args) => nfs(app, args).await,
    }
}

async fn partitions(app: &App<'_>, args: PartitionArgs) -> Result<(), CliError> {
    let console = &app.console;

    match args.command {
        PartitionCommand::List => {
            let partitions = console.partitions().await?;
            let color = app.color();
            let out = output::render_list(
                &app.global.output,
                &partitions,
                |p| partition_row(p, color),
                |p| opt(p.id.as_deref()),
            );
            app.print(&out);
        }

        PartitionCommand::Create {
            device,
            number,
            capacity,
        } => {
            console
                .create_partitions(number, capacity, &device_path(&device))
                .await?;
            app.done(&format!("Created {number} partition(s) of {capacity} GB"));
        }

        PartitionCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete partition {id}? Its data will be lost."),
                app.global.yes,
            )? {
                return Err(CliError::Cancelled);
            }
            console.delete_partition(&id).await?;
            app.done(&format!("Partition {id} deleted"));
        }

        PartitionCommand::Mount { id, path } => {
            console.mount_partition(&id, &path).await?;
            app.done(&format!("Partition {id} mounted at {path}"));
        }

        PartitionCommand::Unmount { id } => {
            console.unmount_partition(&id).await?;
            app.done(&format!("Partition {id} unmounted"));
        }
    }
    Ok(())
}

async fn nfs(app: &App<'_>, args: NfsArgs) -> Result<(), CliError> {
    let console = &app.console;

    match args.command {
        NfsCommand::List => {
            let manage = console.run(console.client().nfs_mounts()).await?;
            let out = output::render_list(&app.global.output, &manage.mounts, nfs_row, |m| {
                opt(m.mount_path.as_deref())
            });
            app.print(&out);
        }

        NfsCommand::Mount(target) => {
            let request = NfsMountRequest::from(target);
            console.mount_nfs(&request).await?;
            app.done(&format!(
                "{}:{} mounted at {}",
                request.server_ip, request.server_dir, request.mount_path
            ));
        }

        NfsCommand::Unmount(target) => {
            let request = NfsMountRequest::from(target);
            console.unmount_nfs(&request).await?;
            app.done(&format!("{} unmounted", request.mount_path));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use atlasom_api::redfish::StorageDevice;

    use super::*;

    #[test]
    fn device_ids_expand_to_resource_paths() {
        assert_eq!(device_path("1"), "/redfish/v1/Systems/SimpleStorages/1");
        assert_eq!(
            device_path("/redfish/v1/Systems/SimpleStorages/2"),
            "/redfish/v1/Systems/SimpleStorages/2"
        );
    }

    #[test]
    fn one_disk_row_per_device() {
        let storages = vec![SimpleStorage {
            id: Some("1".into()),
            devices: vec![
                StorageDevice {
                    name: Some("eMMC".into()),
                    capacity_bytes: Some(32_000_000_000),
                    ..StorageDevice::default()
                },
                StorageDevice {
                    name: Some("sda".into()),
                    ..StorageDevice::default()
                },
            ],
            ..SimpleStorage::default()
        }];
        let rows = disk_rows(&storages, false);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].storage, "1");
        assert_eq!(rows[0].capacity, bytesize::ByteSize(32_000_000_000).to_string());
        assert_eq!(rows[1].capacity, "-");
    }
}
