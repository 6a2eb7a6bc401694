//! Network command handlers: Ethernet, LTE, NTP and network manager.

use std::net::Ipv4Addr;

use atlasom_api::redfish::{EthernetInterface, LteStatus, NetManager, NtpService};
use atlasom_core::{
    ApnAuthType, ApnSettings, Ipv4AddressConfig, ManagerType, NetManagerSettings, NtpConfig,
};
use tabled::Tabled;

use crate::cli::{
    ApnAuth, LteArgs, LteCommand, ManagerArgs, ManagerCommand, ManagerMode, NetworkArgs,
    NetworkCommand, NtpArgs, NtpCommand,
};
use crate::error::CliError;
use crate::output::{self, opt, opt_value};

use super::{App, util};

// ── Rows ────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct InterfaceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "IPv4")]
    addresses: String,
}

fn addresses(iface: &EthernetInterface) -> String {
    iface
        .ipv4_addresses
        .iter()
        .filter_map(|a| {
            a.address
                .as_deref()
                .map(|addr| format!("{addr}/{}", a.subnet_mask.as_deref().unwrap_or("?")))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn interface_row(iface: &EthernetInterface, color: bool) -> InterfaceRow {
    InterfaceRow {
        id: opt(iface.id.as_deref()),
        name: opt(iface.name.as_deref()),
        mac: opt(iface.mac_address.as_deref()),
        link: iface
            .link_status
            .as_deref()
            .map_or_else(|| "-".into(), |s| output::paint_state(s, color)),
        speed: iface
            .speed_mbps
            .map_or_else(|| "-".into(), |s| format!("{s} Mbps")),
        addresses: addresses(iface),
    }
}

fn interface_detail(iface: &EthernetInterface, color: bool) -> String {
    let row = interface_row(iface, color);
    let mut pairs = vec![
        ("ID", row.id),
        ("Name", row.name),
        ("MAC", row.mac),
        ("Permanent MAC", opt(iface.permanent_mac_address.as_deref())),
        ("Link", row.link),
        ("Speed", row.speed),
        ("Full duplex", opt(iface.full_duplex)),
        ("Enabled", opt(iface.interface_enabled)),
    ];
    for address in &iface.ipv4_addresses {
        pairs.push((
            "IPv4",
            format!(
                "{}/{} gw {} vlan {} tag {} ({})",
                opt(address.address.as_deref()),
                opt(address.subnet_mask.as_deref()),
                opt_value(address.gateway.as_ref()),
                opt_value(address.vlan_id.as_ref()),
                opt(address.tag.as_deref().filter(|t| !t.is_empty())),
                opt(address.address_origin.as_deref()),
            ),
        ));
    }
    output::detail_table(&pairs)
}

fn lte_detail(status: &LteStatus) -> String {
    output::detail_table(&[
        ("Modem", opt(status.lte_enable)),
        ("Mobile data", opt(status.state_data)),
        ("Connected", opt(status.state_lte)),
        ("SIM present", opt(status.sim_exist)),
        ("Default gateway", opt(status.default_gateway)),
        ("Network", opt(status.network_type.as_deref())),
        ("Signal level", opt_value(status.network_signal_level.as_ref())),
        ("Address", opt(status.ip_addr.as_deref())),
    ])
}

fn ntp_detail(ntp: &NtpService) -> String {
    output::detail_table(&[
        ("Client enabled", opt(ntp.client_enabled)),
        ("Server enabled", opt(ntp.server_enabled)),
        ("Server", opt(ntp.remote_servers.as_deref())),
        ("Backup server", opt(ntp.remote_servers_backup.as_deref())),
        ("Local server", opt(ntp.local_servers.as_deref())),
    ])
}

fn manager_detail(manager: &NetManager, color: bool) -> String {
    output::detail_table(&[
        ("Mode", opt(manager.manager_type.as_deref())),
        ("Server", opt(manager.net_ip.as_deref())),
        ("Port", opt_value(manager.port.as_ref())),
        ("Account", opt(manager.net_account.as_deref())),
        ("Server name", opt(manager.server_name.as_deref())),
        ("Node ID", opt(manager.node_id.as_deref())),
        (
            "Connection",
            manager
                .connect_status
                .as_deref()
                .map_or_else(|| "-".into(), |s| output::paint_state(s, color)),
        ),
    ])
}

// ── Argument parsing ────────────────────────────────────────────────

/// Parse `ADDRESS/MASK[,GATEWAY[,VLAN[,TAG]]]`. MASK is dotted or a prefix
/// length. Field checks are left to the console.
fn parse_address(spec: &str) -> Result<Ipv4AddressConfig, CliError> {
    let invalid = |reason: &str| CliError::Validation {
        field: "address".into(),
        reason: format!("{reason} in '{spec}'"),
    };

    let mut parts = spec.split(',').map(str::trim);
    let (address, mask) = parts
        .next()
        .and_then(|cidr| cidr.split_once('/'))
        .ok_or_else(|| invalid("expected ADDRESS/MASK"))?;
    let mask = match mask.parse::<u8>() {
        Ok(prefix) if prefix <= 32 => prefix_to_mask(prefix),
        Ok(_) => return Err(invalid("prefix length above 32")),
        Err(_) => mask.to_owned(),
    };

    let mut config = Ipv4AddressConfig::new_static(address, mask);
    if let Some(gateway) = parts.next() {
        config.gateway = gateway.to_owned();
    }
    if let Some(vlan) = parts.next().filter(|v| !v.is_empty()) {
        config.vlan_id = Some(vlan.parse().map_err(|_| invalid("VLAN must be a number"))?);
    }
    if let Some(tag) = parts.next() {
        config.tag = tag.to_owned();
    }
    if parts.next().is_some() {
        return Err(invalid("too many fields"));
    }
    Ok(config)
}

fn prefix_to_mask(prefix: u8) -> String {
    let bits = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
    Ipv4Addr::from(bits).to_string()
}

impl From<ApnAuth> for ApnAuthType {
    fn from(auth: ApnAuth) -> Self {
        match auth {
            ApnAuth::None => ApnAuthType::None,
            ApnAuth::Pap => ApnAuthType::Pap,
            ApnAuth::Chap => ApnAuthType::Chap,
            ApnAuth::PapOrChap => ApnAuthType::PapOrChap,
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(app: &App<'_>, args: NetworkArgs) -> Result<(), CliError> {
    let console = &app.console;
    let client = console.client();
    let format = &app.global.output;
    let color = app.color();

    match args.command {
        NetworkCommand::List => {
            let collection = console.run(client.ethernet_interfaces()).await?;
            let mut interfaces = Vec::new();
            for id in collection.member_ids() {
                interfaces.push(console.run(client.ethernet_interface(&id)).await?);
            }
            let out = output::render_list(
                format,
                &interfaces,
                |i| interface_row(i, color),
                |i| opt(i.id.as_deref()),
            );
            app.print(&out);
        }

        NetworkCommand::Get { id } => {
            let iface = console.run(client.ethernet_interface(&id)).await?;
            let out = output::render_single(
                format,
                &iface,
                |i| interface_detail(i, color),
                |i| opt(i.id.as_deref()),
            );
            app.print(&out);
        }

        NetworkCommand::SetIp { id, addresses } => {
            let addresses = addresses
                .iter()
                .map(|spec| parse_address(spec))
                .collect::<Result<Vec<_>, _>>()?;
            if !util::confirm(
                &format!("Replace the addresses of {id}? The connection may drop."),
                app.global.yes,
            )? {
                return Err(CliError::Cancelled);
            }
            console.configure_ethernet(&id, &addresses).await?;
            app.done(&format!("Addresses of {id} updated"));
        }

        NetworkCommand::Ips => {
            let ips = console.run(client.eth_ip_list()).await?;
            let out = output::render_single(format, &ips, output::json_detail, |v| {
                output::render_json_compact(v)
            });
            app.print(&out);
        }

        NetworkCommand::Lte(args) => lte(app, args).await?,
        NetworkCommand::Ntp(args) => ntp(app, args).await?,
        NetworkCommand::Manager(args) => manager(app, args).await?,
    }
    Ok(())
}

async fn lte(app: &App<'_>, args: LteArgs) -> Result<(), CliError> {
    let console = &app.console;
    let format = &app.global.output;

    match args.command {
        LteCommand::Status => {
            let status = console.lte_status().await?;
            let out = output::render_single(format, &status, lte_detail, |s| {
                opt(s.network_type.as_deref())
            });
            app.print(&out);
        }

        LteCommand::Enable { off, data } => {
            console.set_lte_status(!off, data).await?;
            app.done(if off { "LTE modem disabled" } else { "LTE modem enabled" });
        }

        LteCommand::Apn { name: None, .. } => {
            let config = console.lte_config().await?;
            let out = output::render_single(
                format,
                &config,
                |c| {
                    output::detail_table(&[
                        ("APN", opt(c.apn_name.as_deref())),
                        ("User", opt(c.apn_user.as_deref())),
                        ("Authentication", opt(c.auth_type.as_deref())),
                        ("Mode", opt(c.mode.as_deref())),
                    ])
                },
                |c| opt(c.apn_name.as_deref()),
            );
            app.print(&out);
        }

        LteCommand::Apn {
            name: Some(apn_name),
            user,
            password,
            auth,
        } => {
            let apn_password = if password {
                Some(util::prompt_secret("APN password")?)
            } else {
                None
            };
            let settings = ApnSettings {
                apn_name,
                apn_user: user,
                apn_password,
                auth_type: auth.into(),
            };
            console.set_apn(&settings).await?;
            app.done("APN updated");
        }
    }
    Ok(())
}

async fn ntp(app: &App<'_>, args: NtpArgs) -> Result<(), CliError> {
    let console = &app.console;

    match args.command {
        NtpCommand::Get => {
            let ntp = console.run(console.client().ntp_service()).await?;
            let out = output::render_single(&app.global.output, &ntp, ntp_detail, |n| {
                opt(n.remote_servers.as_deref())
            });
            app.print(&out);
        }

        NtpCommand::Set {
            server,
            backup,
            local,
            disable,
        } => {
            let config = NtpConfig {
                client_enabled: !disable,
                server_enabled: false,
                remote_servers: server.unwrap_or_default(),
                remote_servers_backup: backup.unwrap_or_default(),
                local_servers: local.unwrap_or_default(),
                target: "Client".into(),
            };
            console.configure_ntp(&config).await?;
            app.done(if disable { "NTP client disabled" } else { "NTP settings updated" });
        }
    }
    Ok(())
}

async fn manager(app: &App<'_>, args: ManagerArgs) -> Result<(), CliError> {
    let console = &app.console;
    let client = console.client();
    let color = app.color();

    match args.command {
        ManagerCommand::Get => {
            let manager = console.run(client.net_manager()).await?;
            let out = output::render_single(
                &app.global.output,
                &manager,
                |m| manager_detail(m, color),
                |m| opt(m.manager_type.as_deref()),
            );
            app.print(&out);
        }

        ManagerCommand::Set {
            mode,
            ip,
            port,
            account,
            server_name,
            node_id,
            test,
        } => {
            let manager_type = match mode {
                ManagerMode::Web => ManagerType::Web,
                ManagerMode::FusionDirector => ManagerType::FusionDirector,
            };
            let fusion = manager_type == ManagerType::FusionDirector;
            let net_password = if fusion {
                Some(util::prompt_secret("FusionDirector password")?)
            } else {
                None
            };
            let settings = NetManagerSettings {
                manager_type,
                net_ip: ip,
                port: fusion.then_some(port),
                net_account: account,
                net_password,
                server_name,
                node_id,
                test,
            };
            let notice = console.configure_net_manager(&settings).await?;
            util::notice(notice.as_deref(), app.quiet());
            app.done(if test {
                "Connection test passed"
            } else {
                "Management mode updated"
            });
        }

        ManagerCommand::ImportCert { file } => {
            console.import_fd_cert(&file).await?;
            app.done("FusionDirector certificate imported");
        }

        ManagerCommand::ImportCrl { file } => {
            console.import_fd_crl(&file).await?;
            app.done("FusionDirector CRL imported");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_spec_with_prefix_and_extras() {
        let config = parse_address("192.168.2.111/24,192.168.2.1,10,web").expect("parses");
        assert_eq!(config.address, "192.168.2.111");
        assert_eq!(config.subnet_mask, "255.255.255.0");
        assert_eq!(config.gateway, "192.168.2.1");
        assert_eq!(config.vlan_id, Some(10));
        assert_eq!(config.tag, "web");
        assert_eq!(config.address_origin, "Static");
    }

    #[test]
    fn address_spec_with_dotted_mask() {
        let config = parse_address("10.0.0.2/255.255.0.0").expect("parses");
        assert_eq!(config.subnet_mask, "255.255.0.0");
        assert!(config.gateway.is_empty());
        assert_eq!(config.vlan_id, None);
    }

    #[test]
    fn address_spec_errors() {
        assert!(parse_address("10.0.0.2").is_err());
        assert!(parse_address("10.0.0.2/33").is_err());
        assert!(parse_address("10.0.0.2/24,,vlan").is_err());
        assert!(parse_address("10.0.0.2/24,a,1,t,extra").is_err());
    }

    #[test]
    fn prefix_lengths() {
        assert_eq!(prefix_to_mask(0), "0.0.0.0");
        assert_eq!(prefix_to_mask(20), "255.255.240.0");
        assert_eq!(prefix_to_mask(32), "255.255.255.255");
    }
}
