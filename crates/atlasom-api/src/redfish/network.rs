// Network endpoints
//
// Wired interfaces (GMAC0/GMAC1), the LTE modem, NTP, NFS mounts and the
// network-manager (FusionDirector / local web) takeover settings.

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info};

use crate::error::Error;
use crate::redfish::client::RedfishClient;
use crate::redfish::paths;
use crate::redfish::types::{
    ApnAuthType, Collection, EthernetInterface, GenericResource, Ipv4AddressConfig, LteConfig,
    LteStatus, ManagerType, NetManager, NfsManage, NfsMountRequest, NtpConfig, NtpService,
};
use crate::request::RequestOptions;

/// APN settings for `PATCH /redfish/v1/Systems/LTE/ConfigInfo`.
#[derive(Debug, Clone)]
pub struct ApnSettings {
    pub apn_name: String,
    pub apn_user: Option<String>,
    pub apn_password: Option<SecretString>,
    pub auth_type: ApnAuthType,
}

/// Body for `POST /redfish/v1/NetManager`.
#[derive(Debug, Clone)]
pub struct NetManagerSettings {
    pub manager_type: ManagerType,
    pub net_ip: Option<String>,
    pub port: Option<u16>,
    pub net_account: Option<String>,
    pub net_password: Option<SecretString>,
    pub server_name: Option<String>,
    pub node_id: Option<String>,
    /// Probe connectivity only, without switching the manager.
    pub test: bool,
}

impl RedfishClient {
    // ── Ethernet ─────────────────────────────────────────────────────

    /// `GET /redfish/v1/Systems/EthernetInterfaces`
    pub async fn ethernet_interfaces(&self) -> Result<Collection, Error> {
        self.get_json(paths::ETHERNET_INTERFACES).await
    }

    /// `GET /redfish/v1/Systems/EthernetInterfaces/{id}`
    pub async fn ethernet_interface(&self, id: &str) -> Result<EthernetInterface, Error> {
        self.get_json(&paths::member(paths::ETHERNET_INTERFACES, id))
            .await
    }

    /// Replace the static IPv4 addresses of an interface (1..=4 entries).
    ///
    /// `PATCH /redfish/v1/Systems/EthernetInterfaces/{id}` with `{IPv4Addresses: [...]}`
    pub async fn configure_ethernet(
        &self,
        id: &str,
        addresses: &[Ipv4AddressConfig],
    ) -> Result<serde_json::Value, Error> {
        debug!(id, count = addresses.len(), "configuring ethernet interface");
        self.patch_json(
            &paths::member(paths::ETHERNET_INTERFACES, id),
            &json!({ "IPv4Addresses": addresses }),
        )
        .await
    }

    /// `GET /redfish/v1/Systems/EthIpList`
    pub async fn eth_ip_list(&self) -> Result<serde_json::Value, Error> {
        self.get_json(paths::ETH_IP_LIST).await
    }

    // ── LTE ──────────────────────────────────────────────────────────

    /// `GET /redfish/v1/Systems/LTE`
    pub async fn lte(&self) -> Result<GenericResource, Error> {
        self.get_json(paths::LTE).await
    }

    /// `GET /redfish/v1/Systems/LTE/StatusInfo`
    pub async fn lte_status(&self) -> Result<LteStatus, Error> {
        self.get_json(paths::LTE_STATUS).await
    }

    /// Switch the modem and its data connection.
    ///
    /// `PATCH /redfish/v1/Systems/LTE/StatusInfo` with `{state_lte, state_data}`.
    /// Data can only be on while the modem is on.
    pub async fn set_lte_status(
        &self,
        state_lte: bool,
        state_data: bool,
    ) -> Result<serde_json::Value, Error> {
        debug!(state_lte, state_data, "setting LTE status");
        self.patch_json(
            paths::LTE_STATUS,
            &json!({ "state_lte": state_lte, "state_data": state_data && state_lte }),
        )
        .await
    }

    /// `GET /redfish/v1/Systems/LTE/ConfigInfo`
    pub async fn lte_config(&self) -> Result<LteConfig, Error> {
        self.get_json(paths::LTE_CONFIG).await
    }

    /// `PATCH /redfish/v1/Systems/LTE/ConfigInfo` with
    /// `{apn_name, apn_user, apn_passwd, auth_type}`
    pub async fn set_lte_config(&self, apn: &ApnSettings) -> Result<serde_json::Value, Error> {
        debug!(apn = %apn.apn_name, "setting LTE APN");
        let mut body = json!({
            "apn_name": apn.apn_name,
            "auth_type": apn.auth_type.wire_value(),
        });
        // No authentication means no user or password at all.
        if apn.auth_type != ApnAuthType::None {
            body["apn_user"] = json!(apn.apn_user.clone().unwrap_or_default());
            body["apn_passwd"] = json!(
                apn.apn_password
                    .as_ref()
                    .map(|p| p.expose_secret().to_owned())
                    .unwrap_or_default()
            );
        }
        self.patch_json(paths::LTE_CONFIG, &body).await
    }

    // ── NTP ──────────────────────────────────────────────────────────

    /// `GET /redfish/v1/Systems/NTPService`
    pub async fn ntp_service(&self) -> Result<NtpService, Error> {
        self.get_json(paths::NTP_SERVICE).await
    }

    /// `PATCH /redfish/v1/Systems/NTPService`
    pub async fn configure_ntp(&self, config: &NtpConfig) -> Result<serde_json::Value, Error> {
        debug!(?config, "configuring NTP");
        self.patch_json(paths::NTP_SERVICE, config).await
    }

    // ── NFS ──────────────────────────────────────────────────────────

    /// `GET /redfish/v1/Systems/NfsManage`
    pub async fn nfs_mounts(&self) -> Result<NfsManage, Error> {
        self.get_json(paths::NFS_MANAGE).await
    }

    /// `POST /redfish/v1/Systems/NfsManage/Actions/NfsManage.Mount`
    pub async fn mount_nfs(&self, request: &NfsMountRequest) -> Result<serde_json::Value, Error> {
        info!(server = %request.server_ip, dir = %request.server_dir, "mounting NFS share");
        self.post_json(paths::NFS_MOUNT, request).await
    }

    /// `POST /redfish/v1/Systems/NfsManage/Actions/NfsManage.Unmount`
    pub async fn unmount_nfs(&self, request: &NfsMountRequest) -> Result<serde_json::Value, Error> {
        info!(path = %request.mount_path, "unmounting NFS share");
        self.post_json(paths::NFS_UNMOUNT, request).await
    }

    // ── Net manager ──────────────────────────────────────────────────

    /// `GET /redfish/v1/NetManager`
    pub async fn net_manager(&self) -> Result<NetManager, Error> {
        self.get_json(paths::NET_MANAGER).await
    }

    /// Hand the appliance to FusionDirector or back to the web console.
    ///
    /// `POST /redfish/v1/NetManager`. A 206 response means the switch was
    /// only partially applied; the raw response is returned so callers can
    /// tell.
    pub async fn configure_net_manager(
        &self,
        settings: &NetManagerSettings,
    ) -> Result<crate::redfish::client::RedfishResponse, Error> {
        info!(manager = %settings.manager_type, test = settings.test, "configuring net manager");
        let mut body = json!({
            "ManagerType": settings.manager_type,
            "test": settings.test,
        });
        if let Some(ip) = &settings.net_ip {
            body["NetIP"] = json!(ip);
        }
        if let Some(port) = settings.port {
            body["Port"] = json!(port);
        }
        if let Some(account) = &settings.net_account {
            body["NetAccount"] = json!(account);
        }
        if let Some(password) = &settings.net_password {
            body["NetPassword"] = json!(password.expose_secret());
        }
        if let Some(name) = &settings.server_name {
            body["ServerName"] = json!(name);
        }
        if let Some(node_id) = &settings.node_id {
            body["NodeId"] = json!(node_id);
        }
        self.create(paths::NET_MANAGER, &body, &RequestOptions::default())
            .await
    }

    /// `GET /redfish/v1/NetManager/NodeID`
    pub async fn node_id(&self) -> Result<serde_json::Value, Error> {
        self.get_json(paths::NET_MANAGER_NODE_ID).await
    }

    /// `GET /redfish/v1/NetManager/QueryFdCert`
    pub async fn fd_cert(&self) -> Result<serde_json::Value, Error> {
        self.get_json(paths::NET_MANAGER_FD_CERT).await
    }

    /// Multipart `POST /redfish/v1/NetManager/ImportFdCert`
    pub async fn import_fd_cert(&self, file: &Path) -> Result<serde_json::Value, Error> {
        info!(file = %file.display(), "importing FusionDirector certificate");
        self.upload(paths::NET_MANAGER_IMPORT_FD_CERT, file, &RequestOptions::default())
            .await?
            .json()
    }

    /// Multipart `POST /redfish/v1/NetManager/ImportFdCrl`
    pub async fn import_fd_crl(&self, file: &Path) -> Result<serde_json::Value, Error> {
        info!(file = %file.display(), "importing FusionDirector CRL");
        self.upload(paths::NET_MANAGER_IMPORT_FD_CRL, file, &RequestOptions::default())
            .await?
            .json()
    }
}
