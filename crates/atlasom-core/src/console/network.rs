// Network settings: static addresses, LTE, NTP, NFS and the net manager.

use std::collections::HashSet;
use std::path::Path;

use atlasom_api::redfish::{
    ApnAuthType, ApnSettings, Ipv4AddressConfig, LteConfig, LteStatus, ManagerType,
    NetManagerSettings, NfsMountRequest, NtpConfig,
};
use secrecy::ExposeSecret;
use serde_json::Value;

use super::Console;
use crate::device::Capability;
use crate::error::CoreError;
use crate::error_code::{Locale, PartialSuccess};
use crate::validate::{self, Rule};

/// Most addresses one interface accepts.
pub const MAX_IPV4_ADDRESSES: usize = 4;

/// Certificate files FusionDirector accepts.
pub const FD_CERT_SUFFIXES: &[&str] = &[".crt", ".cer", ".pem"];
pub const FD_CRL_SUFFIXES: &[&str] = &[".crl"];

fn check_address(address: &Ipv4AddressConfig, locale: Locale) -> Result<(), CoreError> {
    validate::required("address", &address.address, locale)?;
    Rule::Ip.validate("address", &address.address, locale)?;
    validate::required("subnet-mask", &address.subnet_mask, locale)?;
    Rule::SubnetMask.validate("subnet-mask", &address.subnet_mask, locale)?;
    Rule::Ip.validate("gateway", &address.gateway, locale)?;
    Rule::NetworkUsage.validate("tag", &address.tag, locale)?;
    if let Some(vlan) = address.vlan_id {
        Rule::VlanId.validate("vlan", &vlan.to_string(), locale)?;
    }
    if let Some(remote) = &address.remote_test_ip {
        Rule::Ip.validate("remote-test-ip", remote, locale)?;
    }
    if address.address_origin != "Static" {
        return Err(CoreError::validation(
            "address-origin",
            locale.pick("only static addresses can be set", "仅支持配置静态地址"),
        ));
    }
    Ok(())
}

impl Console {
    // ── Ethernet ─────────────────────────────────────────────────────

    /// Replace the static IPv4 addresses of one interface.
    pub async fn configure_ethernet(
        &self,
        id: &str,
        addresses: &[Ipv4AddressConfig],
    ) -> Result<Value, CoreError> {
        let locale = self.locale();
        validate::required("interface", id, locale)?;
        if addresses.is_empty() || addresses.len() > MAX_IPV4_ADDRESSES {
            return Err(CoreError::validation(
                "address",
                locale.pick(
                    "an interface takes 1 to 4 addresses",
                    "每个网口可配置 1-4 个地址",
                ),
            ));
        }

        let mut seen = HashSet::new();
        for address in addresses {
            check_address(address, locale)?;
            if !seen.insert(address.address.as_str()) {
                return Err(CoreError::validation(
                    "address",
                    locale.pick("duplicate address", "地址重复"),
                ));
            }
        }
        self.run(self.client().configure_ethernet(id, addresses))
            .await
    }

    // ── LTE ──────────────────────────────────────────────────────────

    pub async fn lte_status(&self) -> Result<LteStatus, CoreError> {
        self.require(Capability::Lte)?;
        self.run(self.client().lte_status()).await
    }

    pub async fn lte_config(&self) -> Result<LteConfig, CoreError> {
        self.require(Capability::Lte)?;
        self.run(self.client().lte_config()).await
    }

    /// Switch the modem and mobile data. Data cannot be on with the modem off.
    pub async fn set_lte_status(&self, lte: bool, data: bool) -> Result<Value, CoreError> {
        self.require(Capability::Lte)?;
        if data && !lte {
            return Err(CoreError::validation(
                "data",
                self.locale().pick(
                    "mobile data needs the LTE modem enabled",
                    "开启移动数据前须先开启 LTE",
                ),
            ));
        }
        self.run(self.client().set_lte_status(lte, data)).await
    }

    pub async fn set_apn(&self, apn: &ApnSettings) -> Result<Value, CoreError> {
        self.require(Capability::Lte)?;
        let locale = self.locale();
        validate::required("apn", &apn.apn_name, locale)?;
        Rule::Apn.validate("apn", &apn.apn_name, locale)?;
        if apn.auth_type != ApnAuthType::None {
            validate::required("user", apn.apn_user.as_deref().unwrap_or_default(), locale)?;
            validate::required(
                "password",
                apn.apn_password
                    .as_ref()
                    .map(ExposeSecret::expose_secret)
                    .unwrap_or_default(),
                locale,
            )?;
        }
        self.run(self.client().set_lte_config(apn)).await
    }

    // ── NTP ──────────────────────────────────────────────────────────

    pub async fn configure_ntp(&self, config: &NtpConfig) -> Result<Value, CoreError> {
        let locale = self.locale();
        if config.server_enabled {
            return Err(CoreError::validation(
                "server",
                locale.pick(
                    "the appliance can only run as an NTP client",
                    "设备仅支持作为 NTP 客户端",
                ),
            ));
        }
        if config.target != "Client" {
            return Err(CoreError::validation(
                "target",
                locale.pick("target must be Client", "目标须为 Client"),
            ));
        }
        if config.client_enabled {
            validate::required("server", &config.remote_servers, locale)?;
        }
        Rule::Ip.validate("server", &config.remote_servers, locale)?;
        Rule::Ip.validate("backup-server", &config.remote_servers_backup, locale)?;
        Rule::Ip.validate("local-server", &config.local_servers, locale)?;
        if !config.remote_servers_backup.is_empty()
            && config.remote_servers_backup == config.remote_servers
        {
            return Err(CoreError::validation(
                "backup-server",
                locale.pick(
                    "the backup server must differ from the primary",
                    "备用服务器不能与主服务器相同",
                ),
            ));
        }
        self.run(self.client().configure_ntp(config)).await
    }

    // ── NFS ──────────────────────────────────────────────────────────

    fn check_nfs(&self, request: &NfsMountRequest) -> Result<(), CoreError> {
        let locale = self.locale();
        validate::required("server", &request.server_ip, locale)?;
        Rule::Ip.validate("server", &request.server_ip, locale)?;
        validate::required("server-dir", &request.server_dir, locale)?;
        Rule::ServerPath.validate("server-dir", &request.server_dir, locale)?;
        validate::required("mount-path", &request.mount_path, locale)?;
        Rule::ServerPath.validate("mount-path", &request.mount_path, locale)?;
        if request.file_system != "nfs4" {
            return Err(CoreError::validation(
                "file-system",
                locale.pick("only nfs4 is supported", "仅支持 nfs4"),
            ));
        }
        Ok(())
    }

    pub async fn mount_nfs(&self, request: &NfsMountRequest) -> Result<Value, CoreError> {
        self.check_nfs(request)?;
        self.run(self.client().mount_nfs(request)).await
    }

    pub async fn unmount_nfs(&self, request: &NfsMountRequest) -> Result<Value, CoreError> {
        self.check_nfs(request)?;
        self.run(self.client().unmount_nfs(request)).await
    }

    // ── Net manager ──────────────────────────────────────────────────

    /// Switch between local web management and FusionDirector.
    ///
    /// Returns the partial-success notice when the appliance answered 206.
    pub async fn configure_net_manager(
        &self,
        settings: &NetManagerSettings,
    ) -> Result<Option<String>, CoreError> {
        let locale = self.locale();
        if settings.manager_type == ManagerType::FusionDirector {
            let ip = settings.net_ip.as_deref().unwrap_or_default();
            validate::required("ip", ip, locale)?;
            Rule::Ip.validate("ip", ip, locale)?;
            let port = settings.port.map(|p| p.to_string()).unwrap_or_default();
            validate::required("port", &port, locale)?;
            Rule::Port.validate("port", &port, locale)?;
            let account = settings.net_account.as_deref().unwrap_or_default();
            validate::required("account", account, locale)?;
            Rule::Account.validate("account", account, locale)?;
            if let Some(password) = &settings.net_password {
                self.check_password("password", password)?;
            } else {
                validate::required("password", "", locale)?;
            }
            Rule::ServerName.validate(
                "server-name",
                settings.server_name.as_deref().unwrap_or_default(),
                locale,
            )?;
            Rule::NodeId.validate(
                "node-id",
                settings.node_id.as_deref().unwrap_or_default(),
                locale,
            )?;
        }

        let response = self
            .run(self.client().configure_net_manager(settings))
            .await?;
        Ok(response
            .is_partial_success()
            .then(|| PartialSuccess::NetManager.message(locale).to_owned()))
    }

    // ── FusionDirector trust ─────────────────────────────────────────

    pub async fn import_fd_cert(&self, file: &Path) -> Result<Value, CoreError> {
        self.check_upload(file, FD_CERT_SUFFIXES)?;
        self.run(self.client().import_fd_cert(file)).await
    }

    pub async fn import_fd_crl(&self, file: &Path) -> Result<Value, CoreError> {
        self.check_upload(file, FD_CRL_SUFFIXES)?;
        self.run(self.client().import_fd_crl(file)).await
    }
}
