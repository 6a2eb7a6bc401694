// Redfish resource types
//
// Models for the appliance's Redfish resources. Field presence varies across
// firmware releases, so nearly everything is optional and unknown fields land
// in `extra`. Request bodies are separate `Serialize`-only types so a
// response model is never echoed back to the appliance by accident.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};

// ── Common ───────────────────────────────────────────────────────────

/// `{"@odata.id": "/redfish/v1/..."}` reference to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ODataLink {
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
}

impl ODataLink {
    pub fn new(odata_id: impl Into<String>) -> Self {
        Self {
            odata_id: odata_id.into(),
        }
    }

    /// Last path segment of the reference, i.e. the member id.
    pub fn id(&self) -> &str {
        self.odata_id
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }
}

/// Redfish collection: a list of member links plus a count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Collection {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Members", default)]
    pub members: Vec<ODataLink>,
    #[serde(rename = "Members@odata.count", default)]
    pub count: Option<u64>,
}

impl Collection {
    pub fn member_ids(&self) -> Vec<String> {
        self.members.iter().map(|m| m.id().to_owned()).collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Status {
    #[serde(default)]
    pub health: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Any resource we only display, never interpret.
///
/// Hardware views (processors, memory, modules, extended devices) vary by
/// board and firmware, so they are shown as key/value detail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenericResource {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<Status>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Sessions & accounts ──────────────────────────────────────────────

/// Body of the 201 returned by `POST /redfish/v1/SessionService/Sessions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionInfo {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "UserName", default)]
    pub user_name: Option<String>,
    #[serde(rename = "@odata.id", default)]
    pub odata_id: Option<String>,
    #[serde(rename = "Oem", default)]
    pub oem: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionService {
    /// Minutes of inactivity before the appliance drops a session (5..=120).
    #[serde(rename = "SessionTimeout", default)]
    pub session_timeout: Option<u32>,
    #[serde(rename = "ServiceEnabled", default)]
    pub service_enabled: Option<bool>,
    #[serde(rename = "Sessions", default)]
    pub sessions: Option<ODataLink>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountService {
    /// Days before a password must be changed; 0 disables expiry.
    #[serde(rename = "PasswordExpirationDays", default)]
    pub password_expiration_days: Option<u32>,
    #[serde(rename = "Accounts", default)]
    pub accounts: Option<ODataLink>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "UserName", default)]
    pub user_name: Option<String>,
    #[serde(rename = "RoleId", default)]
    pub role_id: Option<String>,
    #[serde(rename = "Locked", default)]
    pub locked: Option<bool>,
    #[serde(rename = "Enabled", default)]
    pub enabled: Option<bool>,
    #[serde(rename = "Oem", default)]
    pub oem: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── System ───────────────────────────────────────────────────────────

/// `GET /redfish/v1/Systems`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComputerSystem {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "HostName", default)]
    pub host_name: Option<String>,
    #[serde(rename = "UUID", default)]
    pub uuid: Option<String>,
    #[serde(rename = "Model", default)]
    pub model: Option<String>,
    #[serde(rename = "SupportModel", default)]
    pub support_model: Option<String>,
    #[serde(rename = "SerialNumber", default)]
    pub serial_number: Option<String>,
    #[serde(rename = "AssetTag", default)]
    pub asset_tag: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<Status>,
    #[serde(rename = "Oem", default)]
    pub oem: Option<SystemOem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Vendor block of the system resource. Sensor readings arrive as numbers
/// or strings depending on firmware, so they stay as raw JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemOem {
    #[serde(rename = "PCBVersion", default)]
    pub pcb_version: Option<String>,
    #[serde(rename = "Temperature", default)]
    pub temperature: Option<Value>,
    #[serde(rename = "Power", default)]
    pub power: Option<Value>,
    #[serde(rename = "Voltage", default)]
    pub voltage: Option<Value>,
    #[serde(rename = "CpuUsage", default)]
    pub cpu_usage: Option<Value>,
    #[serde(rename = "MemoryUsage", default)]
    pub memory_usage: Option<Value>,
    #[serde(rename = "AiTemperature", default)]
    pub ai_temperature: Option<Value>,
    #[serde(rename = "KernelVersion", default)]
    pub kernel_version: Option<String>,
    #[serde(rename = "OSVersion", default)]
    pub os_version: Option<String>,
    #[serde(rename = "ProcessorArchitecture", default)]
    pub processor_architecture: Option<String>,
    #[serde(rename = "Uptime", default)]
    pub uptime: Option<Value>,
    #[serde(rename = "Datetime", default)]
    pub date_time: Option<String>,
    #[serde(rename = "DateTimeLocalOffset", default)]
    pub date_time_local_offset: Option<String>,
    #[serde(rename = "Firmware", default)]
    pub firmware: Vec<FirmwareInfo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FirmwareInfo {
    #[serde(rename = "Module", default)]
    pub module: Option<String>,
    #[serde(rename = "Version", default)]
    pub version: Option<String>,
    #[serde(rename = "InactiveVersion", default)]
    pub inactive_version: Option<String>,
    #[serde(rename = "BoardId", default)]
    pub board_id: Option<Value>,
    #[serde(rename = "UpgradeResult", default)]
    pub upgrade_result: Option<Value>,
    #[serde(rename = "UpgradeProcess", default)]
    pub upgrade_process: Option<Value>,
}

/// Body of `PATCH /redfish/v1/Systems`. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_tag: Option<String>,
    /// `YYYY-MM-DD HH:MM:SS`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time_local_offset: Option<String>,
}

impl SystemUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// `ResetType` accepted by `ComputerSystem.Reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString, Serialize)]
pub enum ResetType {
    GracefulRestart,
    ForceRestart,
    ColdReset,
}

// ── Network ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EthernetInterface {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "PermanentMACAddress", default)]
    pub permanent_mac_address: Option<String>,
    #[serde(rename = "MACAddress", default)]
    pub mac_address: Option<String>,
    #[serde(rename = "LinkStatus", default)]
    pub link_status: Option<String>,
    #[serde(rename = "InterfaceEnabled", default)]
    pub interface_enabled: Option<bool>,
    #[serde(rename = "SpeedMbps", default)]
    pub speed_mbps: Option<u64>,
    #[serde(rename = "FullDuplex", default)]
    pub full_duplex: Option<bool>,
    #[serde(rename = "IPv4Addresses", default)]
    pub ipv4_addresses: Vec<Ipv4Address>,
    #[serde(rename = "Oem", default)]
    pub oem: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ipv4Address {
    #[serde(rename = "Address", default)]
    pub address: Option<String>,
    #[serde(rename = "SubnetMask", default)]
    pub subnet_mask: Option<String>,
    #[serde(rename = "Gateway", default)]
    pub gateway: Option<Value>,
    #[serde(rename = "AddressOrigin", default)]
    pub address_origin: Option<String>,
    #[serde(rename = "VlanId", default)]
    pub vlan_id: Option<Value>,
    #[serde(rename = "Tag", default)]
    pub tag: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of the `IPv4Addresses` list sent with
/// `PATCH /redfish/v1/Systems/EthernetInterfaces/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ipv4AddressConfig {
    pub address: String,
    pub subnet_mask: String,
    /// Empty string clears the gateway.
    pub gateway: String,
    /// Only `"Static"` is accepted by the appliance.
    pub address_origin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
    /// Usage tag (e.g. `web`, `mgmt`); empty for none.
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_test: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_test_ip: Option<String>,
}

impl Ipv4AddressConfig {
    pub fn new_static(address: impl Into<String>, subnet_mask: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            subnet_mask: subnet_mask.into(),
            gateway: String::new(),
            address_origin: "Static".into(),
            vlan_id: None,
            tag: String::new(),
            connect_test: None,
            remote_test_ip: None,
        }
    }
}

/// `GET /redfish/v1/Systems/LTE/StatusInfo` (snake_case on the wire).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LteStatus {
    #[serde(default)]
    pub default_gateway: Option<bool>,
    #[serde(default)]
    pub lte_enable: Option<bool>,
    #[serde(default)]
    pub sim_exist: Option<bool>,
    #[serde(default)]
    pub state_lte: Option<bool>,
    #[serde(default)]
    pub state_data: Option<bool>,
    #[serde(default)]
    pub network_signal_level: Option<Value>,
    #[serde(default)]
    pub network_type: Option<String>,
    #[serde(default)]
    pub ip_addr: Option<String>,
}

/// `GET /redfish/v1/Systems/LTE/ConfigInfo`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LteConfig {
    #[serde(default)]
    pub apn_name: Option<String>,
    #[serde(default)]
    pub apn_user: Option<String>,
    #[serde(default)]
    pub auth_type: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// APN authentication type, sent as `"0"`..`"3"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApnAuthType {
    #[default]
    None,
    Pap,
    Chap,
    PapOrChap,
}

impl ApnAuthType {
    pub fn wire_value(self) -> &'static str {
        match self {
            Self::None => "0",
            Self::Pap => "1",
            Self::Chap => "2",
            Self::PapOrChap => "3",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NtpService {
    #[serde(rename = "ClientEnabled", default)]
    pub client_enabled: Option<bool>,
    #[serde(rename = "ServerEnabled", default)]
    pub server_enabled: Option<bool>,
    #[serde(rename = "NTPRemoteServers", default)]
    pub remote_servers: Option<String>,
    #[serde(rename = "NTPRemoteServersbak", default)]
    pub remote_servers_backup: Option<String>,
    #[serde(rename = "NTPLocalServers", default)]
    pub local_servers: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `PATCH /redfish/v1/Systems/NTPService`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NtpConfig {
    #[serde(rename = "ClientEnabled")]
    pub client_enabled: bool,
    /// The appliance only runs as an NTP client; must be `false`.
    #[serde(rename = "ServerEnabled")]
    pub server_enabled: bool,
    #[serde(rename = "NTPRemoteServers")]
    pub remote_servers: String,
    #[serde(rename = "NTPRemoteServersbak")]
    pub remote_servers_backup: String,
    #[serde(rename = "NTPLocalServers")]
    pub local_servers: String,
    #[serde(rename = "Target")]
    pub target: String,
}

/// Body of the `NfsManage.Mount` / `NfsManage.Unmount` actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfsMountRequest {
    #[serde(rename = "ServerIP")]
    pub server_ip: String,
    #[serde(rename = "ServerDir")]
    pub server_dir: String,
    #[serde(rename = "FileSystem")]
    pub file_system: String,
    #[serde(rename = "MountPath")]
    pub mount_path: String,
}

impl NfsMountRequest {
    pub fn nfs4(
        server_ip: impl Into<String>,
        server_dir: impl Into<String>,
        mount_path: impl Into<String>,
    ) -> Self {
        Self {
            server_ip: server_ip.into(),
            server_dir: server_dir.into(),
            file_system: "nfs4".into(),
            mount_path: mount_path.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NfsMount {
    #[serde(rename = "ServerIP", default)]
    pub server_ip: Option<String>,
    #[serde(rename = "ServerDir", default)]
    pub server_dir: Option<String>,
    #[serde(rename = "FileSystem", default)]
    pub file_system: Option<String>,
    #[serde(rename = "MountPath", default)]
    pub mount_path: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<Value>,
    #[serde(rename = "CapacityBytes", default)]
    pub capacity_bytes: Option<Value>,
    #[serde(rename = "FreeBytes", default)]
    pub free_bytes: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /redfish/v1/Systems/NfsManage`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NfsManage {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "nfsList", alias = "NfsList", default)]
    pub mounts: Vec<NfsMount>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /redfish/v1/NetManager`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetManager {
    #[serde(rename = "NetManager", alias = "ManagerType", default)]
    pub manager_type: Option<String>,
    #[serde(rename = "NetIP", default)]
    pub net_ip: Option<String>,
    #[serde(rename = "Port", default)]
    pub port: Option<Value>,
    #[serde(rename = "NetAccount", default)]
    pub net_account: Option<String>,
    #[serde(rename = "ServerName", default)]
    pub server_name: Option<String>,
    #[serde(rename = "NodeId", default)]
    pub node_id: Option<String>,
    #[serde(rename = "ConnectStatus", default)]
    pub connect_status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Who manages the appliance: the local web console or FusionDirector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString, Serialize)]
pub enum ManagerType {
    Web,
    FusionDirector,
}

// ── Storage ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimpleStorage {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Devices", default)]
    pub devices: Vec<StorageDevice>,
    #[serde(rename = "Status", default)]
    pub status: Option<Status>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageDevice {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Manufacturer", default)]
    pub manufacturer: Option<String>,
    #[serde(rename = "Model", default)]
    pub model: Option<String>,
    #[serde(rename = "CapacityBytes", default)]
    pub capacity_bytes: Option<u64>,
    #[serde(rename = "Status", default)]
    pub status: Option<Status>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Partition {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "CapacityBytes", default)]
    pub capacity_bytes: Option<Value>,
    #[serde(rename = "FreeBytes", default)]
    pub free_bytes: Option<Value>,
    #[serde(rename = "FileSystem", default)]
    pub file_system: Option<String>,
    #[serde(rename = "MountPath", default)]
    pub mount_path: Option<String>,
    #[serde(rename = "Primary", default)]
    pub primary: Option<bool>,
    #[serde(rename = "Links", default)]
    pub links: Vec<PartitionLink>,
    #[serde(rename = "Status", default)]
    pub status: Option<Status>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionLink {
    #[serde(rename = "Device")]
    pub device: ODataLink,
}

/// Body of `POST /redfish/v1/Systems/Partitions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePartition {
    /// How many equal partitions to create (1..=16).
    #[serde(rename = "Number")]
    pub number: u8,
    /// Size of each partition in GB, a multiple of 0.5.
    #[serde(rename = "CapacityBytes")]
    pub capacity_gb: f64,
    #[serde(rename = "Links")]
    pub links: Vec<PartitionLink>,
    #[serde(rename = "FileSystem")]
    pub file_system: String,
}

impl CreatePartition {
    /// ext4 partitions on the device at `device_odata_id`.
    pub fn ext4(number: u8, capacity_gb: f64, device_odata_id: impl Into<String>) -> Self {
        Self {
            number,
            capacity_gb,
            links: vec![PartitionLink {
                device: ODataLink::new(device_odata_id),
            }],
            file_system: "ext4".into(),
        }
    }
}

// ── Security ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpsCert {
    #[serde(rename = "CertificateInformation", alias = "X509CertificateInformation", default)]
    pub certificate: Option<CertificateInfo>,
    #[serde(rename = "CertAlarmTime", default)]
    pub cert_alarm_time: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertificateInfo {
    #[serde(rename = "Subject", default)]
    pub subject: Option<String>,
    #[serde(rename = "Issuer", default)]
    pub issuer: Option<String>,
    #[serde(rename = "ValidNotBefore", default)]
    pub valid_not_before: Option<String>,
    #[serde(rename = "ValidNotAfter", default)]
    pub valid_not_after: Option<String>,
    #[serde(rename = "SerialNumber", default)]
    pub serial_number: Option<String>,
    #[serde(rename = "SignatureAlgorithm", default)]
    pub signature_algorithm: Option<String>,
    #[serde(rename = "PublicKeyLengthBits", default)]
    pub public_key_length_bits: Option<Value>,
    #[serde(rename = "ExpiredDayRemaining", default)]
    pub expired_day_remaining: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One login rule: when, from where and from which MAC logins are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRule {
    /// `"true"` / `"false"` on the wire.
    pub enable: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_addr: Option<String>,
}

impl LoginRule {
    pub fn is_enabled(&self) -> bool {
        self.enable == "true"
    }
}

/// `GET /redfish/v1/Systems/SecurityService/SecurityLoad`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityLoad {
    #[serde(default)]
    pub load_cfg: Vec<LoginRule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Firmware ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateService {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "ServiceEnabled", default)]
    pub service_enabled: Option<bool>,
    #[serde(rename = "Status", default)]
    pub status: Option<Status>,
    #[serde(rename = "Oem", default)]
    pub oem: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /redfish/v1/TaskService/Tasks/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "TaskState", default)]
    pub task_state: Option<String>,
    #[serde(rename = "PercentComplete", default)]
    pub percent_complete: Option<u8>,
    #[serde(rename = "StartTime", default)]
    pub start_time: Option<String>,
    #[serde(rename = "Messages", default)]
    pub messages: Option<Value>,
    #[serde(rename = "Status", default)]
    pub status: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// `true` once the task reached a terminal state.
    pub fn is_finished(&self) -> bool {
        matches!(
            self.task_state.as_deref(),
            Some("Completed" | "Exception" | "Killed" | "Cancelled")
        )
    }
}

// ── Alarms ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Alarm {
    #[serde(rename = "AlarmId", default)]
    pub alarm_id: Option<String>,
    #[serde(rename = "AlarmName", default)]
    pub alarm_name: Option<String>,
    #[serde(rename = "AlarmInstance", default)]
    pub alarm_instance: Option<String>,
    #[serde(rename = "PerceivedSeverity", default)]
    pub perceived_severity: Option<String>,
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<String>,
    #[serde(rename = "UniquelyIdentifies", default)]
    pub uniquely_identifies: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /redfish/v1/Systems/Alarm/AlarmInfo`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlarmInfo {
    #[serde(rename = "AlarMessages", alias = "AlarmMessages", default)]
    pub alarms: Vec<Alarm>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One alarm shield rule, used both in responses and in the
/// `AlarmShield/Increase` / `AlarmShield/Decrease` bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmShield {
    #[serde(rename = "UniquelyIdentifies")]
    pub uniquely_identifies: String,
    #[serde(rename = "AlarmId")]
    pub alarm_id: String,
    #[serde(rename = "PerceivedSeverity")]
    pub perceived_severity: String,
    #[serde(rename = "AlarmInstance")]
    pub alarm_instance: String,
}

/// `GET /redfish/v1/Systems/Alarm/AlarmShield`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlarmShieldList {
    #[serde(rename = "AlarmShieldMessages", default)]
    pub shields: Vec<AlarmShield>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn odata_link_id_is_last_segment() {
        assert_eq!(
            ODataLink::new("/redfish/v1/Systems/EthernetInterfaces/GMAC0").id(),
            "GMAC0"
        );
        assert_eq!(ODataLink::new("/redfish/v1/Systems/Partitions/p1/").id(), "p1");
    }

    #[test]
    fn system_resource_tolerates_nulls_and_unknown_fields() {
        let system: ComputerSystem = serde_json::from_value(json!({
            "Id": "1",
            "HostName": "Atlas500",
            "Model": "Atlas 500",
            "Status": { "Health": null },
            "Oem": {
                "PCBVersion": "Ver.C",
                "Temperature": null,
                "CpuUsage": 12,
                "Firmware": [{ "Module": "MCU", "Version": "1.2" }],
                "NTPService": { "@odata.id": "/redfish/v1/Systems/NTPService" }
            },
            "Actions": {}
        }))
        .unwrap();

        assert_eq!(system.host_name.as_deref(), Some("Atlas500"));
        let oem = system.oem.unwrap();
        assert_eq!(oem.firmware[0].version.as_deref(), Some("1.2"));
        assert!(oem.extra.contains_key("NTPService"));
        assert!(system.extra.contains_key("Actions"));
    }

    #[test]
    fn system_update_skips_unset_fields() {
        let body = serde_json::to_value(SystemUpdate {
            host_name: Some("edge-01".into()),
            ..SystemUpdate::default()
        })
        .unwrap();
        assert_eq!(body, json!({ "HostName": "edge-01" }));
    }

    #[test]
    fn partition_request_uses_device_links() {
        let body =
            serde_json::to_value(CreatePartition::ext4(2, 1.5, "/redfish/v1/Systems/SimpleStorages/1"))
                .unwrap();
        assert_eq!(
            body,
            json!({
                "Number": 2,
                "CapacityBytes": 1.5,
                "Links": [{ "Device": { "@odata.id": "/redfish/v1/Systems/SimpleStorages/1" } }],
                "FileSystem": "ext4"
            })
        );
    }

    #[test]
    fn task_terminal_states() {
        let mut task = Task {
            task_state: Some("Running".into()),
            ..Task::default()
        };
        assert!(!task.is_finished());
        task.task_state = Some("Completed".into());
        assert!(task.is_finished());
    }
}
