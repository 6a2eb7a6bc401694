//! Redfish resource paths, relative to the appliance root.

pub const SESSION_SERVICE: &str = "/redfish/v1/SessionService";
pub const SESSIONS: &str = "/redfish/v1/SessionService/Sessions";

pub const ACCOUNT_SERVICE: &str = "/redfish/v1/AccountService";
pub const ACCOUNTS: &str = "/redfish/v1/AccountService/Accounts";

pub const SYSTEMS: &str = "/redfish/v1/Systems";
pub const PROCESSORS: &str = "/redfish/v1/Systems/Processors";
pub const CPU: &str = "/redfish/v1/Systems/Processors/CPU";
pub const AI_PROCESSOR: &str = "/redfish/v1/Systems/Processors/AiProcessor";
pub const MEMORY: &str = "/redfish/v1/Systems/Memory";
pub const MODULES: &str = "/redfish/v1/Systems/Modules";
pub const EXTENDED_DEVICES: &str = "/redfish/v1/Systems/ExtendedDevices";
pub const SYSTEM_TIME: &str = "/redfish/v1/Systems/SystemTime";
pub const SYSTEM_RESET: &str = "/redfish/v1/Systems/Actions/ComputerSystem.Reset";
pub const RESTORE_DEFAULTS: &str = "/redfish/v1/Systems/Actions/RestoreDefaults.Reset";

pub const ETHERNET_INTERFACES: &str = "/redfish/v1/Systems/EthernetInterfaces";
pub const ETH_IP_LIST: &str = "/redfish/v1/Systems/EthIpList";
pub const LTE: &str = "/redfish/v1/Systems/LTE";
pub const LTE_STATUS: &str = "/redfish/v1/Systems/LTE/StatusInfo";
pub const LTE_CONFIG: &str = "/redfish/v1/Systems/LTE/ConfigInfo";
pub const NTP_SERVICE: &str = "/redfish/v1/Systems/NTPService";
pub const NFS_MANAGE: &str = "/redfish/v1/Systems/NfsManage";
pub const NFS_MOUNT: &str = "/redfish/v1/Systems/NfsManage/Actions/NfsManage.Mount";
pub const NFS_UNMOUNT: &str = "/redfish/v1/Systems/NfsManage/Actions/NfsManage.Unmount";

pub const NET_MANAGER: &str = "/redfish/v1/NetManager";
pub const NET_MANAGER_NODE_ID: &str = "/redfish/v1/NetManager/NodeID";
pub const NET_MANAGER_FD_CERT: &str = "/redfish/v1/NetManager/QueryFdCert";
pub const NET_MANAGER_IMPORT_FD_CERT: &str = "/redfish/v1/NetManager/ImportFdCert";
pub const NET_MANAGER_IMPORT_FD_CRL: &str = "/redfish/v1/NetManager/ImportFdCrl";

pub const SIMPLE_STORAGES: &str = "/redfish/v1/Systems/SimpleStorages";
pub const PARTITIONS: &str = "/redfish/v1/Systems/Partitions";
pub const PARTITION_MOUNT: &str = "/redfish/v1/Systems/Partitions/Mount";
pub const PARTITION_UNMOUNT: &str = "/redfish/v1/Systems/Partitions/Unmount";

pub const SECURITY_SERVICE: &str = "/redfish/v1/Systems/SecurityService";
pub const HTTPS_CERT: &str = "/redfish/v1/Systems/SecurityService/HttpsCert";
pub const HTTPS_CERT_IMPORT: &str =
    "/redfish/v1/Systems/SecurityService/HttpsCert/Actions/HttpsCert.ImportServerCertificate";
pub const HTTPS_CERT_ALARM_TIME: &str = "/redfish/v1/Systems/SecurityService/HttpsCertAlarmTime";
pub const DOWNLOAD_CSR: &str = "/redfish/v1/Systems/SecurityService/downloadCSRFile";
pub const SECURITY_LOAD: &str = "/redfish/v1/Systems/SecurityService/SecurityLoad";
pub const SECURITY_LOAD_IMPORT: &str =
    "/redfish/v1/Systems/SecurityService/SecurityLoad/Actions/SecurityLoad.Import";
pub const SECURITY_LOAD_EXPORT: &str =
    "/redfish/v1/Systems/SecurityService/SecurityLoad/Actions/SecurityLoad.Export";
pub const PUNY_DICT_IMPORT: &str =
    "/redfish/v1/Systems/SecurityService/Actions/SecurityService.PunyDictImport";
pub const PUNY_DICT_EXPORT: &str =
    "/redfish/v1/Systems/SecurityService/Actions/SecurityService.PunyDictExport";
pub const PUNY_DICT_DELETE: &str =
    "/redfish/v1/Systems/SecurityService/Actions/SecurityService.PunyDictDelete";

pub const UPDATE_SERVICE: &str = "/redfish/v1/UpdateService";
pub const FIRMWARE_INVENTORY: &str = "/redfish/v1/UpdateService/FirmwareInventory";
pub const SIMPLE_UPDATE: &str = "/redfish/v1/UpdateService/Actions/UpdateService.SimpleUpdate";
pub const UPDATE_RESET: &str = "/redfish/v1/UpdateService/Actions/UpdateService.Reset";
pub const TASKS: &str = "/redfish/v1/TaskService/Tasks";

pub const LOG_SERVICES: &str = "/redfish/v1/Systems/LogServices";
pub const LOG_DOWNLOAD: &str = "/redfish/v1/Systems/LogServices/Actions/download";

pub const ALARM: &str = "/redfish/v1/Systems/Alarm";
pub const ALARM_INFO: &str = "/redfish/v1/Systems/Alarm/AlarmInfo";
pub const ALARM_SHIELD: &str = "/redfish/v1/Systems/Alarm/AlarmShield";
pub const ALARM_SHIELD_INCREASE: &str = "/redfish/v1/Systems/Alarm/AlarmShield/Increase";
pub const ALARM_SHIELD_DECREASE: &str = "/redfish/v1/Systems/Alarm/AlarmShield/Decrease";

/// `{collection}/{id}` with the id percent-encoded as one path segment.
pub fn member(collection: &str, id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
    format!("{collection}/{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_encodes_id() {
        assert_eq!(member(PARTITIONS, "p1"), "/redfish/v1/Systems/Partitions/p1");
        assert_eq!(member(MODULES, "a/b"), "/redfish/v1/Systems/Modules/a%2Fb");
    }
}
