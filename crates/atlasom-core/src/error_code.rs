// ── Vendor error codes ──
//
// The appliance reports failures with a numeric vendor code in
// `@Message.ExtendedInfo[].Oem.status`. This table maps every code the
// console knows to a user-facing message in each supported locale, and to
// a coarse `CodeKind` used for exit codes. Codes missing from the table
// resolve to the generic "operation failed" message.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ── Locale ───────────────────────────────────────────────────────────

/// Display language for user-facing messages.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    /// Resolve a language tag such as `zh-CN`, `zh_CN.UTF-8` or `en-US`.
    /// Anything that is not Chinese falls back to English.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if primary == "zh" { Self::Zh } else { Self::En }
    }

    /// Pick the string for this locale.
    pub fn pick<'a>(self, en: &'a str, zh: &'a str) -> &'a str {
        match self {
            Self::En => en,
            Self::Zh => zh,
        }
    }
}

// ── Classification ───────────────────────────────────────────────────

/// Feature area a vendor code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorGroup {
    Common,
    Session,
    Cert,
    Upload,
    Nfs,
    Nic,
    Partition,
    Log,
    Registration,
}

/// What kind of failure a vendor code describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CodeKind {
    #[default]
    General,
    InvalidInput,
    Auth,
    Permission,
    NotFound,
    Conflict,
    Busy,
}

/// One row of the vendor code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorCode {
    pub code: u32,
    pub group: ErrorGroup,
    pub kind: CodeKind,
    en: &'static str,
    zh: &'static str,
}

impl VendorCode {
    pub fn message(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.en,
            Locale::Zh => self.zh,
        }
    }
}

const fn row(
    code: u32,
    group: ErrorGroup,
    kind: CodeKind,
    en: &'static str,
    zh: &'static str,
) -> VendorCode {
    VendorCode {
        code,
        group,
        kind,
        en,
        zh,
    }
}

use CodeKind as K;
use ErrorGroup as G;

static CODES: &[VendorCode] = &[
    // ── COMMON ──
    row(100_000, G::Common, K::InvalidInput, "A required parameter is empty.", "必填参数为空。"),
    row(100_001, G::Common, K::InvalidInput, "The file path format is incorrect.", "文件路径格式错误。"),
    row(100_002, G::Common, K::InvalidInput, "The file path is empty.", "文件路径为空。"),
    row(100_003, G::Common, K::InvalidInput, "The file path is too long.", "文件路径过长。"),
    row(100_004, G::Common, K::General, "The free space of the path is insufficient.", "路径可用空间不足。"),
    row(100_005, G::Upload, K::General, "Insufficient space.", "空间不足。"),
    row(100_006, G::Common, K::InvalidInput, "A parameter format is incorrect.", "参数格式错误。"),
    row(100_007, G::Common, K::NotFound, "The file path does not exist.", "文件路径不存在。"),
    row(100_008, G::Common, K::General, "The returned value is empty.", "返回值为空。"),
    row(100_009, G::Common, K::InvalidInput, "The number of items is not as expected.", "集合长度不符合要求。"),
    row(100_010, G::Common, K::InvalidInput, "A parameter type is incorrect.", "参数类型错误。"),
    row(100_011, G::Common, K::General, "Internal server error.", "服务器内部错误。"),
    row(100_012, G::Common, K::InvalidInput, "A required parameter does not exist.", "参数不存在。"),
    row(100_013, G::Common, K::InvalidInput, "The number of parameters is incorrect.", "参数个数错误。"),
    row(100_014, G::Common, K::InvalidInput, "The request body must be JSON.", "请求消息必须为 JSON 格式。"),
    row(100_015, G::Common, K::InvalidInput, "A parameter value is incorrect.", "参数取值错误。"),
    row(100_016, G::Common, K::InvalidInput, "A parameter is out of range.", "参数超出范围。"),
    row(100_017, G::Common, K::General, "Modification failed.", "修改失败。"),
    row(100_018, G::Common, K::General, "The directory is running low on space.", "目录空间不足。"),
    row(100_019, G::Common, K::General, "Command execution failed.", "命令执行失败。"),
    row(100_020, G::Common, K::Busy, "The system is being upgraded. Try again later.", "系统正在升级，请稍后重试。"),
    row(100_021, G::Common, K::General, "Restoring defaults failed.", "恢复出厂设置失败。"),
    row(100_022, G::Common, K::InvalidInput, "The file path is a symbolic link.", "文件路径为软链接。"),
    row(100_023, G::Common, K::InvalidInput, "The file path check failed.", "文件路径校验失败。"),
    row(100_024, G::Common, K::InvalidInput, "Parameter is invalid.", "参数无效。"),
    row(100_025, G::Session, K::Permission, "The root account still uses its initial password. Change it first.", "root 账号未修改初始密码，请先修改密码。"),
    row(100_026, G::Session, K::Permission, "The root account is locked for this operation.", "root 账号操作已被锁定。"),
    row(100_027, G::Common, K::Permission, "The operation is not allowed.", "非法操作。"),
    row(100_028, G::Common, K::Busy, "The operation is busy. Try again later.", "操作繁忙，请稍后重试。"),
    row(100_029, G::Session, K::Busy, "The service is starting. Try again later.", "服务正在启动，请稍后重试。"),
    row(100_030, G::Session, K::General, "The service failed to start.", "服务启动失败。"),
    row(100_031, G::Common, K::Busy, "Mini OS recovery is in progress.", "正在恢复最小系统。"),
    row(110_103, G::Common, K::General, "Failed to open the file.", "文件打开失败。"),
    // ── UPLOAD ──
    row(110_104, G::Upload, K::InvalidInput, "The uploaded file is empty.", "上传的文件为空。"),
    row(110_105, G::Upload, K::NotFound, "The file does not exist.", "文件不存在。"),
    row(110_106, G::Upload, K::InvalidInput, "The file is too large.", "文件过大。"),
    row(110_107, G::Upload, K::Conflict, "The same file was uploaded within the last 10 minutes.", "10 分钟内重复上传文件。"),
    // ── LOG ──
    row(110_001, G::Log, K::General, "Log collection failed.", "日志收集失败。"),
    // ── SESSION ──
    row(110_201, G::Session, K::Auth, "The session does not exist. Log in again.", "会话不存在，请重新登录。"),
    row(110_202, G::Session, K::Auth, "The session timed out. Log in again.", "会话超时，请重新登录。"),
    row(110_203, G::Session, K::General, "Database operation failed.", "数据库操作失败。"),
    row(110_204, G::Session, K::Auth, "The password has expired. Change it before logging in.", "密码已过期，请修改密码后登录。"),
    row(110_205, G::Session, K::Permission, "Logins from this IP address are not allowed.", "该 IP 地址不允许登录。"),
    row(110_206, G::Session, K::Auth, "The user is locked. Try again later.", "用户已被锁定，请稍后重试。"),
    row(110_207, G::Session, K::Auth, "The user name or password is incorrect.", "用户名或密码错误。"),
    row(110_208, G::Session, K::Permission, "The login security policy is not met.", "不满足登录安全策略。"),
    row(110_209, G::Session, K::InvalidInput, "A parameter is out of range.", "参数超出范围。"),
    row(110_210, G::Session, K::NotFound, "The user does not exist.", "用户不存在。"),
    row(110_211, G::Session, K::InvalidInput, "The new password must differ from the last five passwords.", "新密码不能与前五次密码相同。"),
    row(110_212, G::Session, K::General, "Changing the OS user name failed.", "修改系统用户名失败。"),
    row(110_213, G::Session, K::General, "Changing the OS password failed.", "修改系统密码失败。"),
    row(110_214, G::Session, K::InvalidInput, "The password must not be the user name or its reverse.", "密码不能是用户名或其倒序。"),
    row(110_215, G::Session, K::InvalidInput, "The two passwords do not match.", "两次输入的密码不一致。"),
    row(110_216, G::Session, K::Auth, "User authentication failed.", "用户认证失败。"),
    row(110_217, G::Session, K::Conflict, "The user name is already in use.", "用户名已被使用。"),
    row(110_218, G::Session, K::NotFound, "The OS user does not exist.", "系统用户不存在。"),
    row(110_219, G::Session, K::General, "Changing the password failed.", "修改密码失败。"),
    row(110_221, G::Session, K::InvalidInput, "The new password must not be the default password.", "新密码不能为默认密码。"),
    row(110_222, G::Session, K::InvalidInput, "The new password is too weak.", "新密码强度太弱。"),
    row(110_223, G::Session, K::NotFound, "The edge configuration was not found.", "未找到边缘配置。"),
    row(110_224, G::Session, K::General, "Internal error.", "内部错误。"),
    // ── REGISTRATION ──
    row(110_225, G::Registration, K::Permission, "The IP address is locked. Try again in 5 minutes.", "IP 已被锁定，请 5 分钟后重试。"),
    row(110_226, G::Registration, K::Conflict, "The Docker root directory is not mounted. Mount it first.", "Docker 根目录未挂载，请先挂载。"),
    // ── CERT ──
    row(110_301, G::Cert, K::General, "The certificate is about to expire.", "证书即将过期。"),
    row(110_302, G::Cert, K::General, "Initializing the custom certificate failed.", "自定义证书初始化失败。"),
    row(110_303, G::Cert, K::InvalidInput, "The certificate is too large.", "证书文件过大。"),
    row(110_304, G::Cert, K::InvalidInput, "Certificate or password verification failed.", "证书或密码校验失败。"),
    row(110_305, G::Cert, K::InvalidInput, "The certificate is not valid.", "证书无效。"),
    row(110_306, G::Cert, K::General, "Importing the custom certificate failed.", "导入自定义证书失败。"),
    row(110_307, G::Cert, K::General, "The certificate was imported, but its legitimacy is at risk.", "证书导入成功，但合法性存在风险。"),
    row(110_308, G::Cert, K::InvalidInput, "The certificate has expired.", "证书已过期。"),
    row(110_309, G::Cert, K::InvalidInput, "The certificate does not match the private key.", "证书与私钥不匹配。"),
    row(110_310, G::Cert, K::Busy, "Wait 2 hours before downloading again.", "请 2 小时后再下载。"),
    row(110_311, G::Cert, K::InvalidInput, "The certificate is invalid.", "证书不合法。"),
    row(110_312, G::Registration, K::InvalidInput, "The certificate is not in X.509 v3 format.", "证书不是 X.509 v3 标准格式。"),
    row(110_313, G::Registration, K::InvalidInput, "The certificate public key is neither RSA nor EC.", "证书公钥类型不是 RSA 或 EC。"),
    row(110_314, G::Registration, K::InvalidInput, "The RSA public key is shorter than 3072 bits.", "RSA 公钥长度小于 3072 位。"),
    row(110_315, G::Registration, K::InvalidInput, "The EC public key is shorter than 256 bits.", "EC 公钥长度小于 256 位。"),
    row(110_316, G::Registration, K::InvalidInput, "The certificate signature algorithm is not supported.", "证书签名算法不受支持。"),
    row(110_317, G::Registration, K::InvalidInput, "The certificate is not a CA certificate.", "证书不是 CA 证书。"),
    row(110_318, G::Registration, K::InvalidInput, "The certificate cannot be used to verify certificate signatures.", "证书不能用于验证证书签名。"),
    row(110_319, G::Registration, K::InvalidInput, "The CA certificate chain is longer than 10.", "CA 证书链数量超过 10 个。"),
    row(110_320, G::Registration, K::InvalidInput, "The CA certificate signature is invalid.", "CA 证书签名无效。"),
    // ── NIC ──
    row(110_401, G::Nic, K::InvalidInput, "Checking the address tag failed.", "地址用途标签校验失败。"),
    row(110_402, G::Nic, K::General, "Configuring the network interface failed.", "配置网口失败。"),
    row(110_403, G::Nic, K::NotFound, "The network configuration file does not exist.", "网络配置文件不存在。"),
    row(110_404, G::Nic, K::General, "The network configuration file check failed.", "网络配置文件校验失败。"),
    row(110_405, G::Nic, K::General, "Loading the network configuration failed.", "加载网络配置失败。"),
    row(110_406, G::Nic, K::General, "Modifying netplan failed.", "修改 netplan 失败。"),
    row(110_407, G::Nic, K::General, "Writing the network configuration failed.", "写入网络配置失败。"),
    row(110_408, G::Nic, K::General, "Applying the network configuration failed and was rolled back.", "网络配置生效失败，已回滚。"),
    row(110_409, G::Nic, K::General, "The connectivity test failed.", "连通性测试失败。"),
    row(110_410, G::Nic, K::General, "Writing the address tag failed.", "写入地址用途标签失败。"),
    row(110_411, G::Nic, K::General, "Updating the legacy address tags failed.", "更新旧版地址用途标签失败。"),
    row(110_412, G::Nic, K::General, "Updating the web server configuration failed.", "设置 nginx 配置失败。"),
    row(110_413, G::Nic, K::General, "Creating the multiple-IP configuration failed.", "创建多 IP 配置文件失败。"),
    row(110_414, G::Nic, K::General, "Writing the gateway failed.", "写入网关失败。"),
    row(110_415, G::Nic, K::General, "Restarting the network failed.", "重启网络失败。"),
    row(110_416, G::Nic, K::NotFound, "The system resource does not exist.", "系统资源不存在。"),
    // ── NFS ──
    row(110_501, G::Nfs, K::Conflict, "The mount path already exists.", "挂载路径已存在。"),
    row(110_502, G::Nfs, K::InvalidInput, "The mount path is not in the allowed list.", "挂载路径不在白名单中。"),
    row(110_503, G::Nfs, K::Conflict, "The mount path overlaps an already mounted path.", "挂载路径与已挂载路径存在父子目录关系。"),
    row(110_504, G::Nfs, K::Conflict, "The number of NFS mounts exceeds the limit.", "NFS 配置数量超过上限。"),
    row(110_505, G::Nfs, K::General, "The NFS operation failed.", "NFS 操作失败。"),
    row(110_506, G::Nfs, K::General, "The NFS operation timed out.", "NFS 操作超时。"),
    row(110_507, G::Nfs, K::NotFound, "The path to unmount does not exist.", "待卸载路径不存在。"),
    row(110_508, G::Nfs, K::InvalidInput, "The file system type is incorrect.", "文件系统类型错误。"),
    row(110_509, G::Nfs, K::General, "Reading the local NFS mount information failed.", "获取 NFS 本地挂载信息失败。"),
    // ── PARTITION ──
    row(110_601, G::Partition, K::InvalidInput, "The partition name is incorrect.", "分区名称错误。"),
    row(110_602, G::Partition, K::Permission, "The partition is a system partition.", "该分区为系统分区。"),
    row(110_603, G::Partition, K::General, "Converting the partition failed.", "转换分区失败。"),
    row(110_604, G::Partition, K::General, "Unmounting the partition failed.", "卸载分区失败。"),
    row(110_605, G::Partition, K::General, "Deleting the partition failed.", "删除分区失败。"),
    row(110_606, G::Partition, K::InvalidInput, "The mount path is not in the allowed list.", "挂载路径不在白名单中。"),
    row(110_607, G::Partition, K::Conflict, "The disk is mounted.", "磁盘已挂载。"),
    row(110_608, G::Partition, K::InvalidInput, "The mount path is invalid.", "挂载路径无效。"),
    row(110_609, G::Partition, K::Conflict, "The path is already mounted.", "该路径已被挂载。"),
    row(110_610, G::Partition, K::General, "Mounting the partition failed.", "挂载分区失败。"),
    row(110_611, G::Partition, K::General, "The disk does not have enough space.", "磁盘空间不足。"),
    row(110_612, G::Partition, K::Busy, "The system is busy. No file system was created.", "系统繁忙，未创建文件系统。"),
    row(110_613, G::Partition, K::General, "Creating the partition failed.", "创建分区失败。"),
    row(110_614, G::Partition, K::Conflict, "The disk is not mounted.", "磁盘未挂载。"),
    row(110_615, G::Partition, K::Conflict, "The mount path is already in use.", "挂载路径已存在。"),
    row(110_616, G::Partition, K::InvalidInput, "The partition type is invalid.", "分区类型无效。"),
    row(110_617, G::Partition, K::NotFound, "The drive does not exist.", "盘符不存在。"),
    row(110_618, G::Partition, K::Conflict, "The number of partitions exceeds the limit.", "分区数量超过上限。"),
    row(110_619, G::Partition, K::Conflict, "Containers still use this path. Delete them first.", "容器未删除或 Docker 路径被占用。"),
];

/// Look up a vendor code.
pub fn lookup(code: u32) -> Option<&'static VendorCode> {
    CODES.iter().find(|entry| entry.code == code)
}

/// Every known vendor code, in table order.
pub fn all() -> &'static [VendorCode] {
    CODES
}

/// Fallback for codes the table does not know.
pub fn generic_message(locale: Locale) -> &'static str {
    locale.pick("Operation failed.", "操作失败。")
}

/// User-facing message for an optional vendor code.
pub fn message_for(code: Option<u32>, locale: Locale) -> &'static str {
    code.and_then(lookup)
        .map_or_else(|| generic_message(locale), |entry| entry.message(locale))
}

/// Classification for an optional vendor code.
pub fn kind_of(code: Option<u32>) -> CodeKind {
    code.and_then(lookup).map(|entry| entry.kind).unwrap_or_default()
}

// ── Partial success ──────────────────────────────────────────────────

/// Requests the appliance may answer with HTTP 206: applied, with a caveat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialSuccess {
    /// Certificate installed, but it does not meet the security baseline.
    CertNotSafe,
    /// Management mode switched, but not every setting was applied.
    NetManager,
}

impl PartialSuccess {
    pub const STATUS: u16 = 206;

    pub fn message(self, locale: Locale) -> &'static str {
        match self {
            Self::CertNotSafe => locale.pick(
                "The certificate was imported, but it is not secure. Replace it soon.",
                "证书导入成功，但证书存在安全风险，请尽快更换。",
            ),
            Self::NetManager => locale.pick(
                "The settings were partially applied.",
                "配置部分成功。",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn codes_are_unique() {
        let mut seen = HashSet::new();
        for entry in all() {
            assert!(seen.insert(entry.code), "duplicate vendor code {}", entry.code);
        }
    }

    #[test]
    fn every_code_has_both_translations() {
        for entry in all() {
            assert!(!entry.message(Locale::En).is_empty(), "{}", entry.code);
            assert!(!entry.message(Locale::Zh).is_empty(), "{}", entry.code);
        }
    }

    #[test]
    fn known_codes_resolve() {
        assert_eq!(
            message_for(Some(110_207), Locale::En),
            "The user name or password is incorrect."
        );
        assert_eq!(message_for(Some(110_207), Locale::Zh), "用户名或密码错误。");
        assert_eq!(lookup(110_502).map(|e| e.group), Some(ErrorGroup::Nfs));
        assert_eq!(lookup(110_619).map(|e| e.group), Some(ErrorGroup::Partition));
        assert_eq!(kind_of(Some(100_028)), CodeKind::Busy);
    }

    #[test]
    fn unknown_codes_fall_back_to_generic() {
        assert_eq!(message_for(Some(999_999), Locale::En), "Operation failed.");
        assert_eq!(message_for(None, Locale::Zh), "操作失败。");
        assert_eq!(kind_of(Some(999_999)), CodeKind::General);
    }

    #[test]
    fn session_expiry_codes_are_auth() {
        for code in atlasom_api::error::SESSION_EXPIRY_CODES {
            assert_eq!(kind_of(Some(code)), CodeKind::Auth);
        }
    }

    #[test]
    fn locale_tags() {
        assert_eq!(Locale::from_tag("zh-CN"), Locale::Zh);
        assert_eq!(Locale::from_tag("zh_CN.UTF-8"), Locale::Zh);
        assert_eq!(Locale::from_tag("en-US"), Locale::En);
        assert_eq!(Locale::from_tag("fr"), Locale::En);
        assert_eq!("ZH".parse::<Locale>().ok(), Some(Locale::Zh));
    }
}
