// ── Client-side input validation ──
//
// Checks run before a request is sent, mirroring the appliance's own
// parameter checkers closely enough that a value accepted here is not
// rejected there for format reasons. An empty value passes every rule;
// whether a field is required is decided by the caller.

use std::net::Ipv4Addr;
use std::sync::LazyLock;

use regex::Regex;
use strum::{AsRefStr, Display, EnumIter};

use crate::error::CoreError;
use crate::error_code::Locale;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("validator pattern compiles")
}

const IPV4: &str = r"((25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)";

static MAC_RE: LazyLock<Regex> =
    LazyLock::new(|| regex(r"^([0-9A-Fa-f]{2}:){2}[0-9A-Fa-f]{2}$|^([0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2}$"));
static IP_RE: LazyLock<Regex> = LazyLock::new(|| regex(&format!("^{IPV4}$")));
static IP_WITH_MASK_RE: LazyLock<Regex> =
    LazyLock::new(|| regex(&format!(r"^{IPV4}(/([0-9]|[12]\d|3[0-2]))?$")));
static NODE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
});
static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| regex(r"^\d{1,10}$"));
static SERVER_NAME_RE: LazyLock<Regex> = LazyLock::new(|| regex(r"^[a-zA-Z0-9.-]{1,64}$"));
static ACCOUNT_RE: LazyLock<Regex> = LazyLock::new(|| regex(r"^[a-zA-Z0-9_-]{1,256}$"));
static HOST_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| regex(r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?$"));
static ASSET_TAG_RE: LazyLock<Regex> = LazyLock::new(|| regex(r"^[\x20-\x7E]{1,255}$"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| regex(r"^[0-9a-zA-Z_]{1,32}$"));
static SERVER_PATH_RE: LazyLock<Regex> = LazyLock::new(|| regex(r"^/[0-9a-zA-Z/_-]{1,255}$"));
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| regex(r"^[a-zA-Z0-9]*[a-zA-Z]+[a-zA-Z0-9]*$"));
static FILE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| regex(r"^[a-zA-Z0-9_.-]{1,255}$"));
static APN_RE: LazyLock<Regex> = LazyLock::new(|| regex(r"^[a-zA-Z0-9\-_.@]{1,39}$"));
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| regex(r"^([01]\d|2[0-3]):[0-5]\d$"));
static ALARM_ID_RE: LazyLock<Regex> = LazyLock::new(|| regex(r"^[0-9a-zA-Z]{1,32}$"));
static SEVERITY_RE: LazyLock<Regex> = LazyLock::new(|| regex(r"^\d$"));
static ALARM_INSTANCE_RE: LazyLock<Regex> =
    LazyLock::new(|| regex(r"^[0-9a-zA-Z_.\-\s]{1,32}$"));

fn in_range(value: &str, min: u64, max: u64) -> bool {
    DIGITS_RE.is_match(value)
        && value
            .parse::<u64>()
            .is_ok_and(|n| (min..=max).contains(&n))
}

// ── Rules ────────────────────────────────────────────────────────────

/// A named input rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Rule {
    /// `1A:2B:3C` or `1A:2B:3C:4D:5E:6F`
    Mac,
    Ip,
    /// IPv4 with an optional `/prefix`.
    IpWithMask,
    /// Contiguous IPv4 netmask.
    SubnetMask,
    /// FusionDirector node id (UUID form).
    NodeId,
    Port,
    ServerName,
    /// FusionDirector account name.
    Account,
    HostName,
    AssetTag,
    SessionTimeout,
    CertAlarmTime,
    PasswordExpirationDays,
    /// Address usage tag.
    NetworkUsage,
    VlanId,
    /// Absolute path on an NFS server or the appliance.
    ServerPath,
    Username,
    FileName,
    Apn,
    /// `HH:MM`
    Time,
    AlarmId,
    AlarmSeverity,
    AlarmInstance,
}

impl Rule {
    /// `true` when `value` satisfies the rule. Empty values always pass.
    pub fn check(self, value: &str) -> bool {
        if value.is_empty() {
            return true;
        }
        match self {
            Self::Mac => MAC_RE.is_match(value),
            Self::Ip => IP_RE.is_match(value),
            Self::IpWithMask => IP_WITH_MASK_RE.is_match(value),
            Self::SubnetMask => is_subnet_mask(value),
            Self::NodeId => NODE_ID_RE.is_match(value),
            Self::Port => in_range(value, 1, 65_535),
            Self::ServerName => SERVER_NAME_RE.is_match(value),
            Self::Account => ACCOUNT_RE.is_match(value),
            Self::HostName => HOST_NAME_RE.is_match(value),
            Self::AssetTag => ASSET_TAG_RE.is_match(value),
            Self::SessionTimeout => in_range(value, 5, 120),
            Self::CertAlarmTime => in_range(value, 7, 180),
            Self::PasswordExpirationDays => in_range(value, 0, 365),
            Self::NetworkUsage => TAG_RE.is_match(value),
            Self::VlanId => in_range(value, 1, 4094),
            Self::ServerPath => SERVER_PATH_RE.is_match(value) && !value.contains(".."),
            Self::Username => value.len() <= 16 && USERNAME_RE.is_match(value),
            Self::FileName => FILE_NAME_RE.is_match(value) && !value.contains(".."),
            Self::Apn => APN_RE.is_match(value),
            Self::Time => TIME_RE.is_match(value),
            Self::AlarmId => ALARM_ID_RE.is_match(value),
            Self::AlarmSeverity => SEVERITY_RE.is_match(value),
            Self::AlarmInstance => ALARM_INSTANCE_RE.is_match(value),
        }
    }

    /// Short description of what the rule accepts.
    pub fn hint(self, locale: Locale) -> &'static str {
        match self {
            Self::Mac => locale.pick(
                "expected a MAC address such as 1A:2B:3C:4D:5E:6F",
                "请输入 MAC 地址，例如 1A:2B:3C:4D:5E:6F",
            ),
            Self::Ip => locale.pick("expected an IPv4 address", "请输入 IPv4 地址"),
            Self::IpWithMask => locale.pick(
                "expected an IPv4 address, optionally with /prefix",
                "请输入 IPv4 地址，可带 /掩码位数",
            ),
            Self::SubnetMask => locale.pick(
                "expected a contiguous subnet mask such as 255.255.255.0",
                "请输入有效的子网掩码，例如 255.255.255.0",
            ),
            Self::NodeId => locale.pick(
                "expected a node id in UUID form",
                "请输入 UUID 格式的节点 ID",
            ),
            Self::Port => locale.pick("expected a port between 1 and 65535", "端口范围为 1-65535"),
            Self::ServerName => locale.pick(
                "use letters, digits, '.' and '-' (at most 64)",
                "仅支持字母、数字、'.' 和 '-'，最多 64 个字符",
            ),
            Self::Account => locale.pick(
                "use letters, digits, '_' and '-' (at most 256)",
                "仅支持字母、数字、'_' 和 '-'，最多 256 个字符",
            ),
            Self::HostName => locale.pick(
                "use letters, digits and '-' (at most 63, not starting or ending with '-')",
                "仅支持字母、数字和 '-'，最多 63 个字符，且不能以 '-' 开头或结尾",
            ),
            Self::AssetTag => locale.pick(
                "use printable ASCII characters (at most 255)",
                "仅支持可打印 ASCII 字符，最多 255 个",
            ),
            Self::SessionTimeout => {
                locale.pick("expected 5 to 120 minutes", "取值范围为 5-120 分钟")
            }
            Self::CertAlarmTime => locale.pick("expected 7 to 180 days", "取值范围为 7-180 天"),
            Self::PasswordExpirationDays => {
                locale.pick("expected 0 to 365 days", "取值范围为 0-365 天")
            }
            Self::NetworkUsage => locale.pick(
                "use letters, digits and '_' (at most 32)",
                "仅支持字母、数字和 '_'，最多 32 个字符",
            ),
            Self::VlanId => locale.pick("expected a VLAN id between 1 and 4094", "VLAN ID 范围为 1-4094"),
            Self::ServerPath => locale.pick(
                "expected an absolute path of letters, digits, '/', '_' and '-'",
                "请输入由字母、数字、'/'、'_' 和 '-' 组成的绝对路径",
            ),
            Self::Username => locale.pick(
                "use 1 to 16 letters and digits, with at least one letter",
                "用户名为 1-16 位字母和数字，且至少包含一个字母",
            ),
            Self::FileName => locale.pick(
                "use letters, digits, '_', '.' and '-' (at most 255)",
                "仅支持字母、数字、'_'、'.' 和 '-'，最多 255 个字符",
            ),
            Self::Apn => locale.pick(
                "use letters, digits and -_.@ (at most 39)",
                "仅支持字母、数字和 -_.@，最多 39 个字符",
            ),
            Self::Time => locale.pick("expected a time as HH:MM", "请输入 HH:MM 格式的时间"),
            Self::AlarmId => locale.pick(
                "use letters and digits (at most 32)",
                "仅支持字母和数字，最多 32 个字符",
            ),
            Self::AlarmSeverity => locale.pick("expected a single digit", "请输入一位数字"),
            Self::AlarmInstance => locale.pick(
                "use letters, digits, spaces and _.- (at most 32)",
                "仅支持字母、数字、空格和 _.-，最多 32 个字符",
            ),
        }
    }

    /// Check `value` and turn a mismatch into a `ValidationFailed` for `field`.
    pub fn validate(self, field: &str, value: &str, locale: Locale) -> Result<(), CoreError> {
        if self.check(value) {
            Ok(())
        } else {
            Err(CoreError::validation(field, self.hint(locale)))
        }
    }
}

/// Reject an empty value for a mandatory field.
pub fn required(field: &str, value: &str, locale: Locale) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::validation(
            field,
            locale.pick("a value is required", "该项为必填项"),
        ))
    } else {
        Ok(())
    }
}

fn is_subnet_mask(value: &str) -> bool {
    if !IP_RE.is_match(value) {
        return false;
    }
    value.parse::<Ipv4Addr>().is_ok_and(|mask| {
        let bits = u32::from(mask);
        bits != 0 && bits.leading_ones() + bits.trailing_zeros() == 32
    })
}

// ── Passwords ────────────────────────────────────────────────────────

/// Password complexity as enforced by the appliance: 8 to 20 characters,
/// at least three of digits, lowercase, uppercase and symbols, and not the
/// user name or the user name reversed.
pub fn password(username: &str, password: &str, locale: Locale) -> Result<(), CoreError> {
    let len = password.chars().count();
    if !(8..=20).contains(&len) {
        return Err(CoreError::validation(
            "password",
            locale.pick("must be 8 to 20 characters", "密码长度为 8-20 个字符"),
        ));
    }
    if password.chars().any(|c| !c.is_ascii_graphic()) {
        return Err(CoreError::validation(
            "password",
            locale.pick(
                "may only contain printable ASCII characters without spaces",
                "密码只能包含不含空格的可打印 ASCII 字符",
            ),
        ));
    }

    let classes = [
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_punctuation()),
    ];
    if classes.iter().filter(|present| **present).count() < 3 {
        return Err(CoreError::validation(
            "password",
            locale.pick(
                "must mix at least three of digits, lowercase, uppercase and symbols",
                "密码须至少包含数字、小写字母、大写字母、特殊字符中的三种",
            ),
        ));
    }

    let reversed: String = username.chars().rev().collect();
    if !username.is_empty() && (password == username || password == reversed) {
        return Err(CoreError::validation(
            "password",
            locale.pick(
                "must not be the user name or its reverse",
                "密码不能是用户名或其倒序",
            ),
        ));
    }
    Ok(())
}

// ── Composite checks ─────────────────────────────────────────────────

/// Partition size in GB: positive and a multiple of 0.5.
pub fn partition_capacity(capacity_gb: f64, locale: Locale) -> Result<(), CoreError> {
    let doubled = capacity_gb * 2.0;
    if capacity_gb > 0.0 && doubled.is_finite() && (doubled - doubled.round()).abs() < f64::EPSILON {
        Ok(())
    } else {
        Err(CoreError::validation(
            "capacity",
            locale.pick(
                "must be a positive multiple of 0.5 GB",
                "容量须为 0.5 GB 的正整数倍",
            ),
        ))
    }
}

/// Names for log collection: at least one, no duplicates.
pub fn log_names(names: &[String], locale: Locale) -> Result<(), CoreError> {
    if names.is_empty() {
        return Err(CoreError::validation(
            "name",
            locale.pick("select at least one log", "请至少选择一项日志"),
        ));
    }
    for (i, name) in names.iter().enumerate() {
        if name.trim().is_empty() || name.contains(' ') {
            return Err(CoreError::validation(
                "name",
                locale.pick("log names may not be empty or contain spaces", "日志名称不能为空或包含空格"),
            ));
        }
        if names[..i].contains(name) {
            return Err(CoreError::validation(
                "name",
                locale.pick("duplicate log name", "日志名称重复"),
            ));
        }
    }
    Ok(())
}
