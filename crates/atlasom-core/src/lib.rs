//! Console logic between `atlasom-api` and the `atlasom` CLI.
//!
//! - **[`Console`]**: one appliance, one operator session. Validates input,
//!   gates model-specific features and translates appliance errors before
//!   and after each Redfish call.
//!
//! - **[`error_code`]**: the vendor error-code table with English and
//!   Chinese messages, plus the partial-success notices.
//!
//! - **[`validate`]**: the input rules a settings form enforces (addresses,
//!   names, ranges, passwords).
//!
//! - **[`device`]**: model detection and the capabilities that follow from it.

pub mod config;
pub mod console;
pub mod device;
pub mod error;
pub mod error_code;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ConsoleConfig;
pub use console::{Console, LoginSummary};
pub use device::{Capabilities, Capability, DeviceModel};
pub use error::CoreError;
pub use error_code::{CodeKind, Locale, PartialSuccess};
pub use validate::Rule;

// Request and response types callers build alongside a `Console`.
pub use atlasom_api::redfish::{
    AlarmShield, ApnAuthType, ApnSettings, CredentialChange, Ipv4AddressConfig, LoginRule,
    ManagerType, NetManagerSettings, NfsMountRequest, NtpConfig, ResetType, SystemUpdate,
};
pub use atlasom_api::{SessionEvent, SessionSnapshot, SessionStorage};
