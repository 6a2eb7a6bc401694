//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use atlasom_config::ConfigError;
use atlasom_core::{CodeKind, CoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to appliance at {url}")]
    #[diagnostic(
        code(atlasom::connection_failed),
        help(
            "Check that the appliance is powered on and reachable.\n\
             URL: {url}\n\
             Try: atlasom system info --insecure"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS certificate verification failed: {reason}")]
    #[diagnostic(
        code(atlasom::tls_error),
        help(
            "Appliances ship a self-signed certificate.\n\
             Use --insecure (-k) to accept it, or configure ca_cert in your profile."
        )
    )]
    TlsError { reason: String },

    // ── Session ──────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(atlasom::auth_failed),
        help(
            "Check the user name and password of profile '{profile}'.\n\
             Run: atlasom config set-password --profile {profile}"
        )
    )]
    AuthFailed { message: String, profile: String },

    #[error("{message}")]
    #[diagnostic(code(atlasom::session_expired), help("Run: atlasom login"))]
    SessionExpired { message: String },

    #[error("Not logged in")]
    #[diagnostic(code(atlasom::not_logged_in), help("Run: atlasom login"))]
    NotLoggedIn,

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(atlasom::no_credentials),
        help(
            "Configure credentials with: atlasom config init\n\
             Or set the ATLASOM_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Appliance ────────────────────────────────────────────────────
    #[error("Not found: {message}")]
    #[diagnostic(code(atlasom::not_found))]
    NotFound { message: String },

    #[error("{message}")]
    #[diagnostic(code(atlasom::rejected))]
    Rejected {
        message: String,
        #[help]
        detail: Option<String>,
        kind: CodeKind,
    },

    #[error("Unexpected response from appliance: {message}")]
    #[diagnostic(code(atlasom::invalid_response))]
    InvalidResponse { message: String },

    #[error("'{operation}' is not available on this appliance")]
    #[diagnostic(
        code(atlasom::unsupported),
        help("This command requires {required}. Run: atlasom whoami")
    )]
    Unsupported { operation: String, required: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(atlasom::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(atlasom::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: atlasom config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No appliance configured")]
    #[diagnostic(
        code(atlasom::no_config),
        help(
            "Create a profile with: atlasom config init\n\
             Or pass --endpoint. Config file: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("{0}")]
    #[diagnostic(code(atlasom::config))]
    Config(String),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(atlasom::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Cancelled")]
    #[diagnostic(code(atlasom::cancelled))]
    Cancelled,

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(atlasom::timeout),
        help("Increase the timeout with --timeout or check the appliance load.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error("I/O error on {path}")]
    #[diagnostic(code(atlasom::file))]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(atlasom::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

/// Help line under an appliance rejection: the vendor code and what the
/// appliance itself said.
fn rejected_help(code: Option<u32>, detail: Option<String>) -> Option<String> {
    match (code, detail) {
        (Some(code), Some(detail)) => Some(format!("Appliance code {code}: {detail}")),
        (Some(code), None) => Some(format!("Appliance code {code}")),
        (None, detail) => detail,
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. }
            | Self::SessionExpired { .. }
            | Self::NotLoggedIn
            | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Unsupported { .. } => exit_code::PERMISSION,
            Self::Rejected { kind, .. } => kind_exit_code(*kind),
            _ => exit_code::GENERAL,
        }
    }
}

fn kind_exit_code(kind: CodeKind) -> i32 {
    match kind {
        CodeKind::InvalidInput => exit_code::USAGE,
        CodeKind::Auth => exit_code::AUTH,
        CodeKind::NotFound => exit_code::NOT_FOUND,
        CodeKind::Permission => exit_code::PERMISSION,
        CodeKind::Conflict | CodeKind::Busy => exit_code::CONFLICT,
        CodeKind::General => exit_code::GENERAL,
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason, .. } if reason.starts_with("TLS error") => {
                CliError::TlsError { reason }
            }
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::AuthenticationFailed { message, .. } => CliError::AuthFailed {
                message,
                profile: "current".into(),
            },
            CoreError::SessionExpired { message } => CliError::SessionExpired { message },
            CoreError::NotLoggedIn => CliError::NotLoggedIn,
            CoreError::Unsupported {
                operation,
                required,
            } => CliError::Unsupported {
                operation,
                required,
            },
            CoreError::ValidationFailed { field, message } => CliError::Validation {
                field,
                reason: message,
            },
            CoreError::NotFound { message } => CliError::NotFound { message },
            CoreError::Rejected {
                message,
                detail,
                code,
                kind,
                ..
            } => CliError::Rejected {
                message,
                detail: rejected_help(code, detail),
                kind,
            },
            CoreError::InvalidResponse { message } => CliError::InvalidResponse { message },
            CoreError::Io { path, source } => CliError::File { path, source },
            CoreError::Config { message } | CoreError::Internal(message) => {
                CliError::Config(message)
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile(name) => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_vendor_kind() {
        let busy = CliError::from(CoreError::Rejected {
            message: "The system is busy.".into(),
            detail: None,
            code: Some(100_028),
            status: Some(400),
            kind: CodeKind::Busy,
            background: false,
        });
        assert_eq!(busy.exit_code(), exit_code::CONFLICT);

        let invalid = CliError::from(CoreError::validation("days", "out of range"));
        assert_eq!(invalid.exit_code(), exit_code::USAGE);

        let expired = CliError::from(CoreError::SessionExpired {
            message: "expired".into(),
        });
        assert_eq!(expired.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn tls_failures_get_their_own_hint() {
        let err = CliError::from(CoreError::ConnectionFailed {
            url: String::new(),
            reason: "TLS error: bad CA".into(),
        });
        assert!(matches!(err, CliError::TlsError { .. }));
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }
}
