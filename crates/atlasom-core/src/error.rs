// ── Core error types ──
//
// User-facing errors from atlasom-core. Appliance failures arrive here as
// `atlasom_api::Error` and leave with their vendor code resolved to a
// localized message. Consumers match on variants and `CodeKind`, never on
// raw HTTP details.

use thiserror::Error;

use crate::error_code::{self, CodeKind, Locale};

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to appliance at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Session errors ───────────────────────────────────────────────
    #[error("{message}")]
    AuthenticationFailed { message: String, code: Option<u32> },

    /// The appliance dropped the session. The local session is already cleared.
    #[error("{message}")]
    SessionExpired { message: String },

    #[error("Not logged in")]
    NotLoggedIn,

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation not supported: {operation} (requires {required})")]
    Unsupported { operation: String, required: String },

    #[error("Invalid {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The appliance refused the request.
    ///
    /// `message` is the localized text for `code`; `detail` keeps whatever
    /// the appliance itself said.
    #[error("{message}")]
    Rejected {
        message: String,
        detail: Option<String>,
        code: Option<u32>,
        status: Option<u16>,
        kind: CodeKind,
        background: bool,
    },

    #[error("Unexpected response from appliance: {message}")]
    InvalidResponse { message: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unsupported(operation: impl Into<String>, required: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
            required: required.into(),
        }
    }

    /// Translate a transport-layer error, resolving vendor codes in `locale`.
    pub fn from_api(err: atlasom_api::Error, locale: Locale) -> Self {
        use atlasom_api::Error as Api;

        match err {
            Api::Authentication {
                message,
                vendor_code,
            } => Self::AuthenticationFailed {
                message: vendor_code
                    .and_then(error_code::lookup)
                    .map_or(message, |entry| entry.message(locale).to_owned()),
                code: vendor_code,
            },
            Api::SessionExpired { vendor_code } => Self::SessionExpired {
                message: vendor_code.and_then(error_code::lookup).map_or_else(
                    || {
                        locale
                            .pick(
                                "The session has expired. Log in again.",
                                "会话已失效，请重新登录。",
                            )
                            .to_owned()
                    },
                    |entry| entry.message(locale).to_owned(),
                ),
            },
            Api::NotLoggedIn => Self::NotLoggedIn,
            Api::Transport(ref e) => {
                if e.is_timeout() {
                    Self::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    Self::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    Self::Rejected {
                        message: error_code::generic_message(locale).to_owned(),
                        detail: Some(e.to_string()),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                        kind: CodeKind::General,
                        background: false,
                    }
                }
            }
            Api::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            Api::Timeout { timeout_secs } => Self::Timeout { timeout_secs },
            Api::Tls(reason) => Self::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {reason}"),
            },
            Api::Redfish {
                status,
                vendor_code,
                message,
                background,
            } => {
                if status == 404 && vendor_code.is_none() {
                    return Self::NotFound { message };
                }
                Self::Rejected {
                    message: error_code::message_for(vendor_code, locale).to_owned(),
                    detail: Some(message),
                    code: vendor_code,
                    status: Some(status),
                    kind: error_code::kind_of(vendor_code),
                    background,
                }
            }
            Api::Deserialization { message, .. } => Self::InvalidResponse { message },
            Api::Io { path, source } => Self::Io { path, source },
        }
    }

    /// Vendor code carried by the failure, if any.
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::AuthenticationFailed { code, .. } | Self::Rejected { code, .. } => *code,
            _ => None,
        }
    }

    /// Classification used for exit codes.
    pub fn kind(&self) -> CodeKind {
        match self {
            Self::AuthenticationFailed { .. } | Self::SessionExpired { .. } | Self::NotLoggedIn => {
                CodeKind::Auth
            }
            Self::ValidationFailed { .. } => CodeKind::InvalidInput,
            Self::NotFound { .. } => CodeKind::NotFound,
            Self::Unsupported { .. } => CodeKind::Permission,
            Self::Rejected { kind, .. } => *kind,
            _ => CodeKind::General,
        }
    }

    /// `true` when logging in again may resolve the failure.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. } | Self::NotLoggedIn)
    }

    /// `true` for failures of background polling requests.
    pub fn is_background(&self) -> bool {
        matches!(
            self,
            Self::Rejected {
                background: true,
                ..
            }
        )
    }
}

impl From<atlasom_api::Error> for CoreError {
    fn from(err: atlasom_api::Error) -> Self {
        Self::from_api(err, Locale::default())
    }
}
