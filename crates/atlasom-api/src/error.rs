use thiserror::Error;

/// Vendor codes the appliance uses to report a dead session.
///
/// `110201` = session not found, `110202` = session timed out.
pub const SESSION_EXPIRY_CODES: [u32; 2] = [110_201, 110_202];

/// Top-level error type for the `atlasom-api` crate.
///
/// Covers every failure mode of a Redfish exchange: authentication,
/// transport, appliance-reported errors and payload decoding.
/// `atlasom-core` maps these into localized, user-facing messages.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (wrong credentials, locked account, expired password).
    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        vendor_code: Option<u32>,
    },

    /// The appliance no longer recognizes the session token.
    ///
    /// Raised on HTTP 401 or on one of [`SESSION_EXPIRY_CODES`]. By the time
    /// a caller sees this, the session store has already been cleared.
    #[error("Session expired -- log in again")]
    SessionExpired { vendor_code: Option<u32> },

    /// An operation that needs a session was attempted without one.
    #[error("Not logged in")]
    NotLoggedIn,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Appliance ───────────────────────────────────────────────────
    /// Error reported by the appliance, parsed from the Redfish error envelope.
    ///
    /// `background` is set for `AutoRefresh` requests so callers can keep
    /// polling failures out of the user's face.
    #[error("Redfish error (HTTP {status}): {message}")]
    Redfish {
        status: u16,
        vendor_code: Option<u32>,
        message: String,
        background: bool,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Local file could not be read for upload or written after download.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if this error means the session is gone
    /// and logging in again might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. } | Self::NotLoggedIn)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Redfish { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the failing request was a background refresh.
    pub fn is_background(&self) -> bool {
        matches!(
            self,
            Self::Redfish {
                background: true,
                ..
            }
        )
    }

    /// The vendor status code from `@Message.ExtendedInfo[].Oem.status`, if any.
    pub fn vendor_code(&self) -> Option<u32> {
        match self {
            Self::Redfish { vendor_code, .. }
            | Self::Authentication { vendor_code, .. }
            | Self::SessionExpired { vendor_code } => *vendor_code,
            _ => None,
        }
    }

    /// The HTTP status of the failing response, if one was received.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Redfish { status, .. } => Some(*status),
            Self::SessionExpired { .. } => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_code_is_exposed_for_appliance_errors() {
        let err = Error::Redfish {
            status: 400,
            vendor_code: Some(110_501),
            message: "mount failed".into(),
            background: false,
        };
        assert_eq!(err.vendor_code(), Some(110_501));
        assert_eq!(err.http_status(), Some(400));
        assert!(!err.is_background());
        assert!(!err.is_not_found());
    }

    #[test]
    fn expired_session_counts_as_auth_expired() {
        let err = Error::SessionExpired {
            vendor_code: Some(110_202),
        };
        assert!(err.is_auth_expired());
        assert_eq!(err.vendor_code(), Some(110_202));
        assert!(Error::NotLoggedIn.is_auth_expired());
    }

    #[test]
    fn redfish_404_is_not_found() {
        let err = Error::Redfish {
            status: 404,
            vendor_code: None,
            message: "The requested resource does not exists.".into(),
            background: true,
        };
        assert!(err.is_not_found());
        assert!(err.is_background());
    }
}
