// ── Runtime connection configuration ──
//
// Describes how to reach one appliance. The CLI builds a `ConsoleConfig`
// from its profile and hands it in; core never reads config files.

use std::time::Duration;

use atlasom_api::{TlsMode, TransportConfig};
use url::Url;

use crate::error_code::Locale;

/// Configuration for talking to a single appliance.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Appliance URL (e.g., `https://192.168.2.111`).
    pub url: Url,
    /// TLS verification strategy. Appliances ship self-signed certificates.
    pub tls: TlsMode,
    /// Default request timeout.
    pub timeout: Duration,
    /// Locale used when the session store has none.
    pub locale: Locale,
}

impl ConsoleConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsMode::DangerAcceptInvalid,
            timeout: Duration::from_secs(30),
            locale: Locale::default(),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        }
    }
}
