// ── Console facade ──
//
// One appliance, one operator session. `Console` wraps `RedfishClient` with
// everything a settings page did around a request: input validation,
// device-model gating and localized error translation. Reads that need no
// checks go through `run()` with any `RedfishClient` call.

mod maintenance;
mod network;
mod security;
mod storage;
mod system;

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use atlasom_api::redfish::{ComputerSystem, paths};
use atlasom_api::{
    Credentials, RedfishClient, RequestOptions, SessionEvent, SessionKey, SessionStorage,
};
use secrecy::SecretString;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::ConsoleConfig;
use crate::device::{Capabilities, Capability, DeviceModel, is_extension_module};
use crate::error::CoreError;
use crate::error_code::Locale;
use crate::validate::{self, Rule};

pub use maintenance::FIRMWARE_SUFFIXES;
pub use network::{FD_CERT_SUFFIXES, FD_CRL_SUFFIXES, MAX_IPV4_ADDRESSES};
pub use security::{CERT_SUFFIXES, LOGIN_RULES_SUFFIXES, MAX_LOGIN_RULES, PUNY_DICT_SUFFIXES};
pub use storage::MAX_PARTITIONS;
pub use system::DATE_TIME_FORMAT;

/// What `login()` learned about the appliance.
#[derive(Debug, Clone)]
pub struct LoginSummary {
    pub user: String,
    pub session_id: Option<String>,
    pub model: Option<DeviceModel>,
    pub capabilities: Capabilities,
}

/// Cheaply cloneable handle to one appliance.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    client: RedfishClient,
    default_locale: Locale,
}

impl Console {
    /// Build a console from configuration. Does not contact the appliance.
    pub fn new(config: &ConsoleConfig, session: Arc<SessionStorage>) -> Result<Self, CoreError> {
        let client = RedfishClient::new(config.url.clone(), &config.transport(), session)
            .map_err(|e| CoreError::from_api(e, config.locale))?;
        Ok(Self::with_client(client, config.locale))
    }

    /// Wrap an existing client. A locale already in the session wins over
    /// `default_locale`.
    pub fn with_client(client: RedfishClient, default_locale: Locale) -> Self {
        Self {
            inner: Arc::new(ConsoleInner {
                client,
                default_locale,
            }),
        }
    }

    pub fn client(&self) -> &RedfishClient {
        &self.inner.client
    }

    pub fn session(&self) -> &Arc<SessionStorage> {
        self.inner.client.session()
    }

    /// Login / logout / expiry notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.client.subscribe()
    }

    // ── Locale ───────────────────────────────────────────────────────

    pub fn locale(&self) -> Locale {
        self.session()
            .locale()
            .map_or(self.inner.default_locale, |tag| Locale::from_tag(&tag))
    }

    /// Switch the display language. Survives logout and session expiry.
    pub fn set_locale(&self, locale: Locale) {
        self.session().set(SessionKey::Locale, locale.to_string());
    }

    pub(crate) fn map_err(&self, err: atlasom_api::Error) -> CoreError {
        CoreError::from_api(err, self.locale())
    }

    // ── Session lifecycle ────────────────────────────────────────────

    pub fn is_logged_in(&self) -> bool {
        self.session().is_logged_in()
    }

    pub fn require_login(&self) -> Result<(), CoreError> {
        if self.is_logged_in() {
            Ok(())
        } else {
            Err(CoreError::NotLoggedIn)
        }
    }

    /// Run one request under the current session and translate its error.
    pub async fn run<T, F>(&self, request: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, atlasom_api::Error>>,
    {
        self.require_login()?;
        request.await.map_err(|e| self.map_err(e))
    }

    /// Log in, then detect the device model and extension module.
    pub async fn login(
        &self,
        username: &str,
        password: SecretString,
    ) -> Result<LoginSummary, CoreError> {
        let locale = self.locale();
        validate::required("username", username, locale)?;
        Rule::Username.validate("username", username, locale)?;

        let info = self
            .client()
            .login(&Credentials::new(username, password))
            .await
            .map_err(|e| self.map_err(e))?;
        info!(user = username, "session established");

        let capabilities = self.detect_device().await;
        Ok(LoginSummary {
            user: username.to_owned(),
            session_id: info.id,
            model: self.device_model(),
            capabilities,
        })
    }

    /// End the session. The local session is cleared even if the appliance
    /// refuses.
    pub async fn logout(&self) -> Result<(), CoreError> {
        self.client().logout().await.map_err(|e| self.map_err(e))
    }

    // ── Device gating ────────────────────────────────────────────────

    /// Read the model and module list and record them in the session.
    ///
    /// Detection failures are logged and leave the capability off.
    pub async fn detect_device(&self) -> Capabilities {
        match self.client().system().await {
            Ok(system) => {
                if let Some(model) = system.model.filter(|m| !m.trim().is_empty()) {
                    debug!(%model, "detected device model");
                    self.session().set(SessionKey::Model, model);
                }
            }
            Err(e) => warn!(error = %e, "could not read device model"),
        }

        let has_extension = match self.client().modules().await {
            Ok(modules) => modules
                .member_ids()
                .iter()
                .any(|id| is_extension_module(id)),
            Err(e) => {
                warn!(error = %e, "could not list modules");
                false
            }
        };
        self.session().set_has_extension(has_extension);
        self.capabilities()
    }

    pub fn device_model(&self) -> Option<DeviceModel> {
        self.session()
            .model()
            .map(|model| DeviceModel::from_model_str(&model))
    }

    /// Capabilities of the connected device. An undetected model does not
    /// block the AI processor view.
    pub fn capabilities(&self) -> Capabilities {
        let has_extension = self.session().has_extension();
        match self.device_model() {
            Some(model) => Capabilities::detect(&model, has_extension),
            None => Capabilities {
                lte: has_extension,
                ai_processor: true,
            },
        }
    }

    pub fn require(&self, capability: Capability) -> Result<(), CoreError> {
        self.capabilities().require(capability)
    }

    // ── Polling ──────────────────────────────────────────────────────

    /// System overview fetched as a background refresh: `AutoRefresh`
    /// header, no loading indicator.
    pub async fn overview(&self) -> Result<ComputerSystem, CoreError> {
        self.run(
            self.client()
                .fetch_json(paths::SYSTEMS, &RequestOptions::background()),
        )
        .await
    }

    // ── Shared checks ────────────────────────────────────────────────

    /// A local file about to be uploaded: sane name, expected suffix, exists.
    pub(crate) fn check_upload(&self, file: &Path, suffixes: &[&str]) -> Result<(), CoreError> {
        let locale = self.locale();
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        validate::required("file", &name, locale)?;
        Rule::FileName.validate("file", &name, locale)?;

        let lower = name.to_ascii_lowercase();
        if !suffixes.iter().any(|suffix| lower.ends_with(suffix)) {
            return Err(CoreError::validation(
                "file",
                format!(
                    "{} {}",
                    locale.pick("expected one of", "文件类型须为"),
                    suffixes.join(", ")
                ),
            ));
        }

        if !file.is_file() {
            return Err(CoreError::Io {
                path: file.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }
        Ok(())
    }

    pub(crate) fn check_password(&self, field: &str, password: &SecretString) -> Result<(), CoreError> {
        use secrecy::ExposeSecret;
        validate::required(field, password.expose_secret(), self.locale())
    }
}

#[cfg(test)]
mod tests {
    use atlasom_api::TransportConfig;
    use url::Url;

    use super::*;

    fn console(locale: Locale) -> Console {
        let client = RedfishClient::new(
            Url::parse("https://127.0.0.1").expect("static url"),
            &TransportConfig::default(),
            Arc::new(SessionStorage::new()),
        )
        .expect("client builds");
        Console::with_client(client, locale)
    }

    #[test]
    fn stored_locale_wins_over_default() {
        let console = console(Locale::Zh);
        assert_eq!(console.locale(), Locale::Zh);
        console.set_locale(Locale::En);
        assert_eq!(console.locale(), Locale::En);
        console.session().clear();
        assert_eq!(console.locale(), Locale::En);
    }

    #[tokio::test]
    async fn run_requires_a_session() {
        let console = console(Locale::En);
        let result = console.run(console.client().system()).await;
        assert!(matches!(result, Err(CoreError::NotLoggedIn)));
    }

    #[test]
    fn undetected_model_keeps_ai_view() {
        let console = console(Locale::En);
        let caps = console.capabilities();
        assert!(caps.ai_processor);
        assert!(!caps.lte);

        console.session().set(SessionKey::Model, "Atlas 500 A2");
        console.session().set_has_extension(true);
        assert_eq!(console.device_model(), Some(DeviceModel::Atlas500A2));
        assert!(console.require(Capability::Lte).is_ok());
    }

    #[test]
    fn upload_checks() {
        let console = console(Locale::En);
        let dir = tempfile::tempdir().expect("tempdir");
        let cert = dir.path().join("server.crt");
        std::fs::write(&cert, b"-----BEGIN CERTIFICATE-----").expect("write cert");

        assert!(console.check_upload(&cert, CERT_SUFFIXES).is_ok());
        assert!(matches!(
            console.check_upload(&cert, &[".zip"]),
            Err(CoreError::ValidationFailed { .. })
        ));
        assert!(matches!(
            console.check_upload(&dir.path().join("missing.crt"), CERT_SUFFIXES),
            Err(CoreError::Io { .. })
        ));
        assert!(matches!(
            console.check_upload(&dir.path().join("bad name.crt"), CERT_SUFFIXES),
            Err(CoreError::ValidationFailed { .. })
        ));
    }
}
