//! Configuration for the atlasom CLI.
//!
//! TOML profiles, password resolution (env + keyring + plaintext), the
//! per-profile session file, and translation to
//! `atlasom_core::ConsoleConfig`. The CLI layers its flags on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use atlasom_api::{SessionSnapshot, TlsMode};
use atlasom_core::{ConsoleConfig, Locale};
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Keyring service name; entries are keyed `{profile}/password`.
pub const KEYRING_SERVICE: &str = "atlasom";
pub const PASSWORD_ENV: &str = "ATLASOM_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{0}' not found")]
    UnknownProfile(String),

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("session file is corrupt: {0}")]
    Session(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named appliance profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: the explicit one, else the default.
    pub fn profile_name<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile(name.into()))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Accept the appliance's self-signed certificate.
    #[serde(default = "default_insecure")]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub locale: Locale,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: default_insecure(),
            timeout: default_timeout(),
            locale: Locale::default(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_insecure() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}

/// A named appliance profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Appliance base URL (e.g., "https://192.168.2.111").
    pub endpoint: String,

    pub username: Option<String>,

    /// Plaintext password. Prefer the keyring or `password_env`.
    pub password: Option<String>,

    /// Environment variable holding the password.
    pub password_env: Option<String>,

    /// PEM file of the CA that signed the appliance certificate.
    pub ca_cert: Option<PathBuf>,

    pub insecure: Option<bool>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,

    pub locale: Option<Locale>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "atlasom", "atlasom")
}

fn home_fallback(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.extend(parts);
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".config", "atlasom", "config.toml"]),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where a profile's session token is kept between invocations.
pub fn session_path(profile_name: &str) -> PathBuf {
    let file = format!("{profile_name}.json");
    project_dirs().map_or_else(
        || home_fallback(&[".cache", "atlasom", "sessions", file.as_str()]),
        |dirs| dirs.cache_dir().join("sessions").join(&file),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, with `ATLASOM_`-prefixed environment variables
/// layered on top (`ATLASOM_DEFAULTS__TIMEOUT=60`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ATLASOM_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the profile password without a CLI flag: `password_env`,
/// `ATLASOM_PASSWORD`, keyring, then plaintext.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_password_with(profile, profile_name, |name| std::env::var(name).ok(), |key| {
        keyring::Entry::new(KEYRING_SERVICE, key)
            .and_then(|entry| entry.get_password())
            .ok()
    })
}

fn resolve_password_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring_lookup: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env
    if let Some(pw) = profile.password_env.as_deref().and_then(&env) {
        debug!(profile = profile_name, "password from profile env var");
        return Ok(SecretString::from(pw));
    }

    // 2. Global env var
    if let Some(pw) = env(PASSWORD_ENV) {
        debug!(profile = profile_name, "password from {PASSWORD_ENV}");
        return Ok(SecretString::from(pw));
    }

    // 3. Keyring
    if let Some(pw) = keyring_lookup(&format!("{profile_name}/password")) {
        debug!(profile = profile_name, "password from keyring");
        return Ok(SecretString::from(pw));
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile password in the system keyring.
pub fn store_password(profile_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))?;
    entry.set_password(password.expose_secret())?;
    Ok(())
}

// ── Console config ──────────────────────────────────────────────────

/// Build a `ConsoleConfig` from a profile, no CLI flag overrides.
pub fn profile_to_console_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ConsoleConfig, ConfigError> {
    let url: url::Url = profile
        .endpoint
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("invalid URL: {}", profile.endpoint),
        })?;
    if !matches!(url.scheme(), "https" | "http") {
        return Err(ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    let tls = if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else {
        TlsMode::System
    };

    let mut config = ConsoleConfig::new(url);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.locale = profile.locale.unwrap_or(defaults.locale);
    Ok(config)
}

// ── Session file ────────────────────────────────────────────────────

/// Read a saved session. A missing file is an empty session.
pub fn load_session(path: &Path) -> Result<SessionSnapshot, ConfigError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionSnapshot::default()),
        Err(e) => Err(e.into()),
    }
}

/// Write a session snapshot, readable only by the owner.
pub fn save_session(path: &Path, snapshot: &SessionSnapshot) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec_pretty(snapshot)?;
    write_private(path, &json)?;
    debug!(path = %path.display(), "session saved");
    Ok(())
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)
}

/// Remove a saved session. Removing a missing file is not an error.
pub fn clear_session(path: &Path) -> Result<(), ConfigError> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn profile() -> Profile {
        Profile {
            endpoint: "https://192.168.2.111".into(),
            username: Some("admin".into()),
            ..Profile::default()
        }
    }

    fn exposed(secret: &SecretString) -> &str {
        secret.expose_secret()
    }

    #[test]
    fn toml_profiles_load_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "lab"

[defaults]
timeout = 60
locale = "zh"

[profiles.lab]
endpoint = "https://10.0.0.5"
username = "admin"
insecure = false
"#,
        )
        .expect("write config");

        let config = load_config_from(&path).expect("config loads");
        assert_eq!(config.profile_name(None), "lab");
        assert_eq!(config.profile_name(Some("other")), "other");
        assert_eq!(config.defaults.output, "table");
        assert_eq!(config.defaults.locale, Locale::Zh);

        let lab = config.profile("lab").expect("lab profile");
        let console = profile_to_console_config(lab, &config.defaults).expect("valid");
        assert_eq!(console.url.as_str(), "https://10.0.0.5/");
        assert_eq!(console.timeout, Duration::from_secs(60));
        assert_eq!(console.locale, Locale::Zh);
        assert!(matches!(console.tls, TlsMode::System));
        assert!(matches!(
            config.profile("missing"),
            Err(ConfigError::UnknownProfile(_))
        ));
    }

    #[test]
    fn config_round_trips_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.profiles.insert("default".into(), profile());

        save_config_to(&config, &path).expect("save");
        let loaded = load_config_from(&path).expect("load");
        assert_eq!(loaded.profiles["default"].endpoint, "https://192.168.2.111");
        assert!(loaded.defaults.insecure);
    }

    #[test]
    fn tls_mode_follows_profile() {
        let defaults = Defaults::default();
        let config = profile_to_console_config(&profile(), &defaults).expect("valid");
        assert!(matches!(config.tls, TlsMode::DangerAcceptInvalid));

        let pinned = Profile {
            ca_cert: Some(PathBuf::from("/etc/atlasom/ca.pem")),
            insecure: Some(true),
            ..profile()
        };
        let config = profile_to_console_config(&pinned, &defaults).expect("valid");
        assert!(matches!(config.tls, TlsMode::CustomCa(_)));
    }

    #[test]
    fn bad_endpoint_is_rejected() {
        let defaults = Defaults::default();
        for endpoint in ["not a url", "ftp://10.0.0.1"] {
            let bad = Profile {
                endpoint: endpoint.into(),
                ..profile()
            };
            assert!(matches!(
                profile_to_console_config(&bad, &defaults),
                Err(ConfigError::Validation { .. })
            ));
        }
    }

    #[test]
    fn password_chain_order() {
        let with_everything = Profile {
            password: Some("plain".into()),
            password_env: Some("LAB_PW".into()),
            ..profile()
        };
        let env = |name: &str| match name {
            "LAB_PW" => Some("from-profile-env".to_owned()),
            PASSWORD_ENV => Some("from-global-env".to_owned()),
            _ => None,
        };
        let keyring = |_: &str| Some("from-keyring".to_owned());
        let none = |_: &str| None;

        let pw = resolve_password_with(&with_everything, "lab", env, keyring).expect("pw");
        assert_eq!(exposed(&pw), "from-profile-env");

        let global_only = |name: &str| (name == PASSWORD_ENV).then(|| "from-global-env".to_owned());
        let pw = resolve_password_with(&with_everything, "lab", global_only, keyring).expect("pw");
        assert_eq!(exposed(&pw), "from-global-env");

        let pw = resolve_password_with(&with_everything, "lab", none, keyring).expect("pw");
        assert_eq!(exposed(&pw), "from-keyring");

        let pw = resolve_password_with(&with_everything, "lab", none, none).expect("pw");
        assert_eq!(exposed(&pw), "plain");

        assert!(matches!(
            resolve_password_with(&profile(), "lab", none, none),
            Err(ConfigError::NoCredentials { .. })
        ));
    }

    #[test]
    fn session_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sessions").join("lab.json");

        assert_eq!(load_session(&path).expect("missing is empty"), SessionSnapshot::default());

        let snapshot = SessionSnapshot {
            token: Some("tok".into()),
            locale: Some("zh".into()),
            model: Some("Atlas 500".into()),
            ..SessionSnapshot::default()
        };
        save_session(&path, &snapshot).expect("save");
        assert_eq!(load_session(&path).expect("load"), snapshot);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).expect("stat").permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        clear_session(&path).expect("clear");
        clear_session(&path).expect("clearing twice is fine");
        assert!(!path.exists());
    }
}
