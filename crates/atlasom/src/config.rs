//! CLI configuration: thin wrapper around `atlasom_config`.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--endpoint, --user, --insecure, ...).

use std::time::Duration;

use atlasom_api::TlsMode;
use atlasom_core::{ConsoleConfig, Locale};

use crate::cli::{GlobalOpts, Lang};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use atlasom_config::{
    Config, Profile, config_path, load_config_or_default, resolve_password, save_config,
    session_path,
};

/// Where the next command goes and as whom.
#[derive(Debug, Clone)]
pub struct Target {
    pub profile_name: String,
    pub profile: Profile,
    pub console: ConsoleConfig,
    /// Login name from `--user` or the profile.
    pub username: Option<String>,
}

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

impl From<Lang> for Locale {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::En => Locale::En,
            Lang::Zh => Locale::Zh,
        }
    }
}

/// Build the connection target from the config file, profile and flags.
///
/// Flags win over the profile. Without a profile, `--endpoint` alone is
/// enough.
pub fn resolve_target(global: &GlobalOpts, config: &Config) -> Result<Target, CliError> {
    let profile_name = active_profile_name(global, config);

    let mut profile = match config.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(config),
            });
        }
        None => Profile {
            endpoint: global.endpoint.clone().ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?,
            ..Profile::default()
        },
    };

    if let Some(ref endpoint) = global.endpoint {
        profile.endpoint.clone_from(endpoint);
    }

    let mut console = atlasom_config::profile_to_console_config(&profile, &config.defaults)?;
    if global.insecure {
        console.tls = TlsMode::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        console.timeout = Duration::from_secs(secs);
    }
    if let Some(lang) = global.lang {
        console.locale = lang.into();
    }

    let username = global.user.clone().or_else(|| profile.username.clone());
    Ok(Target {
        profile_name,
        profile,
        console,
        username,
    })
}

pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["atlasom"];
        argv.extend_from_slice(args);
        argv.push("whoami");
        Cli::try_parse_from(argv).expect("valid args").global
    }

    fn config_with_edge() -> Config {
        toml::from_str(
            r#"
            default_profile = "edge"

            [profiles.edge]
            endpoint = "https://192.168.2.111"
            username = "admin"
            insecure = false
            "#,
        )
        .expect("valid toml")
    }

    #[test]
    fn flags_override_profile() {
        let config = config_with_edge();
        let target = resolve_target(
            &global(&["-k", "--timeout", "5", "--lang", "zh", "-u", "ops"]),
            &config,
        )
        .expect("resolves");

        assert_eq!(target.profile_name, "edge");
        assert!(matches!(target.console.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(target.console.timeout, Duration::from_secs(5));
        assert_eq!(target.console.locale, Locale::Zh);
        assert_eq!(target.username.as_deref(), Some("ops"));
    }

    #[test]
    fn profile_settings_apply_without_flags() {
        let target = resolve_target(&global(&[]), &config_with_edge()).expect("resolves");
        assert!(matches!(target.console.tls, TlsMode::System));
        assert_eq!(target.username.as_deref(), Some("admin"));
        assert_eq!(target.console.url.as_str(), "https://192.168.2.111/");
    }

    #[test]
    fn endpoint_flag_works_without_profile() {
        let config = Config::default();
        let target = resolve_target(&global(&["-e", "https://10.0.0.5"]), &config)
            .expect("resolves");
        assert_eq!(target.console.url.host_str(), Some("10.0.0.5"));
        assert!(target.username.is_none());
    }

    #[test]
    fn missing_profile_and_endpoint() {
        let config = Config::default();
        assert!(matches!(
            resolve_target(&global(&[]), &config),
            Err(CliError::NoConfig { .. })
        ));
        assert!(matches!(
            resolve_target(&global(&["-p", "lab"]), &config),
            Err(CliError::ProfileNotFound { .. })
        ));
    }
}
