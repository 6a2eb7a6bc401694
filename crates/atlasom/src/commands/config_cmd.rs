//! Config subcommand handlers. None of them contact the appliance.

use std::str::FromStr;

use atlasom_core::Locale;
use dialoguer::{Confirm, Input, Select};
use secrecy::{ExposeSecret, SecretString};

use crate::cli::{ColorMode, ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::{self, prompt_err};

const PROFILE_KEYS: &str =
    "endpoint, username, password_env, ca_cert, insecure, timeout, locale";
const DEFAULT_KEYS: &str = "output, color, insecure, timeout, locale";

fn parse<T: FromStr>(field: &str, value: &str, expected: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("must be {expected}"),
    })
}

fn value_enum<T: clap::ValueEnum>(field: &str, value: &str, expected: &str) -> Result<T, CliError> {
    T::from_str(value, true).map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("must be {expected}"),
    })
}

fn unknown_key(key: &str, valid: &str) -> CliError {
    CliError::Validation {
        field: key.into(),
        reason: format!("unknown config key '{key}'. Valid keys: {valid}"),
    }
}

/// Apply `key = value` to the config.
///
/// Keys are `defaults.<key>`, `profiles.<name>.<key>`, or a bare profile
/// key for the active profile. Returns a description of what changed.
fn apply_setting(
    cfg: &mut Config,
    active_profile: &str,
    key: &str,
    value: &str,
) -> Result<String, CliError> {
    if let Some(field) = key.strip_prefix("defaults.") {
        let defaults = &mut cfg.defaults;
        match field {
            "output" => {
                value_enum::<OutputFormat>(field, value, "table, json, json-compact, yaml or plain")?;
                defaults.output = value.into();
            }
            "color" => {
                value_enum::<ColorMode>(field, value, "auto, always or never")?;
                defaults.color = value.into();
            }
            "insecure" => defaults.insecure = parse(field, value, "'true' or 'false'")?,
            "timeout" => defaults.timeout = parse(field, value, "a number (seconds)")?,
            "locale" => defaults.locale = parse::<Locale>(field, value, "'en' or 'zh'")?,
            other => return Err(unknown_key(other, DEFAULT_KEYS)),
        }
        return Ok(format!("Set {key}"));
    }

    let (profile_name, field) = match key.strip_prefix("profiles.") {
        Some(rest) => rest.split_once('.').ok_or_else(|| CliError::Validation {
            field: key.into(),
            reason: "expected profiles.<name>.<key>".into(),
        })?,
        None => (active_profile, key),
    };

    let profile = cfg.profiles.entry(profile_name.to_owned()).or_default();
    match field {
        "endpoint" => profile.endpoint = value.into(),
        "username" => profile.username = Some(value.into()),
        "password_env" | "password-env" => profile.password_env = Some(value.into()),
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => profile.insecure = Some(parse(field, value, "'true' or 'false'")?),
        "timeout" => profile.timeout = Some(parse(field, value, "a number (seconds)")?),
        "locale" => profile.locale = Some(parse(field, value, "'en' or 'zh'")?),
        "password" => {
            return Err(CliError::Validation {
                field: "password".into(),
                reason: "use `atlasom config set-password` to store passwords".into(),
            });
        }
        other => return Err(unknown_key(other, PROFILE_KEYS)),
    }
    Ok(format!("Set {field} on profile '{profile_name}'"))
}

/// Config as shown by `config show`: plaintext passwords masked.
fn redacted(cfg: &Config) -> Config {
    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: cfg.defaults.clone(),
        profiles: cfg
            .profiles
            .iter()
            .map(|(name, profile)| {
                let mut profile = profile.clone();
                if profile.password.is_some() {
                    profile.password = Some("********".into());
                }
                (name.clone(), profile)
            })
            .collect(),
    }
}

fn prompt_password_twice(profile_name: &str) -> Result<SecretString, CliError> {
    let password = util::prompt_secret(&format!("Password for '{profile_name}'"))?;
    if password.expose_secret().is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    let again = util::prompt_secret("Repeat password")?;
    if again.expose_secret() != password.expose_secret() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "the passwords do not match".into(),
        });
    }
    Ok(password)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_default(),
                |c| c.default_profile.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let active = config::active_profile_name(global, &cfg);
            let message = apply_setting(&mut cfg, &active, &key, &value)?;
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("{message}");
            }
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: atlasom config init");
                return Ok(());
            }
            let default = cfg.profile_name(None);
            for (name, profile) in &cfg.profiles {
                let marker = if name == default { " *" } else { "" };
                println!("{name}{marker}\t{}", profile.endpoint);
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }

        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name: profile_name,
                });
            }
            let password = prompt_password_twice(&profile_name)?;
            atlasom_config::store_password(&profile_name, &password)?;
            if !global.quiet {
                eprintln!("Password stored in the system keyring for profile '{profile_name}'");
            }
            Ok(())
        }
    }
}

/// Interactive wizard: one profile, password in the keyring or the file.
fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("atlasom configuration wizard");
    eprintln!("Config path: {}\n", config_path.display());

    let mut cfg = config::load_config_or_default();

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let endpoint: String = Input::new()
        .with_prompt("Appliance URL")
        .default("https://192.168.2.111".into())
        .interact_text()
        .map_err(prompt_err)?;

    let username: String = Input::new()
        .with_prompt("User name")
        .default("admin".into())
        .interact_text()
        .map_err(prompt_err)?;

    let password = prompt_password_twice(&profile_name)?;
    let store_choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
        "Don't store, ask every time",
    ];
    let store = Select::new()
        .with_prompt("Where to store the password?")
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let plaintext = match store {
        0 => {
            atlasom_config::store_password(&profile_name, &password)?;
            eprintln!("Password stored in system keyring");
            None
        }
        1 => Some(password.expose_secret().to_owned()),
        _ => None,
    };

    let insecure = Confirm::new()
        .with_prompt("Accept the appliance's self-signed certificate?")
        .default(true)
        .interact()
        .map_err(prompt_err)?;

    let locale_choices = &["English", "中文"];
    let locale = Select::new()
        .with_prompt("Message language")
        .items(locale_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    cfg.profiles.insert(
        profile_name.clone(),
        Profile {
            endpoint,
            username: Some(username),
            password: plaintext,
            insecure: Some(insecure),
            locale: Some(if locale == 1 { Locale::Zh } else { Locale::En }),
            ..Profile::default()
        },
    );
    cfg.default_profile = Some(profile_name.clone());
    config::save_config(&cfg)?;

    eprintln!("\nConfiguration written to {}", config_path.display());
    eprintln!("Active profile: {profile_name}");
    eprintln!("\nTest it: atlasom login && atlasom system info");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_keys_target_the_active_profile() {
        let mut cfg = Config::default();
        let message =
            apply_setting(&mut cfg, "edge", "endpoint", "https://10.0.0.9").expect("valid");
        assert_eq!(message, "Set endpoint on profile 'edge'");
        assert_eq!(cfg.profiles["edge"].endpoint, "https://10.0.0.9");
    }

    #[test]
    fn dotted_keys_reach_defaults_and_named_profiles() {
        let mut cfg = Config::default();
        apply_setting(&mut cfg, "edge", "defaults.locale", "zh").expect("valid");
        apply_setting(&mut cfg, "edge", "profiles.lab.timeout", "60").expect("valid");
        assert_eq!(cfg.defaults.locale, Locale::Zh);
        assert_eq!(cfg.profiles["lab"].timeout, Some(60));
        assert!(!cfg.profiles.contains_key("edge"));
    }

    #[test]
    fn bad_values_and_keys_are_rejected() {
        let mut cfg = Config::default();
        assert!(apply_setting(&mut cfg, "edge", "insecure", "maybe").is_err());
        assert!(apply_setting(&mut cfg, "edge", "defaults.output", "xml").is_err());
        assert!(apply_setting(&mut cfg, "edge", "defaults.site", "x").is_err());
        assert!(apply_setting(&mut cfg, "edge", "password", "secret").is_err());
        assert!(apply_setting(&mut cfg, "edge", "profiles.lab", "x").is_err());
    }

    #[test]
    fn show_masks_plaintext_passwords() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "edge".into(),
            Profile {
                password: Some("Huawei12#$".into()),
                ..Profile::default()
            },
        );
        let shown = redacted(&cfg);
        assert_eq!(shown.profiles["edge"].password.as_deref(), Some("********"));
    }
}
