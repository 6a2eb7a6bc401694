// Security settings: session policy, accounts, HTTPS certificate, login
// rules and the weak password dictionary.

use std::path::Path;

use atlasom_api::redfish::{CredentialChange, LoginRule};
use bytes::Bytes;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;

use super::Console;
use crate::error::CoreError;
use crate::error_code::{Locale, PartialSuccess};
use crate::validate::{self, Rule};

/// HTTPS server certificate files.
pub const CERT_SUFFIXES: &[&str] = &[".crt", ".cer"];
pub const LOGIN_RULES_SUFFIXES: &[&str] = &[".ini"];
pub const PUNY_DICT_SUFFIXES: &[&str] = &[".conf"];

/// Most login rules the appliance keeps.
pub const MAX_LOGIN_RULES: usize = 30;

/// Vendor code of the "certificate is not safe" notice on import.
const CERT_NOT_SAFE_CODE: u32 = 110_307;

fn check_login_rule(rule: &LoginRule, locale: Locale) -> Result<(), CoreError> {
    if rule.enable != "true" && rule.enable != "false" {
        return Err(CoreError::validation(
            "enable",
            locale.pick("must be true or false", "取值须为 true 或 false"),
        ));
    }
    let field = |value: &Option<String>| value.as_deref().unwrap_or_default().to_owned();
    Rule::Time.validate("start-time", &field(&rule.start_time), locale)?;
    Rule::Time.validate("end-time", &field(&rule.end_time), locale)?;
    Rule::IpWithMask.validate("ip", &field(&rule.ip_addr), locale)?;
    Rule::Mac.validate("mac", &field(&rule.mac_addr), locale)?;
    Ok(())
}

impl Console {
    // ── Session and password policy ──────────────────────────────────

    /// Inactivity timeout in minutes (5..=120).
    pub async fn set_session_timeout(
        &self,
        minutes: u32,
        password: &SecretString,
    ) -> Result<Value, CoreError> {
        Rule::SessionTimeout.validate("timeout", &minutes.to_string(), self.locale())?;
        self.check_password("password", password)?;
        self.run(self.client().set_session_timeout(minutes, password))
            .await
    }

    /// Password validity in days (0..=365, 0 = never expires).
    pub async fn set_password_expiration(
        &self,
        days: u32,
        password: &SecretString,
    ) -> Result<Value, CoreError> {
        Rule::PasswordExpirationDays.validate("days", &days.to_string(), self.locale())?;
        self.check_password("password", password)?;
        self.run(self.client().set_password_expiration(days, password))
            .await
    }

    /// Change the user name and password of an account.
    pub async fn change_credentials(
        &self,
        id: &str,
        change: &CredentialChange,
    ) -> Result<Value, CoreError> {
        let locale = self.locale();
        validate::required("account", id, locale)?;
        validate::required("username", &change.user_name, locale)?;
        Rule::Username.validate("username", &change.user_name, locale)?;
        self.check_password("old-password", &change.old_password)?;

        let new_password = change.new_password.expose_secret();
        validate::password(&change.user_name, new_password, locale)?;
        if new_password == change.old_password.expose_secret() {
            return Err(CoreError::validation(
                "password",
                locale.pick(
                    "the new password must differ from the old one",
                    "新密码不能与旧密码相同",
                ),
            ));
        }
        self.run(self.client().change_credentials(id, change)).await
    }

    // ── HTTPS certificate ────────────────────────────────────────────

    /// Days before expiry at which the certificate alarm fires (7..=180).
    pub async fn set_cert_alarm_time(
        &self,
        days: u32,
        password: &SecretString,
    ) -> Result<Value, CoreError> {
        Rule::CertAlarmTime.validate("days", &days.to_string(), self.locale())?;
        self.check_password("password", password)?;
        self.run(self.client().set_cert_alarm_time(days, password))
            .await
    }

    /// Install a new HTTPS server certificate.
    ///
    /// Returns a notice when the appliance installed it but rated it weak.
    pub async fn import_server_cert(
        &self,
        file: &Path,
        password: &SecretString,
    ) -> Result<Option<String>, CoreError> {
        self.check_upload(file, CERT_SUFFIXES)?;
        self.check_password("password", password)?;
        let response = self
            .run(self.client().import_server_cert(file, password))
            .await?;

        let weak = response.is_partial_success()
            || response.vendor_code() == Some(CERT_NOT_SAFE_CODE);
        if weak {
            debug!(code = ?response.vendor_code(), "certificate installed with a warning");
        }
        Ok(weak.then(|| PartialSuccess::CertNotSafe.message(self.locale()).to_owned()))
    }

    pub async fn download_csr(&self) -> Result<Bytes, CoreError> {
        self.run(self.client().download_csr()).await
    }

    // ── Login rules ──────────────────────────────────────────────────

    pub async fn login_rules(&self) -> Result<Vec<LoginRule>, CoreError> {
        let load = self.run(self.client().security_load()).await?;
        Ok(load.load_cfg)
    }

    pub async fn set_login_rules(
        &self,
        rules: &[LoginRule],
        password: &SecretString,
    ) -> Result<Value, CoreError> {
        let locale = self.locale();
        if rules.len() > MAX_LOGIN_RULES {
            return Err(CoreError::validation(
                "rules",
                locale.pick("at most 30 login rules", "登录规则最多 30 条"),
            ));
        }
        for rule in rules {
            check_login_rule(rule, locale)?;
        }
        self.check_password("password", password)?;
        self.run(self.client().set_security_load(rules, password))
            .await
    }

    pub async fn import_login_rules(
        &self,
        file: &Path,
        password: &SecretString,
    ) -> Result<Value, CoreError> {
        self.check_upload(file, LOGIN_RULES_SUFFIXES)?;
        self.check_password("password", password)?;
        self.run(self.client().import_security_load(file, password))
            .await
    }

    pub async fn export_login_rules(&self) -> Result<Bytes, CoreError> {
        self.run(self.client().export_security_load()).await
    }

    // ── Weak password dictionary ─────────────────────────────────────

    pub async fn import_puny_dict(
        &self,
        file: &Path,
        password: &SecretString,
    ) -> Result<Value, CoreError> {
        self.check_upload(file, PUNY_DICT_SUFFIXES)?;
        self.check_password("password", password)?;
        self.run(self.client().import_puny_dict(file, password))
            .await
    }

    pub async fn export_puny_dict(&self) -> Result<Bytes, CoreError> {
        self.run(self.client().export_puny_dict()).await
    }

    pub async fn delete_puny_dict(&self, password: &SecretString) -> Result<Value, CoreError> {
        self.check_password("password", password)?;
        self.run(self.client().delete_puny_dict(password)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(enable: &str) -> LoginRule {
        LoginRule {
            enable: enable.into(),
            start_time: Some("08:00".into()),
            end_time: Some("18:00".into()),
            ip_addr: Some("192.168.2.0/24".into()),
            mac_addr: Some("00:1A:2B:3C:4D:5E".into()),
        }
    }

    #[test]
    fn login_rule_fields() {
        assert!(check_login_rule(&rule("true"), Locale::En).is_ok());
        let disabled = LoginRule {
            enable: "false".into(),
            ..LoginRule::default()
        };
        assert!(check_login_rule(&disabled, Locale::En).is_ok());
        assert!(check_login_rule(&rule("yes"), Locale::En).is_err());

        let bad_mac = LoginRule {
            mac_addr: Some("00-1A".into()),
            ..rule("true")
        };
        assert!(matches!(
            check_login_rule(&bad_mac, Locale::En),
            Err(CoreError::ValidationFailed { field, .. }) if field == "mac"
        ));
    }
}
