//! Security command handlers: accounts, password policy, HTTPS
//! certificate, login rules and the weak password dictionary.

use atlasom_api::redfish::{Account, HttpsCert, LoginRule};
use atlasom_core::CredentialChange;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{
    CertArgs, CertCommand, LoginRulesArgs, LoginRulesCommand, PunyDictArgs, PunyDictCommand,
    SecurityArgs, SecurityCommand,
};
use crate::error::CliError;
use crate::output::{self, opt, opt_value};

use super::{App, util};

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Locked")]
    locked: String,
}

impl From<&Account> for AccountRow {
    fn from(a: &Account) -> Self {
        Self {
            id: opt(a.id.as_deref()),
            user: opt(a.user_name.as_deref()),
            role: opt(a.role_id.as_deref()),
            enabled: opt(a.enabled),
            locked: opt(a.locked),
        }
    }
}

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Enabled")]
    enable: String,
    #[tabled(rename = "From")]
    start: String,
    #[tabled(rename = "Until")]
    end: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "MAC")]
    mac: String,
}

#[derive(Serialize)]
struct NumberedRule {
    index: usize,
    #[serde(flatten)]
    rule: LoginRule,
}

impl From<&NumberedRule> for RuleRow {
    fn from(r: &NumberedRule) -> Self {
        Self {
            index: r.index,
            enable: r.rule.enable.clone(),
            start: opt(r.rule.start_time.as_deref()),
            end: opt(r.rule.end_time.as_deref()),
            ip: opt(r.rule.ip_addr.as_deref()),
            mac: opt(r.rule.mac_addr.as_deref()),
        }
    }
}

/// A single setting with the value the appliance reports.
#[derive(Serialize)]
struct Setting {
    name: &'static str,
    value: Option<u32>,
}

fn cert_detail(cert: &HttpsCert) -> String {
    let info = cert.certificate.clone().unwrap_or_default();
    output::detail_table(&[
        ("Subject", opt(info.subject.as_deref())),
        ("Issuer", opt(info.issuer.as_deref())),
        ("Valid from", opt(info.valid_not_before.as_deref())),
        ("Valid until", opt(info.valid_not_after.as_deref())),
        ("Serial number", opt(info.serial_number.as_deref())),
        ("Signature", opt(info.signature_algorithm.as_deref())),
        ("Key length", opt_value(info.public_key_length_bits.as_ref())),
        ("Days left", opt_value(info.expired_day_remaining.as_ref())),
        ("Alarm before (days)", opt(cert.cert_alarm_time)),
    ])
}

fn render_setting(app: &App<'_>, setting: &Setting) {
    let out = output::render_single(
        &app.global.output,
        setting,
        |s| output::detail_table(&[(s.name, opt(s.value))]),
        |s| opt(s.value),
    );
    app.print(&out);
}

/// Prompt for a new password twice.
fn new_password() -> Result<SecretString, CliError> {
    let first = util::prompt_secret("New password")?;
    let second = util::prompt_secret("Repeat new password")?;
    if first.expose_secret() != second.expose_secret() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "the passwords do not match".into(),
        });
    }
    Ok(first)
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(app: &App<'_>, args: SecurityArgs) -> Result<(), CliError> {
    let console = &app.console;
    let client = console.client();

    match args.command {
        SecurityCommand::Accounts => {
            let collection = console.run(client.accounts()).await?;
            let mut accounts = Vec::new();
            for id in collection.member_ids() {
                accounts.push(console.run(client.account(&id)).await?);
            }
            let out = output::render_list(&app.global.output, &accounts, |a| AccountRow::from(a), |a| {
                opt(a.user_name.as_deref())
            });
            app.print(&out);
        }

        SecurityCommand::Passwd { id, new_user } => {
            let account = console.run(client.account(&id)).await?;
            let current = account.user_name.unwrap_or_default();
            let change = CredentialChange {
                user_name: new_user.unwrap_or_else(|| current.clone()),
                old_password: util::prompt_secret("Current password")?,
                new_password: new_password()?,
            };
            console.change_credentials(&id, &change).await?;

            // The appliance ends the session of the account that changed.
            if app.target.username.as_deref() == Some(current.as_str()) {
                console.session().clear();
                app.done("Credentials changed; log in again with the new password");
            } else {
                app.done(&format!("Credentials of account {id} changed"));
            }
        }

        SecurityCommand::SessionTimeout { minutes: None } => {
            let service = console.run(client.session_service()).await?;
            render_setting(
                app,
                &Setting {
                    name: "Session timeout (minutes)",
                    value: service.session_timeout,
                },
            );
        }

        SecurityCommand::SessionTimeout {
            minutes: Some(minutes),
        } => {
            console
                .set_session_timeout(minutes, &app.password()?)
                .await?;
            app.done(&format!("Session timeout set to {minutes} minutes"));
        }

        SecurityCommand::PasswordExpiry { days: None } => {
            let service = console.run(client.account_service()).await?;
            render_setting(
                app,
                &Setting {
                    name: "Password validity (days)",
                    value: service.password_expiration_days,
                },
            );
        }

        SecurityCommand::PasswordExpiry { days: Some(days) } => {
            console
                .set_password_expiration(days, &app.password()?)
                .await?;
            if days == 0 {
                app.done("Passwords no longer expire");
            } else {
                app.done(&format!("Passwords expire after {days} days"));
            }
        }

        SecurityCommand::Cert(args) => cert(app, args).await?,
        SecurityCommand::LoginRules(args) => login_rules(app, args).await?,
        SecurityCommand::PunyDict(args) => puny_dict(app, args).await?,
    }
    Ok(())
}

async fn cert(app: &App<'_>, args: CertArgs) -> Result<(), CliError> {
    let console = &app.console;

    match args.command {
        CertCommand::Show => {
            let cert = console.run(console.client().https_cert()).await?;
            let out = output::render_single(&app.global.output, &cert, cert_detail, |c| {
                opt(c.certificate.as_ref().and_then(|i| i.subject.as_deref()))
            });
            app.print(&out);
        }

        CertCommand::Import { file } => {
            let notice = console.import_server_cert(&file, &app.password()?).await?;
            util::notice(notice.as_deref(), app.quiet());
            app.done("Certificate imported; reconnect to use it");
        }

        CertCommand::Csr { out } => {
            let data = console.download_csr().await?;
            util::write_download(&out, &data, app.quiet())?;
        }

        CertCommand::AlarmTime { days } => {
            console.set_cert_alarm_time(days, &app.password()?).await?;
            app.done(&format!("Certificate alarm raised {days} days before expiry"));
        }
    }
    Ok(())
}

async fn login_rules(app: &App<'_>, args: LoginRulesArgs) -> Result<(), CliError> {
    let console = &app.console;

    match args.command {
        LoginRulesCommand::Show => {
            let rules: Vec<NumberedRule> = console
                .login_rules()
                .await?
                .into_iter()
                .enumerate()
                .map(|(i, rule)| NumberedRule { index: i + 1, rule })
                .collect();
            let out = output::render_list(&app.global.output, &rules, |r| RuleRow::from(r), |r| {
                r.index.to_string()
            });
            app.print(&out);
        }

        LoginRulesCommand::Set { from_file } => {
            let rules: Vec<LoginRule> = util::read_json_file(&from_file)?;
            console.set_login_rules(&rules, &app.password()?).await?;
            app.done(&format!("{} login rule(s) applied", rules.len()));
        }

        LoginRulesCommand::Import { file } => {
            console.import_login_rules(&file, &app.password()?).await?;
            app.done("Login rules imported");
        }

        LoginRulesCommand::Export { out } => {
            let data = console.export_login_rules().await?;
            util::write_download(&out, &data, app.quiet())?;
        }
    }
    Ok(())
}

async fn puny_dict(app: &App<'_>, args: PunyDictArgs) -> Result<(), CliError> {
    let console = &app.console;

    match args.command {
        PunyDictCommand::Import { file } => {
            console.import_puny_dict(&file, &app.password()?).await?;
            app.done("Weak password dictionary imported");
        }

        PunyDictCommand::Export { out } => {
            let data = console.export_puny_dict().await?;
            util::write_download(&out, &data, app.quiet())?;
        }

        PunyDictCommand::Delete => {
            if !util::confirm("Delete the weak password dictionary?", app.global.yes)? {
                return Err(CliError::Cancelled);
            }
            console.delete_puny_dict(&app.password()?).await?;
            app.done("Weak password dictionary deleted");
        }
    }
    Ok(())
}
