//! Command dispatch: bridges CLI args -> Console calls -> output formatting.

pub mod alarms;
pub mod auth;
pub mod config_cmd;
pub mod firmware;
pub mod hardware;
pub mod logs;
pub mod network;
pub mod security;
pub mod storage;
pub mod system;
pub mod util;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use atlasom_core::{Console, Locale, SessionStorage};
use secrecy::SecretString;
use tracing::debug;

use crate::cli::{Command, GlobalOpts};
use crate::config::{self, Config, Target};
use crate::error::CliError;
use crate::output;

/// One appliance session for the duration of a command.
///
/// The session survives between invocations in a per-profile file: it is
/// restored on connect and written back by `persist()`.
pub struct App<'a> {
    pub console: Console,
    pub target: Target,
    pub global: &'a GlobalOpts,
    session_file: PathBuf,
}

impl<'a> App<'a> {
    /// Resolve the target and restore its saved session. Sends nothing.
    pub fn connect(global: &'a GlobalOpts, cfg: &Config) -> Result<Self, CliError> {
        let target = config::resolve_target(global, cfg)?;
        let session_file = config::session_path(&target.profile_name);
        let snapshot = atlasom_config::load_session(&session_file).unwrap_or_else(|e| {
            debug!(error = %e, "ignoring unreadable session file");
            atlasom_core::SessionSnapshot::default()
        });

        let session = Arc::new(SessionStorage::from_snapshot(snapshot));
        let console = Console::new(&target.console, session)?;
        if let Some(lang) = global.lang {
            console.set_locale(Locale::from(lang));
        }
        debug!(
            profile = %target.profile_name,
            endpoint = %target.console.url,
            logged_in = console.is_logged_in(),
            "connected"
        );
        Ok(Self {
            console,
            target,
            global,
            session_file,
        })
    }

    /// Write the session back, or remove the file once nothing is left.
    pub fn persist(&self) -> Result<(), CliError> {
        let session = self.console.session();
        if session.is_empty() {
            atlasom_config::clear_session(&self.session_file)?;
        } else {
            atlasom_config::save_session(&self.session_file, &session.snapshot())?;
        }
        Ok(())
    }

    /// Log in with stored credentials unless a session is already open.
    pub async fn ensure_login(&self) -> Result<(), CliError> {
        if self.console.is_logged_in() {
            return Ok(());
        }
        let username = self.username()?;
        let password = self.password()?;
        debug!(user = %username, "no saved session, logging in");
        self.console
            .login(&username, password)
            .await
            .map_err(|e| self.auth_error(e))?;
        Ok(())
    }

    pub fn username(&self) -> Result<String, CliError> {
        if let Some(ref user) = self.target.username {
            return Ok(user.clone());
        }
        if !std::io::stdin().is_terminal() {
            return Err(CliError::NoCredentials {
                profile: self.target.profile_name.clone(),
            });
        }
        dialoguer::Input::new()
            .with_prompt("User name")
            .default("admin".to_owned())
            .interact_text()
            .map_err(util::prompt_err)
    }

    /// Password of the operator: the profile chain, else a prompt.
    ///
    /// Also used to confirm sensitive changes, which the appliance checks
    /// against the logged-in account.
    pub fn password(&self) -> Result<SecretString, CliError> {
        match config::resolve_password(&self.target.profile, &self.target.profile_name) {
            Ok(password) => Ok(password),
            Err(atlasom_config::ConfigError::NoCredentials { .. })
                if std::io::stdin().is_terminal() =>
            {
                util::prompt_secret("Password")
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Attach the profile name to login failures.
    pub fn auth_error(&self, err: atlasom_core::CoreError) -> CliError {
        match CliError::from(err) {
            CliError::AuthFailed { message, .. } => CliError::AuthFailed {
                message,
                profile: self.target.profile_name.clone(),
            },
            other => other,
        }
    }

    pub fn color(&self) -> bool {
        output::should_color(&self.global.color)
    }

    pub fn quiet(&self) -> bool {
        self.global.quiet
    }

    /// Print a rendered result.
    pub fn print(&self, rendered: &str) {
        output::print_output(rendered, self.global.quiet);
    }

    /// Report a completed change on stderr.
    pub fn done(&self, message: &str) {
        if !self.global.quiet {
            eprintln!("{message}");
        }
    }
}

/// Dispatch an appliance-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, app: &App<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Login(ref args) => return auth::login(app, args).await,
        Command::Logout => return auth::logout(app).await,
        Command::Whoami => return auth::whoami(app),
        _ => app.ensure_login().await?,
    }

    match cmd {
        Command::System(args) => system::handle(app, args).await,
        Command::Hardware(args) => hardware::handle(app, args).await,
        Command::Network(args) => network::handle(app, args).await,
        Command::Storage(args) => storage::handle(app, args).await,
        Command::Security(args) => security::handle(app, args).await,
        Command::Firmware(args) => firmware::handle(app, args).await,
        Command::Logs(args) => logs::handle(app, args).await,
        Command::Alarms(args) => alarms::handle(app, args).await,
        // Session commands return above; Config and Completions never connect.
        Command::Login(_)
        | Command::Logout
        | Command::Whoami
        | Command::Config(_)
        | Command::Completions(_) => unreachable!("handled before dispatch"),
    }
}
