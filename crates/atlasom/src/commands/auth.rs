//! Session commands: login, logout, whoami.

use serde::Serialize;

use crate::cli::LoginArgs;
use crate::error::CliError;
use crate::output;

use super::{App, util};

#[derive(Serialize)]
struct WhoAmI {
    profile: String,
    endpoint: String,
    logged_in: bool,
    session_id: Option<String>,
    locale: String,
    model: Option<String>,
    lte: bool,
    ai_processor: bool,
}

pub async fn login(app: &App<'_>, args: &LoginArgs) -> Result<(), CliError> {
    let username = app.username()?;
    let password = if args.password_stdin {
        util::read_secret_stdin()?
    } else {
        app.password()?
    };

    // A stale token would be replaced anyway; drop it so nothing is sent with it.
    if app.console.is_logged_in() {
        app.console.session().clear();
    }

    let summary = app
        .console
        .login(&username, password)
        .await
        .map_err(|e| app.auth_error(e))?;

    let model = summary
        .model
        .as_ref()
        .map_or_else(|| "unknown model".to_owned(), ToString::to_string);
    app.done(&format!(
        "Logged in to {} as {} ({model})",
        app.target.console.url, summary.user
    ));
    Ok(())
}

pub async fn logout(app: &App<'_>) -> Result<(), CliError> {
    if !app.console.is_logged_in() {
        app.done("Not logged in");
        return Ok(());
    }
    // The local session is gone even when the appliance refuses.
    if let Err(e) = app.console.logout().await {
        tracing::warn!(error = %e, "appliance did not confirm logout");
    }
    app.done("Logged out");
    Ok(())
}

pub fn whoami(app: &App<'_>) -> Result<(), CliError> {
    let session = app.console.session();
    let capabilities = app.console.capabilities();
    let info = WhoAmI {
        profile: app.target.profile_name.clone(),
        endpoint: app.target.console.url.to_string(),
        logged_in: app.console.is_logged_in(),
        session_id: session.session_id(),
        locale: app.console.locale().to_string(),
        model: session.model(),
        lte: capabilities.lte,
        ai_processor: capabilities.ai_processor,
    };

    let color = app.color();
    let rendered = output::render_single(
        &app.global.output,
        &info,
        |i| {
            let state = if i.logged_in { "connected" } else { "disconnected" };
            output::detail_table(&[
                ("Profile", i.profile.clone()),
                ("Endpoint", i.endpoint.clone()),
                ("Session", output::paint_state(state, color)),
                ("Session ID", output::opt(i.session_id.as_deref())),
                ("Language", i.locale.clone()),
                ("Model", output::opt(i.model.as_deref())),
                ("LTE", yes_no(i.lte)),
                ("AI processor", yes_no(i.ai_processor)),
            ])
        },
        |i| i.profile.clone(),
    );
    app.print(&rendered);
    Ok(())
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.into()
}
