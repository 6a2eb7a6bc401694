//! Log command handlers.

use serde::Serialize;
use tabled::Tabled;

use crate::cli::{LogsArgs, LogsCommand};
use crate::error::CliError;
use crate::output;

use super::{App, util};

#[derive(Clone, Serialize, Tabled)]
struct LogService {
    #[tabled(rename = "Log")]
    name: String,
}

pub async fn handle(app: &App<'_>, args: LogsArgs) -> Result<(), CliError> {
    let console = &app.console;

    match args.command {
        LogsCommand::List => {
            let services: Vec<LogService> = console
                .run(console.client().log_services())
                .await?
                .member_ids()
                .into_iter()
                .map(|name| LogService { name })
                .collect();
            let out = output::render_list(&app.global.output, &services, LogService::clone, |s| {
                s.name.clone()
            });
            app.print(&out);
        }

        LogsCommand::Collect { names, out } => {
            let archive = console.collect_logs(&names).await?;
            util::write_download(&out, &archive, app.quiet())?;
        }
    }
    Ok(())
}
