mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::io::IsTerminal;

use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, ColorMode, Command, GlobalOpts, OutputFormat};
use crate::commands::App;
use crate::config::Config;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let matches = Cli::command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli, &matches).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Output and color fall back to `[defaults]` when not given on the command
/// line or in the environment.
fn apply_defaults(global: &mut GlobalOpts, matches: &ArgMatches, cfg: &Config) {
    let defaulted = |id: &str| matches.value_source(id) == Some(ValueSource::DefaultValue);
    if defaulted("output") {
        if let Ok(format) = OutputFormat::from_str(&cfg.defaults.output, true) {
            global.output = format;
        }
    }
    if defaulted("color") {
        if let Ok(color) = ColorMode::from_str(&cfg.defaults.color, true) {
            global.color = color;
        }
    }
}

async fn run(mut cli: Cli, matches: &ArgMatches) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't contact the appliance
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "atlasom", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let cfg = config::load_config_or_default();
            apply_defaults(&mut cli.global, matches, &cfg);
            let app = App::connect(&cli.global, &cfg)?;

            let stop = CancellationToken::new();
            let spinner = (!cli.global.quiet && std::io::stderr().is_terminal()).then(|| {
                commands::util::follow_loading(
                    app.console.client().loading().subscribe(),
                    stop.clone(),
                )
            });

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &app).await;

            stop.cancel();
            if let Some(handle) = spinner {
                let _ = handle.await;
            }

            // The session file follows the outcome, expired sessions included.
            let persisted = app.persist();
            result.and(persisted)
        }
    }
}
