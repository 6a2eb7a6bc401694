//! Shared helpers for command handlers.

use std::io::{IsTerminal, Read};
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so `--yes` is required.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Ask for a secret on the terminal.
pub fn prompt_secret(prompt: &str) -> Result<SecretString, CliError> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "cannot prompt without a terminal".into(),
        });
    }
    let value = rpassword::prompt_password(format!("{prompt}: ")).map_err(prompt_err)?;
    Ok(SecretString::from(value))
}

/// Read a secret from stdin, trailing newline removed.
pub fn read_secret_stdin() -> Result<SecretString, CliError> {
    let mut value = String::new();
    std::io::stdin().read_to_string(&mut value)?;
    Ok(SecretString::from(value.trim_end_matches(['\r', '\n']).to_owned()))
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::File {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Write a downloaded file and report where it went.
pub fn write_download(path: &Path, data: &[u8], quiet: bool) -> Result<(), CliError> {
    std::fs::write(path, data).map_err(|source| CliError::File {
        path: path.display().to_string(),
        source,
    })?;
    if !quiet {
        eprintln!(
            "Saved {} ({})",
            path.display(),
            bytesize::ByteSize(u64::try_from(data.len()).unwrap_or(u64::MAX))
        );
    }
    Ok(())
}

/// Print an appliance notice (partial success, weak certificate) to stderr.
pub fn notice(message: Option<&str>, quiet: bool) {
    if let Some(message) = message.filter(|_| !quiet) {
        eprintln!("Note: {message}");
    }
}

// ── Progress ────────────────────────────────────────────────────────

pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.blue} {msg}")
            .expect("static spinner template"),
    );
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Percent bar for appliance tasks.
pub fn create_task_bar(message: &str) -> ProgressBar {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
            .expect("static bar template")
            .progress_chars("=>-"),
    );
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Show a spinner whenever the loading tracker reports pending requests.
///
/// Runs until `stop` is cancelled, then clears the line.
pub fn follow_loading(mut loading: watch::Receiver<bool>, stop: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut spinner: Option<ProgressBar> = None;
        loop {
            let visible = *loading.borrow_and_update();
            if visible && spinner.is_none() {
                spinner = Some(create_spinner("Waiting for the appliance..."));
            } else if !visible {
                if let Some(pb) = spinner.take() {
                    pb.finish_and_clear();
                }
            }

            tokio::select! {
                () = stop.cancelled() => break,
                changed = loading.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
    })
}

/// Human-readable duration since `secs` seconds, e.g. "3days 4h 2m".
pub fn uptime(secs: u64) -> String {
    // Drop seconds for long uptimes.
    let secs = if secs >= 3600 { secs - secs % 60 } else { secs };
    humantime::format_duration(Duration::from_secs(secs)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_rounds_long_durations() {
        assert_eq!(uptime(59), "59s");
        assert_eq!(uptime(3_661), "1h 1m");
    }

    #[test]
    fn json_file_errors_are_validation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rules.json");
        std::fs::write(&path, "[{").expect("write");

        let result: Result<Vec<serde_json::Value>, _> = read_json_file(&path);
        assert!(matches!(result, Err(CliError::Validation { .. })));

        let missing: Result<Vec<serde_json::Value>, _> = read_json_file(&dir.path().join("x"));
        assert!(matches!(missing, Err(CliError::File { .. })));
    }

    #[tokio::test]
    async fn loading_follower_stops_on_cancel() {
        let (tx, rx) = watch::channel(false);
        let stop = CancellationToken::new();
        let handle = follow_loading(rx, stop.clone());
        tx.send(true).expect("receiver alive");
        tx.send(false).expect("receiver alive");
        stop.cancel();
        handle.await.expect("task joins");
    }
}
