//! GitHub Actions workflow commands.
//!
//! Annotations are only printed when `GITHUB_ACTIONS=true`; elsewhere the
//! message still goes through `tracing`.

use crate::utils::error::Result;
use std::fs::OpenOptions;
use std::io::Write;

fn running_in_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").map(|v| v == "true").unwrap_or(false)
}

pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

pub fn format_command(command: &str, message: &str) -> String {
    format!("::{}::{}", command, escape_data(message))
}

fn emit(command: &str, message: &str) {
    if running_in_actions() {
        println!("{}", format_command(command, message));
    }
}

pub fn notice(message: &str) {
    tracing::info!("{}", message);
    emit("notice", message);
}

pub fn warning(message: &str) {
    tracing::warn!("{}", message);
    emit("warning", message);
}

pub fn error(message: &str) {
    tracing::error!("{}", message);
    emit("error", message);
}

/// Appends an output to `$GITHUB_OUTPUT` when it is set.
pub fn set_output(name: &str, value: &str) -> Result<()> {
    let Ok(path) = std::env::var("GITHUB_OUTPUT") else {
        tracing::debug!("GITHUB_OUTPUT not set, skipping output {}", name);
        return Ok(());
    };
    write_output(&path, name, value)
}

/// Formats one `$GITHUB_OUTPUT` entry. The file is not a workflow command, so
/// values are written verbatim; multiline values use the heredoc form.
pub fn format_output(name: &str, value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return format!("{}={}\n", name, value);
    }

    let mut delimiter = "EOF".to_string();
    let mut n = 0;
    while value.lines().any(|line| line == delimiter) {
        n += 1;
        delimiter = format!("EOF_{}", n);
    }
    format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
}

pub fn write_output(path: &str, name: &str, value: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(format_output(name, value).as_bytes())?;
    Ok(())
}
