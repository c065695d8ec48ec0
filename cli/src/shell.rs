use std::io::{BufRead, Write};

use fcb_core::error::AppError;

use crate::app_state::AppState;
use crate::{check_failed_message, view};

pub const PROMPT: &str = "claim> ";

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Claim(String),
    History,
    /// One-based history position, as shown in labels.
    Show(usize),
    Clear,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_line(line: &str) -> ShellCommand {
    let line = line.trim();
    if line.is_empty() {
        return ShellCommand::Empty;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return ShellCommand::Claim(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("history"), None) => ShellCommand::History,
        (Some("show"), Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => ShellCommand::Show(n),
            _ => ShellCommand::Unknown(line.to_string()),
        },
        (Some("clear"), None) => ShellCommand::Clear,
        (Some("help"), None) => ShellCommand::Help,
        (Some("quit") | Some("q") | Some("exit"), None) => ShellCommand::Quit,
        _ => ShellCommand::Unknown(line.to_string()),
    }
}

const HELP: &str = "Type a claim to fact-check it.\n\
:history    list previous fact-checks\n\
:show N     show fact-check N in full\n\
:clear      delete all stored fact-checks\n\
:quit       leave\n";

fn io_err(e: std::io::Error) -> AppError {
    AppError::new("CLI_IO_FAILED", "Terminal I/O failed").with_details(e.to_string())
}

/// Read claims and commands until `:quit` or end of input. Pipeline failures are
/// reported inline and the session continues.
pub fn run<R: BufRead, W: Write>(app: &mut AppState, input: R, mut out: W) -> Result<(), AppError> {
    writeln!(out, "Fact-check bot. Type :help for commands.").map_err(io_err)?;
    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}").map_err(io_err)?;
        out.flush().map_err(io_err)?;

        let line = match lines.next() {
            Some(line) => line.map_err(io_err)?,
            None => break,
        };

        match parse_line(&line) {
            ShellCommand::Empty => {}
            ShellCommand::Quit => break,
            ShellCommand::Help => write!(out, "{HELP}").map_err(io_err)?,
            ShellCommand::History => write!(out, "{}", view::render_history(app.history())).map_err(io_err)?,
            ShellCommand::Show(n) => match app.select(n - 1) {
                Ok(result) => write!(out, "{}", view::render_detail(result)).map_err(io_err)?,
                Err(e) => writeln!(out, "{e}").map_err(io_err)?,
            },
            ShellCommand::Clear => match app.clear_history() {
                Ok(removed) => writeln!(out, "Cleared {removed} fact-check(s).").map_err(io_err)?,
                Err(e) => writeln!(out, "{e}").map_err(io_err)?,
            },
            ShellCommand::Unknown(cmd) => {
                writeln!(out, "Unknown command: {cmd} (try :help)").map_err(io_err)?
            }
            ShellCommand::Claim(claim) => {
                writeln!(out, "Analyzing claim...").map_err(io_err)?;
                match app.submit_claim(&claim) {
                    Ok(result) => write!(out, "{}", view::render_detail(result)).map_err(io_err)?,
                    // A broken configuration will not fix itself on the next claim.
                    Err(e) if e.is_config() => return Err(e),
                    Err(e) => {
                        tracing::error!(error = %e, "fact-check failed");
                        writeln!(out, "{}", check_failed_message(&e)).map_err(io_err)?;
                    }
                }
            }
        }
    }
    Ok(())
}
