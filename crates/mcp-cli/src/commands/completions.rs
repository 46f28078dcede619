//! Shell completion generation command.
//!
//! Generates shell completion scripts for bash, zsh, fish, and `PowerShell`.

use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use mcp_core::cli::ExitCode;
use std::io::{self, Write};
use tracing::debug;

/// Writes the completion script for `shell` to `out`.
///
/// # Examples
///
/// ```
/// use clap::Command;
/// use clap_complete::Shell;
/// use mcp_prompt_cli::commands::completions;
///
/// let mut cmd = Command::new("mcp-prompt-sync").subcommand(Command::new("inject"));
/// let mut buf = Vec::new();
/// completions::generate_completions(Shell::Bash, &mut cmd, &mut buf);
/// assert!(String::from_utf8(buf).unwrap().contains("mcp-prompt-sync"));
/// ```
pub fn generate_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    debug!("Generating {shell} completions");
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Runs the completions command, printing the script to stdout.
///
/// # Errors
///
/// Never fails; the `Result` keeps the signature uniform with the other
/// commands.
pub fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    generate_completions(shell, cmd, &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}
