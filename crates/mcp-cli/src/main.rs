//! MCP Prompt Sync CLI.
//!
//! Keeps system prompt templates in step with the MCP servers documented in
//! a workspace's `system_prompt.md`.
//!
//! # Examples
//!
//! ```bash
//! # Inject the server list into every .roo/system-prompt-* template
//! mcp-prompt-sync inject --os Linux --shell /bin/bash --workspace ~/project
//!
//! # Print the YAML fragment only
//! mcp-prompt-sync render --raw
//! ```

use anyhow::Result;
use clap::Parser;
use mcp_core::cli::OutputFormat;
use mcp_prompt_cli::cli::Cli;
use mcp_prompt_cli::runner::{execute_command, init_logging};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let output_format = cli
        .format
        .parse::<OutputFormat>()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let exit_code = execute_command(cli.command, output_format, cli.config.as_deref())?;

    std::process::exit(exit_code.as_i32());
}
