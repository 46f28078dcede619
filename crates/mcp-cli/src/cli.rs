//! CLI argument definitions and parsing.
//!
//! Defines the command-line interface structure using clap:
//! - `Cli` - Main CLI entry point
//! - `Commands` - Available subcommands

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// MCP Prompt Sync - keep system prompt templates in step with connected MCP servers.
///
/// Reads the connected-server section of `system_prompt.md`, renders it as
/// YAML, and injects it into every `.roo/system-prompt-*` template.
#[derive(Parser, Debug)]
#[command(name = "mcp-prompt-sync")]
#[command(version, about, long_about = None)]
#[command(author = "MCP Prompt Sync Team")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    pub format: String,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the server list and inject it into prompt templates.
    ///
    /// Placeholders such as `[OS_PLACEHOLDER]` are substituted in every
    /// target, and the server list replaces either a previously injected
    /// block or a `# [CONNECTED_MCP_SERVERS]` line.
    ///
    /// # Examples
    ///
    /// ```bash
    /// mcp-prompt-sync inject --os Linux --shell /bin/bash --workspace ~/project
    ///
    /// # Preview without touching files
    /// mcp-prompt-sync inject --os Linux --shell bash --dry-run
    /// ```
    Inject(InjectArgs),

    /// Parse the source document and print the rendered YAML.
    ///
    /// # Examples
    ///
    /// ```bash
    /// mcp-prompt-sync render --workspace ~/project
    ///
    /// # Plain YAML document without indentation or escaping
    /// mcp-prompt-sync render --raw
    /// ```
    Render(RenderArgs),

    /// Generate shell completions.
    ///
    /// Generates completion scripts for various shells that can be
    /// sourced or saved to enable tab completion for this CLI.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Workspace and source document selection.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Workspace directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Source markdown (defaults to `<workspace>/system_prompt.md`)
    #[arg(long, value_name = "PATH")]
    pub source: Option<PathBuf>,
}

/// Arguments for `inject`.
#[derive(Args, Debug, Clone)]
pub struct InjectArgs {
    /// Operating system name substituted for `[OS_PLACEHOLDER]`
    #[arg(long)]
    pub os: String,

    /// Default shell substituted for `[SHELL_PLACEHOLDER]`
    #[arg(long)]
    pub shell: String,

    /// Home directory substituted for `[HOME_PLACEHOLDER]`
    /// (defaults to the current user's home)
    #[arg(long, value_name = "DIR")]
    pub home: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Report what would change without writing any file
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `render`.
#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print a plain YAML document: no base indentation, no backslash doubling
    #[arg(long)]
    pub raw: bool,
}
