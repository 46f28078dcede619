//! Render command implementation.
//!
//! Prints the YAML fragment that `inject` would write, without touching any
//! target file.

use anyhow::{Context, Result, bail};
use mcp_catalog::RenderOptions;
use mcp_core::cli::{ExitCode, OutputFormat};
use serde::Serialize;
use std::path::Path;

use super::common::{self, SourcePaths};
use crate::cli::RenderArgs;

/// JSON output of the render command.
#[derive(Debug, Serialize)]
struct RenderOutput<'a> {
    source: &'a Path,
    #[serde(flatten)]
    outcome: &'a common::FragmentOutcome,
    fragment: Option<&'a str>,
}

/// Render options for the command: configured, or plain YAML with `--raw`.
#[must_use]
pub fn render_options(args: &RenderArgs, config: &mcp_core::SyncConfig) -> RenderOptions {
    if args.raw {
        RenderOptions {
            base_indent: 0,
            escape_backslashes: false,
        }
    } else {
        RenderOptions::from(&config.render)
    }
}

/// Runs the render command.
///
/// In `json` format the parse report and fragment are printed together;
/// otherwise only the fragment is printed.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the source is
/// missing or unusable, or output formatting fails.
pub fn run(
    args: &RenderArgs,
    config_path: Option<&Path>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let config = common::load_config(config_path)?;
    let paths = SourcePaths::resolve(&args.source, &config)?;

    let outcome = common::generate_fragment(&paths.source, &config, &render_options(args, &config));
    if !outcome.source_found {
        bail!("source markdown not found: {}", paths.source.display());
    }

    if output_format == OutputFormat::Json {
        let output = RenderOutput {
            source: &paths.source,
            outcome: &outcome,
            fragment: outcome.fragment.as_deref(),
        };
        let formatted = crate::formatters::format_output(&output, output_format)
            .context("failed to format render output")?;
        println!("{formatted}");
        return Ok(ExitCode::SUCCESS);
    }

    match outcome.fragment {
        Some(fragment) => {
            println!("{fragment}");
            Ok(ExitCode::SUCCESS)
        }
        None => bail!(
            "no server list could be generated from {}",
            paths.source.display()
        ),
    }
}
