//! Output formatters for CLI commands.
//!
//! Every command prints through these functions so the three output modes
//! stay consistent: `json` for machines, `text` for scripts (one record per
//! line), `pretty` for people.

use anyhow::Result;
use colored::Colorize;
use mcp_catalog::{Diagnostic, Severity};
use mcp_core::cli::OutputFormat;
use mcp_inject::InjectionOutcome;
use serde::Serialize;

use crate::commands::inject::{RunSummary, TargetResult};

/// Format data according to the specified output format.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Examples
///
/// ```
/// use mcp_core::cli::OutputFormat;
/// use mcp_prompt_cli::formatters::format_output;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Counts {
///     servers: usize,
/// }
///
/// let output = format_output(&Counts { servers: 3 }, OutputFormat::Json)?;
/// assert!(output.contains("\"servers\": 3"));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Text => Ok(serde_json::to_string(data)?),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// Formats the summary of an `inject` run.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_run_summary(summary: &RunSummary, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => format_output(summary, format),
        OutputFormat::Text => Ok(text::summary(summary)),
        OutputFormat::Pretty => Ok(pretty::summary(summary)),
    }
}

fn status_label(target: &TargetResult) -> &'static str {
    match target {
        TargetResult::Failed { .. } => "failed",
        TargetResult::Processed(report) => match report.outcome {
            InjectionOutcome::Injected if report.changed => "updated",
            InjectionOutcome::Injected => "unchanged",
            InjectionOutcome::SkippedNoContent => "skipped-no-content",
            InjectionOutcome::SkippedNoSite => "skipped-no-site",
        },
    }
}

fn diagnostic_label(diagnostic: &Diagnostic) -> colored::ColoredString {
    let label = format!("{}:", diagnostic.severity());
    match diagnostic.severity() {
        Severity::Error => label.red().bold(),
        Severity::Warning => label.yellow(),
    }
}

/// Line-oriented output for scripts.
mod text {
    use super::{RunSummary, TargetResult, status_label};
    use std::fmt::Write as _;

    /// One `status<TAB>path` line per target, then a totals line.
    pub fn summary(summary: &RunSummary) -> String {
        let mut out = String::new();
        for target in &summary.targets {
            let _ = write!(out, "{}\t{}", status_label(target), target.path().display());
            if let TargetResult::Failed { error, .. } = target {
                let _ = write!(out, "\t{error}");
            }
            out.push('\n');
        }
        let _ = write!(
            out,
            "servers={} tools={} dropped_tools={} injected={} skipped={} failed={}",
            summary.servers,
            summary.tools,
            summary.dropped_tools,
            summary.injected(),
            summary.skipped(),
            summary.failed()
        );
        out
    }
}

/// Colorized output for terminals.
mod pretty {
    use super::{
        Colorize, Result, RunSummary, Serialize, TargetResult, diagnostic_label, status_label,
    };
    use serde_json::Value;
    use std::fmt::Write as _;

    /// Format any serializable value as an indented, colorized tree.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut out = String::new();
        write_value(&mut out, &value, 0);
        Ok(out.trim_end().to_string())
    }

    fn write_value(out: &mut String, value: &Value, depth: usize) {
        let pad = "  ".repeat(depth);
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    match child {
                        Value::Object(m) if !m.is_empty() => {
                            let _ = writeln!(out, "{pad}{}:", key.blue().bold());
                            write_value(out, child, depth + 1);
                        }
                        Value::Array(a) if !a.is_empty() => {
                            let _ = writeln!(out, "{pad}{}:", key.blue().bold());
                            write_value(out, child, depth + 1);
                        }
                        _ => {
                            let _ = writeln!(out, "{pad}{}: {}", key.blue().bold(), scalar(child));
                        }
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::Object(_) | Value::Array(_) => {
                            let _ = writeln!(out, "{pad}-");
                            write_value(out, item, depth + 1);
                        }
                        _ => {
                            let _ = writeln!(out, "{pad}- {}", scalar(item));
                        }
                    }
                }
            }
            other => {
                let _ = writeln!(out, "{pad}{}", scalar(other));
            }
        }
    }

    fn scalar(value: &Value) -> String {
        match value {
            Value::Null => "null".dimmed().to_string(),
            Value::Bool(b) => b.to_string().yellow().to_string(),
            Value::Number(n) => n.to_string().cyan().to_string(),
            Value::String(s) => s.green().to_string(),
            Value::Array(_) => "[]".dimmed().to_string(),
            Value::Object(_) => "{}".dimmed().to_string(),
        }
    }

    /// Human-readable run report.
    pub fn summary(summary: &RunSummary) -> String {
        let mut out = String::new();

        if summary.fragment_generated {
            let _ = writeln!(
                out,
                "{} {} server(s), {} tool(s) from {}",
                "✓".green(),
                summary.servers,
                summary.tools,
                summary.source.display()
            );
        } else if summary.source_found {
            let _ = writeln!(
                out,
                "{} No server list generated from {}",
                "!".yellow(),
                summary.source.display()
            );
        } else {
            let _ = writeln!(
                out,
                "{} Source not found: {}",
                "!".yellow(),
                summary.source.display()
            );
        }

        if summary.dropped_tools > 0 {
            let _ = writeln!(
                out,
                "{} {} tool(s) dropped for an unreadable input schema",
                "!".yellow(),
                summary.dropped_tools
            );
        }

        for diagnostic in &summary.diagnostics {
            let _ = writeln!(out, "  {} {diagnostic}", diagnostic_label(diagnostic));
        }

        if summary.dry_run {
            let _ = writeln!(out, "{}", "Dry run: no files were written".dimmed());
        }

        for target in &summary.targets {
            let label = status_label(target);
            let marker = match target {
                TargetResult::Failed { .. } => "✗".red(),
                TargetResult::Processed(report) if report.outcome.is_skip() => "-".yellow(),
                TargetResult::Processed(_) => "✓".green(),
            };
            let _ = write!(out, "{marker} {} ({label})", target.path().display());
            if let TargetResult::Failed { error, .. } = target {
                let _ = write!(out, ": {}", error.red());
            }
            out.push('\n');
        }

        let _ = write!(
            out,
            "{} injected, {} skipped, {} failed",
            summary.injected().to_string().green(),
            summary.skipped().to_string().yellow(),
            summary.failed().to_string().red()
        );
        out
    }
}
