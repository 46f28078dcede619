//! Inject command implementation.
//!
//! Runs the whole pipeline: source markdown to YAML fragment, then every
//! target template in turn. A failure on one target is logged and recorded
//! in the summary; the remaining targets are still processed.

use anyhow::{Context, Result};
use mcp_catalog::{Diagnostic, RenderOptions};
use mcp_core::PlaceholderValues;
use mcp_core::cli::{ExitCode, OutputFormat};
use mcp_inject::{FileReport, Injector};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use super::common::{self, SourcePaths};
use crate::cli::InjectArgs;

/// Per-target result.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetResult {
    /// The file was processed (possibly skipped).
    Processed(FileReport),
    /// The file could not be processed.
    Failed {
        /// Target path
        path: PathBuf,
        /// Error message
        error: String,
    },
}

impl TargetResult {
    /// Target path.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Processed(report) => &report.path,
            Self::Failed { path, .. } => path,
        }
    }
}

/// Summary of one `inject` run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Workspace directory
    pub workspace: PathBuf,
    /// Source markdown document
    pub source: PathBuf,
    /// Whether the source document exists
    pub source_found: bool,
    /// Servers recovered from the source
    pub servers: usize,
    /// Tools recovered from the source
    pub tools: usize,
    /// Tools dropped because their input schema could not be read
    pub dropped_tools: usize,
    /// Whether a fragment was available for injection
    pub fragment_generated: bool,
    /// Parser findings
    pub diagnostics: Vec<Diagnostic>,
    /// Directory searched for targets
    pub target_dir: PathBuf,
    /// Whether writes were suppressed
    pub dry_run: bool,
    /// Per-target results in processing order
    pub targets: Vec<TargetResult>,
}

impl RunSummary {
    /// Targets where the fragment was injected.
    #[must_use]
    pub fn injected(&self) -> usize {
        self.reports().filter(|r| !r.outcome.is_skip()).count()
    }

    /// Targets whose marker site was skipped.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.reports().filter(|r| r.outcome.is_skip()).count()
    }

    /// Targets rewritten on disk.
    #[must_use]
    pub fn written(&self) -> usize {
        self.reports().filter(|r| r.written).count()
    }

    /// Targets that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.targets
            .iter()
            .filter(|t| matches!(t, TargetResult::Failed { .. }))
            .count()
    }

    fn reports(&self) -> impl Iterator<Item = &FileReport> {
        self.targets.iter().filter_map(|t| match t {
            TargetResult::Processed(report) => Some(report),
            TargetResult::Failed { .. } => None,
        })
    }
}

/// Runs the inject command.
///
/// Returns [`ExitCode::ERROR`] when the target directory is missing, and
/// [`ExitCode::SUCCESS`] otherwise, including when individual targets fail.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the workspace
/// cannot be resolved, or the summary cannot be formatted.
pub fn run(
    args: InjectArgs,
    config_path: Option<&Path>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let config = common::load_config(config_path)?;
    let paths = SourcePaths::resolve(&args.source, &config)?;
    let target_dir = config.target_dir(&paths.workspace);

    info!("Workspace: {}", paths.workspace.display());
    info!("Source markdown: {}", paths.source.display());
    info!("Target directory: {}", target_dir.display());

    let outcome = common::generate_fragment(
        &paths.source,
        &config,
        &RenderOptions::from(&config.render),
    );

    let targets = match common::find_targets(&target_dir, &config.inject.file_prefix) {
        Ok(targets) => targets,
        Err(e) if e.is_fatal_precondition() => {
            error!("{e}");
            return Ok(ExitCode::ERROR);
        }
        Err(e) => return Err(e).context("failed to list target files"),
    };

    if targets.is_empty() {
        warn!(
            "No '{}*' files found in {}",
            config.inject.file_prefix,
            target_dir.display()
        );
    }

    let values = PlaceholderValues {
        os: Some(args.os),
        shell: Some(args.shell),
        home: args
            .home
            .or_else(|| dirs::home_dir().map(|p| p.display().to_string())),
        workspace: Some(paths.workspace.display().to_string()),
    };
    let injector = Injector::new(&config.inject, values.substitutions(&config.placeholders))
        .context("failed to prepare injector")?
        .expand_escapes(config.render.escape_backslashes)
        .dry_run(args.dry_run);

    let results = targets
        .iter()
        .map(|target| process_target(&injector, target, outcome.fragment.as_deref()))
        .collect();

    let summary = RunSummary {
        source_found: outcome.source_found,
        servers: outcome.server_count(),
        tools: outcome.tool_count(),
        dropped_tools: outcome.dropped_tool_count(),
        fragment_generated: outcome.fragment.is_some(),
        diagnostics: outcome.report.map(|r| r.diagnostics).unwrap_or_default(),
        workspace: paths.workspace,
        source: paths.source,
        target_dir,
        dry_run: args.dry_run,
        targets: results,
    };

    info!(
        "Processing complete: {} injected, {} skipped, {} failed",
        summary.injected(),
        summary.skipped(),
        summary.failed()
    );

    let formatted = crate::formatters::format_run_summary(&summary, output_format)
        .context("failed to format run summary")?;
    println!("{formatted}");

    Ok(ExitCode::SUCCESS)
}

fn process_target(injector: &Injector, path: &Path, fragment: Option<&str>) -> TargetResult {
    info!("Processing {}", path.display());
    match injector.process_file(path, fragment) {
        Ok(report) => TargetResult::Processed(report),
        Err(e) => {
            error!("Error processing {}: {e}", path.display());
            TargetResult::Failed {
                path: path.to_path_buf(),
                error: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_inject::{InjectionOutcome, InjectionSite};

    fn report(name: &str, outcome: InjectionOutcome, written: bool) -> TargetResult {
        TargetResult::Processed(FileReport {
            path: PathBuf::from(name),
            outcome,
            site: Some(InjectionSite::Placeholder),
            placeholders_replaced: 0,
            changed: written,
            written,
            had_bom: false,
        })
    }

    fn summary(targets: Vec<TargetResult>) -> RunSummary {
        RunSummary {
            workspace: PathBuf::from("/w"),
            source: PathBuf::from("/w/system_prompt.md"),
            source_found: true,
            servers: 2,
            tools: 5,
            dropped_tools: 0,
            fragment_generated: true,
            diagnostics: Vec::new(),
            target_dir: PathBuf::from("/w/.roo"),
            dry_run: false,
            targets,
        }
    }

    #[test]
    fn test_summary_counts() {
        let summary = summary(vec![
            report("a", InjectionOutcome::Injected, true),
            report("b", InjectionOutcome::Injected, false),
            report("c", InjectionOutcome::SkippedNoSite, false),
            TargetResult::Failed {
                path: PathBuf::from("d"),
                error: "denied".to_string(),
            },
        ]);
        assert_eq!(summary.injected(), 2);
        assert_eq!(summary.written(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.targets[3].path(), Path::new("d"));
    }

    #[test]
    fn test_summary_serializes_status_tag() {
        let summary = summary(vec![TargetResult::Failed {
            path: PathBuf::from("d"),
            error: "denied".to_string(),
        }]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["targets"][0]["status"], "failed");
        assert_eq!(json["targets"][0]["error"], "denied");
    }
}
