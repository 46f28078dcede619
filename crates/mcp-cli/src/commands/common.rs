//! Common utilities shared across CLI commands.
//!
//! Configuration loading, path resolution, fragment generation and target
//! discovery.

use anyhow::{Context, Result};
use mcp_catalog::{CatalogReport, RenderOptions, parse_catalog, render_catalog};
use mcp_core::SyncConfig;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::cli::SourceArgs;

/// Loads the configuration from `explicit`, the user config file, or
/// defaults. Loaded files are validated.
///
/// # Errors
///
/// Returns an error if an explicit file is missing, any file fails to parse,
/// or the configuration is invalid.
pub fn load_config(explicit: Option<&Path>) -> Result<SyncConfig> {
    let config = SyncConfig::load_or_default(explicit).context("failed to load configuration")?;
    debug!("Using target directory '{}'", config.inject.target_dir);
    Ok(config)
}

/// Resolved workspace and source document paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourcePaths {
    /// Workspace directory
    pub workspace: PathBuf,
    /// Source markdown document
    pub source: PathBuf,
}

impl SourcePaths {
    /// Resolves paths from arguments, falling back to the current directory
    /// and the configured source file name.
    ///
    /// # Errors
    ///
    /// Returns an error if no workspace is given and the current directory
    /// cannot be determined.
    pub fn resolve(args: &SourceArgs, config: &SyncConfig) -> Result<Self> {
        let workspace = match &args.workspace {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("failed to determine current directory")?,
        };
        let source = args
            .source
            .clone()
            .unwrap_or_else(|| config.source_path(&workspace));
        Ok(Self { workspace, source })
    }
}

/// Result of reading, parsing and rendering the source document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FragmentOutcome {
    /// Whether the source document exists.
    pub source_found: bool,

    /// Parse result, if the source could be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<CatalogReport>,

    /// Rendered fragment; `None` means injection sites are left untouched.
    #[serde(skip)]
    pub fragment: Option<String>,
}

impl FragmentOutcome {
    /// Number of servers recovered.
    #[must_use]
    pub fn server_count(&self) -> usize {
        self.report.as_ref().map_or(0, |r| r.catalog.len())
    }

    /// Number of tools recovered across all servers.
    #[must_use]
    pub fn tool_count(&self) -> usize {
        self.report.as_ref().map_or(0, |r| r.catalog.tool_count())
    }

    /// Number of tools dropped for an unreadable input schema.
    #[must_use]
    pub fn dropped_tool_count(&self) -> usize {
        self.report.as_ref().map_or(0, CatalogReport::dropped_tools)
    }
}

/// Reads and parses the source document, then renders the fragment.
///
/// Never fails: a missing or unreadable source, an unrecognized document, or
/// a rendering failure all yield `fragment == None` with a logged
/// explanation.
#[must_use]
pub fn generate_fragment(
    source: &Path,
    config: &SyncConfig,
    options: &RenderOptions,
) -> FragmentOutcome {
    if !source.is_file() {
        warn!(
            "Source markdown file not found at {}, skipping server list generation",
            source.display()
        );
        return FragmentOutcome::default();
    }

    info!("Reading source markdown: {}", source.display());
    let markdown = match mcp_inject::read_target(source) {
        Ok((text, _)) => text,
        Err(e) => {
            error!("Failed to read source markdown: {e}");
            return FragmentOutcome {
                source_found: true,
                ..FragmentOutcome::default()
            };
        }
    };

    let report = parse_catalog(&markdown, &config.source.delimiters);
    info!(
        "Found {} server(s) with {} tool(s)",
        report.catalog.len(),
        report.catalog.tool_count()
    );

    let fragment = if report.has_errors() {
        warn!("Source markdown not recognized, existing server lists will be left untouched");
        None
    } else {
        match render_catalog(&report.catalog, options) {
            Ok(yaml) => {
                debug!("Generated {} byte fragment", yaml.len());
                Some(yaml)
            }
            Err(e) => {
                error!("Failed to generate server list YAML: {e}");
                None
            }
        }
    };

    FragmentOutcome {
        source_found: true,
        report: Some(report),
        fragment,
    }
}

/// Lists regular files in `dir` whose names start with `prefix`, sorted by
/// path.
///
/// # Errors
///
/// Returns [`mcp_core::Error::TargetDirNotFound`] if `dir` is not a
/// directory and [`mcp_core::Error::Io`] if it cannot be listed.
pub fn find_targets(dir: &Path, prefix: &str) -> mcp_core::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(mcp_core::Error::TargetDirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let io_err = |source| mcp_core::Error::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut targets = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let matches_prefix = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(prefix));
        if matches_prefix && path.is_file() {
            targets.push(path);
        }
    }

    targets.sort();
    Ok(targets)
}
