//! Reading, updating and atomically rewriting target files.

use crate::engine::{InjectionOutcome, InjectionSite, Injector};
use crate::error::{InjectError, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// UTF-8 byte-order mark.
const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Outcome of processing one target file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Target path.
    pub path: PathBuf,

    /// Marker outcome.
    pub outcome: InjectionOutcome,

    /// Injection site found, if any.
    pub site: Option<InjectionSite>,

    /// Number of placeholder tokens substituted.
    pub placeholders_replaced: usize,

    /// Whether the content changed.
    pub changed: bool,

    /// Whether the file was rewritten. Always `false` in dry-run mode.
    pub written: bool,

    /// Whether the file started with a byte-order mark.
    pub had_bom: bool,
}

impl Injector {
    /// Applies the injector to one file on disk.
    ///
    /// The file is rewritten only when its content changed, and never in
    /// dry-run mode. A leading byte-order mark is ignored on read and is not
    /// written back.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not UTF-8, or cannot
    /// be written. Errors concern this file only.
    pub fn process_file(&self, path: &Path, fragment: Option<&str>) -> Result<FileReport> {
        let (content, had_bom) = read_target(path)?;
        let injection = self.apply(&content, fragment);

        match injection.outcome {
            InjectionOutcome::Injected => {
                debug!("Injection site in {}: {:?}", path.display(), injection.site);
            }
            InjectionOutcome::SkippedNoContent => warn!(
                "No server list available, leaving injection site in {} untouched",
                path.display()
            ),
            InjectionOutcome::SkippedNoSite => warn!(
                "No server list markers or placeholder found in {}",
                path.display()
            ),
        }

        let written = injection.changed && !self.is_dry_run();
        if written {
            write_atomic(path, &injection.content)?;
            info!("Updated {}", path.display());
        } else if injection.changed {
            info!("Would update {} (dry run)", path.display());
        } else {
            debug!("No changes for {}", path.display());
        }

        Ok(FileReport {
            path: path.to_path_buf(),
            outcome: injection.outcome,
            site: injection.site,
            placeholders_replaced: injection.placeholders_replaced,
            changed: injection.changed,
            written,
            had_bom,
        })
    }
}

/// Reads a file as UTF-8, dropping a leading byte-order mark.
///
/// Returns the text and whether a mark was present.
///
/// # Errors
///
/// Returns [`InjectError::Read`] on I/O failure and
/// [`InjectError::Encoding`] if the bytes are not UTF-8.
pub fn read_target(path: &Path) -> Result<(String, bool)> {
    let mut bytes = fs::read(path).map_err(|source| InjectError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let had_bom = bytes.starts_with(BOM);
    if had_bom {
        bytes.drain(..BOM.len());
    }

    let text = String::from_utf8(bytes).map_err(|source| InjectError::Encoding {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((text, had_bom))
}

/// Replaces a file's content atomically: write a hidden sibling, sync it,
/// then rename it over the target. An existing target's permissions carry
/// over to the new file.
///
/// # Errors
///
/// Returns [`InjectError::Write`] if any step fails; the temporary file is
/// removed in that case.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let temp_path = temp_sibling(path);

    replace_via(&temp_path, path, content).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        InjectError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn replace_via(temp_path: &Path, path: &Path, content: &str) -> std::io::Result<()> {
    let permissions = match fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e),
    };

    let mut file = fs::File::create(temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    drop(file);

    if let Some(permissions) = permissions {
        fs::set_permissions(temp_path, permissions)?;
    }
    fs::rename(temp_path, path)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "target".into(), |n| n.to_string_lossy());
    path.with_file_name(format!(".{name}.tmp"))
}
