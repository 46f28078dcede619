//! YAML fragment emitter.
//!
//! Serializes a [`Catalog`] with `serde_yaml`, then indents every line so the
//! fragment nests inside the target file, and doubles backslashes so it
//! survives replacement-template expansion.
//!
//! Record field order and the source key order of input schemas carry
//! through to the output, so identical input always renders to identical
//! bytes.

use mcp_core::{Catalog, RenderConfig};
use thiserror::Error;

/// Rendered when the catalog holds no servers.
pub const EMPTY_DOCUMENT: &str = "servers: []";

/// Errors producing a fragment.
#[derive(Debug, Error)]
pub enum EmitError {
    /// The catalog could not be serialized as YAML.
    #[error("failed to serialize catalog as YAML: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Formatting settings for [`render_catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces prefixed to every line of the fragment.
    pub base_indent: usize,

    /// Double every backslash in the final fragment.
    pub escape_backslashes: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            base_indent: 4,
            escape_backslashes: true,
        }
    }
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            base_indent: config.base_indent,
            escape_backslashes: config.escape_backslashes,
        }
    }
}

/// Renders the catalog as an indented YAML fragment.
///
/// An empty catalog renders as `servers: []` at the base indentation. The
/// result has no trailing newline.
///
/// # Errors
///
/// Returns [`EmitError::Serialize`] if `serde_yaml` rejects the records.
/// Callers should treat this as "no content produced".
///
/// # Examples
///
/// ```
/// use mcp_catalog::{render_catalog, RenderOptions};
/// use mcp_core::{Catalog, ServerRecord};
///
/// let options = RenderOptions::default();
/// assert_eq!(render_catalog(&Catalog::default(), &options).unwrap(), "    servers: []");
///
/// let catalog = Catalog::new(vec![ServerRecord::new("Reader", "cat", "Reads files.")]);
/// let yaml = render_catalog(&catalog, &options).unwrap();
/// assert_eq!(
///     yaml,
///     "    servers:\n    - name: Reader\n      command: cat\n      description: Reads files.\n      tools: []\n      resources: []"
/// );
/// ```
pub fn render_catalog(catalog: &Catalog, options: &RenderOptions) -> Result<String, EmitError> {
    let document = if catalog.is_empty() {
        EMPTY_DOCUMENT.to_string()
    } else {
        serde_yaml::to_string(catalog)?
    };

    let prefix = " ".repeat(options.base_indent);
    let fragment = document
        .trim_end_matches('\n')
        .lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(if options.escape_backslashes {
        fragment.replace('\\', "\\\\")
    } else {
        fragment
    })
}
