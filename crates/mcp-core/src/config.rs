//! Configuration for MCP prompt sync.
//!
//! Configuration is stored in TOML format. Every section is optional and
//! falls back to the defaults below, which match the layout of the
//! `system_prompt.md` source and the `.roo/system-prompt-*` templates.
//!
//! Default location:
//! - Linux: `~/.config/mcp-prompt-sync/config.toml`
//! - macOS: `~/Library/Application Support/mcp-prompt-sync/config.toml`
//! - Windows: `%APPDATA%\mcp-prompt-sync\config.toml`
//!
//! # Examples
//!
//! ```
//! use mcp_core::SyncConfig;
//!
//! let config: SyncConfig = toml::from_str(
//!     r#"
//! [inject]
//! target_dir = "prompts"
//! "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.inject.target_dir, "prompts");
//! assert_eq!(config.inject.file_prefix, "system-prompt-");
//! assert!(config.validate().is_ok());
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration file name inside the per-user config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Sentence that precedes the server list in the source markdown.
///
/// The section boundary is tied to this exact natural-language text,
/// including the surrounding blank lines. Override it in `[source.delimiters]`
/// when the source document is reworded.
pub const DEFAULT_START_DELIMITER: &str = "\n\nWhen a server is connected, you can use the server's tools via the `use_mcp_tool` tool, and access the server's resources via the `access_mcp_resource` tool.\n\n";

/// Heading that follows the server list in the source markdown.
pub const DEFAULT_END_DELIMITER: &str = "\n## Creating an MCP Server";

/// First line of an injected block.
pub const DEFAULT_START_MARKER: &str = "# MCP Server list injected by script";

/// Last line of an injected block.
pub const DEFAULT_END_MARKER: &str = "# End MCP Server list";

/// Token on a `# ...` comment line marking where the first injection goes.
pub const DEFAULT_PLACEHOLDER_MARKER: &str = "[CONNECTED_MCP_SERVERS]";

const APP_DIR_NAME: &str = "mcp-prompt-sync";

/// Complete configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SyncConfig {
    /// Source document settings
    #[serde(default)]
    pub source: SourceConfig,

    /// YAML rendering settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Target file settings
    #[serde(default)]
    pub inject: InjectConfig,

    /// Placeholder token names
    #[serde(default)]
    pub placeholders: PlaceholderConfig,
}

/// Source document settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceConfig {
    /// Markdown file name, relative to the workspace
    pub file_name: String,

    /// Section boundaries
    pub delimiters: Delimiters,
}

/// Literal strings bounding the server section of the source document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Delimiters {
    /// Text immediately before the section
    pub start: String,

    /// Text immediately after the section
    pub end: String,
}

/// YAML rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Spaces prefixed to every fragment line
    pub base_indent: usize,

    /// Double every backslash so the fragment survives replacement expansion
    pub escape_backslashes: bool,
}

/// Target file settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InjectConfig {
    /// Directory holding the targets, relative to the workspace
    pub target_dir: String,

    /// File name prefix selecting targets
    pub file_prefix: String,

    /// Injection site markers
    pub markers: Markers,
}

/// Markers delimiting the injection site inside a target file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Markers {
    /// First line of an injected block
    pub start: String,

    /// Last line of an injected block
    pub end: String,

    /// Token on the placeholder comment line
    pub placeholder: String,
}

/// Placeholder tokens replaced verbatim in every target file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlaceholderConfig {
    /// Operating system token
    pub os: String,

    /// Default shell token
    pub shell: String,

    /// Home directory token
    pub home: String,

    /// Workspace directory token
    pub workspace: String,
}

/// Values substituted for the placeholder tokens.
///
/// Missing or empty values fall back to an `Unknown ...` label so a token is
/// never left in a target file.
///
/// # Examples
///
/// ```
/// use mcp_core::{PlaceholderConfig, PlaceholderValues};
///
/// let values = PlaceholderValues {
///     os: Some("Linux".to_string()),
///     shell: Some(String::new()),
///     ..Default::default()
/// };
/// let pairs = values.substitutions(&PlaceholderConfig::default());
///
/// assert_eq!(pairs[0], ("[OS_PLACEHOLDER]".to_string(), "Linux".to_string()));
/// assert_eq!(pairs[1].1, "Unknown Shell");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderValues {
    /// Operating system name
    pub os: Option<String>,
    /// Default shell
    pub shell: Option<String>,
    /// Home directory path
    pub home: Option<String>,
    /// Workspace directory path
    pub workspace: Option<String>,
}

impl PlaceholderValues {
    /// Pairs each configured token with its value, in a fixed order.
    #[must_use]
    pub fn substitutions(&self, tokens: &PlaceholderConfig) -> Vec<(String, String)> {
        let pick = |value: &Option<String>, fallback: &str| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };

        vec![
            (tokens.os.clone(), pick(&self.os, "Unknown OS")),
            (tokens.shell.clone(), pick(&self.shell, "Unknown Shell")),
            (tokens.home.clone(), pick(&self.home, "Unknown Home")),
            (tokens.workspace.clone(), pick(&self.workspace, "Unknown Workspace")),
        ]
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            file_name: "system_prompt.md".to_string(),
            delimiters: Delimiters::default(),
        }
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_DELIMITER.to_string(),
            end: DEFAULT_END_DELIMITER.to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            base_indent: 4,
            escape_backslashes: true,
        }
    }
}

impl Default for InjectConfig {
    fn default() -> Self {
        Self {
            target_dir: ".roo".to_string(),
            file_prefix: "system-prompt-".to_string(),
            markers: Markers::default(),
        }
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_MARKER.to_string(),
            end: DEFAULT_END_MARKER.to_string(),
            placeholder: DEFAULT_PLACEHOLDER_MARKER.to_string(),
        }
    }
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            os: "[OS_PLACEHOLDER]".to_string(),
            shell: "[SHELL_PLACEHOLDER]".to_string(),
            home: "[HOME_PLACEHOLDER]".to_string(),
            workspace: "[WORKSPACE_PLACEHOLDER]".to_string(),
        }
    }
}

impl SyncConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if a delimiter, marker, token, or the
    /// file prefix is empty, or if the block markers are identical.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("source.file_name", &self.source.file_name),
            ("source.delimiters.start", &self.source.delimiters.start),
            ("source.delimiters.end", &self.source.delimiters.end),
            ("inject.target_dir", &self.inject.target_dir),
            ("inject.file_prefix", &self.inject.file_prefix),
            ("inject.markers.start", &self.inject.markers.start),
            ("inject.markers.end", &self.inject.markers.end),
            ("inject.markers.placeholder", &self.inject.markers.placeholder),
            ("placeholders.os", &self.placeholders.os),
            ("placeholders.shell", &self.placeholders.shell),
            ("placeholders.home", &self.placeholders.home),
            ("placeholders.workspace", &self.placeholders.workspace),
        ];

        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(Error::ConfigError {
                    message: format!("{key} cannot be empty"),
                });
            }
        }

        for (key, value) in [
            ("inject.markers.start", &self.inject.markers.start),
            ("inject.markers.end", &self.inject.markers.end),
            ("inject.markers.placeholder", &self.inject.markers.placeholder),
        ] {
            if value.contains('\n') {
                return Err(Error::ConfigError {
                    message: format!("{key} must be a single line"),
                });
            }
        }

        if self.inject.markers.start.trim() == self.inject.markers.end.trim() {
            return Err(Error::ConfigError {
                message: "inject.markers.start and inject.markers.end must differ".to_string(),
            });
        }

        Ok(())
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML for
    /// this schema, or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;

        config.validate()?;
        debug!("Loaded config from {}", path.display());

        Ok(config)
    }

    /// Loads configuration from an explicit path, else from the default
    /// location if a file exists there, else returns defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or any file found
    /// fails to load.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => {
                debug!("Config file not found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Source markdown path inside `workspace`.
    #[must_use]
    pub fn source_path(&self, workspace: &Path) -> PathBuf {
        workspace.join(&self.source.file_name)
    }

    /// Target directory inside `workspace`.
    #[must_use]
    pub fn target_dir(&self, workspace: &Path) -> PathBuf {
        workspace.join(&self.inject.target_dir)
    }
}

/// Gets the default configuration file path, if the platform has a config
/// directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}
