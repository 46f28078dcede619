//! Non-fatal findings produced while parsing a catalog.
//!
//! Parsing never fails outright. Every deviation from the expected document
//! shape becomes a `Diagnostic` and the parser keeps whatever it could
//! recover.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Something was skipped or recovered from
    Warning,
    /// The document could not be interpreted at all
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// A problem found while extracting servers from markdown.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The start delimiter is absent; nothing was extracted.
    #[error("start delimiter not found in source markdown, cannot extract server section")]
    StartDelimiterMissing,

    /// The end delimiter is absent; the section runs to end of document.
    #[error("end delimiter '{delimiter}' not found after start delimiter, processing until end of content")]
    EndDelimiterMissing {
        /// The delimiter, trimmed for display
        delimiter: String,
    },

    /// The section has text but no `## name (command)` headings.
    #[error("no servers found matching '## name (command)' within the extracted section")]
    NoServerHeadings,

    /// A tool's schema text is not valid JSON; the tool was dropped.
    #[error("JSON parse error for tool '{tool}' in server '{server}': {message}")]
    SchemaParse {
        /// Server name
        server: String,
        /// Tool name
        tool: String,
        /// Parser message
        message: String,
    },

    /// A tool's `Input Schema:` has no balanced JSON object; the tool was
    /// dropped.
    #[error("could not extract balanced JSON schema for tool '{tool}' in server '{server}'")]
    SchemaUnbalanced {
        /// Server name
        server: String,
        /// Tool name
        tool: String,
    },

    /// A `Direct Resources` list is present but no entry could be parsed.
    #[error("found 'Direct Resources' section for server '{server}' but could not parse entries")]
    MalformedResources {
        /// Server name
        server: String,
    },
}

impl Diagnostic {
    /// Severity of this diagnostic.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::StartDelimiterMissing => Severity::Error,
            _ => Severity::Warning,
        }
    }

    /// Returns `true` if a tool was dropped because of this diagnostic.
    #[must_use]
    pub const fn drops_tool(&self) -> bool {
        matches!(
            self,
            Self::SchemaParse { .. } | Self::SchemaUnbalanced { .. }
        )
    }

    /// Emits this diagnostic through `tracing` at its severity.
    pub fn log(&self) {
        match self.severity() {
            Severity::Error => tracing::error!("{self}"),
            Severity::Warning => tracing::warn!("{self}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity() {
        assert_eq!(Diagnostic::StartDelimiterMissing.severity(), Severity::Error);
        assert_eq!(Diagnostic::NoServerHeadings.severity(), Severity::Warning);
        assert!(Severity::Error > Severity::Warning);
    }

    #[test]
    fn test_display_names_tool_and_server() {
        let diag = Diagnostic::SchemaParse {
            server: "files".to_string(),
            tool: "read_file".to_string(),
            message: "EOF while parsing".to_string(),
        };
        let text = diag.to_string();
        assert!(text.contains("'read_file'"));
        assert!(text.contains("'files'"));
        assert!(diag.drops_tool());
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let diag = Diagnostic::MalformedResources {
            server: "weather".to_string(),
        };
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["kind"], "malformed_resources");
        assert_eq!(json["server"], "weather");
    }
}
