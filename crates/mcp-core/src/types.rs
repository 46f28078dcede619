//! Catalog records recovered from the server markdown.
//!
//! Field order in every record is significant: it is the key order of the
//! rendered YAML, which must be stable across runs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One tool exposed by a server.
///
/// # Examples
///
/// ```
/// use mcp_core::ToolRecord;
/// use serde_json::json;
///
/// let tool = ToolRecord::new("read_file", "Reads a file.", json!({"type": "object"}));
/// assert_eq!(tool.name, "read_file");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRecord {
    /// Tool identifier (letters, digits, `_`, `-`).
    pub name: String,

    /// Single-line description.
    pub description: String,

    /// JSON input schema, an empty object when the source gives none.
    pub input_schema: Value,
}

impl ToolRecord {
    /// Creates a tool record.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Creates a tool record with an empty object schema.
    #[must_use]
    pub fn without_schema(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, Value::Object(serde_json::Map::new()))
    }
}

/// A resource a server exposes directly by URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Resource URI.
    pub uri: String,

    /// Human-readable description.
    pub description: String,
}

impl ResourceRecord {
    /// Creates a resource record.
    #[must_use]
    pub fn new(uri: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            description: description.into(),
        }
    }
}

/// One server definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerRecord {
    /// Server name from the heading.
    pub name: String,

    /// Invocation command from the heading, without backticks.
    pub command: String,

    /// Description collapsed to one line, possibly empty.
    pub description: String,

    /// Tools in source order.
    pub tools: Vec<ToolRecord>,

    /// Direct resources in source order.
    pub resources: Vec<ResourceRecord>,
}

impl ServerRecord {
    /// Creates a server record with no tools or resources.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            description: description.into(),
            tools: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Looks up a tool by name.
    #[must_use]
    pub fn tool(&self, name: &str) -> Option<&ToolRecord> {
        self.tools.iter().find(|t| t.name == name)
    }
}

/// The ordered list of servers extracted from one document.
///
/// An empty catalog is a valid result and renders as `servers: []`.
///
/// # Examples
///
/// ```
/// use mcp_core::{Catalog, ServerRecord};
///
/// let catalog = Catalog::new(vec![ServerRecord::new("Reader", "cat", "Reads files.")]);
/// assert_eq!(catalog.len(), 1);
/// assert!(catalog.server("Reader").is_some());
/// assert!(Catalog::default().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Servers in document order.
    pub servers: Vec<ServerRecord>,
}

impl Catalog {
    /// Creates a catalog from parsed servers.
    #[must_use]
    pub const fn new(servers: Vec<ServerRecord>) -> Self {
        Self { servers }
    }

    /// Returns `true` if no servers were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Number of servers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Looks up a server by name.
    #[must_use]
    pub fn server(&self, name: &str) -> Option<&ServerRecord> {
        self.servers.iter().find(|s| s.name == name)
    }

    /// Total number of tools across all servers.
    #[must_use]
    pub fn tool_count(&self) -> usize {
        self.servers.iter().map(|s| s.tools.len()).sum()
    }
}
