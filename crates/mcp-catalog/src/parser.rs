//! Server catalog parser.
//!
//! Recovers server definitions from the markdown section that lists connected
//! MCP servers:
//!
//! ```markdown
//! ## files (`npx -y @modelcontextprotocol/server-filesystem`)
//! Reads and writes files.
//!
//! ### Available Tools
//! - read_file: Read a file.
//!     Input Schema:
//!     {"type": "object", "properties": {"path": {"type": "string"}}}
//!
//! ### Direct Resources
//! - file:///logs/app.log (Application log): Latest log output
//! ```
//!
//! Each `## name (command)` heading starts a server block. Inside a block the
//! leading prose is the description, `### Available Tools` lists tools as
//! `- name: description` entries with an optional `Input Schema:` JSON
//! object, and `### Direct Resources` lists `- uri (description): ...` lines.

use crate::balanced::extract_balanced_json;
use crate::diagnostics::Diagnostic;
use crate::section::{locate_section, normalize_line_endings};
use mcp_core::{Catalog, Delimiters, ResourceRecord, ServerRecord, ToolRecord};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

/// Literal that separates a tool's description from its JSON schema.
pub const SCHEMA_MARKER: &str = "Input Schema:";

// Pre-compiled regexes (compiled once, reused)
static SERVER_HEADING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^##[ \t]*([^#\s][^\n]*?)[ \t]+\(([^\n]+?)\)[ \t]*$").expect("valid regex")
});
static BLOCK_END_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##\s").expect("valid regex"));
static SUBHEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*###").expect("valid regex"));
static TOOLS_HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)###[ \t]*available[ \t]+tools").expect("valid regex"));
static RESOURCES_HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)###[ \t]*direct[ \t]+resources").expect("valid regex"));
static TOOL_ENTRY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*-[ \t]+([\w-]+):").expect("valid regex"));
static RESOURCE_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\s*(.+?)\s+\((.*?)\):").expect("valid regex"));

/// One `## name (command)` heading and the text under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerBlock<'a> {
    /// Server name, trimmed.
    pub name: &'a str,

    /// Command, trimmed and with surrounding backticks removed.
    pub command: &'a str,

    /// Everything after the heading line up to the next `## ` line.
    pub body: &'a str,
}

/// Parse result: the recovered catalog plus everything that went wrong.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogReport {
    /// Servers that were recovered.
    pub catalog: Catalog,

    /// Findings in the order they were encountered.
    pub diagnostics: Vec<Diagnostic>,
}

impl CatalogReport {
    /// Returns `true` if the document could not be interpreted at all.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity() == crate::Severity::Error)
    }

    /// Number of tools dropped because of bad schemas.
    #[must_use]
    pub fn dropped_tools(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.drops_tool()).count()
    }
}

/// Extracts the server catalog from a markdown document.
///
/// Line endings are normalized and a leading byte-order mark is ignored.
/// This never fails: a missing start delimiter yields an empty catalog with
/// an error diagnostic, and every other problem drops only the affected
/// record. All diagnostics are also logged.
///
/// # Examples
///
/// ```
/// use mcp_catalog::parse_catalog;
/// use mcp_core::Delimiters;
///
/// let delimiters = Delimiters {
///     start: "<!-- servers -->\n".to_string(),
///     end: "<!-- end -->".to_string(),
/// };
/// let markdown = "<!-- servers -->\n## Reader (cat)\nReads files.\n<!-- end -->";
///
/// let report = parse_catalog(markdown, &delimiters);
/// assert!(report.diagnostics.is_empty());
/// assert_eq!(report.catalog.servers[0].name, "Reader");
/// assert_eq!(report.catalog.servers[0].description, "Reads files.");
/// ```
#[must_use]
pub fn parse_catalog(markdown: &str, delimiters: &Delimiters) -> CatalogReport {
    let markdown = markdown.strip_prefix('\u{feff}').unwrap_or(markdown);
    let text = normalize_line_endings(markdown);
    let mut diagnostics = Vec::new();

    let Ok(section) = locate_section(&text, delimiters) else {
        let report = CatalogReport {
            catalog: Catalog::default(),
            diagnostics: vec![Diagnostic::StartDelimiterMissing],
        };
        report.diagnostics.iter().for_each(Diagnostic::log);
        return report;
    };

    if !section.terminated {
        diagnostics.push(Diagnostic::EndDelimiterMissing {
            delimiter: delimiters.end.trim().to_string(),
        });
    }

    let blocks = split_server_blocks(section.body);
    debug!("Found {} server heading(s) in section", blocks.len());

    if blocks.is_empty() && !section.body.trim().is_empty() {
        diagnostics.push(Diagnostic::NoServerHeadings);
    }

    let servers = blocks
        .iter()
        .map(|block| parse_server_block(block, &mut diagnostics))
        .collect();

    diagnostics.iter().for_each(Diagnostic::log);

    CatalogReport {
        catalog: Catalog::new(servers),
        diagnostics,
    }
}

/// Splits a section into one block per `## name (command)` heading.
///
/// A block ends at the next line starting with `##` followed by whitespace,
/// whether or not that line is itself a server heading. Text before the
/// first heading is ignored.
///
/// # Examples
///
/// ```
/// use mcp_catalog::split_server_blocks;
///
/// let blocks = split_server_blocks("## a (`run-a`)\none\n\ntwo\n## b (run-b)\nthree");
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[0].command, "run-a");
/// assert_eq!(blocks[0].body, "one\n\ntwo\n");
/// assert_eq!(blocks[1].body, "three");
/// ```
#[must_use]
pub fn split_server_blocks(section: &str) -> Vec<ServerBlock<'_>> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some(caps) = SERVER_HEADING_REGEX.captures_at(section, pos) {
        let (Some(heading), Some(name), Some(command)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            break;
        };

        let mut body_start = heading.end();
        if section[body_start..].starts_with('\n') {
            body_start += 1;
        }

        let body_end = BLOCK_END_REGEX
            .find_at(section, body_start)
            .map_or(section.len(), |m| m.start());

        blocks.push(ServerBlock {
            name: name.as_str().trim(),
            command: command.as_str().trim().trim_matches('`'),
            body: &section[body_start..body_end],
        });

        pos = body_end;
    }

    blocks
}

/// Builds a server record from one block.
///
/// Problems with individual tools or resources are appended to
/// `diagnostics`; the affected entries are left out of the record.
pub fn parse_server_block(
    block: &ServerBlock<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> ServerRecord {
    let content = block.body.trim();

    let description_end = SUBHEADING_REGEX
        .find(content)
        .map_or(content.len(), |m| m.start());
    let description = collapse_lines(&content[..description_end]);

    let mut server = ServerRecord::new(block.name, block.command, description);

    if let Some(tools_text) = tools_section(content) {
        server.tools = parse_tools(tools_text, block.name, diagnostics);
    }

    if let Some(resources_text) = resources_section(content) {
        server.resources = parse_resources(resources_text);
        if server.resources.is_empty() && resources_text.starts_with('-') {
            diagnostics.push(Diagnostic::MalformedResources {
                server: block.name.to_string(),
            });
        }
    }

    debug!(
        "Parsed server '{}' with {} tool(s) and {} resource(s)",
        server.name,
        server.tools.len(),
        server.resources.len()
    );

    server
}

/// Text after `### Available Tools` up to `### Direct Resources` or the end.
fn tools_section(content: &str) -> Option<&str> {
    let heading = TOOLS_HEADING_REGEX.find(content)?;
    let rest = &content[heading.end()..];
    let end = RESOURCES_HEADING_REGEX
        .find(rest)
        .map_or(rest.len(), |m| m.start());
    Some(rest[..end].trim())
}

/// Text after `### Direct Resources` to the end of the block.
fn resources_section(content: &str) -> Option<&str> {
    let heading = RESOURCES_HEADING_REGEX.find(content)?;
    Some(content[heading.end()..].trim())
}

/// Parses `- name: ...` entries. Entries are delimited by the next line that
/// starts a `- identifier:` item, so dashes inside descriptions are kept.
fn parse_tools(text: &str, server: &str, diagnostics: &mut Vec<Diagnostic>) -> Vec<ToolRecord> {
    let entries: Vec<_> = TOOL_ENTRY_REGEX.captures_iter(text).collect();
    let mut tools = Vec::with_capacity(entries.len());

    for (i, caps) in entries.iter().enumerate() {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = entries
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |m| m.start());
        let name = name.as_str();
        let rest = text[whole.end()..end].trim();

        if let Some(tool) = parse_tool(name, rest, server, diagnostics) {
            tools.push(tool);
        }
    }

    tools
}

fn parse_tool(
    name: &str,
    rest: &str,
    server: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<ToolRecord> {
    let Some(marker) = rest.find(SCHEMA_MARKER) else {
        let description = collapse_lines(rest);
        return (!description.is_empty()).then(|| ToolRecord::without_schema(name, description));
    };

    let description = collapse_lines(&rest[..marker]);
    let schema_text = &rest[marker + SCHEMA_MARKER.len()..];

    let Some(json) = extract_balanced_json(schema_text) else {
        diagnostics.push(Diagnostic::SchemaUnbalanced {
            server: server.to_string(),
            tool: name.to_string(),
        });
        return None;
    };

    match serde_json::from_str(json) {
        Ok(schema) => Some(ToolRecord::new(name, description, schema)),
        Err(e) => {
            diagnostics.push(Diagnostic::SchemaParse {
                server: server.to_string(),
                tool: name.to_string(),
                message: e.to_string(),
            });
            None
        }
    }
}

fn parse_resources(text: &str) -> Vec<ResourceRecord> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| RESOURCE_LINE_REGEX.captures(line))
        .filter_map(|caps| {
            let uri = caps.get(1)?.as_str().trim();
            let description = caps.get(2)?.as_str().trim();
            Some(ResourceRecord::new(uri, description))
        })
        .collect()
}

/// Trims every line, drops blank ones, and joins the rest with single spaces.
fn collapse_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_block(body: &str) -> (ServerRecord, Vec<Diagnostic>) {
        let block = ServerBlock {
            name: "test",
            command: "test-cmd",
            body,
        };
        let mut diagnostics = Vec::new();
        let server = parse_server_block(&block, &mut diagnostics);
        (server, diagnostics)
    }

    fn test_delimiters() -> Delimiters {
        Delimiters {
            start: "\n\nSERVERS\n\n".to_string(),
            end: "\n## Creating an MCP Server".to_string(),
        }
    }

    // ========================================================================
    // Block splitting
    // ========================================================================

    #[test]
    fn test_split_single_block() {
        let blocks = split_server_blocks("## Reader (cat)\nReads files.\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name, "Reader");
        assert_eq!(blocks[0].command, "cat");
        assert_eq!(blocks[0].body, "Reads files.\n");
    }

    #[test]
    fn test_split_strips_backticks_and_whitespace() {
        let blocks = split_server_blocks("##   github   (`npx -y @mcp/server-github`)  \nbody");
        assert_eq!(blocks[0].name, "github");
        assert_eq!(blocks[0].command, "npx -y @mcp/server-github");
    }

    #[test]
    fn test_split_command_with_nested_parens() {
        let blocks = split_server_blocks("## eval (node -e (run))\n");
        assert_eq!(blocks[0].name, "eval");
        assert_eq!(blocks[0].command, "node -e (run)");
    }

    #[test]
    fn test_split_spans_blank_lines_and_subheadings() {
        let section = "## a (a)\n\nfirst\n\n### Available Tools\n- t: d\n\n## b (b)\nsecond";
        let blocks = split_server_blocks(section);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].body, "\nfirst\n\n### Available Tools\n- t: d\n\n");
        assert_eq!(blocks[1].body, "second");
    }

    #[test]
    fn test_split_non_server_heading_ends_block() {
        let section = "## a (a)\nbody a\n## Notes\nnot part of a\n## b (b)\nbody b";
        let blocks = split_server_blocks(section);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].body, "body a\n");
        assert_eq!(blocks[1].name, "b");
    }

    #[test]
    fn test_split_ignores_third_level_heading_with_parens() {
        let blocks = split_server_blocks("### Available Tools (2)\n- x: y");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_split_ignores_heading_without_command() {
        assert!(split_server_blocks("## Just a title\ntext").is_empty());
        assert!(split_server_blocks("text\nmore text").is_empty());
    }

    #[test]
    fn test_split_heading_at_end_without_newline() {
        let blocks = split_server_blocks("## empty (none)");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].body, "");
    }

    // ========================================================================
    // Description
    // ========================================================================

    #[test]
    fn test_description_collapses_lines() {
        let (server, _) = parse_block("  First line\n\n   second line  \n### Available Tools\n");
        assert_eq!(server.description, "First line second line");
    }

    #[test]
    fn test_description_empty_when_block_starts_with_heading() {
        let (server, _) = parse_block("### Available Tools\n- t: does things\n");
        assert_eq!(server.description, "");
        assert_eq!(server.tools.len(), 1);
    }

    #[test]
    fn test_description_without_subheadings() {
        let (server, diagnostics) = parse_block("Only prose here.\nNothing else.");
        assert_eq!(server.description, "Only prose here. Nothing else.");
        assert!(server.tools.is_empty());
        assert!(server.resources.is_empty());
        assert!(diagnostics.is_empty());
    }

    // ========================================================================
    // Tools
    // ========================================================================

    #[test]
    fn test_tool_with_schema() {
        let (server, diagnostics) = parse_block(
            "### Available Tools\n- read_file: Reads a file.\n  Input Schema:\n  {\"type\":\"object\",\"properties\":{\"path\":{\"type\":\"string\"}}}\n",
        );
        assert!(diagnostics.is_empty());
        let tool = server.tool("read_file").unwrap();
        assert_eq!(tool.description, "Reads a file.");
        assert_eq!(
            tool.input_schema,
            json!({"type": "object", "properties": {"path": {"type": "string"}}})
        );
    }

    #[test]
    fn test_schema_key_order_preserved() {
        let (server, _) = parse_block(
            "### Available Tools\n- t: d\n  Input Schema:\n  {\"z\": 1, \"a\": 2, \"m\": 3}\n",
        );
        let keys: Vec<_> = server.tools[0]
            .input_schema
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_tool_without_schema_gets_empty_object() {
        let (server, _) = parse_block("### Available Tools\n- list_items: Lists\n  all items.\n");
        let tool = server.tool("list_items").unwrap();
        assert_eq!(tool.description, "Lists all items.");
        assert_eq!(tool.input_schema, json!({}));
    }

    #[test]
    fn test_tool_without_schema_or_description_is_skipped() {
        let (server, diagnostics) =
            parse_block("### Available Tools\n- empty:\n- real: Does work\n");
        assert_eq!(server.tools.len(), 1);
        assert_eq!(server.tools[0].name, "real");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unbalanced_schema_drops_only_that_tool() {
        let (server, diagnostics) = parse_block(
            "### Available Tools\n- bad: Broken.\n  Input Schema:\n  {\"a\": 1\n- good: Works.\n  Input Schema:\n  {\"type\": \"object\"}\n",
        );
        assert_eq!(server.tools.len(), 1);
        assert_eq!(server.tools[0].name, "good");
        assert_eq!(
            diagnostics,
            vec![Diagnostic::SchemaUnbalanced {
                server: "test".to_string(),
                tool: "bad".to_string(),
            }]
        );
    }

    #[test]
    fn test_invalid_json_schema_drops_tool() {
        let (server, diagnostics) = parse_block(
            "### Available Tools\n- bad: Broken.\n  Input Schema:\n  {type: object}\n- ok: Fine.\n",
        );
        assert_eq!(server.tools.len(), 1);
        assert_eq!(server.tools[0].name, "ok");
        assert!(matches!(
            &diagnostics[..],
            [Diagnostic::SchemaParse { tool, .. }] if tool == "bad"
        ));
    }

    #[test]
    fn test_schema_marker_without_json_is_unbalanced() {
        let (server, diagnostics) =
            parse_block("### Available Tools\n- t: d\n  Input Schema: none\n");
        assert!(server.tools.is_empty());
        assert!(matches!(diagnostics[0], Diagnostic::SchemaUnbalanced { .. }));
    }

    #[test]
    fn test_dash_inside_description_does_not_split() {
        let (server, _) = parse_block(
            "### Available Tools\n- search: Find things\n  - supports wildcards - and more\n  Input Schema:\n  {}\n",
        );
        assert_eq!(server.tools.len(), 1);
        assert_eq!(
            server.tools[0].description,
            "Find things - supports wildcards - and more"
        );
    }

    #[test]
    fn test_hyphenated_and_unicode_tool_names() {
        let (server, _) =
            parse_block("### Available Tools\n- create-issue: a\n- lire_fichier_é: b\n");
        let names: Vec<_> = server.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["create-issue", "lire_fichier_é"]);
    }

    #[test]
    fn test_tools_heading_case_insensitive() {
        let (server, _) = parse_block("### available tools\n- t: d\n");
        assert_eq!(server.tools.len(), 1);
    }

    #[test]
    fn test_tools_stop_at_direct_resources() {
        let (server, _) = parse_block(
            "### Available Tools\n- t: d\n\n### Direct Resources\n- file:///a (A file): contents\n",
        );
        assert_eq!(server.tools[0].description, "d");
        assert_eq!(server.resources.len(), 1);
    }

    #[test]
    fn test_preamble_before_first_tool_is_ignored() {
        let (server, _) = parse_block("### Available Tools\nNote: these are tools\n- t: d\n");
        assert_eq!(server.tools.len(), 1);
        assert_eq!(server.tools[0].name, "t");
    }

    #[test]
    fn test_text_after_schema_is_ignored() {
        let (server, _) = parse_block(
            "### Available Tools\n- t: d\n  Input Schema:\n  {\"a\": {}}\n  trailing words {x}\n",
        );
        assert_eq!(server.tools[0].input_schema, json!({"a": {}}));
    }

    // ========================================================================
    // Resources
    // ========================================================================

    #[test]
    fn test_resources_parsed() {
        let (server, diagnostics) = parse_block(
            "### Direct Resources\n- console://logs (Browser console logs): Recent output\n\n- weather://sf/current (Current weather in SF): Live data\n",
        );
        assert!(diagnostics.is_empty());
        assert_eq!(
            server.resources,
            vec![
                ResourceRecord::new("console://logs", "Browser console logs"),
                ResourceRecord::new("weather://sf/current", "Current weather in SF"),
            ]
        );
    }

    #[test]
    fn test_non_conforming_resource_lines_ignored() {
        let (server, diagnostics) = parse_block(
            "### Direct Resources\n- file:///a (A): ok\nsome prose\n- missing description\n",
        );
        assert_eq!(server.resources.len(), 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_malformed_resources_flagged() {
        let (server, diagnostics) =
            parse_block("### Direct Resources\n- no parens here\n- nor here\n");
        assert!(server.resources.is_empty());
        assert_eq!(
            diagnostics,
            vec![Diagnostic::MalformedResources {
                server: "test".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_resources_section_not_flagged() {
        let (server, diagnostics) = parse_block("### Direct Resources\n\n");
        assert!(server.resources.is_empty());
        assert!(diagnostics.is_empty());
    }

    // ========================================================================
    // Whole document
    // ========================================================================

    #[test]
    fn test_parse_catalog_missing_start() {
        let report = parse_catalog("## a (a)\nbody", &test_delimiters());
        assert!(report.catalog.is_empty());
        assert_eq!(report.diagnostics, vec![Diagnostic::StartDelimiterMissing]);
        assert!(report.has_errors());
    }

    #[test]
    fn test_parse_catalog_missing_end_still_parses() {
        let report = parse_catalog("x\n\nSERVERS\n\n## a (a)\nbody", &test_delimiters());
        assert_eq!(report.catalog.len(), 1);
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::EndDelimiterMissing {
                delimiter: "## Creating an MCP Server".to_string()
            }]
        );
        assert!(!report.has_errors());
    }

    #[test]
    fn test_parse_catalog_no_headings_is_flagged() {
        let report = parse_catalog(
            "\n\nSERVERS\n\n(No MCP servers currently connected)\n## Creating an MCP Server",
            &test_delimiters(),
        );
        assert!(report.catalog.is_empty());
        assert_eq!(report.diagnostics, vec![Diagnostic::NoServerHeadings]);
    }

    #[test]
    fn test_parse_catalog_blank_section_is_silent() {
        let report = parse_catalog(
            "\n\nSERVERS\n\n\n## Creating an MCP Server",
            &test_delimiters(),
        );
        assert!(report.catalog.is_empty());
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_parse_catalog_crlf_and_bom() {
        let doc = "\u{feff}x\r\n\r\nSERVERS\r\n\r\n## a (a)\r\nDesc\r\n\r\n## Creating an MCP Server";
        let report = parse_catalog(doc, &test_delimiters());
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.catalog.servers[0].description, "Desc");
    }

    #[test]
    fn test_dropped_tools_count() {
        let report = parse_catalog(
            "\n\nSERVERS\n\n## a (a)\n### Available Tools\n- x: d\n  Input Schema:\n  {\n- y: d\n  Input Schema:\n  {bad}\n",
            &test_delimiters(),
        );
        assert_eq!(report.dropped_tools(), 2);
        assert!(report.catalog.servers[0].tools.is_empty());
    }
}
