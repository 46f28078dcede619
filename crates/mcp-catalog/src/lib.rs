//! Server catalog extraction and YAML rendering.
//!
//! This crate turns the "connected MCP servers" section of a markdown system
//! prompt into typed records and renders those records as an indented YAML
//! fragment ready for injection into template files.
//!
//! # Pipeline
//!
//! 1. [`locate_section`] finds the text between the configured delimiters.
//! 2. [`split_server_blocks`] cuts it into one block per `## name (command)`.
//! 3. [`parse_server_block`] recovers description, tools and resources,
//!    using [`extract_balanced_json`] for each `Input Schema:`.
//! 4. [`render_catalog`] emits the YAML fragment.
//!
//! [`parse_catalog`] runs steps 1 to 3. Parsing never fails: problems are
//! reported as [`Diagnostic`]s next to whatever could be recovered.
//!
//! # Examples
//!
//! ```
//! use mcp_catalog::{parse_catalog, render_catalog, RenderOptions};
//! use mcp_core::Delimiters;
//!
//! let delimiters = Delimiters {
//!     start: "SERVERS\n".to_string(),
//!     end: "END".to_string(),
//! };
//! let markdown = "SERVERS\n## Reader (cat)\nReads files.\nEND";
//!
//! let report = parse_catalog(markdown, &delimiters);
//! let yaml = render_catalog(&report.catalog, &RenderOptions::default()).unwrap();
//! assert!(yaml.starts_with("    servers:\n    - name: Reader"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod balanced;
pub mod diagnostics;
pub mod parser;
pub mod section;
pub mod yaml;

pub use balanced::extract_balanced_json;
pub use diagnostics::{Diagnostic, Severity};
pub use parser::{
    CatalogReport, SCHEMA_MARKER, ServerBlock, parse_catalog, parse_server_block,
    split_server_blocks,
};
pub use section::{Section, SectionError, locate_section, normalize_line_endings};
pub use yaml::{EMPTY_DOCUMENT, EmitError, RenderOptions, render_catalog};
