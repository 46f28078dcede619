//! Command implementations for the MCP prompt sync CLI.
//!
//! Each command module loads what it needs, runs its operation, and formats
//! output according to the requested format.

pub mod common;
pub mod completions;
pub mod inject;
pub mod render;
