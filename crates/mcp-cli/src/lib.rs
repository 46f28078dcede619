//! MCP Prompt Sync CLI library.
//!
//! Exposes the argument definitions, commands, and formatters behind the
//! `mcp-prompt-sync` binary so they can be tested directly.

pub mod cli;
pub mod commands;
pub mod formatters;
pub mod runner;
