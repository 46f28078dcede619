//! Core records, configuration, and errors for MCP prompt sync.
//!
//! This crate provides the foundational types shared by every other crate in
//! the workspace.
//!
//! # Architecture
//!
//! The core consists of:
//! - Catalog records (`Catalog`, `ServerRecord`, `ToolRecord`, `ResourceRecord`)
//! - Error hierarchy with contextual information
//! - Layered configuration (`SyncConfig`) loaded from TOML
//! - CLI value types (`ExitCode`, `OutputFormat`)

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;
mod types;

pub mod cli;

pub use config::{
    CONFIG_FILE_NAME, DEFAULT_END_DELIMITER, DEFAULT_END_MARKER, DEFAULT_PLACEHOLDER_MARKER,
    DEFAULT_START_DELIMITER, DEFAULT_START_MARKER, Delimiters, InjectConfig, Markers,
    PlaceholderConfig, PlaceholderValues, RenderConfig, SourceConfig, SyncConfig,
    default_config_path,
};
pub use error::{Error, Result};
pub use types::{Catalog, ResourceRecord, ServerRecord, ToolRecord};
