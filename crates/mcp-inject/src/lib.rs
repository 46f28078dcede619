//! Idempotent injection of the server list into prompt templates.
//!
//! Each target file gets two treatments:
//!
//! 1. Placeholder tokens such as `[OS_PLACEHOLDER]` are replaced with their
//!    values everywhere in the file.
//! 2. The first injection site, either a block written by a previous run
//!    (start marker line through end marker line) or a
//!    `# [CONNECTED_MCP_SERVERS]` line, is replaced by a fresh marker block
//!    holding the YAML fragment.
//!
//! Running twice with the same fragment leaves the file unchanged after the
//! first run. Without a fragment an existing site is never touched.
//!
//! # Examples
//!
//! ```
//! use mcp_core::InjectConfig;
//! use mcp_inject::Injector;
//!
//! let injector = Injector::new(&InjectConfig::default(), Vec::new()).unwrap();
//! let once = injector.apply("# [CONNECTED_MCP_SERVERS]\n", Some("    servers: []"));
//! let twice = injector.apply(&once.content, Some("    servers: []"));
//! assert_eq!(once.content, twice.content);
//! assert!(!twice.changed);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod engine;
pub mod error;
pub mod file;

pub use engine::{Injection, InjectionOutcome, InjectionSite, Injector, expand_replacement};
pub use error::{InjectError, Result};
pub use file::{FileReport, read_target, write_atomic};
