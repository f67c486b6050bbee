//! CLI support for keypath
//!
//! Provides programmatic access to the `keypath` command so other tools can
//! embed it.

mod get;
mod logging;

pub use get::{Extract, GetOptions, execute_get};
pub use logging::LoggingConfig;

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid path: {0}")]
    Path(#[from] crate::PathError),

    #[error("{0}")]
    Node(#[from] crate::NodeError),

    #[error("Invalid date format: {0}")]
    DateFormat(#[from] crate::DateFormatError),

    #[error("Invalid time zone `{value}`: {source}")]
    TimeZone {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,
}
