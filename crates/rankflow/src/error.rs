//! Error types for Rankflow operations.
//!
//! This module provides the main error type [`RankflowError`] which wraps
//! the error conditions that can occur while processing a graph.

use std::io;

use thiserror::Error;

use rankflow_parser::error::ParseError;

/// The main error type for Rankflow operations.
///
/// The `Parse` variant keeps the source text next to the diagnostics so a
/// front end can render labelled snippets.
#[derive(Debug, Error)]
pub enum RankflowError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for RankflowError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl RankflowError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
