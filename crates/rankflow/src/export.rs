//! Exporters turning a [`LaidOutGraph`] into text.

pub mod svg;
pub mod toml;

use std::fmt;

use crate::layout::LaidOutGraph;

/// Renders a laid-out graph into some output format.
pub trait Exporter {
    /// Renders the whole graph into a string.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] when the output cannot be produced.
    fn export(&self, graph: &LaidOutGraph) -> Result<String, Error>;
}

#[derive(Debug)]
pub enum Error {
    Render(String),
    Serialize(::toml::ser::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Serialize(err) => write!(f, "Serialization error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<::toml::ser::Error> for Error {
    fn from(err: ::toml::ser::Error) -> Self {
        Self::Serialize(err)
    }
}
