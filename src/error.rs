//! This module defines all error types used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Idiom catalogue errors (a pattern failed to compile)
    #[error("Parser error: {0}")]
    Parser(String),

    /// A transition referenced a state that was never added to the diagram
    #[error(
        "Both states {from}, {to} must be added to the diagram before adding a transition"
    )]
    UnresolvedTransition { from: String, to: String },

    /// Rendering collaborator errors
    #[error("Render error: {0}")]
    Render(String),

    /// Artifact could not be written
    #[error("Failed to write {path:?}: {source}")]
    Artifact {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),

    /// Wrapped anyhow errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a parser error
    pub fn parser(msg: impl Into<String>) -> Self {
        Self::Parser(msg.into())
    }

    /// Create a render error
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Check if error is a strict-policy diagram failure
    pub fn is_unresolved_transition(&self) -> bool {
        matches!(self, Error::UnresolvedTransition { .. })
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Parser(format!("invalid idiom pattern: {}", err))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Custom(format!("JSON error: {}", err))
    }
}
