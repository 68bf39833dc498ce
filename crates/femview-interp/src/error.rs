//! Error types for tokenizing, history files and command handlers.

use std::path::PathBuf;

use thiserror::Error;

use crate::frontend::Severity;

/// A command line that cannot be turned into a token buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("Too many tokens in command (limit {limit}).")]
    TooManyTokens { limit: usize },

    #[error("Token too long (limit {limit} bytes): \"{prefix}...\"")]
    TokenTooLong { limit: usize, prefix: String },
}

/// Failures of history capture and command-file replay.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Unable to open file {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to write history file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("History replay nested more than {limit} files deep.")]
    TooDeep { limit: usize },
}

/// Why a command was rejected. Never propagates past the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Wrong argument count or shape; carries the usage text.
    #[error("Usage: {0}")]
    Usage(String),

    /// Well-formed but semantically invalid.
    #[error("{0}")]
    Invalid(String),

    /// A file or other resource could not be used.
    #[error("{0}")]
    Resource(String),
}

impl CommandError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Usage(_) => Severity::Usage,
            Self::Invalid(_) => Severity::Warning,
            Self::Resource(_) => Severity::Error,
        }
    }
}

impl From<TokenizeError> for CommandError {
    fn from(err: TokenizeError) -> Self {
        Self::Invalid(err.to_string())
    }
}

impl From<HistoryError> for CommandError {
    fn from(err: HistoryError) -> Self {
        Self::Resource(err.to_string())
    }
}

impl From<femview_traction::TractionError> for CommandError {
    fn from(err: femview_traction::TractionError) -> Self {
        use femview_traction::TractionError;
        match err {
            TractionError::PolyRead { .. } => Self::Resource(err.to_string()),
            _ => Self::Invalid(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CommandError>;
