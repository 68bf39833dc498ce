//! Error types for surface generation and traction integration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while defining a surface or integrating over it.
#[derive(Debug, Error)]
pub enum TractionError {
    /// A geometric parameter failed its constraint.
    #[error("{parameter} MUST be {constraint}")]
    InvalidParameter {
        parameter: &'static str,
        constraint: &'static str,
    },

    /// The direction vector has zero length.
    #[error("surface direction vector must be non-zero")]
    ZeroDirection,

    /// Failed to read a poly surface file.
    #[error("Unable to read surface poly file:  {path}: {source}")]
    PolyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A poly surface file was malformed.
    #[error("{path}:{line}: {reason}")]
    PolyFormat {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// The traction class is missing or is not a brick class.
    #[error("traction:  invalid class name {0}")]
    InvalidClass(String),

    /// No sample point fell inside an eligible element.
    #[error("traction:  No points lie within valid mesh elements.")]
    NoValidPoints,

    /// No surface has been generated yet.
    #[error("traction:  no surface defined; use the surface command first")]
    NoSurface,

    /// A generator would need more sample points than the table holds.
    #[error("storage allocation failure: surface needs more than {limit} points")]
    TooManyPoints { limit: usize },

    /// Poly surfaces list their own points.
    #[error("automatic n is not available for poly surfaces")]
    AutoNotSupported,
}

pub type Result<T> = std::result::Result<T, TractionError>;
