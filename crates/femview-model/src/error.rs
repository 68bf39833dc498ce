//! Error types for the analysis model and the block mesh.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// A mesh object class name was not found in the database.
    #[error("invalid class name: {0}")]
    UnknownClass(String),

    /// A label had no internal index in its class.
    #[error("{class} {label} is not a valid label")]
    InvalidLabel { class: String, label: i64 },

    /// A block mesh description could not be built.
    #[error("invalid block mesh: {0}")]
    InvalidBlock(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
