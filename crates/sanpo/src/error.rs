//! Error types for session setup and import.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::share::ShareError;

/// Errors raised while setting up a session or touching the local state file.
#[derive(Debug, Error)]
pub enum SanpoError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] database::DatabaseError),

    /// Local state file could not be read or written.
    #[error("state file {path}: {source}")]
    StateIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Local state could not be encoded.
    #[error("state encoding error: {0}")]
    StateEncode(#[from] serde_json::Error),
}

/// Why an import performed no writes.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The payload is not a task group snapshot.
    #[error("not a valid task group export: {0}")]
    Malformed(#[from] ShareError),

    /// The device user could not be resolved.
    #[error("no user available to own the imported group")]
    NoUser,

    /// The new group could not be created.
    #[error("could not create imported group: {0}")]
    GroupCreation(#[source] database::DatabaseError),
}

/// Result type for session setup.
pub type Result<T> = std::result::Result<T, SanpoError>;
