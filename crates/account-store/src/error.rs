//! Account storage errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// An account with this email already exists.
    #[error("Account already exists: {0}")]
    Duplicate(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported document version: {0}")]
    UnsupportedVersion(u32),
}
