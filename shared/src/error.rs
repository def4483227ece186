//! Asset error types

use thiserror::Error;

/// Errors raised while loading, decoding or writing assets
#[derive(Debug, Error)]
pub enum AssetError {
    /// The load target is a directory, not a file
    #[error("File is a directory")]
    IsDirectory,

    /// The attachment field holds malformed base64
    #[error("Could not decode {key}: {source}")]
    Decode {
        key: String,
        source: base64::DecodeError,
    },

    /// Filesystem failure while reading or writing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for asset operations
pub type AssetResult<T> = Result<T, AssetError>;
