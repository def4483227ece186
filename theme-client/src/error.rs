//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed at the network level
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured proxy URL is malformed
    #[error("Invalid proxy URL: {0}")]
    InvalidProxy(String),

    /// The composed target URL is malformed
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// The server answered with a non-success status
    #[error("Request failed with status {status}: {body}")]
    BadStatus { status: u16, body: String },

    /// The response body did not carry the expected payload
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Asset codec failure
    #[error(transparent)]
    Asset(#[from] shared::AssetError),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
