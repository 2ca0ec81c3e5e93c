//! Liongard client error types.

use thiserror::Error;

/// Result type for Liongard client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while acquiring or using the Liongard client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Required credentials are absent from the configuration.
    #[error(
        "LIONGARD_API_KEY and LIONGARD_INSTANCE environment variables are required. \
         Set them to your Liongard API key and instance subdomain."
    )]
    MissingCredentials,

    /// Constructing the underlying HTTP client failed.
    #[error("Failed to construct Liongard client: {0}")]
    Construction(String),

    /// Network-level failure talking to the Liongard API.
    #[error("Liongard request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The Liongard API returned a non-success status.
    #[error("Liongard API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be decoded.
    #[error("Failed to decode Liongard response: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Create a construction error.
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    /// Create an API error from a status code and response body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}
