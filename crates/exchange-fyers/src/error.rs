//! Error types for the FYERS integration.

use thiserror::Error;

/// Errors that can occur when talking to FYERS.
///
/// The API does not reliably distinguish rejected credentials from
/// transient failures, so everything the broker reports lands in [`Api`]
/// with the upstream message attached verbatim.
///
/// [`Api`]: FyersError::Api
#[derive(Debug, Error)]
pub enum FyersError {
    /// FYERS rejected the request or reported a failure.
    #[error("FYERS API error: {status_code} - {message}")]
    Api {
        /// HTTP status code (or FYERS `code` field when the HTTP layer said 200).
        status_code: u16,
        /// Error message from FYERS.
        message: String,
    },

    /// Request never got a usable response.
    #[error("network error: {0}")]
    Network(String),

    /// Response body did not match the expected shape.
    #[error("unexpected FYERS response: {0}")]
    Decode(String),

    /// A required credential field is not stored on the settings row.
    #[error("missing credential: {0}")]
    MissingCredential(String),
}

impl FyersError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for FyersError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
