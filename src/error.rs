use std::time::Duration;
use thiserror::Error;

/// Errors surfaced to callers of the combination service.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CombineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Transient failures talking to the oracle. Never cached.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle call timed out after {0:?}")]
    Timeout(Duration),

    #[error("oracle request failed: {0}")]
    Request(String),

    #[error("oracle returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("oracle returned an empty response")]
    EmptyResponse,

    #[error("no oracle credentials configured (set oracle.api_key or GEMINI_API_KEY)")]
    MissingCredentials,
}

impl From<reqwest::Error> for OracleError {
    fn from(err: reqwest::Error) -> Self {
        OracleError::Request(err.to_string())
    }
}
