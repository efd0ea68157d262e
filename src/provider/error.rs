//! Provider error type

use thiserror::Error;

/// Any failure coming from the search provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("provider returned HTTP {0}")]
    Http(u16),

    #[error("provider rate limit reached")]
    RateLimited,

    #[error("could not obtain a vqd token for {0:?}")]
    Token(String),

    #[error("malformed provider response: {0}")]
    Parse(String),

    #[error("provider request timed out")]
    Timeout,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Network(err)
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(err.to_string())
    }
}
