//! Search error type

use crate::provider::{InvalidOption, ProviderError};
use thiserror::Error;

/// Failure of a whole search request
#[derive(Debug, Error)]
pub enum SearchError {
    /// The request itself is unusable; the provider was not asked
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The provider failed; no partial results are returned
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl SearchError {
    pub fn invalid(message: impl Into<String>) -> Self {
        SearchError::InvalidArgument(message.into())
    }
}

impl From<InvalidOption> for SearchError {
    fn from(err: InvalidOption) -> Self {
        SearchError::InvalidArgument(err.to_string())
    }
}
