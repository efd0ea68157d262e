//! Search module
//!
//! Turns a search request into a bounded, provider-ordered result list.

mod error;
mod fetcher;
mod models;

pub use error::SearchError;
pub use fetcher::BoundedFetcher;
pub use models::*;
