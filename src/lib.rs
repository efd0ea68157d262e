//! websearch-rs: a small JSON web service in front of DuckDuckGo
//!
//! Every route takes a query and a result limit, asks the search provider for
//! a lazy stream of results, and returns the first `max_results` of them in
//! provider order.

pub mod config;
pub mod logging;
pub mod network;
pub mod provider;
pub mod search;
pub mod web;

pub use config::Settings;
pub use provider::{ResultRecord, SearchProvider};
pub use search::{BoundedFetcher, Category, SearchError, SearchRequest, SearchResponse};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
