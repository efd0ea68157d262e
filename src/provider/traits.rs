//! Provider traits and types

use super::error::ProviderError;
use super::options::{ImageOptions, TextOptions, VideoOptions};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// A single result as the provider produced it.
///
/// Keys and values are provider-defined and passed through untouched.
pub type ResultRecord = serde_json::Map<String, serde_json::Value>;

/// Lazy sequence of results. Pages are only requested as items are pulled.
pub type RecordStream<'a> = BoxStream<'a, Result<ResultRecord, ProviderError>>;

/// A search backend able to open query sessions
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Open a session scoped to one request.
    ///
    /// The session is released when the returned box is dropped.
    async fn open(&self) -> Result<Box<dyn ProviderSession>, ProviderError>;
}

/// The four query operations offered inside a session
pub trait ProviderSession: Send + Sync {
    /// Web results
    fn text<'a>(&'a self, keywords: &'a str, options: &'a TextOptions) -> RecordStream<'a>;

    /// Instant answers and related topics
    fn answers<'a>(&'a self, keywords: &'a str) -> RecordStream<'a>;

    /// Image results
    fn images<'a>(&'a self, keywords: &'a str, options: &'a ImageOptions) -> RecordStream<'a>;

    /// Video results
    fn videos<'a>(&'a self, keywords: &'a str, options: &'a VideoOptions) -> RecordStream<'a>;
}
