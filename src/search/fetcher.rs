//! Bounded result fetching

use super::error::SearchError;
use super::models::{Category, SearchOptions, SearchRequest, SearchResponse};
use crate::provider::{ProviderError, ResultRecord, SearchProvider};
use futures::{StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Fetches at most `max_results` records from a provider, in provider order
pub struct BoundedFetcher {
    provider: Arc<dyn SearchProvider>,
    max_results_cap: usize,
    timeout: Option<Duration>,
}

impl BoundedFetcher {
    /// Create a fetcher with no cap and no timeout
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider,
            max_results_cap: usize::MAX,
            timeout: None,
        }
    }

    /// Clamp every requested count to `cap`
    pub fn with_max_results_cap(mut self, cap: usize) -> Self {
        self.max_results_cap = cap;
        self
    }

    /// Fail fetches that take longer than `timeout` as a whole
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch with the category's default options
    pub async fn fetch_category(
        &self,
        category: Category,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchError> {
        self.fetch(request, &SearchOptions::defaults_for(category)).await
    }

    /// Fetch the first `max_results` records for the options' category.
    ///
    /// Blank keywords fail before the provider is contacted. A provider error
    /// fails the whole fetch; nothing is retried.
    pub async fn fetch(
        &self,
        request: &SearchRequest,
        options: &SearchOptions,
    ) -> Result<SearchResponse, SearchError> {
        request.validate()?;

        let limit = request.max_results.min(self.max_results_cap);
        debug!(
            keywords = %request.keywords,
            category = %options.category(),
            max_results = limit,
            "received search request"
        );

        let collect = self.collect(&request.keywords, limit, options);
        let results = match self.timeout {
            Some(duration) => timeout(duration, collect)
                .await
                .map_err(|_| ProviderError::Timeout)??,
            None => collect.await?,
        };

        debug!(count = results.len(), "returning results");
        Ok(SearchResponse { results })
    }

    /// The session lives for this call only and is dropped on every exit path
    async fn collect(
        &self,
        keywords: &str,
        limit: usize,
        options: &SearchOptions,
    ) -> Result<Vec<ResultRecord>, ProviderError> {
        let session = self.provider.open().await?;

        let stream = match options {
            SearchOptions::Text(o) => session.text(keywords, o),
            SearchOptions::Answers => session.answers(keywords),
            SearchOptions::Images(o) => session.images(keywords, o),
            SearchOptions::Videos(o) => session.videos(keywords, o),
        };

        let records = stream.take(limit).try_collect().await?;
        Ok(records)
    }
}
