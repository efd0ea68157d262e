//! Application state shared across handlers

use crate::config::Settings;
use crate::provider::SearchProvider;
use crate::search::BoundedFetcher;
use anyhow::Result;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Result fetcher bound to the configured provider
    pub fetcher: Arc<BoundedFetcher>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, provider: Arc<dyn SearchProvider>) -> Result<Self> {
        let fetcher = BoundedFetcher::new(provider)
            .with_max_results_cap(settings.search.max_results_cap)
            .with_timeout(settings.search.fetch_timeout()?);

        Ok(Self {
            settings: Arc::new(settings),
            fetcher: Arc::new(fetcher),
        })
    }

    /// Result count used when a request does not name one
    pub fn default_max_results(&self) -> usize {
        self.settings.search.default_max_results
    }
}
