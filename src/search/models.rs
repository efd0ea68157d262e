//! Search data models

use super::error::SearchError;
use crate::provider::{
    ImageOptions, InvalidOption, Resolution, ResultRecord, SafeSearch, TextOptions, TimeLimit,
    VideoOptions,
};
use serde::Serialize;
use std::fmt;

/// Kind of search to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Text,
    Answers,
    Images,
    Videos,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Text,
        Category::Answers,
        Category::Images,
        Category::Videos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Text => "text",
            Category::Answers => "answers",
            Category::Images => "images",
            Category::Videos => "videos",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Query string, must not be blank
    pub keywords: String,
    /// Upper bound on the number of results returned
    pub max_results: usize,
}

impl SearchRequest {
    pub const DEFAULT_MAX_RESULTS: usize = 10;

    pub fn new(keywords: impl Into<String>, max_results: usize) -> Self {
        Self {
            keywords: keywords.into(),
            max_results,
        }
    }

    /// Reject requests without keywords
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.keywords.trim().is_empty() {
            return Err(SearchError::invalid("missing or empty keywords"));
        }
        Ok(())
    }
}

/// Caller-supplied option values, applied on top of a category's defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub region: Option<String>,
    pub safesearch: Option<String>,
    pub timelimit: Option<String>,
    pub resolution: Option<String>,
}

/// Category-specific provider options.
///
/// The variant decides which provider operation a fetch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOptions {
    Text(TextOptions),
    Answers,
    Images(ImageOptions),
    Videos(VideoOptions),
}

impl SearchOptions {
    /// Default options of a category
    pub fn defaults_for(category: Category) -> Self {
        match category {
            Category::Text => SearchOptions::Text(TextOptions::default()),
            Category::Answers => SearchOptions::Answers,
            Category::Images => SearchOptions::Images(ImageOptions::default()),
            Category::Videos => SearchOptions::Videos(VideoOptions::default()),
        }
    }

    pub fn category(&self) -> Category {
        match self {
            SearchOptions::Text(_) => Category::Text,
            SearchOptions::Answers => Category::Answers,
            SearchOptions::Images(_) => Category::Images,
            SearchOptions::Videos(_) => Category::Videos,
        }
    }

    /// Apply overrides. Options the category does not have are ignored,
    /// an empty time limit clears it.
    pub fn with_overrides(mut self, overrides: &OptionOverrides) -> Result<Self, SearchError> {
        let timelimit = match overrides.timelimit.as_deref().map(str::trim) {
            Some("") => Some(None),
            Some(value) => Some(Some(value.parse::<TimeLimit>()?)),
            None => None,
        };
        let safesearch = overrides
            .safesearch
            .as_deref()
            .map(str::parse::<SafeSearch>)
            .transpose()?;
        let resolution = overrides
            .resolution
            .as_deref()
            .map(str::parse::<Resolution>)
            .transpose()?;
        let region = overrides.region.as_ref().filter(|r| !r.trim().is_empty());

        match &mut self {
            SearchOptions::Text(o) => {
                if let Some(region) = region {
                    o.region = region.clone();
                }
                if let Some(safesearch) = safesearch {
                    o.safesearch = safesearch;
                }
                if let Some(timelimit) = timelimit {
                    o.timelimit = timelimit;
                }
            }
            SearchOptions::Answers => {}
            SearchOptions::Images(o) => {
                if let Some(region) = region {
                    o.region = region.clone();
                }
                if let Some(safesearch) = safesearch {
                    o.safesearch = safesearch;
                }
                if let Some(timelimit) = timelimit {
                    o.timelimit = timelimit;
                }
            }
            SearchOptions::Videos(o) => {
                if let Some(Some(limit)) = timelimit {
                    if limit.video_code().is_none() {
                        let value = overrides.timelimit.as_deref().unwrap_or_default();
                        return Err(InvalidOption::new("timelimit", value).into());
                    }
                }
                if let Some(region) = region {
                    o.region = region.clone();
                }
                if let Some(safesearch) = safesearch {
                    o.safesearch = safesearch;
                }
                if let Some(timelimit) = timelimit {
                    o.timelimit = timelimit;
                }
                if let Some(resolution) = resolution {
                    o.resolution = Some(resolution);
                }
            }
        }

        Ok(self)
    }
}

/// Search results, in provider order
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ResultRecord>,
}
