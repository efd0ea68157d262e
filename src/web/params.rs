//! Request parameter extraction
//!
//! Parameters may arrive in the query string or, for POST, in a url-encoded
//! form body. Form values win field by field.

use super::error::ApiError;
use crate::search::{Category, OptionOverrides, SearchError, SearchOptions, SearchRequest};
use axum::{
    async_trait,
    extract::{FromRequest, Query, Request},
    http::{header::CONTENT_TYPE, Method},
    Form,
};
use serde::Deserialize;

/// Raw search parameters, exactly as sent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub max_results: Option<String>,
    pub region: Option<String>,
    pub safesearch: Option<String>,
    pub timelimit: Option<String>,
    pub resolution: Option<String>,
}

impl SearchParams {
    /// Fill fields missing here from `fallback`
    fn or(self, fallback: SearchParams) -> SearchParams {
        SearchParams {
            q: self.q.or(fallback.q),
            max_results: self.max_results.or(fallback.max_results),
            region: self.region.or(fallback.region),
            safesearch: self.safesearch.or(fallback.safesearch),
            timelimit: self.timelimit.or(fallback.timelimit),
            resolution: self.resolution.or(fallback.resolution),
        }
    }

    /// Build the request and options for `category`
    pub fn into_search(
        self,
        category: Category,
        default_max_results: usize,
    ) -> Result<(SearchRequest, SearchOptions), SearchError> {
        let max_results = match self.max_results.as_deref().map(str::trim) {
            None | Some("") => default_max_results,
            Some(value) => value.parse::<usize>().map_err(|_| {
                SearchError::invalid(format!(
                    "max_results must be a non-negative integer, got {:?}",
                    value
                ))
            })?,
        };

        let overrides = OptionOverrides {
            region: self.region,
            safesearch: self.safesearch,
            timelimit: self.timelimit,
            resolution: self.resolution,
        };
        let options = SearchOptions::defaults_for(category).with_overrides(&overrides)?;

        let request = SearchRequest::new(self.q.unwrap_or_default(), max_results);
        Ok((request, options))
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

#[async_trait]
impl<S> FromRequest<S> for SearchParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<SearchParams>::try_from_uri(req.uri())
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        if req.method() != Method::POST || !is_form(&req) {
            return Ok(query);
        }

        let Form(form) = Form::<SearchParams>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        Ok(form.or(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::SafeSearch;
    use axum::body::Body;

    async fn extract(req: Request) -> SearchParams {
        SearchParams::from_request(req, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_reads_query_string() {
        let req = Request::builder()
            .uri("/search?q=cats&max_results=3")
            .body(Body::empty())
            .unwrap();

        let params = extract(req).await;
        assert_eq!(params.q.as_deref(), Some("cats"));
        assert_eq!(params.max_results.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_post_form_takes_precedence() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/search?q=dogs&max_results=7&region=us-en")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("q=cats&max_results=2"))
            .unwrap();

        let params = extract(req).await;
        assert_eq!(params.q.as_deref(), Some("cats"));
        assert_eq!(params.max_results.as_deref(), Some("2"));
        assert_eq!(params.region.as_deref(), Some("us-en"));
    }

    #[tokio::test]
    async fn test_post_without_form_body_uses_query() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/search?q=cats")
            .body(Body::empty())
            .unwrap();

        let params = extract(req).await;
        assert_eq!(params.q.as_deref(), Some("cats"));
    }

    #[test]
    fn test_default_max_results() {
        let params = SearchParams {
            q: Some("cats".to_string()),
            ..SearchParams::default()
        };

        let (request, options) = params.into_search(Category::Text, 10).unwrap();
        assert_eq!(request, SearchRequest::new("cats", 10));
        assert_eq!(options, SearchOptions::defaults_for(Category::Text));
    }

    #[test]
    fn test_negative_or_garbage_max_results_rejected() {
        for value in ["-1", "ten", "2.5"] {
            let params = SearchParams {
                q: Some("cats".to_string()),
                max_results: Some(value.to_string()),
                ..SearchParams::default()
            };

            let err = params.into_search(Category::Text, 10).unwrap_err();
            assert!(matches!(err, SearchError::InvalidArgument(_)), "{}", value);
        }
    }

    #[test]
    fn test_overrides_reach_options() {
        let params = SearchParams {
            q: Some("sunset".to_string()),
            safesearch: Some("on".to_string()),
            ..SearchParams::default()
        };

        let (_, options) = params.into_search(Category::Images, 10).unwrap();
        match options {
            SearchOptions::Images(o) => assert_eq!(o.safesearch, SafeSearch::On),
            other => panic!("unexpected options: {:?}", other),
        }
    }
}
