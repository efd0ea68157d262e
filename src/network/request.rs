//! Outgoing request and response types

use super::user_agent::{accept_html, accept_json};

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// HTTP request to be made on behalf of a provider
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    /// URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Value of the Accept header
    pub accept: &'static str,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
    /// Query parameters, in order
    pub params: Vec<(String, String)>,
    /// Form body, sent url-encoded
    pub form: Option<Vec<(String, String)>>,
}

impl OutgoingRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(url, HttpMethod::Get)
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(url, HttpMethod::Post)
    }

    fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            accept: accept_html(),
            headers: Vec::new(),
            params: Vec::new(),
            form: None,
        }
    }

    /// Ask for a JSON response
    pub fn accept_json(mut self) -> Self {
        self.accept = accept_json();
        self
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Replace the query parameters
    pub fn params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    /// Set the form body
    pub fn form(mut self, data: Vec<(String, String)>) -> Self {
        self.form = Some(data);
        self
    }
}

/// HTTP response to an outgoing request
#[derive(Debug)]
pub struct OutgoingResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl OutgoingResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.text)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if response indicates rate limiting.
    ///
    /// DuckDuckGo answers throttled JSON requests with `202 Accepted`.
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429 || self.status == 202
    }
}
