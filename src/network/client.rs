//! HTTP client for making requests to the search provider

use super::request::{HttpMethod, OutgoingRequest, OutgoingResponse};
use super::user_agent::generate_user_agent;
use crate::config::OutgoingSettings;
use anyhow::Result;
use reqwest::{Client, Response};
use std::time::Duration;

/// HTTP client wrapper holding the connection pool and a browser identity.
///
/// Clones share the pool; each clone may rotate its own user agent.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let request_timeout = settings.request_timeout()?;
        let mut builder = Client::builder()
            .timeout(request_timeout)
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            default_timeout: request_timeout,
            user_agent: generate_user_agent(),
        })
    }

    /// Execute an outgoing request
    pub async fn execute(&self, request: OutgoingRequest) -> reqwest::Result<OutgoingResponse> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        req_builder = req_builder
            .timeout(self.default_timeout)
            .header("User-Agent", &self.user_agent)
            .header("Accept", request.accept)
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("DNT", "1");

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        if let Some(ref form) = request.form {
            req_builder = req_builder.form(form);
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    /// Parse response into OutgoingResponse
    async fn parse_response(response: Response) -> reqwest::Result<OutgoingResponse> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let text = response.text().await?;

        Ok(OutgoingResponse { status, text, url })
    }

    /// Switch to a freshly generated user agent
    pub fn rotate_user_agent(&mut self) {
        self.user_agent = generate_user_agent();
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_negative_request_timeout_is_rejected() {
        let settings = OutgoingSettings {
            request_timeout: -1.0,
            ..OutgoingSettings::default()
        };

        let err = HttpClient::with_settings(&settings).err().unwrap();
        assert!(err.to_string().contains("outgoing.request_timeout"));
    }

    #[tokio::test]
    async fn test_get_sends_params_and_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/i.js"))
            .and(query_param("q", "rust lang"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = OutgoingRequest::get(format!("{}/i.js", server.uri()))
            .accept_json()
            .params(vec![("q".to_string(), "rust lang".to_string())]);

        let response = client.execute(request).await.unwrap();
        assert!(response.is_success());

        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_post_sends_form_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/lite/"))
            .and(body_string_contains("q=cats"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = OutgoingRequest::post(format!("{}/lite/", server.uri()))
            .form(vec![("q".to_string(), "cats".to_string())]);

        let response = client.execute(request).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.text, "<html></html>");
    }

    #[test]
    fn test_rotate_user_agent_keeps_browser_shape() {
        let mut client = HttpClient::new().unwrap();
        client.rotate_user_agent();
        assert!(client.user_agent().starts_with("Mozilla/5.0"));
    }
}
