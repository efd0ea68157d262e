//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Search routes, GET and POST alike
        .route("/search", get(handlers::search).post(handlers::search))
        .route(
            "/searchAnswers",
            get(handlers::search_answers).post(handlers::search_answers),
        )
        .route(
            "/searchImages",
            get(handlers::search_images).post(handlers::search_images),
        )
        .route(
            "/searchVideos",
            get(handlers::search_videos).post(handlers::search_videos),
        )
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::provider::testing::{Probe, StaticProvider, Supply};
    use crate::provider::SafeSearch;
    use crate::search::SearchOptions;
    use axum::body::{to_bytes, Body};
    use axum::http::{header::CONTENT_TYPE, Method, Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(provider: StaticProvider) -> (Router, Arc<Probe>) {
        let probe = provider.probe();
        let state = AppState::new(Settings::default(), Arc::new(provider)).unwrap();
        (create_router(state), probe)
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn titles(body: &Value) -> Vec<&str> {
        body["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["title"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_search_returns_first_results() {
        let (app, _) = app(StaticProvider::numbered(5));

        let (status, body) = send(app, get("/search?q=cats&max_results=3")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&body), vec!["title-0", "title-1", "title-2"]);
    }

    #[tokio::test]
    async fn test_images_route_uses_image_defaults() {
        let (app, probe) = app(StaticProvider::numbered(10));

        let (status, body) = send(app, get("/searchImages?q=sunset&max_results=2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&body), vec!["title-0", "title-1"]);

        let calls = probe.calls();
        assert_eq!(calls[0].0, "images");
        match &calls[0].1 {
            SearchOptions::Images(o) => assert_eq!(o.safesearch, SafeSearch::Off),
            other => panic!("unexpected options: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_default_max_results_is_ten() {
        let (app, _) = app(StaticProvider::new(Supply::Endless));

        let (status, body) = send(app, get("/searchVideos?q=cats")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_post_form_is_accepted() {
        let (app, probe) = app(StaticProvider::numbered(5));

        let req = Request::builder()
            .method(Method::POST)
            .uri("/searchAnswers?max_results=5")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("q=rust&max_results=1"))
            .unwrap();

        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&body), vec!["title-0"]);
        assert_eq!(probe.calls()[0].0, "answers");
    }

    #[tokio::test]
    async fn test_empty_query_is_bad_request_on_every_route() {
        for route in ["/search", "/searchAnswers", "/searchImages", "/searchVideos"] {
            let (app, probe) = app(StaticProvider::numbered(5));

            let (status, body) = send(app, get(&format!("{}?q=&max_results=3", route))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", route);
            assert!(body["error"].as_str().unwrap().contains("keywords"));
            assert_eq!(probe.opened(), 0);
        }
    }

    #[tokio::test]
    async fn test_missing_query_is_bad_request() {
        let (app, _) = app(StaticProvider::numbered(5));

        let (status, _) = send(app, get("/search")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_negative_max_results_is_bad_request() {
        let (app, _) = app(StaticProvider::numbered(5));

        let (status, body) = send(app, get("/search?q=cats&max_results=-1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("max_results"));
    }

    #[tokio::test]
    async fn test_yearly_video_window_is_bad_request() {
        let (app, probe) = app(StaticProvider::numbered(5));

        let (status, body) = send(app, get("/searchVideos?q=cats&timelimit=y")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("timelimit"));
        assert_eq!(probe.opened(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_bad_gateway() {
        let (app, probe) = app(StaticProvider::new(Supply::FailAfter(1)));

        let (status, body) = send(app, get("/search?q=cats&max_results=5")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.get("results").is_none());
        assert_eq!(probe.closed(), 1);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app(StaticProvider::numbered(0));

        let (status, body) = send(app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["provider"], "static");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (app, _) = app(StaticProvider::numbered(0));

        let (status, body) = send(app, get("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "endpoint not found");
    }
}
