//! HTTP request handlers

use super::error::ApiError;
use super::params::SearchParams;
use super::state::AppState;
use crate::search::{Category, SearchResponse};
use axum::{extract::State, response::IntoResponse, Json};

/// Web search handler
pub async fn search(
    State(state): State<AppState>,
    params: SearchParams,
) -> Result<Json<SearchResponse>, ApiError> {
    run(&state, Category::Text, params).await
}

/// Instant answer handler
pub async fn search_answers(
    State(state): State<AppState>,
    params: SearchParams,
) -> Result<Json<SearchResponse>, ApiError> {
    run(&state, Category::Answers, params).await
}

/// Image search handler
pub async fn search_images(
    State(state): State<AppState>,
    params: SearchParams,
) -> Result<Json<SearchResponse>, ApiError> {
    run(&state, Category::Images, params).await
}

/// Video search handler
pub async fn search_videos(
    State(state): State<AppState>,
    params: SearchParams,
) -> Result<Json<SearchResponse>, ApiError> {
    run(&state, Category::Videos, params).await
}

async fn run(
    state: &AppState,
    category: Category,
    params: SearchParams,
) -> Result<Json<SearchResponse>, ApiError> {
    let (request, options) = params.into_search(category, state.default_max_results())?;
    let response = state.fetcher.fetch(&request, &options).await?;
    Ok(Json(response))
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "provider": state.fetcher.provider_name(),
    }))
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("endpoint not found")
}
