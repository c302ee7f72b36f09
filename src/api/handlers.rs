use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{MediaKind, RecommendationEntry, RecommendationRequest},
    services::{posters::resolve_artwork, recommendations},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct PosterQuery {
    pub title: String,
    #[serde(default)]
    pub kind: MediaKind,
    #[serde(default)]
    pub refresh: bool,
}

impl PosterQuery {
    fn validated_title(&self) -> AppResult<&str> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
        }
        Ok(title)
    }
}

#[derive(Debug, Serialize)]
pub struct PosterResponse {
    pub title: String,
    pub kind: MediaKind,
    pub url: String,
    pub placeholder: bool,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Generates recommendations for the caller's library
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Vec<RecommendationEntry>>> {
    tracing::info!(
        request_id = %request_id,
        kind = %request.kind,
        supplied_titles = request.library_titles.as_ref().map_or(0, Vec::len),
        "Processing recommendation request"
    );

    let client = state.completions()?;

    let titles = match &request.library_titles {
        Some(titles) => titles.clone(),
        None => {
            let source = state.library_for(request.kind)?;
            tracing::debug!(
                request_id = %request_id,
                source = source.name(),
                "Fetching library titles"
            );
            source.library_titles(request.kind).await?
        }
    };

    let entries = recommendations::get_recommendations(
        client,
        &state.parser,
        &request,
        &titles,
        state.config.default_recommendation_count,
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        entries = entries.len(),
        "Recommendation request completed"
    );

    Ok(Json(entries))
}

/// Resolves a poster for a title, falling back to a generated placeholder
pub async fn poster(
    State(state): State<AppState>,
    Query(query): Query<PosterQuery>,
) -> AppResult<Json<PosterResponse>> {
    let title = query.validated_title()?;

    let artwork = resolve_artwork(
        &state.posters,
        &state.placeholders,
        title,
        query.kind,
        query.refresh,
        state.title_lookup(query.kind),
    )
    .await;

    Ok(Json(PosterResponse {
        title: title.to_string(),
        kind: query.kind,
        url: artwork.url().to_string(),
        placeholder: artwork.is_placeholder(),
    }))
}

/// Forgets a cached poster so the next request looks it up again
pub async fn evict_poster(
    State(state): State<AppState>,
    Query(query): Query<PosterQuery>,
) -> AppResult<StatusCode> {
    let title = query.validated_title()?;
    let evicted = state.posters.evict(title, query.kind).await;

    tracing::info!(title = %title, kind = %query.kind, evicted = evicted, "Poster evicted");

    Ok(StatusCode::NO_CONTENT)
}

/// Checks that an external service is reachable with the configured credentials
pub async fn test_connection(
    State(state): State<AppState>,
    Path(service): Path<String>,
) -> AppResult<Json<Value>> {
    let service = service.to_lowercase();

    if service == "llm" || service == "openai" {
        state.completions()?.test_connection().await?;
    } else {
        state.connection_source(&service)?.test_connection().await?;
    }

    Ok(Json(json!({ "service": service, "status": "ok" })))
}
