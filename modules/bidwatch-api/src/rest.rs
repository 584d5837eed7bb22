use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use bidwatch_common::{known_sellers, Item, ItemFilter};
use bidwatch_tracker::TrackRequest;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

type ApiResult<T> = Result<T, ApiError>;

// --- Request bodies ---

#[derive(Deserialize)]
pub struct ItemsQuery {
    archived: Option<bool>,
}

#[derive(Deserialize)]
pub struct IdBody {
    id: i64,
}

#[derive(Deserialize)]
pub struct UrlBody {
    url: String,
}

// --- Items ---

pub async fn api_items(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ItemsQuery>,
) -> ApiResult<Json<Vec<Item>>> {
    let filter = ItemFilter {
        archived: params.archived.unwrap_or(false),
    };
    Ok(Json(state.store.list(filter).await?))
}

pub async fn api_create_item(
    State(state): State<Arc<AppState>>,
    Json(item): Json<Item>,
) -> ApiResult<impl IntoResponse> {
    let id = state.store.insert(item.without_id()).await?;
    info!(id, "Item added");
    Ok(Json(json!({ "id": id })))
}

pub async fn api_update_item(
    State(state): State<Arc<AppState>>,
    Json(item): Json<Item>,
) -> ApiResult<impl IntoResponse> {
    state.store.update(item).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn api_delete_item(
    State(state): State<Arc<AppState>>,
    Json(body): Json<IdBody>,
) -> ApiResult<impl IntoResponse> {
    state.store.delete(body.id).await?;
    info!(id = body.id, "Item deleted");
    Ok(Json(json!({ "success": true })))
}

pub async fn api_archive_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    state.store.set_archived(id, true).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn api_restore_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    state.store.set_archived(id, false).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn api_grouped_items(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.tracker.grouped().await?))
}

// --- Tracking and refresh ---

pub async fn api_track_item(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TrackRequest>,
) -> ApiResult<impl IntoResponse> {
    let id = state.tracker.track_url(request).await?;
    Ok(Json(json!({ "id": id })))
}

pub async fn api_refresh_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Item>> {
    Ok(Json(state.tracker.refresh_item(id).await?))
}

pub async fn api_refresh_all(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.tracker.refresh_all().await?))
}

// --- Scraping ---

pub async fn api_scrape(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UrlBody>,
) -> ApiResult<Json<Item>> {
    Ok(Json(state.tracker.scrape(&body.url).await?))
}

/// Clears the cache entry for `{ "url" }`, or the whole cache when the body is empty.
pub async fn api_clear_scrape_cache(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let url = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        let parsed: UrlBody = serde_json::from_slice(&body)
            .map_err(|e| ApiError::bad_request(format!("Invalid body: {e}")))?;
        Some(parsed.url)
    };

    let cleared = state.tracker.pipeline().clear_cache(url.as_deref());
    Ok(Json(json!({ "cleared": cleared })))
}

// --- Reference data ---

pub async fn api_sellers() -> impl IntoResponse {
    Json(known_sellers())
}

pub async fn api_exchange_rate(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let rate = state.rates.usd_per_cad().await;
    Json(json!({ "base": "CAD", "quote": "USD", "rate": rate }))
}
