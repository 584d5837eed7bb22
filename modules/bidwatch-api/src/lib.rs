pub mod error;
pub mod rest;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use bidwatch_store::ItemStore;
use bidwatch_tracker::{ExchangeRateService, Tracker};

pub use error::ApiError;

pub struct AppState {
    pub tracker: Arc<Tracker>,
    pub store: Arc<dyn ItemStore>,
    pub rates: ExchangeRateService,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Items
        .route(
            "/api/items",
            get(rest::api_items)
                .post(rest::api_create_item)
                .put(rest::api_update_item)
                .delete(rest::api_delete_item),
        )
        .route("/api/items/grouped", get(rest::api_grouped_items))
        .route("/api/items/track", post(rest::api_track_item))
        .route("/api/items/refresh", post(rest::api_refresh_all))
        .route("/api/items/{id}/archive", post(rest::api_archive_item))
        .route("/api/items/{id}/restore", post(rest::api_restore_item))
        .route("/api/items/{id}/refresh", post(rest::api_refresh_item))
        // Scraping
        .route("/api/scrape", post(rest::api_scrape))
        .route("/api/scrape/cache", delete(rest::api_clear_scrape_cache))
        // Reference data
        .route("/api/sellers", get(rest::api_sellers))
        .route("/api/exchange-rate", get(rest::api_exchange_rate))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}
