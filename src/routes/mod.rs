use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    api::AppState,
    middleware::{make_span_with_request_id, request_id_middleware},
};

pub mod movies;
pub mod watchlist;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(movies::search).delete(movies::reset))
        .route("/movies/:id", get(movies::detail))
        .route("/watchlist", get(watchlist::list))
        .route("/watchlist/:id", delete(watchlist::remove))
        .route("/watchlist/:id/toggle", post(watchlist::toggle))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
