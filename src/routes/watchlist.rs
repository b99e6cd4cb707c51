use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{
    api::{view::WatchlistView, AppState, Command, Outcome},
    error::AppResult,
    middleware::RequestId,
    models::MovieId,
};

pub async fn list(State(state): State<AppState>) -> Json<WatchlistView> {
    Json(state.watchlist_view().await)
}

/// Adds the title if absent, removes it if present
pub async fn toggle(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> AppResult<Json<Outcome>> {
    tracing::info!(request_id = %request_id, movie_id = %id, "Processing watchlist toggle");

    let outcome = state
        .dispatch(Command::ToggleWatchlist {
            id: MovieId::from(id),
        })
        .await?;
    Ok(Json(outcome))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> AppResult<Json<Outcome>> {
    tracing::info!(request_id = %request_id, movie_id = %id, "Processing watchlist removal");

    let outcome = state
        .dispatch(Command::RemoveFromWatchlist {
            id: MovieId::from(id),
        })
        .await?;
    Ok(Json(outcome))
}
