use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    api::{AppState, Command, Outcome},
    error::AppResult,
    middleware::RequestId,
    models::MovieId,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

/// Runs a search when `q` is given, otherwise returns the current session
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Outcome>> {
    let Some(query) = params.q else {
        return Ok(Json(Outcome::Search(state.search_view().await)));
    };

    tracing::info!(request_id = %request_id, query = %query, "Processing search request");

    let outcome = state.dispatch(Command::Search { query }).await?;
    Ok(Json(outcome))
}

/// Clears the search session
pub async fn reset(State(state): State<AppState>) -> AppResult<Json<Outcome>> {
    Ok(Json(state.dispatch(Command::Reset).await?))
}

/// Detail view with related picks
pub async fn detail(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> AppResult<Json<Outcome>> {
    tracing::info!(request_id = %request_id, movie_id = %id, "Processing detail request");

    let outcome = state
        .dispatch(Command::OpenDetail {
            id: MovieId::from(id),
        })
        .await?;
    Ok(Json(outcome))
}
