use crate::{
    error::AppResult,
    models::{MovieDetail, MovieSummary},
    services::providers::MovieProvider,
};

/// Default number of related picks shown alongside a detail
pub const DEFAULT_RELATED_LIMIT: usize = 6;

/// Finds titles related to `detail` by its primary genre
///
/// Searches the provider using the first listed genre as the query, drops the
/// detail's own title and keeps at most `limit` results in provider order. A
/// detail with no genre has no related picks and costs no request.
pub async fn related_picks(
    provider: &dyn MovieProvider,
    detail: &MovieDetail,
    limit: usize,
) -> AppResult<Vec<MovieSummary>> {
    let Some(genre) = detail.primary_genre() else {
        tracing::debug!(movie_id = %detail.id(), "No genre to base related picks on");
        return Ok(Vec::new());
    };

    let candidates = provider.search(genre).await?;

    let picks: Vec<MovieSummary> = candidates
        .into_iter()
        .filter(|movie| &movie.id != detail.id())
        .take(limit)
        .collect();

    tracing::info!(
        movie_id = %detail.id(),
        genre = %genre,
        picks = picks.len(),
        "Related picks computed"
    );

    Ok(picks)
}
