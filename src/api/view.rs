use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    models::{MediaType, MovieDetail, MovieId, MovieSummary, WatchlistEntry},
    services::SearchState,
};

/// Shown wherever the movie API has no poster
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/300x450?text=No+Image";

pub const STATUS_IDLE: &str = "Search for movies to begin.";
pub const STATUS_SEARCHING: &str = "Searching...";
pub const STATUS_NO_RESULTS: &str = "No movies found.";
pub const STATUS_NO_RELATED: &str = "No related picks found.";

pub const LABEL_ADD: &str = "Add to Watchlist";
pub const LABEL_REMOVE: &str = "Remove from Watchlist";

fn poster_url(poster: &Option<String>) -> String {
    poster
        .clone()
        .unwrap_or_else(|| PLACEHOLDER_POSTER.to_string())
}

fn watchlist_label(in_watchlist: bool) -> &'static str {
    if in_watchlist {
        LABEL_REMOVE
    } else {
        LABEL_ADD
    }
}

/// A result card
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieCard {
    pub id: MovieId,
    pub title: String,
    pub year: String,
    pub poster: String,
    pub media_type: MediaType,
    pub in_watchlist: bool,
}

impl MovieCard {
    pub fn new(movie: &MovieSummary, in_watchlist: bool) -> Self {
        Self {
            id: movie.id.clone(),
            title: movie.title.clone(),
            year: movie.year.clone(),
            poster: poster_url(&movie.poster),
            media_type: movie.media_type,
            in_watchlist,
        }
    }
}

/// Search area: either a status line or the result cards
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchView {
    pub state: &'static str,
    pub query: Option<String>,
    pub status: Option<String>,
    pub results: Vec<MovieCard>,
}

impl SearchView {
    /// `in_watchlist` decides the star on each card
    pub fn render(state: &SearchState, in_watchlist: impl Fn(&MovieId) -> bool) -> Self {
        let (status, results) = match state {
            SearchState::Idle => (Some(STATUS_IDLE.to_string()), Vec::new()),
            SearchState::Searching { .. } => (Some(STATUS_SEARCHING.to_string()), Vec::new()),
            SearchState::Empty { .. } => (Some(STATUS_NO_RESULTS.to_string()), Vec::new()),
            SearchState::Failed { message, .. } => (Some(message.clone()), Vec::new()),
            SearchState::Populated { results, .. } => (
                None,
                results
                    .iter()
                    .map(|movie| MovieCard::new(movie, in_watchlist(&movie.id)))
                    .collect(),
            ),
        };

        Self {
            state: state.label(),
            query: state.query().map(str::to_string),
            status,
            results,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WatchlistItem {
    pub id: MovieId,
    pub title: String,
    pub year: String,
    pub poster: String,
    pub added_at: Option<DateTime<Utc>>,
}

/// Watchlist panel and badge
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WatchlistView {
    pub count: usize,
    pub empty: bool,
    pub entries: Vec<WatchlistItem>,
}

impl WatchlistView {
    pub fn render(entries: &[WatchlistEntry]) -> Self {
        Self {
            count: entries.len(),
            empty: entries.is_empty(),
            entries: entries
                .iter()
                .map(|entry| WatchlistItem {
                    id: entry.movie.id.clone(),
                    title: entry.movie.title.clone(),
                    year: entry.movie.year.clone(),
                    poster: poster_url(&entry.movie.poster),
                    added_at: entry.added_at,
                })
                .collect(),
        }
    }
}

/// Detail modal
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DetailView {
    pub id: MovieId,
    /// "Title (Year)"
    pub heading: String,
    pub poster: String,
    pub genre: Option<String>,
    pub plot: Option<String>,
    /// "IMDb Rating: 8.2"
    pub rating: String,
    pub director: Option<String>,
    pub actors: Option<String>,
    pub runtime: Option<String>,
    pub in_watchlist: bool,
    pub watchlist_label: &'static str,
    pub related: Vec<MovieCard>,
    pub related_status: Option<String>,
}

impl DetailView {
    /// `related` is the outcome of the related-picks lookup, already reduced
    /// to either the picks or a user-facing failure message.
    pub fn render(
        detail: &MovieDetail,
        in_watchlist: impl Fn(&MovieId) -> bool,
        related: Result<&[MovieSummary], String>,
    ) -> Self {
        let (related, related_status) = match related {
            Ok([]) => (Vec::new(), Some(STATUS_NO_RELATED.to_string())),
            Ok(picks) => (
                picks
                    .iter()
                    .map(|movie| MovieCard::new(movie, in_watchlist(&movie.id)))
                    .collect(),
                None,
            ),
            Err(message) => (Vec::new(), Some(message)),
        };

        let listed = in_watchlist(detail.id());

        Self {
            id: detail.id().clone(),
            heading: format!("{} ({})", detail.summary.title, detail.summary.year),
            poster: poster_url(&detail.summary.poster),
            genre: detail.genre.clone(),
            plot: detail.plot.clone(),
            rating: format!(
                "IMDb Rating: {}",
                detail.rating.as_deref().unwrap_or(crate::models::NOT_AVAILABLE)
            ),
            director: detail.director.clone(),
            actors: detail.actors.clone(),
            runtime: detail.runtime.clone(),
            in_watchlist: listed,
            watchlist_label: watchlist_label(listed),
            related,
            related_status,
        }
    }
}

/// Result of toggling a title from a card or the detail modal
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToggleView {
    pub id: MovieId,
    pub in_watchlist: bool,
    pub watchlist_label: &'static str,
    pub watchlist: WatchlistView,
}

impl ToggleView {
    pub fn render(id: &MovieId, in_watchlist: bool, entries: &[WatchlistEntry]) -> Self {
        Self {
            id: id.clone(),
            in_watchlist,
            watchlist_label: watchlist_label(in_watchlist),
            watchlist: WatchlistView::render(entries),
        }
    }
}
