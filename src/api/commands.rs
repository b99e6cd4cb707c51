use serde::Serialize;

use crate::{
    api::view::{DetailView, SearchView, ToggleView, WatchlistView},
    models::MovieId,
};

/// A user action, decoupled from whatever surface triggered it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit a free-text search (search box or genre card)
    Search { query: String },
    /// Star button on a card or the detail modal's watchlist button
    ToggleWatchlist { id: MovieId },
    /// "View Details" on a card or a click on a related pick
    OpenDetail { id: MovieId },
    /// Remove button in the watchlist panel
    RemoveFromWatchlist { id: MovieId },
    /// Home: clear the search and return to the initial screen
    Reset,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Search { .. } => "search",
            Command::ToggleWatchlist { .. } => "toggle_watchlist",
            Command::OpenDetail { .. } => "open_detail",
            Command::RemoveFromWatchlist { .. } => "remove_from_watchlist",
            Command::Reset => "reset",
        }
    }
}

/// What a command leaves for the view to redraw
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Outcome {
    Search(SearchView),
    Toggled(ToggleView),
    Detail(Box<DetailView>),
    Watchlist(WatchlistView),
}
