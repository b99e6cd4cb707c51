use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::{
    api::{
        commands::{Command, Outcome},
        view::{DetailView, SearchView, ToggleView, WatchlistView},
    },
    error::{AppError, AppResult},
    models::{MovieId, WatchlistEntry},
    services::{
        providers::MovieProvider, recommendations, DetailCache, SearchSession, WatchlistRevision,
        WatchlistStore,
    },
    storage::KeyValueStore,
};

/// Shared application state
///
/// Constructed once at startup and handed to every request handler; it lives
/// for the whole process.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<AppStateInner>,
}

/// Inner state shared by all clones of [`AppState`]
///
/// Lock order: `watchlist` before `session`. Nothing takes `watchlist` while
/// holding `session`.
pub struct AppStateInner {
    provider: Arc<dyn MovieProvider>,
    watchlist: Mutex<WatchlistStore>,
    session: Mutex<SearchSession>,
    details: DetailCache,
    related_limit: usize,
}

impl AppState {
    /// Creates the application state, loading the watchlist from `storage`
    pub async fn new(
        provider: Arc<dyn MovieProvider>,
        storage: Arc<dyn KeyValueStore>,
        watchlist_key: &str,
        related_limit: usize,
    ) -> Self {
        let watchlist = WatchlistStore::load(storage, watchlist_key).await;

        tracing::info!(
            provider = provider.name(),
            watchlist_size = watchlist.len(),
            related_limit,
            "Application state ready"
        );

        Self {
            inner: Arc::new(AppStateInner {
                provider,
                watchlist: Mutex::new(watchlist),
                session: Mutex::new(SearchSession::new()),
                details: DetailCache::new(),
                related_limit,
            }),
        }
    }

    /// Runs one user action to completion
    pub async fn dispatch(&self, command: Command) -> AppResult<Outcome> {
        tracing::debug!(command = command.name(), "Dispatching command");

        match command {
            Command::Search { query } => self.search(&query).await.map(Outcome::Search),
            Command::ToggleWatchlist { id } => self.toggle(&id).await.map(Outcome::Toggled),
            Command::OpenDetail { id } => self
                .open_detail(&id)
                .await
                .map(|view| Outcome::Detail(Box::new(view))),
            Command::RemoveFromWatchlist { id } => self.remove(&id).await.map(Outcome::Watchlist),
            Command::Reset => {
                self.inner.session.lock().await.reset();
                Ok(Outcome::Search(self.search_view().await))
            }
        }
    }

    /// Observers are woken after each persisted watchlist change
    pub async fn watchlist_updates(&self) -> watch::Receiver<WatchlistRevision> {
        self.inner.watchlist.lock().await.subscribe()
    }

    pub async fn search_view(&self) -> SearchView {
        let state = self.inner.session.lock().await.state().clone();
        let watchlist = self.inner.watchlist.lock().await;
        SearchView::render(&state, |id| watchlist.contains(id))
    }

    pub async fn watchlist_view(&self) -> WatchlistView {
        let watchlist = self.inner.watchlist.lock().await;
        WatchlistView::render(watchlist.list())
    }

    async fn search(&self, query: &str) -> AppResult<SearchView> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let ticket = self.inner.session.lock().await.begin(query);

        // No lock is held across the request; a newer search may start meanwhile
        let outcome = self.inner.provider.search(ticket.query()).await;

        let applied = self.inner.session.lock().await.complete(ticket, outcome);
        if !applied {
            tracing::info!(
                query = %query,
                provider = self.inner.provider.name(),
                "Search superseded by a newer one"
            );
        }

        Ok(self.search_view().await)
    }

    async fn toggle(&self, id: &MovieId) -> AppResult<ToggleView> {
        let mut watchlist = self.inner.watchlist.lock().await;

        let in_watchlist = if watchlist.contains(id) {
            watchlist.remove(id).await?;
            false
        } else {
            let entry = self.resolve_entry(id).await?;
            watchlist.add(entry).await?;
            true
        };

        tracing::info!(movie_id = %id, in_watchlist, total = watchlist.len(), "Watchlist toggled");

        Ok(ToggleView::render(id, in_watchlist, watchlist.list()))
    }

    async fn remove(&self, id: &MovieId) -> AppResult<WatchlistView> {
        let mut watchlist = self.inner.watchlist.lock().await;
        watchlist.remove(id).await?;
        Ok(WatchlistView::render(watchlist.list()))
    }

    /// Finds the record to save for `id` among what the user can currently see
    async fn resolve_entry(&self, id: &MovieId) -> AppResult<WatchlistEntry> {
        if let Some(movie) = self.inner.session.lock().await.find(id) {
            return Ok(WatchlistEntry::new(movie.clone()));
        }

        if let Some(detail) = self.inner.details.get(id).await {
            return Ok(WatchlistEntry::from(detail));
        }

        Err(AppError::NotFound(format!(
            "Movie {} is not in the current results",
            id
        )))
    }

    async fn open_detail(&self, id: &MovieId) -> AppResult<DetailView> {
        let provider = self.inner.provider.clone();
        let detail = self
            .inner
            .details
            .get_or_fetch(id, |id| async move { provider.fetch_detail(&id).await })
            .await?;

        let related =
            recommendations::related_picks(self.inner.provider.as_ref(), &detail, self.inner.related_limit)
                .await;

        let related = match &related {
            Ok(picks) => Ok(picks.as_slice()),
            Err(e) => {
                tracing::warn!(movie_id = %id, error = %e, "Related picks unavailable");
                Err(e.status_message())
            }
        };

        let watchlist = self.inner.watchlist.lock().await;
        Ok(DetailView::render(&detail, |id| watchlist.contains(id), related))
    }
}
