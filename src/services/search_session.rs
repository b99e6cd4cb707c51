use crate::{
    error::{AppError, AppResult},
    models::{MovieId, MovieSummary},
};

/// Where the current search stands
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Idle,
    Searching { query: String },
    Populated { query: String, results: Vec<MovieSummary> },
    /// The search succeeded and matched nothing
    Empty { query: String },
    /// Transport or remote failure; `message` is user-facing
    Failed { query: String, message: String },
}

impl SearchState {
    pub fn label(&self) -> &'static str {
        match self {
            SearchState::Idle => "idle",
            SearchState::Searching { .. } => "searching",
            SearchState::Populated { .. } => "populated",
            SearchState::Empty { .. } => "empty",
            SearchState::Failed { .. } => "failed",
        }
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            SearchState::Idle => None,
            SearchState::Searching { query }
            | SearchState::Populated { query, .. }
            | SearchState::Empty { query }
            | SearchState::Failed { query, .. } => Some(query),
        }
    }
}

/// Issued by [`SearchSession::begin`]; hand it back with the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Last query and result set, replaced wholesale by each search
///
/// Every search is numbered. A response is applied only if it belongs to the
/// most recently issued search, so a slow earlier response can no longer
/// overwrite a newer one.
#[derive(Debug)]
pub struct SearchSession {
    state: SearchState,
    last_query: String,
    last_results: Vec<MovieSummary>,
    latest_seq: u64,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            state: SearchState::Idle,
            last_query: String::new(),
            last_results: Vec::new(),
            latest_seq: 0,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Query of the last successful search
    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    /// Results of the last successful search
    pub fn last_results(&self) -> &[MovieSummary] {
        &self.last_results
    }

    /// Looks `id` up among the cards currently on screen
    ///
    /// Only a populated state shows cards; results kept from an earlier
    /// search behind a failure or an in-flight search are not visible.
    pub fn find(&self, id: &MovieId) -> Option<&MovieSummary> {
        match &self.state {
            SearchState::Populated { results, .. } => results.iter().find(|movie| &movie.id == id),
            _ => None,
        }
    }

    /// Moves to `Searching` and supersedes any search still in flight
    pub fn begin(&mut self, query: impl Into<String>) -> SearchTicket {
        let query = query.into();
        self.latest_seq += 1;
        self.state = SearchState::Searching {
            query: query.clone(),
        };

        SearchTicket {
            seq: self.latest_seq,
            query,
        }
    }

    /// Applies the outcome of the search `ticket` was issued for
    ///
    /// Returns `false` and leaves the session untouched when a newer search has
    /// been started (or the session reset) since.
    pub fn complete(&mut self, ticket: SearchTicket, outcome: AppResult<Vec<MovieSummary>>) -> bool {
        if ticket.seq != self.latest_seq {
            tracing::debug!(
                query = %ticket.query,
                seq = ticket.seq,
                latest = self.latest_seq,
                "Discarding stale search response"
            );
            return false;
        }

        let SearchTicket { query, .. } = ticket;

        self.state = match outcome {
            Ok(results) => self.succeed(query, results),
            Err(AppError::NotFound(_)) => self.succeed(query, Vec::new()),
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Search failed");
                SearchState::Failed {
                    query,
                    message: e.status_message(),
                }
            }
        };

        true
    }

    fn succeed(&mut self, query: String, results: Vec<MovieSummary>) -> SearchState {
        self.last_query = query.clone();
        self.last_results = results.clone();

        if results.is_empty() {
            SearchState::Empty { query }
        } else {
            SearchState::Populated { query, results }
        }
    }

    /// Back to `Idle`, forgetting results and dropping any search in flight
    pub fn reset(&mut self) {
        self.latest_seq += 1;
        self.state = SearchState::Idle;
        self.last_query.clear();
        self.last_results.clear();
    }
}
