//! Movie metadata provider abstraction
//!
//! The rest of the crate only sees this trait, so the remote API stays an
//! opaque collaborator and tests can substitute a mock.
use crate::{
    error::AppResult,
    models::{MovieDetail, MovieId, MovieSummary},
};

pub mod omdb;

pub use omdb::OmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    /// Search for titles by free text
    ///
    /// A search that matches nothing is `Ok` with an empty list, not an error.
    async fn search(&self, query: &str) -> AppResult<Vec<MovieSummary>>;

    /// Fetch the full record for one identifier
    ///
    /// Returns `AppError::NotFound` when the provider has no such title.
    async fn fetch_detail(&self, id: &MovieId) -> AppResult<MovieDetail>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
