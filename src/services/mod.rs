pub mod detail_cache;
pub mod providers;
pub mod recommendations;
pub mod search_session;
pub mod watchlist;

pub use detail_cache::DetailCache;
pub use search_session::{SearchSession, SearchState, SearchTicket};
pub use watchlist::{WatchlistRevision, WatchlistStore};
