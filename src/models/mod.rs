use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod movie;

pub use movie::{MediaType, MovieDetail, MovieId, MovieSummary, NOT_AVAILABLE};

/// A saved movie in the user's watchlist
///
/// Persisted as the flat summary object so lists written without `added_at`
/// (or holding full detail objects) still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistEntry {
    #[serde(flatten)]
    pub movie: MovieSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl WatchlistEntry {
    pub fn new(movie: MovieSummary) -> Self {
        Self {
            movie,
            added_at: Some(Utc::now()),
        }
    }

    pub fn id(&self) -> &MovieId {
        &self.movie.id
    }
}

impl From<MovieSummary> for WatchlistEntry {
    fn from(movie: MovieSummary) -> Self {
        Self::new(movie)
    }
}

impl From<MovieDetail> for WatchlistEntry {
    fn from(detail: MovieDetail) -> Self {
        Self::new(detail.summary)
    }
}

// ============================================================================
// OMDb API Types
// ============================================================================

/// Error text OMDb returns when a search or lookup matches nothing
pub const OMDB_NOT_FOUND: &str = "Movie not found!";

/// Envelope shared by every OMDb response
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbStatus {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl OmdbStatus {
    pub fn is_success(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }
}

/// Raw API response from the `s=` search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchResponse {
    #[serde(flatten)]
    pub status: OmdbStatus,
    #[serde(rename = "Search", default)]
    pub search: Vec<MovieSummary>,
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_loads_without_added_at() {
        let json = r#"[{"Title":"A","Year":"2001","imdbID":"tt001","Type":"movie","Poster":"N/A"}]"#;

        let entries: Vec<WatchlistEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id(), &MovieId::from("tt001"));
        assert_eq!(entries[0].added_at, None);
    }

    #[test]
    fn test_entry_loads_from_detail_object() {
        let json = r#"[{"Title":"A","Year":"2001","imdbID":"tt001","Type":"movie",
            "Genre":"Drama","Plot":"Long plot","imdbRating":"7.1","Response":"True"}]"#;

        let entries: Vec<WatchlistEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries[0].movie.title, "A");
    }

    #[test]
    fn test_entry_serializes_flat() {
        let entry = WatchlistEntry::new(MovieSummary {
            id: MovieId::from("tt001"),
            title: "A".to_string(),
            year: "2001".to_string(),
            poster: None,
            media_type: MediaType::Movie,
        });

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["imdbID"], "tt001");
        assert_eq!(value["Title"], "A");
        assert!(value["added_at"].is_string());
    }

    #[test]
    fn test_search_response_success() {
        let json = r#"{
            "Search": [
                {"Title":"Batman Begins","Year":"2005","imdbID":"tt0372784","Type":"movie","Poster":"N/A"},
                {"Title":"The Batman","Year":"2022","imdbID":"tt1877830","Type":"movie","Poster":"N/A"}
            ],
            "totalResults": "2",
            "Response": "True"
        }"#;

        let response: OmdbSearchResponse = serde_json::from_str(json).unwrap();
        assert!(response.status.is_success());
        assert_eq!(response.search.len(), 2);
        assert_eq!(response.total_results.as_deref(), Some("2"));
    }

    #[test]
    fn test_search_response_not_found() {
        let json = r#"{"Response":"False","Error":"Movie not found!"}"#;

        let response: OmdbSearchResponse = serde_json::from_str(json).unwrap();
        assert!(!response.status.is_success());
        assert_eq!(response.status.error.as_deref(), Some(OMDB_NOT_FOUND));
        assert!(response.search.is_empty());
    }
}
