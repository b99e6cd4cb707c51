//! OMDb API provider
//!
//! API Flow:
//! 1. Search: `?s={query}` → page of summaries
//! 2. Detail: `?i={imdb_id}&plot=full` → one detail object
//!
//! Every response carries a `Response` flag of "True"/"False"; failures put a
//! human-readable reason in `Error`.
use crate::{
    error::{AppError, AppResult},
    models::{MovieDetail, MovieId, MovieSummary, OmdbSearchResponse, OmdbStatus, OMDB_NOT_FOUND},
    services::providers::MovieProvider,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbProvider {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    /// Sends a GET with the API key attached and returns the raw body
    async fn request(&self, params: &[(&str, &str)]) -> AppResult<String> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // OMDb answers auth failures with a JSON envelope and a 401; let the
        // envelope speak for itself when there is one.
        if !status.is_success() && serde_json::from_str::<OmdbStatus>(&body).is_err() {
            return Err(AppError::ExternalApi(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        Ok(body)
    }

    fn parse_search(body: &str) -> AppResult<Vec<MovieSummary>> {
        let response: OmdbSearchResponse = serde_json::from_str(body)?;

        if response.status.is_success() {
            tracing::debug!(
                returned = response.search.len(),
                total_results = response.total_results.as_deref().unwrap_or("-"),
                "OMDb search page parsed"
            );
            return Ok(response.search);
        }

        match response.status.error {
            Some(error) if error == OMDB_NOT_FOUND => Ok(Vec::new()),
            Some(error) => Err(AppError::ExternalApi(error)),
            None => Err(AppError::ExternalApi(
                "OMDb reported a failed search without a reason".to_string(),
            )),
        }
    }

    fn parse_detail(body: &str) -> AppResult<MovieDetail> {
        let status: OmdbStatus = serde_json::from_str(body)?;

        if !status.is_success() {
            return Err(AppError::NotFound(
                status.error.unwrap_or_else(|| OMDB_NOT_FOUND.to_string()),
            ));
        }

        Ok(serde_json::from_str(body)?)
    }
}

#[async_trait::async_trait]
impl MovieProvider for OmdbProvider {
    async fn search(&self, query: &str) -> AppResult<Vec<MovieSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let body = self.request(&[("s", query)]).await?;
        let results = Self::parse_search(&body)?;

        tracing::info!(
            query = %query,
            results = results.len(),
            provider = "omdb",
            "Movie search completed"
        );

        Ok(results)
    }

    async fn fetch_detail(&self, id: &MovieId) -> AppResult<MovieDetail> {
        let body = self.request(&[("i", id.as_str()), ("plot", "full")]).await?;
        let detail = Self::parse_detail(&body)?;

        tracing::info!(
            movie_id = %id,
            genre = detail.genre.as_deref().unwrap_or("-"),
            provider = "omdb",
            "Movie detail fetched"
        );

        Ok(detail)
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    /// Serves a canned OMDb lookalike on an ephemeral port
    async fn spawn_fake_omdb() -> String {
        async fn handler(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
            if params.get("apikey").map(String::as_str) != Some("test_key") {
                return Json(json!({"Response": "False", "Error": "Invalid API key!"}));
            }

            if let Some(query) = params.get("s") {
                return match query.as_str() {
                    "batman" => Json(json!({
                        "Search": [
                            {"Title": "Batman Begins", "Year": "2005", "imdbID": "tt0372784", "Type": "movie", "Poster": "N/A"}
                        ],
                        "totalResults": "1",
                        "Response": "True"
                    })),
                    _ => Json(json!({"Response": "False", "Error": "Movie not found!"})),
                };
            }

            match params.get("i").map(String::as_str) {
                Some("tt0372784") if params.get("plot").map(String::as_str) == Some("full") => {
                    Json(json!({
                        "Title": "Batman Begins", "Year": "2005", "imdbID": "tt0372784",
                        "Type": "movie", "Poster": "N/A", "Genre": "Action, Crime, Drama",
                        "Plot": "After witnessing his parents' death...", "imdbRating": "8.2",
                        "Response": "True"
                    }))
                }
                _ => Json(json!({"Response": "False", "Error": "Incorrect IMDb ID."})),
            }
        }

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, Router::new().route("/", get(handler)))
                .await
                .unwrap();
        });

        format!("http://{}/", addr)
    }

    fn provider(api_url: String, api_key: &str) -> OmdbProvider {
        OmdbProvider::new(api_key.to_string(), api_url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_parse_search_success() {
        let body = r#"{"Search":[{"Title":"A","Year":"2001","imdbID":"tt001","Type":"movie","Poster":"N/A"}],"totalResults":"1","Response":"True"}"#;

        let results = OmdbProvider::parse_search(body).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, MovieId::from("tt001"));
    }

    #[test]
    fn test_parse_search_not_found_is_empty() {
        let body = r#"{"Response":"False","Error":"Movie not found!"}"#;
        let results = OmdbProvider::parse_search(body).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_parse_search_other_failure_is_external_error() {
        let body = r#"{"Response":"False","Error":"Too many results."}"#;
        let err = OmdbProvider::parse_search(body).unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(ref msg) if msg == "Too many results."));
    }

    #[test]
    fn test_parse_search_malformed_body() {
        let err = OmdbProvider::parse_search("<html>502</html>").unwrap_err();
        assert!(matches!(err, AppError::Deserialization(_)));
    }

    #[test]
    fn test_parse_detail_failure_is_not_found() {
        let body = r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#;
        let err = OmdbProvider::parse_detail(body).unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Incorrect IMDb ID."));
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query() {
        let provider = provider("http://test.local/".to_string(), "test_key");
        let err = provider.search("   ").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_search_against_fake_server() {
        let url = spawn_fake_omdb().await;
        let provider = provider(url, "test_key");

        let results = provider.search("batman").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Batman Begins");

        let none = provider.search("zzzz").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_detail_against_fake_server() {
        let url = spawn_fake_omdb().await;
        let provider = provider(url, "test_key");

        let detail = provider
            .fetch_detail(&MovieId::from("tt0372784"))
            .await
            .unwrap();
        assert_eq!(detail.primary_genre(), Some("Action"));
        assert_eq!(detail.rating.as_deref(), Some("8.2"));

        let err = provider
            .fetch_detail(&MovieId::from("tt404"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_bad_api_key_surfaces_remote_message() {
        let url = spawn_fake_omdb().await;
        let provider = provider(url, "wrong");

        let err = provider.search("batman").await.unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(ref msg) if msg == "Invalid API key!"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let provider = OmdbProvider::new(
            "test_key".to_string(),
            "http://127.0.0.1:1/".to_string(),
            Duration::from_millis(500),
        )
        .unwrap();

        let err = provider.search("batman").await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }
}
