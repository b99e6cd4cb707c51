use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Value the movie API uses for any field it has no data for
pub const NOT_AVAILABLE: &str = "N/A";

/// Stable per-title key from the movie API (IMDb ID, e.g. "tt0372784")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MovieId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MovieId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Movie,
    Series,
    Episode,
    Game,
    #[serde(other)]
    Other,
}

/// Lightweight record returned by a search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    #[serde(rename = "imdbID")]
    pub id: MovieId,
    #[serde(rename = "Title")]
    pub title: String,
    /// Free text; series use ranges such as "2008–2013"
    #[serde(rename = "Year", default)]
    pub year: String,
    /// `None` when the API has no image
    #[serde(rename = "Poster", default, with = "not_available")]
    pub poster: Option<String>,
    #[serde(rename = "Type", default)]
    pub media_type: MediaType,
}

/// Full record fetched per identifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    /// Comma-separated, most relevant genre first
    #[serde(rename = "Genre", default, with = "not_available")]
    pub genre: Option<String>,
    #[serde(rename = "Plot", default, with = "not_available")]
    pub plot: Option<String>,
    /// Numeric string such as "8.2"
    #[serde(rename = "imdbRating", default, with = "not_available")]
    pub rating: Option<String>,
    #[serde(rename = "Director", default, with = "not_available")]
    pub director: Option<String>,
    #[serde(rename = "Actors", default, with = "not_available")]
    pub actors: Option<String>,
    #[serde(rename = "Runtime", default, with = "not_available")]
    pub runtime: Option<String>,
    #[serde(rename = "Released", default, with = "not_available")]
    pub released: Option<String>,
}

impl MovieDetail {
    pub fn id(&self) -> &MovieId {
        &self.summary.id
    }

    /// Genres in the order the API lists them
    pub fn genres(&self) -> Vec<&str> {
        self.genre
            .as_deref()
            .map(|genre| {
                genre
                    .split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn primary_genre(&self) -> Option<&str> {
        self.genres().into_iter().next()
    }

    pub fn summary(&self) -> MovieSummary {
        self.summary.clone()
    }
}

/// Maps the API's "N/A" sentinel to `None` and back.
mod not_available {
    use super::NOT_AVAILABLE;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_deref().unwrap_or(NOT_AVAILABLE))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|v| !v.trim().is_empty() && v != NOT_AVAILABLE))
    }
}
