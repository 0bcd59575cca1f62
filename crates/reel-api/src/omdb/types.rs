use std::collections::HashSet;

use serde::Deserialize;

use crate::error::CatalogError;
use crate::traits::{MovieDetail, MovieSummary};

/// Marker OMDb uses for fields it has no value for.
const NOT_AVAILABLE: &str = "N/A";

// ── Search response ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbSearchResponse {
    pub search: Option<Vec<OmdbSearchItem>>,
    pub response: String,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbSearchItem {
    pub title: String,
    pub year: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    pub poster: Option<String>,
}

// ── Detail response ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbMovie {
    pub title: Option<String>,
    pub year: Option<String>,
    pub poster: Option<String>,
    pub runtime: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    pub plot: Option<String>,
    pub released: Option<String>,
    pub actors: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub response: String,
    pub error: Option<String>,
}

// ── Conversions ─────────────────────────────────────────────────

fn available(value: Option<String>) -> Option<String> {
    value.filter(|v| v != NOT_AVAILABLE && !v.is_empty())
}

fn is_false(response: &str) -> bool {
    response.eq_ignore_ascii_case("false")
}

impl OmdbSearchResponse {
    /// Classify the envelope: `Response: "False"` is a logical not-found.
    ///
    /// OMDb can list the same `imdbID` more than once; later repeats are dropped.
    pub fn into_results(self) -> Result<Vec<MovieSummary>, CatalogError> {
        if is_false(&self.response) {
            return Err(CatalogError::NotFound(self.error.unwrap_or_default()));
        }
        let items = self
            .search
            .ok_or_else(|| CatalogError::Parse("search response without results".into()))?;
        let mut seen = HashSet::new();
        Ok(items
            .into_iter()
            .filter(|item| seen.insert(item.imdb_id.clone()))
            .map(OmdbSearchItem::into_summary)
            .collect())
    }
}

impl OmdbSearchItem {
    pub fn into_summary(self) -> MovieSummary {
        MovieSummary {
            catalog_id: self.imdb_id,
            title: self.title,
            year: self.year,
            poster_url: available(self.poster),
        }
    }
}

impl OmdbMovie {
    /// Convert into a [`MovieDetail`], keyed by `requested_id` when the
    /// payload omits its own id.
    pub fn into_detail(self, requested_id: &str) -> Result<MovieDetail, CatalogError> {
        if is_false(&self.response) {
            return Err(CatalogError::NotFound(self.error.unwrap_or_default()));
        }
        let title = self
            .title
            .ok_or_else(|| CatalogError::Parse("movie record without title".into()))?;

        Ok(MovieDetail {
            catalog_id: self.imdb_id.unwrap_or_else(|| requested_id.to_string()),
            title,
            year: self.year.unwrap_or_default(),
            poster_url: available(self.poster),
            runtime: available(self.runtime),
            rating: available(self.imdb_rating),
            plot: available(self.plot),
            actors: available(self.actors),
            director: available(self.director),
            genre: available(self.genre),
            released: available(self.released),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_search() {
        let json = r#"{
            "Search": [
                {
                    "Title": "Interstellar",
                    "Year": "2014",
                    "imdbID": "tt0816692",
                    "Type": "movie",
                    "Poster": "https://m.media-amazon.com/images/M/interstellar.jpg"
                },
                {
                    "Title": "The Science of Interstellar",
                    "Year": "2015",
                    "imdbID": "tt4415360",
                    "Type": "movie",
                    "Poster": "N/A"
                }
            ],
            "totalResults": "2",
            "Response": "True"
        }"#;

        let resp: OmdbSearchResponse = serde_json::from_str(json).unwrap();
        let results = resp.into_results().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].catalog_id, "tt0816692");
        assert_eq!(results[0].title, "Interstellar");
        assert!(results[0].poster_url.is_some());
        assert_eq!(results[1].catalog_id, "tt4415360");
        assert_eq!(results[1].poster_url, None);
    }

    #[test]
    fn test_search_drops_repeated_ids() {
        let json = r#"{
            "Search": [
                {"Title": "Heat", "Year": "1995", "imdbID": "tt0113277", "Poster": "N/A"},
                {"Title": "The Heat", "Year": "2013", "imdbID": "tt2404463", "Poster": "N/A"},
                {"Title": "Heat", "Year": "1995", "imdbID": "tt0113277", "Poster": "N/A"}
            ],
            "totalResults": "3",
            "Response": "True"
        }"#;

        let resp: OmdbSearchResponse = serde_json::from_str(json).unwrap();
        let ids: Vec<_> = resp
            .into_results()
            .unwrap()
            .into_iter()
            .map(|m| m.catalog_id)
            .collect();
        assert_eq!(ids, vec!["tt0113277", "tt2404463"]);
    }

    #[test]
    fn test_search_not_found() {
        let json = r#"{"Response": "False", "Error": "Movie not found!"}"#;

        let resp: OmdbSearchResponse = serde_json::from_str(json).unwrap();
        match resp.into_results() {
            Err(CatalogError::NotFound(msg)) => assert_eq!(msg, "Movie not found!"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_search_true_without_results_is_parse_error() {
        let json = r#"{"Response": "True"}"#;

        let resp: OmdbSearchResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(resp.into_results(), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_deserialize_movie() {
        let json = r#"{
            "Title": "Interstellar",
            "Year": "2014",
            "Rated": "PG-13",
            "Released": "07 Nov 2014",
            "Runtime": "169 min",
            "Genre": "Adventure, Drama, Sci-Fi",
            "Director": "Christopher Nolan",
            "Actors": "Matthew McConaughey, Anne Hathaway, Jessica Chastain",
            "Plot": "A team of explorers travel through a wormhole in space.",
            "Poster": "https://m.media-amazon.com/images/M/interstellar.jpg",
            "imdbRating": "8.7",
            "imdbID": "tt0816692",
            "Type": "movie",
            "Response": "True"
        }"#;

        let movie: OmdbMovie = serde_json::from_str(json).unwrap();
        let detail = movie.into_detail("tt0816692").unwrap();
        assert_eq!(detail.catalog_id, "tt0816692");
        assert_eq!(detail.title, "Interstellar");
        assert_eq!(detail.director.as_deref(), Some("Christopher Nolan"));
        assert_eq!(detail.released.as_deref(), Some("07 Nov 2014"));
        assert_eq!(detail.runtime_minutes(), Some(169));
        assert_eq!(detail.cast().len(), 3);
    }

    #[test]
    fn test_movie_placeholders_become_none() {
        let json = r#"{
            "Title": "Obscure Short",
            "Year": "1999",
            "Runtime": "N/A",
            "imdbRating": "N/A",
            "Poster": "N/A",
            "Response": "True"
        }"#;

        let movie: OmdbMovie = serde_json::from_str(json).unwrap();
        let detail = movie.into_detail("tt0000001").unwrap();
        assert_eq!(detail.catalog_id, "tt0000001");
        assert_eq!(detail.runtime, None);
        assert_eq!(detail.rating, None);
        assert_eq!(detail.poster_url, None);
    }

    #[test]
    fn test_movie_incorrect_id() {
        let json = r#"{"Response": "False", "Error": "Incorrect IMDb ID."}"#;

        let movie: OmdbMovie = serde_json::from_str(json).unwrap();
        assert!(matches!(
            movie.into_detail("bogus"),
            Err(CatalogError::NotFound(_))
        ));
    }
}
