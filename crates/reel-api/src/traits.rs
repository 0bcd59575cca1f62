//! Trait definitions for movie catalog services.
//!
//! The OMDb client implements [`CatalogService`], and the runtime only ever
//! talks to the trait, so tests can drive it with a scripted catalog.

use std::future::Future;

use crate::error::CatalogError;

/// A remote movie catalog.
pub trait CatalogService: Send + Sync {
    /// Search movies by free-text title.
    fn search_movies(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<MovieSummary>, CatalogError>> + Send;

    /// Fetch the full record for a single catalog id.
    fn get_movie(
        &self,
        catalog_id: &str,
    ) -> impl Future<Output = Result<MovieDetail, CatalogError>> + Send;
}

/// A search hit from the catalog.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MovieSummary {
    pub catalog_id: String,
    pub title: String,
    pub year: String,
    pub poster_url: Option<String>,
}

/// A full movie record.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct MovieDetail {
    pub catalog_id: String,
    pub title: String,
    pub year: String,
    pub poster_url: Option<String>,
    /// Raw runtime as reported, e.g. `"169 min"`.
    pub runtime: Option<String>,
    /// Raw rating as reported, e.g. `"8.7"`.
    pub rating: Option<String>,
    pub plot: Option<String>,
    pub actors: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub released: Option<String>,
}

impl MovieDetail {
    /// Runtime in whole minutes, parsed from the leading number of `runtime`.
    pub fn runtime_minutes(&self) -> Option<u32> {
        self.runtime
            .as_deref()
            .and_then(|r| r.split_whitespace().next())
            .and_then(|n| n.parse().ok())
    }

    /// Catalog rating as a number, if the service reported one.
    pub fn catalog_rating(&self) -> Option<f32> {
        self.rating.as_deref().and_then(|r| r.trim().parse().ok())
    }

    /// Cast members, split from the comma-separated actor list.
    pub fn cast(&self) -> Vec<&str> {
        self.actors
            .as_deref()
            .map(|a| a.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }
}
