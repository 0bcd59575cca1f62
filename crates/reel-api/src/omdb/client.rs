use reqwest::Client;

use super::types::{OmdbMovie, OmdbSearchResponse};
use crate::error::CatalogError;
use crate::traits::{CatalogService, MovieDetail, MovieSummary};

/// OMDb (Open Movie Database) client.
pub struct OmdbClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OmdbClient {
    /// `base_url` comes from `catalog.base_url` in the config.
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    /// Check the HTTP response for errors and return the body text on failure.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "OMDb API error");
            Err(CatalogError::Api {
                status,
                message: body,
            })
        }
    }

    async fn get(&self, params: &[(&str, &str)]) -> Result<reqwest::Response, CatalogError> {
        let resp = self
            .http
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;
        Self::check_response(resp).await
    }
}

impl CatalogService for OmdbClient {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError> {
        tracing::debug!(query, "OMDb search request");
        let body: OmdbSearchResponse = self
            .get(&[("s", query)])
            .await?
            .json()
            .await
            .map_err(body_error)?;

        body.into_results()
    }

    async fn get_movie(&self, catalog_id: &str) -> Result<MovieDetail, CatalogError> {
        tracing::debug!(catalog_id, "OMDb detail request");
        let body: OmdbMovie = self
            .get(&[("i", catalog_id), ("plot", "full")])
            .await?
            .json()
            .await
            .map_err(body_error)?;

        body.into_detail(catalog_id)
    }
}

/// Body read failures stay transport errors; only undecodable JSON is a parse error.
fn body_error(e: reqwest::Error) -> CatalogError {
    if e.is_decode() {
        CatalogError::Parse(e.to_string())
    } else {
        CatalogError::Http(e)
    }
}
