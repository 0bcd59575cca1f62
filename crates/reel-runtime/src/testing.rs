//! Scripted catalog and title sink for runtime tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use reel_api::{CatalogError, CatalogService, MovieDetail, MovieSummary};

use crate::title::TitleSink;

#[derive(Clone)]
pub enum Reply<T> {
    Ok(T),
    NotFound,
    Fail,
    Malformed,
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T, CatalogError> {
        match self {
            Reply::Ok(v) => Ok(v),
            Reply::NotFound => Err(CatalogError::NotFound("Movie not found!".into())),
            Reply::Fail => Err(CatalogError::Api {
                status: 500,
                message: "internal error".into(),
            }),
            Reply::Malformed => Err(CatalogError::Parse("missing field `Search`".into())),
        }
    }
}

/// A catalog whose answers and latencies are set up front.
#[derive(Default)]
pub struct ScriptedCatalog {
    searches: Mutex<HashMap<String, (Duration, Reply<Vec<MovieSummary>>)>>,
    movies: Mutex<HashMap<String, (Duration, Reply<MovieDetail>)>>,
    search_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    searches_answered: AtomicUsize,
    details_answered: AtomicUsize,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(self, query: &str, delay_ms: u64, reply: Reply<Vec<MovieSummary>>) -> Self {
        self.searches
            .lock()
            .unwrap()
            .insert(query.to_string(), (Duration::from_millis(delay_ms), reply));
        self
    }

    pub fn movie(self, id: &str, delay_ms: u64, reply: Reply<MovieDetail>) -> Self {
        self.movies
            .lock()
            .unwrap()
            .insert(id.to_string(), (Duration::from_millis(delay_ms), reply));
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    /// Searches that ran to completion instead of being dropped mid-flight.
    pub fn searches_answered(&self) -> usize {
        self.searches_answered.load(Ordering::SeqCst)
    }

    pub fn details_answered(&self) -> usize {
        self.details_answered.load(Ordering::SeqCst)
    }
}

impl CatalogService for ScriptedCatalog {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let (delay, reply) = {
            let searches = self.searches.lock().unwrap();
            searches
                .get(query)
                .cloned()
                .unwrap_or((Duration::ZERO, Reply::NotFound))
        };
        tokio::time::sleep(delay).await;
        self.searches_answered.fetch_add(1, Ordering::SeqCst);
        reply.into_result()
    }

    async fn get_movie(&self, catalog_id: &str) -> Result<MovieDetail, CatalogError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let (delay, reply) = {
            let movies = self.movies.lock().unwrap();
            movies
                .get(catalog_id)
                .cloned()
                .unwrap_or((Duration::ZERO, Reply::NotFound))
        };
        tokio::time::sleep(delay).await;
        self.details_answered.fetch_add(1, Ordering::SeqCst);
        reply.into_result()
    }
}

/// Records every title it is asked to show.
#[derive(Default)]
pub struct RecordingTitle {
    titles: Mutex<Vec<String>>,
}

impl RecordingTitle {
    pub fn history(&self) -> Vec<String> {
        self.titles.lock().unwrap().clone()
    }

    pub fn current(&self) -> Option<String> {
        self.titles.lock().unwrap().last().cloned()
    }
}

impl TitleSink for RecordingTitle {
    fn set_title(&self, title: &str) {
        self.titles.lock().unwrap().push(title.to_string());
    }
}

pub fn summary(id: &str, title: &str, year: &str) -> MovieSummary {
    MovieSummary {
        catalog_id: id.into(),
        title: title.into(),
        year: year.into(),
        poster_url: None,
    }
}

pub fn detail(id: &str, title: &str) -> MovieDetail {
    MovieDetail {
        catalog_id: id.into(),
        title: title.into(),
        year: "2014".into(),
        poster_url: Some(format!("https://img.example/{id}.jpg")),
        runtime: Some("169 min".into()),
        rating: Some("8.7".into()),
        plot: Some("A team of explorers travel through a wormhole.".into()),
        actors: Some("Matthew McConaughey, Anne Hathaway".into()),
        director: Some("Christopher Nolan".into()),
        genre: Some("Adventure, Drama, Sci-Fi".into()),
        released: Some("07 Nov 2014".into()),
    }
}
