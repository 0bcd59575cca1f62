//! Search session: turns query edits into at most one live catalog search.
//!
//! Every edit bumps the session generation and drops the previous
//! [`InFlight`], cancelling its request. A finishing task commits only if
//! its generation is still current, so a response that beats its own
//! cancellation is still discarded.

use std::sync::{Arc, Mutex};

use reel_api::{CatalogError, CatalogService, MovieSummary};
use tokio::task::JoinHandle;

use crate::error::LoadError;
use crate::lock;
use crate::task::{until_cancelled, InFlight};

/// What the search box currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchView {
    pub query: String,
    pub results: Vec<MovieSummary>,
    pub error: Option<LoadError>,
    /// True exactly while the current query's request is outstanding.
    pub loading: bool,
}

/// Effect of a query edit.
#[derive(Debug)]
pub enum QueryChange {
    /// Query too short: results and error were cleared, nothing was sent.
    Cleared,
    /// A search was issued; the handle resolves once it commits or is cancelled.
    Started(JoinHandle<()>),
}

pub struct SearchSession<S> {
    inner: Arc<SearchInner<S>>,
}

impl<S> Clone for SearchSession<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct SearchInner<S> {
    service: Arc<S>,
    min_query_len: usize,
    slot: Mutex<SearchSlot>,
}

#[derive(Default)]
struct SearchSlot {
    generation: u64,
    view: SearchView,
    inflight: Option<InFlight>,
}

impl<S: CatalogService + 'static> SearchSession<S> {
    pub fn new(service: Arc<S>, min_query_len: usize) -> Self {
        Self {
            inner: Arc::new(SearchInner {
                service,
                min_query_len,
                slot: Mutex::new(SearchSlot::default()),
            }),
        }
    }

    /// Whether `query` is long enough to be sent to the catalog.
    pub fn is_searchable(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.inner.min_query_len
    }

    /// Replace the query, cancelling any search still running for the old one.
    ///
    /// Must be called from within a Tokio runtime when the query is searchable.
    pub fn set_query(&self, query: impl Into<String>) -> QueryChange {
        let query = query.into();
        let searchable = self.is_searchable(&query);

        let mut slot = lock(&self.inner.slot);
        slot.generation += 1;
        let generation = slot.generation;
        if let Some(previous) = slot.inflight.take() {
            tracing::debug!(generation = previous.generation, "Superseding search");
        }
        slot.view.query.clone_from(&query);
        slot.view.results.clear();
        slot.view.error = None;
        slot.view.loading = searchable;

        if !searchable {
            return QueryChange::Cleared;
        }

        let (inflight, token) = InFlight::new(generation);
        slot.inflight = Some(inflight);
        drop(slot);

        let term = query.trim().to_string();
        let service = self.inner.service.clone();
        let session = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            tracing::debug!(generation, query = %term, "Searching");
            let Some(outcome) = until_cancelled(&token, service.search_movies(&term)).await else {
                tracing::debug!(generation, "Search cancelled");
                return;
            };
            if let Some(inner) = session.upgrade() {
                if !lock(&inner.slot).commit(generation, outcome) {
                    tracing::debug!(generation, "Discarded stale search response");
                }
            }
        });

        QueryChange::Started(handle)
    }

    pub fn view(&self) -> SearchView {
        lock(&self.inner.slot).view.clone()
    }
}

impl SearchSlot {
    /// Apply a finished search. Returns `false` if a newer query superseded it.
    fn commit(
        &mut self,
        generation: u64,
        outcome: Result<Vec<MovieSummary>, CatalogError>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.inflight = None;
        self.view.loading = false;

        match outcome {
            Ok(results) => {
                tracing::debug!(generation, count = results.len(), "Search complete");
                self.view.results = results;
                self.view.error = None;
            }
            Err(e) => {
                let error = LoadError::from(&e);
                match error {
                    LoadError::NotFound => tracing::debug!(generation, "No search results"),
                    _ => tracing::warn!(generation, error = %e, "Search failed"),
                }
                self.view.results.clear();
                self.view.error = Some(error);
            }
        }
        true
    }
}
