//! Detail loader for the selected movie.
//!
//! An open view owns three resources: the in-flight fetch, the window title
//! (once the record has a title), and an Escape subscription. All three live
//! in the slot and are released together by [`DetailSlot::close`], or by
//! drop when the loader goes away.

use std::sync::{Arc, Mutex};

use reel_api::{CatalogError, CatalogService, MovieDetail};
use tokio::task::JoinHandle;

use crate::error::LoadError;
use crate::events::{EventBus, Key, Subscription};
use crate::lock;
use crate::task::{until_cancelled, InFlight};
use crate::title::{movie_title, TitleGuard, TitleSink};

/// What the details panel currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailView {
    pub selected: Option<String>,
    pub movie: Option<MovieDetail>,
    pub loading: bool,
    pub error: Option<LoadError>,
}

/// Effect of a selection toggle.
#[derive(Debug)]
pub enum Selection {
    Opened(JoinHandle<()>),
    Closed,
}

pub struct DetailLoader<S> {
    inner: Arc<DetailInner<S>>,
}

impl<S> Clone for DetailLoader<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct DetailInner<S> {
    service: Arc<S>,
    events: EventBus,
    title: Arc<dyn TitleSink>,
    default_title: String,
    slot: Mutex<DetailSlot>,
}

#[derive(Default)]
struct DetailSlot {
    generation: u64,
    view: DetailView,
    inflight: Option<InFlight>,
    title: Option<TitleGuard>,
    escape: Option<Subscription>,
}

impl<S: CatalogService + 'static> DetailLoader<S> {
    pub fn new(
        service: Arc<S>,
        events: EventBus,
        title: Arc<dyn TitleSink>,
        default_title: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(DetailInner {
                service,
                events,
                title,
                default_title: default_title.into(),
                slot: Mutex::new(DetailSlot::default()),
            }),
        }
    }

    /// Select `catalog_id`, or close the view if it is already selected.
    pub fn toggle(&self, catalog_id: &str) -> Selection {
        let mut slot = lock(&self.inner.slot);
        if slot.view.selected.as_deref() == Some(catalog_id) {
            slot.close();
            tracing::debug!(catalog_id, "Deselected movie");
            return Selection::Closed;
        }
        Selection::Opened(self.open_in(&mut slot, catalog_id.to_string()))
    }

    /// Open the details for `catalog_id`, replacing any open view.
    pub fn open(&self, catalog_id: impl Into<String>) -> JoinHandle<()> {
        let mut slot = lock(&self.inner.slot);
        self.open_in(&mut slot, catalog_id.into())
    }

    /// Close the view. Returns `false` if nothing was open.
    pub fn close(&self) -> bool {
        let mut slot = lock(&self.inner.slot);
        let was_open = slot.view.selected.is_some();
        slot.close();
        was_open
    }

    pub fn view(&self) -> DetailView {
        lock(&self.inner.slot).view.clone()
    }

    fn open_in(&self, slot: &mut DetailSlot, catalog_id: String) -> JoinHandle<()> {
        slot.close();
        slot.generation += 1;
        let generation = slot.generation;

        let (inflight, token) = InFlight::new(generation);
        slot.inflight = Some(inflight);
        slot.escape = Some(self.escape_subscription());
        slot.view = DetailView {
            selected: Some(catalog_id.clone()),
            loading: true,
            ..Default::default()
        };

        let service = self.inner.service.clone();
        let loader = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            tracing::debug!(generation, catalog_id = %catalog_id, "Loading movie details");
            let Some(outcome) = until_cancelled(&token, service.get_movie(&catalog_id)).await
            else {
                tracing::debug!(generation, "Detail fetch cancelled");
                return;
            };
            if let Some(inner) = loader.upgrade() {
                inner.commit(generation, outcome);
            }
        })
    }

    fn escape_subscription(&self) -> Subscription {
        let loader = Arc::downgrade(&self.inner);
        self.inner.events.subscribe(Key::Escape, move || {
            if let Some(inner) = loader.upgrade() {
                lock(&inner.slot).close();
                tracing::debug!("Closed movie details on Escape");
            }
        })
    }
}

impl<S> DetailInner<S> {
    fn commit(&self, generation: u64, outcome: Result<MovieDetail, CatalogError>) {
        let mut slot = lock(&self.slot);
        if generation != slot.generation {
            tracing::debug!(generation, "Discarded stale movie details");
            return;
        }
        slot.inflight = None;
        slot.view.loading = false;

        match outcome {
            Ok(movie) => {
                if !movie.title.is_empty() {
                    slot.title = Some(TitleGuard::set(
                        self.title.clone(),
                        &movie_title(&movie.title),
                        &self.default_title,
                    ));
                }
                slot.view.movie = Some(movie);
            }
            Err(e) => {
                tracing::warn!(generation, error = %e, "Failed to load movie details");
                slot.view.error = Some(LoadError::from(&e));
            }
        }
    }
}

impl DetailSlot {
    /// Release everything the open view holds and bump the generation so a
    /// fetch that already finished cannot commit.
    fn close(&mut self) {
        self.generation += 1;
        self.inflight = None;
        self.title = None;
        self.escape = None;
        self.view = DetailView::default();
    }
}
